use crate::resource::route::RouteConfiguration;
use serde::{Deserialize, Serialize};

/// A decoded Listener (LDS) resource.
///
/// Only the parts relevant to dependency tracking are kept: the resource
/// name and where the inner HTTP connection manager takes its routes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub name: String,
    pub route_source: RouteSource,
}

/// Route-configuration source selected by the listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteSource {
    /// Routes come from a separately watched RouteConfiguration (RDS).
    Rds { route_config_name: String },
    /// The route configuration is inlined into the listener.
    Inline { route_config: RouteConfiguration },
}
