use crate::error::Status;
use crate::resource::{CdsUpdate, EndpointResource, Listener, RouteConfiguration, VirtualHost};
use serde::Serialize;
use std::collections::BTreeMap;

/// A complete configuration snapshot: the latest listener, the route
/// configuration derived from it, the virtual host matching the data-plane
/// authority, and one entry per cluster in the dependency forest.
///
/// Snapshots are plain values. Two snapshots built from the same settled
/// state compare equal, which is what makes emission idempotent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XdsConfig {
    pub listener: Listener,
    pub route_config: RouteConfiguration,
    pub virtual_host: VirtualHost,
    /// Keyed by cluster name; `Err` carries the per-cluster failure without
    /// failing the snapshot as a whole.
    pub clusters: BTreeMap<String, Result<ClusterConfig, Status>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterConfig {
    pub cluster: CdsUpdate,
    pub children: ClusterChildren,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClusterChildren {
    /// Direct children of an aggregate cluster, mirroring the last CDS
    /// update's child list in order.
    Aggregate { leaf_clusters: Vec<String> },
    /// Endpoint payload of an EDS or LOGICAL_DNS cluster. `endpoints` is
    /// unset when the only outcome so far is a resolution note.
    Endpoints {
        endpoints: Option<EndpointResource>,
        resolution_note: Option<String>,
    },
}

/// Downstream consumer of the reconciler's output.
///
/// `on_error` and `on_resource_does_not_exist` fire only for listener- and
/// route-configuration-level conditions, with a `context` of the form
/// `"Listener <name>"` or `"RouteConfiguration <name>"`. Per-cluster
/// failures travel inside the snapshot instead.
pub trait XdsConfigWatcher: Send + 'static {
    fn on_update(&mut self, config: XdsConfig);
    fn on_error(&mut self, context: &str, status: Status);
    fn on_resource_does_not_exist(&mut self, context: &str);
}
