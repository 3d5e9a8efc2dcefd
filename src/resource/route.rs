use serde::{Deserialize, Serialize};

/// A decoded RouteConfiguration (RDS) resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfiguration {
    pub name: String,
    pub virtual_hosts: Vec<VirtualHost>,
}

/// A virtual host: domain patterns plus routes.
///
/// Domain patterns support exact names (`api.example.com`), suffix
/// wildcards (`*.example.com`), prefix wildcards (`api.*`), and the
/// universe pattern (`*`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualHost {
    pub name: String,
    pub domains: Vec<String>,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub action: RouteAction,
}

/// Routing action. Only the cluster reference matters for dependency
/// tracking; per-request matching is the data plane's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteAction {
    /// Route to a single named cluster.
    Cluster { name: String },
    /// Split traffic across several clusters by weight.
    WeightedClusters { clusters: Vec<WeightedClusterRef> },
    /// Cluster chosen per request from a header value. Dynamic selection,
    /// so it contributes no static cluster dependency.
    ClusterHeader { header_name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedClusterRef {
    pub name: String,
    pub weight: u32,
}
