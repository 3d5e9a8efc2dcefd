use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw EDS input: a decoded ClusterLoadAssignment as delivered by the
// endpoint watch. Normalization into `EndpointResource` lives in
// `crate::endpoints`.
// ---------------------------------------------------------------------------

/// A decoded ClusterLoadAssignment (EDS) resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterLoadAssignment {
    pub cluster_name: String,
    #[serde(default)]
    pub endpoints: Vec<LocalityLbEndpoints>,
    #[serde(default)]
    pub drop_overloads: Vec<DropOverload>,
}

/// One locality's endpoint group within an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityLbEndpoints {
    #[serde(default)]
    pub locality: Locality,
    /// Missing or zero weight disables the whole group.
    #[serde(default)]
    pub load_balancing_weight: Option<u32>,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub lb_endpoints: Vec<LbEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbEndpoint {
    pub address: EndpointAddress,
    /// Extra addresses for dual-stack hosts; kept only when the dual-stack
    /// option is enabled.
    #[serde(default)]
    pub additional_addresses: Vec<EndpointAddress>,
    #[serde(default)]
    pub health_status: HealthStatus,
    #[serde(default)]
    pub load_balancing_weight: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
    Draining,
    Timeout,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropOverload {
    pub category: String,
    #[serde(default)]
    pub drop_percentage: Option<FractionalPercent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionalPercent {
    pub numerator: u32,
    pub denominator: DenominatorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorType {
    Hundred,
    TenThousand,
    Million,
}

// ---------------------------------------------------------------------------
// Normalized output: the uniform priority/locality/endpoint structure the
// downstream load balancer consumes, produced from EDS or DNS input.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointAddress {
    pub host: String,
    pub port: u16,
}

impl EndpointAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// One logical backend: an ordered list of addresses, primary first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub addresses: Vec<EndpointAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEndpoint {
    pub endpoint: Endpoint,
    pub weight: u32,
}

/// (region, zone, sub_zone) tuple. The empty locality is used for DNS
/// results, which carry no locality information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Locality {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub sub_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityEntry {
    pub locality: Locality,
    pub weight: u32,
    pub endpoints: Vec<WeightedEndpoint>,
}

/// A dense priority slot holding the localities at that priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityEntry {
    pub localities: Vec<LocalityEntry>,
}

/// A named class of requests to drop, quantified per million.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCategory {
    pub category: String,
    pub requests_per_million: u32,
}

/// Normalized endpoint payload for one cluster: dense priorities plus drop
/// categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointResource {
    pub priorities: Vec<PriorityEntry>,
    pub drop_categories: Vec<DropCategory>,
}
