use serde::{Deserialize, Serialize};

/// A decoded Cluster (CDS) resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdsUpdate {
    pub name: String,
    pub discovery: ClusterDiscovery,
}

/// Discovery mode of a cluster, with the per-mode fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClusterDiscovery {
    /// Members are other clusters, forming a DAG.
    Aggregate { children: Vec<String> },
    /// Endpoints come from an EDS watch. When `eds_service_name` is unset
    /// the cluster name doubles as the EDS resource name.
    Eds { eds_service_name: Option<String> },
    /// Endpoints come from resolving a DNS hostname.
    LogicalDns { dns_hostname: String },
}

impl CdsUpdate {
    pub fn aggregate(name: impl Into<String>, children: Vec<String>) -> Self {
        Self {
            name: name.into(),
            discovery: ClusterDiscovery::Aggregate { children },
        }
    }

    pub fn eds(name: impl Into<String>, eds_service_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            discovery: ClusterDiscovery::Eds { eds_service_name },
        }
    }

    pub fn logical_dns(name: impl Into<String>, dns_hostname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            discovery: ClusterDiscovery::LogicalDns {
                dns_hostname: dns_hostname.into(),
            },
        }
    }
}
