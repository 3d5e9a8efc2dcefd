//! xDS dependency manager.
//!
//! Reconciles the tree of control-plane resources an xDS client depends on
//! (Listener (LDS) → RouteConfiguration (RDS) → Clusters (CDS) → Endpoint
//! assignments (EDS) or DNS resolution) into a single coherent
//! [`XdsConfig`] snapshot, emitted to one downstream watcher exactly when
//! the whole tree has settled.
//!
//! The manager subscribes and unsubscribes as upstream updates arrive,
//! switches a cluster's discovery mode in place, prunes clusters no longer
//! reachable from the current route set or pinned subscriptions,
//! distinguishes transient control-plane errors from authoritative
//! negatives, and reports per-cluster failures inside the snapshot rather
//! than as top-level errors.
//!
//! The xDS transport and the DNS resolver factory are external
//! collaborators, abstracted behind [`client::XdsTransport`] and
//! [`client::DnsResolverFactory`].

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod resource;
pub mod routing;

mod graph;

pub use client::{
    DnsResolver, DnsResolverFactory, ResolutionListener, ResourceWatcher, WatchToken,
    XdsTransport,
};
pub use config::ManagerOptions;
pub use endpoints::EndpointNormalizer;
pub use error::{Code, Status};
pub use manager::{
    ClusterChildren, ClusterConfig, ClusterSubscription, XdsConfig, XdsConfigWatcher,
    XdsDependencyManager,
};
pub use resource::*;
pub use routing::find_virtual_host;
