//! Decoded xDS resource types.
//!
//! These are the outputs of the (external) resource decoders, reduced to the
//! fields the dependency manager consumes. Wire decoding is out of scope;
//! the types derive serde so hosts can load fixtures or dump state as JSON.

pub mod cluster;
pub mod endpoint;
pub mod listener;
pub mod route;

pub use cluster::{CdsUpdate, ClusterDiscovery};
pub use endpoint::{
    ClusterLoadAssignment, DenominatorType, DropCategory, DropOverload, Endpoint, EndpointAddress,
    EndpointResource, FractionalPercent, HealthStatus, LbEndpoint, Locality, LocalityEntry,
    LocalityLbEndpoints, PriorityEntry, WeightedEndpoint,
};
pub use listener::{Listener, RouteSource};
pub use route::{Route, RouteAction, RouteConfiguration, VirtualHost, WeightedClusterRef};
