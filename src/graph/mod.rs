//! The cluster dependency forest: per-cluster node state plus the name→node
//! map with reachability-based pruning.

pub(crate) mod forest;
pub(crate) mod node;

pub(crate) use forest::ClusterForest;
pub(crate) use node::{ClusterNode, ClusterState};

/// Generation id for a watch or resolver. Events from a superseded watch
/// carry a stale id and are discarded by the reconciler.
pub(crate) type WatchId = u64;
