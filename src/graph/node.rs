use crate::client::{DnsResolver, WatchToken};
use crate::error::Status;
use crate::graph::WatchId;
use crate::resource::{CdsUpdate, EndpointResource};

/// Per-cluster record: the CDS watch, the last CDS outcome, and the child
/// list mirroring the last aggregate update (empty for non-aggregates).
///
/// Sub-watches (EDS) and resolvers (DNS) live inside [`ClusterState`], so
/// replacing or dropping the state tears them down. That keeps the
/// invariant of at most one live sub-watch per node without bookkeeping.
pub(crate) struct ClusterNode {
    /// Held for its Drop impl: removing the node cancels the CDS watch.
    _cds_watch: WatchToken,
    cds_watch_id: WatchId,
    latest: Option<Result<ClusterState, Status>>,
    children: Vec<String>,
}

/// Discovery-mode-specific payload of a cluster that has a successful CDS
/// update. Exhaustive by construction: a node is in exactly one mode.
pub(crate) enum ClusterState {
    Aggregate {
        update: CdsUpdate,
    },
    Eds {
        update: CdsUpdate,
        /// The EDS resource actually watched: `eds_service_name` from the
        /// update, or the cluster name when unset.
        service_name: String,
        /// Held for its Drop impl: replacing the state cancels the watch.
        _watch: WatchToken,
        watch_id: WatchId,
        endpoints: Option<EndpointResource>,
        resolution_note: Option<String>,
    },
    LogicalDns {
        update: CdsUpdate,
        hostname: String,
        resolver: Box<dyn DnsResolver>,
        resolver_id: WatchId,
        endpoints: Option<EndpointResource>,
        resolution_note: Option<String>,
    },
}

impl ClusterState {
    pub(crate) fn update(&self) -> &CdsUpdate {
        match self {
            ClusterState::Aggregate { update }
            | ClusterState::Eds { update, .. }
            | ClusterState::LogicalDns { update, .. } => update,
        }
    }

    /// Whether the sub-resource has produced any outcome. Aggregates have
    /// no sub-resource and are always settled.
    fn has_outcome(&self) -> bool {
        match self {
            ClusterState::Aggregate { .. } => true,
            ClusterState::Eds {
                endpoints,
                resolution_note,
                ..
            }
            | ClusterState::LogicalDns {
                endpoints,
                resolution_note,
                ..
            } => endpoints.is_some() || resolution_note.is_some(),
        }
    }
}

impl ClusterNode {
    pub(crate) fn new(cds_watch: WatchToken, cds_watch_id: WatchId) -> Self {
        Self {
            _cds_watch: cds_watch,
            cds_watch_id,
            latest: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn cds_watch_id(&self) -> WatchId {
        self.cds_watch_id
    }

    pub(crate) fn children(&self) -> &[String] {
        &self.children
    }

    pub(crate) fn set_children(&mut self, children: Vec<String>) {
        self.children = children;
    }

    pub(crate) fn latest(&self) -> Option<&Result<ClusterState, Status>> {
        self.latest.as_ref()
    }

    pub(crate) fn latest_mut(&mut self) -> Option<&mut Result<ClusterState, Status>> {
        self.latest.as_mut()
    }

    /// Take the current state out of the node. Dropping the returned value
    /// cancels any EDS watch or DNS resolver it holds.
    pub(crate) fn take_latest(&mut self) -> Option<Result<ClusterState, Status>> {
        self.latest.take()
    }

    pub(crate) fn set_ok(&mut self, state: ClusterState) {
        self.latest = Some(Ok(state));
    }

    pub(crate) fn set_err(&mut self, status: Status) {
        self.latest = Some(Err(status));
    }

    pub(crate) fn is_ok(&self) -> bool {
        matches!(self.latest, Some(Ok(_)))
    }

    /// Whether this node no longer blocks snapshot emission: an error is
    /// settled, an aggregate is settled, and an EDS/DNS cluster is settled
    /// once its sub-resource produced endpoints or a resolution note.
    pub(crate) fn is_ready(&self) -> bool {
        match &self.latest {
            None => false,
            Some(Err(_)) => true,
            Some(Ok(state)) => state.has_outcome(),
        }
    }
}
