//! The event layer: every upstream callback (LDS, RDS, per-cluster CDS,
//! EDS, DNS) and every downstream input is turned into an [`XdsEvent`] on
//! one unbounded channel, consumed by a single reconciler task. Serial
//! consumption is what makes the state machine lock-free.

use crate::client::{ResolutionListener, ResourceWatcher};
use crate::error::Status;
use crate::graph::WatchId;
use crate::resource::{CdsUpdate, ClusterLoadAssignment, EndpointAddress, Listener, RouteConfiguration};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Outcome of one watcher callback for a resource of type `R`.
pub(crate) enum WatchEvent<R> {
    Changed(R),
    Error(Status),
    DoesNotExist,
}

/// Everything the reconciler reacts to.
pub(crate) enum XdsEvent {
    Listener(WatchEvent<Listener>),
    RouteConfig {
        watch_id: WatchId,
        event: WatchEvent<RouteConfiguration>,
    },
    Cluster {
        cluster: String,
        watch_id: WatchId,
        event: WatchEvent<CdsUpdate>,
    },
    Endpoints {
        cluster: String,
        watch_id: WatchId,
        event: WatchEvent<ClusterLoadAssignment>,
    },
    DnsResult {
        cluster: String,
        resolver_id: WatchId,
        result: Result<Vec<EndpointAddress>, Status>,
    },
    SubscribeCluster {
        cluster: String,
    },
    ReleaseCluster {
        cluster: String,
    },
    RefreshResolution,
    Shutdown,
}

/// A [`ResourceWatcher`] handed to the transport that forwards callbacks
/// into the event channel. `wrap` tags the event with its origin (resource
/// name, watch generation). Sends to a closed channel are dropped: the
/// manager is shutting down and nothing is listening.
struct WatchEventForwarder<R, F> {
    tx: UnboundedSender<XdsEvent>,
    wrap: F,
    _resource: PhantomData<fn(R)>,
}

impl<R, F> ResourceWatcher<R> for WatchEventForwarder<R, F>
where
    R: Send + 'static,
    F: Fn(WatchEvent<R>) -> XdsEvent + Send + Sync,
{
    fn on_resource_changed(&self, resource: R) {
        let _ = self.tx.send((self.wrap)(WatchEvent::Changed(resource)));
    }

    fn on_error(&self, status: Status) {
        let _ = self.tx.send((self.wrap)(WatchEvent::Error(status)));
    }

    fn on_resource_does_not_exist(&self) {
        let _ = self.tx.send((self.wrap)(WatchEvent::DoesNotExist));
    }
}

pub(crate) fn forward_watch<R, F>(
    tx: UnboundedSender<XdsEvent>,
    wrap: F,
) -> Arc<dyn ResourceWatcher<R>>
where
    R: Send + 'static,
    F: Fn(WatchEvent<R>) -> XdsEvent + Send + Sync + 'static,
{
    Arc::new(WatchEventForwarder {
        tx,
        wrap,
        _resource: PhantomData,
    })
}

/// DNS counterpart of [`WatchEventForwarder`].
pub(crate) struct DnsEventForwarder {
    pub(crate) tx: UnboundedSender<XdsEvent>,
    pub(crate) cluster: String,
    pub(crate) resolver_id: WatchId,
}

impl ResolutionListener for DnsEventForwarder {
    fn on_resolved(&self, addresses: Vec<EndpointAddress>) {
        let _ = self.tx.send(XdsEvent::DnsResult {
            cluster: self.cluster.clone(),
            resolver_id: self.resolver_id,
            result: Ok(addresses),
        });
    }

    fn on_resolution_error(&self, status: Status) {
        let _ = self.tx.send(XdsEvent::DnsResult {
            cluster: self.cluster.clone(),
            resolver_id: self.resolver_id,
            result: Err(status),
        });
    }
}
