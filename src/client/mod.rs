//! Seams to the shared external services: the xDS transport client and the
//! DNS resolver factory. Both are thread-safe opaque handles; the manager
//! interacts with them only through these callback contracts.

pub mod resolver;

pub use resolver::{DnsResolver, DnsResolverFactory, ResolutionListener};

use crate::error::Status;
use crate::resource::{CdsUpdate, ClusterLoadAssignment, Listener, RouteConfiguration};
use std::fmt;
use std::sync::Arc;

/// Callbacks for one watched resource.
///
/// `on_resource_changed` may fire many times with the latest value.
/// `on_error` signals a transient control-plane failure and may be followed
/// by later successes. `on_resource_does_not_exist` is an authoritative
/// negative.
pub trait ResourceWatcher<R>: Send + Sync {
    fn on_resource_changed(&self, resource: R);
    fn on_error(&self, status: Status);
    fn on_resource_does_not_exist(&self);
}

/// Typed watch registration against the xDS transport client.
///
/// Registration is infallible; failures surface later through the watcher
/// callbacks. Each call returns a [`WatchToken`] that cancels the watch
/// when dropped, so watch lifetime is tied to the state that owns it.
pub trait XdsTransport: Send + Sync + 'static {
    fn watch_listener(
        &self,
        resource_name: &str,
        watcher: Arc<dyn ResourceWatcher<Listener>>,
    ) -> WatchToken;

    fn watch_route_config(
        &self,
        resource_name: &str,
        watcher: Arc<dyn ResourceWatcher<RouteConfiguration>>,
    ) -> WatchToken;

    fn watch_cluster(
        &self,
        resource_name: &str,
        watcher: Arc<dyn ResourceWatcher<CdsUpdate>>,
    ) -> WatchToken;

    fn watch_endpoints(
        &self,
        resource_name: &str,
        watcher: Arc<dyn ResourceWatcher<ClusterLoadAssignment>>,
    ) -> WatchToken;
}

/// Cancellation guard for a single watch registration.
///
/// Dropping the token cancels the watch. Already-queued callbacks may still
/// be delivered after cancellation; consumers discard them by generation id.
pub struct WatchToken {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchToken {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A token with no cancellation action.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Cancel explicitly. Equivalent to dropping the token.
    pub fn cancel(self) {}
}

impl Drop for WatchToken {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for WatchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchToken")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}
