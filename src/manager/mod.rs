//! The public face of the crate: [`XdsDependencyManager`] owns the
//! reconciler task and exposes the downstream control inputs.

pub(crate) mod events;
mod reconciler;
pub mod snapshot;

pub use snapshot::{ClusterChildren, ClusterConfig, XdsConfig, XdsConfigWatcher};

use crate::client::{DnsResolverFactory, XdsTransport};
use crate::config::ManagerOptions;
use arc_swap::ArcSwapOption;
use events::XdsEvent;
use reconciler::Reconciler;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::info;

/// Reconciles the xDS resource tree (LDS → RDS → CDS → EDS/DNS) into
/// complete configuration snapshots for a single downstream watcher.
///
/// All upstream callbacks and downstream inputs are serialized onto one
/// consumer task, so the state machine runs without locks. Construction
/// must happen inside a Tokio runtime; the consumer task is spawned
/// immediately and the listener watch starts before `new` returns.
///
/// Dropping the manager (or calling [`shutdown`](Self::shutdown)) cancels
/// every watch and resolver and stops snapshot emission.
pub struct XdsDependencyManager {
    tx: UnboundedSender<XdsEvent>,
    shared: Arc<ArcSwapOption<XdsConfig>>,
}

impl XdsDependencyManager {
    pub fn new(
        transport: Arc<dyn XdsTransport>,
        resolver_factory: Arc<dyn DnsResolverFactory>,
        options: ManagerOptions,
        watcher: Box<dyn XdsConfigWatcher>,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let shared: Arc<ArcSwapOption<XdsConfig>> = Arc::new(ArcSwapOption::empty());

        info!(
            "manager: starting, listener={}, authority={}",
            options.listener_resource_name, options.data_plane_authority
        );
        let mut reconciler = Reconciler::new(
            transport,
            resolver_factory,
            options,
            watcher,
            tx.clone(),
            shared.clone(),
        );
        reconciler.start();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if !reconciler.handle_event(event) {
                    break;
                }
            }
        });

        Self { tx, shared }
    }

    /// Pin a cluster into the dependency tree regardless of whether any
    /// route references it. The cluster appears in subsequent snapshots
    /// until the returned handle is released.
    pub fn subscribe_cluster(&self, cluster: impl Into<String>) -> ClusterSubscription {
        let cluster = cluster.into();
        let _ = self.tx.send(XdsEvent::SubscribeCluster {
            cluster: cluster.clone(),
        });
        ClusterSubscription {
            tx: self.tx.clone(),
            cluster,
        }
    }

    /// Ask every live LOGICAL_DNS resolver to re-resolve now. EDS watches
    /// are push-based and unaffected.
    pub fn refresh_resolution(&self) {
        let _ = self.tx.send(XdsEvent::RefreshResolution);
    }

    /// The most recent snapshot, if one has been emitted. Lock-free.
    pub fn latest_config(&self) -> Option<Arc<XdsConfig>> {
        self.shared.load_full()
    }

    /// Cancel all watches and resolvers and stop emitting snapshots.
    /// Idempotent; dropping the manager has the same effect.
    pub fn shutdown(&self) {
        let _ = self.tx.send(XdsEvent::Shutdown);
    }
}

impl Drop for XdsDependencyManager {
    fn drop(&mut self) {
        let _ = self.tx.send(XdsEvent::Shutdown);
    }
}

/// One pinned cluster subscription. Releasing is one-shot: dropping the
/// handle (or calling [`release`](Self::release)) decrements the refcount,
/// and the cluster is pruned once no route and no other subscription keeps
/// it alive.
pub struct ClusterSubscription {
    tx: UnboundedSender<XdsEvent>,
    cluster: String,
}

impl ClusterSubscription {
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// Release the pin. Equivalent to dropping the handle.
    pub fn release(self) {}
}

impl Drop for ClusterSubscription {
    fn drop(&mut self) {
        let cluster = std::mem::take(&mut self.cluster);
        let _ = self.tx.send(XdsEvent::ReleaseCluster { cluster });
    }
}
