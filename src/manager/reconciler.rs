//! The graph-reconciliation state machine.
//!
//! All state lives here and is mutated only from [`Reconciler::handle_event`],
//! which the manager task calls serially. Watches started against the
//! transport complete later as new events on the same channel, so no
//! callback ever observes a half-applied transition.

use crate::client::{DnsResolverFactory, XdsTransport};
use crate::config::ManagerOptions;
use crate::endpoints::EndpointNormalizer;
use crate::error::Status;
use crate::graph::{ClusterForest, ClusterNode, ClusterState, WatchId};
use crate::manager::events::{forward_watch, DnsEventForwarder, WatchEvent, XdsEvent};
use crate::manager::snapshot::{ClusterChildren, ClusterConfig, XdsConfig, XdsConfigWatcher};
use crate::metrics::{
    CLUSTERS_PRUNED, CLUSTERS_TRACKED, SNAPSHOTS_EMITTED, TRANSIENT_ERRORS_ABSORBED,
    WATCHES_STARTED,
};
use crate::resource::{
    CdsUpdate, ClusterDiscovery, ClusterLoadAssignment, EndpointAddress, Listener, RouteAction,
    RouteConfiguration, RouteSource, VirtualHost,
};
use crate::routing::find_virtual_host;
use arc_swap::ArcSwapOption;
use metrics::{counter, gauge};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// The active RDS watch, if the current listener selects routes by name.
struct RdsWatch {
    name: String,
    watch_id: WatchId,
    token: crate::client::WatchToken,
}

pub(crate) struct Reconciler {
    transport: Arc<dyn XdsTransport>,
    resolver_factory: Arc<dyn DnsResolverFactory>,
    watcher: Box<dyn XdsConfigWatcher>,
    tx: UnboundedSender<XdsEvent>,
    listener_resource: String,
    authority: String,
    normalizer: EndpointNormalizer,

    listener_watch: Option<crate::client::WatchToken>,
    latest_listener: Option<Listener>,
    rds: Option<RdsWatch>,
    latest_route_config: Option<RouteConfiguration>,
    /// Clusters referenced by the current virtual host's routes, in first
    /// appearance order.
    cluster_roots: Vec<String>,
    forest: ClusterForest,
    /// Externally pinned clusters with reference counts. Pinned names join
    /// the root set for pruning and for the readiness traversal.
    subscriptions: HashMap<String, u32>,

    /// Last emitted snapshot, shared with the manager handle.
    shared: Arc<ArcSwapOption<XdsConfig>>,
    next_watch_id: WatchId,
    destroyed: bool,
}

impl Reconciler {
    pub(crate) fn new(
        transport: Arc<dyn XdsTransport>,
        resolver_factory: Arc<dyn DnsResolverFactory>,
        options: ManagerOptions,
        watcher: Box<dyn XdsConfigWatcher>,
        tx: UnboundedSender<XdsEvent>,
        shared: Arc<ArcSwapOption<XdsConfig>>,
    ) -> Self {
        Self {
            transport,
            resolver_factory,
            watcher,
            tx,
            listener_resource: options.listener_resource_name,
            authority: options.data_plane_authority,
            normalizer: EndpointNormalizer::new(options.dual_stack_endpoints),
            listener_watch: None,
            latest_listener: None,
            rds: None,
            latest_route_config: None,
            cluster_roots: Vec::new(),
            forest: ClusterForest::new(),
            subscriptions: HashMap::new(),
            shared,
            next_watch_id: 0,
            destroyed: false,
        }
    }

    /// Start the root of the dependency tree: the listener watch.
    pub(crate) fn start(&mut self) {
        let watcher = forward_watch(self.tx.clone(), XdsEvent::Listener);
        let token = self.transport.watch_listener(&self.listener_resource, watcher);
        counter!(WATCHES_STARTED).increment(1);
        info!("lds: watch started, resource={}", self.listener_resource);
        self.listener_watch = Some(token);
    }

    /// Apply one event. Returns `false` once the reconciler has shut down
    /// and the consumer loop should exit.
    pub(crate) fn handle_event(&mut self, event: XdsEvent) -> bool {
        if self.destroyed {
            return false;
        }
        match event {
            XdsEvent::Listener(event) => self.handle_listener_event(event),
            XdsEvent::RouteConfig { watch_id, event } => {
                self.handle_route_config_event(watch_id, event)
            }
            XdsEvent::Cluster {
                cluster,
                watch_id,
                event,
            } => self.handle_cluster_event(&cluster, watch_id, event),
            XdsEvent::Endpoints {
                cluster,
                watch_id,
                event,
            } => self.handle_endpoints_event(&cluster, watch_id, event),
            XdsEvent::DnsResult {
                cluster,
                resolver_id,
                result,
            } => self.handle_dns_result(&cluster, resolver_id, result),
            XdsEvent::SubscribeCluster { cluster } => self.handle_subscribe(cluster),
            XdsEvent::ReleaseCluster { cluster } => self.handle_release(&cluster),
            XdsEvent::RefreshResolution => self.handle_refresh_resolution(),
            XdsEvent::Shutdown => {
                self.destroy();
                return false;
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // LDS
    // -----------------------------------------------------------------------

    fn handle_listener_event(&mut self, event: WatchEvent<Listener>) {
        match event {
            WatchEvent::Changed(listener) => self.handle_listener_update(listener),
            WatchEvent::Error(status) => {
                if self.latest_listener.is_none() {
                    warn!(
                        "lds: error with no working listener, resource={}, status={}",
                        self.listener_resource, status
                    );
                    self.watcher
                        .on_error(&format!("Listener {}", self.listener_resource), status);
                } else {
                    counter!(TRANSIENT_ERRORS_ABSORBED).increment(1);
                    warn!(
                        "lds: transient error ignored, resource={}, status={}",
                        self.listener_resource, status
                    );
                }
            }
            WatchEvent::DoesNotExist => {
                info!(
                    "lds: resource does not exist, resource={}",
                    self.listener_resource
                );
                if let Some(old) = self.rds.take() {
                    drop(old.token);
                }
                self.latest_listener = None;
                self.latest_route_config = None;
                self.cluster_roots.clear();
                self.prune();
                self.watcher
                    .on_resource_does_not_exist(&format!("Listener {}", self.listener_resource));
            }
        }
    }

    fn handle_listener_update(&mut self, listener: Listener) {
        debug!("lds: listener updated, name={}", listener.name);
        let route_source = listener.route_source.clone();
        self.latest_listener = Some(listener);

        match route_source {
            RouteSource::Rds { route_config_name } => {
                if self
                    .rds
                    .as_ref()
                    .is_some_and(|watch| watch.name == route_config_name)
                {
                    // Same RDS resource: no watch churn, but the listener
                    // itself changed, so re-attempt emission.
                    self.maybe_emit();
                    return;
                }
                if let Some(old) = self.rds.take() {
                    info!(
                        "rds: watch replaced, old={}, new={}",
                        old.name, route_config_name
                    );
                    // Tear down before starting the replacement watch.
                    drop(old.token);
                }
                // Routes from the previous source (an earlier RDS resource
                // or an inline config) are stale either way.
                self.latest_route_config = None;
                self.cluster_roots.clear();
                self.prune();
                let watch_id = self.next_id();
                let watcher = forward_watch(self.tx.clone(), move |event| XdsEvent::RouteConfig {
                    watch_id,
                    event,
                });
                let token = self.transport.watch_route_config(&route_config_name, watcher);
                counter!(WATCHES_STARTED).increment(1);
                info!("rds: watch started, resource={}", route_config_name);
                self.rds = Some(RdsWatch {
                    name: route_config_name,
                    watch_id,
                    token,
                });
                // No emission until the new route configuration arrives.
            }
            RouteSource::Inline { route_config } => {
                if let Some(old) = self.rds.take() {
                    info!("rds: watch cancelled, listener inlines routes, old={}", old.name);
                    drop(old.token);
                }
                self.apply_route_config(route_config);
            }
        }
    }

    // -----------------------------------------------------------------------
    // RDS
    // -----------------------------------------------------------------------

    fn handle_route_config_event(
        &mut self,
        watch_id: WatchId,
        event: WatchEvent<RouteConfiguration>,
    ) {
        let Some(rds) = self.rds.as_ref() else {
            return;
        };
        if rds.watch_id != watch_id {
            debug!("rds: stale event dropped, resource={}", rds.name);
            return;
        }
        let name = rds.name.clone();
        match event {
            WatchEvent::Changed(route_config) => self.apply_route_config(route_config),
            WatchEvent::Error(status) => {
                if self.latest_route_config.is_none() {
                    warn!(
                        "rds: error with no working route config, resource={}, status={}",
                        name, status
                    );
                    self.watcher
                        .on_error(&format!("RouteConfiguration {name}"), status);
                } else {
                    counter!(TRANSIENT_ERRORS_ABSORBED).increment(1);
                    warn!(
                        "rds: transient error ignored, resource={}, status={}",
                        name, status
                    );
                }
            }
            WatchEvent::DoesNotExist => {
                info!("rds: resource does not exist, resource={}", name);
                self.latest_route_config = None;
                self.cluster_roots.clear();
                self.prune();
                self.watcher
                    .on_resource_does_not_exist(&format!("RouteConfiguration {name}"));
            }
        }
    }

    /// Apply a route configuration, whether it arrived via RDS or inlined
    /// in the listener.
    fn apply_route_config(&mut self, route_config: RouteConfiguration) {
        let name = route_config.name.clone();
        let roots = find_virtual_host(&route_config.virtual_hosts, &self.authority)
            .map(route_cluster_names);
        self.latest_route_config = Some(route_config);

        let Some(roots) = roots else {
            warn!(
                "rds: no virtual host matches authority, route_config={}, authority={}",
                name, self.authority
            );
            self.cluster_roots.clear();
            self.prune();
            self.watcher.on_error(
                &format!("RouteConfiguration {name}"),
                Status::unavailable(format!("No matching route found for {}", self.authority)),
            );
            return;
        };

        debug!(
            "rds: route clusters resolved, route_config={}, clusters={:?}",
            name, roots
        );
        self.cluster_roots = roots;
        self.prune();
        for cluster in self.cluster_roots.clone() {
            self.ensure_cluster(&cluster);
        }
        self.maybe_emit();
    }

    // -----------------------------------------------------------------------
    // CDS
    // -----------------------------------------------------------------------

    /// Create a cluster node and its CDS watch unless one already exists.
    fn ensure_cluster(&mut self, cluster: &str) {
        if self.forest.contains(cluster) {
            return;
        }
        let watch_id = self.next_id();
        let name = cluster.to_string();
        let watcher = forward_watch(self.tx.clone(), move |event| XdsEvent::Cluster {
            cluster: name.clone(),
            watch_id,
            event,
        });
        let token = self.transport.watch_cluster(cluster, watcher);
        counter!(WATCHES_STARTED).increment(1);
        debug!("cds: watch started, cluster={}", cluster);
        self.forest
            .insert(cluster.to_string(), ClusterNode::new(token, watch_id));
        gauge!(CLUSTERS_TRACKED).set(self.forest.len() as f64);
    }

    fn handle_cluster_event(
        &mut self,
        cluster: &str,
        watch_id: WatchId,
        event: WatchEvent<CdsUpdate>,
    ) {
        let Some(node) = self.forest.get(cluster) else {
            return;
        };
        if node.cds_watch_id() != watch_id {
            debug!("cds: stale event dropped, cluster={}", cluster);
            return;
        }
        match event {
            WatchEvent::Changed(update) => self.apply_cluster_update(cluster, update),
            WatchEvent::Error(status) => {
                let Some(node) = self.forest.get_mut(cluster) else {
                    return;
                };
                if node.is_ok() {
                    counter!(TRANSIENT_ERRORS_ABSORBED).increment(1);
                    warn!(
                        "cds: transient error ignored, cluster={}, status={}",
                        cluster, status
                    );
                } else {
                    warn!("cds: error, cluster={}, status={}", cluster, status);
                    node.set_err(status);
                    self.maybe_emit();
                }
            }
            WatchEvent::DoesNotExist => {
                info!("cds: cluster resource does not exist, cluster={}", cluster);
                let Some(node) = self.forest.get_mut(cluster) else {
                    return;
                };
                // Dropping the old state tears down any EDS watch or
                // resolver; clearing children orphans a former subtree.
                node.set_err(Status::unavailable(format!(
                    "Cluster resource {cluster} does not exist"
                )));
                node.set_children(Vec::new());
                self.prune();
                self.maybe_emit();
            }
        }
    }

    fn apply_cluster_update(&mut self, cluster: &str, update: CdsUpdate) {
        match update.discovery.clone() {
            ClusterDiscovery::Aggregate { children } => {
                self.apply_aggregate(cluster, update, children)
            }
            ClusterDiscovery::Eds { eds_service_name } => {
                self.apply_eds(cluster, update, eds_service_name)
            }
            ClusterDiscovery::LogicalDns { dns_hostname } => {
                self.apply_logical_dns(cluster, update, dns_hostname)
            }
        }
    }

    fn apply_aggregate(&mut self, cluster: &str, update: CdsUpdate, children: Vec<String>) {
        {
            let Some(node) = self.forest.get_mut(cluster) else {
                return;
            };
            // Any previous EDS watch or DNS resolver dies here.
            drop(node.take_latest());
            node.set_children(children.clone());
            node.set_ok(ClusterState::Aggregate { update });
        }
        debug!(
            "cds: aggregate updated, cluster={}, children={:?}",
            cluster, children
        );
        for child in &children {
            self.ensure_cluster(child);
        }
        // Children dropped from the list lose their only parent edge and
        // get pruned along with their subtrees.
        self.prune();
        self.maybe_emit();
    }

    fn apply_eds(&mut self, cluster: &str, update: CdsUpdate, eds_service_name: Option<String>) {
        let service_name = eds_service_name.unwrap_or_else(|| cluster.to_string());

        // EDS -> EDS with an unchanged service name keeps the watch and any
        // endpoints already received; only the CDS payload is replaced.
        {
            let Some(node) = self.forest.get_mut(cluster) else {
                return;
            };
            if let Some(Ok(ClusterState::Eds {
                service_name: current,
                update: stored,
                ..
            })) = node.latest_mut()
            {
                if *current == service_name {
                    *stored = update;
                    debug!(
                        "cds: eds update replaced in place, cluster={}, service={}",
                        cluster, service_name
                    );
                    self.maybe_emit();
                    return;
                }
            }
        }

        self.teardown_for_type_switch(cluster);

        let watch_id = self.next_id();
        let name = cluster.to_string();
        let watcher = forward_watch(self.tx.clone(), move |event| XdsEvent::Endpoints {
            cluster: name.clone(),
            watch_id,
            event,
        });
        let token = self.transport.watch_endpoints(&service_name, watcher);
        counter!(WATCHES_STARTED).increment(1);
        debug!(
            "eds: watch started, cluster={}, service={}",
            cluster, service_name
        );
        let Some(node) = self.forest.get_mut(cluster) else {
            return;
        };
        node.set_ok(ClusterState::Eds {
            update,
            service_name,
            _watch: token,
            watch_id,
            endpoints: None,
            resolution_note: None,
        });
        self.maybe_emit();
    }

    fn apply_logical_dns(&mut self, cluster: &str, update: CdsUpdate, dns_hostname: String) {
        // LOGICAL_DNS -> LOGICAL_DNS with the same hostname keeps the
        // resolver and any resolved endpoints.
        {
            let Some(node) = self.forest.get_mut(cluster) else {
                return;
            };
            if let Some(Ok(ClusterState::LogicalDns {
                hostname, update: stored, ..
            })) = node.latest_mut()
            {
                if *hostname == dns_hostname {
                    *stored = update;
                    debug!(
                        "cds: dns update replaced in place, cluster={}, hostname={}",
                        cluster, dns_hostname
                    );
                    self.maybe_emit();
                    return;
                }
            }
        }

        self.teardown_for_type_switch(cluster);

        let resolver_id = self.next_id();
        let listener = Arc::new(DnsEventForwarder {
            tx: self.tx.clone(),
            cluster: cluster.to_string(),
            resolver_id,
        });
        let resolver = self.resolver_factory.create_resolver(&dns_hostname, listener);
        info!(
            "dns: resolver created, cluster={}, hostname={}",
            cluster, dns_hostname
        );
        resolver.refresh();
        let Some(node) = self.forest.get_mut(cluster) else {
            return;
        };
        node.set_ok(ClusterState::LogicalDns {
            update,
            hostname: dns_hostname,
            resolver,
            resolver_id,
            endpoints: None,
            resolution_note: None,
        });
        self.maybe_emit();
    }

    /// Shared teardown when a cluster's discovery type (or sub-resource
    /// identity) changes: drop the old state, which cancels its EDS watch
    /// or destroys its resolver, and prune a former aggregate's subtree.
    fn teardown_for_type_switch(&mut self, cluster: &str) {
        let had_children = {
            let Some(node) = self.forest.get_mut(cluster) else {
                return;
            };
            drop(node.take_latest());
            let had = !node.children().is_empty();
            node.set_children(Vec::new());
            had
        };
        if had_children {
            self.prune();
        }
    }

    // -----------------------------------------------------------------------
    // EDS / DNS sub-callbacks
    // -----------------------------------------------------------------------

    fn handle_endpoints_event(
        &mut self,
        cluster: &str,
        watch_id: WatchId,
        event: WatchEvent<ClusterLoadAssignment>,
    ) {
        let Some(node) = self.forest.get_mut(cluster) else {
            return;
        };
        // Only meaningful while the node is still in EDS mode under the
        // same watch generation; anything else is a leftover of a
        // superseded watch.
        let Some(Ok(ClusterState::Eds {
            watch_id: current,
            endpoints,
            resolution_note,
            ..
        })) = node.latest_mut()
        else {
            return;
        };
        if *current != watch_id {
            debug!("eds: stale event dropped, cluster={}", cluster);
            return;
        }
        match event {
            WatchEvent::Changed(assignment) => {
                let normalized = self.normalizer.from_load_assignment(&assignment);
                debug!(
                    "eds: endpoints updated, cluster={}, priorities={}, drops={}",
                    cluster,
                    normalized.priorities.len(),
                    normalized.drop_categories.len()
                );
                *endpoints = Some(normalized);
                *resolution_note = None;
                self.maybe_emit();
            }
            WatchEvent::Error(status) => {
                if endpoints.is_none() {
                    *resolution_note =
                        Some(format!("Control plane error: {}", status.message()));
                    self.maybe_emit();
                } else {
                    counter!(TRANSIENT_ERRORS_ABSORBED).increment(1);
                    warn!(
                        "eds: transient error ignored, cluster={}, status={}",
                        cluster, status
                    );
                }
            }
            WatchEvent::DoesNotExist => {
                info!("eds: resource does not exist, cluster={}", cluster);
                *endpoints = None;
                *resolution_note = Some("Resource does not exist".to_string());
                self.maybe_emit();
            }
        }
    }

    fn handle_dns_result(
        &mut self,
        cluster: &str,
        resolver_id: WatchId,
        result: Result<Vec<EndpointAddress>, Status>,
    ) {
        let Some(node) = self.forest.get_mut(cluster) else {
            return;
        };
        let Some(Ok(ClusterState::LogicalDns {
            resolver_id: current,
            endpoints,
            resolution_note,
            ..
        })) = node.latest_mut()
        else {
            return;
        };
        if *current != resolver_id {
            debug!("dns: stale result dropped, cluster={}", cluster);
            return;
        }
        match result {
            Ok(addresses) => {
                debug!(
                    "dns: resolved, cluster={}, addresses={}",
                    cluster,
                    addresses.len()
                );
                *endpoints = Some(self.normalizer.from_dns_addresses(&addresses));
                *resolution_note = None;
                self.maybe_emit();
            }
            Err(status) => {
                if endpoints.is_none() {
                    *resolution_note =
                        Some(format!("DNS resolution error: {}", status.message()));
                    self.maybe_emit();
                } else {
                    counter!(TRANSIENT_ERRORS_ABSORBED).increment(1);
                    warn!(
                        "dns: transient error ignored, cluster={}, status={}",
                        cluster, status
                    );
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Subscriptions / control inputs
    // -----------------------------------------------------------------------

    fn handle_subscribe(&mut self, cluster: String) {
        let count = self.subscriptions.entry(cluster.clone()).or_insert(0);
        *count += 1;
        debug!("subscribe: cluster pinned, cluster={}, refcount={}", cluster, count);
        self.ensure_cluster(&cluster);
        self.maybe_emit();
    }

    fn handle_release(&mut self, cluster: &str) {
        let Some(count) = self.subscriptions.get_mut(cluster) else {
            return;
        };
        *count -= 1;
        if *count > 0 {
            debug!(
                "subscribe: cluster unpinned, cluster={}, refcount={}",
                cluster, count
            );
            return;
        }
        self.subscriptions.remove(cluster);
        debug!("subscribe: cluster released, cluster={}", cluster);
        self.prune();
        self.maybe_emit();
    }

    /// Forward a resolution-refresh request to every live DNS resolver.
    /// EDS watches are push-based and unaffected.
    fn handle_refresh_resolution(&mut self) {
        for (name, node) in self.forest.iter() {
            if let Some(Ok(ClusterState::LogicalDns { resolver, .. })) = node.latest() {
                debug!("dns: refresh requested, cluster={}", name);
                resolver.refresh();
            }
        }
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        info!("manager: shutting down, listener={}", self.listener_resource);
        self.listener_watch.take();
        if let Some(old) = self.rds.take() {
            drop(old.token);
        }
        self.subscriptions.clear();
        self.cluster_roots.clear();
        self.forest.clear();
        self.latest_listener = None;
        self.latest_route_config = None;
        self.shared.store(None);
        gauge!(CLUSTERS_TRACKED).set(0.0);
    }

    // -----------------------------------------------------------------------
    // Pruning and emission
    // -----------------------------------------------------------------------

    fn next_id(&mut self) -> WatchId {
        self.next_watch_id += 1;
        self.next_watch_id
    }

    /// Remove forest nodes unreachable from the route roots and pinned
    /// subscriptions. Dropping a node cancels its watches.
    fn prune(&mut self) {
        let roots = self
            .cluster_roots
            .iter()
            .map(String::as_str)
            .chain(self.subscriptions.keys().map(String::as_str));
        let removed = self.forest.prune(roots);
        if !removed.is_empty() {
            counter!(CLUSTERS_PRUNED).increment(removed.len() as u64);
            debug!("prune: removed unreachable clusters, clusters={:?}", removed);
            gauge!(CLUSTERS_TRACKED).set(self.forest.len() as f64);
        }
    }

    /// Whether every cluster reachable from the roots and subscriptions has
    /// settled: a CDS outcome, and for EDS/DNS leaves an endpoint payload
    /// or a resolution note.
    fn tree_fully_updated(&self) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = self
            .cluster_roots
            .iter()
            .map(String::as_str)
            .chain(self.subscriptions.keys().map(String::as_str))
            .collect();
        while let Some(name) = stack.pop() {
            if !visited.insert(name) {
                continue;
            }
            let Some(node) = self.forest.get(name) else {
                // Referenced but not yet added; not settled.
                return false;
            };
            if !node.is_ready() {
                return false;
            }
            for child in node.children() {
                stack.push(child);
            }
        }
        true
    }

    /// Emit a snapshot if the whole tree has settled. Called at the end of
    /// every state transition; emission with unchanged state produces an
    /// equal-by-value snapshot.
    fn maybe_emit(&mut self) {
        if self.destroyed {
            return;
        }
        let Some(listener) = self.latest_listener.as_ref() else {
            return;
        };
        let Some(route_config) = self.latest_route_config.as_ref() else {
            return;
        };
        let Some(virtual_host) = find_virtual_host(&route_config.virtual_hosts, &self.authority)
        else {
            return;
        };
        if !self.tree_fully_updated() {
            debug!("snapshot: tree not settled, emission deferred");
            return;
        }

        let mut clusters: BTreeMap<String, Result<ClusterConfig, Status>> = BTreeMap::new();
        for (name, node) in self.forest.iter() {
            let entry = match node.latest() {
                None => continue,
                Some(Err(status)) => Err(status.clone()),
                Some(Ok(state)) => Ok(ClusterConfig {
                    cluster: state.update().clone(),
                    children: match state {
                        ClusterState::Aggregate { .. } => ClusterChildren::Aggregate {
                            leaf_clusters: node.children().to_vec(),
                        },
                        ClusterState::Eds {
                            endpoints,
                            resolution_note,
                            ..
                        }
                        | ClusterState::LogicalDns {
                            endpoints,
                            resolution_note,
                            ..
                        } => ClusterChildren::Endpoints {
                            endpoints: endpoints.clone(),
                            resolution_note: resolution_note.clone(),
                        },
                    },
                }),
            };
            clusters.insert(name.clone(), entry);
        }

        let config = XdsConfig {
            listener: listener.clone(),
            route_config: route_config.clone(),
            virtual_host: virtual_host.clone(),
            clusters,
        };
        counter!(SNAPSHOTS_EMITTED).increment(1);
        debug!(
            "snapshot: emitting configuration, clusters={}",
            config.clusters.len()
        );
        self.shared.store(Some(Arc::new(config.clone())));
        self.watcher.on_update(config);
    }
}

/// Static cluster dependencies of a virtual host, deduplicated in first
/// appearance order. `cluster_header` actions select dynamically and
/// contribute nothing.
fn route_cluster_names(vhost: &VirtualHost) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: &str, names: &mut Vec<String>| {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    };
    for route in &vhost.routes {
        match &route.action {
            RouteAction::Cluster { name } => push(name, &mut names),
            RouteAction::WeightedClusters { clusters } => {
                for weighted in clusters {
                    push(&weighted.name, &mut names);
                }
            }
            RouteAction::ClusterHeader { .. } => {}
        }
    }
    names
}
