//! Metric names recorded through the `metrics` facade.
//!
//! The crate only records; installing a recorder/exporter is the host
//! binary's job. Hosts that want HELP/TYPE metadata call [`describe`] once
//! after installing their recorder.

use metrics::{describe_counter, describe_gauge, Unit};

pub const SNAPSHOTS_EMITTED: &str = "xds_snapshots_emitted_total";
pub const CLUSTERS_TRACKED: &str = "xds_clusters_tracked";
pub const WATCHES_STARTED: &str = "xds_watches_started_total";
pub const CLUSTERS_PRUNED: &str = "xds_clusters_pruned_total";
pub const TRANSIENT_ERRORS_ABSORBED: &str = "xds_transient_errors_absorbed_total";

/// Register metric descriptions with the installed recorder.
pub fn describe() {
    describe_counter!(
        SNAPSHOTS_EMITTED,
        Unit::Count,
        "Configuration snapshots delivered to the downstream watcher"
    );
    describe_gauge!(
        CLUSTERS_TRACKED,
        Unit::Count,
        "Cluster nodes currently tracked in the dependency forest"
    );
    describe_counter!(
        WATCHES_STARTED,
        Unit::Count,
        "Resource watches started against the xDS transport"
    );
    describe_counter!(
        CLUSTERS_PRUNED,
        Unit::Count,
        "Cluster nodes removed as unreachable from the root set"
    );
    describe_counter!(
        TRANSIENT_ERRORS_ABSORBED,
        Unit::Count,
        "Transient control-plane errors absorbed without disturbing working state"
    );
}
