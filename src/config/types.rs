use serde::{Deserialize, Serialize};

/// Options for constructing an
/// [`XdsDependencyManager`](crate::manager::XdsDependencyManager).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerOptions {
    /// Name of the Listener (LDS) resource to watch, the entry point of
    /// the dependency tree.
    #[serde(default)]
    pub listener_resource_name: String,

    /// Fully qualified host name presented during virtual-host matching.
    #[serde(default)]
    pub data_plane_authority: String,

    /// Keep additional (dual-stack) addresses on EDS endpoints. Off by
    /// default: only the primary address of each endpoint is retained.
    #[serde(default)]
    pub dual_stack_endpoints: bool,
}

impl ManagerOptions {
    pub fn new(
        listener_resource_name: impl Into<String>,
        data_plane_authority: impl Into<String>,
    ) -> Self {
        Self {
            listener_resource_name: listener_resource_name.into(),
            data_plane_authority: data_plane_authority.into(),
            dual_stack_endpoints: false,
        }
    }

    pub fn with_dual_stack(mut self, enabled: bool) -> Self {
        self.dual_stack_endpoints = enabled;
        self
    }
}
