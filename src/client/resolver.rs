use crate::error::Status;
use crate::resource::EndpointAddress;
use std::sync::Arc;

/// Callbacks from a logical-DNS resolver.
pub trait ResolutionListener: Send + Sync {
    /// A successful resolution, replacing any previous result.
    fn on_resolved(&self, addresses: Vec<EndpointAddress>);
    /// A failed resolution attempt. The resolver keeps retrying on its own
    /// schedule; this is informational.
    fn on_resolution_error(&self, status: Status);
}

/// Factory for per-hostname DNS resolvers, used by LOGICAL_DNS clusters.
pub trait DnsResolverFactory: Send + Sync + 'static {
    fn create_resolver(
        &self,
        hostname: &str,
        listener: Arc<dyn ResolutionListener>,
    ) -> Box<dyn DnsResolver>;
}

/// Handle to a live resolver. Dropping the handle stops resolution and
/// releases the underlying resources.
pub trait DnsResolver: Send {
    /// Ask the resolver to re-resolve now rather than waiting for its own
    /// refresh schedule.
    fn refresh(&self);
}
