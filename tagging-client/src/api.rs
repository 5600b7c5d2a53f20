use async_trait::async_trait;

use crate::Result;
use crate::Tag;
use crate::TagDescription;

/// The remote tagging service, reduced to its three operations.
///
/// Implementations own the wire protocol, authentication, timeouts, and any
/// retry policy; callers see each failure exactly once, as a
/// [`BackendError`](crate::BackendError). The trait is object-safe and
/// consumed as `Arc<dyn TagBackend>`.
#[async_trait]
pub trait TagBackend: Send + Sync {
    /// Describe the tags attached to each named load balancer.
    ///
    /// A load balancer unknown to the service is omitted from the response
    /// rather than reported as an error.
    async fn describe_tags(&self, load_balancer_names: &[String]) -> Result<Vec<TagDescription>>;

    /// Attach the given tags to every named load balancer, overwriting the
    /// values of keys that already exist.
    async fn add_tags(&self, load_balancer_names: &[String], tags: &[Tag]) -> Result<()>;

    /// Remove the tags with the given keys from every named load balancer.
    /// Keys with no matching tag are ignored.
    async fn remove_tags(&self, load_balancer_names: &[String], tag_keys: &[String]) -> Result<()>;
}
