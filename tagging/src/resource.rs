use std::sync::Arc;

use elb_tagging_client::BackendError;
use elb_tagging_client::TagBackend;

use crate::TagCollection;

/// A resource that carries tags: anything with a stable load balancer name.
///
/// The name is the identifier every tagging call is scoped to. Caller-owned
/// resource types opt in by implementing this trait; nothing else about the
/// resource matters to tagging or filtering.
pub trait TaggedResource {
    /// The stable identifier tagging calls are scoped to.
    fn load_balancer_name(&self) -> &str;
}

/// A handle to one load balancer, pairing its name with a tagging backend.
///
/// The handle is cheap to clone and holds no tag state of its own; reads
/// and writes go through the [`TagCollection`] returned by
/// [`LoadBalancer::tags`].
#[derive(Clone)]
pub struct LoadBalancer {
    name: String,
    backend: Arc<dyn TagBackend>,
}

impl LoadBalancer {
    /// Create a handle for the named load balancer.
    pub fn new(name: impl Into<String>, backend: Arc<dyn TagBackend>) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    /// The load balancer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tags attached to this load balancer.
    pub fn tags(&self) -> TagCollection {
        TagCollection::new(self.name.clone(), Arc::clone(&self.backend))
    }

    /// Attach a single tag, with an empty value when none is given.
    pub async fn add_tag(&self, key: &str, value: Option<&str>) -> Result<(), BackendError> {
        self.tags().set(key, Some(value.unwrap_or(""))).await
    }

    /// Remove every tag from this load balancer.
    pub async fn clear_tags(&self) -> Result<(), BackendError> {
        self.tags().clear().await
    }
}

impl TaggedResource for LoadBalancer {
    fn load_balancer_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for LoadBalancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadBalancer")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
