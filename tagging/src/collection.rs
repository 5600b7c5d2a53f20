use std::collections::BTreeMap;
use std::slice;
use std::sync::Arc;

use elb_tagging_client::BackendError;
use elb_tagging_client::Tag;
use elb_tagging_client::TagBackend;
use tracing::debug;
use tracing::trace;

/// The tags attached to a single load balancer, as a key/value mapping.
///
/// A `TagCollection` is a transient view: it holds only the load balancer
/// name and a backend handle, and every operation is a fresh remote call.
/// Nothing is cached between calls, so reads always observe the server's
/// current state at the cost of one round trip each; [`values_at`] is the
/// one read that amortizes a single fetch across several keys.
///
/// Backend failures propagate unchanged from every method.
///
/// [`values_at`]: TagCollection::values_at
#[derive(Clone)]
pub struct TagCollection {
    load_balancer_name: String,
    backend: Arc<dyn TagBackend>,
}

impl TagCollection {
    /// Create a view over the named load balancer's tags.
    pub fn new(load_balancer_name: impl Into<String>, backend: Arc<dyn TagBackend>) -> Self {
        Self {
            load_balancer_name: load_balancer_name.into(),
            backend,
        }
    }

    /// Name of the load balancer this collection belongs to.
    pub fn load_balancer_name(&self) -> &str {
        &self.load_balancer_name
    }

    /// Fetch the current tags.
    ///
    /// One describe call scoped to this load balancer. A load balancer
    /// absent from the response yields no tags rather than an error. Two
    /// consecutive calls issue two round trips and may observe different
    /// states if the server changed in between.
    pub async fn list(&self) -> Result<Vec<Tag>, BackendError> {
        trace!(load_balancer = %self.load_balancer_name, "describing tags");
        let descriptions = self.backend.describe_tags(self.request_names()).await?;
        Ok(descriptions
            .into_iter()
            .find(|description| description.load_balancer_name == self.load_balancer_name)
            .map(|description| description.tags)
            .unwrap_or_default())
    }

    /// Fetch the current tags as a key-to-value map.
    pub async fn to_map(&self) -> Result<BTreeMap<String, String>, BackendError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|tag| (tag.key, tag.value))
            .collect())
    }

    /// Value of the tag with the given key, or `None` if no such tag exists.
    pub async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value))
    }

    /// Whether a tag with the given key exists.
    pub async fn contains_key(&self, key: &str) -> Result<bool, BackendError> {
        Ok(self.list().await?.iter().any(|tag| tag.key == key))
    }

    /// Whether any tag has the given value.
    pub async fn contains_value(&self, value: &str) -> Result<bool, BackendError> {
        Ok(self.list().await?.iter().any(|tag| tag.value == value))
    }

    /// Whether the load balancer has no tags.
    pub async fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.list().await?.is_empty())
    }

    /// Set or delete a single tag.
    ///
    /// `Some(value)` attaches the tag in one add call; `None` deletes the
    /// key instead. Nothing is returned either way: a caller that wants to
    /// observe the write re-fetches.
    pub async fn set(&self, key: &str, value: Option<&str>) -> Result<(), BackendError> {
        match value {
            Some(value) => self.set_all([(key, value)]).await,
            None => self.delete([key]).await,
        }
    }

    /// Attach a tag with an empty value.
    ///
    /// The empty value is explicit: the key shows up in enumerations and
    /// satisfies key predicates, unlike an absent tag.
    pub async fn add(&self, key: &str) -> Result<(), BackendError> {
        self.set(key, Some("")).await
    }

    /// Set multiple tags in one add call.
    ///
    /// Values of keys named here are overwritten; keys not named keep
    /// theirs. There is no way to set and delete in the same request;
    /// deletion is a separate call.
    pub async fn set_all<I, K, V>(&self, pairs: I) -> Result<(), BackendError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let tags: Vec<Tag> = pairs
            .into_iter()
            .map(|(key, value)| Tag::new(key, value))
            .collect();
        debug!(load_balancer = %self.load_balancer_name, count = tags.len(), "adding tags");
        self.backend.add_tags(self.request_names(), &tags).await
    }

    /// Delete the tags with the given keys in one remove call.
    ///
    /// An empty key sequence is a no-op: no remote call is issued.
    pub async fn delete<I, K>(&self, keys: I) -> Result<(), BackendError>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Ok(());
        }
        debug!(load_balancer = %self.load_balancer_name, count = keys.len(), "removing tags");
        self.backend.remove_tags(self.request_names(), &keys).await
    }

    /// Remove every tag currently attached.
    ///
    /// Two remote calls, describe then remove, with no transaction between
    /// them: a tag attached by a concurrent writer after the describe
    /// survives. A load balancer with no tags costs only the describe.
    pub async fn clear(&self) -> Result<(), BackendError> {
        let keys: Vec<String> = self.list().await?.into_iter().map(|tag| tag.key).collect();
        self.delete(keys).await
    }

    /// Look up several keys with a single fetch.
    ///
    /// Returns one entry per requested key, in request order, `None` where
    /// no such tag exists. Unlike repeated [`get`] calls, this materializes
    /// the enumeration once and answers every key from it.
    ///
    /// [`get`]: TagCollection::get
    pub async fn values_at<I, K>(&self, keys: I) -> Result<Vec<Option<String>>, BackendError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let map = self.to_map().await?;
        Ok(keys
            .into_iter()
            .map(|key| map.get(key.as_ref()).cloned())
            .collect())
    }

    /// The one-element name list every backend call is scoped to.
    fn request_names(&self) -> &[String] {
        slice::from_ref(&self.load_balancer_name)
    }
}

impl std::fmt::Debug for TagCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagCollection")
            .field("load_balancer_name", &self.load_balancer_name)
            .finish_non_exhaustive()
    }
}
