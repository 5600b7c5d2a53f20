use std::sync::Arc;

use elb_tagging_client::TagBackend;
use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::trace;

use crate::Filter;
use crate::FilterSet;
use crate::TagCollection;
use crate::TagError;
use crate::TaggedResource;

/// A source of load balancer resources, iterated lazily.
///
/// This is the consumed side of filtered iteration: anything that can
/// produce a fresh stream of resources can be filtered by tag. A
/// materialized `Vec` of resources acts as its own collection.
pub trait ResourceCollection: Send + Sync {
    /// The resource type produced.
    type Resource: TaggedResource + Send;

    /// A fresh iteration over the collection.
    ///
    /// Every call starts over; the stream holds no state from prior calls.
    fn resources(&self) -> BoxStream<'_, Result<Self::Resource, TagError>>;
}

impl<R> ResourceCollection for Vec<R>
where
    R: TaggedResource + Clone + Send + Sync,
{
    type Resource = R;

    fn resources(&self) -> BoxStream<'_, Result<R, TagError>> {
        futures::stream::iter(self.iter().cloned().map(Ok)).boxed()
    }
}

/// A resource collection filtered by tag predicates.
///
/// The load balancer list API cannot filter by tag, so filtering happens
/// client-side: each resource the underlying collection yields has its tags
/// fetched and tested against the accumulated [`FilterSet`], and only
/// passing resources come through. [`filter`] chains by copy: it returns a
/// new view over the same collection and never mutates the receiver, so
/// several chains can safely grow from one shared base.
///
/// [`filter`]: FilteredCollection::filter
pub struct FilteredCollection<C> {
    collection: Arc<C>,
    backend: Arc<dyn TagBackend>,
    filters: FilterSet,
}

impl<C> FilteredCollection<C>
where
    C: ResourceCollection,
{
    /// Wrap a collection with an empty filter set, which passes everything.
    pub fn new(collection: C, backend: Arc<dyn TagBackend>) -> Self {
        Self {
            collection: Arc::new(collection),
            backend,
            filters: FilterSet::new(),
        }
    }

    /// A new view with one more filter appended.
    ///
    /// Chain `filter` calls to AND conditions together; pass several values
    /// to one call to OR them. The receiver keeps its own filter set, so
    /// chaining twice from the same base builds two independent views. The
    /// name is not validated here: an unrecognized name fails once
    /// iteration first evaluates a resource against it.
    #[must_use]
    pub fn filter<N, I, V>(&self, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            collection: Arc::clone(&self.collection),
            backend: Arc::clone(&self.backend),
            filters: self.filters.with(Filter::new(name, values)),
        }
    }

    /// The accumulated filter set.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Iterate the underlying collection, yielding only resources whose
    /// tags pass every filter.
    ///
    /// Resources come through in the underlying collection's order. Every
    /// evaluated resource costs one tag fetch; with no filters the fetch is
    /// skipped and everything is yielded. The stream is as restartable as
    /// the underlying collection's own iteration; each call starts a fresh
    /// pass with fresh tag fetches. A backend failure or an unsupported
    /// filter name ends the stream with that error.
    pub fn resources(&self) -> BoxStream<'_, Result<C::Resource, TagError>> {
        Box::pin(async_stream::stream! {
            let mut resources = self.collection.resources();
            while let Some(resource) = resources.next().await {
                let resource = match resource {
                    Ok(resource) => resource,
                    Err(error) => {
                        yield Err(error);
                        return;
                    }
                };
                match self.matches(resource.load_balancer_name()).await {
                    Ok(true) => yield Ok(resource),
                    Ok(false) => {}
                    Err(error) => {
                        yield Err(error);
                        return;
                    }
                }
            }
        })
    }

    /// Fetch one load balancer's tags and test them against the filter set.
    async fn matches(&self, name: &str) -> Result<bool, TagError> {
        if self.filters.is_empty() {
            // An empty set passes everything; skip the round trip whose
            // result cannot be observed.
            return Ok(true);
        }
        let tags = TagCollection::new(name, Arc::clone(&self.backend))
            .to_map()
            .await?;
        let passes = self.filters.matches(&tags)?;
        trace!(load_balancer = %name, passes, "evaluated tag filters");
        Ok(passes)
    }
}

// Manual impl: the underlying collection sits behind an `Arc`, so cloning a
// view never requires `C: Clone`.
impl<C> Clone for FilteredCollection<C> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
            backend: Arc::clone(&self.backend),
            filters: self.filters.clone(),
        }
    }
}

impl<C> std::fmt::Debug for FilteredCollection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredCollection")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

/// Filtered views are collections themselves, so decorators compose.
impl<C> ResourceCollection for FilteredCollection<C>
where
    C: ResourceCollection,
{
    type Resource = C::Resource;

    fn resources(&self) -> BoxStream<'_, Result<C::Resource, TagError>> {
        FilteredCollection::resources(self)
    }
}

/// Entry point that attaches tag filtering to any resource collection.
pub trait ResourceCollectionExt: ResourceCollection + Sized {
    /// Wrap this collection in a [`FilteredCollection`] backed by the given
    /// tagging client.
    fn filtered(self, backend: Arc<dyn TagBackend>) -> FilteredCollection<Self> {
        FilteredCollection::new(self, backend)
    }
}

impl<C: ResourceCollection> ResourceCollectionExt for C {}
