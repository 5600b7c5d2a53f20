//! Tag collections and tag-filtered iteration for cloud load balancers.
//!
//! The load balancer list API cannot filter by tag, and the tagging API only
//! offers describe/add/remove calls scoped to named resources. This crate
//! layers the two surfaces callers actually want on top of those calls:
//!
//! - [`TagCollection`]: a per-load-balancer view of its tags with read,
//!   write, delete, and enumeration operations. Nothing is cached; every
//!   operation is a fresh round trip, so callers always observe the server's
//!   current state.
//! - [`FilteredCollection`]: a decorator over a resource collection's
//!   iteration that fetches each resource's tags and yields only the
//!   resources matching an accumulated set of [`Filter`]s.
//!
//! The remote service itself is consumed through
//! [`elb_tagging_client::TagBackend`] and never reimplemented here.

mod collection;
mod error;
mod filter;
mod filtered;
mod resource;

pub use collection::TagCollection;
pub use error::TagError;
pub use filter::Filter;
pub use filter::FilterSet;
pub use filtered::FilteredCollection;
pub use filtered::ResourceCollection;
pub use filtered::ResourceCollectionExt;
pub use resource::LoadBalancer;
pub use resource::TaggedResource;
