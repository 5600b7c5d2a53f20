//! Client surface of the load balancer tagging API.
//!
//! The remote service is consumed as a black box behind the [`TagBackend`]
//! trait: describe the tags on named load balancers, attach tags, remove
//! tags. This crate defines that trait, the wire-shaped types it exchanges,
//! the failure taxonomy, and an in-memory [`MockBackend`] so callers can run
//! tests and local development without the real service.

mod api;
mod error;
mod mock;
mod types;

pub use api::TagBackend;
pub use error::BackendError;
pub use error::Result;
pub use mock::CallCounts;
pub use mock::MockBackend;
pub use types::Tag;
pub use types::TagDescription;
