use elb_tagging_client::BackendError;
use thiserror::Error;

/// Errors surfaced by tag collections and filtered iteration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagError {
    /// A remote tagging call failed. The backend error is propagated
    /// unchanged: this layer adds no retry, translation, or wrapping.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A filter whose name is not `tag-key`, `tag-value`, or `tag:<key>`
    /// was evaluated during filtered iteration.
    #[error("unsupported filter for load balancers: {0:?}")]
    UnsupportedFilter(String),
}
