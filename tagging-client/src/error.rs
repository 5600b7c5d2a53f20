use thiserror::Error;

/// Result type alias for tagging API operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Failures surfaced by the remote tagging API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Connection failed, timed out, or was interrupted mid-request.
    #[error("network error: {0}")]
    Network(String),

    /// The service throttled the request.
    #[error("request throttled: {0}")]
    Throttling(String),

    /// The caller is not authorized to tag this load balancer.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// No load balancer with the given name exists.
    #[error("load balancer not found: {0}")]
    LoadBalancerNotFound(String),

    /// The request would push a load balancer past its tag quota.
    #[error("too many tags: {0}")]
    TooManyTags(String),

    /// The request names the same tag key more than once.
    #[error("duplicate tag keys: {0}")]
    DuplicateTagKeys(String),

    /// Any other error response from the service.
    #[error("api error [{code}]: {message}")]
    Api { code: String, message: String },
}

impl BackendError {
    /// Whether retrying the same request may succeed.
    ///
    /// The tagging layer never retries on its own; this classification is
    /// for callers that run their own retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::Network(_) | BackendError::Throttling(_)
        )
    }
}
