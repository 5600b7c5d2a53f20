use serde::Deserialize;
use serde::Serialize;

/// A key/value tag attached to a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// The tag key. Unique per load balancer.
    pub key: String,

    /// The tag value. May be empty; an empty value is still a value, distinct
    /// from the tag being absent.
    pub value: String,
}

impl Tag {
    /// Create a tag from a key/value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One entry of a describe-tags response: the tags attached to a single load
/// balancer at the time of the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDescription {
    /// Name of the load balancer the tags belong to.
    pub load_balancer_name: String,

    /// The tags attached to it.
    pub tags: Vec<Tag>,
}
