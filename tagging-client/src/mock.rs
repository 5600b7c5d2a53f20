use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use async_trait::async_trait;

use crate::BackendError;
use crate::Result;
use crate::Tag;
use crate::TagBackend;
use crate::TagDescription;

/// Number of calls the mock has served, by operation.
///
/// Lets tests assert exactly how many round trips a code path costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub describe_tags: usize,
    pub add_tags: usize,
    pub remove_tags: usize,
}

#[derive(Default)]
struct MockState {
    /// Tags per registered load balancer, keyed by name.
    load_balancers: BTreeMap<String, BTreeMap<String, String>>,
    calls: CallCounts,
    forced_error: Option<BackendError>,
}

/// In-memory [`TagBackend`] for tests and local development.
///
/// Mirrors the remote service's observable behavior: describes omit unknown
/// load balancers, mutations on unknown load balancers fail with
/// [`BackendError::LoadBalancerNotFound`], and adds overwrite existing keys.
/// Clones share the same state.
#[derive(Default, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a load balancer with no tags.
    pub fn register(&self, name: &str) {
        self.lock()
            .load_balancers
            .entry(name.to_string())
            .or_default();
    }

    /// Register a load balancer with preset tags.
    pub fn register_with_tags(&self, name: &str, tags: &[(&str, &str)]) {
        let tags = tags
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        self.lock().load_balancers.insert(name.to_string(), tags);
    }

    /// Snapshot of the tags currently attached to a load balancer, or `None`
    /// if no such load balancer is registered.
    pub fn tags_of(&self, name: &str) -> Option<BTreeMap<String, String>> {
        self.lock().load_balancers.get(name).cloned()
    }

    /// Fail the next backend call, of any operation, with the given error.
    ///
    /// The failed call still counts toward its operation's call count; tag
    /// state is untouched. Subsequent calls behave normally.
    pub fn fail_next(&self, error: BackendError) {
        self.lock().forced_error = Some(error);
    }

    /// Calls served so far, by operation.
    pub fn call_counts(&self) -> CallCounts {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MockBackend")
            .field("load_balancers", &state.load_balancers)
            .field("calls", &state.calls)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TagBackend for MockBackend {
    async fn describe_tags(&self, load_balancer_names: &[String]) -> Result<Vec<TagDescription>> {
        let mut state = self.lock();
        state.calls.describe_tags += 1;
        if let Some(error) = state.forced_error.take() {
            return Err(error);
        }

        // Unknown names are silently omitted, matching the remote service.
        Ok(load_balancer_names
            .iter()
            .filter_map(|name| {
                state.load_balancers.get(name).map(|tags| TagDescription {
                    load_balancer_name: name.clone(),
                    tags: tags
                        .iter()
                        .map(|(key, value)| Tag::new(key.clone(), value.clone()))
                        .collect(),
                })
            })
            .collect())
    }

    async fn add_tags(&self, load_balancer_names: &[String], tags: &[Tag]) -> Result<()> {
        let mut state = self.lock();
        state.calls.add_tags += 1;
        if let Some(error) = state.forced_error.take() {
            return Err(error);
        }

        for name in load_balancer_names {
            if !state.load_balancers.contains_key(name) {
                return Err(BackendError::LoadBalancerNotFound(name.clone()));
            }
        }
        for name in load_balancer_names {
            if let Some(existing) = state.load_balancers.get_mut(name) {
                for tag in tags {
                    existing.insert(tag.key.clone(), tag.value.clone());
                }
            }
        }
        Ok(())
    }

    async fn remove_tags(&self, load_balancer_names: &[String], tag_keys: &[String]) -> Result<()> {
        let mut state = self.lock();
        state.calls.remove_tags += 1;
        if let Some(error) = state.forced_error.take() {
            return Err(error);
        }

        for name in load_balancer_names {
            if !state.load_balancers.contains_key(name) {
                return Err(BackendError::LoadBalancerNotFound(name.clone()));
            }
        }
        for name in load_balancer_names {
            if let Some(existing) = state.load_balancers.get_mut(name) {
                for key in tag_keys {
                    existing.remove(key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[tokio::test]
    async fn describe_omits_unknown_names_and_keeps_request_order() -> Result<()> {
        let backend = MockBackend::new();
        backend.register_with_tags("web", &[("env", "prod")]);
        backend.register("worker");

        let descriptions = backend
            .describe_tags(&names(&["worker", "missing", "web"]))
            .await?;
        assert_eq!(
            descriptions,
            vec![
                TagDescription {
                    load_balancer_name: "worker".to_string(),
                    tags: vec![],
                },
                TagDescription {
                    load_balancer_name: "web".to_string(),
                    tags: vec![Tag::new("env", "prod")],
                },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn add_tags_upserts_existing_keys() -> Result<()> {
        let backend = MockBackend::new();
        backend.register_with_tags("web", &[("env", "staging")]);

        backend
            .add_tags(
                &names(&["web"]),
                &[Tag::new("env", "prod"), Tag::new("tier", "frontend")],
            )
            .await?;

        assert_eq!(
            backend.tags_of("web"),
            Some(BTreeMap::from([
                ("env".to_string(), "prod".to_string()),
                ("tier".to_string(), "frontend".to_string()),
            ]))
        );
        Ok(())
    }

    #[tokio::test]
    async fn mutations_on_unknown_names_fail() -> Result<()> {
        let backend = MockBackend::new();
        backend.register("web");

        let err = backend
            .add_tags(&names(&["web", "missing"]), &[Tag::new("env", "prod")])
            .await;
        assert_eq!(
            err,
            Err(BackendError::LoadBalancerNotFound("missing".to_string()))
        );
        // The known load balancer is untouched when the request fails.
        assert_eq!(backend.tags_of("web"), Some(BTreeMap::new()));

        let err = backend.remove_tags(&names(&["missing"]), &names(&["env"])).await;
        assert_eq!(
            err,
            Err(BackendError::LoadBalancerNotFound("missing".to_string()))
        );
        Ok(())
    }

    #[tokio::test]
    async fn remove_tags_ignores_missing_keys() -> Result<()> {
        let backend = MockBackend::new();
        backend.register_with_tags("web", &[("env", "prod")]);

        backend
            .remove_tags(&names(&["web"]), &names(&["env", "no-such-key"]))
            .await?;
        assert_eq!(backend.tags_of("web"), Some(BTreeMap::new()));
        Ok(())
    }

    #[tokio::test]
    async fn call_counts_track_each_operation() -> Result<()> {
        let backend = MockBackend::new();
        backend.register("web");

        backend.describe_tags(&names(&["web"])).await?;
        backend.describe_tags(&names(&["web"])).await?;
        backend.add_tags(&names(&["web"]), &[Tag::new("env", "prod")]).await?;
        backend.remove_tags(&names(&["web"]), &names(&["env"])).await?;

        assert_eq!(
            backend.call_counts(),
            CallCounts {
                describe_tags: 2,
                add_tags: 1,
                remove_tags: 1,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn fail_next_fails_exactly_one_call() -> Result<()> {
        let backend = MockBackend::new();
        backend.register_with_tags("web", &[("env", "prod")]);
        backend.fail_next(BackendError::Throttling("rate exceeded".to_string()));

        let err = backend.describe_tags(&names(&["web"])).await;
        assert_eq!(
            err,
            Err(BackendError::Throttling("rate exceeded".to_string()))
        );

        // The failure is one-shot and leaves state untouched.
        let descriptions = backend.describe_tags(&names(&["web"])).await?;
        assert_eq!(descriptions.len(), 1);
        assert_eq!(backend.call_counts().describe_tags, 2);
        Ok(())
    }
}
