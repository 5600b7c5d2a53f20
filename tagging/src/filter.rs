use std::collections::BTreeMap;

use wildmatch::WildMatch;

use crate::TagError;

/// A single tag predicate: a filter name plus the values it accepts.
///
/// Recognized names are `tag-key`, `tag-value`, and `tag:<key>`, where
/// `<key>` is a literal tag key (never a pattern). Values are patterns: `*`
/// matches one or more characters and `?` matches exactly one; a value
/// without either metacharacter must match exactly. A filter passes when
/// any one of its values matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    name: String,
    values: Vec<String>,
}

impl Filter {
    /// Build a filter from a name and the values it accepts.
    ///
    /// The name is not validated here. An unrecognized name fails later,
    /// when the filter is first evaluated against a resource's tags.
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The filter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The accepted value patterns.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Test one load balancer's tags against this filter.
    fn matches(&self, tags: &BTreeMap<String, String>) -> Result<bool, TagError> {
        match self.name.as_str() {
            "tag-key" => Ok(self.any_value_matches(tags.keys())),
            "tag-value" => Ok(self.any_value_matches(tags.values())),
            name => match name.strip_prefix("tag:") {
                Some(key) => Ok(tags
                    .get(key)
                    .is_some_and(|value| self.values.iter().any(|p| pattern_matches(p, value)))),
                None => Err(TagError::UnsupportedFilter(self.name.clone())),
            },
        }
    }

    fn any_value_matches<'a>(&self, mut candidates: impl Iterator<Item = &'a String>) -> bool {
        candidates.any(|candidate| {
            self.values
                .iter()
                .any(|pattern| pattern_matches(pattern, candidate))
        })
    }
}

fn pattern_matches(pattern: &str, candidate: &str) -> bool {
    // `*` spans one or more characters. `WildMatch`'s star spans zero or
    // more, so demand the first character explicitly.
    if pattern.contains('*') {
        WildMatch::new(&pattern.replace('*', "?*")).matches(candidate)
    } else {
        WildMatch::new(pattern).matches(candidate)
    }
}

/// An ordered set of filters combined with AND semantics.
///
/// The set is immutable-by-append: [`FilterSet::with`] returns an extended
/// copy and never touches the receiver, so views chained from a shared base
/// cannot observe each other's filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// The empty set. It matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// An extended copy of this set with one more filter appended.
    #[must_use]
    pub fn with(&self, filter: Filter) -> Self {
        let mut filters = self.filters.clone();
        filters.push(filter);
        Self { filters }
    }

    /// The filters in evaluation order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Whether the set contains no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Test a load balancer's tags against every filter in the set.
    ///
    /// AND across filters, OR across one filter's values; the empty set
    /// passes. Evaluation is in order and stops at the first filter that
    /// fails, so an unrecognized name only surfaces as
    /// [`TagError::UnsupportedFilter`] when that filter is actually reached.
    pub fn matches(&self, tags: &BTreeMap<String, String>) -> Result<bool, TagError> {
        for filter in &self.filters {
            if !filter.matches(tags)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    fn set(filters: &[(&str, &[&str])]) -> FilterSet {
        filters.iter().fold(FilterSet::new(), |set, (name, values)| {
            set.with(Filter::new(*name, values.iter().copied()))
        })
    }

    #[test]
    fn tag_key_matches_any_present_key() {
        let present = tags(&[("env", "prod"), ("tier", "frontend")]);

        assert_eq!(set(&[("tag-key", &["env"])]).matches(&present), Ok(true));
        assert_eq!(set(&[("tag-key", &["owner"])]).matches(&present), Ok(false));
        // OR across one filter's values.
        assert_eq!(
            set(&[("tag-key", &["owner", "tier"])]).matches(&present),
            Ok(true)
        );
        // Keys are not values.
        assert_eq!(set(&[("tag-key", &["prod"])]).matches(&present), Ok(false));
    }

    #[test]
    fn tag_value_matches_any_present_value() {
        let present = tags(&[("env", "prod"), ("tier", "frontend")]);

        assert_eq!(set(&[("tag-value", &["prod"])]).matches(&present), Ok(true));
        assert_eq!(
            set(&[("tag-value", &["staging", "frontend"])]).matches(&present),
            Ok(true)
        );
        assert_eq!(set(&[("tag-value", &["env"])]).matches(&present), Ok(false));
    }

    #[test]
    fn scoped_key_requires_that_key_with_a_matching_value() {
        let present = tags(&[("env", "prod"), ("tier", "frontend")]);

        assert_eq!(set(&[("tag:env", &["prod"])]).matches(&present), Ok(true));
        assert_eq!(
            set(&[("tag:env", &["staging", "prod"])]).matches(&present),
            Ok(true)
        );
        assert_eq!(set(&[("tag:env", &["staging"])]).matches(&present), Ok(false));
        // A matching value under a different key does not count.
        assert_eq!(set(&[("tag:owner", &["prod"])]).matches(&present), Ok(false));
    }

    #[test]
    fn scoped_key_is_literal_not_a_pattern() {
        let present = tags(&[("env", "prod")]);

        assert_eq!(set(&[("tag:e*", &["prod"])]).matches(&present), Ok(false));
        assert_eq!(set(&[("tag:e*", &["prod"])]).matches(&tags(&[("e*", "prod")])), Ok(true));
    }

    #[test]
    fn values_are_wildcard_patterns() {
        let present = tags(&[("env", "production"), ("tier", "frontend")]);

        // `*` spans one or more characters, never zero.
        assert_eq!(set(&[("tag:env", &["prod*"])]).matches(&present), Ok(true));
        assert_eq!(
            set(&[("tag:env", &["production*"])]).matches(&present),
            Ok(false)
        );
        assert_eq!(set(&[("tag-key", &["t*r"])]).matches(&present), Ok(true));
        assert_eq!(set(&[("tag-value", &["*end"])]).matches(&present), Ok(true));

        // `?` spans exactly one character.
        assert_eq!(set(&[("tag-key", &["t?er"])]).matches(&present), Ok(true));
        assert_eq!(set(&[("tag-key", &["ti?er"])]).matches(&present), Ok(false));

        // Without metacharacters the match is exact.
        assert_eq!(set(&[("tag:env", &["prod"])]).matches(&present), Ok(false));
        assert_eq!(set(&[("tag:env", &["production"])]).matches(&present), Ok(true));
    }

    #[test]
    fn empty_value_is_matchable() {
        let present = tags(&[("blessed", "")]);

        assert_eq!(set(&[("tag:blessed", &[""])]).matches(&present), Ok(true));
        assert_eq!(set(&[("tag-value", &[""])]).matches(&present), Ok(true));
        assert_eq!(set(&[("tag-key", &["blessed"])]).matches(&present), Ok(true));
    }

    #[test]
    fn filters_combine_with_and_semantics() {
        let both = tags(&[("env", "prod"), ("tier", "frontend")]);
        let env_only = tags(&[("env", "prod")]);
        let chained = set(&[("tag:env", &["prod"]), ("tag:tier", &["frontend"])]);

        assert_eq!(chained.matches(&both), Ok(true));
        assert_eq!(chained.matches(&env_only), Ok(false));
    }

    #[test]
    fn empty_set_matches_everything() {
        assert_eq!(FilterSet::new().matches(&tags(&[])), Ok(true));
        assert_eq!(
            FilterSet::new().matches(&tags(&[("env", "prod")])),
            Ok(true)
        );
    }

    #[test]
    fn unrecognized_name_is_an_error_when_evaluated() {
        let result = set(&[("bogus", &["x"])]).matches(&tags(&[("env", "prod")]));
        assert_eq!(result, Err(TagError::UnsupportedFilter("bogus".to_string())));

        // Evaluation is ordered and short-circuits: a filter that already
        // failed the match hides an unrecognized name behind it.
        let behind_failing = set(&[("tag-key", &["owner"]), ("bogus", &["x"])]);
        assert_eq!(behind_failing.matches(&tags(&[("env", "prod")])), Ok(false));
        let behind_passing = set(&[("tag-key", &["env"]), ("bogus", &["x"])]);
        assert_eq!(
            behind_passing.matches(&tags(&[("env", "prod")])),
            Err(TagError::UnsupportedFilter("bogus".to_string()))
        );
    }

    #[test]
    fn unsupported_filter_message_quotes_the_name() {
        assert_eq!(
            TagError::UnsupportedFilter("bogus".to_string()).to_string(),
            "unsupported filter for load balancers: \"bogus\""
        );
    }

    #[test]
    fn with_extends_a_copy_and_leaves_the_receiver_untouched() {
        let base = FilterSet::new().with(Filter::new("tag-key", ["env"]));
        let extended = base.with(Filter::new("tag:env", ["prod"]));
        let sibling = base.with(Filter::new("tag:env", ["staging"]));

        assert_eq!(base.filters().len(), 1);
        assert_eq!(extended.filters().len(), 2);
        assert_eq!(sibling.filters().len(), 2);
        assert_eq!(extended.filters()[1].values(), ["prod"]);
        assert_eq!(sibling.filters()[1].values(), ["staging"]);
    }
}
