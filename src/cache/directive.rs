//! Declared and resolved cache directives.

use serde::{Deserialize, Deserializer, Serialize};

use super::CachePolicy;

/// The cache configuration declared for a handler method or a handler type.
///
/// A directive is a set of [`CachePolicy`] values plus optional `max-age` and
/// `s-maxage` lifetimes. The set keeps declaration order and ignores repeats,
/// so `[Public, MustRevalidate, Public]` renders as `public, must-revalidate`.
///
/// The default directive is `{no-cache}` with no lifetimes.
///
/// # Examples
///
/// ```
/// use cachectl::cache::{CacheDirective, CachePolicy};
///
/// let directive = CacheDirective::new([CachePolicy::Public]).max_age(360);
/// assert_eq!(directive.policies(), &[CachePolicy::Public]);
/// assert_eq!(directive.max_age_secs(), Some(360));
/// assert_eq!(directive.shared_max_age_secs(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheDirective {
    #[serde(default = "default_policies", deserialize_with = "deserialize_policies")]
    policy: Vec<CachePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_age: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shared_max_age: Option<u64>,
}

impl CacheDirective {
    /// Creates a directive with the given policies and no lifetimes.
    pub fn new(policies: impl IntoIterator<Item = CachePolicy>) -> Self {
        Self {
            policy: dedup(policies),
            max_age: None,
            shared_max_age: None,
        }
    }

    /// Sets `max-age` in seconds.
    #[must_use]
    pub fn max_age(mut self, secs: u64) -> Self {
        self.max_age = Some(secs);
        self
    }

    /// Sets `s-maxage` in seconds.
    #[must_use]
    pub fn shared_max_age(mut self, secs: u64) -> Self {
        self.shared_max_age = Some(secs);
        self
    }

    /// The policy set in declaration order.
    pub fn policies(&self) -> &[CachePolicy] {
        &self.policy
    }

    pub fn contains(&self, policy: CachePolicy) -> bool {
        self.policy.contains(&policy)
    }

    pub fn max_age_secs(&self) -> Option<u64> {
        self.max_age
    }

    pub fn shared_max_age_secs(&self) -> Option<u64> {
        self.shared_max_age
    }
}

impl Default for CacheDirective {
    fn default() -> Self {
        Self::new(default_policies())
    }
}

/// Where a [`ResolvedDirective`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Declared on the handler method itself.
    Method,
    /// Declared on the handler's declaring type.
    Type,
    /// Nothing declared; the built-in `{no-cache}` default.
    Default,
}

/// The effective directive for a single request.
///
/// Produced by [`DirectiveRegistry::resolve`](super::DirectiveRegistry::resolve)
/// and dropped once the response headers are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirective {
    directive: CacheDirective,
    scope: Scope,
}

impl ResolvedDirective {
    pub fn new(directive: CacheDirective, scope: Scope) -> Self {
        Self { directive, scope }
    }

    /// The built-in fallback used when nothing is declared.
    pub fn fallback() -> Self {
        Self::new(CacheDirective::default(), Scope::Default)
    }

    pub fn directive(&self) -> &CacheDirective {
        &self.directive
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }
}

fn default_policies() -> Vec<CachePolicy> {
    vec![CachePolicy::NoCache]
}

fn dedup(policies: impl IntoIterator<Item = CachePolicy>) -> Vec<CachePolicy> {
    let mut out: Vec<CachePolicy> = Vec::new();
    for policy in policies {
        if !out.contains(&policy) {
            out.push(policy);
        }
    }
    out
}

fn deserialize_policies<'de, D>(deserializer: D) -> Result<Vec<CachePolicy>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<CachePolicy>::deserialize(deserializer)?;
    Ok(dedup(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_single_no_cache() {
        let d = CacheDirective::default();
        assert_eq!(d.policies(), &[CachePolicy::NoCache]);
        assert_eq!(d.max_age_secs(), None);
        assert_eq!(d.shared_max_age_secs(), None);
    }

    #[test]
    fn repeated_policies_collapse_in_declaration_order() {
        let d = CacheDirective::new([
            CachePolicy::Private,
            CachePolicy::MustRevalidate,
            CachePolicy::Private,
            CachePolicy::NoTransform,
        ]);
        assert_eq!(
            d.policies(),
            &[
                CachePolicy::Private,
                CachePolicy::MustRevalidate,
                CachePolicy::NoTransform
            ]
        );
    }

    #[test]
    fn builder_sets_lifetimes() {
        let d = CacheDirective::new([CachePolicy::Public])
            .max_age(60)
            .shared_max_age(600);
        assert_eq!(d.max_age_secs(), Some(60));
        assert_eq!(d.shared_max_age_secs(), Some(600));
        assert!(d.contains(CachePolicy::Public));
        assert!(!d.contains(CachePolicy::Private));
    }

    #[test]
    fn deserialize_defaults_to_no_cache() {
        let d: CacheDirective = serde_json::from_str("{}").unwrap();
        assert_eq!(d, CacheDirective::default());
    }

    #[test]
    fn deserialize_dedups_policies() {
        let d: CacheDirective =
            serde_json::from_str(r#"{"policy":["public","public"],"max_age":30}"#).unwrap();
        assert_eq!(d.policies(), &[CachePolicy::Public]);
        assert_eq!(d.max_age_secs(), Some(30));
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let res: Result<CacheDirective, _> = serde_json::from_str(r#"{"maxAge":30}"#);
        assert!(res.is_err());
    }

    #[test]
    fn fallback_scope_is_default() {
        let r = ResolvedDirective::fallback();
        assert_eq!(r.scope(), Scope::Default);
        assert_eq!(r.directive().policies(), &[CachePolicy::NoCache]);
    }
}
