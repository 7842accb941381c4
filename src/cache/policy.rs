//! Cache-Control directive tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single `Cache-Control` response directive (RFC 9111 §5.2.2).
///
/// Serialized as its header token, so configuration files use the same
/// spelling that ends up on the wire.
///
/// # Examples
///
/// ```
/// use cachectl::cache::CachePolicy;
///
/// assert_eq!(CachePolicy::MustRevalidate.as_str(), "must-revalidate");
/// assert_eq!("no-store".parse::<CachePolicy>().unwrap(), CachePolicy::NoStore);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// Any cache may store the response, including shared caches.
    Public,
    /// Only the user agent's private cache may store the response.
    Private,
    /// Caches must revalidate with the origin before every reuse.
    NoCache,
    /// No cache may store any part of the request or response.
    NoStore,
    /// Stale responses must not be served without revalidation.
    MustRevalidate,
    /// Like `must-revalidate`, but only for shared caches.
    ProxyRevalidate,
    /// Intermediaries must not transform the payload.
    NoTransform,
}

impl CachePolicy {
    /// Every policy, in the order they are documented above.
    pub const ALL: [CachePolicy; 7] = [
        Self::Public,
        Self::Private,
        Self::NoCache,
        Self::NoStore,
        Self::MustRevalidate,
        Self::ProxyRevalidate,
        Self::NoTransform,
    ];

    /// Returns the lower-case, hyphenated header token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::NoCache => "no-cache",
            Self::NoStore => "no-store",
            Self::MustRevalidate => "must-revalidate",
            Self::ProxyRevalidate => "proxy-revalidate",
            Self::NoTransform => "no-transform",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the seven directive tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cache policy token: {0:?}")]
pub struct UnknownPolicy(pub String);

impl FromStr for CachePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownPolicy(s.to_owned()))
    }
}
