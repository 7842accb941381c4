//! Renders resolved directives into `Cache-Control`, `Pragma` and `Expires`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{CacheControlConfig, CacheDirective, CachePolicy, ResolvedDirective};
use crate::Response;

pub const CACHE_CONTROL: &str = "Cache-Control";
pub const PRAGMA: &str = "Pragma";
pub const EXPIRES: &str = "Expires";

// RFC 9111 §1.2.2: delta-seconds beyond 2^31 are treated as 2^31.
const MAX_DELTA_SECONDS: u64 = 1 << 31;

// Fri, 31 Dec 9999 23:59:59 GMT, the last instant an HTTP-date can carry.
const MAX_HTTP_DATE_SECONDS: u64 = 253_402_300_799;

/// The literal header values rendered from one directive.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
/// use cachectl::cache::{CacheDirective, CacheHeaders, CachePolicy};
///
/// let directive = CacheDirective::new([CachePolicy::Public]).max_age(360);
/// let now = UNIX_EPOCH + Duration::from_secs(784_111_417);
/// let headers = CacheHeaders::render(&directive, now, true);
///
/// assert_eq!(headers.cache_control(), Some("public, max-age=360"));
/// assert_eq!(headers.expires(), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
/// assert_eq!(headers.pragma(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheHeaders {
    cache_control: Option<String>,
    pragma: Option<&'static str>,
    expires: Option<String>,
}

impl CacheHeaders {
    /// Render `directive` as of `now`.
    ///
    /// `Cache-Control` lists the policy tokens in declaration order followed by
    /// `max-age` and `s-maxage`. `Pragma: no-cache` accompanies `no-cache`.
    /// `Expires` is `now + max-age` and only rendered when `use_expires` is set
    /// and that instant lies between 1970 and the end of year 9999.
    pub fn render(directive: &CacheDirective, now: SystemTime, use_expires: bool) -> Self {
        let mut tokens: Vec<String> = directive
            .policies()
            .iter()
            .map(|p| p.as_str().to_owned())
            .collect();
        if let Some(secs) = directive.max_age_secs() {
            tokens.push(format!("max-age={secs}"));
        }
        if let Some(secs) = directive.shared_max_age_secs() {
            tokens.push(format!("s-maxage={secs}"));
        }

        let cache_control = (!tokens.is_empty()).then(|| tokens.join(", "));
        let pragma = directive
            .contains(CachePolicy::NoCache)
            .then_some("no-cache");
        let expires = directive
            .max_age_secs()
            .filter(|_| use_expires)
            .and_then(|secs| expires_at(now, secs));

        Self {
            cache_control,
            pragma,
            expires,
        }
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    pub fn pragma(&self) -> Option<&str> {
        self.pragma
    }

    pub fn expires(&self) -> Option<&str> {
        self.expires.as_deref()
    }

    /// Every rendered `(name, value)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (CACHE_CONTROL, self.cache_control()),
            (PRAGMA, self.pragma()),
            (EXPIRES, self.expires()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    /// Set every rendered header on `response`, replacing existing values.
    pub fn write_to(&self, response: &mut Response) {
        for (name, value) in self.iter() {
            response.set_header(name, value);
        }
    }

    /// Set only the rendered headers that `response` does not already carry.
    pub fn fill(&self, response: &mut Response) {
        for (name, value) in self.iter() {
            if !response.headers().contains(name) {
                response.set_header(name, value);
            }
        }
    }
}

fn expires_at(now: SystemTime, max_age: u64) -> Option<String> {
    let delta = Duration::from_secs(max_age.min(MAX_DELTA_SECONDS));
    let at = now.checked_add(delta)?;
    let since_epoch = at.duration_since(UNIX_EPOCH).ok()?;
    (since_epoch.as_secs() <= MAX_HTTP_DATE_SECONDS).then(|| httpdate::fmt_http_date(at))
}

/// Renders and writes cache headers using the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderWriter {
    use_expires_header: bool,
}

impl Default for HeaderWriter {
    fn default() -> Self {
        Self {
            use_expires_header: true,
        }
    }
}

impl HeaderWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CacheControlConfig) -> Self {
        Self::new().use_expires_header(config.use_expires_header)
    }

    #[must_use]
    pub fn use_expires_header(mut self, enabled: bool) -> Self {
        self.use_expires_header = enabled;
        self
    }

    pub fn uses_expires_header(&self) -> bool {
        self.use_expires_header
    }

    /// Render `resolved` as of now.
    pub fn render(&self, resolved: &ResolvedDirective) -> CacheHeaders {
        CacheHeaders::render(
            resolved.directive(),
            SystemTime::now(),
            self.use_expires_header,
        )
    }

    /// Render `resolved` and set the headers on `response`.
    pub fn write(&self, resolved: &ResolvedDirective, response: &mut Response) {
        self.render(resolved).write_to(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusCode;
    use crate::cache::Scope;

    fn epoch_plus(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn render(directive: CacheDirective) -> CacheHeaders {
        CacheHeaders::render(&directive, epoch_plus(0), true)
    }

    #[test]
    fn each_policy_renders_its_own_token() {
        for policy in CachePolicy::ALL {
            let headers = render(CacheDirective::new([policy]));
            assert_eq!(headers.cache_control(), Some(policy.as_str()));
        }
    }

    #[test]
    fn public_and_private_exclude_each_other() {
        let public = render(CacheDirective::new([CachePolicy::Public]));
        assert!(!public.cache_control().unwrap().contains("private"));
        let private = render(CacheDirective::new([CachePolicy::Private]));
        assert!(!private.cache_control().unwrap().contains("public"));
    }

    #[test]
    fn ages_follow_policies() {
        let headers = render(
            CacheDirective::new([CachePolicy::Public, CachePolicy::MustRevalidate])
                .max_age(360)
                .shared_max_age(720),
        );
        assert_eq!(
            headers.cache_control(),
            Some("public, must-revalidate, max-age=360, s-maxage=720")
        );
    }

    #[test]
    fn shared_max_age_without_expires() {
        let headers = render(CacheDirective::new([CachePolicy::Public]).shared_max_age(360));
        assert_eq!(headers.cache_control(), Some("public, s-maxage=360"));
        assert_eq!(headers.expires(), None);
    }

    #[test]
    fn pragma_only_with_no_cache() {
        for policy in CachePolicy::ALL {
            let headers = render(CacheDirective::new([policy]));
            if policy == CachePolicy::NoCache {
                assert_eq!(headers.pragma(), Some("no-cache"));
            } else {
                assert_eq!(headers.pragma(), None, "{policy} must not emit Pragma");
            }
        }
    }

    #[test]
    fn expires_is_now_plus_max_age() {
        let directive = CacheDirective::new([CachePolicy::Public]).max_age(360);
        let headers = CacheHeaders::render(&directive, epoch_plus(784_111_417), true);
        assert_eq!(headers.expires(), Some("Sun, 06 Nov 1994 08:49:37 GMT"));

        let headers = CacheHeaders::render(&directive, epoch_plus(784_111_417), false);
        assert_eq!(headers.expires(), None);
    }

    #[test]
    fn zero_max_age_expires_now() {
        let headers = render(CacheDirective::new([CachePolicy::Private]).max_age(0));
        assert_eq!(headers.expires(), Some("Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn huge_max_age_is_clamped_for_expires() {
        let headers = render(CacheDirective::new([CachePolicy::Public]).max_age(u64::MAX));
        assert_eq!(
            headers.cache_control(),
            Some(format!("public, max-age={}", u64::MAX).as_str())
        );
        assert_eq!(headers.expires(), Some("Tue, 19 Jan 2038 03:14:08 GMT"));
    }

    #[test]
    fn pre_epoch_clock_skips_expires() {
        let directive = CacheDirective::new([CachePolicy::Public]).max_age(10);
        let now = UNIX_EPOCH - Duration::from_secs(100);
        let headers = CacheHeaders::render(&directive, now, true);
        assert_eq!(headers.cache_control(), Some("public, max-age=10"));
        assert_eq!(headers.expires(), None);
    }

    #[test]
    fn expires_past_year_9999_is_skipped() {
        let directive = CacheDirective::new([CachePolicy::Public]).max_age(10);
        let last_second = epoch_plus(MAX_HTTP_DATE_SECONDS);

        let at_limit = CacheHeaders::render(&directive.clone().max_age(0), last_second, true);
        assert_eq!(at_limit.expires(), Some("Fri, 31 Dec 9999 23:59:59 GMT"));

        let headers = CacheHeaders::render(&directive, last_second, true);
        assert_eq!(headers.cache_control(), Some("public, max-age=10"));
        assert_eq!(headers.expires(), None);
    }

    #[test]
    fn empty_policy_set_without_ages_writes_nothing() {
        let headers = render(CacheDirective::new(Vec::<CachePolicy>::new()));
        assert_eq!(headers.iter().count(), 0);

        let headers = render(CacheDirective::new(Vec::<CachePolicy>::new()).max_age(5));
        assert_eq!(headers.cache_control(), Some("max-age=5"));
    }

    #[test]
    fn write_is_idempotent() {
        let resolved = ResolvedDirective::new(
            CacheDirective::new([CachePolicy::NoCache]).max_age(10),
            Scope::Method,
        );
        let writer = HeaderWriter::new();
        let mut response = Response::new(StatusCode::Ok);
        writer.write(&resolved, &mut response);
        writer.write(&resolved, &mut response);

        assert_eq!(response.headers().get_all("cache-control").count(), 1);
        assert_eq!(response.headers().get_all("pragma").count(), 1);
        assert_eq!(response.headers().get_all("expires").count(), 1);
        assert_eq!(response.headers().len(), 3);
    }

    #[test]
    fn fill_keeps_existing_headers() {
        let headers = render(CacheDirective::default().max_age(30));
        let mut response = Response::new(StatusCode::Ok).header("Cache-Control", "no-store");
        headers.fill(&mut response);

        assert_eq!(response.headers().get("cache-control"), Some("no-store"));
        assert_eq!(response.headers().get("pragma"), Some("no-cache"));
        assert!(response.headers().contains("expires"));
    }

    #[test]
    fn writer_respects_expires_option() {
        let resolved = ResolvedDirective::new(
            CacheDirective::new([CachePolicy::Public]).max_age(360),
            Scope::Method,
        );

        let mut response = Response::new(StatusCode::Ok);
        HeaderWriter::new().write(&resolved, &mut response);
        assert!(response.headers().contains("expires"));

        let mut response = Response::new(StatusCode::Ok);
        let config = CacheControlConfig::new().use_expires_header(false);
        HeaderWriter::from_config(&config).write(&resolved, &mut response);
        assert!(!response.headers().contains("expires"));
    }
}
