//! Declarative HTTP cache headers for handlers.
//!
//! Handlers declare a [`CacheDirective`] (policy set plus optional `max-age` and
//! `s-maxage`) at method or type level in a [`DirectiveRegistry`]. On each request
//! the [`CacheControlMiddleware`] resolves the directive of the handler that will
//! run and the [`HeaderWriter`] turns it into headers:
//!
//! | Header          | Written when                                  |
//! |-----------------|-----------------------------------------------|
//! | `Cache-Control` | always (tokens, then `max-age`, `s-maxage`)   |
//! | `Pragma`        | `no-cache` is in the policy set               |
//! | `Expires`       | `max-age` is set and Expires emission is on   |
//!
//! Nothing here stores responses; this only produces outgoing header values.

mod config;
mod directive;
mod middleware;
mod policy;
mod registry;
mod writer;

pub use config::{CacheControlConfig, ConfigError, HandlerEntry};
pub use directive::{CacheDirective, ResolvedDirective, Scope};
pub use middleware::CacheControlMiddleware;
pub use policy::{CachePolicy, UnknownPolicy};
pub use registry::DirectiveRegistry;
pub use writer::{CACHE_CONTROL, CacheHeaders, EXPIRES, HeaderWriter, PRAGMA};
