//! Middleware that applies declared cache directives to handler responses.

use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use super::{CacheControlConfig, CacheHeaders, DirectiveRegistry, HeaderWriter, ResolvedDirective};
use crate::Response;
use crate::context::Context;
use crate::middleware::{Middleware, Next};
use crate::router::HandlerRef;

/// Writes `Cache-Control`, `Pragma` and `Expires` for identified handlers.
///
/// For each request the directive of the selected handler is resolved (method,
/// then type, then `{no-cache}`) and rendered before the handler runs. Once the
/// handler returns, the rendered headers are added to its response unless the
/// handler already set them itself. Anonymous routes pass through untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use cachectl::Router;
/// use cachectl::cache::{CacheControlMiddleware, CacheDirective, CachePolicy, DirectiveRegistry};
///
/// let mut registry = DirectiveRegistry::new();
/// registry.for_type("Catalog", CacheDirective::new([CachePolicy::Private]));
///
/// let mut router = Router::new();
/// router.layer(CacheControlMiddleware::new(registry));
/// ```
#[derive(Debug, Clone)]
pub struct CacheControlMiddleware {
    registry: Arc<DirectiveRegistry>,
    writer: HeaderWriter,
}

impl CacheControlMiddleware {
    /// Create the middleware with `Expires` emission enabled.
    pub fn new(registry: impl Into<Arc<DirectiveRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            writer: HeaderWriter::new(),
        }
    }

    /// Build registry and writer settings from one configuration.
    pub fn from_config(config: &CacheControlConfig) -> Self {
        Self {
            registry: Arc::new(DirectiveRegistry::from_config(config)),
            writer: HeaderWriter::from_config(config),
        }
    }

    #[must_use]
    pub fn use_expires_header(mut self, enabled: bool) -> Self {
        self.writer = self.writer.use_expires_header(enabled);
        self
    }

    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    /// Resolve the effective directive for `handler`.
    pub fn resolve(&self, handler: &HandlerRef) -> ResolvedDirective {
        self.registry.resolve(handler)
    }

    /// Resolve `handler`'s directive and set the headers on `response` directly.
    ///
    /// For hosts that drive their own pipeline and hand over the response before
    /// the handler body runs.
    pub fn pre_handle(&self, handler: &HandlerRef, response: &mut Response) {
        self.writer.write(&self.resolve(handler), response);
    }

    fn render_for(&self, handler: &HandlerRef) -> CacheHeaders {
        let resolved = self.resolve(handler);
        let headers = self.writer.render(&resolved);
        debug!(
            %handler,
            scope = ?resolved.scope(),
            cache_control = headers.cache_control().unwrap_or("-"),
            "resolved cache directive"
        );
        headers
    }
}

impl Middleware for CacheControlMiddleware {
    fn handle(&self, ctx: Context, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        let headers = ctx.handler().map(|handler| self.render_for(handler));

        Box::pin(async move {
            let mut response = next.run(ctx).await;
            if let Some(headers) = headers {
                headers.fill(&mut response);
            }
            response
        })
    }
}
