//! Request routing — map URL patterns and HTTP methods to identified handlers.
//!
//! This module provides [`Router`], which dispatches incoming HTTP requests to handler
//! functions based on the request method and URL path. Three pattern styles are supported:
//!
//! | Pattern              | Example match              | Captured params              |
//! |----------------------|----------------------------|------------------------------|
//! | `/items`             | `/items`                   | *(none)*                     |
//! | `/items/:id`         | `/items/42`                | `id → "42"`                  |
//! | `/assets/*`          | `/assets/css/site.css`     | `wildcard → "/css/site.css"` |
//!
//! Trailing slashes are normalized on both patterns and incoming paths.
//!
//! Routes bound with [`Router::handle`] carry a [`HandlerRef`]; middleware added with
//! [`Router::layer`] runs around the matched handler and can read that identity from
//! the [`Context`]. Routes are matched in registration order.

mod handler;

use std::sync::Arc;

use crate::context::{Context, PathParams};
use crate::middleware::{Middleware, MiddlewareHandler, Next, from_middleware};
use crate::{Method, Request, Response, StatusCode};

pub use handler::{Handler, HandlerRef, IntoHandler};

// A single path segment, either a literal string or a named capture (`:name`).
#[derive(Debug, Clone)]
enum Segment {
    Static(String),
    Parameter(String),
}

// Compiled representation of a route pattern string.
#[derive(Debug, Clone)]
enum Pattern {
    Exact(String),
    Parameterized { segments: Vec<Segment> },
    Wildcard(String),
}

fn trim_trailing_slash(path: &str) -> &str {
    if path != "/" {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

impl Pattern {
    // `/prefix/*` is a wildcard, anything with `:` is parameterized, the rest is exact.
    fn parse(pattern: &str) -> Self {
        let pattern = trim_trailing_slash(pattern);

        if let Some(prefix) = pattern.strip_suffix("/*") {
            return Pattern::Wildcard(prefix.to_string());
        }

        if pattern.contains(':') {
            let segments = pattern
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| match s.strip_prefix(':') {
                    Some(name) => Segment::Parameter(name.to_string()),
                    None => Segment::Static(s.to_string()),
                })
                .collect();
            return Pattern::Parameterized { segments };
        }

        Pattern::Exact(pattern.to_string())
    }

    fn matches(&self, path: &str) -> Option<PathParams> {
        let path = trim_trailing_slash(path);

        match self {
            Pattern::Exact(p) => (p == path).then(PathParams::new),
            Pattern::Parameterized { segments } => {
                let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
                if segments.len() != path_segments.len() {
                    return None;
                }

                let mut params = PathParams::new();
                for (seg, path_seg) in segments.iter().zip(path_segments) {
                    match seg {
                        Segment::Static(s) if s != path_seg => return None,
                        Segment::Static(_) => {}
                        Segment::Parameter(name) => {
                            params.insert(name.clone(), path_seg.to_string());
                        }
                    }
                }
                Some(params)
            }
            Pattern::Wildcard(prefix) => path.strip_prefix(prefix.as_str()).map(|suffix| {
                let mut params = PathParams::new();
                params.insert("wildcard".to_string(), suffix.to_string());
                params
            }),
        }
    }
}

struct Route {
    method: Method,
    pattern: Pattern,
    identity: Option<HandlerRef>,
    handler: Handler,
}

impl Route {
    fn matches(&self, method: &Method, path: &str) -> Option<PathParams> {
        if &self.method == method {
            self.pattern.matches(path)
        } else {
            None
        }
    }
}

/// HTTP request router that dispatches requests to registered handler functions.
///
/// When no route matches, a `404 Not Found` response is returned and no middleware runs.
///
/// # Examples
///
/// ```rust,no_run
/// use cachectl::{Method, Response, Router, StatusCode};
/// use cachectl::context::Context;
/// use cachectl::router::HandlerRef;
///
/// let mut router = Router::new();
///
/// router.get("/ping", |_ctx| async { Response::new(StatusCode::Ok) });
/// router.handle(
///     Method::Get,
///     "/items/:id",
///     HandlerRef::new("Catalog", "show"),
///     |ctx: Context| async move {
///         let id = ctx.params().get("id").unwrap_or("unknown").to_owned();
///         Response::new(StatusCode::Ok).body(id)
///     },
/// );
/// ```
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    middlewares: Vec<MiddlewareHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an anonymous handler for `GET` requests matching `path`.
    ///
    /// Anonymous handlers have no [`HandlerRef`], so identity-aware middleware leaves
    /// their responses alone.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Get, path, None, handler);
    }

    /// Register an anonymous handler for `POST` requests matching `path`.
    pub fn post(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Post, path, None, handler);
    }

    /// Register an identified handler for `method` requests matching `path`.
    ///
    /// # Arguments
    ///
    /// - `method` — HTTP method to match.
    /// - `path` — URL pattern string (e.g. `"/items"`, `"/items/:id"`, or `"/assets/*"`).
    /// - `identity` — the declaring type and method name of the handler.
    /// - `handler` — async function that receives a [`Context`] and returns a [`Response`].
    pub fn handle(
        &mut self,
        method: Method,
        path: &str,
        identity: HandlerRef,
        handler: impl IntoHandler,
    ) {
        self.add_route(method, path, Some(identity), handler);
    }

    /// Append a middleware that wraps every matched handler.
    ///
    /// Middleware runs in the order it was added.
    pub fn layer<M>(&mut self, middleware: M)
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(from_middleware(Arc::new(middleware)));
    }

    fn add_route(
        &mut self,
        method: Method,
        path: &str,
        identity: Option<HandlerRef>,
        handler: impl IntoHandler,
    ) {
        let handler: Handler = Arc::new(move |ctx| handler.call(ctx));
        self.routes.push(Route {
            method,
            pattern: Pattern::parse(path),
            identity,
            handler,
        });
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatch `request` to the first matching route and return its response.
    ///
    /// The matched handler runs at the end of the middleware stack, with the route's
    /// [`HandlerRef`] attached to the [`Context`].
    pub async fn route(&self, request: Request) -> Response {
        let matched = self.routes.iter().find_map(|route| {
            route
                .matches(request.method(), request.path())
                .map(|params| (route, params))
        });

        let Some((route, params)) = matched else {
            return Response::new(StatusCode::NotFound);
        };

        let ctx = Context::with_params(request, params).with_handler(route.identity.clone());

        let endpoint = Arc::clone(&route.handler);
        let mut chain = self.middlewares.clone();
        chain.push(Arc::new(move |ctx: Context, _next: Next| endpoint(ctx)));

        Next::new(chain).run(ctx).await
    }
}
