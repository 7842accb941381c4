//! Per-request context handed to middleware and handlers.
//!
//! A [`Context`] owns the parsed [`Request`], the path parameters captured by
//! the router, and the identity of the handler the router selected. Middleware
//! that needs to know *which* handler will run (the cache-control layer, the
//! request logger) reads it from [`Context::handler`].

use std::collections::HashMap;

use crate::Request;
use crate::router::HandlerRef;

/// Path parameters extracted from the matched route.
#[derive(Default, Debug, Clone)]
pub struct PathParams {
    map: HashMap<String, String>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.map.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Per-request context.
pub struct Context {
    request: Request,
    params: PathParams,
    handler: Option<HandlerRef>,
}

impl Context {
    /// Create a context with no path parameters and no handler identity.
    pub fn new(request: Request) -> Self {
        Self::with_params(request, PathParams::new())
    }

    /// Create a context carrying the parameters captured by a route match.
    pub fn with_params(request: Request, params: PathParams) -> Self {
        Self {
            request,
            params,
            handler: None,
        }
    }

    /// Attach the identity of the handler that will serve this request.
    #[must_use]
    pub fn with_handler(mut self, handler: Option<HandlerRef>) -> Self {
        self.handler = handler;
        self
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// The selected handler, or `None` for anonymous routes.
    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }
}
