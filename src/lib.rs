//! # cachectl
//!
//! Declarative `Cache-Control`, `Pragma` and `Expires` headers for async HTTP/1.1
//! handlers.
//!
//! Each handler is identified by a [`HandlerRef`](router::HandlerRef) (declaring
//! type + method). Cache directives are declared per method or per type in a
//! [`DirectiveRegistry`](cache::DirectiveRegistry); the
//! [`CacheControlMiddleware`](cache::CacheControlMiddleware) resolves the nearest
//! one for every request (method, then type, then `no-cache`) and writes the
//! headers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cachectl::cache::{CacheControlMiddleware, CacheDirective, CachePolicy, DirectiveRegistry};
//! use cachectl::router::HandlerRef;
//! use cachectl::{Method, Response, Router, Server, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = DirectiveRegistry::new();
//!     registry.for_method(
//!         HandlerRef::new("Catalog", "list"),
//!         CacheDirective::new([CachePolicy::Public]).max_age(360),
//!     );
//!
//!     let mut router = Router::new();
//!     router.layer(CacheControlMiddleware::new(registry));
//!     router.handle(Method::Get, "/items", HandlerRef::new("Catalog", "list"), |_ctx| async {
//!         Response::new(StatusCode::Ok).body("[]")
//!     });
//!
//!     Server::bind("127.0.0.1:8080").await?.serve(router).await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod context;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;

pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
