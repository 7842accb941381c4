//! Handler functions and handler identities.

use std::borrow::Cow;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use crate::Response;
use crate::context::Context;

/// Type-erased, heap-allocated async handler that processes a [`Context`] and returns a
/// [`Response`].
///
/// In practice you never construct this type directly — use [`Router::get`](super::Router::get)
/// or [`Router::handle`](super::Router::handle) instead.
pub type Handler =
    Arc<dyn Fn(Context) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this trait automatically.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given context, boxing the returned future.
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(ctx))
    }
}

/// The identity of a handler: the method name and the type that declares it.
///
/// Cache directives are registered against these two names, so the same
/// `HandlerRef` must be used when binding the route and when declaring its
/// directive.
///
/// # Examples
///
/// ```
/// use cachectl::router::HandlerRef;
///
/// struct Catalog;
///
/// let by_name = HandlerRef::new("Catalog", "list");
/// assert_eq!(by_name.to_string(), "Catalog::list");
///
/// let by_type = HandlerRef::of::<Catalog>("list");
/// assert!(by_type.type_name().ends_with("Catalog"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    type_name: Cow<'static, str>,
    method: Cow<'static, str>,
}

impl HandlerRef {
    pub fn new(
        type_name: impl Into<Cow<'static, str>>,
        method: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Identify a handler by its declaring Rust type, named via [`std::any::type_name`].
    pub fn of<T: ?Sized>(method: &'static str) -> Self {
        Self::new(std::any::type_name::<T>(), method)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, self.method)
    }
}
