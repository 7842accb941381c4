//! Handler-to-directive registry and override resolution.

use std::collections::HashMap;

use tracing::{trace, warn};

use super::{CacheControlConfig, CacheDirective, ResolvedDirective, Scope};
use crate::router::HandlerRef;

/// Cache directives declared per handler method and per handler type.
///
/// Populated once at startup and then shared read-only. Resolution order for a
/// handler is: its own method directive, then its declaring type's directive,
/// then the built-in `{no-cache}` default. Resolution never fails.
///
/// # Examples
///
/// ```
/// use cachectl::cache::{CacheDirective, CachePolicy, DirectiveRegistry, Scope};
/// use cachectl::router::HandlerRef;
///
/// let mut registry = DirectiveRegistry::new();
/// registry.for_type("Catalog", CacheDirective::new([CachePolicy::Private]));
/// registry.for_method(
///     HandlerRef::new("Catalog", "list"),
///     CacheDirective::new([CachePolicy::Public]).max_age(60),
/// );
///
/// let list = registry.resolve(&HandlerRef::new("Catalog", "list"));
/// assert_eq!(list.scope(), Scope::Method);
///
/// let show = registry.resolve(&HandlerRef::new("Catalog", "show"));
/// assert_eq!(show.directive().policies(), &[CachePolicy::Private]);
///
/// let other = registry.resolve(&HandlerRef::new("Cart", "view"));
/// assert_eq!(other.scope(), Scope::Default);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
    types: HashMap<String, CacheDirective>,
    methods: HashMap<HandlerRef, CacheDirective>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the `handlers` entries of a configuration.
    ///
    /// Entries with a `method` are method scoped, the rest are type scoped.
    /// Later entries replace earlier ones for the same key.
    pub fn from_config(config: &CacheControlConfig) -> Self {
        let mut registry = Self::new();
        for entry in &config.handlers {
            match &entry.method {
                Some(method) => registry.for_method(
                    HandlerRef::new(entry.type_name.clone(), method.clone()),
                    entry.directive.clone(),
                ),
                None => registry.for_type(entry.type_name.clone(), entry.directive.clone()),
            }
        }
        registry
    }

    /// Declare the directive for every handler of `type_name` without its own.
    pub fn for_type(&mut self, type_name: impl Into<String>, directive: CacheDirective) {
        let type_name = type_name.into();
        trace!(%type_name, ?directive, "registering type cache directive");
        if self.types.insert(type_name.clone(), directive).is_some() {
            warn!(%type_name, "type cache directive replaced");
        }
    }

    /// [`for_type`](Self::for_type) keyed by a Rust type, matching [`HandlerRef::of`].
    pub fn for_type_of<T: ?Sized>(&mut self, directive: CacheDirective) {
        self.for_type(std::any::type_name::<T>(), directive);
    }

    /// Declare the directive for one handler method.
    pub fn for_method(&mut self, handler: HandlerRef, directive: CacheDirective) {
        trace!(%handler, ?directive, "registering method cache directive");
        if let Some(previous) = self.methods.insert(handler.clone(), directive) {
            warn!(%handler, ?previous, "method cache directive replaced");
        }
    }

    /// Resolve the effective directive for `handler`.
    pub fn resolve(&self, handler: &HandlerRef) -> ResolvedDirective {
        if let Some(directive) = self.methods.get(handler) {
            return ResolvedDirective::new(directive.clone(), Scope::Method);
        }
        if let Some(directive) = self.types.get(handler.type_name()) {
            return ResolvedDirective::new(directive.clone(), Scope::Type);
        }
        ResolvedDirective::fallback()
    }

    /// Number of declared directives, type and method scoped together.
    pub fn len(&self) -> usize {
        self.types.len() + self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.methods.is_empty()
    }
}
