//! Parameter resolution for injected calls.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::registry::Registry;
use crate::traits::Resolver;

/// A parameter type the registry can supply.
///
/// Implemented for:
/// - `Arc<T>`: looked up as type `T`, exact key first, then capability match
/// - `Option<Arc<T>>`: same, but `None` when nothing matches or the value is absent
/// - [`Registry`]: the registry itself, without a lookup
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Registry, Resolver};
/// use std::sync::Arc;
///
/// struct Config { name: &'static str }
///
/// let registry = Registry::new();
/// registry.singleton(|| Config { name: "svc" }).unwrap();
///
/// let greeting = registry
///     .invoke(|cfg: Arc<Config>, missing: Option<Arc<u64>>, r: Registry| {
///         assert!(missing.is_none());
///         assert!(r.contains_key(ferrous_registry::Key::of::<Config>()));
///         format!("hello {}", cfg.name)
///     })
///     .unwrap();
/// assert_eq!(greeting, "hello svc");
/// ```
pub trait FromRegistry: Sized {
    /// Produces the parameter value.
    fn from_registry(registry: &Registry) -> DiResult<Self>;
}

impl<T> FromRegistry for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn from_registry(registry: &Registry) -> DiResult<Self> {
        registry.get::<T>()
    }
}

impl<T> FromRegistry for Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn from_registry(registry: &Registry) -> DiResult<Self> {
        registry.try_get::<T>()
    }
}

impl FromRegistry for Registry {
    fn from_registry(registry: &Registry) -> DiResult<Self> {
        Ok(registry.clone())
    }
}

/// Resolves the parameter at `position`, tagging failures with it.
pub(crate) fn resolve_argument<A: FromRegistry>(registry: &Registry, position: usize) -> DiResult<A> {
    A::from_registry(registry).map_err(|source| DiError::ArgNotInstanced {
        position,
        type_name: std::any::type_name::<A>(),
        source: Box::new(source),
    })
}
