//! Resolver traits for looking up bindings.

use std::any::TypeId;
use std::sync::Arc;

use crate::error::DiResult;
use crate::key::Key;
use crate::value::Value;

/// Object-safe lookup.
///
/// Most callers use the typed [`Resolver`] methods instead, which are built
/// on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Looks up `key` and materializes the matched binding.
    ///
    /// The record is found by exact key first; if there is none and `key` is
    /// a type key, by scanning bindings in registration order for one that
    /// produces or provides that type. When `requested` differs from the
    /// produced type, a matching capability cast is applied to the result.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The materialized value
    /// * `Err(DiError)` - `ObjectNotFound`, `AbsentValue`, or a factory failure
    fn resolve_as(&self, key: &Key, requested: Option<TypeId>) -> DiResult<Value>;

    /// Looks up `key`, converting to the type it names if it is a type key.
    fn resolve_key(&self, key: &Key) -> DiResult<Value> {
        self.resolve_as(key, key.type_id())
    }
}

/// Typed lookup on top of [`ResolverCore`].
///
/// # Examples
///
/// ```
/// use ferrous_registry::{Key, Registry, Resolver};
///
/// let registry = Registry::new();
/// registry.bind_value(Key::of::<usize>(), 42usize).unwrap();
/// registry.bind_value("name", "svc".to_string()).unwrap();
///
/// assert_eq!(*registry.get::<usize>().unwrap(), 42);
/// assert_eq!(*registry.get_by_key::<String>("name").unwrap(), "svc");
/// assert!(registry.try_get::<u8>().unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves type `T`.
    ///
    /// `T` may be unsized, e.g. `dyn Trait`, in which case a binding keyed by
    /// `dyn Trait` or one declaring it as a capability is used.
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let key = Key::of::<T>();
        self.resolve_as(&key, Some(TypeId::of::<T>()))?.downcast::<T>()
    }

    /// Resolves the binding stored under `key` as type `T`.
    fn get_by_key<T: ?Sized + Send + Sync + 'static>(&self, key: impl Into<Key>) -> DiResult<Arc<T>> {
        let key = key.into();
        self.resolve_as(&key, Some(TypeId::of::<T>()))?.downcast::<T>()
    }

    /// Resolves type `T`, or `None` if nothing matches or the value is absent.
    ///
    /// Other failures, such as factory errors, are still returned.
    fn try_get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Option<Arc<T>>> {
        match self.get::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_missing() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Resolves type `T`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics with the error message if resolution fails.
    #[track_caller]
    fn must_get<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        match self.get::<T>() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    /// Resolves `key` as type `T`, panicking on failure.
    #[track_caller]
    fn must_get_by_key<T: ?Sized + Send + Sync + 'static>(&self, key: impl Into<Key>) -> Arc<T> {
        match self.get_by_key::<T>(key) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
