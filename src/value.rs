//! Type-erased values stored in and returned by the registry.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// Identity and name of a type, captured at bind time.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// `TypeId` of the type
    pub id: TypeId,
    /// `std::any::type_name` of the type
    pub name: &'static str,
}

impl TypeInfo {
    /// Type info for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// True if this describes `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

/// A type-erased, shared value.
///
/// Internally holds an `Arc<T>` behind `dyn Any`, so unsized types such as
/// trait objects are stored the same way as concrete ones. Clones share the
/// same allocation.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::Value;
/// use std::sync::Arc;
///
/// let value = Value::new(Arc::new(7u8));
/// assert!(value.is::<u8>());
/// assert_eq!(*value.downcast::<u8>().unwrap(), 7);
/// assert!(value.downcast::<u16>().is_err());
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    ty: TypeInfo,
}

impl Value {
    /// Wraps a shared value of type `T`.
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            inner: Arc::new(value),
            ty: TypeInfo::of::<T>(),
        }
    }

    /// Wraps an owned value of type `T`.
    pub fn from_owned<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    /// The type this value was created from.
    pub fn type_info(&self) -> TypeInfo {
        self.ty
    }

    /// Name of the stored type.
    pub fn type_name(&self) -> &'static str {
        self.ty.name
    }

    /// True if the stored type is `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.ty.is::<T>()
    }

    /// Shared handle to the stored value, if it has type `T`.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.inner
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(DiError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: self.ty.name,
            })
    }

    /// True if both values share one allocation.
    pub fn ptr_eq(a: &Value, b: &Value) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("type", &self.ty.name).finish()
    }
}
