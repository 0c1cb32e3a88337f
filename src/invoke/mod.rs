//! Injected function calls.
//!
//! Any function or closure whose parameters all implement [`FromRegistry`]
//! can be called through the registry: each parameter is resolved in order,
//! the first failure aborts the call before the function runs, and the
//! return value is handed back either typed ([`Registry::invoke`]) or as an
//! ordered sequence of erased values ([`Registry::call`]).

use std::any::TypeId;

use crate::error::DiResult;
use crate::registry::Registry;
use crate::value::Value;

mod from_registry;

pub use from_registry::FromRegistry;
pub(crate) use from_registry::resolve_argument;

/// A callable whose parameters are supplied by the registry.
///
/// `Args` is the tuple of parameter types. It is implemented for every
/// `Fn(A1, .., An) -> R` with up to twelve parameters where each `Ai`
/// implements [`FromRegistry`]; closures need their parameter types spelled
/// out so the arity can be inferred.
pub trait Injectable<Args> {
    /// Return type of the callable
    type Output;

    /// Resolves every parameter, then calls.
    fn invoke(&self, registry: &Registry) -> DiResult<Self::Output>;
}

macro_rules! impl_injectable {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> Injectable<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R,
            $($arg: FromRegistry,)*
        {
            type Output = R;

            #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
            fn invoke(&self, registry: &Registry) -> DiResult<R> {
                let mut position = 0usize;
                $(
                    let $arg = resolve_argument::<$arg>(registry, position)?;
                    position += 1;
                )*
                Ok((self)($($arg),*))
            }
        }
    };
}

impl_injectable!();
impl_injectable!(A1);
impl_injectable!(A1, A2);
impl_injectable!(A1, A2, A3);
impl_injectable!(A1, A2, A3, A4);
impl_injectable!(A1, A2, A3, A4, A5);
impl_injectable!(A1, A2, A3, A4, A5, A6);
impl_injectable!(A1, A2, A3, A4, A5, A6, A7);
impl_injectable!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_injectable!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_injectable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_injectable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_injectable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

impl Registry {
    /// Calls `callback` with injected arguments and returns its results.
    ///
    /// A callback returning `()` yields an empty sequence; any other return
    /// value yields one element. When a parameter cannot be supplied the
    /// callback is not called and `ArgNotInstanced` is returned.
    ///
    /// ```rust
    /// use ferrous_registry::Registry;
    /// use std::sync::Arc;
    ///
    /// let registry = Registry::new();
    /// registry.bind_value(ferrous_registry::Key::of::<u32>(), 20u32).unwrap();
    ///
    /// let results = registry.call(|n: Arc<u32>| *n + 1).unwrap();
    /// assert_eq!(*results[0].downcast::<u32>().unwrap(), 21);
    ///
    /// assert!(registry.call(|_n: Arc<u32>| ()).unwrap().is_empty());
    /// ```
    pub fn call<Args, F>(&self, callback: F) -> DiResult<Vec<Value>>
    where
        F: Injectable<Args>,
        F::Output: Send + Sync + 'static,
    {
        let output = callback.invoke(self)?;
        if TypeId::of::<F::Output>() == TypeId::of::<()>() {
            return Ok(Vec::new());
        }
        Ok(vec![Value::from_owned(output)])
    }

    /// Calls `callback` with injected arguments and returns its own return value.
    pub fn invoke<Args, F>(&self, callback: F) -> DiResult<F::Output>
    where
        F: Injectable<Args>,
    {
        callback.invoke(self)
    }

    /// Calls `callback` with injected arguments, discarding its return value.
    pub fn resolve<Args, F>(&self, callback: F) -> DiResult<()>
    where
        F: Injectable<Args>,
    {
        callback.invoke(self).map(drop)
    }
}
