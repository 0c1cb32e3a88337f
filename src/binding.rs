//! Binding records and the builder used to register them.

use std::any::TypeId;
use std::error::Error as StdError;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{DiError, DiResult};
use crate::invoke::Injectable;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registry::Registry;
use crate::value::{TypeInfo, Value};

/// Type-erased factory.
///
/// Receives the registry so it can resolve its own dependencies. `Ok(None)`
/// means the factory ran but produced an absent value.
pub type RawFactory = Arc<dyn Fn(&Registry) -> DiResult<Option<Value>> + Send + Sync>;

/// Output of a fallible factory.
///
/// `Result<T, E>` carries a factory error; `Option<T>` carries an absent
/// product. Either way the produced type is `T`.
pub trait FactoryResult {
    /// The produced type
    type Product: Send + Sync + 'static;

    /// Splits the output into a product, an absent product, or an error.
    fn into_product(self) -> DiResult<Option<Arc<Self::Product>>>;
}

impl<T, E> FactoryResult for Result<T, E>
where
    T: Send + Sync + 'static,
    E: Into<Box<dyn StdError + Send + Sync + 'static>>,
{
    type Product = T;

    fn into_product(self) -> DiResult<Option<Arc<T>>> {
        match self {
            Ok(value) => Ok(Some(Arc::new(value))),
            Err(err) => Err(DiError::factory(err)),
        }
    }
}

impl<T: Send + Sync + 'static> FactoryResult for Option<T> {
    type Product = T;

    fn into_product(self) -> DiResult<Option<Arc<T>>> {
        Ok(self.map(Arc::new))
    }
}

/// Conversion from a binding's produced type to a capability type.
#[derive(Clone)]
pub(crate) struct Capability {
    pub(crate) ty: TypeInfo,
    cast: Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>,
}

impl Capability {
    fn new<T, C>(cast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            ty: TypeInfo::of::<C>(),
            cast: Arc::new(move |value: &Value| {
                value.downcast::<T>().ok().map(|arc| Value::new(cast(arc)))
            }),
        }
    }

    fn apply(&self, value: &Value) -> Option<Value> {
        (self.cast)(value)
    }
}

pub(crate) enum Source {
    Factory(Option<RawFactory>),
    Value(Option<Value>),
}

/// A binding under construction.
///
/// `T` is the produced type. The key defaults to `Key::of::<T>()` and the
/// lifetime to [`Lifetime::Singleton`].
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Binding, Registry, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String { format!("[console] {}", msg) }
/// }
///
/// let registry = Registry::new();
/// registry
///     .register(Binding::factory(|| ConsoleLogger).provides(|l| l as Arc<dyn Logger>))
///     .unwrap();
///
/// // No binding is keyed by `dyn Logger`; the capability match finds ConsoleLogger.
/// let logger = registry.get::<dyn Logger>().unwrap();
/// assert_eq!(logger.log("up"), "[console] up");
/// ```
pub struct Binding<T: ?Sized> {
    pub(crate) key: Option<Key>,
    pub(crate) lifetime: Lifetime,
    pub(crate) source: Source,
    pub(crate) capabilities: Vec<Capability>,
    _produces: PhantomData<fn() -> Arc<T>>,
}

impl<T: Send + Sync + 'static> Binding<T> {
    /// Binding produced by an injectable factory.
    ///
    /// The factory's parameters are resolved from the registry each time it runs.
    pub fn factory<Args, F>(factory: F) -> Self
    where
        F: Injectable<Args, Output = T> + Send + Sync + 'static,
        Args: 'static,
    {
        let raw: RawFactory = Arc::new(move |registry: &Registry| {
            let product = <F as Injectable<Args>>::invoke(&factory, registry)?;
            Ok(Some(Value::from_owned(product)))
        });
        Self::with_source(Source::Factory(Some(raw)))
    }

    /// Binding produced by a factory returning `Result<T, E>` or `Option<T>`.
    pub fn fallible<Args, F>(factory: F) -> Self
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: FactoryResult<Product = T>,
        Args: 'static,
    {
        let raw: RawFactory = Arc::new(move |registry: &Registry| {
            let output = <F as Injectable<Args>>::invoke(&factory, registry)?;
            Ok(output.into_product()?.map(Value::new))
        });
        Self::with_source(Source::Factory(Some(raw)))
    }

    /// Binding for a precomputed value.
    pub fn value(value: T) -> Self {
        Self::shared(Arc::new(value))
    }
}

impl<T: ?Sized + Send + Sync + 'static> Binding<T> {
    /// Binding for a precomputed shared value, including trait objects.
    pub fn shared(value: Arc<T>) -> Self {
        Self::with_source(Source::Value(Some(Value::new(value))))
    }

    fn with_source(source: Source) -> Self {
        Self {
            key: None,
            lifetime: Lifetime::Singleton,
            source,
            capabilities: Vec::new(),
            _produces: PhantomData,
        }
    }

    /// Stores the binding under `key` instead of the produced type.
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the lifetime. Ignored for precomputed values, which are always singletons.
    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Shorthand for `lifetime(Lifetime::Prototype)`.
    pub fn prototype(self) -> Self {
        self.lifetime(Lifetime::Prototype)
    }

    /// Declares that the produced value can also serve requests for `C`.
    ///
    /// Requests for type `C` that find no binding keyed by `C` fall back to
    /// the first binding, in registration order, that produces `C` or
    /// declares it here.
    pub fn provides<C>(mut self, cast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.push(Capability::new(cast));
        self
    }
}

/// One registered key with its factory and cached value.
pub(crate) struct BindingRecord {
    pub(crate) key: Key,
    pub(crate) produced: TypeInfo,
    pub(crate) lifetime: Lifetime,
    pub(crate) index: usize,
    pub(crate) capabilities: Vec<Capability>,
    factory: Option<RawFactory>,
    cached: Mutex<Option<Value>>,
    materialized: AtomicBool,
}

impl BindingRecord {
    pub(crate) fn new(
        key: Key,
        produced: TypeInfo,
        lifetime: Lifetime,
        index: usize,
        source: Source,
        capabilities: Vec<Capability>,
    ) -> Self {
        let (factory, cached, lifetime) = match source {
            Source::Factory(factory) => (factory, None, lifetime),
            Source::Value(value) => (None, value, Lifetime::Singleton),
        };

        Self {
            key,
            produced,
            lifetime,
            index,
            capabilities,
            factory,
            materialized: AtomicBool::new(cached.is_some()),
            cached: Mutex::new(cached),
        }
    }

    /// Returns the value, producing it if needed.
    ///
    /// Singletons hold the record lock across check-then-fill, so concurrent
    /// first accesses run the factory once. The slot is tested for absence,
    /// not for "already ran": an absent product is never cached.
    pub(crate) fn value(&self, registry: &Registry) -> DiResult<Option<Value>> {
        if self.lifetime.is_prototype() {
            return self.create(registry);
        }

        let mut cached = self.cached.lock();
        if let Some(value) = cached.as_ref() {
            return Ok(Some(value.clone()));
        }

        let value = self.create(registry)?;
        if let Some(value) = &value {
            *cached = Some(value.clone());
            self.materialized.store(true, Ordering::Release);
        }
        Ok(value)
    }

    fn create(&self, registry: &Registry) -> DiResult<Option<Value>> {
        let factory = self.factory.as_ref().ok_or_else(|| {
            DiError::InvalidArgs(format!("{} has neither a factory nor a value", self.key))
        })?;

        tracing::trace!(key = %self.key, lifetime = ?self.lifetime, "materializing binding");
        registry.stats_collector().record_materialization();

        match factory(registry)? {
            Some(value) if value.is::<()>() => Err(DiError::InvalidReturnValueCount(format!(
                "expect greater than 0, got 0 for {}",
                self.key
            ))),
            produced => Ok(produced),
        }
    }

    /// True if this record produces `id` or declares it as a capability.
    pub(crate) fn satisfies(&self, id: TypeId) -> bool {
        self.produced.id == id || self.capabilities.iter().any(|c| c.ty.id == id)
    }

    /// Converts `value` to the requested type through a capability, if one applies.
    pub(crate) fn convert(&self, value: Value, requested: Option<TypeId>) -> Value {
        let Some(id) = requested else {
            return value;
        };
        if value.type_info().id == id {
            return value;
        }
        self.capabilities
            .iter()
            .filter(|c| c.ty.id == id)
            .find_map(|c| c.apply(&value))
            .unwrap_or(value)
    }

    pub(crate) fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Never blocks, so it is safe to call while a factory holds the slot.
    pub(crate) fn is_materialized(&self) -> bool {
        self.materialized.load(Ordering::Acquire)
    }

    pub(crate) fn capability_names(&self) -> Vec<&'static str> {
        self.capabilities.iter().map(|c| c.ty.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(factory: RawFactory, lifetime: Lifetime) -> BindingRecord {
        BindingRecord::new(
            Key::named("test"),
            TypeInfo::of::<u32>(),
            lifetime,
            0,
            Source::Factory(Some(factory)),
            Vec::new(),
        )
    }

    #[test]
    fn singleton_caches_first_product() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rec = record(
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(Value::from_owned(5u32)))
            }),
            Lifetime::Singleton,
        );
        let registry = Registry::new();

        let a = rec.value(&registry).unwrap().unwrap();
        let b = rec.value(&registry).unwrap().unwrap();
        assert!(Value::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(rec.is_materialized());
    }

    #[test]
    fn absent_product_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rec = record(
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }),
            Lifetime::Singleton,
        );
        let registry = Registry::new();

        assert!(rec.value(&registry).unwrap().is_none());
        assert!(rec.value(&registry).unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!rec.is_materialized());
    }

    #[test]
    fn failure_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rec = record(
            Arc::new(move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(DiError::factory("warming up"))
                } else {
                    Ok(Some(Value::from_owned(9u32)))
                }
            }),
            Lifetime::Singleton,
        );
        let registry = Registry::new();

        assert!(matches!(rec.value(&registry), Err(DiError::Factory(_))));
        let value = rec.value(&registry).unwrap().unwrap();
        assert_eq!(*value.downcast::<u32>().unwrap(), 9);
    }

    #[test]
    fn unit_product_is_invalid_return_count() {
        let rec = record(Arc::new(|_| Ok(Some(Value::from_owned(())))), Lifetime::Prototype);
        let registry = Registry::new();
        assert!(matches!(
            rec.value(&registry),
            Err(DiError::InvalidReturnValueCount(_))
        ));
    }

    #[test]
    fn option_and_result_products() {
        assert!(Some(3u8).into_product().unwrap().is_some());
        assert!(None::<u8>.into_product().unwrap().is_none());
        let failed: Result<u8, String> = Err("boom".to_string());
        assert_eq!(failed.into_product().unwrap_err().to_string(), "boom");
    }
}
