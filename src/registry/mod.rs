//! The registry: registration and ownership of binding records.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::binding::{Binding, BindingRecord, Capability, FactoryResult, RawFactory, Source};
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::invoke::Injectable;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::stats::{RegistryStats, StatsCollector};
use crate::value::{TypeInfo, Value};

mod lookup;

/// Type-directed dependency registry.
///
/// Bindings are registered by key, either a type or an application-chosen
/// name, and resolved later by key, by type, or by injecting them into a
/// function's parameters.
///
/// `Registry` is a cheap handle: clones share the same bindings. It is
/// `Send + Sync`; lookups of different bindings proceed in parallel and
/// registration is serialized. Registration is append-only: a key can be
/// bound once and is never replaced or removed.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Registry, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let registry = Registry::new();
/// registry.bind_value(ferrous_registry::Key::of::<Database>(), Database {
///     url: "postgres://localhost".to_string(),
/// }).unwrap();
/// registry.singleton(|db: Arc<Database>| UserService { db }).unwrap();
///
/// let users = registry.get::<UserService>().unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    store: RwLock<Store>,
    stats: StatsCollector,
}

#[derive(Default)]
struct Store {
    records: Vec<Arc<BindingRecord>>,
    index: HashMap<Key, usize>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                store: RwLock::new(Store::default()),
                stats: StatsCollector::default(),
            }),
        }
    }

    /// True if both handles refer to the same registry.
    pub fn ptr_eq(a: &Registry, b: &Registry) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    // ----- Values -----

    /// Binds a precomputed value under `key`.
    ///
    /// ```rust
    /// use ferrous_registry::{DiError, Registry, Resolver};
    ///
    /// let registry = Registry::new();
    /// registry.bind_value("greeting", "hello".to_string()).unwrap();
    /// assert!(matches!(
    ///     registry.bind_value("greeting", "again".to_string()),
    ///     Err(DiError::RepeatedBind(_))
    /// ));
    /// assert_eq!(*registry.get_by_key::<String>("greeting").unwrap(), "hello");
    /// ```
    pub fn bind_value<T>(&self, key: impl Into<Key>, value: T) -> DiResult<()>
    where
        T: Send + Sync + 'static,
    {
        self.register(Binding::value(value).key(key))
    }

    /// Binds a precomputed shared value under `key`; `T` may be a trait object.
    pub fn bind_shared<T>(&self, key: impl Into<Key>, value: Arc<T>) -> DiResult<()>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register(Binding::shared(value).key(key))
    }

    /// Binds an erased value; `None` is rejected with `InvalidArgs`.
    pub fn bind_raw_value(&self, key: impl Into<Key>, value: Option<Value>) -> DiResult<()> {
        let produced = value
            .as_ref()
            .map(Value::type_info)
            .unwrap_or_else(TypeInfo::of::<()>);
        self.insert(key.into(), produced, Lifetime::Singleton, Source::Value(value), Vec::new())
    }

    // ----- Factories -----

    /// Binds a factory under its output type.
    pub fn bind<Args, F>(&self, factory: F, lifetime: Lifetime) -> DiResult<()>
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: Send + Sync + 'static,
        Args: 'static,
    {
        self.register(Binding::factory(factory).lifetime(lifetime))
    }

    /// Binds a factory under `key`.
    pub fn bind_with_key<Args, F>(&self, key: impl Into<Key>, factory: F, lifetime: Lifetime) -> DiResult<()>
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: Send + Sync + 'static,
        Args: 'static,
    {
        self.register(Binding::factory(factory).key(key).lifetime(lifetime))
    }

    /// Binds a singleton factory under its output type.
    pub fn singleton<Args, F>(&self, factory: F) -> DiResult<()>
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: Send + Sync + 'static,
        Args: 'static,
    {
        self.bind(factory, Lifetime::Singleton)
    }

    /// Binds a singleton factory under `key`.
    pub fn singleton_with_key<Args, F>(&self, key: impl Into<Key>, factory: F) -> DiResult<()>
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: Send + Sync + 'static,
        Args: 'static,
    {
        self.bind_with_key(key, factory, Lifetime::Singleton)
    }

    /// Binds a prototype factory under its output type.
    pub fn prototype<Args, F>(&self, factory: F) -> DiResult<()>
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: Send + Sync + 'static,
        Args: 'static,
    {
        self.bind(factory, Lifetime::Prototype)
    }

    /// Binds a prototype factory under `key`.
    pub fn prototype_with_key<Args, F>(&self, key: impl Into<Key>, factory: F) -> DiResult<()>
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: Send + Sync + 'static,
        Args: 'static,
    {
        self.bind_with_key(key, factory, Lifetime::Prototype)
    }

    /// Binds a factory returning `Result<T, E>` or `Option<T>` under `T`.
    ///
    /// An `Err` is surfaced unchanged by the lookup that ran the factory and
    /// nothing is cached; the next lookup runs the factory again.
    ///
    /// ```rust
    /// use ferrous_registry::{DiError, Lifetime, Registry, Resolver};
    ///
    /// #[derive(Debug)]
    /// struct Pool;
    ///
    /// let registry = Registry::new();
    /// registry
    ///     .bind_fallible(|| Err::<Pool, _>("database unreachable"), Lifetime::Singleton)
    ///     .unwrap();
    ///
    /// let err = registry.get::<Pool>().unwrap_err();
    /// assert_eq!(err.to_string(), "database unreachable");
    /// ```
    pub fn bind_fallible<Args, F>(&self, factory: F, lifetime: Lifetime) -> DiResult<()>
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: FactoryResult,
        Args: 'static,
    {
        self.register(Binding::<<F::Output as FactoryResult>::Product>::fallible(factory).lifetime(lifetime))
    }

    /// Binds a fallible factory under `key`.
    pub fn bind_fallible_with_key<Args, F>(
        &self,
        key: impl Into<Key>,
        factory: F,
        lifetime: Lifetime,
    ) -> DiResult<()>
    where
        F: Injectable<Args> + Send + Sync + 'static,
        F::Output: FactoryResult,
        Args: 'static,
    {
        self.register(
            Binding::<<F::Output as FactoryResult>::Product>::fallible(factory)
                .key(key)
                .lifetime(lifetime),
        )
    }

    /// Binds an erased factory producing values of type `produced`.
    ///
    /// `None` is rejected with `InvalidArgs`.
    pub fn bind_raw(
        &self,
        key: impl Into<Key>,
        produced: TypeInfo,
        factory: Option<RawFactory>,
        lifetime: Lifetime,
    ) -> DiResult<()> {
        self.insert(key.into(), produced, lifetime, Source::Factory(factory), Vec::new())
    }

    /// Registers a binding built with [`Binding`].
    pub fn register<T>(&self, binding: Binding<T>) -> DiResult<()>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let Binding { key, lifetime, source, capabilities, .. } = binding;
        let key = key.unwrap_or_else(Key::of::<T>);
        self.insert(key, TypeInfo::of::<T>(), lifetime, source, capabilities)
    }

    fn insert(
        &self,
        key: Key,
        produced: TypeInfo,
        lifetime: Lifetime,
        source: Source,
        capabilities: Vec<Capability>,
    ) -> DiResult<()> {
        match &source {
            Source::Factory(None) => return Err(DiError::InvalidArgs("factory is absent".to_string())),
            Source::Factory(Some(_)) if produced.is::<()>() => {
                return Err(DiError::InvalidArgs(
                    "expect factory to produce a value, but it returns ()".to_string(),
                ))
            }
            Source::Value(None) => return Err(DiError::InvalidArgs("value is absent".to_string())),
            _ => {}
        }

        let mut store = self.inner.store.write();
        if store.index.contains_key(&key) {
            return Err(DiError::RepeatedBind(key.to_string()));
        }

        let index = store.records.len();
        let record = BindingRecord::new(key.clone(), produced, lifetime, index, source, capabilities);
        tracing::debug!(
            key = %key,
            produced = produced.name,
            lifetime = ?record.lifetime,
            index,
            "binding registered"
        );
        store.records.push(Arc::new(record));
        store.index.insert(key, index);
        self.inner.stats.record_registration();
        Ok(())
    }

    // ----- Introspection -----

    /// True if a binding is stored under exactly `key`.
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.inner.store.read().index.contains_key(&key.into())
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.inner.store.read().records.len()
    }

    /// True if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptors of every binding, in registration order.
    ///
    /// Safe to call from inside a factory: the registry lock is released
    /// before the records are inspected.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        let records: Vec<Arc<BindingRecord>> = self.inner.store.read().records.clone();
        records
            .iter()
            .map(|record| BindingDescriptor::from_record(record))
            .collect()
    }

    /// Snapshot of the registry's counters.
    pub fn stats(&self) -> RegistryStats {
        self.inner.stats.snapshot()
    }

    pub(crate) fn stats_collector(&self) -> &StatsCollector {
        &self.inner.stats
    }

    /// Human-readable dump of every binding, in registration order.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Registry Debug ===\n");
        for d in self.descriptors() {
            s.push_str(&format!(
                "  #{} {}: {} {:?}{}\n",
                d.index,
                d.key,
                d.produced_type,
                d.lifetime,
                if d.materialized { " (materialized)" } else { "" }
            ));
            for capability in &d.capabilities {
                s.push_str(&format!("      provides {}\n", capability));
            }
        }
        s
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("bindings", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
