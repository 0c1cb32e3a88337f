//! Binding lifetime definitions.

/// Binding lifetimes controlling instance caching
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Lifetime, Registry, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let registry = Registry::new();
/// registry.bind(|| Database { url: "postgres://localhost".to_string() }, Lifetime::Singleton).unwrap();
/// registry.bind(|| RequestModel { id: 7 }, Lifetime::Prototype).unwrap();
///
/// let db1 = registry.get::<Database>().unwrap();
/// let db2 = registry.get::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// let m1 = registry.get::<RequestModel>().unwrap();
/// let m2 = registry.get::<RequestModel>().unwrap();
/// assert!(!Arc::ptr_eq(&m1, &m2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Produced once on first access and cached for the registry's lifetime
    ///
    /// Concurrent first accesses are serialized on the binding's own lock,
    /// so the factory runs once. A factory that fails, or produces an absent
    /// value, leaves nothing cached and runs again on the next access.
    #[default]
    Singleton,
    /// Produced fresh on every access, never cached
    ///
    /// No locking is done around the factory; it must be safe to run
    /// concurrently if the registry is shared between threads.
    Prototype,
}

impl Lifetime {
    /// True for [`Lifetime::Prototype`].
    pub fn is_prototype(self) -> bool {
        matches!(self, Lifetime::Prototype)
    }
}
