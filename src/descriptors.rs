//! Binding descriptors for introspection and diagnostics.

use crate::binding::BindingRecord;
use crate::key::Key;
use crate::lifetime::Lifetime;

/// Binding descriptor for introspection and diagnostics
///
/// A snapshot of one registered binding, taken by
/// [`Registry::descriptors`](crate::Registry::descriptors). Useful for
/// startup health checks and for inspecting what a registry was wired with.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Binding, Lifetime, Registry, Resolver};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {}
/// struct SystemClock;
/// impl Clock for SystemClock {}
///
/// let registry = Registry::new();
/// registry.bind_value("http.port", 8080u16).unwrap();
/// registry
///     .register(Binding::factory(|| SystemClock).provides(|c| c as Arc<dyn Clock>))
///     .unwrap();
///
/// let descriptors = registry.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let port = &descriptors[0];
/// assert!(port.is_named());
/// assert_eq!(port.type_name(), "u16");
/// assert!(port.materialized);
///
/// let clock = &descriptors[1];
/// assert_eq!(clock.index, 1);
/// assert_eq!(clock.lifetime, Lifetime::Singleton);
/// assert!(!clock.materialized);
/// assert!(clock.capabilities[0].contains("Clock"));
///
/// registry.get::<dyn Clock>().unwrap();
/// assert!(registry.descriptors()[1].materialized);
/// ```
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    /// The key the binding is stored under
    pub key: Key,
    /// Name of the produced type
    pub produced_type: &'static str,
    /// Binding lifetime
    pub lifetime: Lifetime,
    /// Position in registration order
    pub index: usize,
    /// Names of declared capability types
    pub capabilities: Vec<&'static str>,
    /// True if a value is currently cached
    pub materialized: bool,
    /// True if the binding runs a factory, false for precomputed values
    pub has_factory: bool,
}

impl BindingDescriptor {
    pub(crate) fn from_record(record: &BindingRecord) -> Self {
        Self {
            key: record.key.clone(),
            produced_type: record.produced.name,
            lifetime: record.lifetime,
            index: record.index,
            capabilities: record.capability_names(),
            materialized: record.is_materialized(),
            has_factory: record.has_factory(),
        }
    }

    /// True if the binding is stored under a named key.
    pub fn is_named(&self) -> bool {
        matches!(self.key, Key::Named(_))
    }

    /// Name of the produced type.
    pub fn type_name(&self) -> &'static str {
        self.produced_type
    }
}
