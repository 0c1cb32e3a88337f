//! Registry counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of a registry's counters.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Registry, Resolver};
///
/// let registry = Registry::new();
/// registry.singleton(|| 5u32).unwrap();
/// registry.get::<u32>().unwrap();
/// registry.get::<u32>().unwrap();
///
/// let stats = registry.stats();
/// assert_eq!(stats.registrations, 1);
/// assert_eq!(stats.lookups, 2);
/// assert_eq!(stats.materializations, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    /// Lookups performed, successful or not, including injected parameters
    pub lookups: u64,
    /// Factory runs
    pub materializations: u64,
    /// Bindings accepted
    pub registrations: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCollector {
    lookups: AtomicU64,
    materializations: AtomicU64,
    registrations: AtomicU64,
}

impl StatsCollector {
    pub(crate) fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_materialization(&self) {
        self.materializations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> RegistryStats {
        RegistryStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            materializations: self.materializations.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let collector = StatsCollector::default();
        collector.record_lookup();
        collector.record_lookup();
        collector.record_materialization();

        assert_eq!(
            collector.snapshot(),
            RegistryStats { lookups: 2, materializations: 1, registrations: 0 }
        );
    }
}
