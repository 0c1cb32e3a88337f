//! Exact-key and capability lookup.

use std::any::TypeId;
use std::sync::Arc;

use super::Registry;
use crate::binding::BindingRecord;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::traits::ResolverCore;
use crate::value::Value;

impl Registry {
    /// Finds the record for `key`.
    ///
    /// The read lock is released before the record is materialized, so
    /// factories are free to query the registry themselves.
    fn find(&self, key: &Key) -> DiResult<Arc<BindingRecord>> {
        let store = self.inner.store.read();
        if let Some(&index) = store.index.get(key) {
            return Ok(store.records[index].clone());
        }

        if let Some(requested) = key.type_id() {
            if let Some(record) = store.records.iter().find(|r| r.satisfies(requested)) {
                tracing::trace!(
                    requested = %key,
                    matched = %record.key,
                    index = record.index,
                    "capability match"
                );
                return Ok(record.clone());
            }
        }

        Err(DiError::ObjectNotFound(key.to_string()))
    }
}

impl ResolverCore for Registry {
    fn resolve_as(&self, key: &Key, requested: Option<TypeId>) -> DiResult<Value> {
        self.inner.stats.record_lookup();
        let record = self.find(key)?;
        let value = record
            .value(self)?
            .ok_or_else(|| DiError::AbsentValue(key.to_string()))?;
        Ok(record.convert(value, requested))
    }
}
