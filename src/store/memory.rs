//! In-process store with an atomic conditional update.

use crate::core::{Record, StateUpdate};
use crate::store::{Store, StoreError, UpdateResult};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Records kept in a map behind a read-write lock.
///
/// `conditional_update` checks the stored state and writes the new fields
/// while holding the write lock, which gives it the same test-and-set
/// semantics as a filtered update in a document database.
pub struct MemoryStore<R: Record> {
    records: RwLock<HashMap<R::Id, R>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: R) {
        self.records.write().insert(record.id().clone(), record);
    }

    pub fn get(&self, id: &R::Id) -> Option<R> {
        self.records.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Store<R> for MemoryStore<R> {
    fn find_one(&self, id: &R::Id) -> Result<Option<R>, StoreError> {
        Ok(self.get(id))
    }

    fn conditional_update(
        &self,
        id: &R::Id,
        expected_state: &str,
        update: &StateUpdate,
    ) -> Result<UpdateResult, StoreError> {
        let mut records = self.records.write();
        let Some(record) = records
            .get_mut(id)
            .filter(|record| record.state() == expected_state)
        else {
            return Ok(UpdateResult::default());
        };

        // Same-state writes match but modify nothing.
        let modified = u64::from(record.state_fields() != *update);
        record.apply_state(update);
        Ok(UpdateResult {
            matched: 1,
            modified,
        })
    }

    fn save(&self, record: &R) -> Result<(), StoreError> {
        self.insert(record.clone());
        Ok(())
    }
}
