//! The document store collaborator.
//!
//! The engine only needs three operations from a store: read one record by
//! id, atomically rewrite its state fields when its current state still
//! equals an expected value, and save a whole record. [`MemoryStore`] is a
//! reference implementation; real backends implement [`Store`] over their
//! own conditional-update primitive (for example an update filtered on
//! `{_id, state}`).

mod document;
mod memory;

pub use document::Document;
pub use memory::MemoryStore;

use crate::core::{Record, StateUpdate};
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Counts reported by a conditional update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Records whose id and state matched the filter.
    pub matched: u64,
    /// Records whose fields actually changed.
    pub modified: u64,
}

/// A store call failed. The backend's error is kept as the source.
#[derive(Debug, Error)]
#[error("store {operation} failed: {source}")]
pub struct StoreError {
    pub operation: &'static str,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl StoreError {
    pub fn new(
        operation: &'static str,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}

/// Storage backend holding the authoritative record state.
pub trait Store<R: Record> {
    /// Read one record by id.
    fn find_one(&self, id: &R::Id) -> Result<Option<R>, StoreError>;

    /// Write `update` to the record with `id` only if its stored state still
    /// equals `expected_state`.
    ///
    /// Implementations must perform the check and the write as one atomic
    /// operation inside the store. A separate read followed by a write
    /// reintroduces the race this call exists to close.
    fn conditional_update(
        &self,
        id: &R::Id,
        expected_state: &str,
        update: &StateUpdate,
    ) -> Result<UpdateResult, StoreError>;

    /// Insert or overwrite a whole record.
    fn save(&self, record: &R) -> Result<(), StoreError>;
}

impl<R: Record, S: Store<R> + ?Sized> Store<R> for Arc<S> {
    fn find_one(&self, id: &R::Id) -> Result<Option<R>, StoreError> {
        (**self).find_one(id)
    }

    fn conditional_update(
        &self,
        id: &R::Id,
        expected_state: &str,
        update: &StateUpdate,
    ) -> Result<UpdateResult, StoreError> {
        (**self).conditional_update(id, expected_state, update)
    }

    fn save(&self, record: &R) -> Result<(), StoreError> {
        (**self).save(record)
    }
}
