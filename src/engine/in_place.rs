//! Transitions applied to a record the caller already holds.
//!
//! The in-place path rewrites the state fields in memory and saves the whole
//! record unconditionally. It gives no protection against a concurrent
//! writer of the same id and is only correct when the caller is the sole
//! writer, for example a single process owning the record. Under contention
//! use [`StateMachine::apply_by_id`].

use crate::core::{Record, TransitionDef};
use crate::engine::error::TransitionError;
use crate::engine::machine::StateMachine;
use crate::engine::outcome::TransitionOutcome;
use crate::store::Store;
use tracing::debug;

impl<R: Record> StateMachine<R> {
    /// Apply a named transition to `record` and save it.
    ///
    /// Guard and hook rules match [`apply_by_id`](Self::apply_by_id). When
    /// the save fails the record's state fields are restored, so the caller
    /// never sees a half-applied transition.
    pub fn apply_to_instance<S>(
        &self,
        store: &S,
        transition: &str,
        record: &mut R,
    ) -> Result<TransitionOutcome<R>, TransitionError>
    where
        S: Store<R> + ?Sized,
    {
        let transition = self.lookup(transition)?;
        self.run_in_place(transition, store, record)
    }

    pub(crate) fn run_in_place<S>(
        &self,
        transition: &TransitionDef<R>,
        store: &S,
        record: &mut R,
    ) -> Result<TransitionOutcome<R>, TransitionError>
    where
        S: Store<R> + ?Sized,
    {
        let definition = self.definition();
        let Some(from) = definition.resolve_from(transition, record.state()) else {
            return self.not_applicable(transition, record.state());
        };

        self.check_guard(transition, record)?;

        let previous = record.state_fields();
        record.apply_state(&definition.update_for(&transition.to));
        if let Err(error) = store.save(record) {
            record.apply_state(&previous);
            return Err(error.into());
        }

        let state_changed = from != transition.to;
        debug!(
            transition = %transition.name,
            id = %record.id(),
            from,
            to = %transition.to,
            state_changed,
            "transition saved in place"
        );

        self.fire_hooks(transition, from, state_changed, record)?;

        Ok(TransitionOutcome::Applied {
            record: record.clone(),
            from: from.to_string(),
            to: transition.to.clone(),
            state_changed,
        })
    }
}
