//! Race-safe transitions by id.
//!
//! The attempt reads the record, checks the `from` clause and the guard
//! against that snapshot, then writes the destination state with a
//! conditional update filtered on the state it read. The store evaluates
//! the filter and the write atomically, so among callers that read the same
//! state exactly one wins; the rest see zero matched records and get
//! [`TransitionError::StateChanged`]. Hooks run only for the winner, after
//! the write. Retrying is left to the caller: under a wildcard `from` a
//! blind retry could apply the transition to a state the caller never saw.

use crate::core::{Record, TransitionDef};
use crate::engine::error::TransitionError;
use crate::engine::machine::StateMachine;
use crate::engine::outcome::TransitionOutcome;
use crate::store::Store;
use tracing::{debug, warn};

impl<R: Record> StateMachine<R> {
    /// Apply a named transition to the record with `id` using a
    /// compare-and-swap against the store.
    ///
    /// # Example
    ///
    /// ```rust
    /// use docstate::builder::{StateBuilder, TransitionBuilder};
    /// use docstate::engine::StateMachine;
    /// use docstate::store::{Document, MemoryStore};
    ///
    /// let machine = StateMachine::<Document>::builder()
    ///     .state(StateBuilder::new("a"))
    ///     .state(StateBuilder::new("b"))
    ///     .transition(TransitionBuilder::new("x").from("a").to("b"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let store = MemoryStore::new();
    /// let doc = Document::new(machine.initial_update());
    /// store.insert(doc.clone());
    ///
    /// let outcome = machine.apply_by_id(&store, "x", &doc.id).unwrap();
    /// assert!(outcome.state_changed());
    /// assert_eq!(store.get(&doc.id).unwrap().state, "b");
    /// ```
    pub fn apply_by_id<S>(
        &self,
        store: &S,
        transition: &str,
        id: &R::Id,
    ) -> Result<TransitionOutcome<R>, TransitionError>
    where
        S: Store<R> + ?Sized,
    {
        let transition = self.lookup(transition)?;
        self.run_by_id(transition, store, id)
    }

    pub(crate) fn run_by_id<S>(
        &self,
        transition: &TransitionDef<R>,
        store: &S,
        id: &R::Id,
    ) -> Result<TransitionOutcome<R>, TransitionError>
    where
        S: Store<R> + ?Sized,
    {
        let Some(mut record) = store.find_one(id)? else {
            return Err(TransitionError::NotFound { id: id.to_string() });
        };

        let definition = self.definition();
        let Some(from) = definition.resolve_from(transition, record.state()) else {
            return self.not_applicable(transition, record.state());
        };

        self.check_guard(transition, &record)?;

        let update = definition.update_for(&transition.to);
        let result = store.conditional_update(id, from, &update)?;
        if result.matched == 0 {
            warn!(
                transition = %transition.name,
                %id,
                expected = from,
                "state changed concurrently; conditional update matched nothing"
            );
            return Err(TransitionError::StateChanged {
                transition: transition.name.clone(),
                id: id.to_string(),
                expected: from.to_string(),
            });
        }

        let state_changed = from != transition.to;
        record.apply_state(&update);
        debug!(
            transition = %transition.name,
            %id,
            from,
            to = %transition.to,
            state_changed,
            "transition committed"
        );

        self.fire_hooks(transition, from, state_changed, &record)?;

        Ok(TransitionOutcome::Applied {
            record,
            from: from.to_string(),
            to: transition.to.clone(),
            state_changed,
        })
    }
}
