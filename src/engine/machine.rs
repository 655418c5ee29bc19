//! The shared machine handle and per-transition callables.

use crate::builder::MachineBuilder;
use crate::config::{EngineConfig, InapplicablePolicy};
use crate::core::{evaluate, Definition, Record, StateUpdate, TransitionDef};
use crate::engine::error::{GuardFailure, TransitionError};
use crate::engine::outcome::TransitionOutcome;
use crate::hooks::{dispatch, Hooks};
use crate::store::Store;
use std::sync::Arc;
use tracing::{debug, warn};

/// A validated state machine bound to a record type.
///
/// Cloning is cheap and every clone shares the same immutable definition,
/// so one machine can serve any number of concurrent callers. Transitions
/// are applied either by id through a store's conditional update
/// ([`apply_by_id`](Self::apply_by_id)) or to a record the caller already
/// holds exclusively ([`apply_to_instance`](Self::apply_to_instance)).
pub struct StateMachine<R: Record> {
    definition: Arc<Definition<R>>,
    config: EngineConfig,
}

impl<R: Record> Clone for StateMachine<R> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            config: self.config,
        }
    }
}

impl<R: Record> StateMachine<R> {
    pub fn new(definition: Definition<R>, config: EngineConfig) -> Self {
        Self {
            definition: Arc::new(definition),
            config,
        }
    }

    pub fn builder() -> MachineBuilder<R> {
        MachineBuilder::new()
    }

    pub fn definition(&self) -> &Definition<R> {
        &self.definition
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn default_state(&self) -> &str {
        self.definition.default_state()
    }

    /// Declared state names in declaration order.
    pub fn state_names(&self) -> Vec<&str> {
        self.definition.state_names()
    }

    pub fn transition_names(&self) -> Vec<&str> {
        self.definition.transition_names()
    }

    /// Ordinal value of a state; `None` unless the machine is in value mode.
    pub fn state_value(&self, state: &str) -> Option<i64> {
        self.definition.state_value(state)
    }

    /// State fields for a newly created record.
    pub fn initial_update(&self) -> StateUpdate {
        self.definition.initial_update()
    }

    /// Callable for one transition, checked to exist.
    pub fn transition(&self, name: &str) -> Result<BoundTransition<'_, R>, TransitionError> {
        Ok(BoundTransition {
            machine: self,
            transition: self.lookup(name)?,
        })
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<&TransitionDef<R>, TransitionError> {
        self.definition
            .transition(name)
            .ok_or_else(|| TransitionError::UnknownTransition(name.to_string()))
    }

    pub(crate) fn check_guard(
        &self,
        transition: &TransitionDef<R>,
        record: &R,
    ) -> Result<(), TransitionError> {
        let result = evaluate(transition.guard.as_ref(), record);
        match GuardFailure::from_result(result) {
            None => Ok(()),
            Some(failure) => {
                debug!(
                    transition = %transition.name,
                    id = %record.id(),
                    %failure,
                    "guard blocked transition"
                );
                Err(TransitionError::GuardFailed {
                    transition: transition.name.clone(),
                    failure,
                })
            }
        }
    }

    pub(crate) fn not_applicable(
        &self,
        transition: &TransitionDef<R>,
        current: &str,
    ) -> Result<TransitionOutcome<R>, TransitionError> {
        debug!(
            transition = %transition.name,
            from = %transition.from,
            current,
            "transition does not apply"
        );
        match self.config.on_inapplicable {
            InapplicablePolicy::NoOp => Ok(TransitionOutcome::NotApplicable {
                current: current.to_string(),
            }),
            InapplicablePolicy::Reject => Err(TransitionError::NotApplicable {
                transition: transition.name.clone(),
                current: current.to_string(),
            }),
        }
    }

    /// Run hooks for an applied transition. The state is already persisted.
    pub(crate) fn fire_hooks(
        &self,
        transition: &TransitionDef<R>,
        from: &str,
        state_changed: bool,
        record: &R,
    ) -> Result<(), TransitionError> {
        let hooks = Hooks {
            exit: self
                .definition
                .state(from)
                .and_then(|state| state.exit.as_ref()),
            behavior: transition.behavior.as_ref(),
            enter: self
                .definition
                .state(&transition.to)
                .and_then(|state| state.enter.as_ref()),
        };

        dispatch(hooks, state_changed, true, record).map_err(|failure| {
            warn!(
                transition = %transition.name,
                id = %record.id(),
                hook = %failure.kind,
                error = %failure.source,
                "hook failed after state was committed"
            );
            TransitionError::HookFailed {
                transition: transition.name.clone(),
                id: record.id().to_string(),
                from: from.to_string(),
                committed_state: record.state().to_string(),
                committed_value: record.state_value(),
                failure,
            }
        })
    }
}

/// One named transition of a machine, ready to apply.
///
/// Mirrors the two entry points of the machine: bound to a loaded record
/// ([`apply_to`](Self::apply_to)) or bound to a collection and parameterized
/// by id ([`apply_by_id`](Self::apply_by_id)).
pub struct BoundTransition<'m, R: Record> {
    machine: &'m StateMachine<R>,
    transition: &'m TransitionDef<R>,
}

impl<R: Record> BoundTransition<'_, R> {
    pub fn name(&self) -> &str {
        &self.transition.name
    }

    pub fn target(&self) -> &str {
        &self.transition.to
    }

    /// Race-safe application by id.
    pub fn apply_by_id<S>(&self, store: &S, id: &R::Id) -> Result<TransitionOutcome<R>, TransitionError>
    where
        S: Store<R> + ?Sized,
    {
        self.machine.run_by_id(self.transition, store, id)
    }

    /// In-place application; the caller must be the only writer of `record`.
    pub fn apply_to<S>(&self, store: &S, record: &mut R) -> Result<TransitionOutcome<R>, TransitionError>
    where
        S: Store<R> + ?Sized,
    {
        self.machine.run_in_place(self.transition, store, record)
    }
}
