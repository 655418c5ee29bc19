//! Builder for constructing state machines.

use crate::builder::declaration::MachineDeclaration;
use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::config::EngineConfig;
use crate::core::{Definition, Guard, Record, StateDef};
use crate::engine::StateMachine;
use crate::hooks::HookError;
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// States and transitions keep the order they are added in. Hooks and
/// guards can be attached inline on the state and transition builders, or
/// afterwards by name, which is how a [`MachineDeclaration`] loaded from
/// JSON gets its behavior.
pub struct MachineBuilder<R: Record> {
    states: Vec<StateBuilder<R>>,
    transitions: Vec<TransitionBuilder<R>>,
    config: EngineConfig,
    unresolved: Vec<BuildError>,
}

impl<R: Record> MachineBuilder<R> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            config: EngineConfig::default(),
            unresolved: Vec::new(),
        }
    }

    /// Start from a data-only declaration.
    pub fn from_declaration(declaration: MachineDeclaration) -> Self {
        let mut builder = Self::new();
        for (name, state) in declaration.states {
            let mut state_builder = StateBuilder::new(name);
            if let Some(value) = state.value {
                state_builder = state_builder.value(value);
            }
            if state.default {
                state_builder = state_builder.default_state();
            }
            builder.states.push(state_builder);
        }
        for (name, transition) in declaration.transitions {
            builder.transitions.push(
                TransitionBuilder::new(name)
                    .source(transition.from)
                    .to(transition.to),
            );
        }
        builder
    }

    /// Add a state.
    pub fn state(mut self, state: StateBuilder<R>) -> Self {
        self.states.push(state);
        self
    }

    /// Add a transition.
    pub fn transition(mut self, transition: TransitionBuilder<R>) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach an enter hook to a state declared earlier.
    pub fn on_enter<F>(mut self, state: &str, hook: F) -> Self
    where
        F: Fn(&R) -> Result<(), HookError> + Send + Sync + 'static,
    {
        match self.find_state(state) {
            Some(target) => target.enter = Some(Arc::new(hook)),
            None => self.unresolved_state("enter hook", state),
        }
        self
    }

    /// Attach an exit hook to a state declared earlier.
    pub fn on_exit<F>(mut self, state: &str, hook: F) -> Self
    where
        F: Fn(&R) -> Result<(), HookError> + Send + Sync + 'static,
    {
        match self.find_state(state) {
            Some(target) => target.exit = Some(Arc::new(hook)),
            None => self.unresolved_state("exit hook", state),
        }
        self
    }

    /// Attach a behavior hook to a transition declared earlier.
    pub fn behavior<F>(mut self, transition: &str, hook: F) -> Self
    where
        F: Fn(&R) -> Result<(), HookError> + Send + Sync + 'static,
    {
        match self.find_transition(transition) {
            Some(target) => target.set_behavior(Arc::new(hook)),
            None => self.unresolved_transition("behavior hook", transition),
        }
        self
    }

    /// Attach a guard to a transition declared earlier.
    pub fn guard(mut self, transition: &str, guard: Guard<R>) -> Self {
        match self.find_transition(transition) {
            Some(target) => target.set_guard(guard),
            None => self.unresolved_transition("guard", transition),
        }
        self
    }

    /// Build the state machine.
    /// Returns an error if the declaration is malformed.
    pub fn build(self) -> Result<StateMachine<R>, BuildError> {
        if let Some(error) = self.unresolved.into_iter().next() {
            return Err(error);
        }

        let states = self.states.into_iter().map(StateBuilder::build).collect();
        let transitions = self
            .transitions
            .into_iter()
            .map(TransitionBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;

        let definition = Definition::build(states, transitions)?;
        Ok(StateMachine::new(definition, self.config))
    }

    fn find_state(&mut self, name: &str) -> Option<&mut StateDef<R>> {
        self.states
            .iter_mut()
            .find(|state| state.name() == name)
            .map(StateBuilder::state_mut)
    }

    fn find_transition(&mut self, name: &str) -> Option<&mut TransitionBuilder<R>> {
        self.transitions
            .iter_mut()
            .find(|transition| transition.name() == name)
    }

    fn unresolved_state(&mut self, kind: &'static str, name: &str) {
        self.unresolved.push(BuildError::UnknownHookTarget {
            kind,
            target: "state",
            name: name.to_string(),
        });
    }

    fn unresolved_transition(&mut self, kind: &'static str, name: &str) {
        self.unresolved.push(BuildError::UnknownHookTarget {
            kind,
            target: "transition",
            name: name.to_string(),
        });
    }
}

impl<R: Record> Default for MachineBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
