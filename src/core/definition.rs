//! The validated, immutable description of a machine.
//!
//! A [`Definition`] is built once from declared states and transitions and
//! never changes afterwards, so it can be shared freely between threads that
//! run transitions concurrently.

use crate::builder::BuildError;
use crate::core::record::StateUpdate;
use crate::core::state::StateDef;
use crate::core::transition::{Source, TransitionDef};
use std::collections::HashMap;

/// Validated states and transitions of one machine.
pub struct Definition<R> {
    states: Vec<StateDef<R>>,
    state_index: HashMap<String, usize>,
    transitions: Vec<TransitionDef<R>>,
    transition_index: HashMap<String, usize>,
    default_index: usize,
    value_mode: bool,
}

impl<R> Definition<R> {
    /// Validate declarations and build the definition.
    ///
    /// Fails when there are no states, a name repeats, more than one state
    /// is flagged default, only some states carry a value, or a transition
    /// references an undeclared state.
    pub fn build(
        states: Vec<StateDef<R>>,
        transitions: Vec<TransitionDef<R>>,
    ) -> Result<Self, BuildError> {
        let Some(first) = states.first() else {
            return Err(BuildError::NoStates);
        };
        let value_mode = first.value.is_some();

        let mut state_index = HashMap::with_capacity(states.len());
        let mut default_index: Option<usize> = None;
        for (index, state) in states.iter().enumerate() {
            if state_index.insert(state.name.clone(), index).is_some() {
                return Err(BuildError::DuplicateState(state.name.clone()));
            }

            if state.value.is_some() != value_mode {
                let missing = if value_mode { state } else { first };
                return Err(BuildError::PartialStateValues {
                    state: missing.name.clone(),
                });
            }

            if state.is_default {
                if let Some(previous) = default_index {
                    return Err(BuildError::MultipleDefaults {
                        first: states[previous].name.clone(),
                        second: state.name.clone(),
                    });
                }
                default_index = Some(index);
            }
        }

        let mut transition_index = HashMap::with_capacity(transitions.len());
        for (index, transition) in transitions.iter().enumerate() {
            if transition_index
                .insert(transition.name.clone(), index)
                .is_some()
            {
                return Err(BuildError::DuplicateTransition(transition.name.clone()));
            }

            if matches!(&transition.from, Source::AnyOf(names) if names.is_empty()) {
                return Err(BuildError::EmptySourceSet(transition.name.clone()));
            }

            let referenced = transition
                .from
                .names()
                .iter()
                .chain(std::iter::once(&transition.to));
            for state in referenced {
                if !state_index.contains_key(state) {
                    return Err(BuildError::UnknownState {
                        transition: transition.name.clone(),
                        state: state.clone(),
                    });
                }
            }
        }

        Ok(Self {
            states,
            state_index,
            transitions,
            transition_index,
            default_index: default_index.unwrap_or(0),
            value_mode,
        })
    }

    /// The state flagged default, or the first declared state.
    pub fn default_state(&self) -> &str {
        &self.states[self.default_index].name
    }

    /// State names in declaration order.
    pub fn state_names(&self) -> Vec<&str> {
        self.states.iter().map(|state| state.name.as_str()).collect()
    }

    /// Transition names in declaration order.
    pub fn transition_names(&self) -> Vec<&str> {
        self.transitions
            .iter()
            .map(|transition| transition.name.as_str())
            .collect()
    }

    pub fn state(&self, name: &str) -> Option<&StateDef<R>> {
        self.state_index.get(name).map(|&index| &self.states[index])
    }

    pub fn transition(&self, name: &str) -> Option<&TransitionDef<R>> {
        self.transition_index
            .get(name)
            .map(|&index| &self.transitions[index])
    }

    /// Whether every state carries an ordinal value.
    pub fn value_mode(&self) -> bool {
        self.value_mode
    }

    /// Declared ordinal of a state. `None` outside value mode or for an
    /// undeclared name.
    pub fn state_value(&self, name: &str) -> Option<i64> {
        self.state(name).and_then(|state| state.value)
    }

    /// The source state a transition would leave from, if `current`
    /// satisfies its `from` clause. Undeclared current states never match.
    pub fn resolve_from(&self, transition: &TransitionDef<R>, current: &str) -> Option<&str> {
        let state = self.state(current)?;
        transition
            .from
            .matches(current)
            .then_some(state.name.as_str())
    }

    /// Fields to write when entering `state`. The value is looked up, never
    /// computed.
    pub fn update_for(&self, state: &str) -> StateUpdate {
        StateUpdate {
            state: state.to_string(),
            state_value: self.state_value(state),
        }
    }

    /// Fields a freshly created record starts with.
    pub fn initial_update(&self) -> StateUpdate {
        self.update_for(self.default_state())
    }
}
