//! Builder for declaring states.

use crate::core::StateDef;
use crate::hooks::HookError;
use std::sync::Arc;

/// Builder for one state with a fluent API.
pub struct StateBuilder<R> {
    state: StateDef<R>,
}

impl<R> StateBuilder<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: StateDef::new(name),
        }
    }

    /// Set the ordinal value. Every state of the machine must then have one.
    pub fn value(mut self, value: i64) -> Self {
        self.state.value = Some(value);
        self
    }

    /// Flag this state as the default for new records.
    pub fn default_state(mut self) -> Self {
        self.state.is_default = true;
        self
    }

    /// Hook fired after a transition enters this state from another one.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&R) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.state.enter = Some(Arc::new(hook));
        self
    }

    /// Hook fired after a transition leaves this state for another one.
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&R) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.state.exit = Some(Arc::new(hook));
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.state.name
    }

    pub(crate) fn state_mut(&mut self) -> &mut StateDef<R> {
        &mut self.state
    }

    pub fn build(self) -> StateDef<R> {
        self.state
    }
}
