//! Builder for declaring transitions.

use crate::builder::error::BuildError;
use crate::core::{FieldValidator, Guard, Predicate, Source, TransitionDef};
use crate::hooks::{Hook, HookError};
use std::sync::Arc;

/// Builder for one transition with a fluent API.
pub struct TransitionBuilder<R> {
    name: String,
    from: Option<Source>,
    to: Option<String>,
    predicate: Option<Predicate<R>>,
    validators: Vec<(String, FieldValidator<R>)>,
    behavior: Option<Hook<R>>,
}

impl<R> TransitionBuilder<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: None,
            to: None,
            predicate: None,
            validators: Vec::new(),
            behavior: None,
        }
    }

    /// Set a single source state (required). `"*"` means any state.
    pub fn from(mut self, state: &str) -> Self {
        self.from = Some(Source::from(state));
        self
    }

    /// Allow any of the given source states.
    pub fn from_any_of<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from = Some(Source::AnyOf(states.into_iter().map(Into::into).collect()));
        self
    }

    /// Allow every declared state as a source.
    pub fn from_any(mut self) -> Self {
        self.from = Some(Source::Any);
        self
    }

    pub(crate) fn source(mut self, source: Source) -> Self {
        self.from = Some(source);
        self
    }

    /// Set the destination state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Add a predicate guard.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Add a field validator. Returning a message blocks the transition.
    pub fn validate<F>(mut self, field: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.push((field.into(), Arc::new(validator)));
        self
    }

    /// Add a prebuilt guard of either kind.
    pub fn guard(mut self, guard: Guard<R>) -> Self {
        self.set_guard(guard);
        self
    }

    pub(crate) fn set_guard(&mut self, guard: Guard<R>) {
        match guard {
            Guard::Predicate(predicate) => self.predicate = Some(predicate),
            Guard::Fields(validators) => self.validators.extend(validators),
        }
    }

    /// Hook fired every time the transition applies.
    pub fn behavior<F>(mut self, hook: F) -> Self
    where
        F: Fn(&R) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.behavior = Some(Arc::new(hook));
        self
    }

    pub(crate) fn set_behavior(&mut self, hook: Hook<R>) {
        self.behavior = Some(hook);
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Build the transition.
    pub fn build(self) -> Result<TransitionDef<R>, BuildError> {
        let from = self
            .from
            .ok_or_else(|| BuildError::MissingSource(self.name.clone()))?;
        let to = self
            .to
            .ok_or_else(|| BuildError::MissingTarget(self.name.clone()))?;

        let guard = match (self.predicate, self.validators.is_empty()) {
            (Some(_), false) => return Err(BuildError::ConflictingGuards(self.name)),
            (Some(predicate), true) => Some(Guard::Predicate(predicate)),
            (None, false) => Some(Guard::Fields(self.validators)),
            (None, true) => None,
        };

        Ok(TransitionDef {
            name: self.name,
            from,
            to,
            guard,
            behavior: self.behavior,
        })
    }
}
