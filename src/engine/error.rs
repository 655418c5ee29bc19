//! Errors returned by transition attempts.

use crate::core::{FieldError, GuardResult};
use crate::hooks::HookFailure;
use crate::store::StoreError;
use thiserror::Error;

/// Why a guard blocked a transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardFailure {
    /// A predicate guard returned false.
    #[error("{0}")]
    Rejected(String),

    /// Field validators produced messages; the caller records them on the
    /// record's validation state if it keeps one.
    #[error("invalid fields: {}", join_fields(.0))]
    Invalid(Vec<FieldError>),
}

impl GuardFailure {
    pub(crate) fn from_result(result: GuardResult) -> Option<Self> {
        match result {
            GuardResult::Pass => None,
            GuardResult::Reject(reason) => Some(Self::Rejected(reason)),
            GuardResult::Invalid(errors) => Some(Self::Invalid(errors)),
        }
    }

    /// Field errors, empty for a rejected predicate.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Rejected(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Message recorded for one field, if it failed.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.field_errors()
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur when applying a transition.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Unknown transition '{0}'")]
    UnknownTransition(String),

    #[error("No record found with id '{id}'")]
    NotFound { id: String },

    #[error("Transition '{transition}' does not apply to current state '{current}'")]
    NotApplicable { transition: String, current: String },

    #[error("Guard blocked transition '{transition}': {failure}")]
    GuardFailed {
        transition: String,
        failure: GuardFailure,
    },

    #[error("State of '{id}' changed from '{expected}' before transition '{transition}' was written")]
    StateChanged {
        transition: String,
        id: String,
        expected: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The new state is committed; only the hook after it failed.
    #[error("Transition '{transition}' committed state '{committed_state}' but {failure}")]
    HookFailed {
        transition: String,
        id: String,
        /// State the record was in when the transition was applied.
        from: String,
        committed_state: String,
        committed_value: Option<i64>,
        #[source]
        failure: HookFailure,
    },
}

impl TransitionError {
    /// Whether the caller may retry the same transition. Only a lost
    /// compare-and-swap race is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Guard failure details, if a guard blocked the transition.
    pub fn guard_failure(&self) -> Option<&GuardFailure> {
        match self {
            Self::GuardFailed { failure, .. } => Some(failure),
            _ => None,
        }
    }
}
