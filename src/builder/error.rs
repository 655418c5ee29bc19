//! Construction errors for machine declarations.

use thiserror::Error;

/// A machine declaration was malformed. Raised once, at construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No states declared. Add at least one state")]
    NoStates,

    #[error("State '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("Transition '{0}' is declared more than once")]
    DuplicateTransition(String),

    #[error("States '{first}' and '{second}' are both flagged as default")]
    MultipleDefaults { first: String, second: String },

    #[error("State '{state}' has no value but other states do. Values are all-or-nothing")]
    PartialStateValues { state: String },

    #[error("Transition '{transition}' references undeclared state '{state}'")]
    UnknownState { transition: String, state: String },

    #[error("Transition '{0}' has an empty source set")]
    EmptySourceSet(String),

    #[error("Transition '{0}' source not specified. Call .from(state) or .from_any()")]
    MissingSource(String),

    #[error("Transition '{0}' target not specified. Call .to(state)")]
    MissingTarget(String),

    #[error("Transition '{0}' mixes a predicate guard with field validators")]
    ConflictingGuards(String),

    #[error("Cannot attach {kind} to undeclared {target} '{name}'")]
    UnknownHookTarget {
        kind: &'static str,
        target: &'static str,
        name: String,
    },
}
