//! Guards controlling whether a transition may fire.
//!
//! A guard is either a single boolean predicate or an ordered set of
//! per-field validators. Field validators are accumulated with Stillwater's
//! `Validation`, so every failing field is reported in one pass. Evaluation
//! is pure: the record is only borrowed, never written.

use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Boolean precondition over a record.
pub type Predicate<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Field validator: returns an error message when the field is invalid.
///
/// `None` and an empty message both mean the field passed.
pub type FieldValidator<R> = Arc<dyn Fn(&R) -> Option<String> + Send + Sync>;

/// A validation message attached to one field of the record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Precondition attached to a transition.
///
/// # Example
///
/// ```rust
/// use docstate::core::{Guard, GuardResult};
///
/// let guard = Guard::fields().field("title", |title: &String| {
///     title.is_empty().then(|| "required".to_string())
/// });
///
/// assert_eq!(guard.evaluate(&"draft".to_string()), GuardResult::Pass);
/// assert!(matches!(guard.evaluate(&String::new()), GuardResult::Invalid(_)));
/// ```
pub enum Guard<R> {
    Predicate(Predicate<R>),
    /// Validators in declaration order.
    Fields(Vec<(String, FieldValidator<R>)>),
}

impl<R> Guard<R> {
    /// Guard from a boolean predicate.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Guard::Predicate(Arc::new(predicate))
    }

    /// Empty field-validator guard; add validators with [`Guard::field`].
    pub fn fields() -> Self {
        Guard::Fields(Vec::new())
    }

    /// Add a field validator.
    ///
    /// On a predicate guard this replaces the predicate with a field guard
    /// holding only this validator.
    pub fn field<F>(self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        let mut validators = match self {
            Guard::Fields(validators) => validators,
            Guard::Predicate(_) => Vec::new(),
        };
        validators.push((name.into(), Arc::new(validator)));
        Guard::Fields(validators)
    }

    /// Evaluate the guard against a record snapshot.
    pub fn evaluate(&self, record: &R) -> GuardResult {
        match self {
            Guard::Predicate(predicate) => {
                if predicate(record) {
                    GuardResult::Pass
                } else {
                    GuardResult::Reject("guard failed".to_string())
                }
            }
            Guard::Fields(validators) => {
                let checks: Vec<Validation<(), NonEmptyVec<FieldError>>> = validators
                    .iter()
                    .map(|(field, validator)| check_field(field, validator, record))
                    .collect();

                match Validation::all_vec(checks) {
                    Validation::Success(_) => GuardResult::Pass,
                    Validation::Failure(errors) => {
                        GuardResult::Invalid(errors.iter().cloned().collect())
                    }
                }
            }
        }
    }
}

fn check_field<R>(
    field: &str,
    validator: &FieldValidator<R>,
    record: &R,
) -> Validation<(), NonEmptyVec<FieldError>> {
    match validator(record) {
        Some(message) if !message.is_empty() => Validation::fail(FieldError {
            field: field.to_string(),
            message,
        }),
        _ => Validation::success(()),
    }
}

impl<R> Clone for Guard<R> {
    fn clone(&self) -> Self {
        match self {
            Guard::Predicate(predicate) => Guard::Predicate(Arc::clone(predicate)),
            Guard::Fields(validators) => Guard::Fields(validators.clone()),
        }
    }
}

impl<R> fmt::Debug for Guard<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Predicate(_) => f.write_str("Guard::Predicate(..)"),
            Guard::Fields(validators) => f
                .debug_tuple("Guard::Fields")
                .field(&validators.iter().map(|(name, _)| name).collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Result of evaluating a guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardResult {
    Pass,
    /// A predicate guard returned false.
    Reject(String),
    /// One or more field validators produced a message.
    Invalid(Vec<FieldError>),
}

impl GuardResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, GuardResult::Pass)
    }
}

/// Evaluate an optional guard; a transition without a guard always passes.
pub fn evaluate<R>(guard: Option<&Guard<R>>, record: &R) -> GuardResult {
    guard.map_or(GuardResult::Pass, |guard| guard.evaluate(record))
}
