//! Transition execution against a document store.
//!
//! This module is the imperative shell around the pure [`core`](crate::core):
//! it reads records, evaluates guards, persists state and fires hooks.
//!
//! # Entry Points
//!
//! - **By id** ([`StateMachine::apply_by_id`]): compare-and-swap through the
//!   store's conditional update. Safe under any number of concurrent callers.
//! - **In place** ([`StateMachine::apply_to_instance`]): mutate and save a
//!   record the caller already holds. Only for single-writer contexts.
//!
//! Both paths fire hooks in the order behavior, exit, enter, and only after
//! the new state is persisted.

mod cas;
mod error;
mod in_place;
mod machine;
mod outcome;

pub use error::{GuardFailure, TransitionError};
pub use machine::{BoundTransition, StateMachine};
pub use outcome::TransitionOutcome;
