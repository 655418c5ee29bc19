//! Core definition model of a state machine.
//!
//! This module contains the parts of the engine that never touch a store:
//! - Declared states and transitions
//! - Guards and their evaluation
//! - The validated, immutable [`Definition`]
//! - The [`Record`] contract the engine reads and rewrites

mod definition;
mod guard;
mod record;
mod state;
mod transition;

pub use definition::Definition;
pub use guard::{evaluate, FieldError, FieldValidator, Guard, GuardResult, Predicate};
pub use record::{Record, StateUpdate};
pub use state::StateDef;
pub use transition::{Source, TransitionDef, ANY_STATE};
