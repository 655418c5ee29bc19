//! Builder API for declaring state machines.
//!
//! This module provides fluent builders for states, transitions and whole
//! machines, plus [`MachineDeclaration`] for loading the data-only part of a
//! machine from JSON.

pub mod declaration;
pub mod error;
pub mod machine;
pub mod state;
pub mod transition;

pub use declaration::{MachineDeclaration, StateDeclaration, TransitionDeclaration};
pub use error::BuildError;
pub use machine::MachineBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;
