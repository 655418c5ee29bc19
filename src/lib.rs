//! Docstate: race-safe state machine transitions for stored records
//!
//! Docstate drives records whose authoritative state lives in an external,
//! concurrently accessed document store. A machine declares named states
//! (optionally carrying ordinal values) and named transitions between them;
//! applying a transition validates it with guards, persists it with an
//! atomic compare-and-swap, and fires lifecycle hooks exactly once per
//! successful transition.
//!
//! # Core Concepts
//!
//! - **Definition**: immutable, validated states and transitions
//! - **Guards**: a boolean predicate or per-field validators
//! - **Hooks**: behavior, exit and enter callbacks, fired in that order
//! - **Store**: the collaborator providing an atomic conditional update
//!
//! # Example
//!
//! ```rust
//! use docstate::builder::{StateBuilder, TransitionBuilder};
//! use docstate::engine::{StateMachine, TransitionOutcome};
//! use docstate::store::{Document, MemoryStore};
//!
//! let machine = StateMachine::<Document>::builder()
//!     .state(StateBuilder::new("draft").value(0))
//!     .state(StateBuilder::new("published").value(10))
//!     .transition(
//!         TransitionBuilder::new("publish")
//!             .from("draft")
//!             .to("published")
//!             .validate("title", |doc: &Document| {
//!                 doc.attribute_str("title").is_none().then(|| "required".to_string())
//!             }),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let store = MemoryStore::new();
//! let doc = Document::new(machine.initial_update()).with_attribute("title", "Hello");
//! store.insert(doc.clone());
//!
//! let outcome = machine.apply_by_id(&store, "publish", &doc.id).unwrap();
//! assert!(matches!(outcome, TransitionOutcome::Applied { state_changed: true, .. }));
//! assert_eq!(store.get(&doc.id).unwrap().state_value, Some(10));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod hooks;
pub mod store;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, StateBuilder, TransitionBuilder};
pub use config::{EngineConfig, InapplicablePolicy};
pub use self::core::{Guard, Record, StateUpdate};
pub use engine::{StateMachine, TransitionError, TransitionOutcome};
pub use store::{Document, MemoryStore, Store};
