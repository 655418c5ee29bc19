//! The record contract: what the engine needs to know about an entity.
//!
//! The engine never owns entity storage. It reads the identifier, the current
//! state name and (in value mode) the current ordinal, and rewrites only the
//! two state fields through a [`StateUpdate`].

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// The two state-bearing fields the engine is allowed to write.
///
/// `state_value` is `Some` exactly when the machine runs in value mode; the
/// value is always the destination state's declared ordinal, never computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub state: String,
    #[serde(rename = "stateValue", default, skip_serializing_if = "Option::is_none")]
    pub state_value: Option<i64>,
}

/// A state-machine-bearing record as seen by the engine.
///
/// # Example
///
/// ```rust
/// use docstate::core::{Record, StateUpdate};
///
/// #[derive(Clone, Debug)]
/// struct Ticket {
///     id: u64,
///     state: String,
///     rank: Option<i64>,
/// }
///
/// impl Record for Ticket {
///     type Id = u64;
///
///     fn id(&self) -> &u64 {
///         &self.id
///     }
///
///     fn state(&self) -> &str {
///         &self.state
///     }
///
///     fn state_value(&self) -> Option<i64> {
///         self.rank
///     }
///
///     fn apply_state(&mut self, update: &StateUpdate) {
///         self.state = update.state.clone();
///         self.rank = update.state_value;
///     }
/// }
///
/// let mut ticket = Ticket { id: 7, state: "open".into(), rank: None };
/// ticket.apply_state(&StateUpdate { state: "closed".into(), state_value: Some(2) });
/// assert_eq!(ticket.state(), "closed");
/// assert_eq!(ticket.state_value(), Some(2));
/// ```
pub trait Record: Clone + Debug + Send + Sync {
    /// Stable identifier used by the store to locate the record.
    type Id: Clone + Eq + Hash + Debug + Display + Send + Sync;

    fn id(&self) -> &Self::Id;

    /// Current state name.
    fn state(&self) -> &str;

    /// Current ordinal value, `None` when the machine has no value mode.
    fn state_value(&self) -> Option<i64>;

    /// Overwrite the state fields in memory.
    fn apply_state(&mut self, update: &StateUpdate);

    /// Capture the current state fields so they can be restored later.
    fn state_fields(&self) -> StateUpdate {
        StateUpdate {
            state: self.state().to_string(),
            state_value: self.state_value(),
        }
    }
}
