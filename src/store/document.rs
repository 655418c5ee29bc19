//! A general-purpose record type backed by JSON attributes.

use crate::core::{Record, StateUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A document with a uuid identity, the two state fields the engine owns and
/// free-form attributes for guards and hooks to inspect.
///
/// # Example
///
/// ```rust
/// use docstate::core::{Record, StateUpdate};
/// use docstate::store::Document;
///
/// let doc = Document::new(StateUpdate { state: "a".into(), state_value: None })
///     .with_attribute("attr1", "hello");
///
/// assert_eq!(doc.state(), "a");
/// assert_eq!(doc.attribute_str("attr1"), Some("hello"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub state: String,
    #[serde(rename = "stateValue", default, skip_serializing_if = "Option::is_none")]
    pub state_value: Option<i64>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Document {
    /// New document with a fresh id, starting in the given state.
    pub fn new(initial: StateUpdate) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: initial.state,
            state_value: initial.state_value,
            updated_at: Utc::now(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Stamp `updated_at` with the current time. The engine never calls
    /// this; state writes leave every field but `state` and `stateValue`
    /// alone.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String attribute, `None` when absent or not a string.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }
}

impl Record for Document {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn state(&self) -> &str {
        &self.state
    }

    fn state_value(&self) -> Option<i64> {
        self.state_value
    }

    fn apply_state(&mut self, update: &StateUpdate) {
        self.state.clone_from(&update.state);
        self.state_value = update.state_value;
    }
}
