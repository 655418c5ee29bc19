//! Engine configuration.

use serde::{Deserialize, Serialize};

/// What to do when a transition's `from` clause does not match the record's
/// current state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InapplicablePolicy {
    /// Return [`TransitionOutcome::NotApplicable`](crate::engine::TransitionOutcome::NotApplicable).
    #[default]
    NoOp,
    /// Return [`TransitionError::NotApplicable`](crate::engine::TransitionError::NotApplicable).
    Reject,
}

/// Runtime options shared by every transition of a machine.
///
/// # Example
///
/// ```rust
/// use docstate::config::{EngineConfig, InapplicablePolicy};
///
/// let config: EngineConfig = serde_json::from_str(r#"{"on_inapplicable": "reject"}"#).unwrap();
/// assert_eq!(config.on_inapplicable, InapplicablePolicy::Reject);
///
/// let config: EngineConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config, EngineConfig::default());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub on_inapplicable: InapplicablePolicy,
}
