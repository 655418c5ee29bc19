//! Successful results of a transition attempt.

/// What a transition attempt did.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionOutcome<R> {
    /// The new state was persisted and hooks ran.
    Applied {
        /// The record as persisted, state fields already updated.
        record: R,
        from: String,
        to: String,
        /// `false` for a transition from a state to itself.
        state_changed: bool,
    },

    /// The record's current state does not satisfy the transition's `from`
    /// clause. Nothing was written and no hooks ran.
    NotApplicable { current: String },
}

impl<R> TransitionOutcome<R> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn state_changed(&self) -> bool {
        matches!(
            self,
            Self::Applied {
                state_changed: true,
                ..
            }
        )
    }

    pub fn record(&self) -> Option<&R> {
        match self {
            Self::Applied { record, .. } => Some(record),
            Self::NotApplicable { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<R> {
        match self {
            Self::Applied { record, .. } => Some(record),
            Self::NotApplicable { .. } => None,
        }
    }
}
