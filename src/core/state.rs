//! Declared states.

use crate::hooks::Hook;
use std::fmt;

/// A named state of a machine.
///
/// `value` is the optional ordinal used by callers for sorting and
/// comparison. Either every state of a machine carries one or none does.
pub struct StateDef<R> {
    pub name: String,
    pub value: Option<i64>,
    pub is_default: bool,
    pub enter: Option<Hook<R>>,
    pub exit: Option<Hook<R>>,
}

impl<R> StateDef<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            is_default: false,
            enter: None,
            exit: None,
        }
    }
}

impl<R> Clone for StateDef<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value,
            is_default: self.is_default,
            enter: self.enter.clone(),
            exit: self.exit.clone(),
        }
    }
}

impl<R> fmt::Debug for StateDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDef")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("is_default", &self.is_default)
            .field("enter", &self.enter.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}
