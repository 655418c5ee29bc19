//! Declared transitions and their source clauses.

use crate::core::guard::Guard;
use crate::hooks::Hook;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard source written as `"*"` in declarations.
pub const ANY_STATE: &str = "*";

/// The `from` clause of a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSource", into = "RawSource")]
pub enum Source {
    /// Matches exactly one state.
    One(String),
    /// Matches any state in the set.
    AnyOf(Vec<String>),
    /// Matches any declared state.
    Any,
}

impl Source {
    /// Whether `current` satisfies this clause. The wildcard matches any name;
    /// restricting it to declared states is the definition's job.
    pub fn matches(&self, current: &str) -> bool {
        match self {
            Source::One(name) => name == current,
            Source::AnyOf(names) => names.iter().any(|name| name == current),
            Source::Any => true,
        }
    }

    /// State names referenced by this clause.
    pub fn names(&self) -> &[String] {
        match self {
            Source::One(name) => std::slice::from_ref(name),
            Source::AnyOf(names) => names,
            Source::Any => &[],
        }
    }
}

impl From<&str> for Source {
    fn from(name: &str) -> Self {
        if name == ANY_STATE {
            Source::Any
        } else {
            Source::One(name.to_string())
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::One(name) => f.write_str(name),
            Source::AnyOf(names) => write!(f, "[{}]", names.join(", ")),
            Source::Any => f.write_str(ANY_STATE),
        }
    }
}

/// Wire shape of a source clause: `"a"`, `"*"` or `["a", "b"]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSource {
    Single(String),
    Many(Vec<String>),
}

impl From<RawSource> for Source {
    fn from(raw: RawSource) -> Self {
        match raw {
            RawSource::Single(name) => Source::from(name.as_str()),
            RawSource::Many(names) => Source::AnyOf(names),
        }
    }
}

impl From<Source> for RawSource {
    fn from(source: Source) -> Self {
        match source {
            Source::One(name) => RawSource::Single(name),
            Source::AnyOf(names) => RawSource::Many(names),
            Source::Any => RawSource::Single(ANY_STATE.to_string()),
        }
    }
}

/// A named move from one or more source states to a single destination.
pub struct TransitionDef<R> {
    pub name: String,
    pub from: Source,
    pub to: String,
    pub guard: Option<Guard<R>>,
    /// Fires whenever the transition is applied, even when `to` equals the
    /// current state.
    pub behavior: Option<Hook<R>>,
}

impl<R> Clone for TransitionDef<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            guard: self.guard.clone(),
            behavior: self.behavior.clone(),
        }
    }
}

impl<R> fmt::Debug for TransitionDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionDef")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guard", &self.guard)
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}
