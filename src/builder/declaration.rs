//! Data-only machine declarations.
//!
//! A [`MachineDeclaration`] carries everything about a machine that is plain
//! data: state names, default flag, ordinal values, and transition sources and
//! targets. It deserializes from the JSON shape
//!
//! ```json
//! {
//!   "states": { "a": { "value": 0 }, "b": { "value": 10, "default": true } },
//!   "transitions": { "x": { "from": "a", "to": "b" }, "z": { "from": ["a", "b"], "to": "a" } }
//! }
//! ```
//!
//! keeping the order in which keys appear, since the first declared state is
//! the fallback default. Hooks and guards are attached in code by name.

use crate::core::Source;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDeclaration {
    pub from: Source,
    pub to: String,
}

/// Plain-data description of a machine, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineDeclaration {
    #[serde(with = "ordered")]
    pub states: Vec<(String, StateDeclaration)>,
    #[serde(default, with = "ordered")]
    pub transitions: Vec<(String, TransitionDeclaration)>,
}

impl MachineDeclaration {
    /// Parse a declaration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// (De)serialize `Vec<(String, T)>` as a map without losing key order.
mod ordered {
    use super::*;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, T>(entries: &Vec<(String, T)>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }

    struct OrderedVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of names to declarations")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry::<String, T>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }
}
