//! The tagged key-value save tree.
//!
//! The host engine persists equipment state as a generic tagged tree: string
//! keys mapping to scalar values, lists, or nested compounds. [`TagCompound`]
//! is this library's view of that format. It is deliberately schema-free --
//! upgrade and tracker payloads are opaque compounds owned by whoever wrote
//! them.
//!
//! Fractional values are [`Decimal`], not floats, so payloads compare exactly
//! and round-trip without drift.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One value in the save tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// A signed integer.
    Int(i64),
    /// A fixed-point decimal.
    Decimal(Decimal),
    /// A boolean flag.
    Bool(bool),
    /// A UTF-8 string.
    Text(String),
    /// An ordered list of tags.
    List(Vec<Tag>),
    /// A nested compound.
    Compound(TagCompound),
}

/// A string-keyed map of [`Tag`] values -- one node of the save tree.
///
/// Keys are ordered (`BTreeMap`) so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagCompound {
    entries: BTreeMap<String, Tag>,
}

impl TagCompound {
    /// Create an empty compound.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of entries in this compound.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this compound has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the compound contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over `(key, tag)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert a raw tag, replacing any previous value at `key`.
    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) {
        self.entries.insert(key.into(), tag);
    }

    /// Insert an integer value.
    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.insert(key, Tag::Int(value));
    }

    /// Insert an unsigned counter value (stored as [`Tag::Int`]).
    pub fn set_u32(&mut self, key: impl Into<String>, value: u32) {
        self.insert(key, Tag::Int(i64::from(value)));
    }

    /// Insert a decimal value.
    pub fn set_decimal(&mut self, key: impl Into<String>, value: Decimal) {
        self.insert(key, Tag::Decimal(value));
    }

    /// Insert a boolean value.
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.insert(key, Tag::Bool(value));
    }

    /// Insert a string value.
    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, Tag::Text(value.into()));
    }

    /// Insert a list value.
    pub fn set_list(&mut self, key: impl Into<String>, value: Vec<Tag>) {
        self.insert(key, Tag::List(value));
    }

    /// Insert a nested compound.
    pub fn set_compound(&mut self, key: impl Into<String>, value: Self) {
        self.insert(key, Tag::Compound(value));
    }

    /// Look up a raw tag.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    /// Look up an integer value. `None` if absent or a different tag type.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(Tag::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up an unsigned counter value.
    ///
    /// `None` if absent, a different tag type, or out of `u32` range --
    /// callers treat all three as a missing record.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get_int(key).and_then(|v| u32::try_from(v).ok())
    }

    /// Look up a decimal value. `None` if absent or a different tag type.
    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        match self.entries.get(key) {
            Some(Tag::Decimal(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up a boolean value. `None` if absent or a different tag type.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(Tag::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Look up a string value. `None` if absent or a different tag type.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Tag::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Look up a list value. `None` if absent or a different tag type.
    pub fn get_list(&self, key: &str) -> Option<&[Tag]> {
        match self.entries.get(key) {
            Some(Tag::List(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Look up a nested compound. `None` if absent or a different tag type.
    pub fn get_compound(&self, key: &str) -> Option<&Self> {
        match self.entries.get(key) {
            Some(Tag::Compound(v)) => Some(v),
            _ => None,
        }
    }
}
