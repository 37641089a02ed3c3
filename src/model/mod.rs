//! In-memory process description.
//!
//! A [`Document`] holds the two top-level scalars plus an ordered set of
//! collections. Records keep their raw YAML values; the renderer decides
//! which shapes it can serialize.

pub mod loader;
pub mod schema;

use indexmap::IndexMap;
use serde_yaml::Value;

pub use loader::{load, load_from_str};
pub use schema::{Relation, Schema};

/// Property name holding a record's display name.
pub const NAME_PROPERTY: &str = "name";

/// A single entity: property name to raw value, in document order.
pub type Record = IndexMap<String, Value>;

/// A named set of records keyed by identifier, in document order.
pub type Collection = IndexMap<String, Record>;

/// A parsed process description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Value of the top-level `process_name` field.
    pub process_name: String,

    /// Value of the top-level `process_description` field.
    pub process_description: String,

    /// Every other top-level entry, by collection name.
    pub collections: IndexMap<String, Collection>,
}

impl Document {
    /// Returns the named collection, if present.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Returns a record by collection and identifier.
    #[must_use]
    pub fn record(&self, collection: &str, id: &str) -> Option<&Record> {
        self.collections.get(collection)?.get(id)
    }

    /// Returns the display name of a record, if it has a usable one.
    #[must_use]
    pub fn display_name(&self, collection: &str, id: &str) -> Option<&str> {
        self.record(collection, id).and_then(display_name)
    }

    /// Total number of records across all collections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.collections.values().map(IndexMap::len).sum()
    }
}

/// Returns the non-empty string `name` of a record.
#[must_use]
pub fn display_name(record: &Record) -> Option<&str> {
    match record.get(NAME_PROPERTY) {
        Some(Value::String(name)) if !name.is_empty() => Some(name),
        _ => None,
    }
}

/// Whether `name` can be used as a single path component: non-empty, not
/// `.` or `..`, and free of path separators.
#[must_use]
pub fn is_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Text form of a scalar usable as an identifier or list item.
///
/// Strings are returned as-is; numbers and booleans are stringified. Null,
/// sequences, mappings and tagged values yield `None`.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Short description of a value's shape, used in error messages.
#[must_use]
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
