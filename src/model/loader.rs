//! Process description loader.
//!
//! Parses YAML into a [`Document`]. The two top-level scalars are pulled
//! out; every other top-level key becomes a collection. Collections and
//! records written as YAML `null` load as empty.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::LoadError;
use crate::model::{Collection, Document, Record, is_file_name, scalar_text};

/// Top-level field holding the process name.
pub const PROCESS_NAME: &str = "process_name";

/// Top-level field holding the process description.
pub const PROCESS_DESCRIPTION: &str = "process_description";

const IN_MEMORY: &str = "<string>";

/// Loads a process description from a file.
///
/// # Errors
///
/// Returns `LoadError::Io` if the file cannot be read, `LoadError::Parse`
/// for malformed YAML or an unexpected document shape, and
/// `LoadError::MissingField` if a required top-level scalar is absent.
pub fn load(path: &Path) -> Result<Document, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = raw.len(), "read process description");
    parse(&raw, path)
}

/// Loads a process description from an in-memory string.
///
/// # Errors
///
/// Same as [`load`], minus I/O failures.
pub fn load_from_str(content: &str) -> Result<Document, LoadError> {
    parse(content, Path::new(IN_MEMORY))
}

fn parse(content: &str, origin: &Path) -> Result<Document, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let root: Value = serde_yaml::from_str(content).map_err(|e| LoadError::Parse {
        path: origin.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;

    let root = match root {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Err(shape_error(origin, "document is empty")),
        other => {
            return Err(shape_error(
                origin,
                format!(
                    "document root must be a mapping, found a {}",
                    crate::model::value_kind(&other)
                ),
            ));
        }
    };

    let process_name = required_scalar(&root, PROCESS_NAME, origin)?;
    let process_description = required_scalar(&root, PROCESS_DESCRIPTION, origin)?;

    let mut document = Document {
        process_name,
        process_description,
        ..Document::default()
    };

    for (key, value) in root {
        let name = key_text(&key, origin)?;
        if name == PROCESS_NAME || name == PROCESS_DESCRIPTION {
            continue;
        }
        if !is_file_name(&name) {
            return Err(shape_error(
                origin,
                format!("collection name '{name}' cannot be used as a folder name"),
            ));
        }

        let collection = parse_collection(&name, value, origin)?;
        tracing::trace!(collection = %name, records = collection.len(), "parsed collection");
        document.collections.insert(name, collection);
    }

    Ok(document)
}

fn required_scalar(root: &Mapping, field: &str, origin: &Path) -> Result<String, LoadError> {
    match root.get(field) {
        None | Some(Value::Null) => Err(LoadError::MissingField {
            path: origin.to_path_buf(),
            field: field.to_string(),
        }),
        Some(value) => scalar_text(value).ok_or_else(|| {
            shape_error(
                origin,
                format!(
                    "'{field}' must be a scalar, found a {}",
                    crate::model::value_kind(value)
                ),
            )
        }),
    }
}

fn parse_collection(name: &str, value: Value, origin: &Path) -> Result<Collection, LoadError> {
    let entries = match value {
        Value::Null => return Ok(Collection::new()),
        Value::Mapping(entries) => entries,
        other => {
            return Err(shape_error(
                origin,
                format!(
                    "collection '{name}' must be a mapping of records, found a {}",
                    crate::model::value_kind(&other)
                ),
            ));
        }
    };

    let mut collection = Collection::with_capacity(entries.len());
    for (key, value) in entries {
        let id = key_text(&key, origin)?;
        let record = parse_record(name, &id, value, origin)?;
        collection.insert(id, record);
    }
    Ok(collection)
}

fn parse_record(collection: &str, id: &str, value: Value, origin: &Path) -> Result<Record, LoadError> {
    let properties = match value {
        Value::Null => return Ok(Record::new()),
        Value::Mapping(properties) => properties,
        other => {
            return Err(shape_error(
                origin,
                format!(
                    "record '{id}' in collection '{collection}' must be a mapping, found a {}",
                    crate::model::value_kind(&other)
                ),
            ));
        }
    };

    let mut record = Record::with_capacity(properties.len());
    for (key, value) in properties {
        record.insert(key_text(&key, origin)?, value);
    }
    Ok(record)
}

fn key_text(key: &Value, origin: &Path) -> Result<String, LoadError> {
    scalar_text(key).ok_or_else(|| {
        shape_error(
            origin,
            format!("keys must be scalars, found a {}", crate::model::value_kind(key)),
        )
    })
}

fn shape_error(origin: &Path, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        path: origin.to_path_buf(),
        line: None,
        message: message.into(),
    }
}
