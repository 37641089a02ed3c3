//! Front matter rendering.
//!
//! Turns each record into a Markdown artifact whose front matter carries the
//! identifier, the collection as layout, and every property. Foreign keys are
//! resolved to `identifier: "display name"` mappings so templates can link
//! without further lookups.

pub mod yaml;

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::RenderError;
use crate::model::{Document, Record, Schema, is_file_name, scalar_text, value_kind};

/// Front matter key holding the record identifier.
pub const PK_KEY: &str = "pk";

/// Front matter key holding the layout (the collection name).
pub const LAYOUT_KEY: &str = "layout";

/// Front matter delimiter line.
pub const DELIMITER: &str = "---";

/// A rendered record, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Record identifier.
    pub identifier: String,

    /// Full file content.
    pub content: String,
}

impl Artifact {
    /// File name of the artifact inside its collection folder.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.md", self.identifier)
    }
}

/// Renders records of one document against a schema.
///
/// Borrows the document immutably; enrichment must already have run.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    document: &'a Document,
    schema: &'a Schema,
}

/// Where a property lives, for error reporting.
#[derive(Clone, Copy)]
struct Location<'a> {
    collection: &'a str,
    record: &'a str,
    property: &'a str,
}

impl Location<'_> {
    fn unsupported(&self, kind: impl Into<String>) -> RenderError {
        RenderError::UnsupportedValue {
            collection: self.collection.to_string(),
            record: self.record.to_string(),
            property: self.property.to_string(),
            kind: kind.into(),
        }
    }
}

impl<'a> Renderer<'a> {
    /// Creates a renderer over an enriched document.
    #[must_use]
    pub const fn new(document: &'a Document, schema: &'a Schema) -> Self {
        Self { document, schema }
    }

    /// Renders one record of `collection`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Resolution` when a foreign key names a record
    /// that is missing or has no name, `RenderError::UnsupportedValue` for
    /// values that cannot be written as front matter, and
    /// `RenderError::ReservedProperty` if the record defines `pk` or `layout`.
    pub fn render_record(
        &self,
        collection: &str,
        id: &str,
        record: &Record,
    ) -> Result<Artifact, RenderError> {
        if !is_file_name(id) {
            return Err(RenderError::InvalidIdentifier {
                collection: collection.to_string(),
                record: id.to_string(),
            });
        }

        let mut lines = vec![
            DELIMITER.to_string(),
            format!("{PK_KEY}: {}", yaml::key(id)),
            format!("{LAYOUT_KEY}: {}", yaml::key(collection)),
        ];

        for (property, value) in record {
            let location = Location {
                collection,
                record: id,
                property,
            };

            if property == PK_KEY || property == LAYOUT_KEY {
                return Err(RenderError::ReservedProperty {
                    collection: collection.to_string(),
                    record: id.to_string(),
                    property: property.clone(),
                });
            }

            self.render_property(location, value, &mut lines)?;
        }

        lines.push(DELIMITER.to_string());

        let mut content = lines.join("\n");
        content.push('\n');
        Ok(Artifact {
            identifier: id.to_string(),
            content,
        })
    }

    /// Renders every record of a collection, stopping at the first error.
    ///
    /// An absent collection renders as empty.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Renderer::render_record`].
    pub fn render_collection(&self, collection: &str) -> Result<Vec<Artifact>, RenderError> {
        let Some(records) = self.document.collection(collection) else {
            return Ok(Vec::new());
        };

        records
            .iter()
            .map(|(id, record)| self.render_record(collection, id, record))
            .collect()
    }

    /// Renders a collection into `dir`, one `<identifier>.md` per record.
    ///
    /// A file already present at an artifact's path is deleted before the
    /// new one is written. Returns the number of artifacts written.
    ///
    /// # Errors
    ///
    /// Returns the first rendering error, or `RenderError::Io` if a file
    /// cannot be removed or written.
    pub fn write_collection(&self, collection: &str, dir: &Path) -> Result<usize, RenderError> {
        let artifacts = self.render_collection(collection)?;

        for artifact in &artifacts {
            let path = dir.join(artifact.file_name());
            replace_file(&path, &artifact.content)?;
            tracing::trace!(path = %path.display(), "wrote artifact");
        }

        Ok(artifacts.len())
    }

    fn render_property(
        &self,
        location: Location<'_>,
        value: &Value,
        lines: &mut Vec<String>,
    ) -> Result<(), RenderError> {
        let key = yaml::key(location.property);

        if value.is_null() {
            lines.push(format!("{key}:"));
            return Ok(());
        }

        if self.schema.is_markdown(location.property) {
            if let Value::String(text) = value {
                lines.extend(yaml::literal_block(&key, text));
                return Ok(());
            }
        }

        if let Some(target) = self.schema.foreign_key_target(location.property) {
            return self.render_references(location, &key, target, value, lines);
        }

        match value {
            Value::String(text) => lines.push(format!("{key}: {}", yaml::quote(text))),
            Value::Bool(flag) => lines.push(format!("{key}: {}", yaml::quote(bool_text(*flag)))),
            Value::Sequence(items) if items.is_empty() => lines.push(format!("{key}: []")),
            Value::Sequence(items) => {
                lines.push(format!("{key}:"));
                for item in items {
                    let text = item_text(item).ok_or_else(|| {
                        location.unsupported(format!("sequence containing a {}", value_kind(item)))
                    })?;
                    lines.push(format!("  - {}", yaml::quote(&text)));
                }
            }
            other => return Err(location.unsupported(value_kind(other))),
        }

        Ok(())
    }

    fn render_references(
        &self,
        location: Location<'_>,
        key: &str,
        target: &str,
        value: &Value,
        lines: &mut Vec<String>,
    ) -> Result<(), RenderError> {
        let Value::Sequence(items) = value else {
            return Err(location.unsupported(format!(
                "{} where a list of {target} identifiers is expected",
                value_kind(value)
            )));
        };

        if items.is_empty() {
            lines.push(format!("{key}: {{}}"));
            return Ok(());
        }

        lines.push(format!("{key}:"));
        let mut seen: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            let target_id = scalar_text(item).ok_or_else(|| {
                location.unsupported(format!("sequence containing a {}", value_kind(item)))
            })?;

            let name = self
                .document
                .display_name(target, &target_id)
                .ok_or_else(|| self.resolution_error(location, target, &target_id))?;

            // A mapping cannot repeat a key; the first occurrence wins.
            if seen.contains(&target_id) {
                continue;
            }
            lines.push(format!("  {}: {}", yaml::key(&target_id), yaml::quote(name)));
            seen.push(target_id);
        }

        Ok(())
    }

    fn resolution_error(&self, location: Location<'_>, target: &str, target_id: &str) -> RenderError {
        RenderError::Resolution {
            collection: location.collection.to_string(),
            record: location.record.to_string(),
            property: location.property.to_string(),
            target_collection: target.to_string(),
            target: target_id.to_string(),
            suggestion: self.suggest(target, target_id),
        }
    }

    /// Closest identifier in `collection` within edit distance 3.
    fn suggest(&self, collection: &str, id: &str) -> Option<String> {
        self.document
            .collection(collection)?
            .keys()
            .filter(|candidate| candidate.as_str() != id)
            .map(|candidate| (candidate, strsim::damerau_levenshtein(id, candidate)))
            .filter(|(_, dist)| *dist <= 3)
            .min_by_key(|(_, dist)| *dist)
            .map(|(candidate, _)| candidate.clone())
    }
}

/// Deletes `path` if it is a file, then writes `content` there.
fn replace_file(path: &Path, content: &str) -> Result<(), RenderError> {
    let io_error = |source| RenderError::Io {
        path: PathBuf::from(path),
        source,
    };

    if path.is_file() {
        fs::remove_file(path).map_err(io_error)?;
    }
    fs::write(path, content).map_err(io_error)
}

/// Booleans are written capitalized, the form existing site templates
/// compare against.
const fn bool_text(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::Bool(flag) => Some(bool_text(*flag).to_string()),
        other => scalar_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich;
    use crate::model::load_from_str;

    const PROCESS: &str = r#"
process_name: Demo
process_description: Demo process
roles:
  dev:
    name: Developer
    description: |
      Writes the code.

      Reviews it too.
    external: false
  qa:
    name: Tester
activities:
  design:
    name: Design
    participant_roles: [dev, qa]
    tags: [early, "needs: review"]
    optional: true
    predecessor:
  build:
    name: Build "fast"
    participant_roles: [qa]
"#;

    fn document() -> Document {
        let mut doc = load_from_str(PROCESS).unwrap();
        enrich(&mut doc, &Schema::default().relations);
        doc
    }

    fn front_matter(artifact: &Artifact) -> serde_yaml::Mapping {
        let body = artifact
            .content
            .strip_prefix("---\n")
            .and_then(|rest| rest.strip_suffix("---\n"))
            .expect("artifact should be wrapped in front matter delimiters");
        serde_yaml::from_str(body).unwrap()
    }

    fn render(doc: &Document, collection: &str, id: &str) -> Result<Artifact, RenderError> {
        let schema = Schema::default();
        let renderer = Renderer::new(doc, &schema);
        renderer.render_record(collection, id, &doc.collections[collection][id])
    }

    #[test]
    fn test_header_fields() {
        let doc = document();
        let artifact = render(&doc, "roles", "qa").unwrap();
        assert!(artifact.content.starts_with("---\npk: qa\nlayout: roles\n"));
        assert!(artifact.content.ends_with("---\n"));
        assert_eq!(artifact.file_name(), "qa.md");
    }

    #[test]
    fn test_foreign_keys_resolve_in_order() {
        let doc = document();
        let artifact = render(&doc, "activities", "design").unwrap();
        assert!(
            artifact
                .content
                .contains("participant_roles:\n  dev: \"Developer\"\n  qa: \"Tester\"\n"),
            "{}",
            artifact.content
        );
    }

    #[test]
    fn test_reverse_references_resolve_to_names() {
        let doc = document();
        let artifact = render(&doc, "roles", "qa").unwrap();
        let fm = front_matter(&artifact);
        let linked = fm.get("participated_activities").unwrap().as_mapping().unwrap();
        let pairs: Vec<_> = linked
            .iter()
            .map(|(k, v)| (k.as_str().unwrap(), v.as_str().unwrap()))
            .collect();
        assert_eq!(pairs, [("design", "Design"), ("build", "Build \"fast\"")]);
    }

    #[test]
    fn test_value_policies() {
        let doc = document();
        let artifact = render(&doc, "activities", "design").unwrap();
        assert!(artifact.content.contains("name: \"Design\"\n"));
        assert!(artifact.content.contains("optional: \"True\"\n"));
        assert!(artifact.content.contains("predecessor:\n"));
        assert!(
            artifact
                .content
                .contains("tags:\n  - \"early\"\n  - \"needs: review\"\n")
        );
    }

    #[test]
    fn test_booleans_are_capitalized() {
        let mut doc = document();
        doc.collections["activities"]["design"]
            .insert("checks".to_string(), serde_yaml::from_str("[true, 2, false]").unwrap());

        let dev = render(&doc, "roles", "dev").unwrap();
        assert!(dev.content.contains("external: \"False\"\n"));

        let design = render(&doc, "activities", "design").unwrap();
        assert!(
            design
                .content
                .contains("checks:\n  - \"True\"\n  - \"2\"\n  - \"False\"\n")
        );
    }

    #[test]
    fn test_description_is_literal_block() {
        let doc = document();
        let artifact = render(&doc, "roles", "dev").unwrap();
        assert!(artifact.content.contains("description: |\n  Writes the code.\n\n  Reviews it too.\n"));
        let fm = front_matter(&artifact);
        assert_eq!(
            fm.get("description").and_then(Value::as_str),
            Some("Writes the code.\n\nReviews it too.\n")
        );
    }

    #[test]
    fn test_missing_reference_is_an_error() {
        let mut doc = document();
        doc.collections["activities"]["design"].insert(
            "participant_roles".to_string(),
            serde_yaml::from_str("[dev, qaa]").unwrap(),
        );
        let err = render(&doc, "activities", "design").unwrap_err();
        match err {
            RenderError::Resolution {
                target,
                target_collection,
                suggestion,
                ..
            } => {
                assert_eq!(target, "qaa");
                assert_eq!(target_collection, "roles");
                assert_eq!(suggestion.as_deref(), Some("qa"));
            }
            other => panic!("expected resolution error, got {other}"),
        }
    }

    #[test]
    fn test_reference_without_name_is_an_error() {
        let mut doc = document();
        doc.collections["roles"]["qa"].shift_remove("name");
        let err = render(&doc, "activities", "design").unwrap_err();
        assert!(matches!(err, RenderError::Resolution { ref target, .. } if target == "qa"));
    }

    #[test]
    fn test_mapping_value_is_unsupported() {
        let mut doc = document();
        doc.collections["roles"]["qa"].insert(
            "contact".to_string(),
            serde_yaml::from_str("{email: qa@example.com}").unwrap(),
        );
        let err = render(&doc, "roles", "qa").unwrap_err();
        assert!(
            matches!(err, RenderError::UnsupportedValue { ref property, ref kind, .. }
                if property == "contact" && kind == "mapping"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_number_value_is_unsupported() {
        let mut doc = document();
        doc.collections["roles"]["qa"].insert("headcount".to_string(), Value::from(3));
        assert!(matches!(
            render(&doc, "roles", "qa"),
            Err(RenderError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_scalar_foreign_key_is_unsupported() {
        let mut doc = document();
        doc.collections["activities"]["build"]
            .insert("participant_roles".to_string(), Value::from("qa"));
        assert!(matches!(
            render(&doc, "activities", "build"),
            Err(RenderError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_reserved_property() {
        let mut doc = document();
        doc.collections["roles"]["qa"].insert("layout".to_string(), Value::from("custom"));
        assert!(matches!(
            render(&doc, "roles", "qa"),
            Err(RenderError::ReservedProperty { .. })
        ));
    }

    #[test]
    fn test_identifier_with_separator_rejected() {
        let doc = document();
        let schema = Schema::default();
        let renderer = Renderer::new(&doc, &schema);
        let err = renderer
            .render_record("roles", "../escape", &Record::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_empty_lists() {
        let mut doc = document();
        let record = &mut doc.collections["roles"]["qa"];
        record.insert("tags".to_string(), Value::Sequence(vec![]));
        record.insert("required_activities".to_string(), Value::Sequence(vec![]));
        let artifact = render(&doc, "roles", "qa").unwrap();
        assert!(artifact.content.contains("tags: []\n"));
        assert!(artifact.content.contains("required_activities: {}\n"));
    }

    #[test]
    fn test_repeated_reference_written_once() {
        let mut doc = document();
        doc.collections["activities"]["build"].insert(
            "participant_roles".to_string(),
            serde_yaml::from_str("[qa, dev, qa]").unwrap(),
        );
        let artifact = render(&doc, "activities", "build").unwrap();
        let fm = front_matter(&artifact);
        let roles = fm.get("participant_roles").unwrap().as_mapping().unwrap();
        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn test_write_collection_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("dev.md");
        fs::write(&stale, "stale content that is much longer than the new file").unwrap();

        let doc = document();
        let schema = Schema::default();
        let written = Renderer::new(&doc, &schema)
            .write_collection("roles", dir.path())
            .unwrap();

        assert_eq!(written, 2);
        let content = fs::read_to_string(&stale).unwrap();
        assert!(content.starts_with("---\npk: dev\n"));
        assert!(!content.contains("stale"));
        assert!(dir.path().join("qa.md").is_file());
    }

    #[test]
    fn test_absent_collection_renders_nothing() {
        let doc = document();
        let schema = Schema::default();
        let artifacts = Renderer::new(&doc, &schema)
            .render_collection("tools")
            .unwrap();
        assert!(artifacts.is_empty());
    }
}
