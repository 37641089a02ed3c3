//! Relationship tables driving enrichment and rendering.
//!
//! Which properties are foreign keys, which are free text, and which
//! reverse references get synthesized are data, not code. The built-in
//! [`Schema::default`] matches the standard process vocabulary; a settings
//! file may replace any of the three tables.

use indexmap::IndexMap;
use serde::Deserialize;

/// One reverse-reference relation.
///
/// For every record in `source` whose `property` lists an identifier that
/// exists in `target`, the source identifier is appended to that target
/// record's `reverse` property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relation {
    /// Collection holding the forward references.
    pub source: String,

    /// Foreign-key property on source records.
    pub property: String,

    /// Collection the forward references point into.
    pub target: String,

    /// Property synthesized on target records.
    pub reverse: String,
}

impl Relation {
    /// Convenience constructor.
    #[must_use]
    pub fn new(source: &str, property: &str, target: &str, reverse: &str) -> Self {
        Self {
            source: source.to_string(),
            property: property.to_string(),
            target: target.to_string(),
            reverse: reverse.to_string(),
        }
    }
}

/// Property tables for a process vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Schema {
    /// Foreign-key property name → target collection.
    pub foreign_keys: IndexMap<String, String>,

    /// Properties rendered as literal Markdown blocks.
    pub markdown_properties: Vec<String>,

    /// Reverse references added by the enricher, applied in order.
    pub relations: Vec<Relation>,
}

const FOREIGN_KEYS: &[(&str, &str)] = &[
    ("tools", "tools"),
    ("templates", "templates"),
    ("activities", "activities"),
    ("guidelines", "guidelines"),
    ("artifacts", "artifacts"),
    ("participated_activities", "activities"),
    ("required_activities", "activities"),
    ("required_artifacts", "artifacts"),
    ("produced_artifacts", "artifacts"),
    ("participant_roles", "roles"),
    ("responsible_roles", "roles"),
    ("sub_activities", "activities"),
];

impl Default for Schema {
    fn default() -> Self {
        Self {
            foreign_keys: FOREIGN_KEYS
                .iter()
                .map(|(property, target)| ((*property).to_string(), (*target).to_string()))
                .collect(),
            markdown_properties: vec!["description".to_string()],
            relations: vec![
                Relation::new("activities", "participant_roles", "roles", "participated_activities"),
                Relation::new("activities", "responsible_roles", "roles", "required_activities"),
                Relation::new("activities", "guidelines", "guidelines", "activities"),
                Relation::new("artifacts", "templates", "templates", "artifacts"),
            ],
        }
    }
}

impl Schema {
    /// Target collection of a foreign-key property.
    #[must_use]
    pub fn foreign_key_target(&self, property: &str) -> Option<&str> {
        self.foreign_keys.get(property).map(String::as_str)
    }

    /// Whether a property holds free Markdown text.
    #[must_use]
    pub fn is_markdown(&self, property: &str) -> bool {
        self.markdown_properties.iter().any(|p| p == property)
    }
}
