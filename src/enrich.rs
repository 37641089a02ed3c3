//! Reverse-reference enrichment.
//!
//! Walks each [`Relation`] and appends the identifier of every referencing
//! record onto the referenced record. Linking is best-effort: references to
//! unknown records are skipped, never reported as errors.
//!
//! Enrichment is not idempotent. Running it twice over the same document
//! appends every link a second time, and duplicate references within one run
//! are preserved as-is.

use std::ops::AddAssign;

use serde_yaml::Value;

use crate::model::{Document, Relation, scalar_text};

/// Counters collected while enriching a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Reverse references appended.
    pub links_added: usize,

    /// References that named no existing record, or whose reverse property
    /// could not take a list.
    pub skipped: usize,
}

impl AddAssign for EnrichReport {
    fn add_assign(&mut self, rhs: Self) {
        self.links_added += rhs.links_added;
        self.skipped += rhs.skipped;
    }
}

/// Applies every relation to `document`, in order.
pub fn enrich(document: &mut Document, relations: &[Relation]) -> EnrichReport {
    let mut report = EnrichReport::default();
    for relation in relations {
        report += apply_relation(document, relation);
    }

    tracing::debug!(
        links = report.links_added,
        skipped = report.skipped,
        "enrichment finished"
    );
    report
}

fn apply_relation(document: &mut Document, relation: &Relation) -> EnrichReport {
    let mut report = EnrichReport::default();

    let Some(source) = document.collections.get(&relation.source) else {
        tracing::debug!(collection = %relation.source, "source collection absent, relation skipped");
        return report;
    };

    // (target id, source id) in source traversal order
    let links: Vec<(String, String)> = source
        .iter()
        .flat_map(|(source_id, record)| {
            referenced_ids(record.get(&relation.property))
                .into_iter()
                .map(move |target_id| (target_id, source_id.clone()))
        })
        .collect();

    let Some(targets) = document.collections.get_mut(&relation.target) else {
        tracing::debug!(collection = %relation.target, "target collection absent, relation skipped");
        report.skipped = links.len();
        return report;
    };

    for (target_id, source_id) in links {
        let Some(target) = targets.get_mut(&target_id) else {
            tracing::debug!(
                source = %source_id,
                property = %relation.property,
                target = %target_id,
                "reference to unknown {} skipped",
                relation.target
            );
            report.skipped += 1;
            continue;
        };

        let entry = target.entry(relation.reverse.clone()).or_insert(Value::Null);
        if entry.is_null() {
            *entry = Value::Sequence(Vec::new());
        }

        if let Value::Sequence(items) = entry {
            items.push(Value::String(source_id));
            report.links_added += 1;
        } else {
            tracing::warn!(
                record = %target_id,
                property = %relation.reverse,
                "{}/{} already defines '{}' as a non-list value; reverse reference from {} dropped",
                relation.target,
                target_id,
                relation.reverse,
                source_id
            );
            report.skipped += 1;
        }
    }

    report
}

fn referenced_ids(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}
