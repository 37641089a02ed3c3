//! Activity workflow graph.
//!
//! Builds a Mermaid `graph TD` flowchart from the `predecessor` chains of the
//! activities collection. Every activity is declared once as a node; each
//! activity whose predecessor exists contributes one edge pointing at it.
//!
//! Predecessors naming no known activity leave the node standalone. Cycles
//! are not rejected: each activity still contributes at most one edge, so
//! generation terminates and the cycle is drawn as-is. [`ActivityGraph::cycles`]
//! reports them so callers can warn.

pub mod escape;

use std::collections::{HashMap, HashSet};

use serde_yaml::Value;

use crate::error::RenderError;
use crate::model::{Collection, Document, display_name, scalar_text, value_kind};
use crate::render::yaml;

/// Collection holding activities.
pub const ACTIVITIES: &str = "activities";

/// Activity property naming the previous activity.
pub const PREDECESSOR: &str = "predecessor";

/// A declared activity node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Record identifier.
    pub activity: String,

    /// Mermaid node ID.
    pub node_id: String,

    /// Display name.
    pub label: String,
}

/// An edge from an activity to its predecessor, as node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Index of the activity.
    pub from: usize,

    /// Index of its predecessor.
    pub to: usize,
}

/// Predecessor graph of the activities collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

#[derive(Clone, Copy)]
enum Mark {
    Visiting,
    Done,
}

impl ActivityGraph {
    /// Builds the graph from a document's activities collection. A document
    /// without activities yields an empty graph.
    ///
    /// # Errors
    ///
    /// See [`ActivityGraph::from_activities`].
    pub fn build(document: &Document) -> Result<Self, RenderError> {
        document
            .collection(ACTIVITIES)
            .map_or_else(|| Ok(Self::default()), Self::from_activities)
    }

    /// Builds the graph from an activities collection.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::MissingName` if an activity has no usable name,
    /// and `RenderError::UnsupportedValue` if a predecessor is not a scalar.
    pub fn from_activities(activities: &Collection) -> Result<Self, RenderError> {
        let mut used = HashSet::new();
        let mut nodes = Vec::with_capacity(activities.len());

        for (index, (id, record)) in activities.iter().enumerate() {
            let label = display_name(record).ok_or_else(|| RenderError::MissingName {
                collection: ACTIVITIES.to_string(),
                record: id.clone(),
            })?;

            let base = escape::sanitize_node_id(id, index);
            let mut node_id = base.clone();
            let mut suffix = index;
            while used.contains(&node_id) {
                node_id = format!("{base}_{suffix}");
                suffix += 1;
            }
            used.insert(node_id.clone());

            nodes.push(Node {
                activity: id.clone(),
                node_id,
                label: label.to_string(),
            });
        }

        let mut edges = Vec::new();
        for (from, (id, record)) in activities.iter().enumerate() {
            let Some(predecessor) = predecessor_of(id, record.get(PREDECESSOR))? else {
                continue;
            };

            match activities.get_index_of(predecessor.as_str()) {
                Some(to) => edges.push(Edge { from, to }),
                None => tracing::warn!(
                    activity = %id,
                    predecessor = %predecessor,
                    "predecessor is not a known activity; drawing it as a standalone node"
                ),
            }
        }

        Ok(Self { nodes, edges })
    }

    /// Declared nodes, in collection order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges, in collection order of their source activity.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders the graph as Mermaid markup.
    #[must_use]
    pub fn to_mermaid(&self) -> String {
        let mut lines = Vec::with_capacity(1 + self.nodes.len() + self.edges.len());
        lines.push("graph TD".to_string());

        for node in &self.nodes {
            lines.push(format!(
                "    {}[{}]",
                node.node_id,
                escape::node_label(&node.label)
            ));
        }

        for edge in &self.edges {
            lines.push(format!(
                "    {} --> {}",
                self.nodes[edge.from].node_id, self.nodes[edge.to].node_id
            ));
        }

        lines.join("\n")
    }

    /// Renders the graph as one double-quoted YAML scalar, for embedding in
    /// the site configuration.
    #[must_use]
    pub fn to_config_value(&self) -> String {
        yaml::quote(&self.to_mermaid())
    }

    /// Distinct predecessor cycles, each as activity identifiers in chain
    /// order starting from the first activity reached.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let next: HashMap<usize, usize> = self.edges.iter().map(|e| (e.from, e.to)).collect();
        let mut marks: HashMap<usize, Mark> = HashMap::new();
        let mut cycles = Vec::new();

        for start in 0..self.nodes.len() {
            let mut path = Vec::new();
            let mut current = Some(start);

            while let Some(index) = current {
                match marks.get(&index) {
                    Some(Mark::Done) => break,
                    Some(Mark::Visiting) => {
                        if let Some(pos) = path.iter().position(|&p| p == index) {
                            cycles.push(
                                path[pos..]
                                    .iter()
                                    .map(|&i: &usize| self.nodes[i].activity.clone())
                                    .collect(),
                            );
                        }
                        break;
                    }
                    None => {
                        marks.insert(index, Mark::Visiting);
                        path.push(index);
                        current = next.get(&index).copied();
                    }
                }
            }

            for index in path {
                marks.insert(index, Mark::Done);
            }
        }

        cycles
    }
}

fn predecessor_of(id: &str, value: Option<&Value>) -> Result<Option<String>, RenderError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_text(value).map(Some).ok_or_else(|| {
            RenderError::UnsupportedValue {
                collection: ACTIVITIES.to_string(),
                record: id.to_string(),
                property: PREDECESSOR.to_string(),
                kind: value_kind(value).to_string(),
            }
        }),
    }
}
