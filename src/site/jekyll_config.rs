//! Site generator configuration file.

use crate::graph::ActivityGraph;
use crate::model::Document;
use crate::model::loader::{PROCESS_DESCRIPTION, PROCESS_NAME};
use crate::render::yaml;

/// Key holding the Mermaid activity graph.
pub const ACTIVITY_GRAPH_KEY: &str = "activity_graph";

/// Renders the `_config.yml` content: the process globals, the activity
/// graph, and one `output: true` entry per collection.
#[must_use]
pub fn render_jekyll_config(document: &Document, graph: &ActivityGraph) -> String {
    let mut lines = vec![
        format!("{PROCESS_NAME}: {}", yaml::quote(&document.process_name)),
        format!(
            "{PROCESS_DESCRIPTION}: {}",
            yaml::quote(&document.process_description)
        ),
        format!("{ACTIVITY_GRAPH_KEY}: {}", graph.to_config_value()),
        String::new(),
        "collections:".to_string(),
    ];

    for collection in document.collections.keys() {
        lines.push(format!("  {}:", yaml::key(collection)));
        lines.push("    output: true".to_string());
    }

    let mut content = lines.join("\n");
    content.push('\n');
    content
}
