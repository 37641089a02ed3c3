//! `graph` command
//!
//! Prints the activity workflow graph, or writes it to a file.

use crate::cli::args::GraphArgs;
use crate::error::{ProcsiteError, SiteError};
use crate::graph::ActivityGraph;
use crate::model;

/// Render the activity graph of a process description.
///
/// # Errors
///
/// Returns an error if the description cannot be loaded, an activity has no
/// name, or the output file cannot be written.
pub fn run(args: &GraphArgs) -> Result<(), ProcsiteError> {
    let document = model::load(&args.process)?;
    let graph = ActivityGraph::build(&document)?;

    for cycle in graph.cycles() {
        tracing::warn!(activities = %cycle.join(" -> "), "predecessor cycle");
    }

    let mut mermaid = graph.to_mermaid();
    mermaid.push('\n');

    match &args.output {
        Some(path) => {
            std::fs::write(path, mermaid).map_err(|e| SiteError::io(path, e))?;
            tracing::info!(path = %path.display(), nodes = graph.nodes().len(), "graph written");
        }
        None => print!("{mermaid}"),
    }

    Ok(())
}
