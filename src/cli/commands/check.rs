//! `check` command
//!
//! Loads, enriches and renders every record in memory, collecting every
//! rendering problem instead of stopping at the first. Nothing is written.

use serde_json::json;

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::SiteSettings;
use crate::enrich::enrich;
use crate::error::ProcsiteError;
use crate::graph::ActivityGraph;
use crate::model;
use crate::render::Renderer;

/// Findings of a check run.
#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate a process description.
///
/// # Errors
///
/// Returns a load or settings error if the description cannot be read, and
/// `ProcsiteError::CheckFailed` if any record fails to render.
pub fn run(args: &CheckArgs) -> Result<(), ProcsiteError> {
    let settings = SiteSettings::load_or_default(args.settings.as_deref())?;
    let mut document = model::load(&args.process)?;
    let enriched = enrich(&mut document, &settings.schema.relations);

    let mut report = Report::default();
    if enriched.skipped > 0 {
        report.warnings.push(format!(
            "{} reference(s) could not be linked back",
            enriched.skipped
        ));
    }

    let renderer = Renderer::new(&document, &settings.schema);
    for (collection, records) in &document.collections {
        for (id, record) in records {
            if let Err(e) = renderer.render_record(collection, id, record) {
                report.errors.push(e.to_string());
            }
        }
    }

    match ActivityGraph::build(&document) {
        Ok(graph) => {
            for cycle in graph.cycles() {
                report
                    .warnings
                    .push(format!("predecessor cycle: {}", cycle.join(" -> ")));
            }
        }
        Err(e) => {
            let message = e.to_string();
            if !report.errors.contains(&message) {
                report.errors.push(message);
            }
        }
    }

    match args.format {
        OutputFormat::Human => {
            for warning in &report.warnings {
                println!("warning: {warning}");
            }
            for error in &report.errors {
                println!("error: {error}");
            }
            println!(
                "{}: {} collection(s), {} record(s), {} error(s), {} warning(s)",
                args.process.display(),
                document.collections.len(),
                document.record_count(),
                report.errors.len(),
                report.warnings.len()
            );
        }
        OutputFormat::Json => {
            let output = json!({
                "file": args.process.display().to_string(),
                "valid": report.errors.is_empty(),
                "process_name": document.process_name,
                "collections": document.collections.len(),
                "records": document.record_count(),
                "links_added": enriched.links_added,
                "errors": report.errors,
                "warnings": report.warnings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(ProcsiteError::CheckFailed {
            path: args.process.clone(),
            count: report.errors.len(),
        })
    }
}
