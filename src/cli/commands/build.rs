//! `build` command
//!
//! Resolves CLI flags and settings into [`BuildOptions`] and runs the
//! project assembly.

use crate::cli::args::BuildArgs;
use crate::config::{BuildOptions, SiteSettings, parse_generator_command};
use crate::error::ProcsiteError;
use crate::site;

/// Build the site project.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded, the generator command is
/// malformed, or the build fails.
pub fn run(args: &BuildArgs, quiet: bool) -> Result<(), ProcsiteError> {
    let options = BuildOptions {
        output: args.output.clone(),
        statics_dir: args.statics.clone(),
        generator: parse_generator_command(&args.generator)?,
        scaffold: !args.no_scaffold,
        uploads: args.uploads.clone(),
        settings: SiteSettings::load_or_default(args.settings.as_deref())?,
    };

    tracing::info!(
        process = %args.process.display(),
        output = %options.output.display(),
        "building site"
    );

    let summary = site::build(&args.process, &options)?;

    if !quiet {
        eprintln!(
            "Built {} in {}: {} collection(s), {} record(s), {} reverse link(s), {} upload(s)",
            args.process.display(),
            options.output.display(),
            summary.collections.len(),
            summary.records_written,
            summary.links_added,
            summary.uploads_staged,
        );
    }

    Ok(())
}
