//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod build;
pub mod check;
pub mod completions;
pub mod graph;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::ProcsiteError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), ProcsiteError> {
    match cli.command {
        Commands::Build(args) => build::run(&args, cli.quiet),
        Commands::Check(args) => check::run(&args),
        Commands::Graph(args) => graph::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
