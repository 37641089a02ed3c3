//! CLI argument definitions
//!
//! All Clap derive structs for `procsite` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_GENERATOR, DEFAULT_STATICS_DIR};
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Build a Jekyll documentation site from a YAML process description.
#[derive(Parser, Debug)]
#[command(name = "procsite", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "PROCSITE_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate (or regenerate) the site project.
    Build(BuildArgs),

    /// Validate a process description without writing anything.
    Check(CheckArgs),

    /// Print the activity workflow graph as Mermaid.
    Graph(GraphArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the YAML process description.
    pub process: PathBuf,

    /// Project directory; scaffolded with the site generator if missing.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Additional file to copy into the uploads folder (repeatable).
    #[arg(long = "upload", value_name = "FILE")]
    pub uploads: Vec<PathBuf>,

    /// Directory holding the bundled static pages and folders.
    #[arg(long, default_value = DEFAULT_STATICS_DIR, env = "PROCSITE_STATICS_DIR")]
    pub statics: PathBuf,

    /// Command that scaffolds a new project; the output path is appended.
    #[arg(long, default_value = DEFAULT_GENERATOR, env = "PROCSITE_GENERATOR")]
    pub generator: String,

    /// Create a missing output directory instead of running the generator.
    #[arg(long)]
    pub no_scaffold: bool,

    /// YAML settings file overriding layout and schema defaults.
    #[arg(long, env = "PROCSITE_SETTINGS")]
    pub settings: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the YAML process description.
    pub process: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// YAML settings file overriding layout and schema defaults.
    #[arg(long, env = "PROCSITE_SETTINGS")]
    pub settings: Option<PathBuf>,
}

/// Arguments for `graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Path to the YAML process description.
    pub process: PathBuf,

    /// Write the graph to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
