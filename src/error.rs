//! Error types for `procsite`
//!
//! Each pipeline stage (loading, settings, rendering, site assembly) has its
//! own error enum. `ProcsiteError` aggregates them and maps every failure to
//! a process exit code.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `procsite` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Process description or settings could not be loaded
    pub const LOAD_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied, missing statics)
    pub const IO_ERROR: i32 = 3;

    /// A record could not be rendered (unresolved reference, unsupported value)
    pub const RENDER_ERROR: i32 = 4;

    /// The site generator failed to scaffold the project
    pub const SCAFFOLD_ERROR: i32 = 5;

    /// Usage error (invalid arguments)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `procsite` operations.
#[derive(Debug, Error)]
pub enum ProcsiteError {
    /// Process description loading error
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Settings file error
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Front matter or graph rendering error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Project assembly error
    #[error(transparent)]
    Site(#[from] SiteError),

    /// `check` found problems in the process description
    #[error("{count} error(s) found in {path}")]
    CheckFailed {
        /// Checked process description
        path: PathBuf,
        /// Number of errors reported
        count: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProcsiteError {
    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Load(_) | Self::Settings(_) => ExitCode::LOAD_ERROR,
            Self::Render(RenderError::Io { .. }) | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Render(_) | Self::CheckFailed { .. } => ExitCode::RENDER_ERROR,
            Self::Site(SiteError::Scaffold { .. }) => ExitCode::SCAFFOLD_ERROR,
            Self::Site(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Load Errors
// ============================================================================

/// Errors raised while reading a process description.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document is not valid YAML or does not have the expected shape
    #[error("parse error in {path}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    Parse {
        /// Path to the process description
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message
        message: String,
    },

    /// A required top-level scalar is absent
    #[error("missing required field '{field}' in {path}")]
    MissingField {
        /// Path to the process description
        path: PathBuf,
        /// Name of the missing field
        field: String,
    },

    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path to the process description
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Settings Errors
// ============================================================================

/// Errors raised while reading the optional settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read
    #[error("failed to read settings {path}: {source}")]
    Io {
        /// Path to the settings file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is malformed
    #[error("invalid settings in {path}: {message}")]
    Parse {
        /// Path to the settings file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// A setting has an invalid value
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Name of the setting
        field: String,
        /// Description of the problem
        message: String,
    },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors raised while rendering records or the activity graph.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A reference does not point at a record with a usable name
    #[error(
        "{collection}/{record}: '{property}' references {target_collection} '{target}', which does not exist or has no name{}",
        suggestion.as_ref().map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
    )]
    Resolution {
        /// Collection of the referencing record
        collection: String,
        /// Identifier of the referencing record
        record: String,
        /// Property holding the reference
        property: String,
        /// Collection the reference points into
        target_collection: String,
        /// Referenced identifier
        target: String,
        /// Closest existing identifier, if any is near enough
        suggestion: Option<String>,
    },

    /// A record that must be displayed has no usable name
    #[error("{collection}/{record} has no name")]
    MissingName {
        /// Collection of the record
        collection: String,
        /// Identifier of the record
        record: String,
    },

    /// A property value has a shape that cannot be written as front matter
    #[error("{collection}/{record}: property '{property}' holds a {kind}, which is not supported")]
    UnsupportedValue {
        /// Collection of the record
        collection: String,
        /// Identifier of the record
        record: String,
        /// Offending property
        property: String,
        /// Human-readable description of the value shape
        kind: String,
    },

    /// A record defines a key the renderer writes itself
    #[error("{collection}/{record}: property '{property}' is reserved")]
    ReservedProperty {
        /// Collection of the record
        collection: String,
        /// Identifier of the record
        record: String,
        /// Reserved property name
        property: String,
    },

    /// A record identifier cannot be used as a file name
    #[error("{collection}: identifier '{record}' cannot be used as a file name")]
    InvalidIdentifier {
        /// Collection of the record
        collection: String,
        /// Offending identifier
        record: String,
    },

    /// Writing a rendered artifact failed
    #[error("failed to write {path}: {source}")]
    Io {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Site Errors
// ============================================================================

/// Errors raised while assembling the output project.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The site generator could not scaffold the project
    #[error("failed to scaffold project with `{command}`: {reason}")]
    Scaffold {
        /// Command line that was run
        command: String,
        /// Why it failed
        reason: String,
    },

    /// The bundled statics directory is absent
    #[error("statics directory not found: {path}")]
    MissingStatics {
        /// Expected statics directory
        path: PathBuf,
    },

    /// An upload path does not name a file
    #[error("cannot upload {path}: not a file path")]
    InvalidUpload {
        /// Offending path
        path: PathBuf,
    },

    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being operated on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl SiteError {
    /// Wraps an I/O error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for `procsite` operations.
pub type Result<T> = std::result::Result<T, ProcsiteError>;

// ============================================================================
// Tests
// ============================================================================
