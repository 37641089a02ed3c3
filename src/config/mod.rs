//! Build configuration.
//!
//! [`BuildOptions`] carries what the CLI decides per run (output directory,
//! statics location, generator command, uploads). [`SiteSettings`] holds
//! the project layout and schema tables, loaded from an optional YAML file
//! with every field defaulted.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::SettingsError;
use crate::model::Schema;

/// Statics directory used when none is given, relative to the working
/// directory.
pub const DEFAULT_STATICS_DIR: &str = "jekyll_statics";

/// Site generator command used to scaffold a missing output directory. The
/// output path is appended as the last argument.
pub const DEFAULT_GENERATOR: &str = "jekyll new";

const STATIC_FILES: &[&str] = &[
    "index.html",
    "phases.html",
    "guidelines.html",
    "activities.html",
    "templates.html",
    "roles.html",
    "tools.html",
    "artifacts.html",
    "workflow.html",
];

const STATIC_FOLDERS: &[&str] = &["_layouts", "_includes", "assets/css"];

const PLACEHOLDER_FILES: &[&str] = &["404.html", "about.markdown", "index.markdown"];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ============================================================================
// Site Settings
// ============================================================================

/// Project layout and vocabulary, overridable from a settings file.
///
/// All paths are relative: static entries to the statics directory, the
/// rest to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    /// Pages copied from the statics directory, each replacing any existing
    /// file of the same name.
    pub static_files: Vec<String>,

    /// Folders recreated in the output and filled recursively from the
    /// statics directory.
    pub static_folders: Vec<String>,

    /// Generator output removed right after scaffolding.
    pub placeholder_files: Vec<String>,

    /// Folder recreated before statics are copied.
    pub assets_folder: String,

    /// Folder receiving additional uploaded files.
    pub uploads_folder: String,

    /// Site generator configuration file written by the build.
    pub config_file: String,

    /// Foreign keys, free-text properties and reverse relations.
    pub schema: Schema,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            static_files: strings(STATIC_FILES),
            static_folders: strings(STATIC_FOLDERS),
            placeholder_files: strings(PLACEHOLDER_FILES),
            assets_folder: "assets".to_string(),
            uploads_folder: "uploads".to_string(),
            config_file: "_config.yml".to_string(),
            schema: Schema::default(),
        }
    }
}

impl SiteSettings {
    /// Loads settings from a YAML file. An empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Io` if the file cannot be read,
    /// `SettingsError::Parse` if it is malformed or has unknown keys, and
    /// `SettingsError::InvalidValue` if a path escapes its base directory.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| SettingsError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        settings.validate()?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Loads settings from `path` when given, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// See [`SiteSettings::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Checks that every configured path stays inside its base directory.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidValue` naming the first offending
    /// setting.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let lists = [
            ("static_files", &self.static_files),
            ("static_folders", &self.static_folders),
            ("placeholder_files", &self.placeholder_files),
        ];
        for (field, entries) in lists {
            for entry in entries {
                check_relative(field, entry)?;
            }
        }

        check_relative("assets_folder", &self.assets_folder)?;
        check_relative("uploads_folder", &self.uploads_folder)?;
        check_relative("config_file", &self.config_file)
    }
}

fn check_relative(field: &str, value: &str) -> Result<(), SettingsError> {
    let invalid = |message: &str| SettingsError::InvalidValue {
        field: field.to_string(),
        message: format!("'{value}' {message}"),
    };

    if value.trim().is_empty() {
        return Err(invalid("is empty"));
    }

    let path = Path::new(value);
    if path.is_absolute() || path.has_root() {
        return Err(invalid("must be a relative path"));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(invalid("must not contain '..'"));
    }

    Ok(())
}

// ============================================================================
// Build Options
// ============================================================================

/// Everything one `build` run needs besides the process description.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Project directory, scaffolded when absent.
    pub output: PathBuf,

    /// Directory holding the bundled static pages and folders.
    pub statics_dir: PathBuf,

    /// Scaffold command as program plus arguments.
    pub generator: Vec<String>,

    /// Whether to run the generator for a missing output directory. When
    /// false the directory is simply created.
    pub scaffold: bool,

    /// Additional files staged into the uploads folder.
    pub uploads: Vec<PathBuf>,

    /// Layout and schema.
    pub settings: SiteSettings,
}

impl BuildOptions {
    /// Options with default statics, generator and settings.
    #[must_use]
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            statics_dir: PathBuf::from(DEFAULT_STATICS_DIR),
            generator: DEFAULT_GENERATOR
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            scaffold: true,
            uploads: Vec::new(),
            settings: SiteSettings::default(),
        }
    }
}

/// Splits a generator command line using shell word rules.
///
/// # Errors
///
/// Returns `SettingsError::InvalidValue` if quoting is unbalanced or the
/// command is empty.
pub fn parse_generator_command(command: &str) -> Result<Vec<String>, SettingsError> {
    let invalid = |message: &str| SettingsError::InvalidValue {
        field: "generator".to_string(),
        message: message.to_string(),
    };

    let words = shlex::split(command).ok_or_else(|| invalid("unbalanced quotes"))?;
    if words.is_empty() {
        return Err(invalid("command is empty"));
    }
    Ok(words)
}
