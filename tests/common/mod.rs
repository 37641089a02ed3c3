//! Shared integration-test harness for running the `procsite` binary and
//! locating fixtures.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment variables the binary reads; cleared so the caller's shell
/// cannot change test outcomes.
const PROCSITE_ENV: &[&str] = &[
    "PROCSITE_COLOR",
    "PROCSITE_STATICS_DIR",
    "PROCSITE_GENERATOR",
    "PROCSITE_SETTINGS",
    "PROCSITE_LOG_LEVEL",
];

/// Runs `procsite` with `args` and waits for it to finish.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_procsite"));
    for var in PROCSITE_ENV {
        command.env_remove(var);
    }
    command
        .args(args)
        .output()
        .expect("failed to run procsite")
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Converts a path to a CLI argument.
#[must_use]
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("non-UTF-8 test path")
}

/// Stderr of a finished run, for assertion messages.
#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Splits a rendered artifact into its parsed front matter.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn front_matter(content: &str) -> serde_yaml::Value {
    let body = content
        .strip_prefix("---\n")
        .and_then(|rest| rest.strip_suffix("---\n"))
        .expect("artifact is not a front matter block");
    serde_yaml::from_str(body).expect("front matter is not valid YAML")
}
