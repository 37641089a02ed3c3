//! Project scaffolding through the external site generator.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::SiteError;
use crate::site::fs::delete_file;

/// Runs `generator` with `output` appended as its last argument.
///
/// The generator's stdout is discarded; its stderr is passed through so
/// failures are visible.
///
/// # Errors
///
/// Returns `SiteError::Scaffold` if the command is empty, cannot be
/// spawned, or exits unsuccessfully.
pub fn scaffold(generator: &[String], output: &Path) -> Result<(), SiteError> {
    let command_line = format!("{} {}", generator.join(" "), output.display());
    let failed = |reason: String| SiteError::Scaffold {
        command: command_line.clone(),
        reason,
    };

    let Some((program, args)) = generator.split_first() else {
        return Err(failed("no generator command configured".to_string()));
    };

    tracing::info!(command = %command_line, "scaffolding project");

    let status = Command::new(program)
        .args(args)
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| failed(e.to_string()))?;

    if !status.success() {
        let reason = status
            .code()
            .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit status {c}"));
        return Err(failed(reason));
    }

    Ok(())
}

/// Deletes the generator's placeholder pages from a fresh project.
///
/// # Errors
///
/// Returns `SiteError::Io` if an existing placeholder cannot be removed.
pub fn remove_placeholders(output: &Path, placeholders: &[String]) -> Result<(), SiteError> {
    for name in placeholders {
        delete_file(&output.join(name))?;
    }
    Ok(())
}
