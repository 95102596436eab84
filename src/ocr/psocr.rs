//! Game-name recognizer.
//!
//! The recognizer binary crops the carousel title out of a screenshot and
//! prints `OK:<title>` on its first line. Anything on stderr is a failure.

use std::path::Path;
use std::process::Command;

use crate::error::{OcrError, RemotePlayError, Result};

const OK_PREFIX: &str = "OK:";

/// Runs `<executable> <image>` and returns the recognized title.
pub fn recognise_game(executable: &Path, image: &Path) -> Result<String> {
    if !executable.is_file() {
        return Err(RemotePlayError::MissingExecutable(executable.to_path_buf()));
    }

    let output = Command::new(executable).arg(image).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    Ok(parse_output(&stdout, &stderr)?)
}

/// Parses recognizer output.
pub fn parse_output(stdout: &str, stderr: &str) -> Result<String, OcrError> {
    if !stderr.is_empty() {
        return Err(OcrError::Recognition(stderr.to_string()));
    }

    let first = stdout.lines().next().unwrap_or_default();
    match first.strip_prefix(OK_PREFIX) {
        Some(text) => Ok(text.trim().to_string()),
        None => Err(OcrError::Recognition(stdout.to_string())),
    }
}
