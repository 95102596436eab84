//! Error types shared by the OCR wrappers and the automation flows.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of the game-name recognizer.
#[derive(Debug, Error)]
pub enum OcrError {
    /// Stderr was written, or stdout lacked the `OK:` prefix. Carries the raw text.
    #[error("recognition failed: {0}")]
    Recognition(String),
}

#[derive(Debug, Error)]
pub enum RemotePlayError {
    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error("not signed in to PSN, please log in and try again")]
    NotSignedIn,

    #[error("could not find {0} on screen")]
    ElementNotFound(String),

    #[error("could not open {app} within {timeout:?}")]
    OpenTimeout { app: String, timeout: Duration },

    #[error("console did not connect within {0:?}")]
    ConnectTimeout(Duration),

    #[error("unable to reach the library view after {0} attempts")]
    LibraryNotReached(u32),

    #[error("game {0:?} not found: reached the end of the library")]
    GameNotFound(String),

    #[error("game {name:?} not found after {attempts} attempts")]
    SearchExhausted { name: String, attempts: u32 },

    #[error("asset {} does not exist", .0.display())]
    AssetMissing(PathBuf),

    #[error("executable {} does not exist", .0.display())]
    MissingExecutable(PathBuf),

    #[error("{program} failed: {detail}")]
    Command { program: String, detail: String },

    #[error("could not read system appearance: {0:?}")]
    Appearance(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = RemotePlayError> = std::result::Result<T, E>;

impl RemotePlayError {
    /// Builds a `Command` error from a finished process.
    pub fn command(program: &str, output: &std::process::Output) -> Self {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            format!("exit status {}", output.status)
        } else {
            stderr
        };
        RemotePlayError::Command {
            program: program.to_string(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_exhausted_message() {
        let err = RemotePlayError::SearchExhausted {
            name: "call of duty".to_string(),
            attempts: 100,
        };
        assert_eq!(
            err.to_string(),
            "game \"call of duty\" not found after 100 attempts"
        );
    }

    #[test]
    fn test_ocr_error_is_transparent() {
        let err: RemotePlayError = OcrError::Recognition("ERR:no text".to_string()).into();
        assert_eq!(err.to_string(), "recognition failed: ERR:no text");
    }
}
