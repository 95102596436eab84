use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{RemotePlayError, Result};

/// Locations checked when Tesseract is not on PATH
const COMMON_PATHS: [&str; 2] = ["/opt/homebrew/bin/tesseract", "/usr/local/bin/tesseract"];

const SYSTEM_TESSDATA: [&str; 2] = [
    "/opt/homebrew/share/tessdata",
    "/usr/local/share/tessdata",
];

pub struct TesseractPaths {
    pub executable: PathBuf,
    /// None lets Tesseract use its compiled-in default
    pub tessdata: Option<PathBuf>,
}

/// Finds Tesseract, preferring an explicitly configured executable.
pub fn find_tesseract(configured: Option<&Path>) -> Result<TesseractPaths> {
    let executable = match configured {
        Some(path) if path.is_file() => path.to_path_buf(),
        Some(path) => return Err(RemotePlayError::MissingExecutable(path.to_path_buf())),
        None => find_tesseract_executable()?,
    };

    Ok(TesseractPaths {
        executable,
        tessdata: find_tessdata_dir(),
    })
}

/// Finds the Tesseract executable, checking PATH first, then Homebrew prefixes
pub fn find_tesseract_executable() -> Result<PathBuf> {
    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    COMMON_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| RemotePlayError::MissingExecutable(PathBuf::from("tesseract")))
}

/// Finds a tessdata directory holding English trained data
pub fn find_tessdata_dir() -> Option<PathBuf> {
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let candidates = [PathBuf::from(&prefix), PathBuf::from(&prefix).join("tessdata")];
        if let Some(found) = candidates.into_iter().find(|p| has_english(p)) {
            return Some(found);
        }
    }

    SYSTEM_TESSDATA
        .iter()
        .map(PathBuf::from)
        .find(|p| has_english(p))
}

fn has_english(dir: &Path) -> bool {
    dir.join("eng.traineddata").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_executable_must_exist() {
        let err = find_tesseract(Some(Path::new("/nonexistent/tesseract"))).err();
        assert!(matches!(err, Some(RemotePlayError::MissingExecutable(_))));
    }

    #[test]
    fn test_configured_executable_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("tesseract");
        std::fs::write(&exe, b"#!/bin/sh\n").unwrap();

        let paths = find_tesseract(Some(&exe)).unwrap();
        assert_eq!(paths.executable, exe);
    }

    #[test]
    fn test_has_english() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_english(dir.path()));
        std::fs::write(dir.path().join("eng.traineddata"), b"").unwrap();
        assert!(has_english(dir.path()));
    }
}
