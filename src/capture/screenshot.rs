//! Screenshot capture using the macOS `screencapture` tool.

use image::GrayImage;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

use crate::error::{RemotePlayError, Result};

/// A full-screen screenshot stored in a temporary PNG.
///
/// The file is deleted when the screenshot is dropped.
pub struct Screenshot {
    file: NamedTempFile,
}

impl Screenshot {
    /// Captures the main display silently (no shutter sound).
    pub fn capture() -> Result<Self> {
        let file = NamedTempFile::with_suffix(".png")?;

        let output = Command::new("screencapture")
            .arg("-x")
            .arg("-t")
            .arg("png")
            .arg(file.path())
            .output()?;

        if !output.status.success() {
            return Err(RemotePlayError::command("screencapture", &output));
        }

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Decodes the screenshot as grayscale for template matching.
    pub fn load_luma(&self) -> Result<GrayImage> {
        Ok(image::open(self.path())?.to_luma8())
    }
}
