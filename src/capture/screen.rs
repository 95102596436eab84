//! Reading the screen: text, carousel titles, and reference images.

use std::path::{Path, PathBuf};

use crate::automation::input::Point;
use crate::capture::locate::find_template;
use crate::capture::Screenshot;
use crate::error::Result;
use crate::ocr::{self, TesseractPaths};

/// Everything the automation flows need to know about what is on screen.
///
/// Each call takes a fresh screenshot.
pub trait Screen {
    /// All recognized text lines, top to bottom.
    fn read_text(&self) -> Result<Vec<String>>;

    /// Title of the focused carousel tile.
    fn read_item_name(&self) -> Result<String>;

    /// Center of `template` on screen, in click points.
    fn locate(&self, template: &Path) -> Result<Option<Point>>;
}

/// Screen access backed by `screencapture`, Tesseract, and the recognizer.
pub struct DesktopScreen {
    tesseract: TesseractPaths,
    recognizer: PathBuf,
    display_scale: f32,
    locate_tolerance: f32,
}

impl DesktopScreen {
    pub fn new(
        tesseract: TesseractPaths,
        recognizer: PathBuf,
        display_scale: f32,
        locate_tolerance: f32,
    ) -> Self {
        Self {
            tesseract,
            recognizer,
            display_scale,
            locate_tolerance,
        }
    }
}

impl Screen for DesktopScreen {
    fn read_text(&self) -> Result<Vec<String>> {
        let shot = Screenshot::capture()?;
        let lines = ocr::recognize_file(&self.tesseract, shot.path())?;
        for line in &lines {
            crate::log(&format!(
                "OCR: {:?} ({} words, conf {:.0})",
                line.text,
                line.words.len(),
                line.confidence
            ));
        }
        Ok(ocr::line_texts(&lines))
    }

    fn read_item_name(&self) -> Result<String> {
        let shot = Screenshot::capture()?;
        ocr::recognise_game(&self.recognizer, shot.path())
    }

    fn locate(&self, template: &Path) -> Result<Option<Point>> {
        let needle = image::open(template)?.to_luma8();
        let shot = Screenshot::capture()?;
        let haystack = shot.load_luma()?;

        let Some(found) = find_template(&haystack, &needle, self.locate_tolerance) else {
            crate::log(&format!("{} not found on screen", template.display()));
            return Ok(None);
        };

        let (px, py) = found.center(&needle);
        let point = to_points(px, py, self.display_scale);
        crate::log(&format!(
            "{} found at ({}, {}) score {:.2}",
            template.display(),
            point.x,
            point.y,
            found.score
        ));
        Ok(Some(point))
    }
}

/// Converts screenshot pixels to click points.
pub fn to_points(px: u32, py: u32, scale: f32) -> Point {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    Point::new(
        (px as f32 / scale).round() as i32,
        (py as f32 / scale).round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_points() {
        assert_eq!(to_points(400, 300, 1.0), Point::new(400, 300));
        assert_eq!(to_points(401, 300, 2.0), Point::new(201, 150));
        assert_eq!(to_points(400, 300, 0.0), Point::new(400, 300));
    }
}
