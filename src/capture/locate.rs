//! Locating a reference image on screen.
//!
//! Coarse-to-fine template matching on grayscale images: both images are
//! shrunk, every position is scored by mean absolute difference, and the
//! best coarse hit is refined at full resolution.

use image::imageops::{self, FilterType};
use image::GrayImage;

/// Best placement of a template inside a larger image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatch {
    /// Top-left corner in haystack pixels
    pub x: u32,
    pub y: u32,
    /// Mean absolute difference per pixel (0 = identical, 255 = inverted)
    pub score: f32,
}

impl TemplateMatch {
    /// Center of the matched region in haystack pixels.
    pub fn center(&self, template: &GrayImage) -> (u32, u32) {
        (
            self.x + template.width() / 2,
            self.y + template.height() / 2,
        )
    }
}

/// Finds `needle` inside `haystack`. Returns `None` when the needle does not
/// fit or the best score is worse than `tolerance`.
pub fn find_template(
    haystack: &GrayImage,
    needle: &GrayImage,
    tolerance: f32,
) -> Option<TemplateMatch> {
    let (hw, hh) = haystack.dimensions();
    let (nw, nh) = needle.dimensions();
    if nw == 0 || nh == 0 || nw > hw || nh > hh {
        return None;
    }

    let factor = (nw.min(nh) / 8).clamp(1, 4);
    let (cx, cy) = if factor > 1 {
        let small_haystack = shrink(haystack, factor);
        let small_needle = shrink(needle, factor);
        let (x, y, _) = best_in(&small_haystack, &small_needle, None)?;
        (x * factor, y * factor)
    } else {
        (0, 0)
    };

    let window = if factor > 1 {
        let reach = factor * 2;
        Some((
            cx.saturating_sub(reach),
            cy.saturating_sub(reach),
            (cx + reach).min(hw - nw),
            (cy + reach).min(hh - nh),
        ))
    } else {
        None
    };

    let (x, y, score) = best_in(haystack, needle, window)?;
    (score <= tolerance).then_some(TemplateMatch { x, y, score })
}

fn shrink(img: &GrayImage, factor: u32) -> GrayImage {
    let w = (img.width() / factor).max(1);
    let h = (img.height() / factor).max(1);
    imageops::resize(img, w, h, FilterType::Triangle)
}

/// Exhaustive search over top-left positions, optionally limited to an
/// inclusive `(x0, y0, x1, y1)` window.
fn best_in(
    haystack: &GrayImage,
    needle: &GrayImage,
    window: Option<(u32, u32, u32, u32)>,
) -> Option<(u32, u32, f32)> {
    let (hw, hh) = haystack.dimensions();
    let (nw, nh) = needle.dimensions();
    if nw > hw || nh > hh {
        return None;
    }

    let (x0, y0, x1, y1) = window.unwrap_or((0, 0, hw - nw, hh - nh));
    let mut best: Option<(u32, u32, f32)> = None;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let score = mean_abs_diff(haystack, needle, x, y);
            if best.is_none_or(|(_, _, b)| score < b) {
                best = Some((x, y, score));
            }
        }
    }

    best
}

fn mean_abs_diff(haystack: &GrayImage, needle: &GrayImage, x: u32, y: u32) -> f32 {
    let hw = haystack.width() as usize;
    let (nw, nh) = (needle.width() as usize, needle.height() as usize);
    let hay = haystack.as_raw();
    let pin = needle.as_raw();

    let mut total: u64 = 0;
    for row in 0..nh {
        let h_start = (y as usize + row) * hw + x as usize;
        let n_start = row * nw;
        total += hay[h_start..h_start + nw]
            .iter()
            .zip(&pin[n_start..n_start + nw])
            .map(|(&a, &b)| a.abs_diff(b) as u64)
            .sum::<u64>();
    }

    total as f32 / (nw * nh) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Smooth bowl-shaped test pattern with a unique best match everywhere
    fn bowl(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let v = (x * x + 2 * y * y) / 340;
            Luma([v.min(255) as u8])
        })
    }

    #[test]
    fn test_finds_exact_crop_without_downscale() {
        let haystack = bowl(64, 48);
        let needle = imageops::crop_imm(&haystack, 20, 10, 12, 12).to_image();

        let found = find_template(&haystack, &needle, 1.0).unwrap();
        assert_eq!((found.x, found.y), (20, 10));
        assert_eq!(found.score, 0.0);
        assert_eq!(found.center(&needle), (26, 16));
    }

    #[test]
    fn test_finds_exact_crop_with_downscale() {
        let haystack = bowl(200, 150);
        let needle = imageops::crop_imm(&haystack, 90, 60, 40, 32).to_image();

        let found = find_template(&haystack, &needle, 1.0).unwrap();
        assert_eq!((found.x, found.y), (90, 60));
        assert_eq!(found.score, 0.0);
    }

    #[test]
    fn test_rejects_when_nothing_is_close() {
        let haystack = GrayImage::from_pixel(80, 60, Luma([10]));
        let needle = GrayImage::from_pixel(16, 16, Luma([250]));

        assert!(find_template(&haystack, &needle, 12.0).is_none());
    }

    #[test]
    fn test_needle_larger_than_haystack() {
        let haystack = GrayImage::new(10, 10);
        let needle = GrayImage::new(20, 5);
        assert!(find_template(&haystack, &needle, 255.0).is_none());
    }

    #[test]
    fn test_mean_abs_diff() {
        let haystack = GrayImage::from_pixel(4, 4, Luma([100]));
        let needle = GrayImage::from_pixel(2, 2, Luma([90]));
        assert_eq!(mean_abs_diff(&haystack, &needle, 1, 1), 10.0);
    }
}
