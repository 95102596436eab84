use std::path::Path;
use std::process::Command;

use crate::error::{RemotePlayError, Result};

use super::setup::TesseractPaths;

/// Represents a line of OCR text with confidence score
#[derive(Debug, Clone)]
pub struct OcrLine {
    pub text: String,
    pub words: Vec<OcrWord>,
    pub confidence: f32,
}

/// Represents a single word from OCR with confidence score
#[derive(Debug, Clone)]
pub struct OcrWord {
    pub text: String,
    pub confidence: f32,
}

/// Runs Tesseract on an image file.
/// Returns structured output with lines and confidence scores.
pub fn recognize_file(tesseract: &TesseractPaths, image: &Path) -> Result<Vec<OcrLine>> {
    let mut command = Command::new(&tesseract.executable);
    command.arg(image).arg("stdout");
    if let Some(tessdata) = &tesseract.tessdata {
        command.arg("--tessdata-dir").arg(tessdata);
    }

    // Sparse text: status labels are scattered across the window
    let output = command
        .arg("-l")
        .arg("eng")
        .arg("--psm")
        .arg("11")
        .arg("tsv")
        .output()?;

    if !output.status.success() {
        return Err(RemotePlayError::command("tesseract", &output));
    }

    Ok(parse_tsv_output(&String::from_utf8_lossy(&output.stdout)))
}

/// Key of the text line a TSV word row belongs to.
type LineKey = (i32, i32, i32);

/// Parses Tesseract TSV output into structured OcrLine data
pub fn parse_tsv_output(tsv: &str) -> Vec<OcrLine> {
    let mut lines: Vec<OcrLine> = Vec::new();
    let mut current_key: Option<LineKey> = None;
    let mut current_words: Vec<OcrWord> = Vec::new();

    for line in tsv.lines().skip(1) {
        // Skip header
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
        //             left, top, width, height, conf, text
        let level: i32 = fields[0].parse().unwrap_or(-1);
        let key = (
            fields[2].parse().unwrap_or(-1),
            fields[3].parse().unwrap_or(-1),
            fields[4].parse().unwrap_or(-1),
        );
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        let text = fields[11].trim();

        // Level 5 = word
        if level != 5 || text.is_empty() || conf < 0.0 {
            continue;
        }

        if current_key.is_some_and(|k| k != key) {
            flush_line(&mut lines, &mut current_words);
        }
        current_key = Some(key);

        current_words.push(OcrWord {
            text: text.to_string(),
            confidence: conf,
        });
    }

    flush_line(&mut lines, &mut current_words);
    lines
}

fn flush_line(lines: &mut Vec<OcrLine>, words: &mut Vec<OcrWord>) {
    if words.is_empty() {
        return;
    }

    let words = std::mem::take(words);
    let confidence = words.iter().map(|w| w.confidence).sum::<f32>() / words.len() as f32;
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(OcrLine {
        text,
        words,
        confidence,
    });
}

/// Flattens recognized lines into the text fragments the state machine reads.
pub fn line_texts(lines: &[OcrLine]) -> Vec<String> {
    lines.iter().map(|l| l.text.clone()).collect()
}
