//! Fuzzy title matching for the game carousel.
//!
//! The ratio is Ratcliff/Obershelp: find the longest common block, recurse
//! on the pieces to its left and right, and score `2 * matched / total`.

use std::collections::HashMap;

/// Lower-cases, collapses runs of whitespace, and trims.
pub fn normalize_title(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Similarity ratio in [0, 1]. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        positions.entry(c).or_default().push(j);
    }

    let matched = matching_chars(&a, &b, &positions, 0, a.len(), 0, b.len());
    (2 * matched) as f64 / total as f64
}

/// Counts characters covered by the recursive longest-block decomposition.
fn matching_chars(
    a: &[char],
    b: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> usize {
    let (i, j, size) = longest_match(a, positions, alo, ahi, blo, bhi);
    if size == 0 {
        return 0;
    }

    let mut total = size;
    if alo < i && blo < j {
        total += matching_chars(a, b, positions, alo, i, blo, j);
    }
    if i + size < ahi && j + size < bhi {
        total += matching_chars(a, b, positions, i + size, ahi, j + size, bhi);
    }
    total
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the block that starts earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    // Length of the block ending at b[j] for the previous row of a
    let mut run_at: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = positions.get(&a[i]) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j > 0 {
                    run_at.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next.insert(j, k);
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        run_at = next;
    }

    best
}

/// Score of a carousel item against the wanted title.
///
/// Tiles often show "Title: Subtitle" while users ask for "Title", so the
/// part before the first colon is scored too and the better score wins.
pub fn title_score(item: &str, target: &str) -> f64 {
    let full = similarity(item, target);
    match item.split_once(':') {
        Some((head, _)) => full.max(similarity(head, target)),
        None => full,
    }
}

/// A score counts only when strictly above the threshold.
pub fn is_match(score: f64, threshold: f64) -> bool {
    score > threshold
}
