//! Receipt text partitioning into header and footer slices.
//!
//! Turkish receipts carry date/time/receipt-number lines near the top and
//! the totals block near the bottom. Restricting field extraction to the
//! matching slice cuts false positives from numeric noise elsewhere on the
//! receipt; callers fall back to the full text when a slice misses.

use super::fuzzy::ratio;

/// Anchors that close the header region, with their fuzzy cutoffs.
const HEADER_ANCHORS: [(&str, u32); 3] = [("TARİH", 70), ("SAAT", 70), ("FİŞ", 60)];

/// Anchors that open the footer (totals) region.
const FOOTER_ANCHORS: [(&str, u32); 4] = [("TOPKDV", 70), ("KDV", 60), ("TOP", 60), ("TOPLAM", 70)];

/// A receipt text split into slices. Empty slices mean the anchors were
/// not found and callers should use the full text.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    pub header: String,
    pub footer: String,
}

/// Find the first line containing the word, exactly or fuzzily above the
/// cutoff. Comparison is over whitespace-split tokens of each line.
pub fn find_anchor_line(text: &str, word: &str, cutoff: u32) -> Option<usize> {
    for (idx, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            if token == word || ratio(token, word) >= cutoff {
                return Some(idx);
            }
        }
    }
    None
}

/// Split a normalized receipt text into header and footer slices.
///
/// The header runs through the last of the date/time/receipt-number anchor
/// lines; the footer starts at the first totals anchor line. Without
/// anchors the header collapses to the first line and the footer to
/// nothing, matching the conservative reading of an unstructured receipt.
pub fn divide(text: &str) -> Sections {
    let lines: Vec<&str> = text.lines().collect();

    let header_last = HEADER_ANCHORS
        .iter()
        .filter_map(|(word, cutoff)| find_anchor_line(text, word, *cutoff))
        .max()
        .unwrap_or(0);

    let footer_first = FOOTER_ANCHORS
        .iter()
        .filter_map(|(word, cutoff)| find_anchor_line(text, word, *cutoff))
        .min()
        .unwrap_or(lines.len());

    Sections {
        header: lines[..(header_last + 1).min(lines.len())].join("\n"),
        footer: lines[footer_first.min(lines.len())..].join("\n"),
    }
}
