//! Tax-office name resolution against the official office list.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::text::fuzzy::{partial_ratio, ratio};

use super::Lexicon;

lazy_static! {
    /// A 10-11 digit token, the shape of VKN/TCKN tax numbers.
    static ref TAX_NUMBER_TOKEN: Regex = Regex::new(r"\b\d{10,11}\b").unwrap();
}

/// Fuzzy matcher over the fixed list of valid tax-office names.
///
/// Resolution never returns a raw OCR fragment: the output is always a
/// member of the loaded list, or nothing.
#[derive(Debug, Clone)]
pub struct OfficeGazetteer {
    offices: Lexicon,
    /// Acceptance threshold for candidate-vs-entry fuzzy matches.
    match_threshold: u32,
    /// Stricter threshold for whole-line scans over the full text.
    line_scan_threshold: u32,
}

impl OfficeGazetteer {
    pub fn new(offices: Lexicon, match_threshold: u32, line_scan_threshold: u32) -> Self {
        Self {
            offices,
            match_threshold,
            line_scan_threshold,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }

    /// Resolve a regex-captured candidate name against the office list,
    /// falling back to scanning around the tax-number line and finally to
    /// a strict whole-text line scan.
    pub fn resolve(&self, candidate: &str, full_text: &str) -> Option<String> {
        if self.offices.is_empty() {
            return None;
        }

        let candidate = candidate.trim().to_uppercase();

        // Exact membership first.
        if !candidate.is_empty() && self.offices.contains(&candidate) {
            return Some(candidate);
        }

        // Best fuzzy match. Window-aware scoring lets a captured fragment
        // ("ESENLER") resolve to its full entry ("ESENLER VERGİ DAİRESİ").
        if !candidate.is_empty() {
            if let Some(name) = self.fuzzy_match(&candidate, self.match_threshold) {
                return Some(name);
            }
        }

        // OCR often splits the office name from its marker; look on and
        // around the line holding the tax-number token.
        if let Some(name) = self.match_near_tax_number(full_text) {
            return Some(name);
        }

        self.line_scan(full_text)
    }

    fn fuzzy_match(&self, candidate: &str, threshold: u32) -> Option<String> {
        let (entry, score) = self
            .offices
            .best_match(|entry| ratio(candidate, entry).max(partial_ratio(candidate, entry)))?;
        if score >= threshold {
            debug!(score, entry, "fuzzy office match");
            Some(entry.to_string())
        } else {
            None
        }
    }

    fn match_near_tax_number(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();

        for (i, line) in lines.iter().enumerate() {
            if !TAX_NUMBER_TOKEN.is_match(line) {
                continue;
            }

            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(lines.len().saturating_sub(1));
            let nearby = &lines[lo..=hi];

            // Membership beats fuzzy on the nearby lines.
            for near in nearby {
                let upper = near.to_uppercase();
                for entry in self.offices.entries() {
                    if upper.contains(entry.as_str()) {
                        return Some(entry.clone());
                    }
                }
            }

            for near in nearby {
                if let Some(name) = self.fuzzy_match(&near.to_uppercase(), self.match_threshold) {
                    return Some(name);
                }
            }
        }

        None
    }

    /// Last resort: a line that is (or closely contains) an office name.
    fn line_scan(&self, text: &str) -> Option<String> {
        for line in text.lines() {
            let upper = line.trim().to_uppercase();
            if self.offices.contains(&upper) {
                return Some(upper);
            }
        }

        for entry in self.offices.entries() {
            for line in text.lines() {
                if partial_ratio(&line.to_uppercase(), entry) >= self.line_scan_threshold {
                    return Some(entry.clone());
                }
            }
        }

        None
    }
}
