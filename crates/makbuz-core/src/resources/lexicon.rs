//! Line-delimited reference lists (spelling dictionary, tax-office names).
//!
//! Files in this domain come from unknown provenance and arrive in UTF-8
//! or one of the legacy Turkish code pages, so loading tries a sequence of
//! encodings before giving up.

use std::collections::HashSet;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252, WINDOWS_1254};
use tracing::warn;

use crate::error::ResourceError;

/// Encodings attempted in order. Windows-1254 covers ISO-8859-9 content.
static ENCODINGS: [&Encoding; 3] = [UTF_8, WINDOWS_1254, WINDOWS_1252];

/// An upper-cased, deduplicated reference word list.
///
/// Entries keep their file order so that tie-breaks in fuzzy matching stay
/// deterministic; the index gives O(1) membership checks. Immutable after
/// load and safe to share across workers.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Vec<String>,
    index: HashSet<String>,
}

impl Lexicon {
    /// Build a lexicon from raw entries (upper-cases and deduplicates).
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Lexicon::default();
        for entry in entries {
            let entry = entry.as_ref().trim().to_uppercase();
            if !entry.is_empty() && lexicon.index.insert(entry.clone()) {
                lexicon.entries.push(entry);
            }
        }
        lexicon
    }

    /// Load a lexicon from a line-delimited file, trying each supported
    /// encoding in turn.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let bytes = std::fs::read(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        for encoding in ENCODINGS {
            let (text, _, had_errors) = encoding.decode(&bytes);
            if !had_errors {
                return Ok(Self::from_entries(text.lines()));
            }
        }

        Err(ResourceError::Encoding {
            path: path.to_path_buf(),
        })
    }

    /// Load a lexicon, degrading to an empty list on any failure.
    ///
    /// A missing dictionary means spelling correction and gazetteer
    /// resolution simply never match; regex extraction still runs.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(lexicon) => lexicon,
            Err(e) => {
                warn!("could not load lexicon: {e}");
                Lexicon::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// O(1) membership check; the needle must already be upper-cased.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Best entry by the given scorer. Ties keep the first-encountered
    /// entry, which makes results deterministic across runs.
    pub fn best_match<F>(&self, scorer: F) -> Option<(&str, u32)>
    where
        F: Fn(&str) -> u32,
    {
        let mut best: Option<(&str, u32)> = None;
        for entry in &self.entries {
            let score = scorer(entry);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((entry, score));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_uppercased_and_deduplicated() {
        let lexicon = Lexicon::from_entries(["toplam", "TOPLAM", " kdv ", ""]);
        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains("TOPLAM"));
        assert!(lexicon.contains("KDV"));
    }

    #[test]
    fn best_match_prefers_first_on_tie() {
        let lexicon = Lexicon::from_entries(["BİRİNCİ", "İKİNCİ"]);
        let best = lexicon.best_match(|_| 50).unwrap();
        assert_eq!(best.0, "BİRİNCİ");
    }

    #[test]
    fn load_reads_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.dic");
        std::fs::write(&path, "TOPLAM\nVERGİ\n").unwrap();

        let lexicon = Lexicon::load(&path).unwrap();
        assert!(lexicon.contains("VERGİ"));
    }

    #[test]
    fn load_falls_back_to_turkish_code_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.dic");
        // "VERGİ" in Windows-1254: İ is 0xDD, invalid as UTF-8.
        std::fs::write(&path, [b'V', b'E', b'R', b'G', 0xDD, b'\n']).unwrap();

        let lexicon = Lexicon::load(&path).unwrap();
        assert!(lexicon.contains("VERGİ"));
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let lexicon = Lexicon::load_or_empty(Path::new("/nonexistent/words.dic"));
        assert!(lexicon.is_empty());
    }
}
