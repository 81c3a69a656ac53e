//! Dictionary-based spelling correction for raw OCR output.

use crate::resources::Lexicon;

use super::fuzzy::ratio;

/// Word-by-word, line-preserving spelling corrector.
///
/// Each word is checked against the dictionary; unknown words are replaced
/// by their closest dictionary entry when the similarity clears the
/// threshold, and left untouched otherwise. Correcting already-corrected
/// text is a no-op.
#[derive(Debug, Clone)]
pub struct SpellCorrector {
    dictionary: Lexicon,
    threshold: u32,
}

impl SpellCorrector {
    pub fn new(dictionary: Lexicon, threshold: u32) -> Self {
        Self {
            dictionary,
            threshold,
        }
    }

    /// Correct a multi-line OCR text. Line structure is preserved; words
    /// within a line are rejoined with single spaces.
    pub fn correct(&self, text: &str) -> String {
        let corrected: Vec<String> = text.lines().map(|line| self.correct_line(line)).collect();
        corrected.join("\n")
    }

    fn correct_line(&self, line: &str) -> String {
        let words: Vec<String> = line
            .split_whitespace()
            .map(|word| self.correct_word(word))
            .collect();
        words.join(" ")
    }

    fn correct_word(&self, word: &str) -> String {
        // `$` is a stock OCR misread of `Ş` on Turkish receipts.
        let word = word.replace('$', "Ş");
        let upper = word.to_uppercase();

        if self.dictionary.is_empty() || self.dictionary.contains(&upper) {
            return word;
        }

        match self.dictionary.best_match(|entry| ratio(&upper, entry)) {
            Some((entry, score)) if score >= self.threshold => entry.to_string(),
            _ => word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> SpellCorrector {
        let dictionary = Lexicon::from_entries(["TOPLAM", "TOPKDV", "TARİH", "NAKİT", "ŞUBE"]);
        SpellCorrector::new(dictionary, 70)
    }

    #[test]
    fn known_words_are_kept() {
        assert_eq!(corrector().correct("TOPLAM NAKİT"), "TOPLAM NAKİT");
    }

    #[test]
    fn near_misses_are_corrected() {
        assert_eq!(corrector().correct("TOPLAN 44,40"), "TOPLAM 44,40");
        assert_eq!(corrector().correct("TOPKOV 3,29"), "TOPKDV 3,29");
    }

    #[test]
    fn distant_words_are_left_alone() {
        assert_eq!(corrector().correct("XQZW"), "XQZW");
    }

    #[test]
    fn dollar_sign_is_normalized_to_turkish_s() {
        assert_eq!(corrector().correct("$UBE"), "ŞUBE");
    }

    #[test]
    fn line_structure_is_preserved() {
        let corrected = corrector().correct("TOPLAN\n\nNAKİT");
        assert_eq!(corrected, "TOPLAM\n\nNAKİT");
    }

    #[test]
    fn correction_is_idempotent() {
        let corrector = corrector();
        let once = corrector.correct("TOPLAN *44,40\n$UBE KODU\nQXJZW");
        let twice = corrector.correct(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_dictionary_changes_nothing() {
        let corrector = SpellCorrector::new(Lexicon::default(), 70);
        assert_eq!(corrector.correct("TOPLAN 44,40"), "TOPLAN 44,40");
    }
}
