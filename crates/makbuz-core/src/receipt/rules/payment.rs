//! Payment method extraction.

use crate::text::fuzzy::{partial_ratio, ratio};

use super::patterns::{CARD_KEYWORDS, CASH_KEYWORDS, PAYMENT_LABEL};

/// Canonical labels. Receipts name card schemes a dozen ways; all of them
/// collapse to the one card label.
pub const CASH: &str = "NAKİT";
pub const CARD: &str = "KREDİ KARTI";

/// Extract the payment method: `NAKİT`, `KREDİ KARTI`, or nothing.
///
/// Cash wins over card when both appear (a card line is often just the
/// terminal footer). Keywords are matched fuzzily at the given 0-100
/// cutoff to survive OCR noise.
pub fn extract_payment_method(text: &str, cutoff: u32) -> Option<String> {
    if let Some(caps) = PAYMENT_LABEL.captures(text) {
        let label = caps[1].to_uppercase();
        return Some(if label.starts_with("NAK") {
            CASH.to_string()
        } else {
            CARD.to_string()
        });
    }

    if CASH_KEYWORDS.iter().any(|kw| keyword_found(text, kw, cutoff)) {
        return Some(CASH.to_string());
    }

    if CARD_KEYWORDS.iter().any(|kw| keyword_found(text, kw, cutoff)) {
        return Some(CARD.to_string());
    }

    None
}

/// Single-word keywords match against whitespace tokens; multi-word
/// keywords match against whole lines with window-aware scoring.
fn keyword_found(text: &str, keyword: &str, cutoff: u32) -> bool {
    if keyword.contains(' ') {
        text.lines()
            .any(|line| partial_ratio(&line.to_uppercase(), keyword) >= cutoff.max(80))
    } else {
        text.split_whitespace()
            .any(|token| token == keyword || ratio(&token.to_uppercase(), keyword) >= cutoff)
    }
}
