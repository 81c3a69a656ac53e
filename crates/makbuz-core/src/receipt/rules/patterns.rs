//! Regex pattern tables for Turkish receipt extraction.
//!
//! Each field carries an ordered list: most specific and most reliable
//! first, loosest last. OCR output varies per engine and per receipt
//! (delimiters `.` `/` `-`, decimal `,` vs `.`, stray `*` `#` `©`
//! markers), so single patterns have poor recall; the extractors walk
//! each list and take the first match that survives validation.

use lazy_static::lazy_static;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid pattern"))
        .collect()
}

lazy_static! {
    // Date: day-first with ./-/ separators, plus the ISO order some
    // engines emit.
    pub static ref DATE_PATTERNS: Vec<Regex> = compile(&[
        r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b",
        r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b",
        r"\b(\d{1,2})-(\d{1,2})-(\d{4})\b",
    ]);

    pub static ref DATE_YMD: Regex =
        Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap();

    // Time: colon form first; the dotted form is a common misread of it.
    pub static ref TIME_PATTERNS: Vec<Regex> = compile(&[
        r"\b(\d{1,2}):(\d{2})(?::\d{2})?\b",
        r"\b(\d{2})\.(\d{2})(?:\.\d{2})?\b",
    ]);

    // Total: TOPLAM/TUTAR label, optional stray markers, amount with
    // optional thousands separators and a 2-digit decimal part.
    pub static ref TOTAL_PATTERNS: Vec<Regex> = compile(&[
        r"(?:TOPLAM|TUTAR)\s*[*#:X+©]?\s*\*(\d{1,3}(?:[., ]\d{3})*)[.,](\d{2})\b",
        r"(?:TOPLAM|TUTAR)\s*[*#:X+©]*\s*(\d{1,3}(?:[., ]\d{3})*)[.,](\d{2})\b",
        r"(?:TOPLAM|TUTAR)[^\S\n]*\n\s*\*?(\d{1,3}(?:[., ]\d{3})*)[.,](\d{2})\b",
        r"\bTOP\s*[*#:X+]?\s*\*?(\d{1,3}(?:[., ]\d{3})*)[.,](\d{2})\b",
        r"(?:TOPLAM|TUTAR)\s*[*#:X+]?\s*\*?(\d+)[.,](\d{1,2})\b",
    ]);

    // VAT: KDV/TOPKDV label, same numeric grammar as the total.
    pub static ref VAT_PATTERNS: Vec<Regex> = compile(&[
        r"(?:TOPKDV|KDV)\s*[*#:X«+©]?\s*\*(\d{1,3}(?:[., ]\d{3})*)[.,](\d{2})\b",
        r"(?:TOPKDV|KDV)\s*[*#:X«+©]*\s*(\d{1,3}(?:[., ]\d{3})*)[.,](\d{2})\b",
        r"\*?(\d{1,3}(?:[., ]\d{3})*)[.,](\d{2})\s*TOPKDV\b",
        r"(?:TOPKDV|KDV)\s*:?\s*(\d+)[.,](\d{1,2})\b",
    ]);

    // A bare amount, for scanning lines near a TOPKDV anchor.
    pub static ref AMOUNT: Regex =
        Regex::new(r"\*?(\d{1,3}(?:[., ]\d{3})*)[.,](\d{2})\b").unwrap();

    // Tax office name: the fragment before/after a VD-style marker. The
    // capture is only a candidate; the gazetteer decides what it really is.
    pub static ref OFFICE_NAME_PATTERNS: Vec<Regex> = compile(&[
        r"([A-ZÇĞİÖŞÜ][A-ZÇĞİÖŞÜ .]*?)\s*VERG[İI]\s*DA[İI]RES[İI]",
        r"VERG[İI]\s*DA[İI]RES[İI]\s*[;:,]?\s*([A-ZÇĞİÖŞÜ][A-ZÇĞİÖŞÜ .]+)",
        r"([A-ZÇĞİÖŞÜ][A-ZÇĞİÖŞÜ .]*?)\s*V\.?\s?D\.?\s*[:.]?\s*\d{10,11}",
        r"([A-ZÇĞİÖŞÜ][A-ZÇĞİÖŞÜ .]*?)\s*\bV\.?D\b",
        r"(.+?)\s*(?:V\.D\.?|VD\.?|VN\b|VERG[İI]\s*DA[İI]RES[İI])",
    ]);

    // Tax office number: a 10-11 digit token near its marker, same line
    // preferred. Spaced digit groups are rejoined before validation.
    pub static ref OFFICE_NUMBER_PATTERNS: Vec<Regex> = compile(&[
        r"(?:V\.?D\.?|VN|VKN|TCKN|VERG[İI]\s*DA[İI]RES[İI])[^\n\d]{0,10}(\d{10,11})\b",
        r"(?:V\.?D\.?|VN|VKN|TCKN)\s*[:./-]?\s*(\d[\d ]{8,13}\d)",
        r"(?m)^\s*(\d{10,11})\s*$",
    ]);

    // Any 10-11 digit token, for the all-lines fallback and for locating
    // the number line during gazetteer resolution.
    pub static ref TAX_NUMBER_TOKEN: Regex = Regex::new(r"\b(\d{10,11})\b").unwrap();

    // Payment method label as emitted by LLM-vision engines.
    pub static ref PAYMENT_LABEL: Regex =
        Regex::new(r"\*\*PAYMENT METHOD:\s*\*\*\s*(KRED[İI] KARTI|NAK[İI]T)\b").unwrap();

    // Line item: name tokens, quantity, *-prefixed price.
    pub static ref LINE_ITEM: Regex =
        Regex::new(r"([A-ZÇĞİÖŞÜ][A-ZÇĞİÖŞÜ ]+?)\s+(\d+)\s*\*\s*([\d.,]+)").unwrap();

    // Receipt number after a FİŞ NO label.
    pub static ref RECEIPT_NO_PATTERNS: Vec<Regex> = compile(&[
        r"F[İI]Ş\s*NO\s*[:.]?\s*([A-Z0-9-]+)",
        r"F[İI]S\s*NO\s*[:.]?\s*([A-Z0-9-]+)",
    ]);
}

/// Fuzzy-searched cash keywords; any hit decides the payment method.
pub const CASH_KEYWORDS: [&str; 2] = ["NAKİT", "NAKIT"];

/// Card-family keywords; any hit normalizes to the canonical card label.
pub const CARD_KEYWORDS: [&str; 8] = [
    "KREDİ KARTI",
    "KREDI KARTI",
    "KREDİ",
    "KREDI",
    "BANKA KARTI",
    "ORTAK POS",
    "VISA CREDIT",
    "YEMEK KARTI",
];
