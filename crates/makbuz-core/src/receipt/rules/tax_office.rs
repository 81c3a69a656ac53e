//! Tax-office name and number extraction.

use crate::resources::OfficeGazetteer;

use super::patterns::{OFFICE_NAME_PATTERNS, OFFICE_NUMBER_PATTERNS, TAX_NUMBER_TOKEN};

/// Extract and resolve the tax-office name.
///
/// Regex captures around the VD markers only produce a candidate string;
/// OCR mangles office names too often to trust them raw, so the result is
/// always resolved through the gazetteer. The matcher also scans near the
/// tax-number line when every pattern misses.
pub fn extract_tax_office_name(text: &str, gazetteer: &OfficeGazetteer) -> Option<String> {
    if gazetteer.is_empty() {
        return None;
    }

    for pattern in OFFICE_NAME_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(name) = gazetteer.resolve(&caps[1], text) {
                return Some(name);
            }
        }
    }

    gazetteer.resolve("", text)
}

/// Extract the 10-11 digit tax number (VKN/TCKN).
pub fn extract_tax_office_number(text: &str, excluded_prefixes: &[String]) -> Option<String> {
    for pattern in OFFICE_NUMBER_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let number: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
            if is_plausible_tax_number(&number, excluded_prefixes) {
                return Some(number);
            }
        }
    }

    // No marker found anywhere: fall back to the first plausible 10-11
    // digit token on any line.
    for line in text.lines() {
        for caps in TAX_NUMBER_TOKEN.captures_iter(line) {
            let number = caps[1].to_string();
            if is_plausible_tax_number(&number, excluded_prefixes) {
                return Some(number);
            }
        }
    }

    None
}

fn is_plausible_tax_number(number: &str, excluded_prefixes: &[String]) -> bool {
    if !(number.len() == 10 || number.len() == 11) {
        return false;
    }
    // 11-digit TCKNs never start with 0; an 11-digit token that does is a
    // phone number (0850/0800 service lines share the shape).
    if number.len() == 11 && number.starts_with('0') {
        return false;
    }
    !excluded_prefixes
        .iter()
        .any(|prefix| number.starts_with(prefix.as_str()))
}
