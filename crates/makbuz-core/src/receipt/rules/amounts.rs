//! Total-cost and VAT extraction.
//!
//! Both fields share one noisy numeric grammar: a label, optional stray
//! marker characters, an amount with mixed thousands/decimal separators.
//! Canonical output is decimal-point form, `<integer>.<2-digit-decimal>`.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT, TOTAL_PATTERNS, VAT_PATTERNS};

/// Extract the labeled receipt total, canonicalized.
pub fn extract_total_cost(text: &str) -> Option<String> {
    for pattern in TOTAL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(amount) = canonical_amount(&caps[1], &caps[2]) {
                return Some(amount);
            }
        }
    }
    None
}

/// Extract the labeled VAT amount, canonicalized.
///
/// A `TOPKDV` anchor line (or its immediate next line, since OCR often
/// wraps the amount) is scanned before the generic patterns. Candidates that
/// are not below the already-extracted total are skipped: the VAT grammar
/// loves latching onto the wrong number.
pub fn extract_vat(text: &str) -> Option<String> {
    let total = extract_total_cost(text).and_then(|t| parse_decimal(&t));
    let plausible = |candidate: &str| match (parse_decimal(candidate), total) {
        (Some(vat), Some(total)) => vat < total,
        (Some(_), None) => true,
        (None, _) => false,
    };

    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !line.contains("TOPKDV") {
            continue;
        }
        for scan in [Some(line), lines.get(i + 1)].into_iter().flatten() {
            if let Some(caps) = AMOUNT.captures(scan) {
                if let Some(amount) = canonical_amount(&caps[1], &caps[2]) {
                    if plausible(&amount) {
                        return Some(amount);
                    }
                }
            }
        }
    }

    for pattern in VAT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(amount) = canonical_amount(&caps[1], &caps[2]) {
                if plausible(&amount) {
                    return Some(amount);
                }
            }
        }
    }

    None
}

/// Build the canonical `<int>.<dd>` form from captured whole/decimal
/// parts, stripping thousands separators and padding short decimals.
fn canonical_amount(whole: &str, decimal: &str) -> Option<String> {
    let whole: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
    if whole.is_empty() {
        return None;
    }

    let decimal = match decimal.len() {
        0 => return None,
        1 => format!("{decimal}0"),
        2 => decimal.to_string(),
        // Over-captured digits belong to the integer part.
        _ => {
            let (extra, last_two) = decimal.split_at(decimal.len() - 2);
            return Some(format!("{whole}{extra}.{last_two}"));
        }
    };

    Some(format!("{whole}.{decimal}"))
}

pub(crate) fn parse_decimal(amount: &str) -> Option<Decimal> {
    Decimal::from_str(amount).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_prefixed_total_parses() {
        assert_eq!(extract_total_cost("TOPLAM *44,40").as_deref(), Some("44.40"));
    }

    #[test]
    fn plain_labeled_total_parses() {
        assert_eq!(extract_total_cost("TOPLAM 44,40").as_deref(), Some("44.40"));
        assert_eq!(extract_total_cost("TUTAR 44.40 TL").as_deref(), Some("44.40"));
    }

    #[test]
    fn thousands_separators_are_stripped() {
        assert_eq!(
            extract_total_cost("TOPLAM *1.234,56").as_deref(),
            Some("1234.56")
        );
        assert_eq!(
            extract_total_cost("TOPLAM 1 234,56").as_deref(),
            Some("1234.56")
        );
    }

    #[test]
    fn stray_markers_are_skipped() {
        assert_eq!(extract_total_cost("TOPLAM #44,40").as_deref(), Some("44.40"));
        assert_eq!(extract_total_cost("TOPLAM : 44,40").as_deref(), Some("44.40"));
    }

    #[test]
    fn amount_on_next_line_parses() {
        assert_eq!(
            extract_total_cost("TOPLAM\n*44,40").as_deref(),
            Some("44.40")
        );
    }

    #[test]
    fn single_digit_decimal_is_padded() {
        assert_eq!(extract_total_cost("TOPLAM 44,4").as_deref(), Some("44.40"));
    }

    #[test]
    fn missing_total_yields_none() {
        assert_eq!(extract_total_cost("EKMEK 1 *12,50"), None);
    }

    #[test]
    fn vat_from_topkdv_line() {
        let text = "TOPKDV *3,29\nTOPLAM *44,40";
        assert_eq!(extract_vat(text).as_deref(), Some("3.29"));
        assert_eq!(extract_total_cost(text).as_deref(), Some("44.40"));
    }

    #[test]
    fn vat_amount_wrapped_to_next_line() {
        let text = "TOPKDV\n*3,29\nTOPLAM *44,40";
        assert_eq!(extract_vat(text).as_deref(), Some("3.29"));
    }

    #[test]
    fn kdv_labeled_vat_parses() {
        assert_eq!(
            extract_vat("KDV 3,29\nTOPLAM 44,40").as_deref(),
            Some("3.29")
        );
    }

    #[test]
    fn vat_candidate_at_or_above_total_is_skipped() {
        // The only KDV candidate equals the total; nothing plausible remains.
        assert_eq!(extract_vat("TOPLAM 44,40\nKDV 44,40"), None);
    }

    #[test]
    fn missing_vat_yields_none() {
        assert_eq!(extract_vat("TOPLAM *44,40"), None);
    }
}
