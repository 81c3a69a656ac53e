//! Cross-field reconciliation of total cost and VAT.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::receipt::FieldValue;

use super::rules::amounts::parse_decimal;

/// Reconcile the extracted total and VAT.
///
/// VAT shares the total's noisy numeric grammar and frequently latches
/// onto the wrong number on the receipt; checking it against the known
/// tax-rate ceiling catches most of those without any layout awareness.
/// Rules, in order:
///
/// 1. no total: VAT alone is not trustworthy, drop both;
/// 2. no VAT: nothing to reconcile;
/// 3. VAT at or above the inclusive total is impossible, drop VAT;
/// 4. VAT above `max_vat_percent` of the total is implausible, drop VAT;
/// 5. otherwise keep both.
pub fn validate_totals(
    total: FieldValue,
    vat: FieldValue,
    max_vat_percent: u32,
) -> (FieldValue, FieldValue) {
    let Some(total_value) = total.value.as_deref().and_then(parse_decimal) else {
        return (FieldValue::not_found(), FieldValue::not_found());
    };

    let Some(vat_value) = vat.value.as_deref().and_then(parse_decimal) else {
        return (total, FieldValue::not_found());
    };

    if vat_value >= total_value {
        debug!(%vat_value, %total_value, "VAT not below total, dropping");
        return (total, FieldValue::not_found());
    }

    let percentage = vat_value / total_value * Decimal::from(100);
    if percentage > Decimal::from(max_vat_percent) {
        debug!(%percentage, "VAT percentage out of band, dropping");
        return (total, FieldValue::not_found());
    }

    (total, vat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: &str) -> FieldValue {
        FieldValue::found(value.to_string(), "test")
    }

    #[test]
    fn plausible_pair_is_kept() {
        // 3.29 / 44.40 ≈ 7.4%, well inside the band.
        let (total, vat) = validate_totals(field("44.40"), field("3.29"), 22);
        assert_eq!(total.display(), "44.40");
        assert_eq!(vat.display(), "3.29");
    }

    #[test]
    fn vat_without_total_is_dropped() {
        let (total, vat) = validate_totals(FieldValue::not_found(), field("3.29"), 22);
        assert!(!total.is_found());
        assert!(!vat.is_found());
    }

    #[test]
    fn total_without_vat_passes_through() {
        let (total, vat) = validate_totals(field("44.40"), FieldValue::not_found(), 22);
        assert_eq!(total.display(), "44.40");
        assert!(!vat.is_found());
    }

    #[test]
    fn vat_equal_to_total_is_dropped() {
        let (total, vat) = validate_totals(field("44.40"), field("44.40"), 22);
        assert_eq!(total.display(), "44.40");
        assert!(!vat.is_found());
    }

    #[test]
    fn vat_above_rate_ceiling_is_dropped() {
        // 95/100 = 95%: the extractor grabbed the wrong number.
        let (total, vat) = validate_totals(field("100.00"), field("95.00"), 22);
        assert_eq!(total.display(), "100.00");
        assert!(!vat.is_found());
    }

    #[test]
    fn vat_at_exact_ceiling_is_kept() {
        let (total, vat) = validate_totals(field("100.00"), field("22.00"), 22);
        assert_eq!(vat.display(), "22.00");
    }

    #[test]
    fn unparseable_total_drops_both() {
        let (total, vat) = validate_totals(field("garbage"), field("3.29"), 22);
        assert!(!total.is_found());
        assert!(!vat.is_found());
    }
}
