//! Date extraction.

use chrono::{Datelike, NaiveDate};

use super::patterns::{DATE_PATTERNS, DATE_YMD};

/// Receipt dates outside this window are OCR artifacts.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

/// Extract the receipt date as `DD/MM/YYYY`, zero-padded.
///
/// A syntactic match with an impossible day/month combination (Feb 31, a
/// 31st of a 30-day month) is rejected rather than returned malformed;
/// the next pattern gets its chance.
pub fn extract_date(text: &str) -> Option<String> {
    for pattern in DATE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let day: u32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let year: i32 = caps[3].parse().ok()?;

            if let Some(date) = valid_date(year, month, day) {
                return Some(format_date(date));
            }
        }
    }

    if let Some(caps) = DATE_YMD.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;

        if let Some(date) = valid_date(year, month, day) {
            return Some(format_date(date));
        }
    }

    None
}

fn valid_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !YEAR_RANGE.contains(&year) {
        return None;
    }
    // chrono enforces month lengths and leap-year February.
    NaiveDate::from_ymd_opt(year, month, day)
}

fn format_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_date_is_canonicalized() {
        assert_eq!(
            extract_date("TARİH : 25.09.2024").as_deref(),
            Some("25/09/2024")
        );
    }

    #[test]
    fn slash_and_dash_separators_parse() {
        assert_eq!(extract_date("25/09/2024").as_deref(), Some("25/09/2024"));
        assert_eq!(extract_date("25-09-2024").as_deref(), Some("25/09/2024"));
    }

    #[test]
    fn iso_order_parses() {
        assert_eq!(extract_date("2024-09-25").as_deref(), Some("25/09/2024"));
    }

    #[test]
    fn single_digit_fields_are_zero_padded() {
        assert_eq!(extract_date("1.2.2024").as_deref(), Some("01/02/2024"));
    }

    #[test]
    fn impossible_february_is_rejected() {
        assert_eq!(extract_date("TARİH : 31.02.2024"), None);
        assert_eq!(extract_date("29.02.2023"), None);
    }

    #[test]
    fn leap_year_february_29_is_accepted() {
        assert_eq!(extract_date("29.02.2024").as_deref(), Some("29/02/2024"));
        // 1900 is not a leap year, 2000 is.
        assert_eq!(extract_date("29.02.1900"), None);
        assert_eq!(extract_date("29.02.2000").as_deref(), Some("29/02/2000"));
    }

    #[test]
    fn thirty_day_months_reject_day_31() {
        assert_eq!(extract_date("31.04.2024"), None);
        assert_eq!(extract_date("31.11.2024"), None);
        assert_eq!(extract_date("30.04.2024").as_deref(), Some("30/04/2024"));
    }

    #[test]
    fn absurd_years_are_rejected() {
        assert_eq!(extract_date("25.09.8024"), None);
    }

    #[test]
    fn no_date_yields_none() {
        assert_eq!(extract_date("TOPLAM *44,40"), None);
        assert_eq!(extract_date(""), None);
    }
}
