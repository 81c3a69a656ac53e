//! Receipt (fiş) number extraction.

use super::patterns::RECEIPT_NO_PATTERNS;

/// Extract the receipt number after a FİŞ NO label.
pub fn extract_receipt_number(text: &str) -> Option<String> {
    for pattern in RECEIPT_NO_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let number = caps[1].trim().to_uppercase();
            if !number.is_empty() {
                return Some(number);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_receipt_number_is_found() {
        assert_eq!(
            extract_receipt_number("FİŞ NO: 0042").as_deref(),
            Some("0042")
        );
        assert_eq!(
            extract_receipt_number("FİŞ NO 00123456").as_deref(),
            Some("00123456")
        );
    }

    #[test]
    fn ascii_misread_of_label_is_accepted() {
        assert_eq!(
            extract_receipt_number("FIS NO: A-17").as_deref(),
            Some("A-17")
        );
    }

    #[test]
    fn no_label_yields_none() {
        assert_eq!(extract_receipt_number("TOPLAM *44,40"), None);
    }
}
