//! Time extraction.

use super::patterns::TIME_PATTERNS;

/// Labels that precede a time; OCR sometimes fuses them with the digits.
const TIME_LABELS: [&str; 2] = ["SAAT", "TIME"];

/// Extract the receipt time as `HH:MM` (24h).
pub fn extract_time(text: &str) -> Option<String> {
    for pattern in TIME_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let hour: u32 = caps[1].parse().ok()?;
            let minute: u32 = caps[2].parse().ok()?;
            if let Some(time) = valid_time(hour, minute) {
                return Some(time);
            }
        }
    }

    // Squished label runs: "SAAT1747" carries hour 17, minute 47. Scan
    // lines with a time label and read the first four digits.
    for line in text.lines() {
        let upper = line.to_uppercase();
        if !TIME_LABELS.iter().any(|label| upper.contains(label)) {
            continue;
        }

        let digits: Vec<u32> = upper.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() >= 4 {
            let hour = digits[0] * 10 + digits[1];
            let minute = digits[2] * 10 + digits[3];
            if let Some(time) = valid_time(hour, minute) {
                return Some(time);
            }
        }
    }

    None
}

fn valid_time(hour: u32, minute: u32) -> Option<String> {
    if hour < 24 && minute < 60 {
        Some(format!("{hour:02}:{minute:02}"))
    } else {
        None
    }
}
