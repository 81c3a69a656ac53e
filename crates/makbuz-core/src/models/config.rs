//! Configuration structures for the receipt pipeline.
//!
//! Everything that was tuned empirically (engine order, fuzzy thresholds,
//! the VAT plausibility ceiling) lives here rather than in code.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the makbuz pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MakbuzConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Reference data paths.
    pub resources: ResourceConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engines in priority order. The first engine whose text yields a
    /// field wins that field.
    pub engines: Vec<EngineSpec>,

    /// Per-invocation timeout. A timed-out engine counts as a recognition
    /// failure for that image.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engines: vec![EngineSpec::tesseract()],
            timeout_secs: 60,
        }
    }
}

/// One external OCR engine invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSpec {
    /// Display name, recorded per extracted field.
    pub name: String,

    /// Program to execute.
    pub program: String,

    /// Arguments; `{image}` is replaced by the image path.
    pub args: Vec<String>,

    /// Run the image-enhancement step before recognition.
    pub preprocess: bool,
}

impl EngineSpec {
    /// The stock classical engine: Tesseract with Turkish+English models.
    pub fn tesseract() -> Self {
        Self {
            name: "tesseract".to_string(),
            program: "tesseract".to_string(),
            args: vec![
                "{image}".to_string(),
                "stdout".to_string(),
                "-l".to_string(),
                "tur+eng".to_string(),
                "--oem".to_string(),
                "3".to_string(),
                "--psm".to_string(),
                "6".to_string(),
            ],
            preprocess: true,
        }
    }
}

impl Default for EngineSpec {
    fn default() -> Self {
        Self::tesseract()
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum 0-100 similarity for a spelling correction to apply.
    pub correction_threshold: u32,

    /// Minimum 0-100 similarity for a tax-office fuzzy match.
    pub office_match_threshold: u32,

    /// Stricter threshold for whole-line office scans over the full text.
    pub office_line_scan_threshold: u32,

    /// VAT as a percentage of the total may not exceed this. Turkish VAT
    /// tops out at 20%; the margin absorbs OCR digit noise.
    pub max_vat_percent: u32,

    /// 0-100 cutoff for fuzzy payment-keyword hits.
    pub keyword_cutoff: u32,

    /// Tax-number candidates starting with these prefixes are discarded
    /// (customer-service phone numbers share the 10-11 digit shape).
    pub excluded_number_prefixes: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            correction_threshold: 70,
            office_match_threshold: 80,
            office_line_scan_threshold: 90,
            max_vat_percent: 22,
            keyword_cutoff: 70,
            excluded_number_prefixes: vec!["0850".to_string(), "0800".to_string()],
        }
    }
}

/// Reference data paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Spelling dictionary, one word per line.
    pub dictionary: PathBuf,

    /// Valid tax-office names, one per line.
    pub tax_offices: PathBuf,

    /// Persisted tax-office number → name map (JSON).
    pub office_map: PathBuf,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            dictionary: PathBuf::from("words.dic"),
            tax_offices: PathBuf::from("vergidaireleri.txt"),
            office_map: PathBuf::from("tax_offices.json"),
        }
    }
}

impl MakbuzConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engine_is_tesseract() {
        let config = MakbuzConfig::default();
        assert_eq!(config.ocr.engines.len(), 1);
        assert_eq!(config.ocr.engines[0].name, "tesseract");
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = MakbuzConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: MakbuzConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.extraction.max_vat_percent, 22);
        assert_eq!(parsed.ocr.timeout_secs, 60);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: MakbuzConfig =
            serde_json::from_str(r#"{"extraction": {"max_vat_percent": 25}}"#).unwrap();
        assert_eq!(parsed.extraction.max_vat_percent, 25);
        assert_eq!(parsed.extraction.correction_threshold, 70);
    }
}
