//! Core library for Turkish receipt OCR processing.
//!
//! This crate provides:
//! - OCR engine adapters (external binaries, box-producing backends)
//! - Dictionary-based spelling correction of raw OCR text
//! - Regex field extraction (date, time, totals, VAT, tax office,
//!   payment method, line items)
//! - Fuzzy tax-office resolution against the official office list
//! - The multi-engine orchestration pipeline with per-field fallback

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod resources;
pub mod text;

pub use error::{MakbuzError, OcrError, ResourceError, Result};
pub use models::config::{EngineSpec, ExtractionConfig, MakbuzConfig, OcrConfig, ResourceConfig};
pub use models::receipt::{FieldValue, ReceiptField, ReceiptRecord, NOT_FOUND};
pub use ocr::{ClusteredBoxEngine, CommandEngine, OcrEngine};
pub use receipt::{ReceiptPipeline, ReceiptPipelineBuilder};
pub use resources::{Lexicon, OfficeGazetteer, TaxOfficeMap};
pub use text::SpellCorrector;
