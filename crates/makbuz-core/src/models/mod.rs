//! Data models: receipt records, field values, configuration.

pub mod config;
pub mod receipt;

pub use config::{EngineSpec, ExtractionConfig, MakbuzConfig, OcrConfig, ResourceConfig};
pub use receipt::{FieldValue, ReceiptField, ReceiptRecord, NOT_FOUND};
