//! Receipt field extraction: rules, cross-field validation, and the
//! multi-engine pipeline.

pub mod pipeline;
pub mod rules;
pub mod validate;

pub use pipeline::{ReceiptPipeline, ReceiptPipelineBuilder};
pub use validate::validate_totals;
