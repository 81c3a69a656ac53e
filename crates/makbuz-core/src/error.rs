//! Error types for the makbuz-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the makbuz library.
#[derive(Error, Debug)]
pub enum MakbuzError {
    /// OCR engine setup error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Reference data (dictionary/gazetteer/office map) error.
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR engine setup.
///
/// Per-image recognition failures are not errors: engines report them as
/// `None` and the pipeline falls through to the next engine. Only
/// setup-time problems (a missing binary, an empty engine list) surface
/// here, before any image is processed.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The configured engine program cannot be executed.
    #[error("engine '{name}' unavailable: {reason}")]
    EngineUnavailable { name: String, reason: String },

    /// No engines were configured for the pipeline.
    #[error("no OCR engines configured")]
    NoEngines,

    /// Invalid image input.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to reference data files.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The file could not be decoded with any of the attempted encodings.
    #[error("could not decode {path} with any supported encoding")]
    Encoding { path: PathBuf },

    /// The office map file holds something other than a string map.
    #[error("malformed office map at {path}: {reason}")]
    MalformedMap { path: PathBuf, reason: String },

    /// I/O error while reading or writing a resource.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the makbuz library.
pub type Result<T> = std::result::Result<T, MakbuzError>;
