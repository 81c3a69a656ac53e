//! OCR engine adapters.
//!
//! Every engine (a local binary, a detection+recognition backend, an
//! LLM-vision script) sits behind the same contract: give it an image
//! path, get upper-cased text or nothing. Failures never cross this
//! boundary; a broken engine run is indistinguishable from an unreadable
//! image, and the pipeline falls through to the next engine either way.

mod command;
mod lines;

pub use command::{CommandEngine, Enhancer};
pub use lines::{cluster_into_lines, BoxDetection, ClusteredBoxEngine, BoxProvider, TextBox};

use std::path::Path;

use crate::error::OcrError;

/// Uniform interface over the underlying OCR engines.
pub trait OcrEngine: Send + Sync {
    /// Display name, recorded per extracted field for diagnostics.
    fn name(&self) -> &str;

    /// Recognize text in the image. Returns upper-cased text, or `None`
    /// for any failure: unreadable image, empty detections, engine crash,
    /// timeout. Implementations must not panic.
    fn recognize(&self, image: &Path) -> Option<String>;

    /// Setup-time availability check, run once before any processing. A
    /// misconfigured engine (missing binary) is fatal here rather than a
    /// silent per-image miss.
    fn verify(&self) -> Result<(), OcrError> {
        Ok(())
    }
}
