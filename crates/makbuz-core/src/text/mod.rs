//! Text utilities: fuzzy scoring, spelling correction, sectioning.

pub mod corrector;
pub mod fuzzy;
pub mod sections;

pub use corrector::SpellCorrector;
pub use fuzzy::{levenshtein_distance, partial_ratio, ratio};
pub use sections::{divide, find_anchor_line, Sections};
