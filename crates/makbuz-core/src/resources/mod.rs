//! Shared read-only reference data: spelling dictionary, tax-office list,
//! and the persisted number → name mapping.

pub mod gazetteer;
pub mod lexicon;
pub mod office_map;

pub use gazetteer::OfficeGazetteer;
pub use lexicon::Lexicon;
pub use office_map::TaxOfficeMap;
