//! The extraction pipeline: engine orchestration and field resolution.

use std::path::Path;

use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::ExtractionConfig;
use crate::models::receipt::{FieldValue, ReceiptField, ReceiptRecord};
use crate::ocr::OcrEngine;
use crate::resources::{Lexicon, OfficeGazetteer, TaxOfficeMap};
use crate::text::sections::divide;
use crate::text::SpellCorrector;

use super::rules;
use super::validate::validate_totals;

/// Engine name recorded for fields recovered from the persisted
/// number → name mapping rather than from OCR text.
const MAPPING_SOURCE: &str = "office-map";

/// Which text slice a field prefers. Extraction falls back to the full
/// text when the preferred slice yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slice {
    Header,
    Footer,
    Full,
}

/// The receipt extraction pipeline.
///
/// Holds the shared, read-only resources (engines in priority order, the
/// spelling dictionary, the office gazetteer) plus the one mutable
/// collaborator, the persisted office map. Everything here is `Sync`;
/// batch workers can share one pipeline.
pub struct ReceiptPipeline {
    engines: Vec<Box<dyn OcrEngine>>,
    corrector: SpellCorrector,
    gazetteer: OfficeGazetteer,
    office_map: Option<TaxOfficeMap>,
    extraction: ExtractionConfig,
}

/// Builder for [`ReceiptPipeline`].
pub struct ReceiptPipelineBuilder {
    engines: Vec<Box<dyn OcrEngine>>,
    dictionary: Lexicon,
    offices: Lexicon,
    office_map: Option<TaxOfficeMap>,
    extraction: ExtractionConfig,
}

impl ReceiptPipelineBuilder {
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
            dictionary: Lexicon::default(),
            offices: Lexicon::default(),
            office_map: None,
            extraction: ExtractionConfig::default(),
        }
    }

    /// Append an engine; earlier engines have higher priority.
    pub fn with_engine(mut self, engine: Box<dyn OcrEngine>) -> Self {
        self.engines.push(engine);
        self
    }

    /// Set the spelling dictionary.
    pub fn with_dictionary(mut self, dictionary: Lexicon) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Set the valid tax-office list.
    pub fn with_offices(mut self, offices: Lexicon) -> Self {
        self.offices = offices;
        self
    }

    /// Attach the persisted office number → name map.
    pub fn with_office_map(mut self, office_map: TaxOfficeMap) -> Self {
        self.office_map = Some(office_map);
        self
    }

    /// Set extraction thresholds.
    pub fn with_extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.extraction = extraction;
        self
    }

    /// Build the pipeline, verifying every engine up front. A
    /// misconfigured engine fails here, before any image is touched.
    pub fn build(self) -> Result<ReceiptPipeline, OcrError> {
        if self.engines.is_empty() {
            return Err(OcrError::NoEngines);
        }
        for engine in &self.engines {
            engine.verify()?;
        }

        let corrector =
            SpellCorrector::new(self.dictionary, self.extraction.correction_threshold);
        let gazetteer = OfficeGazetteer::new(
            self.offices,
            self.extraction.office_match_threshold,
            self.extraction.office_line_scan_threshold,
        );

        Ok(ReceiptPipeline {
            engines: self.engines,
            corrector,
            gazetteer,
            office_map: self.office_map,
            extraction: self.extraction,
        })
    }
}

impl Default for ReceiptPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptPipeline {
    pub fn builder() -> ReceiptPipelineBuilder {
        ReceiptPipelineBuilder::new()
    }

    /// Engine names in priority order.
    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Process one image into a record. Never fails: an image no engine
    /// can read yields an all-`"N/A"` record, and the caller's batch
    /// keeps going.
    pub fn process(&self, image: &Path) -> ReceiptRecord {
        let filename = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.display().to_string());

        debug!(%filename, "processing receipt");

        let mut runs = EngineRuns::new(self, image);

        let date = runs.resolve(ReceiptField::Date, Slice::Header, rules::extract_date);
        let time = runs.resolve(ReceiptField::Time, Slice::Header, rules::extract_time);
        let mut tax_office_name = runs.resolve(ReceiptField::TaxOfficeName, Slice::Header, |text| {
            rules::extract_tax_office_name(text, &self.gazetteer)
        });
        let tax_office_number =
            runs.resolve(ReceiptField::TaxOfficeNumber, Slice::Header, |text| {
                rules::extract_tax_office_number(text, &self.extraction.excluded_number_prefixes)
            });
        let receipt_number = runs.resolve(
            ReceiptField::ReceiptNumber,
            Slice::Header,
            rules::extract_receipt_number,
        );
        let total_cost =
            runs.resolve(ReceiptField::TotalCost, Slice::Footer, rules::extract_total_cost);
        let vat = runs.resolve(ReceiptField::Vat, Slice::Footer, rules::extract_vat);
        let payment_method = runs.resolve(ReceiptField::PaymentMethod, Slice::Footer, |text| {
            rules::extract_payment_method(text, self.extraction.keyword_cutoff)
        });
        let items = runs.resolve_items();

        // The persisted mapping fills a missing name when the number is
        // known, and learns from receipts where both resolved.
        if let Some(office_map) = &self.office_map {
            match (&tax_office_name.value, &tax_office_number.value) {
                (None, Some(number)) => {
                    if let Some(name) = office_map.get(number) {
                        tax_office_name = FieldValue::found(name, MAPPING_SOURCE);
                    }
                }
                (Some(name), Some(number)) => office_map.insert(number, name),
                _ => {}
            }
        }

        let (total_cost, vat) =
            validate_totals(total_cost, vat, self.extraction.max_vat_percent);

        let record = ReceiptRecord {
            filename,
            date,
            time,
            tax_office_name,
            tax_office_number,
            total_cost,
            vat,
            payment_method,
            receipt_number,
            products: items.names,
            product_costs: items.costs,
        };

        info!(
            filename = %record.filename,
            found = record.found_count(),
            "receipt processed"
        );

        record
    }

    /// Process a batch sequentially. Output order matches input order, and
    /// an unreadable image never aborts the rest.
    pub fn extract_all<P: AsRef<Path>>(&self, images: &[P]) -> Vec<ReceiptRecord> {
        images.iter().map(|p| self.process(p.as_ref())).collect()
    }
}

/// Normalized, section-split output of one engine run.
struct PreparedText {
    full: String,
    header: String,
    footer: String,
}

impl PreparedText {
    fn slice(&self, slice: Slice) -> &str {
        match slice {
            Slice::Header => &self.header,
            Slice::Footer => &self.footer,
            Slice::Full => &self.full,
        }
    }
}

/// Per-image memo of engine outputs.
///
/// Each engine runs at most once per image regardless of how many fields
/// consult it; the normalize/section work piggybacks on that single run.
struct EngineRuns<'a> {
    pipeline: &'a ReceiptPipeline,
    image: &'a Path,
    memo: Vec<Option<Option<PreparedText>>>,
}

impl<'a> EngineRuns<'a> {
    fn new(pipeline: &'a ReceiptPipeline, image: &'a Path) -> Self {
        let memo = (0..pipeline.engines.len()).map(|_| None).collect();
        Self {
            pipeline,
            image,
            memo,
        }
    }

    /// Recognize + normalize + section with engine `idx`, at most once.
    /// `None` means the engine failed on this image.
    fn prepared(&mut self, idx: usize) -> Option<&PreparedText> {
        if self.memo[idx].is_none() {
            let engine = &self.pipeline.engines[idx];
            let run = engine.recognize(self.image).map(|raw| {
                let full = self.pipeline.corrector.correct(&raw);
                let sections = divide(&full);
                PreparedText {
                    full,
                    header: sections.header,
                    footer: sections.footer,
                }
            });
            if run.is_none() {
                debug!(engine = engine.name(), "no text for {}", self.image.display());
            }
            self.memo[idx] = Some(run);
        }

        match &self.memo[idx] {
            Some(run) => run.as_ref(),
            None => None,
        }
    }

    /// Resolve one field: walk engines in priority order, preferred slice
    /// first, full text second; the first hit wins and lower-priority
    /// engines are left untouched for this field.
    fn resolve<F>(&mut self, field: ReceiptField, slice: Slice, extract: F) -> FieldValue
    where
        F: Fn(&str) -> Option<String>,
    {
        for idx in 0..self.pipeline.engines.len() {
            let engine = self.pipeline.engines[idx].name().to_string();
            let Some(text) = self.prepared(idx) else {
                continue;
            };

            let mut value = extract(text.slice(slice));
            if value.is_none() && slice != Slice::Full {
                value = extract(&text.full);
            }

            if let Some(value) = value {
                debug!(%field, %engine, %value, "field resolved");
                return FieldValue::found(value, &engine);
            }
        }

        debug!(%field, "field not found with any engine");
        FieldValue::not_found()
    }

    /// Resolve line items: first engine whose text yields any products.
    fn resolve_items(&mut self) -> rules::LineItems {
        for idx in 0..self.pipeline.engines.len() {
            let Some(text) = self.prepared(idx) else {
                continue;
            };
            let items = rules::extract_line_items(&text.full);
            if !items.is_empty() {
                return items;
            }
        }
        rules::LineItems::default()
    }
}
