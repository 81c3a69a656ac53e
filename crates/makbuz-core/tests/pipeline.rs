//! End-to-end pipeline tests with scripted OCR engines.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use makbuz_core::{
    ExtractionConfig, Lexicon, OcrEngine, ReceiptPipeline, ReceiptPipelineBuilder, TaxOfficeMap,
};

/// Engine that always returns the same scripted text and counts its runs.
struct ScriptedEngine {
    name: String,
    text: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedEngine {
    fn new(name: &str, text: Option<&str>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name: name.to_string(),
                text: text.map(str::to_string),
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl OcrEngine for ScriptedEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, _image: &Path) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone()
    }
}

/// Engine that must never be consulted.
struct ForbiddenEngine;

impl OcrEngine for ForbiddenEngine {
    fn name(&self) -> &str {
        "forbidden"
    }

    fn recognize(&self, _image: &Path) -> Option<String> {
        panic!("lower-priority engine consulted after fields resolved");
    }
}

const FULL_RECEIPT: &str = "MİGROS TİCARET A.Ş.\n\
                            KADIKÖY VERGİ DAİRESİ VKN 1234567890\n\
                            FİŞ NO: 0042\n\
                            TARİH : 25.09.2024\n\
                            SAAT: 17:47\n\
                            EKMEK 1 *12,50\n\
                            SÜT 2 *29,90\n\
                            TOPKDV 3,29\n\
                            TOPLAM *44,40\n\
                            NAKİT";

fn offices() -> Lexicon {
    Lexicon::from_entries(["ESENLER VERGİ DAİRESİ", "KADIKÖY VERGİ DAİRESİ"])
}

fn builder() -> ReceiptPipelineBuilder {
    ReceiptPipeline::builder().with_offices(offices())
}

#[test]
fn full_receipt_resolves_every_field() {
    let (engine, _) = ScriptedEngine::new("primary", Some(FULL_RECEIPT));
    let pipeline = builder().with_engine(Box::new(engine)).build().unwrap();

    let record = pipeline.process(Path::new("fis1.jpg"));

    assert_eq!(record.filename, "fis1.jpg");
    assert_eq!(record.date.display(), "25/09/2024");
    assert_eq!(record.time.display(), "17:47");
    assert_eq!(record.tax_office_name.display(), "KADIKÖY VERGİ DAİRESİ");
    assert_eq!(record.tax_office_number.display(), "1234567890");
    assert_eq!(record.receipt_number.display(), "0042");
    assert_eq!(record.total_cost.display(), "44.40");
    assert_eq!(record.vat.display(), "3.29");
    assert_eq!(record.payment_method.display(), "NAKİT");
    assert_eq!(record.products, vec!["EKMEK", "SÜT"]);
    assert_eq!(record.product_costs, vec!["12,50", "29,90"]);
    assert_eq!(record.date.engine.as_deref(), Some("primary"));
}

#[test]
fn lower_priority_engines_are_not_consulted_once_fields_resolve() {
    let (engine, calls) = ScriptedEngine::new("primary", Some(FULL_RECEIPT));
    let pipeline = builder()
        .with_engine(Box::new(engine))
        .with_engine(Box::new(ForbiddenEngine))
        .build()
        .unwrap();

    let record = pipeline.process(Path::new("fis1.jpg"));

    assert!(record.date.is_found());
    // Memoized: one recognition run serves every field.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_engine_falls_through_to_the_next() {
    let (dead, dead_calls) = ScriptedEngine::new("dead", None);
    let (backup, _) = ScriptedEngine::new("backup", Some(FULL_RECEIPT));
    let pipeline = builder()
        .with_engine(Box::new(dead))
        .with_engine(Box::new(backup))
        .build()
        .unwrap();

    let record = pipeline.process(Path::new("fis1.jpg"));

    assert_eq!(record.total_cost.display(), "44.40");
    assert_eq!(record.total_cost.engine.as_deref(), Some("backup"));
    // The dead engine was tried once, not once per field.
    assert_eq!(dead_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn fields_resolve_per_engine_independently() {
    // The primary engine read the header but lost the totals block; the
    // backup read only the totals.
    let (partial, _) = ScriptedEngine::new("partial", Some("TARİH : 25.09.2024\nSAAT 17:47"));
    let (totals, _) = ScriptedEngine::new("totals", Some("TOPKDV 3,29\nTOPLAM *44,40"));
    let pipeline = builder()
        .with_engine(Box::new(partial))
        .with_engine(Box::new(totals))
        .build()
        .unwrap();

    let record = pipeline.process(Path::new("fis1.jpg"));

    assert_eq!(record.date.engine.as_deref(), Some("partial"));
    assert_eq!(record.total_cost.display(), "44.40");
    assert_eq!(record.total_cost.engine.as_deref(), Some("totals"));
}

#[test]
fn unreadable_image_yields_all_na_and_batch_continues() {
    let (dead1, _) = ScriptedEngine::new("dead1", None);
    let (dead2, _) = ScriptedEngine::new("dead2", None);
    let pipeline = builder()
        .with_engine(Box::new(dead1))
        .with_engine(Box::new(dead2))
        .build()
        .unwrap();

    let records = pipeline.extract_all(&["fis1.jpg", "fis2.jpg", "fis3.jpg"]);

    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.found_count(), 0);
        for (_, value) in record.scalar_fields() {
            assert_eq!(value.display(), "N/A");
        }
        assert!(record.products.is_empty());
    }
    // Stable output order.
    assert_eq!(records[0].filename, "fis1.jpg");
    assert_eq!(records[2].filename, "fis3.jpg");
}

#[test]
fn implausible_vat_is_dropped_by_cross_field_validation() {
    let text = "TOPLAM 100,00\nKDV 95,00";
    let (engine, _) = ScriptedEngine::new("primary", Some(text));
    let pipeline = builder().with_engine(Box::new(engine)).build().unwrap();

    let record = pipeline.process(Path::new("fis1.jpg"));

    assert_eq!(record.total_cost.display(), "100.00");
    assert_eq!(record.vat.display(), "N/A");
}

#[test]
fn spelling_correction_feeds_extraction() {
    // The label is garbled; the dictionary repairs it before the regex runs.
    let (engine, _) = ScriptedEngine::new("primary", Some("TOPLAN *44,40"));
    let pipeline = builder()
        .with_engine(Box::new(engine))
        .with_dictionary(Lexicon::from_entries(["TOPLAM", "TOPKDV", "NAKİT"]))
        .build()
        .unwrap();

    let record = pipeline.process(Path::new("fis1.jpg"));

    assert_eq!(record.total_cost.display(), "44.40");
}

#[test]
fn office_map_learns_and_recovers_names() {
    let dir = tempfile::tempdir().unwrap();
    let map_path = dir.path().join("offices.json");

    // First receipt: both name and number resolve, the pair is recorded.
    let (engine, _) = ScriptedEngine::new("primary", Some(FULL_RECEIPT));
    let pipeline = builder()
        .with_engine(Box::new(engine))
        .with_office_map(TaxOfficeMap::open(&map_path).unwrap())
        .build()
        .unwrap();
    let record = pipeline.process(Path::new("fis1.jpg"));
    assert!(record.tax_office_name.is_found());

    // Second receipt: only the number survived OCR; the map supplies the name.
    let (engine, _) = ScriptedEngine::new("primary", Some("VKN 1234567890\nTOPLAM 10,00"));
    let pipeline = builder()
        .with_engine(Box::new(engine))
        .with_office_map(TaxOfficeMap::open(&map_path).unwrap())
        .build()
        .unwrap();
    let record = pipeline.process(Path::new("fis2.jpg"));

    assert_eq!(record.tax_office_name.display(), "KADIKÖY VERGİ DAİRESİ");
    assert_eq!(record.tax_office_name.engine.as_deref(), Some("office-map"));
}

#[test]
fn building_without_engines_fails() {
    assert!(builder().build().is_err());
}

#[test]
fn extraction_thresholds_are_honored() {
    // With an impossible correction threshold the garbled label stays
    // garbled and the total is missed.
    let (engine, _) = ScriptedEngine::new("primary", Some("TOPLAN *44,40"));
    let pipeline = builder()
        .with_engine(Box::new(engine))
        .with_dictionary(Lexicon::from_entries(["TOPLAM"]))
        .with_extraction(ExtractionConfig {
            correction_threshold: 100,
            ..ExtractionConfig::default()
        })
        .build()
        .unwrap();

    let record = pipeline.process(Path::new("fis1.jpg"));
    assert_eq!(record.total_cost.display(), "N/A");
}
