//! CLI subcommands and the shared pipeline wiring.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;
use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, warn};

use makbuz_core::ocr::Enhancer;
use makbuz_core::{CommandEngine, Lexicon, MakbuzConfig, ReceiptPipeline, TaxOfficeMap};

/// Load the configuration file, or defaults when none was given.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MakbuzConfig> {
    match config_path {
        Some(path) => Ok(MakbuzConfig::from_file(Path::new(path))?),
        None => Ok(MakbuzConfig::default()),
    }
}

/// Build the pipeline from configuration: engines in priority order,
/// reference lists, the persisted office map.
///
/// Engine availability is checked here, once, before any image is
/// processed: a missing OCR binary fails the run instead of silently
/// producing all-N/A records.
pub fn build_pipeline(config: &MakbuzConfig) -> anyhow::Result<ReceiptPipeline> {
    let timeout = Duration::from_secs(config.ocr.timeout_secs);

    let offices = Lexicon::load_or_empty(&config.resources.tax_offices);
    if offices.is_empty() {
        warn!("tax office list is empty; office names will not resolve");
    }

    let mut builder = ReceiptPipeline::builder()
        .with_dictionary(Lexicon::load_or_empty(&config.resources.dictionary))
        .with_offices(offices)
        .with_office_map(TaxOfficeMap::open_or_empty(&config.resources.office_map))
        .with_extraction(config.extraction.clone());

    for spec in &config.ocr.engines {
        let mut engine = CommandEngine::new(spec, timeout);
        if spec.preprocess {
            engine = engine.with_enhancer(default_enhancer());
        }
        debug!(engine = %spec.name, program = %spec.program, "configured engine");
        builder = builder.with_engine(Box::new(engine));
    }

    Ok(builder.build()?)
}

/// Stock image enhancement: grayscale plus a linear contrast stretch.
/// Receipt photos are low-contrast; this measurably helps the classical
/// engine without any layout-aware machinery.
fn default_enhancer() -> Enhancer {
    Box::new(|image: DynamicImage| {
        let mut gray = image.to_luma8();
        for pixel in gray.pixels_mut() {
            let value = pixel[0] as f32;
            pixel[0] = ((value - 128.0) * 1.5 + 128.0).clamp(0.0, 255.0) as u8;
        }
        DynamicImage::ImageLuma8(gray)
    })
}
