//! Process command - extract data from a single receipt image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use makbuz_core::ReceiptRecord;

use super::{build_pipeline, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input image (JPG, PNG, TIFF, BMP)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !matches!(extension.as_str(), "jpg" | "jpeg" | "png" | "jfif" | "tiff" | "tif" | "bmp") {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Loading engines...");
    pb.set_position(10);

    let pipeline = build_pipeline(&config)?;
    debug!("engines: {:?}", pipeline.engine_names());

    pb.set_message("Running OCR and extraction...");
    pb.set_position(40);

    let record = pipeline.process(&args.input);

    pb.set_position(100);
    pb.finish_with_message("Done");

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    println!();
    println!(
        "{} {} of 8 fields extracted",
        style("ℹ").blue(),
        record.found_count()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_record(record: &ReceiptRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ReceiptRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "Filename",
        "Date",
        "Time",
        "Tax Office Name",
        "Tax Office Number",
        "Total Cost",
        "VAT",
        "Payment Method",
        "Receipt No",
        "Products",
    ])?;

    let products = format_products(record);
    wtr.write_record([
        record.filename.as_str(),
        record.date.display(),
        record.time.display(),
        record.tax_office_name.display(),
        record.tax_office_number.display(),
        record.total_cost.display(),
        record.vat.display(),
        record.payment_method.display(),
        record.receipt_number.display(),
        products.as_str(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ReceiptRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Receipt: {}\n", record.filename));
    for (field, value) in record.scalar_fields() {
        output.push_str(&format!("  {}: {}\n", field.label(), value));
    }

    if !record.products.is_empty() {
        output.push_str("  Products:\n");
        for (name, cost) in record.products.iter().zip(record.product_costs.iter()) {
            output.push_str(&format!("    {} - {}\n", name, cost));
        }
    }

    output
}

/// Products and costs joined pairwise for a single CSV cell.
pub fn format_products(record: &ReceiptRecord) -> String {
    record
        .products
        .iter()
        .zip(record.product_costs.iter())
        .map(|(name, cost)| format!("{} ({})", name, cost))
        .collect::<Vec<_>>()
        .join("; ")
}
