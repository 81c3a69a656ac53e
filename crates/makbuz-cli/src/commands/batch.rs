//! Batch processing command for multiple receipt images.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use makbuz_core::{ReceiptPipeline, ReceiptRecord};

use super::{build_pipeline, load_config};
use super::process::{format_products, format_record};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-image results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: super::process::OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "jfif" | "tiff" | "tif" | "bmp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // Engine availability fails here, before the first image.
    let pipeline = build_pipeline(&config)?;
    debug!("engines: {:?}", pipeline.engine_names());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let records = process_batch(&pipeline, &files, args.jobs.max(1), &pb);
    pb.finish_with_message("Complete");

    // Per-image outputs
    if let Some(ref output_dir) = args.output_dir {
        for (path, record) in files.iter().zip(records.iter()) {
            let output_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("receipt");

            let extension = match args.format {
                super::process::OutputFormat::Json => "json",
                super::process::OutputFormat::Csv => "csv",
                super::process::OutputFormat::Text => "txt",
            };

            let output_path = output_dir.join(format!("{}.{}", output_name, extension));
            fs::write(&output_path, format_record(record, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Summary CSV
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &records)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let readable = records.iter().filter(|r| r.found_count() > 0).count();

    println!();
    println!(
        "{} Processed {} receipts in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} with extracted fields, {} unreadable",
        style(readable).green(),
        style(records.len() - readable).red()
    );

    Ok(())
}

/// Process the batch, sequentially or fanned out over scoped workers.
/// Output order always matches input order.
fn process_batch(
    pipeline: &ReceiptPipeline,
    files: &[PathBuf],
    jobs: usize,
    pb: &ProgressBar,
) -> Vec<ReceiptRecord> {
    if jobs <= 1 || files.len() <= 1 {
        return files
            .iter()
            .map(|path| {
                let record = pipeline.process(path);
                pb.inc(1);
                record
            })
            .collect();
    }

    // The pipeline is shared read-only across workers; each worker takes
    // every jobs-th file and results are reassembled by index.
    let mut slots: Vec<Option<ReceiptRecord>> = files.iter().map(|_| None).collect();

    std::thread::scope(|scope| {
        let mut worker_chunks: Vec<Vec<(usize, &mut Option<ReceiptRecord>)>> =
            (0..jobs).map(|_| Vec::new()).collect();
        for (idx, slot) in slots.iter_mut().enumerate() {
            worker_chunks[idx % jobs].push((idx, slot));
        }

        for chunk in worker_chunks {
            scope.spawn(move || {
                for (idx, slot) in chunk {
                    *slot = Some(pipeline.process(&files[idx]));
                    pb.inc(1);
                }
            });
        }
    });

    slots
        .into_iter()
        .zip(files.iter())
        .map(|(slot, path)| {
            slot.unwrap_or_else(|| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                ReceiptRecord::empty(&name)
            })
        })
        .collect()
}

fn write_summary(path: &PathBuf, records: &[ReceiptRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "Filename",
        "Date",
        "Time",
        "Tax Office Name",
        "Tax Office Number",
        "Total Cost",
        "VAT",
        "Payment Method",
        "Products",
    ])?;

    for record in records {
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
            products.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
