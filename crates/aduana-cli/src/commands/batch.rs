//! Batch command - one document per input file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

use aduana_core::models::config::AduanaConfig;
use aduana_core::{create_gateway, DocumentKind, DocumentProcessor, ExtractedDocument, ScannedFile};

use super::process::{file_name, format_document, text_document, OutputFormat};
use super::{is_image_input, is_text_input, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Document type shared by every file
    #[arg(short, long)]
    kind: DocumentKind,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,
}

/// Outcome for one input file.
struct FileResult {
    path: PathBuf,
    result: Result<ExtractedDocument, String>,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: String,
    status: &'static str,
    document_type: &'a str,
    valid: Option<bool>,
    confidence: Option<f32>,
    missing_fields: String,
    comments: &'a str,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_text_input(p) || is_image_input(p))
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

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let kind = args.kind;
    let worker_pb = pb.clone();
    let results = tokio::task::spawn_blocking(move || {
        process_files(kind, &files, &config, &worker_pb)
    })
    .await?;

    pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Ok(document) = &result.result {
                let stem = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path =
                    output_dir.join(format!("{}.{}", stem, args.format.extension()));
                fs::write(&output_path, format_document(document, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let valid = results
        .iter()
        .filter(|r| r.result.as_ref().is_ok_and(|d| d.is_valid()))
        .count();
    let failed: Vec<&FileResult> = results.iter().filter(|r| r.result.is_err()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} valid, {} incomplete, {} failed",
        style(valid).green(),
        style(results.len() - valid - failed.len()).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(error) = &result.result {
                println!("  - {}: {}", result.path.display(), error);
            }
        }
    }

    Ok(())
}

/// Text files go through the text pipeline; images through one OCR batch.
/// Results come back in input order.
fn process_files(
    kind: DocumentKind,
    files: &[PathBuf],
    config: &AduanaConfig,
    pb: &ProgressBar,
) -> Vec<FileResult> {
    let processor = DocumentProcessor::new(config.extraction.clone());
    let mut results: Vec<Option<Result<ExtractedDocument, String>>> = vec![None; files.len()];

    let mut image_slots = Vec::new();
    let mut scans = Vec::new();
    for (index, path) in files.iter().enumerate() {
        if is_text_input(path) {
            let document = text_document(&processor, kind, std::slice::from_ref(path))
                .map_err(|e| e.to_string());
            results[index] = Some(document);
            pb.inc(1);
            continue;
        }

        match ScannedFile::from_path(path) {
            Ok(scan) => {
                image_slots.push(index);
                scans.push(scan);
            }
            Err(e) => {
                results[index] = Some(Err(e.to_string()));
                pb.inc(1);
            }
        }
    }

    if !scans.is_empty() {
        match create_gateway(&config.ocr) {
            Ok(gateway) => {
                let outcome = processor.with_gateway(gateway).process_batch(kind, &scans);
                let mut failures: HashMap<usize, String> = outcome
                    .failures
                    .into_iter()
                    .map(|f| (f.index, f.error.to_string()))
                    .collect();
                let mut documents = outcome.documents.into_iter();

                for (position, &index) in image_slots.iter().enumerate() {
                    results[index] = Some(match failures.remove(&position) {
                        Some(error) => Err(error),
                        None => documents
                            .next()
                            .ok_or_else(|| "no result returned".to_string()),
                    });
                }
            }
            Err(e) => {
                warn!("OCR gateway unavailable: {}", e);
                for &index in &image_slots {
                    results[index] = Some(Err(e.to_string()));
                }
            }
        }
        pb.inc(scans.len() as u64);
    }

    files
        .iter()
        .cloned()
        .zip(results)
        .map(|(path, result)| FileResult {
            path,
            result: result.unwrap_or_else(|| Err("not processed".to_string())),
        })
        .collect()
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        let filename = file_name(&result.path);
        let row = match &result.result {
            Ok(document) => SummaryRow {
                filename,
                status: "success",
                document_type: document.kind().as_str(),
                valid: Some(document.metadata.valid),
                confidence: Some(document.metadata.confidence),
                missing_fields: document.metadata.missing_fields.join(" "),
                comments: &document.metadata.comments,
                error: "",
            },
            Err(error) => SummaryRow {
                filename,
                status: "error",
                document_type: "",
                valid: None,
                confidence: None,
                missing_fields: String::new(),
                comments: "",
                error,
            },
        };
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}
