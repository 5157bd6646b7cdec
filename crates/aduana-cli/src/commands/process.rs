//! Process command - extract one document from one or more pages.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{debug, info};

use aduana_core::extraction::rules::{verify_container, verify_rut};
use aduana_core::input::sha256_hex;
use aduana_core::models::config::AduanaConfig;
use aduana_core::{
    create_gateway, CustomsRecord, DocumentKind, DocumentProcessor, ExtractedDocument, ScannedFile,
};

use super::{is_image_input, is_text_input, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input files: PNG/JPEG scans or `.txt` OCR text, in page order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Document type (e.g. guia-despacho, din, tatc)
    #[arg(short, long)]
    kind: DocumentKind,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence
    #[arg(long)]
    show_confidence: bool,

    /// Check RUT and container check digits
    #[arg(long)]
    verify: bool,

    /// Fail when a critical field is missing
    #[arg(long)]
    strict: bool,
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

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    for input in &args.inputs {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
        if !is_text_input(input) && !is_image_input(input) {
            anyhow::bail!("Unsupported file format: {}", input.display());
        }
    }

    let text_inputs = args.inputs.iter().filter(|p| is_text_input(p)).count();
    if text_inputs != 0 && text_inputs != args.inputs.len() {
        anyhow::bail!("Cannot mix text and image pages in one document");
    }

    info!("Processing {} page(s) as {}", args.inputs.len(), args.kind);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(format!("Extracting {}...", args.kind));
    pb.enable_steady_tick(Duration::from_millis(100));

    let kind = args.kind;
    let inputs = args.inputs.clone();
    let document =
        tokio::task::spawn_blocking(move || extract(kind, &inputs, &config)).await??;

    pb.finish_and_clear();

    if args.verify {
        for warning in verify_identifiers(&document.record)? {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
    }

    let output = format_document(&document, args.format)?;

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

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}% ({})",
            style("ℹ").blue(),
            document.metadata.confidence * 100.0,
            document.metadata.extraction_method.label()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if args.strict && !document.is_valid() {
        anyhow::bail!("Document is invalid: {}", document.metadata.comments);
    }

    Ok(())
}

/// Run the text or image pipeline, depending on the inputs.
fn extract(
    kind: DocumentKind,
    inputs: &[PathBuf],
    config: &AduanaConfig,
) -> anyhow::Result<ExtractedDocument> {
    let processor = DocumentProcessor::new(config.extraction.clone());

    if inputs.iter().all(|p| is_text_input(p)) {
        return text_document(&processor, kind, inputs);
    }

    let gateway = create_gateway(&config.ocr)?;
    debug!("Using OCR gateway {}", gateway.name());
    let processor = processor.with_gateway(gateway);

    let pages = inputs
        .iter()
        .map(|p| ScannedFile::from_path(p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(processor.process_pages(kind, &pages)?)
}

/// Extract a document from `.txt` pages.
pub fn text_document(
    processor: &DocumentProcessor,
    kind: DocumentKind,
    paths: &[PathBuf],
) -> anyhow::Result<ExtractedDocument> {
    let pages = paths
        .iter()
        .map(fs::read_to_string)
        .collect::<Result<Vec<_>, _>>()?;

    let mut document = processor.process_text_pages(kind, &pages);
    if let Some(first) = paths.first() {
        document.metadata.file_name = file_name(first);
        document.metadata.content_hash = sha256_hex(pages.concat().as_bytes());
    }
    Ok(document)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Record fields as `(name, value)` in declaration order.
pub fn record_fields(record: &CustomsRecord) -> anyhow::Result<Vec<(String, String)>> {
    let value = serde_json::to_value(record)?;
    let Some(map) = value.as_object() else {
        anyhow::bail!("record did not serialize to an object");
    };

    Ok(map
        .iter()
        .filter(|(name, _)| name.as_str() != "document_type")
        .map(|(name, value)| (name.clone(), value_text(value)))
        .collect())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Warnings for RUTs and container ids whose check digit does not match.
fn verify_identifiers(record: &CustomsRecord) -> anyhow::Result<Vec<String>> {
    let mut warnings = Vec::new();

    for (name, value) in record_fields(record)? {
        if value.is_empty() {
            continue;
        }
        if (name == "rut" || name.starts_with("rut_")) && !verify_rut(&value) {
            warnings.push(format!("{}: {} has an invalid check digit", name, value));
        }
        let is_container = matches!(name.as_str(), "contenedor" | "numero_contenedor");
        if is_container && !verify_container(&value) {
            warnings.push(format!("{}: {} has an invalid check digit", name, value));
        }
    }

    Ok(warnings)
}

pub fn format_document(document: &ExtractedDocument, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(document)?),
        OutputFormat::Csv => format_csv(document),
        OutputFormat::Text => format_text(document),
    }
}

fn format_csv(document: &ExtractedDocument) -> anyhow::Result<String> {
    let fields = record_fields(&document.record)?;
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
    header.extend(["valid", "confidence", "comments"]);
    wtr.write_record(&header)?;

    let valid = document.metadata.valid.to_string();
    let confidence = format!("{:.2}", document.metadata.confidence);
    let mut row: Vec<&str> = fields.iter().map(|(_, value)| value.as_str()).collect();
    row.extend([valid.as_str(), confidence.as_str(), document.metadata.comments.as_str()]);
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(document: &ExtractedDocument) -> anyhow::Result<String> {
    let metadata = &document.metadata;
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", document.kind()));
    if !metadata.file_name.is_empty() {
        output.push_str(&format!("File: {}\n", metadata.file_name));
    }
    output.push_str(&format!("Pages: {}\n", metadata.page_count));
    output.push_str(&format!(
        "Valid: {}\n",
        if metadata.valid { "yes" } else { "no" }
    ));
    if !metadata.missing_fields.is_empty() {
        output.push_str(&format!("Missing: {}\n", metadata.missing_fields.join(", ")));
    }
    output.push('\n');

    output.push_str("Fields:\n");
    for (name, value) in record_fields(&document.record)? {
        let shown = if value.is_empty() { "-" } else { value.as_str() };
        output.push_str(&format!("  {}: {}\n", name, shown));
    }

    if !metadata.comments.is_empty() {
        output.push_str(&format!("\nComments: {}\n", metadata.comments));
    }

    Ok(output)
}
