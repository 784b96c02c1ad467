//! Batch processing command for multiple documents.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use ipx_core::{DocumentParser, ExtractionResult, InsuranceParser};

use super::load_config;
use super::process::{format_result, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files (e.g. "policies/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "json")
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

    let output_paths = match &args.output_dir {
        Some(output_dir) => {
            fs::create_dir_all(output_dir)?;
            output_paths(&files, output_dir, args.format)?
        }
        None => Vec::new(),
    };

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = InsuranceParser::from_config(&config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = parser.parse_file(&path);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(extraction) => {
                // unreadable documents come back as a result with a warning
                let error = extraction
                    .warnings
                    .iter()
                    .find(|w| w.starts_with("Error processing PDF"))
                    .cloned();
                if let Some(ref message) = error {
                    if !args.continue_on_error {
                        error!("Failed to process {}: {}", path.display(), message);
                        anyhow::bail!("Processing failed: {}", message);
                    }
                    warn!("Failed to process {}: {}", path.display(), message);
                }
                results.push(ProcessResult {
                    path,
                    extraction: Some(extraction),
                    error,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let message = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
                warn!("Failed to process {}: {}", path.display(), message);
                results.push(ProcessResult {
                    path,
                    extraction: None,
                    error: Some(message),
                    processing_time_ms,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    for (result, output_path) in results.iter().zip(&output_paths) {
        if let Some(extraction) = &result.extraction {
            fs::write(output_path, format_result(extraction, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
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

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// `<stem>_extracted.<ext>` per input, refusing names that would overwrite
/// an input or each other.
fn output_paths(
    files: &[PathBuf],
    output_dir: &Path,
    format: OutputFormat,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut paths = Vec::with_capacity(files.len());

    for input in files {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let output = output_dir.join(format!("{}_extracted.{}", stem, format.extension()));

        if files.contains(&output) {
            anyhow::bail!("Output {} would overwrite an input file", output.display());
        }
        if let Some(other) = claimed.insert(output.clone(), input.as_path()) {
            anyhow::bail!(
                "{} and {} would both write {}",
                other.display(),
                input.display(),
                output.display()
            );
        }
        paths.push(output);
    }

    Ok(paths)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "pages",
        "fields",
        "average_confidence",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let status = if result.error.is_some() { "error" } else { "success" };

        match &result.extraction {
            Some(extraction) => {
                wtr.write_record([
                    filename,
                    status,
                    extraction.document_metadata.document_type.as_str(),
                    &extraction.document_metadata.pages.to_string(),
                    &extraction.fields.len().to_string(),
                    &format!("{:.2}", extraction.average_confidence()),
                    &extraction.warnings.len().to_string(),
                    &result.processing_time_ms.to_string(),
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
            None => {
                wtr.write_record([
                    filename,
                    status,
                    "",
                    "",
                    "",
                    "",
                    "",
                    &result.processing_time_ms.to_string(),
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
