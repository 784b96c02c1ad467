//! Process command - extract fields from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use ipx_core::{DocumentParser, ExtractionResult, FieldName, InsuranceParser};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or JSON page dump)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only report these fields (e.g. --field total_premium)
    #[arg(long = "field")]
    fields: Vec<FieldName>,

    /// Show average confidence and processing time
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row per field)
    Csv,
    /// Plain text field listing
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let parser = InsuranceParser::from_config(&config);
    let mut result = parser.parse_file(&args.input)?;

    if !args.fields.is_empty() {
        retain_fields(&mut result, &args.fields);
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Average confidence: {:.1}%",
            style("ℹ").blue(),
            result.average_confidence() * 100.0
        );
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            start.elapsed().as_millis()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Drop every field not listed in `keep`.
fn retain_fields(result: &mut ExtractionResult, keep: &[FieldName]) {
    result.fields = result
        .fields
        .iter()
        .filter(|(name, _)| keep.contains(name))
        .map(|(name, field)| (name, field.clone()))
        .collect();
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", result.to_json()?)),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value", "confidence", "page"])?;

    for (name, field) in result.fields.sorted_by_name() {
        wtr.write_record([
            name.as_str(),
            &field.value.to_string(),
            &format!("{:.2}", field.confidence),
            &field.page.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let meta = &result.document_metadata;
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", meta.filename));
    output.push_str(&format!("Pages: {}\n", meta.pages));
    output.push_str(&format!("Document Type: {}\n", meta.document_type));
    output.push_str(&format!("\nExtracted Fields ({}):\n", result.fields.len()));

    for (name, field) in result.fields.sorted_by_name() {
        output.push_str(&format!("\n{}:\n", name.label()));
        output.push_str(&format!("  Value: {}\n", field.value));
        output.push_str(&format!("  Confidence: {:.2}\n", field.confidence));
        output.push_str(&format!("  Page: {}\n", field.page));
        let context: String = field.context.chars().take(100).collect();
        output.push_str(&format!("  Context: {}\n", context.replace('\n', " ")));
    }

    if !result.tables_extracted.is_empty() {
        output.push_str(&format!("\nTables Found: {}\n", result.tables_extracted.len()));
        for (i, table) in result.tables_extracted.iter().enumerate() {
            output.push_str(&format!(
                "  Table {} (Page {}): {}\n",
                i + 1,
                table.page,
                table.table_type
            ));
        }
    }

    if !result.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  ⚠ {}\n", warning));
        }
    }

    output
}
