//! Extract command - print the metadata of one or more invoices.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use faktur_core::{DocumentBundle, ExtractedRecord, ORIGINAL_NAME, PLACEHOLDER};

use super::config::load_config;
use super::documents::{expand_inputs, print_failures, print_notices, process_files};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input files or glob patterns (.pdf, or .txt with already rendered text)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
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

#[derive(Serialize)]
struct RecordRow<'a> {
    #[serde(rename = "OriginalName")]
    original_name: &'a str,
    #[serde(flatten)]
    record: &'a ExtractedRecord,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = Arc::new(config.build_parser()?);

    let files = expand_inputs(&args.inputs, true)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.inputs.join(", "));
    }
    info!("Extracting {} files", files.len());

    let results = process_files(
        files,
        Arc::clone(&parser),
        args.jobs,
        config.pdf.min_text_length,
        args.continue_on_error,
    )
    .await?;

    let bundles: Vec<&DocumentBundle> = results.iter().filter_map(|r| r.bundle.as_ref()).collect();
    let output = format_records(&bundles, &parser.field_names(), args.format)?;

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

    print_notices(&results);
    print_failures(&results);

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_records(
    bundles: &[&DocumentBundle],
    field_names: &[String],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(bundles),
        OutputFormat::Csv => format_csv(bundles, field_names),
        OutputFormat::Text => Ok(format_text(bundles)),
    }
}

fn format_json(bundles: &[&DocumentBundle]) -> anyhow::Result<String> {
    let rows: Vec<RecordRow> = bundles
        .iter()
        .map(|b| RecordRow {
            original_name: &b.original_name,
            record: &b.record,
        })
        .collect();

    Ok(serde_json::to_string_pretty(&rows)?)
}

fn format_csv(bundles: &[&DocumentBundle], field_names: &[String]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Same column order as the JSON rows: uploaded name first
    let mut header = vec![ORIGINAL_NAME];
    header.extend(field_names.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for bundle in bundles {
        let mut row = vec![bundle.original_name.as_str()];
        row.extend(
            field_names
                .iter()
                .map(|name| bundle.record.get(name).unwrap_or(PLACEHOLDER)),
        );
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(bundles: &[&DocumentBundle]) -> String {
    let mut output = String::new();

    for bundle in bundles {
        output.push_str(&format!("File: {}\n", bundle.original_name));
        for (name, value) in bundle.record.iter() {
            output.push_str(&format!("  {}: {}\n", name, value));
        }
        output.push('\n');
    }

    output
}
