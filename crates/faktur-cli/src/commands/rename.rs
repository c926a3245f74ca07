//! Rename command - write renamed copies of invoice PDFs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use faktur_core::{dedupe_filenames, DocumentBundle, FilenameFormat, PLACEHOLDER};

use super::config::load_config;
use super::documents::{expand_inputs, print_failures, print_notices, process_files};

/// Arguments for the rename command.
#[derive(Args)]
pub struct RenameArgs {
    /// Input PDF files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Directory receiving the renamed copies
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Comma-separated fields forming the filename, in order
    #[arg(short, long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Literal text placed before the joined fields
    #[arg(long)]
    prefix: Option<String>,

    /// Number colliding filenames instead of overwriting
    #[arg(long)]
    dedupe: bool,

    /// Also write a summary CSV mapping original to generated names
    #[arg(long)]
    summary: bool,

    /// Print the generated names without writing files
    #[arg(long)]
    dry_run: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: RenameArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = Arc::new(config.build_parser()?);

    let mut format = config.naming.format();
    if let Some(fields) = &args.fields {
        format.fields = fields.iter().map(|f| f.trim().to_string()).collect();
    }
    if let Some(prefix) = &args.prefix {
        format.prefix = prefix.clone();
    }
    format.validate(&parser.field_names())?;

    let files = expand_inputs(&args.inputs, false)?;
    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for: {}", args.inputs.join(", "));
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let results = process_files(
        files,
        Arc::clone(&parser),
        args.jobs,
        config.pdf.min_text_length,
        args.continue_on_error,
    )
    .await?;

    let bundles: Vec<&DocumentBundle> = results.iter().filter_map(|r| r.bundle.as_ref()).collect();
    let names = generate_names(&bundles, &format, args.dedupe || config.naming.deduplicate)?;

    if args.dry_run {
        for (bundle, name) in bundles.iter().zip(&names) {
            println!("{} -> {}", bundle.original_name, name);
        }
    } else {
        fs::create_dir_all(&args.output_dir)?;
        for (bundle, name) in bundles.iter().zip(&names) {
            let output_path = args.output_dir.join(name);
            fs::write(&output_path, &bundle.bytes)?;
            debug!("Wrote {} as {}", bundle.original_name, output_path.display());
        }

        if args.summary {
            let summary_path = args.output_dir.join("summary.csv");
            write_summary(&summary_path, &bundles, &names, &format)?;
            println!(
                "{} Summary written to {}",
                style("✓").green(),
                summary_path.display()
            );
        }
    }

    print_notices(&results);

    println!();
    println!(
        "{} Renamed {} of {} files in {:?}",
        style("✓").green(),
        bundles.len(),
        results.len(),
        start.elapsed()
    );

    print_failures(&results);

    Ok(())
}

fn generate_names(
    bundles: &[&DocumentBundle],
    format: &FilenameFormat,
    deduplicate: bool,
) -> anyhow::Result<Vec<String>> {
    let names = bundles
        .iter()
        .map(|b| format.generate(&b.record))
        .collect::<Result<Vec<_>, _>>()?;

    if deduplicate {
        return Ok(dedupe_filenames(names));
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in &names {
        *counts.entry(name.as_str()).or_default() += 1;
    }
    for (name, count) in counts.iter().filter(|(_, c)| **c > 1) {
        warn!("{} documents map to {}; later copies overwrite earlier ones", count, name);
        eprintln!(
            "{} {} documents share the name {} (use --dedupe to number them)",
            style("⚠").yellow(),
            count,
            name
        );
    }
    info!("Generated {} filenames", names.len());

    Ok(names)
}

fn write_summary(
    path: &Path,
    bundles: &[&DocumentBundle],
    names: &[String],
    format: &FilenameFormat,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["original_name", "generated_name"];
    header.extend(format.fields.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (bundle, name) in bundles.iter().zip(names) {
        let mut row = vec![bundle.original_name.as_str(), name.as_str()];
        row.extend(
            format
                .fields
                .iter()
                .map(|f| bundle.record.get(f).unwrap_or(PLACEHOLDER)),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
