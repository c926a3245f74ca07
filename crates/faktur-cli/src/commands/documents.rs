//! Input discovery and order-preserving parallel extraction.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use faktur_core::{pdf_to_text, DocumentBundle, FakturParser, SourceDocument};

/// Result of processing a single file.
pub struct ProcessResult {
    pub path: PathBuf,
    pub bundle: Option<DocumentBundle>,
    pub error: Option<String>,
    /// Rendered text was shorter than the configured minimum.
    pub low_text: bool,
}

impl ProcessResult {
    pub fn display_name(&self) -> String {
        self.bundle
            .as_ref()
            .map(|b| b.original_name.clone())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn is_supported(path: &Path, allow_text: bool) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    ext == "pdf" || (allow_text && ext == "txt")
}

/// Expand paths and glob patterns, keeping argument order.
pub fn expand_inputs(inputs: &[String], allow_text: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let matched: Vec<PathBuf> = glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file() && is_supported(p, allow_text))
            .collect();

        if matched.is_empty() {
            warn!("No supported files match {}", input);
        }
        files.extend(matched);
    }

    Ok(files)
}

/// Read a file and render its text. `.txt` files are taken as already rendered.
pub fn load_document(path: &Path) -> anyhow::Result<SourceDocument> {
    let original_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    let bytes = fs::read(path)?;
    let text = if is_supported(path, false) {
        pdf_to_text(&bytes)?
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };

    debug!("Read {} ({} bytes, {} chars of text)", path.display(), bytes.len(), text.len());
    Ok(SourceDocument::new(original_name, bytes, text))
}

pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb
}

fn failed(path: PathBuf, error: String) -> ProcessResult {
    ProcessResult {
        path,
        bundle: None,
        error: Some(error),
        low_text: false,
    }
}

/// Extract every file on blocking workers, at most `jobs` at a time.
///
/// Results come back in input order. Without `continue_on_error` the first
/// unreadable file (or panicking worker) aborts the batch.
pub async fn process_files(
    files: Vec<PathBuf>,
    parser: Arc<FakturParser>,
    jobs: usize,
    min_text_length: usize,
    continue_on_error: bool,
) -> anyhow::Result<Vec<ProcessResult>> {
    run_workers(files, jobs, continue_on_error, move |path| {
        load_document(path).map(|doc| {
            let low_text = doc.text.trim().len() < min_text_length;
            (parser.assemble(doc), low_text)
        })
    })
    .await
}

async fn run_workers<F>(
    files: Vec<PathBuf>,
    jobs: usize,
    continue_on_error: bool,
    work: F,
) -> anyhow::Result<Vec<ProcessResult>>
where
    F: Fn(&Path) -> anyhow::Result<(DocumentBundle, bool)> + Send + Sync + 'static,
{
    let pb = progress_bar(files.len());
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let work = Arc::new(work);
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let work = Arc::clone(&work);
        let worker_path = path.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            (*work)(&worker_path)
        });
        handles.push((path, handle));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        // A panicking worker (e.g. inside the PDF renderer) fails only its own file
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("worker failed: {}", e)),
        };
        pb.inc(1);

        match result {
            Ok((bundle, low_text)) => results.push(ProcessResult {
                path,
                bundle: Some(bundle),
                error: None,
                low_text,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(failed(path, error_msg));
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing {} failed: {}", path.display(), error_msg);
                }
            }
        }
    }

    pb.finish_and_clear();
    Ok(results)
}

/// Print non-fatal notices for documents that yielded little or nothing.
pub fn print_notices(results: &[ProcessResult]) {
    for result in results {
        let Some(bundle) = &result.bundle else {
            continue;
        };

        if result.low_text {
            eprintln!(
                "{} {}: no text could be extracted",
                style("⚠").yellow(),
                bundle.original_name
            );
        }
        if bundle.record.is_blank() {
            eprintln!(
                "{} {}: no fields could be extracted",
                style("⚠").yellow(),
                bundle.original_name
            );
        }
    }
}

/// Print the files that could not be read.
pub fn print_failures(results: &[ProcessResult]) {
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    if failed.is_empty() {
        return;
    }

    eprintln!();
    eprintln!("{}", style("Failed files:").red());
    for result in failed {
        eprintln!(
            "  - {}: {}",
            result.display_name(),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}
