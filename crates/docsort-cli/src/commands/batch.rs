//! Batch command - sort many documents into per-tab views.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use docsort_core::invoice::TabView;
use docsort_core::models::config::DocsortConfig;
use docsort_core::report::{number_gaps, summarize, NumberGaps, TabTotals};
use docsort_core::text::format_european;
use docsort_core::{
    DocumentExtractor, ExtractedInvoice, InvoiceExtractor, ManualOverrides, TabBatch,
};

use super::{format_invoice_text, format_invoices_csv, load_config, read_document, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files (PDF or .txt)
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write per-tab totals as CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// JSON file mapping filenames to manual overrides
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Order documents by modification time instead of by name
    #[arg(long)]
    by_date: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

enum Outcome {
    Filed(Box<ExtractedInvoice>),
    Hidden,
    Failed(String),
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Outcome,
}

#[derive(Serialize)]
struct FailedFile {
    path: String,
    error: String,
}

#[derive(Serialize)]
struct BatchReport<'a> {
    tabs: Vec<&'a TabView>,
    totals: &'a [TabTotals],
    eur_total: Decimal,
    gaps: &'a [NumberGaps],
    hidden: usize,
    failed: Vec<FailedFile>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }
    if args.by_date {
        files.sort_by_key(|p| (modified(p), p.clone()));
    }

    let overrides = match &args.overrides {
        Some(path) => load_overrides(path)?,
        None => BTreeMap::new(),
    };

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let results = process_files(files, &config, overrides, args.jobs, &pb).await?;
    pb.finish_and_clear();

    // dedup runs here, in input order, whatever order the workers finished in
    let mut batch = TabBatch::new(&config.tabs);
    let mut failed = Vec::new();
    for result in results {
        match result.outcome {
            Outcome::Filed(invoice) => {
                batch.push(*invoice);
            }
            Outcome::Hidden => batch.push_hidden(),
            Outcome::Failed(message) => {
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", result.path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
                warn!("Failed to process {}: {}", result.path.display(), message);
                failed.push(FailedFile {
                    path: result.path.display().to_string(),
                    error: message,
                });
            }
        }
    }

    let totals = summarize(&batch, &config.rates);
    let eur_total: Decimal = totals.iter().map(|t| t.eur_total).sum();
    let gaps = number_gaps(&batch, &config.tabs);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&BatchReport {
            tabs: batch.views().collect(),
            totals: &totals,
            eur_total,
            gaps: &gaps,
            hidden: batch.hidden(),
            failed,
        })?,
        OutputFormat::Csv => {
            let invoices: Vec<&ExtractedInvoice> =
                batch.views().flat_map(|v| v.invoices.iter()).collect();
            format_invoices_csv(&invoices)?
        }
        OutputFormat::Text => format_text(&batch, &totals, eur_total, &gaps, &failed),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &totals)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!(
        "{} Sorted {} documents into {} tabs in {:?}",
        style("✓").green(),
        totals.iter().map(|t| t.documents).sum::<usize>(),
        totals.len(),
        start.elapsed()
    );
    Ok(())
}

/// Fan the files out on the blocking pool, at most `jobs` at a time.
/// Results come back in input order.
async fn process_files(
    files: Vec<PathBuf>,
    config: &DocsortConfig,
    overrides: BTreeMap<String, ManualOverrides>,
    jobs: usize,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<FileResult>> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let config = Arc::new(config.clone());
    let extractor = Arc::new(config.document_extractor());
    let overrides = Arc::new(overrides);

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let config = Arc::clone(&config);
        let extractor = Arc::clone(&extractor);
        let overrides = Arc::clone(&overrides);
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let outcome = match process_file(&path, &config, &extractor, &overrides) {
                Ok(outcome) => outcome,
                Err(e) => Outcome::Failed(e.to_string()),
            };
            pb.inc(1);
            FileResult { path, outcome }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    Ok(results)
}

fn process_file(
    path: &Path,
    config: &DocsortConfig,
    extractor: &DocumentExtractor,
    overrides: &BTreeMap<String, ManualOverrides>,
) -> anyhow::Result<Outcome> {
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let overrides = overrides.get(filename).cloned().unwrap_or_default();
    if overrides.hidden {
        debug!("Skipping hidden document {}", filename);
        return Ok(Outcome::Hidden);
    }

    let doc = read_document(path, None, config)?;
    let invoice = extractor.extract_with_overrides(&doc, &overrides);
    Ok(Outcome::Filed(Box::new(invoice)))
}

fn modified(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

fn load_overrides(path: &Path) -> anyhow::Result<BTreeMap<String, ManualOverrides>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_summary(path: &Path, totals: &[TabTotals]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["tab", "documents", "with_amount", "eur_total", "unconverted"])?;
    for t in totals {
        wtr.write_record([
            t.tab.to_string(),
            t.documents.to_string(),
            t.with_amount.to_string(),
            t.eur_total.round_dp(2).to_string(),
            t.unconverted.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_text(
    batch: &TabBatch,
    totals: &[TabTotals],
    eur_total: Decimal,
    gaps: &[NumberGaps],
    failed: &[FailedFile],
) -> String {
    let mut output = String::new();

    for (view, total) in batch.views().zip(totals) {
        output.push_str(&format!("== {} ({} documents", view.tab, view.invoices.len()));
        if view.duplicates > 0 {
            output.push_str(&format!(", {} duplicates dropped", view.duplicates));
        }
        output.push_str(") ==\n");

        for invoice in &view.invoices {
            for line in format_invoice_text(invoice).lines() {
                output.push_str(&format!("  {}\n", line));
            }
            output.push('\n');
        }

        output.push_str(&format!("  Total: {} EUR", format_european(total.eur_total)));
        if total.unconverted > 0 {
            output.push_str(&format!(" ({} amounts not converted)", total.unconverted));
        }
        output.push_str("\n\n");
    }

    output.push_str(&format!("Grand total: {} EUR\n", format_european(eur_total)));
    for gap in gaps.iter().filter(|g| !g.missing.is_empty()) {
        let missing: Vec<String> = gap.missing.iter().map(u32::to_string).collect();
        output.push_str(&format!(
            "Missing {} numbers ({}-{}): {}\n",
            gap.tab,
            gap.range.min,
            gap.range.max,
            missing.join(", ")
        ));
    }
    if batch.hidden() > 0 {
        output.push_str(&format!("Hidden: {}\n", batch.hidden()));
    }
    if !failed.is_empty() {
        output.push_str("Failed files:\n");
        for f in failed {
            output.push_str(&format!("  - {}: {}\n", f.path, f.error));
        }
    }

    output
}
