//! Subcommands and the helpers they share.

pub mod amount;
pub mod batch;
pub mod classify;
pub mod config;
pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use docsort_core::models::config::DocsortConfig;
use docsort_core::pdf::PdfTextSource;
use docsort_core::text::format_european;
use docsort_core::{ExtractedInvoice, RawDocument};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docsort")
        .join("config.json")
}

/// The file given with `-c`, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocsortConfig> {
    if let Some(path) = config_path {
        return Ok(DocsortConfig::from_file(Path::new(path))?);
    }
    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(DocsortConfig::from_file(&path)?)
    } else {
        Ok(DocsortConfig::default())
    }
}

/// Read a PDF or plain-text file into a document. `name` replaces the
/// filename the extractor sees.
pub fn read_document(
    path: &Path,
    name: Option<&str>,
    config: &DocsortConfig,
) -> anyhow::Result<RawDocument> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = if extension == "pdf" {
        let source = PdfTextSource::open(path)?.with_max_pages(config.extraction.pdf_max_pages);
        let pdf = source.extract(None)?;
        if pdf.is_blank() {
            warn!("{} has no text layer", path.display());
        }
        pdf.text
    } else {
        fs::read_to_string(path)?
    };

    let filename = match name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string(),
    };

    let mut doc = RawDocument::new(text, filename);
    if let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) {
        doc = doc.with_source_date(DateTime::<Utc>::from(modified));
    }
    Ok(doc)
}

pub const INVOICE_COLUMNS: [&str; 10] = [
    "tab",
    "invoice_number",
    "invoice_date",
    "amount",
    "currency",
    "recipient",
    "kind",
    "source_filename",
    "manually_assigned",
    "vendor",
];

pub fn invoice_record(invoice: &ExtractedInvoice) -> Vec<String> {
    vec![
        invoice.tab.to_string(),
        invoice.invoice_number.clone().unwrap_or_default(),
        invoice.invoice_date.clone().unwrap_or_default(),
        invoice.amount.map(|a| a.to_string()).unwrap_or_default(),
        invoice.currency.to_string(),
        invoice.recipient.clone(),
        invoice.kind.to_string(),
        invoice.source_filename.clone(),
        invoice.manually_assigned.to_string(),
        invoice.vendor.clone().unwrap_or_default(),
    ]
}

pub fn format_invoices_csv(invoices: &[&ExtractedInvoice]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(INVOICE_COLUMNS)?;
    for invoice in invoices {
        wtr.write_record(invoice_record(invoice))?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

pub fn format_invoice_text(invoice: &ExtractedInvoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tab: {}\n", invoice.tab));
    output.push_str(&format!(
        "Invoice: {}\n",
        invoice.invoice_number.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Date: {}\n", invoice.invoice_date.as_deref().unwrap_or("-")));
    match invoice.amount {
        Some(amount) => output.push_str(&format!(
            "Amount: {} {}\n",
            format_european(amount),
            invoice.currency
        )),
        None => output.push_str("Amount: -\n"),
    }
    if !invoice.recipient.is_empty() {
        output.push_str(&format!("Recipient: {}\n", invoice.recipient));
    }
    if let Some(vendor) = &invoice.vendor {
        output.push_str(&format!("Vendor: {}\n", vendor));
    }
    output.push_str(&format!("File: {}\n", invoice.source_filename));
    if invoice.manually_assigned {
        output.push_str("(assigned manually)\n");
    }

    output
}
