//! Extract command - classify one document and pull its invoice fields.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docsort_core::{ExtractedInvoice, InvoiceExtractor, ManualOverrides, Tab};

use super::{format_invoice_text, format_invoices_csv, load_config, read_document, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Filename the rules see, when it differs from the file on disk
    #[arg(long)]
    name: Option<String>,

    /// File under this tab instead of classifying
    #[arg(long)]
    assign: Option<Tab>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let doc = read_document(&args.input, args.name.as_deref(), &config)?;

    let extractor = config.document_extractor();
    let invoice = match args.assign {
        Some(tab) => extractor.extract_with_overrides(&doc, &ManualOverrides::assign(tab)),
        None => extractor.extract(&doc),
    };

    let output = format_invoice(&invoice, args.format)?;

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

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn format_invoice(invoice: &ExtractedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_invoices_csv(&[invoice]),
        OutputFormat::Text => Ok(format_invoice_text(invoice)),
    }
}
