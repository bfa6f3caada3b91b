//! Classify command - put a mail sender into a business category.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use docsort_core::mail::{scan_invoice_mentions, scan_order_refs};
use docsort_core::{Classification, CategoryOverrides, MailMessage};

use super::{load_config, OutputFormat};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// From header, e.g. "Ana Pop <ana@contrast.ro>"
    #[arg(long, required = true)]
    from: String,

    /// To header, used for invoice direction
    #[arg(long, default_value = "")]
    to: String,

    /// Message subject
    #[arg(long, default_value = "")]
    subject: String,

    /// Message body
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,

    /// Read the message body from a file
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// JSON file mapping domains to categories
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Also list order references, invoice mentions and invoice direction
    #[arg(long)]
    scan: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let body = match (&args.body, &args.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => String::new(),
    };
    let overrides: CategoryOverrides = match &args.overrides {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => CategoryOverrides::default(),
    };

    let message = MailMessage::new(args.from, args.subject, body).to(args.to);
    let classification = config
        .entity_classifier()
        .classify_message(&message, &overrides);

    let (orders, mentions, direction) = if args.scan {
        (
            scan_order_refs(&message.subject, &message.body),
            scan_invoice_mentions(&message, &config.extraction.amount_bounds),
            config.directions.direction(&message),
        )
    } else {
        (Vec::new(), Vec::new(), None)
    };

    match args.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "classification": classification,
                "orders": orders,
                "invoice_mentions": mentions,
                "direction": direction,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["email_address", "display_name", "domain", "category"])?;
            if let Some(entity) = classification.entity() {
                wtr.write_record([
                    entity.email_address.as_str(),
                    entity.display_name.as_str(),
                    entity.domain.as_str(),
                    entity.category.as_str(),
                ])?;
            }
            print!("{}", String::from_utf8(wtr.into_inner()?)?);
        }
        OutputFormat::Text => {
            match &classification {
                Classification::Entity(entity) => {
                    println!("{} {}", style(entity.category).green().bold(), entity.email_address);
                    println!("  Name:   {}", entity.display_name);
                    println!("  Domain: {}", entity.domain);
                }
                Classification::Skipped { address } => {
                    println!("{} {} (system sender)", style("skipped").yellow(), address);
                }
            }
            if let Some(direction) = direction {
                println!("  Direction: {}", direction);
            }
            for order in &orders {
                let statuses: Vec<&str> = order.statuses.iter().map(|s| s.as_str()).collect();
                println!("  Order {} [{}]", order.number, statuses.join(", "));
            }
            for mention in &mentions {
                println!(
                    "  {} {} ({}){}",
                    mention.kind,
                    mention.number.as_deref().unwrap_or("N/A"),
                    mention.status,
                    mention
                        .amount
                        .map(|a| format!(" {}", a))
                        .unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}
