//! CLI for sorting invoice documents into tabs and classifying mail senders.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{amount, batch, classify, config, extract};

/// Sort invoice documents into counterparty tabs and classify mail senders
#[derive(Parser)]
#[command(name = "docsort")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract invoice fields from a single PDF or text file
    Extract(extract::ExtractArgs),

    /// Sort a set of documents into per-tab views
    Batch(batch::BatchArgs),

    /// Classify a mail sender into a business category
    Classify(classify::ClassifyArgs),

    /// Parse a locale-formatted amount
    Amount(amount::AmountArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // logs go to stderr so piped output stays clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Classify(args) => classify::run(args, config_path).await,
        Commands::Amount(args) => amount::run(args).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
