//! Bookscout main entry point
//!
//! One-shot command-line scrape: crawl the configured catalog, clean the
//! records, persist them, and log the summary report. The asynchronous job
//! API lives in the library (`bookscout::jobs`) for the HTTP layer to mount.

use anyhow::Context;
use bookscout::config::{load_config_with_hash, Config};
use bookscout::pipeline::{clean_records, generate_report, OutputFormat, Persister};
use bookscout::scrape::ScrapeEngine;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bookscout: catalog scraper with clean/persist/report pipeline
#[derive(Parser, Debug)]
#[command(name = "bookscout")]
#[command(version = "1.0.0")]
#[command(about = "Scrape a paginated book catalog", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Base URL to scrape (overrides config)
    #[arg(long)]
    url: Option<String>,

    /// Number of listing pages to scrape (overrides config)
    #[arg(long)]
    pages: Option<u32>,

    /// Output filename stem, without extension
    #[arg(long)]
    output: Option<String>,

    /// Output format: json, csv, or both
    #[arg(long, default_value = "both")]
    format: OutputFormat,

    /// Also fetch each item's detail page
    #[arg(long)]
    details: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) =
                load_config_with_hash(path).context("Failed to load configuration")?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let base_url = cli.url.unwrap_or_else(|| config.scraper.base_url.clone());
    let pages = cli.pages.unwrap_or(config.scraper.default_pages);
    let output_name = cli
        .output
        .unwrap_or_else(|| config.output.default_name.clone());

    tracing::info!("Starting book scraper...");
    let engine =
        ScrapeEngine::new(&config, &base_url).context("Failed to build HTTP client")?;
    let records = engine.crawl(pages, cli.details).await;
    drop(engine);

    if records.is_empty() {
        tracing::warn!("No books were scraped!");
        return Ok(());
    }

    tracing::info!("Processing scraped data...");
    let cleaned = clean_records(records);

    let persister = Persister::new(&config.output.directory);
    let paths = persister
        .persist(&cleaned, &output_name, cli.format)
        .context("Failed to persist records")?;
    for path in &paths {
        println!("Saved: {}", path.display());
    }

    if let Some(report) = generate_report(&cleaned) {
        tracing::info!(
            "Scraping report: {} items, {} columns, {} numeric columns",
            report.total_items,
            report.columns.len(),
            report.numeric_stats.len()
        );
    }

    tracing::info!("Scraping completed successfully");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bookscout=info,warn"),
            1 => EnvFilter::new("bookscout=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
