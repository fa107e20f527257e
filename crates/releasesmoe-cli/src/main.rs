//! releases.moe search plugin CLI
//!
//! Invoked once per search by the search host. Result rows go to stdout,
//! diagnostics to stderr.
//!
//! ```text
//! releasesmoe "sousou no frieren"
//! releasesmoe --category anime --format json frieren
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use releasesmoe_core::{
    Category, JsonLinesPrinter, NamePolicy, PipePrinter, ReleasesMoeScraper, ResultSink,
    SearchConfig,
};
use tracing::debug;

mod logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `link|name|size|seeds|leech|engine_url|desc_link|pub_date` lines
    Pipe,
    /// One JSON object per line
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search query; percent-encoded queries are decoded
    #[arg(required = true)]
    query: Vec<String>,

    /// Search category (all, anime)
    #[arg(short, long, default_value = "all", value_parser = parse_category)]
    category: Category,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pipe)]
    format: OutputFormat,

    /// Result name policy (synthesized, scraped, html); overrides the config file
    #[arg(long, value_parser = parse_name_policy)]
    name_policy: Option<NamePolicy>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_category(value: &str) -> std::result::Result<Category, String> {
    value.parse().map_err(|e: releasesmoe_core::ReleasesMoeError| e.to_string())
}

fn parse_name_policy(value: &str) -> std::result::Result<NamePolicy, String> {
    value.parse().map_err(|e: releasesmoe_core::ReleasesMoeError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(args.verbose)?;

    let mut config = SearchConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(policy) = args.name_policy {
        config.name_policy = policy;
    }
    debug!(?config, "configuration loaded");

    let scraper = ReleasesMoeScraper::with_config(config)?;
    let query = args.query.join(" ");

    let stdout = io::stdout().lock();
    let mut sink: Box<dyn ResultSink> = match args.format {
        OutputFormat::Pipe => Box::new(PipePrinter::new(stdout)),
        OutputFormat::Json => Box::new(JsonLinesPrinter::new(stdout)),
    };

    let count = scraper
        .search(&query, args.category, sink.as_mut())
        .await
        .with_context(|| format!("Search for {query:?} failed"))?;

    debug!(count, "rows emitted");
    Ok(())
}
