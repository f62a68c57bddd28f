//! Zipharvest main entry point
//!
//! Command-line interface for the zip-code-driven listing harvester.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zipharvest::config::load_config;
use zipharvest::pipeline::Coordinator;

/// Zipharvest: a zip-code-driven real-estate listing harvester
///
/// Discovers listing detail URLs area by area, splitting oversized result
/// sets into price×bedroom facets to get around the upstream pagination cap,
/// then harvests each detail page into CSV records with a single retry pass
/// over the failures.
#[derive(Parser, Debug)]
#[command(name = "zipharvest")]
#[command(version = "1.0.0")]
#[command(about = "A zip-code-driven real-estate listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "retry_only")]
    dry_run: bool,

    /// Replay the error ledger without a new discovery pass
    #[arg(long, conflicts_with = "dry_run")]
    retry_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let coordinator = Coordinator::new(config)?;
    if cli.retry_only {
        tracing::info!("Replaying error ledgers only");
        coordinator.retry_only().await?;
    } else {
        coordinator.run().await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("zipharvest=info,warn"),
            1 => EnvFilter::new("zipharvest=debug,info"),
            2 => EnvFilter::new("zipharvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &zipharvest::config::Config) {
    println!("=== Zipharvest Dry Run ===\n");

    println!("Upstream:");
    println!("  Endpoint: {}", config.upstream.endpoint);

    println!("\nFetch policy:");
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Initial backoff: {}ms", config.fetch.initial_backoff_ms);
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);

    println!("\nCrawl:");
    println!("  Page cap: {}", config.crawl.page_cap);
    println!("  Discovery workers: {}", config.crawl.discovery_workers);
    println!("  Harvest workers: {}", config.crawl.harvest_workers);
    println!(
        "  Facet grid: {} price bands x {} bed bands = {} sub-queries",
        config.crawl.price_bands.len(),
        config.crawl.bed_bands.len(),
        config.crawl.price_bands.len() * config.crawl.bed_bands.len()
    );

    println!("\nInput:");
    println!("  Areas: {}", config.input.areas_path);
    match zipharvest::areas::load_areas(std::path::Path::new(&config.input.areas_path)) {
        Ok(areas) => {
            println!("  {} areas loaded", areas.len());
        }
        Err(e) => println!("  ! Failed to load areas: {}", e),
    }

    println!("\nOutput:");
    println!("  Links: {}", config.output.links_dir);
    println!("  Records: {}", config.output.records_dir);
    println!("  Errors: {}", config.output.errors_dir);

    println!("\n✓ Configuration is valid");
}
