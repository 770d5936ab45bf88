//! Bookshelf main entry point
//!
//! This is the command-line interface for the Bookshelf catalog crawler.

use actix_web::web;
use anyhow::Context;
use bookshelf::config::{load_config_with_hash, validate, Config};
use bookshelf::crawler::CrawlOutcome;
use bookshelf::output::{load_statistics, print_statistics};
use bookshelf::storage::open_store;
use bookshelf::ScraperService;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Bookshelf: a book-catalog crawler with a live query API
///
/// Bookshelf crawls a paginated book catalog in the background, caches the
/// collected books in a CSV file, and answers queries over HTTP.
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version)]
#[command(about = "A book-catalog crawler with a live query API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the listen address
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Validate config and print the effective settings without serving
    #[arg(long, conflicts_with_all = ["stats", "crawl_once"])]
    dry_run: bool,

    /// Show statistics from the stored dataset and exit
    #[arg(long, conflicts_with_all = ["dry_run", "crawl_once"])]
    stats: bool,

    /// Run one crawl in the foreground, store it, and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    crawl_once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.crawl_once {
        handle_crawl_once(config).await?;
    } else {
        handle_serve(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bookshelf=info,warn"),
            1 => EnvFilter::new("bookshelf=debug,info"),
            2 => EnvFilter::new("bookshelf=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given; using defaults");
        let config = Config::default();
        validate(&config)?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Bookshelf Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Catalog link: {:?}", config.site.catalog_link_name);
    println!("  Listing scope: {}", config.site.listing_scope);

    println!("\nExtractor:");
    println!("  Breadcrumb class: {}", config.extractor.breadcrumb_class);
    println!(
        "  Category link number: {}",
        config.extractor.category_link_number
    );

    println!("\nCrawl:");
    println!("  Max listing pages: {}", config.crawl.max_pages);
    println!(
        "  Progress log interval: {} books",
        config.crawl.progress_log_interval
    );

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  User agent: {}", config.http.user_agent);

    println!("\nStorage:");
    println!("  Dataset: {}", config.storage.dataset_path);

    println!("\nServer:");
    println!("  Listen: {}:{}", config.server.host, config.server.port);

    println!("\nConfiguration is valid.");
}

/// Handles the --stats mode: prints statistics of the stored dataset
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = open_store(Path::new(&config.storage.dataset_path));
    let stats = load_statistics(store.as_ref())
        .with_context(|| format!("Failed to read dataset {}", store.location()))?;

    if stats.total_books == 0 {
        println!("No dataset found at {}", store.location());
        return Ok(());
    }

    print_statistics(&stats);
    Ok(())
}

/// Handles the --crawl-once mode: crawls in the foreground and exits
async fn handle_crawl_once(config: Config) -> anyhow::Result<()> {
    let service = ScraperService::new(config)?;

    match service.run_crawl_now().await {
        Some(CrawlOutcome::Completed { items, persisted }) => {
            tracing::info!("Collected {} books", items);
            if !persisted {
                anyhow::bail!("Crawl completed but the dataset could not be saved");
            }
            let stats = bookshelf::output::compute_statistics(&service.state().items());
            print_statistics(&stats);
            Ok(())
        }
        Some(outcome) => anyhow::bail!("Crawl did not complete: {:?}", outcome),
        None => anyhow::bail!("A crawl could not be started"),
    }
}

/// Default mode: restores the dataset and serves the query API
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;

    let service = ScraperService::new(config)?;
    let status = service.load_existing();
    tracing::info!("Initial crawl status: {}", status);

    bookshelf::api::serve(web::Data::new(service), &host, port)
        .await
        .with_context(|| format!("Server on {}:{} failed", host, port))
}
