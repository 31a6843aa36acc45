//! ApaHukum CLI
//!
//! Scrapes the fatwa listing, serves the bot, and queries the stored corpus.

use std::path::PathBuf;
use std::sync::Arc;

use apahukum::{
    error::Result,
    models::Config,
    pipeline,
    services::{Corpus, SearchMode, format_category_summary},
    storage::CsvStorage,
};
use chrono::Local;
use clap::{Parser, Subcommand};

/// ApaHukum - Fatwa Scraper and Query Bot
#[derive(Parser, Debug)]
#[command(
    name = "apahukum",
    version,
    about = "Fatwa scraper and Telegram query bot"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the listing and all articles, then rewrite the store
    Scrape,

    /// Serve the bot (with the monthly scrape unless disabled)
    Serve,

    /// Search the stored corpus
    Search {
        /// Query text
        query: String,

        /// Fields to match: keyword, title or category
        #[arg(short, long, default_value = "keyword")]
        mode: SearchMode,
    },

    /// Show document counts per category
    Categories,

    /// Validate configuration
    Validate,

    /// Show store and schedule info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_corpus(config: &Config) -> Result<Corpus> {
    let documents = CsvStorage::new(&config.store.path).load()?;
    Ok(Corpus::new(documents))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    let config = Arc::new(config);

    match cli.command {
        Command::Scrape => {
            config.validate()?;
            let outcome = pipeline::run_scrape(Arc::clone(&config)).await?;
            log::info!(
                "Scraped {} articles, {} without content",
                outcome.documents.len(),
                outcome.content_failures
            );
        }

        Command::Serve => {
            config.validate()?;
            pipeline::run_serve(Arc::clone(&config)).await?;
        }

        Command::Search { query, mode } => {
            let corpus = load_corpus(&config)?;
            let results = corpus.search(&query, mode, config.bot.max_results)?;
            if results.is_empty() {
                println!("No fatwa found for '{}'", results.query);
                return Ok(());
            }
            for (index, document) in results.items.iter().enumerate() {
                println!(
                    "{:>2}. [{}] {} ({}, {} views)\n    {}",
                    index + 1,
                    document.id,
                    document.title,
                    document.date,
                    document.hits,
                    document.url
                );
            }
            if results.truncated {
                println!(
                    "Showing {} of {} matches",
                    results.items.len(),
                    results.total_matches
                );
            }
        }

        Command::Categories => {
            let corpus = load_corpus(&config)?;
            println!("{}", format_category_summary(&corpus.category_summary()));
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (includes every selector candidate)");
            match config.source.listing_url() {
                Ok(url) => log::info!("✓ Listing URL: {}", url),
                Err(e) => log::warn!("Listing URL unavailable: {}", e),
            }
            if config.require_token().is_err() {
                log::warn!("Bot token not set; 'serve' will refuse to start");
            }
        }

        Command::Info => {
            let path = &config.store.path;
            log::info!("Store: {}", path.display());
            match load_corpus(&config) {
                Ok(corpus) => {
                    log::info!("Documents: {}", corpus.len());
                    log::info!(
                        "Loaded at: {}",
                        corpus.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
                    );
                    let failed = corpus
                        .documents()
                        .iter()
                        .filter(|d| d.has_sentinel_content())
                        .count();
                    log::info!("Without content: {}", failed);
                    log::info!(
                        "Categories: {}",
                        format_category_summary(&corpus.category_summary())
                    );
                }
                Err(e) => log::info!("No corpus loaded: {}", e),
            }
            if config.schedule.enabled {
                if let Some(next) =
                    pipeline::next_run_after(Local::now().naive_local(), config.schedule.hour)
                {
                    log::info!("Next scheduled scrape: {}", next);
                }
            } else {
                log::info!("Scheduled scrape disabled");
            }
        }
    }

    Ok(())
}
