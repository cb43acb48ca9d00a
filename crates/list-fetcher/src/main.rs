//! List fetcher CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use list_fetcher::ScoreFetcher;
use shared::{Config, LogConfig, ScoreReport};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Username or profile URL
    user: String,

    /// Service name or alias (AniList/AL/A, Kitsu/K, MyAnimeList/MAL/M)
    #[arg(short, long)]
    service: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = LogConfig::from_config(&config.logging, "list-fetcher");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    let fetcher = ScoreFetcher::new(&config).context("Failed to create score fetcher")?;

    let user = fetcher
        .resolve(args.user.as_str(), args.service.as_deref())
        .with_context(|| format!("Failed to resolve user `{}`", args.user))?;

    info!(username = %user.username, service = %user.service, "Resolved user");

    let scores = fetcher
        .fetch_resolved(&user)
        .await
        .with_context(|| format!("Failed to fetch scores for `{}`", user.username))?;

    let report = ScoreReport::new(&user, scores);
    let output = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize score report")?;

    println!("{}", output);

    info!(total = report.total, "List fetcher finished successfully");

    Ok(())
}
