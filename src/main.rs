//! CLI entry point for the listing metrics tool.
//!
//! Provides subcommands for scoring a listings CSV, querying the built-in
//! metric endpoints, listing endpoints, and verifying a running analytics
//! server against the local implementations.

mod infra;

use crate::infra::tabpy::TabPyClient;
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use listing_metrics::{
    config::ServerConfig,
    listings::{ColumnNames, load_listings},
    metrics::DEFAULT_THRESHOLD,
    output::{append_record, print_json, write_records},
    registry::{EndpointCatalog, EndpointListing, LocalRegistry, deploy_builtins, verify_builtins},
    scoring::{category_counts, score_listings},
};
use serde_json::Value;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "listing_metrics")]
#[command(about = "Derived metrics for property listings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every listing in a CSV file and write the metrics to another CSV
    Score {
        /// Listings CSV to read
        #[arg(value_name = "LISTINGS_CSV")]
        input: PathBuf,

        /// CSV file to write scored rows to
        #[arg(short, long, default_value = "scored_listings.csv")]
        output: String,

        /// Price above which a listing counts as high-priced
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Append rows to the output file instead of replacing it
        #[arg(long, default_value_t = false)]
        append: bool,

        /// Column holding the listing id
        #[arg(long, default_value = "id")]
        id_column: String,

        /// Column holding the nightly price
        #[arg(long, default_value = "price")]
        price_column: String,

        /// Column holding the review count
        #[arg(long, default_value = "number_of_reviews")]
        reviews_column: String,

        /// Column holding the days of availability
        #[arg(long, default_value = "availability_365")]
        availability_column: String,
    },
    /// Run one built-in endpoint locally with JSON positional arguments
    Query {
        /// Endpoint name, e.g. property_category
        name: String,

        /// JSON array of positional arguments, e.g. '[[120, null, "$200"], 100]'
        #[arg(short, long, default_value = "[]")]
        args: String,
    },
    /// List endpoints of the local registry or of the remote server
    Endpoints {
        /// Ask the remote server instead of the local registry
        #[arg(short, long, default_value_t = false)]
        remote: bool,

        /// Server URL (defaults to TABPY_URL)
        #[arg(long)]
        url: Option<String>,
    },
    /// Check that a running server exposes the built-in endpoints and agrees with them
    Verify {
        /// Server URL (defaults to TABPY_URL)
        #[arg(long)]
        url: Option<String>,

        /// Seconds to wait for each endpoint to appear (defaults to TABPY_POLL_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,

        /// Seconds between listing polls (defaults to TABPY_POLL_INTERVAL_SECS)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/listing_metrics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("listing_metrics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            input,
            output,
            threshold,
            append,
            id_column,
            price_column,
            reviews_column,
            availability_column,
        } => {
            let columns = ColumnNames {
                id: id_column,
                price: price_column,
                reviews: reviews_column,
                availability: availability_column,
            };
            score(&input, &output, threshold, append, &columns)?;
        }
        Commands::Query { name, args } => {
            let args: Vec<Value> = serde_json::from_str(&args)
                .context("--args must be a JSON array of positional arguments")?;

            let registry = LocalRegistry::new();
            deploy_builtins(&registry)?;

            let resp = registry.query(&name, &args).await?;
            print_json(&resp)?;
        }
        Commands::Endpoints { remote, url } => {
            let listing = if remote {
                let config = server_config(url, None, None)?;
                let client = TabPyClient::new(&config)?;
                info!(url = client.base_url(), "Listing remote endpoints");
                client.list_endpoints().await?
            } else {
                let registry = LocalRegistry::new();
                deploy_builtins(&registry)?;
                registry.list_endpoints().await?
            };

            info!(total = listing.len(), "Endpoint listing");
            for (name, endpoint) in &listing {
                info!(
                    endpoint = %name,
                    version = endpoint.version,
                    kind = %endpoint.kind,
                    description = %endpoint.description,
                    "Endpoint"
                );
            }
        }
        Commands::Verify {
            url,
            timeout,
            interval,
        } => {
            let config = server_config(url, timeout, interval)?;
            verify(&config).await?;
        }
    }

    Ok(())
}

/// Resolves server settings from the environment, letting CLI flags win.
fn server_config(
    url: Option<String>,
    timeout: Option<u64>,
    interval: Option<u64>,
) -> Result<ServerConfig> {
    let mut config = ServerConfig::from_env()?;
    if let Some(url) = url {
        config.url = url;
    }
    if let Some(secs) = timeout {
        config.poll_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = interval {
        config.poll_interval = Duration::from_secs(secs);
    }
    Ok(config)
}

/// Loads a listings CSV, scores every row, and writes the results.
#[tracing::instrument(skip(input, columns), fields(input = %input.display()))]
fn score(
    input: &Path,
    output: &str,
    threshold: f64,
    append: bool,
    columns: &ColumnNames,
) -> Result<()> {
    let listings = load_listings(input, columns)?;
    if listings.is_empty() {
        warn!("Listings file has no rows");
    }

    let rows = score_listings(&listings, threshold)?;

    if append {
        for row in &rows {
            append_record(output, row)?;
        }
    } else {
        write_records(output, &rows)?;
    }

    for (category, count) in category_counts(&rows) {
        info!(category = %category, count, "Category total");
    }
    info!(rows = rows.len(), output, "Scored listings written");
    Ok(())
}

/// Waits for every built-in endpoint on the server and compares trial queries
/// against the local implementations.
#[tracing::instrument(skip(config), fields(url = %config.url))]
async fn verify(config: &ServerConfig) -> Result<()> {
    let remote = TabPyClient::new(config)?;

    log_listing(&remote, "before").await;

    let local = LocalRegistry::new();
    deploy_builtins(&local)?;

    let results =
        verify_builtins(&remote, &local, config.poll_timeout, config.poll_interval).await;

    let failed: Vec<_> = results
        .iter()
        .filter(|(_, verdict)| !verdict.is_ok())
        .map(|(name, verdict)| format!("{name}: {verdict}"))
        .collect();

    info!(
        checked = results.len(),
        failed = failed.len(),
        "Verification finished"
    );
    log_listing(&remote, "after").await;

    if failed.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Endpoint verification failed:\n{}", failed.join("\n")))
    }
}

/// Logs the endpoint names `catalog` currently exposes, returning the listing
/// when it could be fetched.
async fn log_listing<C: EndpointCatalog + ?Sized>(
    catalog: &C,
    stage: &str,
) -> Option<EndpointListing> {
    match catalog.list_endpoints().await {
        Ok(listing) => {
            info!(
                stage,
                endpoints = ?listing.keys().collect::<Vec<_>>(),
                "Remote endpoint listing"
            );
            Some(listing)
        }
        Err(e) => {
            warn!(stage, error = %e, "Could not list remote endpoints");
            None
        }
    }
}
