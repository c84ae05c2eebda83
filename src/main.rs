//! # fetch-secret
//!
//! Command-line front end for the secret fetcher.
//!
//! ## Usage
//!
//! ```bash
//! # Print a secret (environment backend unless USE_SECRET_MANAGER=true)
//! fetch-secret get API_KEY
//!
//! # Bound the lookup to five seconds
//! fetch-secret get API_KEY --timeout-secs 5
//!
//! # Show which backend would be used
//! fetch-secret backend
//! ```
//!
//! A `.env` file in the working directory is loaded before configuration is
//! read. Logs go to stderr so stdout carries only the secret value.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secret_fetcher::{get_fetcher, FetcherConfig};
use std::time::Duration;
use tracing::debug;

/// Fetch secrets from environment variables or GCP Secret Manager
#[derive(Debug, Parser)]
#[command(name = "fetch-secret", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the value of a secret
    Get {
        /// Secret name (environment variable or Secret Manager secret ID)
        #[arg(value_name = "KEY")]
        key: String,

        /// Give up after this many seconds (overrides SECRET_FETCH_TIMEOUT_SECS)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Print the selected backend and any fallback reason
    Backend,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secret_fetcher=info".into()),
        )
        .init();

    // Configure rustls crypto provider before any TLS connections
    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    // Local development: pick up secrets and flags from ./.env if present
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    let config = FetcherConfig::from_env();
    let selection = get_fetcher(&config).await;

    match cli.command {
        Commands::Get { key, timeout_secs } => {
            let timeout = timeout_secs.map(Duration::from_secs).or(config.request_timeout);
            let value = selection
                .fetcher
                .get_secret_with_timeout(&key, timeout)
                .await
                .with_context(|| format!("Failed to fetch secret {key}"))?;
            println!("{value}");
        }
        Commands::Backend => {
            println!("{}", selection.backend);
            if let Some(reason) = selection.fallback {
                eprintln!("fell back from gcp-secret-manager: {reason}");
            }
        }
    }

    Ok(())
}
