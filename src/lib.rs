//! # Secret Fetcher
//!
//! Fetch named secrets without caring where they live.
//!
//! During local development secrets come from environment variables; in
//! production they come from Google Cloud Secret Manager. Callers select a
//! fetcher once and call [`SecretFetcher::get_secret`] on it from then on:
//!
//! ```no_run
//! # async fn run() -> secret_fetcher::Result<()> {
//! use secret_fetcher::{get_fetcher, FetcherConfig};
//!
//! let selection = get_fetcher(&FetcherConfig::from_env()).await;
//! let api_key = selection.fetcher.get_secret("API_KEY").await?;
//! # let _ = api_key;
//! # Ok(())
//! # }
//! ```
//!
//! Backend selection is driven by `USE_SECRET_MANAGER`, `GCP_PROJECT_ID` and
//! `GCP_CREDENTIALS_FILE`. See [`FetcherConfig`].

pub mod config;
pub mod constants;
pub mod error;
pub mod provider;
pub mod selector;

pub use config::FetcherConfig;
pub use error::{FetchError, Result};
pub use provider::gcp::GcpClientOptions;
pub use provider::{Backend, EnvVarSecretFetcher, GcpSecretManagerFetcher, SecretFetcher};
pub use selector::{get_fetcher, get_fetcher_from_env, Selection};
