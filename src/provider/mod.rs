//! # Provider Modules
//!
//! Secret fetchers for the supported backends.
//!
//! Each backend implements the `SecretFetcher` trait; callers hold an
//! `Arc<dyn SecretFetcher>` and never depend on a concrete backend.

use crate::error::{FetchError, Result};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Backend a fetcher reads secrets from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Process environment variables
    Env,
    /// Google Cloud Secret Manager
    GcpSecretManager,
}

impl Backend {
    /// Get human-readable string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Env => "env",
            Backend::GcpSecretManager => "gcp-secret-manager",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability to fetch a secret value by name
#[async_trait]
pub trait SecretFetcher: Send + Sync + fmt::Debug {
    /// Get the secret value for `key`
    ///
    /// The key is passed to the backend uninterpreted.
    async fn get_secret(&self, key: &str) -> Result<String>;

    /// Backend this fetcher reads from
    fn backend(&self) -> Backend;

    /// Get the secret value, giving up after `timeout` when one is set
    ///
    /// # Errors
    /// Returns `FetchError::Timeout` if the deadline elapses, otherwise
    /// whatever `get_secret` returns.
    async fn get_secret_with_timeout(&self, key: &str, timeout: Option<Duration>) -> Result<String> {
        let Some(timeout) = timeout else {
            return self.get_secret(key).await;
        };

        tokio::time::timeout(timeout, self.get_secret(key))
            .await
            .map_err(|_elapsed| FetchError::Timeout {
                secret: key.to_string(),
                timeout,
            })?
    }
}

pub mod env;
pub mod gcp;

pub use env::EnvVarSecretFetcher;
pub use gcp::GcpSecretManagerFetcher;
