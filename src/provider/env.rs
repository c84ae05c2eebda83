//! # Environment Variable Fetcher
//!
//! Reads secrets from process environment variables. Intended for local
//! development, where secrets live in the shell or a `.env` loader.

use super::{Backend, SecretFetcher};
use crate::error::Result;
use async_trait::async_trait;

/// Fetches secrets from process environment variables
///
/// **Note**: an unset variable yields an empty string, not an error, so
/// "not configured" and "configured as empty" look the same through
/// [`SecretFetcher::get_secret`]. Use [`EnvVarSecretFetcher::lookup`] when the
/// difference matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVarSecretFetcher;

impl EnvVarSecretFetcher {
    pub fn new() -> Self {
        Self
    }

    /// Look up `key`, returning `None` when the variable is unset
    ///
    /// Non-Unicode values are converted lossily.
    pub fn lookup(&self, key: &str) -> Option<String> {
        // var_os may panic on these; no variable can carry such a name
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

#[async_trait]
impl SecretFetcher for EnvVarSecretFetcher {
    async fn get_secret(&self, key: &str) -> Result<String> {
        Ok(self.lookup(key).unwrap_or_default())
    }

    fn backend(&self) -> Backend {
        Backend::Env
    }
}
