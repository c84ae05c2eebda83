//! # GCP Secret Manager Fetcher
//!
//! Fetches secrets from Google Cloud Secret Manager.
//!
//! The fetcher owns an authenticated REST client scoped to one project and
//! reuses it for every lookup. Each `get_secret` call is one round-trip to
//! `projects/{project}/secrets/{secret}/versions/latest:access`; values are
//! never cached locally and failed calls are not retried.

pub mod client;

use super::{Backend, SecretFetcher};
use crate::constants::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_SECRET_MANAGER_ENDPOINT};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use client::common::format_secret_version_path;
use client::{SecretManagerREST, ServiceAccountKey};
use std::path::Path;
use std::time::Duration;

/// Connection options for the Secret Manager client
#[derive(Debug, Clone)]
pub struct GcpClientOptions {
    /// API base URL, without the `/v1` suffix
    pub endpoint: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for GcpClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SECRET_MANAGER_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Secret fetcher backed by GCP Secret Manager
#[derive(Debug)]
pub struct GcpSecretManagerFetcher {
    client: SecretManagerREST,
}

impl GcpSecretManagerFetcher {
    /// Create a fetcher for `project_id`, authenticating with the service
    /// account key at `credentials_file`
    ///
    /// # Errors
    /// Returns an error if the project ID is empty, the credentials file is
    /// unreadable or malformed, or authentication fails
    pub async fn new(
        project_id: impl Into<String>,
        credentials_file: impl AsRef<Path>,
    ) -> Result<Self> {
        Self::with_options(project_id, credentials_file, GcpClientOptions::default()).await
    }

    /// Create a fetcher with explicit connection options
    ///
    /// # Errors
    /// See [`GcpSecretManagerFetcher::new`]
    pub async fn with_options(
        project_id: impl Into<String>,
        credentials_file: impl AsRef<Path>,
        options: GcpClientOptions,
    ) -> Result<Self> {
        let project_id = project_id.into();
        if project_id.trim().is_empty() {
            return Err(FetchError::InvalidConfig(
                "GCP project ID must not be empty".to_string(),
            ));
        }

        let path = credentials_file.as_ref();
        let key = ServiceAccountKey::from_file(path)
            .await
            .map_err(|source| FetchError::Credentials {
                path: path.to_path_buf(),
                source,
            })?;

        let client = SecretManagerREST::new(
            project_id,
            key,
            &options.endpoint,
            options.connect_timeout,
        )
        .await?;

        Ok(Self { client })
    }

    pub fn project_id(&self) -> &str {
        self.client.project_id()
    }

    /// Fully-qualified resource name requested for `secret_id`
    pub fn resource_name(&self, secret_id: &str) -> String {
        format_secret_version_path(self.client.project_id(), secret_id)
    }
}

#[async_trait]
impl SecretFetcher for GcpSecretManagerFetcher {
    async fn get_secret(&self, key: &str) -> Result<String> {
        self.client.access_secret_version(key).await
    }

    fn backend(&self) -> Backend {
        Backend::GcpSecretManager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_empty_project_id_is_rejected() {
        let err = GcpSecretManagerFetcher::new("  ", "/nonexistent/key.json")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidConfig(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_missing_credentials_file_is_rejected() {
        let err = GcpSecretManagerFetcher::new("test-project", "/nonexistent/key.json")
            .await
            .unwrap_err();

        match err {
            FetchError::Credentials { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/key.json"));
            }
            other => panic!("expected credentials error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_credentials_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"type\": \"service_account\", ").unwrap();

        let err = GcpSecretManagerFetcher::new("test-project", file.path())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Credentials { .. }), "{err:?}");
        assert!(err.to_string().contains("not a valid service account key"));
    }
}
