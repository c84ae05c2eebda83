//! # Fetcher Configuration
//!
//! Settings that drive backend selection, loaded from environment variables.
//!
//! The selector takes a [`FetcherConfig`] explicitly rather than reading the
//! process environment itself, so tests can build configurations directly.

use crate::constants::{
    ENV_GCP_CREDENTIALS_FILE, ENV_GCP_PROJECT_ID, ENV_GCP_SECRET_MANAGER_ENDPOINT,
    ENV_SECRET_FETCH_TIMEOUT_SECS, ENV_USE_SECRET_MANAGER,
};
use std::path::PathBuf;
use std::time::Duration;

/// Backend selection configuration
///
/// `Default` selects the environment variable backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Use GCP Secret Manager instead of environment variables
    pub use_secret_manager: bool,
    /// GCP project that owns the secrets
    pub project_id: Option<String>,
    /// Path to a service account key JSON file
    pub credentials_file: Option<PathBuf>,
    /// Secret Manager API base URL override (emulators, mock servers)
    pub endpoint: Option<String>,
    /// Default per-call timeout for callers that want one
    pub request_timeout: Option<Duration>,
}

impl FetcherConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Only the exact string `"true"` enables the Secret Manager backend.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            use_secret_manager: lookup(ENV_USE_SECRET_MANAGER).as_deref() == Some("true"),
            project_id: non_empty(ENV_GCP_PROJECT_ID),
            credentials_file: non_empty(ENV_GCP_CREDENTIALS_FILE).map(PathBuf::from),
            endpoint: non_empty(ENV_GCP_SECRET_MANAGER_ENDPOINT),
            request_timeout: non_empty(ENV_SECRET_FETCH_TIMEOUT_SECS)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
        }
    }

    /// Configuration selecting GCP Secret Manager
    pub fn secret_manager(
        project_id: impl Into<String>,
        credentials_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            use_secret_manager: true,
            project_id: Some(project_id.into()),
            credentials_file: Some(credentials_file.into()),
            ..Self::default()
        }
    }

    /// Set the Secret Manager API base URL
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_unset_flag_selects_env_backend() {
        let config = FetcherConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, FetcherConfig::default());
        assert!(!config.use_secret_manager);
    }

    #[test]
    fn test_only_exact_true_enables_secret_manager() {
        for value in ["TRUE", "True", "1", "yes", " true", "false", ""] {
            let config =
                FetcherConfig::from_lookup(lookup_from(&[("USE_SECRET_MANAGER", value)]));
            assert!(
                !config.use_secret_manager,
                "USE_SECRET_MANAGER={value:?} should not enable Secret Manager"
            );
        }

        let config = FetcherConfig::from_lookup(lookup_from(&[("USE_SECRET_MANAGER", "true")]));
        assert!(config.use_secret_manager);
    }

    #[test]
    fn test_reads_gcp_settings() {
        let config = FetcherConfig::from_lookup(lookup_from(&[
            ("USE_SECRET_MANAGER", "true"),
            ("GCP_PROJECT_ID", "my-project"),
            ("GCP_CREDENTIALS_FILE", "/etc/gcp/key.json"),
            ("GCP_SECRET_MANAGER_ENDPOINT", "http://localhost:9090"),
            ("SECRET_FETCH_TIMEOUT_SECS", "5"),
        ]));

        assert!(config.use_secret_manager);
        assert_eq!(config.project_id.as_deref(), Some("my-project"));
        assert_eq!(
            config.credentials_file,
            Some(PathBuf::from("/etc/gcp/key.json"))
        );
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9090"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_secret_manager_builder() {
        let config = FetcherConfig::secret_manager("my-project", "/etc/gcp/key.json")
            .with_endpoint("http://localhost:9090");

        assert!(config.use_secret_manager);
        assert_eq!(config.project_id.as_deref(), Some("my-project"));
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9090"));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = FetcherConfig::from_lookup(lookup_from(&[
            ("GCP_PROJECT_ID", ""),
            ("GCP_CREDENTIALS_FILE", ""),
            ("SECRET_FETCH_TIMEOUT_SECS", "soon"),
        ]));

        assert_eq!(config.project_id, None);
        assert_eq!(config.credentials_file, None);
        assert_eq!(config.request_timeout, None);
    }
}
