//! # Fetcher Selection
//!
//! Chooses the backend callers should use, once, from a [`FetcherConfig`].
//!
//! When Secret Manager is requested but the client can't be built, the
//! environment backend is returned instead. The fallback is logged and the
//! reason is kept on the returned [`Selection`] so callers can act on it.

use crate::config::FetcherConfig;
use crate::error::{FetchError, Result};
use crate::provider::gcp::GcpClientOptions;
use crate::provider::{Backend, EnvVarSecretFetcher, GcpSecretManagerFetcher, SecretFetcher};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of backend selection
#[derive(Debug, Clone)]
pub struct Selection {
    /// Fetcher to use for all subsequent lookups
    pub fetcher: Arc<dyn SecretFetcher>,
    /// Backend actually selected
    pub backend: Backend,
    /// Why Secret Manager was requested but not used, if it wasn't
    pub fallback: Option<String>,
}

impl Selection {
    fn env() -> Self {
        Self {
            fetcher: Arc::new(EnvVarSecretFetcher::new()),
            backend: Backend::Env,
            fallback: None,
        }
    }

    /// Whether Secret Manager was requested but construction failed
    pub fn fell_back(&self) -> bool {
        self.fallback.is_some()
    }

    /// Consume the selection, keeping only the fetcher
    pub fn into_fetcher(self) -> Arc<dyn SecretFetcher> {
        self.fetcher
    }
}

/// Select a fetcher according to `config`
///
/// Never fails: Secret Manager construction errors fall back to the
/// environment backend.
pub async fn get_fetcher(config: &FetcherConfig) -> Selection {
    if !config.use_secret_manager {
        return Selection::env();
    }

    match build_secret_manager(config).await {
        Ok(fetcher) => {
            info!(
                "Using GCP Secret Manager for project {}",
                fetcher.project_id()
            );
            Selection {
                fetcher: Arc::new(fetcher),
                backend: Backend::GcpSecretManager,
                fallback: None,
            }
        }
        Err(e) => {
            warn!("Failed to create GcpSecretManagerFetcher: {}", e);
            warn!("Falling back to EnvVarSecretFetcher");
            Selection {
                fallback: Some(e.to_string()),
                ..Selection::env()
            }
        }
    }
}

/// Select a fetcher using configuration from the process environment
pub async fn get_fetcher_from_env() -> Selection {
    get_fetcher(&FetcherConfig::from_env()).await
}

async fn build_secret_manager(config: &FetcherConfig) -> Result<GcpSecretManagerFetcher> {
    let project_id = config.project_id.as_deref().unwrap_or_default();
    let credentials_file = config.credentials_file.as_deref().ok_or_else(|| {
        FetchError::InvalidConfig(format!(
            "{} is not set",
            crate::constants::ENV_GCP_CREDENTIALS_FILE
        ))
    })?;

    let mut options = GcpClientOptions::default();
    if let Some(endpoint) = &config.endpoint {
        options.endpoint.clone_from(endpoint);
    }

    GcpSecretManagerFetcher::with_options(project_id, credentials_file, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn test_default_config_selects_env() {
        let selection = get_fetcher(&FetcherConfig::default()).await;
        assert_eq!(selection.backend, Backend::Env);
        assert_eq!(selection.fetcher.backend(), Backend::Env);
        assert!(!selection.fell_back());
    }

    #[tokio::test]
    async fn test_flag_off_ignores_gcp_settings() {
        let config = FetcherConfig {
            use_secret_manager: false,
            ..FetcherConfig::secret_manager("test-project", "/nonexistent/key.json")
        };
        let selection = get_fetcher(&config).await;
        assert_eq!(selection.backend, Backend::Env);
        assert!(!selection.fell_back());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_invalid_credentials_fall_back_and_log() {
        let config = FetcherConfig::secret_manager("test-project", "/nonexistent/key.json");
        let selection = get_fetcher(&config).await;

        assert_eq!(selection.backend, Backend::Env);
        assert_eq!(selection.fetcher.backend(), Backend::Env);
        let reason = selection.fallback.as_deref().unwrap();
        assert!(reason.contains("/nonexistent/key.json"), "{reason}");
        assert!(logs_contain("Failed to create GcpSecretManagerFetcher"));
        assert!(logs_contain("Falling back to EnvVarSecretFetcher"));
    }

    #[tokio::test]
    async fn test_missing_credentials_path_falls_back() {
        let config = FetcherConfig {
            use_secret_manager: true,
            project_id: Some("test-project".to_string()),
            ..FetcherConfig::default()
        };
        let selection = get_fetcher(&config).await;

        assert_eq!(selection.backend, Backend::Env);
        assert!(selection
            .fallback
            .as_deref()
            .unwrap()
            .contains("GCP_CREDENTIALS_FILE"));
    }

    #[tokio::test]
    async fn test_missing_project_falls_back() {
        let config = FetcherConfig {
            use_secret_manager: true,
            credentials_file: Some(PathBuf::from("/nonexistent/key.json")),
            ..FetcherConfig::default()
        };
        let selection = get_fetcher(&config).await;

        assert_eq!(selection.backend, Backend::Env);
        assert!(selection.fallback.as_deref().unwrap().contains("project ID"));
    }

    #[tokio::test]
    async fn test_env_round_trip() {
        std::env::set_var("SECRET_FETCHER_SELECTOR_API_KEY", "abc123");
        let fetcher = get_fetcher(&FetcherConfig::default()).await.into_fetcher();

        let value = fetcher
            .get_secret("SECRET_FETCHER_SELECTOR_API_KEY")
            .await
            .unwrap();
        assert_eq!(value, "abc123");
    }
}
