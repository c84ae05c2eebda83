//! # Errors
//!
//! Error type returned by fetchers and by remote fetcher construction.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Configuration is incomplete or invalid (e.g. empty project ID)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Credentials file could not be read or parsed
    #[error("failed to load credentials file {}: {source:#}", path.display())]
    Credentials {
        path: PathBuf,
        source: anyhow::Error,
    },

    /// Signing the assertion or exchanging it for an access token failed
    #[error("failed to authenticate with GCP: {0:#}")]
    Authentication(anyhow::Error),

    /// HTTP client could not be built
    #[error("failed to setup secret manager client: {0}")]
    ClientSetup(String),

    /// Transport-level failure while accessing a secret
    #[error("failed to access secret version for {secret}: {source}")]
    Request {
        secret: String,
        source: reqwest::Error,
    },

    /// Secret ID cannot be expressed as a Secret Manager resource path
    #[error("invalid secret name {secret:?}: {reason}")]
    InvalidSecretName { secret: String, reason: String },

    /// Secret Manager answered with a non-success status
    #[error("failed to access secret version for {secret}: HTTP {status}: {message}")]
    Api {
        secret: String,
        status: u16,
        message: String,
    },

    /// Response payload was missing or could not be decoded
    #[error("invalid payload for secret {secret}: {reason}")]
    Payload { secret: String, reason: String },

    /// Per-call deadline elapsed before the backend answered
    #[error("timed out after {timeout:?} fetching secret {secret}")]
    Timeout { secret: String, timeout: Duration },
}

pub type Result<T> = std::result::Result<T, FetchError>;
