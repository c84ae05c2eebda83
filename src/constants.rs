//! # Constants
//!
//! Shared constants used throughout the crate.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Environment variable enabling the Secret Manager backend (`"true"` enables it)
pub const ENV_USE_SECRET_MANAGER: &str = "USE_SECRET_MANAGER";

/// Environment variable holding the GCP project ID
pub const ENV_GCP_PROJECT_ID: &str = "GCP_PROJECT_ID";

/// Environment variable holding the path to the service account key file
pub const ENV_GCP_CREDENTIALS_FILE: &str = "GCP_CREDENTIALS_FILE";

/// Environment variable overriding the Secret Manager API base URL
pub const ENV_GCP_SECRET_MANAGER_ENDPOINT: &str = "GCP_SECRET_MANAGER_ENDPOINT";

/// Environment variable holding the default per-call timeout (seconds)
pub const ENV_SECRET_FETCH_TIMEOUT_SECS: &str = "SECRET_FETCH_TIMEOUT_SECS";

/// Production Secret Manager REST endpoint
pub const DEFAULT_SECRET_MANAGER_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// OAuth2 scope requested for Secret Manager access
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Grant type for exchanging a signed service account assertion
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a self-signed service account assertion (seconds)
/// Google rejects assertions valid for longer than one hour
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh the access token this many seconds before it expires
pub const TOKEN_REFRESH_SKEW_SECS: i64 = 60;

/// Default HTTP connect timeout for the Secret Manager client (seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
