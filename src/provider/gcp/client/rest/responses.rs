//! # Response Types
//!
//! GCP Secret Manager REST API and OAuth2 token endpoint response structures.
//!
//! These structs represent the JSON payloads returned by the GCP Secret Manager REST API v1.
//! They are designed to match the API schema as documented at:
//! https://cloud.google.com/secret-manager/docs/reference/rest

use serde::Deserialize;

/// Secret payload containing the actual secret data
///
/// **Important**: The `data` field is base64-encoded and must be decoded
/// to retrieve the original value.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/SecretPayload
#[derive(Debug, Deserialize)]
pub struct SecretPayload {
    /// Base64-encoded secret data
    #[serde(default)]
    pub data: String,
}

/// Response from accessing a secret version
///
/// Returned by `GET /v1/projects/{project}/secrets/{secret}/versions/{version}:access`.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets.versions/access
#[derive(Debug, Deserialize)]
pub struct AccessSecretVersionResponse {
    pub payload: Option<SecretPayload>,
}

/// GCP API error response wrapper
///
/// API Reference: https://cloud.google.com/apis/design/errors
#[derive(Debug, Deserialize)]
pub struct GcpErrorResponse {
    pub error: GcpError,
}

/// Detailed error information from GCP API
#[derive(Debug, Deserialize)]
pub struct GcpError {
    /// Human-readable error message
    pub message: String,
    /// Error status string (e.g., "NOT_FOUND", "PERMISSION_DENIED")
    #[serde(default)]
    pub status: String,
}

/// OAuth2 access token response from the token endpoint
///
/// Returned by `token_uri` after exchanging a signed service account assertion.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    #[serde(default)]
    #[allow(dead_code, reason = "Required by the token endpoint schema but not used")]
    pub token_type: String,
}

/// OAuth2 error body (RFC 6749 section 5.2)
#[derive(Debug, Deserialize)]
pub struct OAuthErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
