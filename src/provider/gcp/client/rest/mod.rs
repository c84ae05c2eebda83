//! GCP Secret Manager REST Client
//!
//! Native REST implementation for GCP Secret Manager API v1.
//! Uses reqwest for HTTP requests and OAuth2 for authentication.
//!
//! This implementation:
//! - Works directly with HTTP mock servers and emulators via an endpoint override
//! - Uses reqwest with rustls (no OpenSSL dependencies)
//! - Makes exactly one request per secret access (no retries)
//!
//! References:
//! - [GCP Secret Manager REST API v1](https://docs.cloud.google.com/secret-manager/docs/reference/rest)

pub mod responses;

use crate::error::{FetchError, Result};
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, Method, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, field, info, Instrument};

use super::auth::{ServiceAccountKey, ServiceAccountTokenSource};
use super::common::{format_secret_version_path, OperationTracker};
use responses::{AccessSecretVersionResponse, GcpErrorResponse};

/// Trailing segment of an access request for the latest version
const LATEST_ACCESS_SEGMENT: &str = "latest:access";

/// GCP Secret Manager REST client
pub struct SecretManagerREST {
    http_client: Client,
    base_url: Url,
    project_id: String,
    tokens: Arc<ServiceAccountTokenSource>,
}

impl std::fmt::Debug for SecretManagerREST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManagerREST")
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url.as_str())
            .field("client_email", &self.tokens.client_email())
            .finish_non_exhaustive()
    }
}

impl SecretManagerREST {
    /// Create a new GCP REST client with service account authentication
    ///
    /// An access token is obtained up front, so a client that constructs
    /// successfully has working credentials.
    ///
    /// # Errors
    /// Returns an error if client initialization or token retrieval fails
    pub async fn new(
        project_id: String,
        key: ServiceAccountKey,
        base_url: &str,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');

        info!(
            "Initializing GCP REST client for project {} as {}",
            project_id, key.client_email
        );
        if base_url != crate::constants::DEFAULT_SECRET_MANAGER_ENDPOINT {
            info!("Using Secret Manager endpoint override: {}", base_url);
        }

        let base_url = Url::parse(base_url).map_err(|e| {
            FetchError::ClientSetup(format!("Invalid Secret Manager endpoint {base_url}: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::ClientSetup(format!(
                "Secret Manager endpoint {base_url} cannot be used as a base URL"
            )));
        }

        let http_client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| FetchError::ClientSetup(format!("Failed to create HTTP client: {e}")))?;

        let tokens = ServiceAccountTokenSource::new(http_client.clone(), key)
            .map_err(FetchError::Authentication)?;

        // Fail construction on bad credentials rather than on first access
        tokens
            .access_token()
            .await
            .map_err(FetchError::Authentication)?;

        Ok(Self {
            http_client,
            base_url,
            project_id,
            tokens: Arc::new(tokens),
        })
    }

    /// Get the latest version of a secret, decoded as UTF-8
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable payload
    pub async fn access_secret_version(&self, secret_name: &str) -> Result<String> {
        let span = tracing::debug_span!(
            "gcp.secret.get",
            secret.name = secret_name,
            project.id = self.project_id.as_str(),
            operation.success = field::Empty,
            operation.duration_ms = field::Empty,
            error.message = field::Empty,
        );
        let tracker = OperationTracker::new(span.clone());

        let result = self.access_secret_version_inner(secret_name).instrument(span).await;

        match &result {
            Ok(_) => tracker.record_success(),
            Err(e) => tracker.record_error(&e.to_string()),
        }
        result
    }

    async fn access_secret_version_inner(&self, secret_name: &str) -> Result<String> {
        debug!(
            "Accessing GCP secret version: {}",
            format_secret_version_path(&self.project_id, secret_name)
        );
        let url = self.secret_access_url(secret_name)?;

        let access_token = self
            .tokens
            .access_token()
            .await
            .map_err(FetchError::Authentication)?;

        let response = self
            .make_request(Method::GET, url, &access_token)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                secret: secret_name.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::handle_error_response(secret_name, status, &error_text));
        }

        let bytes = response.bytes().await.map_err(|source| FetchError::Request {
            secret: secret_name.to_string(),
            source,
        })?;
        let body: AccessSecretVersionResponse =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Payload {
                secret: secret_name.to_string(),
                reason: format!("failed to parse secret version response: {e}"),
            })?;

        let payload = body.payload.ok_or_else(|| FetchError::Payload {
            secret: secret_name.to_string(),
            reason: "secret version response has no payload".to_string(),
        })?;

        // Secret Manager REST transports payload bytes as base64
        let decoded = general_purpose::STANDARD
            .decode(payload.data.as_bytes())
            .map_err(|e| FetchError::Payload {
                secret: secret_name.to_string(),
                reason: format!("failed to decode base64 secret data: {e}"),
            })?;

        String::from_utf8(decoded).map_err(|e| FetchError::Payload {
            secret: secret_name.to_string(),
            reason: format!("secret value is not valid UTF-8: {e}"),
        })
    }

    /// Build the `versions/latest:access` URL for `secret_name`
    ///
    /// Each path component is pushed as its own segment, so `/`, `?`, `#` and
    /// `%` in a secret ID are percent-encoded instead of read as URL syntax.
    /// `.` and `..` would be dropped as dot segments and are rejected.
    fn secret_access_url(&self, secret_name: &str) -> Result<Url> {
        if matches!(secret_name, "." | "..") {
            return Err(FetchError::InvalidSecretName {
                secret: secret_name.to_string(),
                reason: "dot segments cannot name a secret".to_string(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                FetchError::ClientSetup(format!(
                    "Secret Manager endpoint {} cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "secrets",
                secret_name,
                "versions",
                LATEST_ACCESS_SEGMENT,
            ]);
        Ok(url)
    }

    /// Build HTTP request with authentication headers
    pub(crate) fn make_request(
        &self,
        method: Method,
        url: Url,
        access_token: &str,
    ) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .bearer_auth(access_token)
            .header("Content-Type", "application/json")
    }

    /// Handle GCP API error responses
    pub(crate) fn handle_error_response(
        secret_name: &str,
        status: reqwest::StatusCode,
        error_text: &str,
    ) -> FetchError {
        let message = match serde_json::from_str::<GcpErrorResponse>(error_text) {
            Ok(error_response) => format!(
                "{} (status: {})",
                error_response.error.message, error_response.error.status
            ),
            Err(_) => error_text.to_string(),
        };

        FetchError::Api {
            secret: secret_name.to_string(),
            status: status.as_u16(),
            message,
        }
    }

    /// Get the project ID
    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_response_uses_gcp_error_body() {
        let body = r#"{"error":{"code":404,"message":"Secret [projects/p/secrets/X] not found or has no versions.","status":"NOT_FOUND"}}"#;
        let err = SecretManagerREST::handle_error_response("X", StatusCode::NOT_FOUND, body);

        match err {
            FetchError::Api {
                secret,
                status,
                message,
            } => {
                assert_eq!(secret, "X");
                assert_eq!(status, 404);
                assert!(message.contains("not found"));
                assert!(message.contains("NOT_FOUND"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_response_without_code_is_still_parsed() {
        let body = r#"{"error":{"message":"Permission denied on secret","status":"PERMISSION_DENIED"}}"#;
        let err = SecretManagerREST::handle_error_response("X", StatusCode::FORBIDDEN, body);

        assert_eq!(
            err.to_string(),
            "failed to access secret version for X: HTTP 403: Permission denied on secret (status: PERMISSION_DENIED)"
        );
    }

    #[test]
    fn test_error_response_falls_back_to_raw_text() {
        let err = SecretManagerREST::handle_error_response(
            "X",
            StatusCode::BAD_GATEWAY,
            "upstream unavailable",
        );
        assert_eq!(
            err.to_string(),
            "failed to access secret version for X: HTTP 502: upstream unavailable"
        );
    }
}
