//! # Service Account Authentication
//!
//! OAuth2 access tokens for the Secret Manager REST client, obtained from a
//! service account key file with the JWT bearer grant:
//!
//! 1. Read the key JSON (`client_email`, `private_key`, `token_uri`, ...)
//! 2. Sign a short-lived RS256 assertion with the private key
//! 3. POST it to `token_uri` and receive a bearer token
//!
//! Tokens are reused until shortly before they expire.
//!
//! References:
//! - [Using OAuth 2.0 for Server to Server Applications](https://developers.google.com/identity/protocols/oauth2/service-account)

use crate::constants::{
    ASSERTION_LIFETIME_SECS, CLOUD_PLATFORM_SCOPE, JWT_BEARER_GRANT_TYPE, TOKEN_REFRESH_SKEW_SECS,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::rest::responses::{OAuthErrorResponse, TokenResponse};

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Service account key file contents
///
/// Only the fields needed for the JWT bearer grant are kept.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse a service account key from its JSON text
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or is not a service account key
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self =
            serde_json::from_str(json).context("Credentials file is not a valid service account key")?;

        if key.key_type != "service_account" {
            bail!(
                "Unsupported credentials type '{}', expected 'service_account'",
                key.key_type
            );
        }
        if key.client_email.is_empty() {
            bail!("Service account key has an empty client_email");
        }

        Ok(key)
    }

    /// Read and parse a service account key file
    ///
    /// # Errors
    /// Returns an error if the file can't be read or isn't a service account key
    pub async fn from_file(path: &Path) -> Result<Self> {
        let mut contents = tokio::fs::read_to_string(path)
            .await
            .context("Failed to read credentials file")?;
        let key = Self::from_json(&contents);
        contents.zeroize();
        key
    }
}

/// Claims of the self-signed assertion sent to the token endpoint
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_SKEW_SECS) < self.expires_at
    }
}

/// Issues and caches access tokens for one service account
pub struct ServiceAccountTokenSource {
    http_client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountTokenSource")
            .field("client_email", &self.key.client_email)
            .field("token_uri", &self.key.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountTokenSource {
    /// Create a token source for `key`
    ///
    /// # Errors
    /// Returns an error if the private key is not an RSA PEM key
    pub fn new(http_client: Client, key: ServiceAccountKey) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .context("Service account private_key is not a valid RSA PEM key")?;

        Ok(Self {
            http_client,
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Get a valid access token, exchanging a new assertion if needed
    ///
    /// Concurrent callers wait on the same refresh.
    ///
    /// # Errors
    /// Returns an error if signing or the token exchange fails
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.access_token.clone());
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key.private_key_id);

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .context("Failed to sign service account assertion")
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        debug!(
            "Exchanging service account assertion for {} at {}",
            self.key.client_email, self.key.token_uri
        );

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach OAuth2 token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(error) = serde_json::from_str::<OAuthErrorResponse>(&error_text) {
                bail!(
                    "Token endpoint rejected service account {} (HTTP {}): {}{}",
                    self.key.client_email,
                    status.as_u16(),
                    error.error,
                    error
                        .error_description
                        .as_deref()
                        .map(|d| format!(": {d}"))
                        .unwrap_or_default()
                );
            }
            bail!(
                "Token endpoint returned HTTP {}: {}",
                status.as_u16(),
                error_text
            );
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token endpoint response")?;

        if token.access_token.is_empty() {
            bail!("Token endpoint returned an empty access token");
        }

        let expires_at = Duration::try_seconds(token.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .with_context(|| {
                format!(
                    "Token endpoint returned an out of range expires_in: {}",
                    token.expires_in
                )
            })?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}
