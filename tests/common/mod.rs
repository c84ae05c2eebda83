//! Common test utilities for Secret Manager integration tests
//!
//! Provides a service account key file pointing at a wiremock server that
//! plays both the OAuth2 token endpoint and the Secret Manager API.

#![allow(dead_code, reason = "Not every test binary uses every helper")]

use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_PROJECT: &str = "test-project";
pub const TEST_TOKEN: &str = "test-token";
pub const TEST_CLIENT_EMAIL: &str = "fetcher@test-project.iam.gserviceaccount.com";

const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test-service-account.pem");

/// Write a service account key whose `token_uri` points at `server`
pub fn write_credentials(server: &MockServer) -> NamedTempFile {
    let key = json!({
        "type": "service_account",
        "project_id": TEST_PROJECT,
        "private_key_id": "test-key-id",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": TEST_CLIENT_EMAIL,
        "token_uri": format!("{}/token", server.uri()),
    });

    let mut file = NamedTempFile::new().expect("Failed to create credentials file");
    file.write_all(key.to_string().as_bytes())
        .expect("Failed to write credentials file");
    file
}

/// Mount a token endpoint that accepts JWT bearer assertions
pub async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
    mount_token_endpoint_with_lifetime(server, 3600, expected_calls).await;
}

/// Mount a token endpoint issuing tokens that live for `expires_in` seconds
pub async fn mount_token_endpoint_with_lifetime(
    server: &MockServer,
    expires_in: i64,
    expected_calls: u64,
) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TEST_TOKEN,
            "expires_in": expires_in,
            "token_type": "Bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mount a successful `versions/latest:access` response for `secret`
pub async fn mount_secret(server: &MockServer, secret: &str, value: &str) {
    let version = format!("projects/{TEST_PROJECT}/secrets/{secret}/versions/latest");

    Mock::given(method("GET"))
        .and(path(format!("/v1/{version}:access")))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("projects/{TEST_PROJECT}/secrets/{secret}/versions/1"),
            "payload": {
                "data": general_purpose::STANDARD.encode(value.as_bytes())
            }
        })))
        .mount(server)
        .await;
}
