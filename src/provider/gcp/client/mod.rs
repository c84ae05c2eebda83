//! GCP Secret Manager Client
//!
//! Native REST implementation using reqwest, authenticated with service
//! account credentials.

pub mod auth;
pub mod common;
pub mod rest;

pub use auth::{ServiceAccountKey, ServiceAccountTokenSource};
pub use rest::SecretManagerREST;
