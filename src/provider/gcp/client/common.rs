//! Common utilities and helpers for the GCP Secret Manager client
//!
//! Resource naming and span bookkeeping shared by client operations.

use std::time::{Duration, Instant};
use tracing::Span;

/// Formats a GCP secret resource path
pub fn format_secret_path(project_id: &str, secret_name: &str) -> String {
    format!("projects/{}/secrets/{}", project_id, secret_name)
}

/// Formats a GCP secret version path
///
/// Always the `latest` version; pinned versions are not supported.
pub fn format_secret_version_path(project_id: &str, secret_name: &str) -> String {
    format!("{}/versions/latest", format_secret_path(project_id, secret_name))
}

/// Records span attributes for a successful operation
///
/// The span must declare `operation.success` and `operation.duration_ms`.
pub fn record_success(span: &Span, duration: Duration) {
    span.record("operation.duration_ms", duration_ms(duration));
    span.record("operation.success", true);
}

/// Records span attributes for a failed operation
pub fn record_error(span: &Span, error_message: &str, duration: Duration) {
    span.record("operation.success", false);
    span.record("error.message", error_message);
    span.record("operation.duration_ms", duration_ms(duration));
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Helper struct for tracking operation state
#[derive(Debug)]
pub struct OperationTracker {
    start: Instant,
    span: Span,
}

impl OperationTracker {
    /// Create a new operation tracker
    pub fn new(span: Span) -> Self {
        Self {
            start: Instant::now(),
            span,
        }
    }

    pub fn record_success(&self) {
        record_success(&self.span, self.start.elapsed());
    }

    pub fn record_error(&self, error_message: &str) {
        record_error(&self.span, error_message, self.start.elapsed());
    }
}
