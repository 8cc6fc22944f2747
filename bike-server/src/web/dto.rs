//! Data transfer objects for web responses.
//!
//! Stations, pages and summaries serialize themselves; only the envelopes
//! specific to HTTP live here.

use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,

    /// Whether listings still come from the primary store
    pub primary_available: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
