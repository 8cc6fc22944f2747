//! Primary store error types.

/// Errors that can occur when talking to the primary document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check BIKES_STORE_API_KEY")]
    Unauthorized,

    /// Store returned an error status
    #[error("store error {status}: {message}")]
    Api { status: u16, message: String },

    /// A document with this key already exists
    #[error("station {key} already exists")]
    Conflict { key: String },

    /// Failed to parse a response body
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Store cannot be reached at all
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}
