//! Error types
//!
//! Only the edges of the crate are fallible: decoding a share token and
//! acquiring host resources. The simulation itself is total.

/// Common error type for the library
#[derive(Debug, thiserror::Error)]
pub enum NotedropError {
    #[error("share token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("share token is not a valid board: {0}")]
    Json(#[from] serde_json::Error),

    #[error("drawing surface unavailable: {0}")]
    MissingCanvas(String),

    #[error("host error: {0}")]
    Host(String),
}

/// Convenience Result type with NotedropError
pub type Result<T> = std::result::Result<T, NotedropError>;
