use thiserror::Error;

/// Errors raised while loading pool data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pool not found: {0}")]
    PoolNotFound(String),

    /// Valid JSON that matches neither known pool shape.
    #[error("malformed payload for pool {address}: {reason}")]
    MalformedPayload { address: String, reason: String },
}
