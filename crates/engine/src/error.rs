use thiserror::Error;

/// Errors surfaced by the comparison engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A pool lacks the minimum data needed for a report.
    #[error("pool {address} has insufficient data: {reason}")]
    InsufficientData { address: String, reason: String },

    /// Every pool in the request failed to resolve.
    #[error("no pool in the request could be resolved ({failed} failed)")]
    NoResolvablePools { failed: usize },
}
