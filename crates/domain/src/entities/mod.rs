pub mod snapshot;

// Re-export for easier access
pub use snapshot::{AprCandidates, AprItem, RawPoolSnapshot, TokenWeight};
