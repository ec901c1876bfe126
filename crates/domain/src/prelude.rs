//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use pool_report_domain::prelude::*;
//! ```

// Entities
pub use crate::entities::{AprCandidates, AprItem, RawPoolSnapshot, TokenWeight};

// Enums
pub use crate::enums::{
    ApiVersion, AprSource, Capability, DataCompleteness, PoolType, RankingMetric,
};

// Errors
pub use crate::error::MetricsError;

// Metrics
pub use crate::metrics::{
    AprAttempt, AprContext, AprResolution, AttemptOutcome, Change, compare_values, pct_change,
    resolve_apr,
};

// Formatting
pub use crate::value_objects::percentage::{
    format_apr, format_apr_metric, format_change, format_change_metric, format_share,
    format_swap_fee, format_swap_fee_pct,
};
pub use crate::value_objects::{Metric, NOT_AVAILABLE, Unavailable};
