//! Report computation for liquidity pools.
//!
//! This crate turns raw pool snapshots into report data:
//! - Current-vs-historical comparison of TVL, volume and fees
//! - APR resolution with a fee-based fallback
//! - Pool-type specific extras dispatched by capability
//! - Multi-pool rankings and TVL-weighted aggregates
//!
//! All functions are pure; fetching is left to the data layer.

/// Prelude module for convenient imports.
pub mod prelude;

/// Per-pool comparison.
pub mod comparison;
/// Engine configuration.
pub mod config;
/// Error types.
pub mod error;
/// Pool-type specific metrics.
pub mod extensions;
/// Rankings and portfolio aggregates.
pub mod portfolio;
