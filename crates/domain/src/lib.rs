//! Domain model for liquidity pool performance reports.
//!
//! This crate holds the pure building blocks of a report:
//! - Raw pool snapshots as delivered by the upstream data layer
//! - Pool types and their capability sets
//! - The explicit "N/A" sentinel used for every unavailable metric
//! - APR resolution across upstream sources
//! - Delta and percentage-change calculation
//! - Adaptive-precision percentage formatting
//!
//! Nothing in here performs I/O.

/// Prelude module for convenient imports.
pub mod prelude;

/// Snapshot entities.
pub mod entities;
/// Shared enumerations.
pub mod enums;
/// Error types.
pub mod error;
/// Metric calculators.
pub mod metrics;
/// Value objects and formatting.
pub mod value_objects;
