//! Upstream pool data for reports.
//!
//! This crate loads pool payloads and turns them into domain snapshots:
//! - Lenient DTOs for V2 subgraph and V3 API pool shapes
//! - Reduction of cumulative snapshot series to window metrics
//! - An async [`source::SnapshotSource`] seam with a JSON fixture backend
//! - Concurrent batch fetching with per-pool failure isolation

/// Prelude module for convenient imports.
pub mod prelude;

/// Error types.
pub mod error;
/// Snapshot normalization.
pub mod normalize;
/// Upstream payload shapes.
pub mod payload;
/// Snapshot sources and batch fetching.
pub mod source;
