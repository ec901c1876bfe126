//! Prelude module for convenient imports.

pub use crate::error::DataError;
pub use crate::normalize::{NormalizeOptions, NormalizedPool, SeriesWindow, normalize, reduce_series};
pub use crate::payload::{PoolDocument, PoolPayload, SeriesPoint, V2Pool, V3Pool};
pub use crate::source::{JsonFileSource, PoolFetch, SnapshotSource, fetch_batch, fetch_pool};
