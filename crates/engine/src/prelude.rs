//! Prelude module for convenient imports.
//!
//! ```rust
//! use pool_report_engine::prelude::*;
//! ```

// Comparison
pub use crate::comparison::{ComparisonResult, FormattedMetrics, compare_snapshots, pool_url};

// Configuration
pub use crate::config::{DEFAULT_WINDOW_DAYS, EngineConfig};

// Errors
pub use crate::error::EngineError;

// Extensions
pub use crate::extensions::{
    CountExtra, ExtensionInput, PoolExtra, RateExtra, WeightShare, WeightsExtra, extract_extras,
};

// Portfolio
pub use crate::portfolio::{
    PoolFailure, PoolOutcome, PortfolioAggregate, PortfolioReport, RankedPool, Ranking, aggregate,
    build_portfolio, parse_ranking_metrics, rank_pools, weighted_average_apr,
};
