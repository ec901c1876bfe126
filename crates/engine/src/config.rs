//! Engine configuration.

use pool_report_domain::enums::RankingMetric;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default comparison window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 15;

/// Configuration for report computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Length of the comparison window in days.
    pub window_days: u32,
    /// Number of pools kept per ranking.
    pub top_n: usize,
    /// Rankings used when a request names none.
    pub default_rankings: Vec<RankingMetric>,
    /// Allowed deviation of summed token weights from 100, in percentage points.
    pub weight_tolerance: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            top_n: 3,
            default_rankings: vec![RankingMetric::Volume, RankingMetric::TvlGrowth],
            weight_tolerance: Decimal::new(5, 1), // 0.5pp
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window length. Zero is clamped to one day.
    #[must_use]
    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days.max(1);
        self
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_default_rankings(mut self, rankings: Vec<RankingMetric>) -> Self {
        self.default_rankings = rankings;
        self
    }

    #[must_use]
    pub fn with_weight_tolerance(mut self, tolerance: Decimal) -> Self {
        self.weight_tolerance = tolerance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.window_days, 15);
        assert_eq!(config.top_n, 3);
        assert_eq!(
            config.default_rankings,
            vec![RankingMetric::Volume, RankingMetric::TvlGrowth]
        );
    }

    #[test]
    fn test_zero_window_is_clamped() {
        assert_eq!(EngineConfig::new().with_window_days(0).window_days, 1);
    }
}
