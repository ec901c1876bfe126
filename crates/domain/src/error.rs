use thiserror::Error;

/// Errors raised by the metric calculators.
///
/// None of these reach a report directly: callers turn them into an
/// explicit [`crate::value_objects::Metric::NotAvailable`] marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("TVL must be positive to annualize fees")]
    NonPositiveTvl,

    #[error("window length cannot be zero days")]
    ZeroWindow,

    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    #[error("unknown ranking metric: {0}")]
    UnknownRankingMetric(String),
}
