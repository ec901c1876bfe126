//! APR resolution across upstream sources.
//!
//! Sources are tried in a fixed priority order and the first one that yields
//! a number wins. Every attempt is recorded so callers can see which sources
//! were absent and which one resolved the value.

use super::fees::annualize_fees;
use crate::entities::RawPoolSnapshot;
use crate::enums::AprSource;
use crate::error::MetricsError;
use crate::value_objects::{Metric, Unavailable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inputs available to the extractors.
#[derive(Debug, Clone, Copy)]
pub struct AprContext<'a> {
    pub snapshot: &'a RawPoolSnapshot,
    /// Fees over the window, possibly extrapolated from 24h data.
    pub window_fees: Option<Decimal>,
    pub window_days: u32,
}

impl<'a> AprContext<'a> {
    /// Context using the snapshot's own window fees.
    #[must_use]
    pub fn new(snapshot: &'a RawPoolSnapshot, window_days: u32) -> Self {
        Self {
            snapshot,
            window_fees: snapshot.fees_window,
            window_days,
        }
    }

    #[must_use]
    pub fn with_window_fees(mut self, fees: Option<Decimal>) -> Self {
        self.window_fees = fees;
        self
    }
}

/// Outcome of trying a single source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Resolved(Decimal),
    /// The source carried no usable value.
    Absent,
    /// The source had data but could not produce a value.
    Rejected(Unavailable),
}

/// One step of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AprAttempt {
    pub source: AprSource,
    pub outcome: AttemptOutcome,
}

/// Resolved APR plus the trail that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AprResolution {
    /// APR as a fraction, or the "unavailable" marker.
    pub apr: Metric<Decimal>,
    /// Source that won, if any.
    pub source: Option<AprSource>,
    pub attempts: Vec<AprAttempt>,
}

impl AprResolution {
    /// True when the value came from the fee-based fallback.
    #[must_use]
    pub fn is_estimate(&self) -> bool {
        self.source.is_some_and(|s| s.is_estimate())
    }
}

type Extractor = fn(&AprContext<'_>) -> AttemptOutcome;

/// Resolution order; first `Resolved` wins.
const RESOLUTION_ORDER: [(AprSource, Extractor); 5] = [
    (AprSource::DirectTotal, direct_total),
    (AprSource::ItemsSum, items_sum),
    (AprSource::PoolField, pool_field),
    (AprSource::RootField, root_field),
    (AprSource::FeeEstimate, fee_estimate),
];

/// Resolves the authoritative APR for a snapshot.
#[must_use]
pub fn resolve_apr(ctx: &AprContext<'_>) -> AprResolution {
    let mut attempts = Vec::with_capacity(RESOLUTION_ORDER.len());
    let mut last_reason = Unavailable::MissingData;

    for (source, extract) in RESOLUTION_ORDER {
        let outcome = extract(ctx);
        attempts.push(AprAttempt { source, outcome });
        match outcome {
            AttemptOutcome::Resolved(apr) => {
                debug!(pool = %ctx.snapshot.address, ?source, %apr, "APR resolved");
                return AprResolution {
                    apr: Metric::Value(apr),
                    source: Some(source),
                    attempts,
                };
            }
            AttemptOutcome::Rejected(reason) => last_reason = reason,
            AttemptOutcome::Absent => {}
        }
    }

    debug!(pool = %ctx.snapshot.address, "no APR source available");
    AprResolution {
        apr: Metric::NotAvailable(last_reason),
        source: None,
        attempts,
    }
}

fn from_field(value: Option<Decimal>) -> AttemptOutcome {
    value.map_or(AttemptOutcome::Absent, AttemptOutcome::Resolved)
}

fn direct_total(ctx: &AprContext<'_>) -> AttemptOutcome {
    from_field(ctx.snapshot.apr_candidates.direct_total)
}

/// Sums numeric components; an empty or all-non-numeric list counts as absent.
fn items_sum(ctx: &AprContext<'_>) -> AttemptOutcome {
    let Some(items) = ctx.snapshot.apr_candidates.items.as_ref() else {
        return AttemptOutcome::Absent;
    };
    let mut numeric = items.iter().filter_map(|item| item.apr).peekable();
    if numeric.peek().is_none() {
        return AttemptOutcome::Absent;
    }
    numeric
        .try_fold(Decimal::ZERO, |acc, apr| acc.checked_add(apr))
        .map_or(
            AttemptOutcome::Rejected(Unavailable::UndefinedRatio),
            AttemptOutcome::Resolved,
        )
}

fn pool_field(ctx: &AprContext<'_>) -> AttemptOutcome {
    from_field(ctx.snapshot.apr_candidates.pool_field)
}

fn root_field(ctx: &AprContext<'_>) -> AttemptOutcome {
    from_field(ctx.snapshot.apr_candidates.root_field)
}

fn fee_estimate(ctx: &AprContext<'_>) -> AttemptOutcome {
    let (Some(fees), Some(tvl)) = (ctx.window_fees, ctx.snapshot.tvl) else {
        return AttemptOutcome::Absent;
    };
    match annualize_fees(fees, tvl, ctx.window_days) {
        Ok(apr) => AttemptOutcome::Resolved(apr),
        Err(MetricsError::NonPositiveTvl | MetricsError::ZeroWindow) => {
            AttemptOutcome::Rejected(Unavailable::UndefinedRatio)
        }
        Err(_) => AttemptOutcome::Rejected(Unavailable::MissingData),
    }
}
