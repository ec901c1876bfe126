//! Snapshot normalization.
//!
//! Maps either pool shape onto [`RawPoolSnapshot`] and reduces a cumulative
//! snapshot series to window totals plus the historical snapshot one window
//! back.

use crate::error::DataError;
use crate::payload::{PoolDocument, PoolPayload, SeriesPoint, TokenDto, V2Pool, V3Pool};
use pool_report_domain::entities::{AprCandidates, AprItem, RawPoolSnapshot, TokenWeight};
use pool_report_domain::enums::{ApiVersion, DataCompleteness, PoolType};
use rust_decimal::Decimal;
use tracing::debug;

/// Seconds in a day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// APR item kinds counted as the boosted (yield-bearing) component.
const BOOSTED_KINDS: [&str; 2] = ["IB_YIELD", "BOOST"];

/// Options for normalizing a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub window_days: u32,
    /// Chain used when the payload names none.
    pub default_chain: String,
    /// Reference time, unix seconds.
    pub now: u64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            window_days: 15,
            default_chain: "MAINNET".to_string(),
            now: u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0),
        }
    }
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days.max(1);
        self
    }

    #[must_use]
    pub fn with_default_chain(mut self, chain: impl Into<String>) -> Self {
        self.default_chain = chain.into();
        self
    }

    #[must_use]
    pub fn with_now(mut self, now: u64) -> Self {
        self.now = now;
        self
    }
}

/// Current snapshot and, when history allows, the one a window earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPool {
    pub current: RawPoolSnapshot,
    pub historical: Option<RawPoolSnapshot>,
}

/// Window metrics derived from a cumulative series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesWindow {
    pub latest_timestamp: u64,
    pub latest_tvl: Option<Decimal>,
    pub volume_window: Option<Decimal>,
    pub fees_window: Option<Decimal>,
    /// Timestamp of the baseline point at the window start.
    pub historical_timestamp: u64,
    pub historical_tvl: Option<Decimal>,
    /// Volume over the window before the current one.
    pub prior_volume_window: Option<Decimal>,
    pub prior_fees_window: Option<Decimal>,
}

type Dated<'a> = (u64, &'a SeriesPoint);

/// Point closest to `target` within one day either side.
fn closest_within<'a>(points: &[Dated<'a>], target: u64) -> Option<Dated<'a>> {
    points
        .iter()
        .copied()
        .filter(|(ts, _)| ts.abs_diff(target) <= SECONDS_PER_DAY)
        .min_by_key(|(ts, _)| ts.abs_diff(target))
}

/// Difference of two cumulative values, clamped at zero.
fn cumulative_diff(later: Option<Decimal>, earlier: Option<Decimal>) -> Option<Decimal> {
    let diff = later?.checked_sub(earlier?)?;
    Some(diff.max(Decimal::ZERO))
}

/// Reduces a cumulative series to window totals.
///
/// The baseline is the point closest to `now - window` within one day, or
/// the earliest point when none is that close. Returns `None` when the
/// series has fewer than two dated points, since no window can be measured.
#[must_use]
pub fn reduce_series(points: &[SeriesPoint], now: u64, window_days: u32) -> Option<SeriesWindow> {
    let mut dated: Vec<Dated<'_>> = points
        .iter()
        .filter_map(|p| p.timestamp.map(|ts| (ts, p)))
        .collect();
    dated.sort_by_key(|(ts, _)| *ts);

    let (latest_ts, latest) = *dated.last()?;
    let window = u64::from(window_days) * SECONDS_PER_DAY;
    let (base_ts, base) = match closest_within(&dated, now.saturating_sub(window)) {
        Some(point) => point,
        None => {
            debug!(
                window_start = now.saturating_sub(window),
                "no series point near window start, using earliest"
            );
            *dated.first()?
        }
    };
    if base_ts >= latest_ts {
        return None;
    }

    let prior = closest_within(&dated, now.saturating_sub(2 * window)).filter(|(ts, _)| *ts < base_ts);

    Some(SeriesWindow {
        latest_timestamp: latest_ts,
        latest_tvl: latest.liquidity,
        volume_window: cumulative_diff(latest.swap_volume, base.swap_volume),
        fees_window: cumulative_diff(latest.swap_fees, base.swap_fees),
        historical_timestamp: base_ts,
        historical_tvl: base.liquidity,
        prior_volume_window: prior.and_then(|(_, p)| cumulative_diff(base.swap_volume, p.swap_volume)),
        prior_fees_window: prior.and_then(|(_, p)| cumulative_diff(base.swap_fees, p.swap_fees)),
    })
}

fn token_weights(tokens: Option<Vec<TokenDto>>) -> Option<Vec<TokenWeight>> {
    let weights: Vec<TokenWeight> = tokens?
        .into_iter()
        .filter_map(|t| {
            let weight = t.weight?;
            Some(TokenWeight::new(t.symbol.unwrap_or_else(|| "?".to_string()), weight))
        })
        .collect();
    (!weights.is_empty()).then_some(weights)
}

fn boosted_component(items: &[AprItem]) -> Option<Decimal> {
    let mut boosted = items
        .iter()
        .filter(|item| {
            item.kind.as_deref().is_some_and(|kind| {
                let upper = kind.to_ascii_uppercase();
                BOOSTED_KINDS.iter().any(|k| upper.contains(k))
            })
        })
        .filter_map(|item| item.apr)
        .peekable();
    boosted.peek()?;
    boosted.try_fold(Decimal::ZERO, |acc, apr| acc.checked_add(apr))
}

fn from_v3(address: &str, chain: &str, pool: V3Pool) -> RawPoolSnapshot {
    let data = pool.dynamic_data;
    let items: Option<Vec<AprItem>> = data.apr_items.map(|items| {
        items
            .into_iter()
            .map(|item| AprItem {
                id: item.id.or(item.title),
                kind: item.kind,
                apr: item.apr,
            })
            .collect()
    });

    let mut snapshot = RawPoolSnapshot::new(address, chain)
        .with_version(
            pool.version
                .and_then(ApiVersion::from_number)
                .unwrap_or(ApiVersion::V3),
        )
        .with_pool_type(pool.pool_type.as_deref().map(PoolType::from_tag).unwrap_or_default());
    snapshot.id = pool.id;
    snapshot.name = pool.name;
    snapshot.is_core_pool = pool.is_core_pool;
    snapshot.swap_fee = pool.swap_fee;
    snapshot.tvl = data.total_liquidity;
    snapshot.volume_24h = data.volume_24h;
    snapshot.fees_24h = data.fees_24h;
    snapshot.boosted_apr = items.as_deref().and_then(boosted_component);
    snapshot.surge_fee_pct = data.surge_fee_percentage;
    snapshot.rebalance_count = data.rebalance_count.and_then(|c| u32::try_from(c).ok());
    snapshot.token_weights = token_weights(pool.pool_tokens);
    snapshot.apr_candidates = AprCandidates {
        direct_total: data.total_apr,
        items,
        pool_field: data.apr,
        root_field: pool.root_pool.and_then(|root| root.apr),
    };
    snapshot
}

fn from_v2(address: &str, chain: &str, pool: V2Pool) -> RawPoolSnapshot {
    let mut snapshot = RawPoolSnapshot::new(address, chain)
        .with_version(ApiVersion::V2)
        .with_pool_type(PoolType::from_tag(&pool.pool_type));
    snapshot.id = pool.id;
    snapshot.name = pool.name;
    snapshot.swap_fee = pool.swap_fee;
    snapshot.tvl = pool.total_liquidity;
    snapshot.token_weights = token_weights(pool.tokens);
    snapshot
}

fn document_address(document: &PoolDocument) -> Option<&str> {
    match document {
        PoolDocument::V3(pool) => pool.address.as_deref(),
        PoolDocument::V2(pool) => pool.address.as_deref(),
    }
}

/// Normalizes a payload into current and historical snapshots.
///
/// Without a usable series the current snapshot is marked
/// [`DataCompleteness::Estimated`] and no historical snapshot is produced.
///
/// # Errors
///
/// Returns [`DataError::MalformedPayload`] when the payload describes a
/// different pool than the one requested.
pub fn normalize(
    address: &str,
    payload: PoolPayload,
    options: &NormalizeOptions,
) -> Result<NormalizedPool, DataError> {
    if let Some(found) = document_address(&payload.pool)
        && !found.eq_ignore_ascii_case(address)
    {
        return Err(DataError::MalformedPayload {
            address: address.to_string(),
            reason: format!("payload describes pool {found}"),
        });
    }

    let chain = payload.chain.unwrap_or_else(|| options.default_chain.clone());
    let to_snapshot = |document: PoolDocument| match document {
        PoolDocument::V3(pool) => from_v3(address, &chain, pool),
        PoolDocument::V2(pool) => from_v2(address, &chain, pool),
    };
    let mut current = to_snapshot(payload.pool);
    let past_pool = payload.historical_pool.map(to_snapshot);

    let window = payload
        .series
        .as_deref()
        .and_then(|series| reduce_series(series, options.now, options.window_days));
    let Some(window) = window else {
        debug!(pool = %address, "no usable snapshot series, marking estimated");
        current.completeness = DataCompleteness::Estimated;
        return Ok(NormalizedPool {
            current,
            historical: None,
        });
    };

    if current.tvl.is_none() {
        current.tvl = window.latest_tvl;
    }
    current.volume_window = window.volume_window;
    current.fees_window = window.fees_window;
    current.timestamp = Some(window.latest_timestamp);

    let mut historical = RawPoolSnapshot::new(address, &chain)
        .with_pool_type(current.pool_type.clone())
        .with_timestamp(window.historical_timestamp);
    historical.id = current.id.clone();
    historical.name = current.name.clone();
    historical.version = current.version;
    historical.tvl = window.historical_tvl;
    historical.volume_window = window.prior_volume_window;
    historical.fees_window = window.prior_fees_window;
    if let Some(past) = past_pool {
        historical.boosted_apr = past.boosted_apr;
        historical.surge_fee_pct = past.surge_fee_pct;
    }

    Ok(NormalizedPool {
        current,
        historical: Some(historical),
    })
}
