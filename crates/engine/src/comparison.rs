//! Current-vs-historical pool comparison.
//!
//! Produces one immutable [`ComparisonResult`] per pool from a current
//! snapshot and, when available, the snapshot one window earlier.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::extensions::{ExtensionInput, PoolExtra, extract_extras};
use pool_report_domain::entities::RawPoolSnapshot;
use pool_report_domain::enums::{
    ApiVersion, Capability, DataCompleteness, PoolType, RankingMetric,
};
use pool_report_domain::metrics::fees::extrapolate_daily;
use pool_report_domain::metrics::{AprContext, AprResolution, Change, compare_values, resolve_apr};
use pool_report_domain::value_objects::percentage::{
    format_apr_metric, format_change_metric, format_swap_fee,
};
use pool_report_domain::value_objects::NOT_AVAILABLE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Display strings for every percentage field.
///
/// Renderers use these verbatim and never re-derive percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedMetrics {
    pub tvl_change: String,
    pub volume_change: String,
    pub fees_change: String,
    pub apr: String,
    pub swap_fee: String,
}

/// Comparison of one pool over the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub address: String,
    pub chain: String,
    pub name: String,
    pub version: Option<ApiVersion>,
    pub pool_type: PoolType,
    pub pool_url: Option<String>,
    pub is_core_pool: bool,
    /// Swap fee as a fraction.
    pub swap_fee: Option<Decimal>,
    pub apr: AprResolution,
    pub tvl: Change,
    /// Window volume against the prior window.
    pub volume: Change,
    /// Window fees against the prior window.
    pub fees: Change,
    /// Pool-type specific metrics keyed by capability.
    pub extras: BTreeMap<Capability, PoolExtra>,
    /// Set when any figure was extrapolated or no full history was available.
    pub estimated: bool,
    pub window_days: u32,
    pub formatted: FormattedMetrics,
}

impl ComparisonResult {
    /// Value used to rank this pool by `metric`, if it has one.
    #[must_use]
    pub fn ranking_value(&self, metric: RankingMetric) -> Option<Decimal> {
        match metric {
            RankingMetric::Volume => self.volume.current,
            RankingMetric::Fees => self.fees.current,
            RankingMetric::Tvl => self.tvl.current,
            RankingMetric::TvlGrowth => self.tvl.pct_change.get(),
            RankingMetric::SwapFee => self.swap_fee,
            RankingMetric::Apr => self.apr.apr.get(),
            RankingMetric::RebalanceCount => self.extra_value(Capability::RebalanceCount),
            RankingMetric::BoostedApr => self.extra_value(Capability::BoostedApr),
        }
    }

    fn extra_value(&self, capability: Capability) -> Option<Decimal> {
        self.extras.get(&capability).and_then(PoolExtra::ranking_value)
    }
}

/// Window total resolved from either the window field or a 24h figure.
struct WindowValue {
    value: Option<Decimal>,
    extrapolated: bool,
}

fn window_value(window: Option<Decimal>, daily: Option<Decimal>, days: u32) -> WindowValue {
    if let Some(value) = window {
        return WindowValue {
            value: Some(value),
            extrapolated: false,
        };
    }
    let value = daily.and_then(|d| extrapolate_daily(d, days).ok());
    WindowValue {
        extrapolated: value.is_some(),
        value,
    }
}

/// Checks the minimum data a pool needs to appear in a report: TVL plus at
/// least one APR candidate, fee figure or volume figure.
fn validate(current: &RawPoolSnapshot) -> Result<(), EngineError> {
    if current.tvl.is_none() {
        return Err(EngineError::InsufficientData {
            address: current.address.clone(),
            reason: "missing TVL".to_string(),
        });
    }
    if !current.has_yield_data() && current.volume_window.is_none() && current.volume_24h.is_none()
    {
        return Err(EngineError::InsufficientData {
            address: current.address.clone(),
            reason: "no APR, fee or volume data".to_string(),
        });
    }
    Ok(())
}

/// Balancer share URL for a pool.
#[must_use]
pub fn pool_url(snapshot: &RawPoolSnapshot) -> Option<String> {
    let version = snapshot.version?;
    let blockchain = match snapshot.chain.to_ascii_uppercase().as_str() {
        "MAINNET" => "ethereum".to_string(),
        other => other.to_ascii_lowercase(),
    };
    let id = snapshot.id.as_deref().unwrap_or(&snapshot.address);
    Some(format!(
        "https://balancer.fi/pools/{blockchain}/{}/{id}",
        version.as_path()
    ))
}

/// Compares a current snapshot against the snapshot one window earlier.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientData`] when the current snapshot lacks
/// TVL or carries no metric at all.
pub fn compare_snapshots(
    current: &RawPoolSnapshot,
    historical: Option<&RawPoolSnapshot>,
    config: &EngineConfig,
) -> Result<ComparisonResult, EngineError> {
    validate(current)?;
    let days = config.window_days;

    // Without a complete baseline only current values can be shown.
    let baseline_complete = current.completeness.is_complete()
        && historical.is_some_and(|h| h.completeness.is_complete());
    let baseline = if baseline_complete {
        DataCompleteness::Complete
    } else {
        DataCompleteness::Estimated
    };

    let volume = window_value(current.volume_window, current.volume_24h, days);
    let fees = window_value(current.fees_window, current.fees_24h, days);
    let completeness_for = |extrapolated: bool| {
        if extrapolated {
            DataCompleteness::Estimated
        } else {
            baseline
        }
    };

    let tvl_change = compare_values(current.tvl, historical.and_then(|h| h.tvl), baseline);
    let volume_change = compare_values(
        volume.value,
        historical.and_then(|h| h.volume_window),
        completeness_for(volume.extrapolated),
    );
    let fees_change = compare_values(
        fees.value,
        historical.and_then(|h| h.fees_window),
        completeness_for(fees.extrapolated),
    );

    let apr = resolve_apr(&AprContext::new(current, days).with_window_fees(fees.value));
    let extras = extract_extras(&ExtensionInput {
        current,
        historical,
        config,
    });

    let estimated = !baseline_complete || volume.extrapolated || fees.extrapolated;
    if estimated {
        debug!(pool = %current.address, "comparison uses estimated data");
    }

    let formatted = FormattedMetrics {
        tvl_change: format_change_metric(&tvl_change.pct_change),
        volume_change: format_change_metric(&volume_change.pct_change),
        fees_change: format_change_metric(&fees_change.pct_change),
        apr: format_apr_metric(&apr.apr),
        swap_fee: current
            .swap_fee
            .map_or_else(|| NOT_AVAILABLE.to_string(), format_swap_fee),
    };

    Ok(ComparisonResult {
        address: current.address.clone(),
        chain: current.chain.clone(),
        name: current.display_name().to_string(),
        version: current.version,
        pool_type: current.pool_type.clone(),
        pool_url: pool_url(current),
        is_core_pool: current.is_core_pool,
        swap_fee: current.swap_fee,
        apr,
        tvl: tvl_change,
        volume: volume_change,
        fees: fees_change,
        extras,
        estimated,
        window_days: days,
        formatted,
    })
}
