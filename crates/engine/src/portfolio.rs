//! Multi-pool rankings and portfolio aggregates.
//!
//! One pool failing never fails the request: it is excluded from rankings
//! and aggregates and reported as a failure entry. Unknown ranking names are
//! dropped the same way.

use crate::comparison::ComparisonResult;
use crate::config::EngineConfig;
use crate::error::EngineError;
use pool_report_domain::enums::RankingMetric;
use pool_report_domain::value_objects::percentage::{
    format_apr, format_apr_metric, format_change, format_share, format_swap_fee,
};
use pool_report_domain::value_objects::{Metric, NOT_AVAILABLE, Unavailable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A pool that could not be included in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolFailure {
    pub address: String,
    pub reason: String,
}

/// Per-pool outcome fed into portfolio aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolOutcome {
    Resolved(Box<ComparisonResult>),
    Failed(PoolFailure),
}

/// One entry of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPool {
    /// 1-based position.
    pub rank: usize,
    pub address: String,
    pub name: String,
    pub pool_url: Option<String>,
    pub value: Decimal,
    /// Display string for `value`. Currency metrics carry the plain amount
    /// and are formatted by the renderer.
    pub formatted_value: String,
    /// Percentage of the metric's sum across all pools that have it.
    pub share_of_total: Metric<Decimal>,
    pub formatted_share: String,
}

/// Top pools for a single metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub metric: RankingMetric,
    pub entries: Vec<RankedPool>,
    /// Sum of the metric across every pool that has it.
    pub total: Metric<Decimal>,
}

/// Portfolio-level figures for a multi-pool request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioAggregate {
    pub total_fees: Metric<Decimal>,
    pub total_tvl: Metric<Decimal>,
    /// `sum(apr * tvl) / sum(tvl)` over pools with both values.
    pub weighted_apr: Metric<Decimal>,
    pub formatted_weighted_apr: String,
    /// Rankings in request order.
    pub rankings: Vec<Ranking>,
}

/// Everything a multi-pool report needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub results: Vec<ComparisonResult>,
    pub failures: Vec<PoolFailure>,
    pub aggregate: PortfolioAggregate,
    /// Requested ranking names that were not recognized.
    pub dropped_metrics: Vec<String>,
}

/// Splits requested names into known metrics and dropped names.
///
/// Duplicates are kept once, in first-seen order.
pub fn parse_ranking_metrics<S: AsRef<str>>(names: &[S]) -> (Vec<RankingMetric>, Vec<String>) {
    let mut metrics = Vec::new();
    let mut dropped = Vec::new();
    for name in names {
        match name.as_ref().parse::<RankingMetric>() {
            Ok(metric) if !metrics.contains(&metric) => metrics.push(metric),
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "dropping ranking metric");
                dropped.push(name.as_ref().to_string());
            }
        }
    }
    (metrics, dropped)
}

/// Ranks pools by `metric`, descending, ties broken by address.
///
/// Pools without the metric are left out rather than ranked last.
#[must_use]
pub fn rank_pools(results: &[ComparisonResult], metric: RankingMetric, top_n: usize) -> Ranking {
    let mut candidates: Vec<(&ComparisonResult, Decimal)> = results
        .iter()
        .filter_map(|r| r.ranking_value(metric).map(|v| (r, v)))
        .collect();
    candidates.sort_by(|(a, av), (b, bv)| bv.cmp(av).then_with(|| a.address.cmp(&b.address)));

    let total = checked_sum(candidates.iter().map(|(_, v)| *v));
    let entries = candidates
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, (result, value))| {
            let share_of_total = share(value, total);
            RankedPool {
                rank: idx + 1,
                address: result.address.clone(),
                name: result.name.clone(),
                pool_url: result.pool_url.clone(),
                value,
                formatted_value: format_ranking_value(metric, value),
                formatted_share: share_of_total
                    .get()
                    .map_or_else(|| NOT_AVAILABLE.to_string(), format_share),
                share_of_total,
            }
        })
        .collect();

    Ranking {
        metric,
        entries,
        total,
    }
}

/// Display string for a ranked value.
#[must_use]
pub fn format_ranking_value(metric: RankingMetric, value: Decimal) -> String {
    match metric {
        RankingMetric::TvlGrowth => format_change(value),
        RankingMetric::SwapFee => format_swap_fee(value),
        RankingMetric::Apr | RankingMetric::BoostedApr => format_apr(value),
        RankingMetric::RebalanceCount
        | RankingMetric::Volume
        | RankingMetric::Fees
        | RankingMetric::Tvl => value.normalize().to_string(),
    }
}

/// Sums values, or "N/A" when the sum does not fit a `Decimal`.
fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Metric<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .map_or(Metric::NotAvailable(Unavailable::UndefinedRatio), Metric::Value)
}

fn share(value: Decimal, total: Metric<Decimal>) -> Metric<Decimal> {
    let Some(total) = total.get() else {
        return Metric::NotAvailable(Unavailable::UndefinedRatio);
    };
    if total <= Decimal::ZERO {
        return Metric::NotAvailable(Unavailable::UndefinedRatio);
    }
    value
        .checked_div(total)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Metric::NotAvailable(Unavailable::UndefinedRatio), Metric::Value)
}

/// TVL-weighted average APR.
///
/// Pools lacking either APR or TVL are excluded from both the numerator and
/// the denominator, never counted as zero.
#[must_use]
pub fn weighted_average_apr(results: &[ComparisonResult]) -> Metric<Decimal> {
    let sums = results
        .iter()
        .filter_map(|r| Some((r.apr.apr.get()?, r.tvl.current?)))
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(num, den), (apr, tvl)| {
            let num = apr.checked_mul(tvl).and_then(|w| num.checked_add(w))?;
            Some((num, den.checked_add(tvl)?))
        });
    let Some((weighted, tvl)) = sums else {
        warn!("weighted APR overflowed");
        return Metric::NotAvailable(Unavailable::UndefinedRatio);
    };

    if tvl <= Decimal::ZERO {
        return Metric::NotAvailable(if results.is_empty() {
            Unavailable::MissingData
        } else {
            Unavailable::UndefinedRatio
        });
    }
    weighted
        .checked_div(tvl)
        .map_or(Metric::NotAvailable(Unavailable::UndefinedRatio), Metric::Value)
}

/// Computes totals and rankings over resolved pools.
#[must_use]
pub fn aggregate(
    results: &[ComparisonResult],
    metrics: &[RankingMetric],
    top_n: usize,
) -> PortfolioAggregate {
    let total_fees = checked_sum(results.iter().filter_map(|r| r.fees.current));
    let total_tvl = checked_sum(results.iter().filter_map(|r| r.tvl.current));
    let weighted_apr = weighted_average_apr(results);

    PortfolioAggregate {
        total_fees,
        total_tvl,
        formatted_weighted_apr: format_apr_metric(&weighted_apr),
        weighted_apr,
        rankings: metrics
            .iter()
            .map(|metric| rank_pools(results, *metric, top_n))
            .collect(),
    }
}

/// Builds the multi-pool report.
///
/// When `requested` is empty the configured default rankings are used.
///
/// # Errors
///
/// Returns [`EngineError::NoResolvablePools`] only when every pool failed.
pub fn build_portfolio<S: AsRef<str>>(
    outcomes: Vec<PoolOutcome>,
    requested: &[S],
    config: &EngineConfig,
) -> Result<PortfolioReport, EngineError> {
    let mut results = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            PoolOutcome::Resolved(result) => results.push(*result),
            PoolOutcome::Failed(failure) => {
                warn!(pool = %failure.address, reason = %failure.reason, "excluding pool");
                failures.push(failure);
            }
        }
    }

    if results.is_empty() {
        return Err(EngineError::NoResolvablePools {
            failed: failures.len(),
        });
    }

    let (metrics, dropped_metrics) = if requested.is_empty() {
        (config.default_rankings.clone(), Vec::new())
    } else {
        parse_ranking_metrics(requested)
    };

    let aggregate = aggregate(&results, &metrics, config.top_n);
    info!(
        resolved = results.len(),
        failed = failures.len(),
        rankings = aggregate.rankings.len(),
        "portfolio computed"
    );

    Ok(PortfolioReport {
        results,
        failures,
        aggregate,
        dropped_metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare_snapshots;
    use pool_report_domain::entities::RawPoolSnapshot;
    use pool_report_domain::enums::PoolType;
    use rust_decimal_macros::dec;

    fn resolve(snapshot: RawPoolSnapshot) -> ComparisonResult {
        compare_snapshots(&snapshot, None, &EngineConfig::default()).unwrap()
    }

    fn pool(address: &str, tvl: Decimal) -> RawPoolSnapshot {
        RawPoolSnapshot::new(address, "MAINNET").with_tvl(tvl)
    }

    #[test]
    fn test_weighted_apr_excludes_missing_apr() {
        let results = vec![
            resolve(pool("0xa", dec!(500000)).with_apr(dec!(0.10))),
            resolve(pool("0xb", dec!(500000)).with_volume_window(dec!(1000))),
        ];
        assert_eq!(weighted_average_apr(&results), Metric::Value(dec!(0.10)));
    }

    #[test]
    fn test_weighted_apr_three_pools() {
        let two = vec![
            resolve(pool("0xa", dec!(100)).with_apr(dec!(0.10))),
            resolve(pool("0xb", dec!(300)).with_apr(dec!(0.20))),
        ];
        let mut three = two.clone();
        three.push(resolve(pool("0xc", dec!(1000)).with_volume_window(dec!(5))));

        let expected = weighted_average_apr(&two);
        assert_eq!(expected, Metric::Value(dec!(0.175)));
        assert_eq!(weighted_average_apr(&three), expected);
    }

    #[test]
    fn test_weighted_apr_unavailable() {
        let results = vec![resolve(pool("0xb", dec!(500000)).with_volume_window(dec!(1)))];
        assert_eq!(
            weighted_average_apr(&results),
            Metric::NotAvailable(Unavailable::UndefinedRatio)
        );
        assert_eq!(
            weighted_average_apr(&[]),
            Metric::NotAvailable(Unavailable::MissingData)
        );
    }

    #[test]
    fn test_ranking_excludes_pools_without_metric() {
        let results = vec![
            resolve(
                pool("0xa", dec!(10))
                    .with_pool_type(PoolType::Boosted)
                    .with_boosted_apr(dec!(0.04))
                    .with_volume_window(dec!(1)),
            ),
            resolve(pool("0xb", dec!(10)).with_apr(dec!(0.1))),
            resolve(pool("0xc", dec!(10)).with_pool_type(PoolType::Weighted).with_apr(dec!(0.1))),
            resolve(pool("0xd", dec!(10)).with_pool_type(PoolType::Stable).with_apr(dec!(0.1))),
        ];
        let ranking = rank_pools(&results, RankingMetric::BoostedApr, 3);
        assert_eq!(ranking.entries.len(), 1);
        assert_eq!(ranking.entries[0].address, "0xa");
        assert_eq!(ranking.entries[0].formatted_share, "100.0%");
        assert_eq!(ranking.entries[0].formatted_value, "4.00%");
    }

    #[test]
    fn test_ranking_top_three_with_ties() {
        let results = vec![
            resolve(pool("0xd", dec!(1)).with_volume_window(dec!(100))),
            resolve(pool("0xb", dec!(1)).with_volume_window(dec!(300))),
            resolve(pool("0xc", dec!(1)).with_volume_window(dec!(300))),
            resolve(pool("0xa", dec!(1)).with_volume_window(dec!(50))),
        ];
        let ranking = rank_pools(&results, RankingMetric::Volume, 3);
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.address.as_str()).collect();
        assert_eq!(order, vec!["0xb", "0xc", "0xd"]);
        assert_eq!(ranking.entries[0].rank, 1);
        assert_eq!(ranking.total, Metric::Value(dec!(750)));
        assert_eq!(ranking.entries[0].formatted_value, "300");
        assert_eq!(ranking.entries[0].share_of_total, Metric::Value(dec!(40)));
        assert_eq!(ranking.entries[2].formatted_share, "13.3%");
    }

    #[test]
    fn test_parse_ranking_metrics_drops_unknown() {
        let (metrics, dropped) = parse_ranking_metrics(&["volume", "bogus", "volume", "fees"]);
        assert_eq!(metrics, vec![RankingMetric::Volume, RankingMetric::Fees]);
        assert_eq!(dropped, vec!["bogus".to_string()]);
    }

    #[test]
    fn test_build_portfolio_isolates_failures() {
        let outcomes = vec![
            PoolOutcome::Resolved(Box::new(resolve(
                pool("0xa", dec!(100)).with_fees_window(dec!(10)),
            ))),
            PoolOutcome::Failed(PoolFailure {
                address: "0xdead".to_string(),
                reason: "pool not found".to_string(),
            }),
            PoolOutcome::Resolved(Box::new(resolve(
                pool("0xb", dec!(300)).with_fees_window(dec!(5)),
            ))),
        ];
        let report =
            build_portfolio(outcomes, &["fees", "not_a_metric"], &EngineConfig::default()).unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.dropped_metrics, vec!["not_a_metric".to_string()]);
        assert_eq!(report.aggregate.total_fees, Metric::Value(dec!(15)));
        assert_eq!(report.aggregate.total_tvl, Metric::Value(dec!(400)));
        assert_eq!(report.aggregate.rankings.len(), 1);
        assert_eq!(report.aggregate.rankings[0].entries[0].address, "0xa");
    }

    #[test]
    fn test_build_portfolio_uses_default_rankings() {
        let outcomes = vec![PoolOutcome::Resolved(Box::new(resolve(
            pool("0xa", dec!(100)).with_volume_window(dec!(10)),
        )))];
        let report = build_portfolio::<&str>(outcomes, &[], &EngineConfig::default()).unwrap();
        let metrics: Vec<RankingMetric> =
            report.aggregate.rankings.iter().map(|r| r.metric).collect();
        assert_eq!(metrics, vec![RankingMetric::Volume, RankingMetric::TvlGrowth]);
        // No history, so no TVL growth to rank.
        assert!(report.aggregate.rankings[1].entries.is_empty());
    }

    #[test]
    fn test_build_portfolio_total_failure() {
        let outcomes = vec![PoolOutcome::Failed(PoolFailure {
            address: "0xdead".to_string(),
            reason: "timeout".to_string(),
        })];
        assert_eq!(
            build_portfolio(outcomes, &["volume"], &EngineConfig::default()),
            Err(EngineError::NoResolvablePools { failed: 1 })
        );
    }

    #[test]
    fn test_aggregate_serializes_sentinels() {
        let results = vec![resolve(pool("0xb", dec!(1)).with_volume_window(dec!(1)))];
        let aggregate = aggregate(&results, &[RankingMetric::Volume], 3);
        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["weighted_apr"]["status"], "not_available");
        assert_eq!(json["weighted_apr"]["value"], "undefined_ratio");
        assert_eq!(json["formatted_weighted_apr"], "N/A");
        assert_eq!(json["rankings"][0]["metric"], "volume");
    }

    #[test]
    fn test_ranking_values_are_preformatted() {
        let cur = pool("0xa", dec!(1100)).with_volume_window(dec!(1)).with_swap_fee(dec!(0.003));
        let hist = pool("0xa", dec!(1000));
        let results = vec![compare_snapshots(&cur, Some(&hist), &EngineConfig::default()).unwrap()];

        let growth = rank_pools(&results, RankingMetric::TvlGrowth, 3);
        assert_eq!(growth.entries[0].formatted_value, "+10.00%");
        let fee = rank_pools(&results, RankingMetric::SwapFee, 3);
        assert_eq!(fee.entries[0].formatted_value, "0.3%");
        assert_eq!(format_ranking_value(RankingMetric::RebalanceCount, dec!(4)), "4");
    }

    #[test]
    fn test_huge_values_degrade_to_not_available() {
        let huge = dec!(50000000000000000000000000000);
        let results = vec![
            resolve(
                pool("0xa", huge)
                    .with_volume_window(huge)
                    .with_fees_window(huge)
                    .with_apr(dec!(2)),
            ),
            resolve(
                pool("0xb", huge)
                    .with_volume_window(huge)
                    .with_fees_window(huge)
                    .with_apr(dec!(2)),
            ),
        ];

        assert_eq!(
            weighted_average_apr(&results[..1]),
            Metric::NotAvailable(Unavailable::UndefinedRatio)
        );

        let ranking = rank_pools(&results, RankingMetric::Volume, 3);
        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(ranking.total, Metric::NotAvailable(Unavailable::UndefinedRatio));
        assert_eq!(ranking.entries[0].formatted_share, "N/A");

        let aggregate = aggregate(&results, &[RankingMetric::Fees], 3);
        assert!(!aggregate.total_tvl.is_available());
        assert!(!aggregate.total_fees.is_available());
        assert_eq!(aggregate.formatted_weighted_apr, "N/A");
    }

    #[test]
    fn test_weighted_apr_pair_formats_exactly() {
        let results = vec![
            resolve(pool("0xa", dec!(500000)).with_apr(dec!(0.10))),
            resolve(pool("0xb", dec!(500000)).with_volume_window(dec!(1000))),
        ];
        let aggregate = aggregate(&results, &[], 3);
        assert_eq!(aggregate.formatted_weighted_apr, "10.00%");
    }
}
