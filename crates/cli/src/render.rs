//! Terminal rendering.
//!
//! Percentages come pre-formatted from the engine and are printed as-is;
//! only currency and counts are formatted here.

use pool_report_domain::enums::RankingMetric;
use pool_report_domain::value_objects::{Metric, NOT_AVAILABLE};
use pool_report_engine::comparison::ComparisonResult;
use pool_report_engine::extensions::PoolExtra;
use pool_report_engine::portfolio::{PortfolioReport, RankedPool, Ranking};
use prettytable::{Table, format, row};
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a USD amount as `$1,234.56`.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    let text = format!("{rounded:.2}");
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

fn usd_or_na(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| NOT_AVAILABLE.to_string(), format_usd)
}

fn metric_usd_or_na(amount: &Metric<Decimal>) -> String {
    usd_or_na(amount.get())
}

/// Value cell of a ranking row: currency is formatted here, everything else
/// is printed as the engine formatted it.
pub fn ranking_value_cell(metric: RankingMetric, entry: &RankedPool) -> String {
    if metric.is_currency() {
        format_usd(entry.value)
    } else {
        entry.formatted_value.clone()
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table
}

/// Core metrics of one pool.
pub fn pool_table(result: &ComparisonResult) -> Table {
    let mut table = new_table();
    let days = result.window_days;
    table.set_titles(row!["Metric", "Current", "Previous", "Change"]);
    table.add_row(row![
        "TVL",
        usd_or_na(result.tvl.current),
        usd_or_na(result.tvl.historical),
        result.formatted.tvl_change
    ]);
    table.add_row(row![
        format!("Volume ({days}d)"),
        usd_or_na(result.volume.current),
        usd_or_na(result.volume.historical),
        result.formatted.volume_change
    ]);
    table.add_row(row![
        format!("Fees ({days}d)"),
        usd_or_na(result.fees.current),
        usd_or_na(result.fees.historical),
        result.formatted.fees_change
    ]);

    let apr_note = if result.apr.is_estimate() {
        " (estimated)"
    } else {
        ""
    };
    table.add_row(row![
        "APR",
        format!("{}{apr_note}", result.formatted.apr),
        "",
        ""
    ]);
    table.add_row(row!["Swap fee", result.formatted.swap_fee, "", ""]);
    table
}

/// Pool-type specific sections, one row per extra.
pub fn extras_table(result: &ComparisonResult) -> Option<Table> {
    if result.extras.is_empty() {
        return None;
    }
    let mut table = new_table();
    table.set_titles(row!["Extra", "Value", "Change"]);
    for extra in result.extras.values() {
        match extra {
            PoolExtra::Weights(weights) => {
                let parts: Vec<String> = weights
                    .weights
                    .iter()
                    .map(|w| format!("{} {}", w.symbol, w.formatted))
                    .collect();
                let note = if weights.sums_to_hundred {
                    ""
                } else {
                    " (does not sum to 100%)"
                };
                table.add_row(row!["Token weights", format!("{}{note}", parts.join(" / ")), ""]);
            }
            PoolExtra::BoostedApr(rate) => {
                table.add_row(row!["Boosted APR", rate.formatted, rate.formatted_change]);
            }
            PoolExtra::RebalanceCount(count) => {
                table.add_row(row![format!("Rebalances ({}d)", result.window_days), count.formatted, ""]);
            }
            PoolExtra::SurgeFee(rate) => {
                table.add_row(row!["Surge fee", rate.formatted, rate.formatted_change]);
            }
        }
    }
    Some(table)
}

/// Overview of every resolved pool in a comparison.
pub fn overview_table(report: &PortfolioReport) -> Table {
    let mut table = new_table();
    table.set_titles(row!["Pool", "Type", "TVL", "TVL change", "Volume", "Fees", "APR"]);
    for result in &report.results {
        table.add_row(row![
            result.name,
            result.pool_type,
            usd_or_na(result.tvl.current),
            result.formatted.tvl_change,
            usd_or_na(result.volume.current),
            usd_or_na(result.fees.current),
            result.formatted.apr
        ]);
    }
    table
}

/// Top pools for one ranking.
pub fn ranking_table(ranking: &Ranking) -> Table {
    let mut table = new_table();
    table.set_titles(row!["#", "Pool", "Value", "Share"]);
    for entry in &ranking.entries {
        table.add_row(row![
            entry.rank,
            entry.name,
            ranking_value_cell(ranking.metric, entry),
            entry.formatted_share
        ]);
    }
    table
}

pub fn print_pool(result: &ComparisonResult) {
    println!("{} [{}]", result.name, result.pool_type);
    if let Some(url) = &result.pool_url {
        println!("{url}");
    }
    pool_table(result).printstd();
    if let Some(extras) = extras_table(result) {
        extras.printstd();
    }
    if result.estimated {
        println!("Some figures are estimated: no complete history for this window.");
    }
}

pub fn print_portfolio(report: &PortfolioReport) {
    overview_table(report).printstd();

    let aggregate = &report.aggregate;
    println!("Total TVL:    {}", metric_usd_or_na(&aggregate.total_tvl));
    println!("Total fees:   {}", metric_usd_or_na(&aggregate.total_fees));
    println!("Weighted APR: {}", aggregate.formatted_weighted_apr);

    for ranking in &aggregate.rankings {
        println!();
        println!("Top pools by {}", ranking.metric);
        if ranking.entries.is_empty() {
            println!("  no pool reports this metric");
        } else {
            ranking_table(ranking).printstd();
        }
    }

    if !report.dropped_metrics.is_empty() {
        println!();
        println!("Ignored ranking metrics: {}", report.dropped_metrics.join(", "));
    }
    if !report.failures.is_empty() {
        println!();
        println!("Excluded pools:");
        for failure in &report.failures {
            println!("  {}: {}", failure.address, failure.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_report_domain::entities::RawPoolSnapshot;
    use pool_report_domain::enums::PoolType;
    use pool_report_engine::config::EngineConfig;
    use pool_report_engine::portfolio::rank_pools;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_usd(dec!(1000000)), "$1,000,000.00");
        assert_eq!(format_usd(dec!(999.995)), "$1,000.00");
        assert_eq!(format_usd(dec!(12)), "$12.00");
        assert_eq!(format_usd(dec!(-4321.1)), "-$4,321.10");
        assert_eq!(format_usd(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_ranking_value_cell() {
        let snapshot = RawPoolSnapshot::new("0xpool", "MAINNET")
            .with_tvl(dec!(1000))
            .with_volume_window(dec!(1500))
            .with_apr(dec!(0.05));
        let results = vec![
            pool_report_engine::comparison::compare_snapshots(&snapshot, None, &EngineConfig::default())
                .unwrap(),
        ];

        let volume = rank_pools(&results, RankingMetric::Volume, 3);
        assert_eq!(ranking_value_cell(volume.metric, &volume.entries[0]), "$1,500.00");
        let apr = rank_pools(&results, RankingMetric::Apr, 3);
        assert_eq!(ranking_value_cell(apr.metric, &apr.entries[0]), "5.00%");
    }

    #[test]
    fn test_pool_tables() {
        let snapshot = RawPoolSnapshot::new("0xpool", "MAINNET")
            .with_pool_type(PoolType::GyroE)
            .with_tvl(dec!(1000))
            .with_fees_window(dec!(1));
        let result =
            pool_report_engine::comparison::compare_snapshots(&snapshot, None, &EngineConfig::default())
                .unwrap();
        assert_eq!(pool_table(&result).len(), 5);
        assert_eq!(extras_table(&result).map(|t| t.len()), Some(1));
    }
}
