//! Pool-type specific metrics.
//!
//! Each capability has one registered extraction function. An extension only
//! runs when the pool type declares its capability; otherwise its key is left
//! out of the extras map entirely, which renderers read as "omit section".

use crate::config::EngineConfig;
use pool_report_domain::entities::RawPoolSnapshot;
use pool_report_domain::enums::Capability;
use pool_report_domain::metrics::pct_change;
use pool_report_domain::value_objects::percentage::{
    format_apr, format_change_metric, format_share, format_swap_fee_pct,
};
use pool_report_domain::value_objects::{Metric, NOT_AVAILABLE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// A token's share of a weighted pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightShare {
    pub symbol: String,
    /// Weight in percent (80 for 80%).
    pub pct: Decimal,
    pub formatted: String,
}

/// Token weights passed through from upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightsExtra {
    pub weights: Vec<WeightShare>,
    /// Sum of all weights in percent.
    pub total_pct: Decimal,
    /// Whether the sum is within tolerance of 100. Checked, not enforced.
    pub sums_to_hundred: bool,
}

/// A rate tracked against its historical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateExtra {
    pub current: Decimal,
    pub historical: Option<Decimal>,
    pub change: Metric<Decimal>,
    pub formatted: String,
    pub formatted_change: String,
}

/// Rebalance count over the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountExtra {
    pub count: Metric<u32>,
    pub formatted: String,
}

/// Value stored under a capability key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolExtra {
    Weights(WeightsExtra),
    /// Boosted APR as a fraction.
    BoostedApr(RateExtra),
    RebalanceCount(CountExtra),
    /// Surge fee in percent.
    SurgeFee(RateExtra),
}

impl PoolExtra {
    /// Numeric value used when ranking by this extra.
    #[must_use]
    pub fn ranking_value(&self) -> Option<Decimal> {
        match self {
            Self::BoostedApr(rate) | Self::SurgeFee(rate) => Some(rate.current),
            Self::RebalanceCount(count) => count.count.get().map(Decimal::from),
            Self::Weights(_) => None,
        }
    }
}

/// Inputs handed to every extension.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionInput<'a> {
    pub current: &'a RawPoolSnapshot,
    pub historical: Option<&'a RawPoolSnapshot>,
    pub config: &'a EngineConfig,
}

type ExtensionFn = fn(&ExtensionInput<'_>) -> Option<PoolExtra>;

/// Registered extensions, one per capability.
const EXTENSIONS: [(Capability, ExtensionFn); 4] = [
    (Capability::Weights, extract_weights),
    (Capability::BoostedApr, extract_boosted_apr),
    (Capability::RebalanceCount, extract_rebalance_count),
    (Capability::SurgeFee, extract_surge_fee),
];

/// Runs every extension whose capability the pool type declares.
#[must_use]
pub fn extract_extras(input: &ExtensionInput<'_>) -> BTreeMap<Capability, PoolExtra> {
    let pool_type = &input.current.pool_type;
    EXTENSIONS
        .iter()
        .filter(|(capability, _)| pool_type.has_capability(*capability))
        .filter_map(|(capability, extract)| extract(input).map(|extra| (*capability, extra)))
        .collect()
}

fn extract_weights(input: &ExtensionInput<'_>) -> Option<PoolExtra> {
    let weights = input.current.token_weights.as_ref()?;
    if weights.is_empty() {
        return None;
    }

    let shares: Option<Vec<WeightShare>> = weights
        .iter()
        .map(|w| {
            let pct = w.weight.checked_mul(Decimal::ONE_HUNDRED)?;
            Some(WeightShare {
                symbol: w.symbol.clone(),
                pct,
                formatted: format_share(pct),
            })
        })
        .collect();
    let total_pct = shares.as_ref().and_then(|shares| {
        shares
            .iter()
            .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.pct))
    });
    let (Some(shares), Some(total_pct)) = (shares, total_pct) else {
        warn!(pool = %input.current.address, "token weights out of range, skipping");
        return None;
    };
    let sums_to_hundred = (total_pct - Decimal::ONE_HUNDRED).abs() <= input.config.weight_tolerance;
    if !sums_to_hundred {
        warn!(
            pool = %input.current.address,
            %total_pct,
            "token weights do not sum to 100%"
        );
    }

    Some(PoolExtra::Weights(WeightsExtra {
        weights: shares,
        total_pct,
        sums_to_hundred,
    }))
}

fn rate_extra(
    current: Decimal,
    historical: Option<Decimal>,
    format: fn(Decimal) -> String,
) -> RateExtra {
    let change = historical.map_or(Metric::MISSING, |hist| pct_change(current, hist));
    RateExtra {
        current,
        historical,
        formatted: format(current),
        formatted_change: format_change_metric(&change),
        change,
    }
}

fn extract_boosted_apr(input: &ExtensionInput<'_>) -> Option<PoolExtra> {
    let current = input.current.boosted_apr?;
    let historical = input.historical.and_then(|h| h.boosted_apr);
    Some(PoolExtra::BoostedApr(rate_extra(current, historical, format_apr)))
}

fn extract_rebalance_count(input: &ExtensionInput<'_>) -> Option<PoolExtra> {
    let count = Metric::from_option(input.current.rebalance_count);
    let formatted = count
        .get()
        .map_or_else(|| NOT_AVAILABLE.to_string(), |c| c.to_string());
    Some(PoolExtra::RebalanceCount(CountExtra { count, formatted }))
}

fn extract_surge_fee(input: &ExtensionInput<'_>) -> Option<PoolExtra> {
    let current = input.current.surge_fee_pct?;
    let historical = input.historical.and_then(|h| h.surge_fee_pct);
    Some(PoolExtra::SurgeFee(rate_extra(
        current,
        historical,
        format_swap_fee_pct,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_report_domain::entities::TokenWeight;
    use pool_report_domain::enums::PoolType;
    use rust_decimal_macros::dec;

    fn extras_for(
        current: &RawPoolSnapshot,
        historical: Option<&RawPoolSnapshot>,
    ) -> BTreeMap<Capability, PoolExtra> {
        let config = EngineConfig::default();
        extract_extras(&ExtensionInput {
            current,
            historical,
            config: &config,
        })
    }

    #[test]
    fn test_weights_for_weighted_pool() {
        let snap = RawPoolSnapshot::new("0xw", "MAINNET")
            .with_pool_type(PoolType::Weighted)
            .with_token_weights(vec![
                TokenWeight::new("BAL", dec!(0.8)),
                TokenWeight::new("WETH", dec!(0.2)),
            ]);
        let extras = extras_for(&snap, None);

        let Some(PoolExtra::Weights(weights)) = extras.get(&Capability::Weights) else {
            panic!("weights extra missing");
        };
        assert_eq!(weights.weights[0].formatted, "80.0%");
        assert_eq!(weights.total_pct, dec!(100));
        assert!(weights.sums_to_hundred);
        assert_eq!(extras.len(), 1);
    }

    #[test]
    fn test_weights_rounding_is_not_enforced() {
        let snap = RawPoolSnapshot::new("0xw", "MAINNET")
            .with_pool_type(PoolType::Weighted)
            .with_token_weights(vec![
                TokenWeight::new("A", dec!(0.333)),
                TokenWeight::new("B", dec!(0.333)),
                TokenWeight::new("C", dec!(0.333)),
            ]);
        let extras = extras_for(&snap, None);
        let Some(PoolExtra::Weights(weights)) = extras.get(&Capability::Weights) else {
            panic!("weights extra missing");
        };
        assert_eq!(weights.total_pct, dec!(99.9));
        assert!(weights.sums_to_hundred);
        assert_eq!(weights.weights.len(), 3);
    }

    #[test]
    fn test_weights_out_of_range_are_skipped() {
        let snap = RawPoolSnapshot::new("0xw", "MAINNET")
            .with_pool_type(PoolType::Weighted)
            .with_token_weights(vec![
                TokenWeight::new("A", dec!(50000000000000000000000000000)),
                TokenWeight::new("B", dec!(0.2)),
            ]);
        assert!(extras_for(&snap, None).is_empty());
    }

    #[test]
    fn test_undeclared_capability_is_absent() {
        // Weights present on a stable pool are ignored.
        let snap = RawPoolSnapshot::new("0xs", "MAINNET")
            .with_pool_type(PoolType::Stable)
            .with_token_weights(vec![TokenWeight::new("USDC", dec!(0.5))])
            .with_boosted_apr(dec!(0.04));
        assert!(extras_for(&snap, None).is_empty());
    }

    #[test]
    fn test_unknown_pool_type_has_no_extras() {
        let snap = RawPoolSnapshot::new("0xo", "MAINNET")
            .with_pool_type(PoolType::from_tag("FX"))
            .with_rebalance_count(4);
        assert!(extras_for(&snap, None).is_empty());
    }

    #[test]
    fn test_boosted_apr_with_history() {
        let current = RawPoolSnapshot::new("0xb", "MAINNET")
            .with_pool_type(PoolType::Boosted)
            .with_boosted_apr(dec!(0.05));
        let historical = current.clone().with_boosted_apr(dec!(0.04));
        let extras = extras_for(&current, Some(&historical));

        let Some(PoolExtra::BoostedApr(rate)) = extras.get(&Capability::BoostedApr) else {
            panic!("boosted extra missing");
        };
        assert_eq!(rate.formatted, "5.00%");
        assert_eq!(rate.change, Metric::Value(dec!(25)));
        assert_eq!(rate.formatted_change, "+25.00%");
        assert_eq!(extras[&Capability::BoostedApr].ranking_value(), Some(dec!(0.05)));
    }

    #[test]
    fn test_rebalance_count_not_available() {
        let snap = RawPoolSnapshot::new("0xg", "MAINNET").with_pool_type(PoolType::GyroE);
        let extras = extras_for(&snap, None);
        let Some(PoolExtra::RebalanceCount(count)) = extras.get(&Capability::RebalanceCount)
        else {
            panic!("rebalance extra missing");
        };
        assert_eq!(count.formatted, "N/A");
        assert!(!count.count.is_available());
        assert_eq!(extras[&Capability::RebalanceCount].ranking_value(), None);
    }

    #[test]
    fn test_surge_fee() {
        let snap = RawPoolSnapshot::new("0xs", "MAINNET")
            .with_pool_type(PoolType::StableSurge)
            .with_surge_fee_pct(dec!(0.2500));
        let extras = extras_for(&snap, None);
        let Some(PoolExtra::SurgeFee(rate)) = extras.get(&Capability::SurgeFee) else {
            panic!("surge extra missing");
        };
        assert_eq!(rate.formatted, "0.25%");
        assert_eq!(rate.formatted_change, "N/A");
    }
}
