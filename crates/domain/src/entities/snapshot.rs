//! Point-in-time pool observations.
//!
//! Upstream data is frequently incomplete, so every metric field is optional.
//! Which optional fields are meaningful depends on the pool type's
//! capabilities; an absent capability-gated field is never an error.

use crate::enums::{ApiVersion, DataCompleteness, PoolType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of the upstream APR components list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AprItem {
    pub id: Option<String>,
    /// Component kind, e.g. `SWAP_FEE` or `IB_YIELD`.
    pub kind: Option<String>,
    /// `None` when upstream sent a non-numeric value.
    pub apr: Option<Decimal>,
}

impl AprItem {
    #[must_use]
    pub fn new(kind: impl Into<String>, apr: Option<Decimal>) -> Self {
        Self {
            id: None,
            kind: Some(kind.into()),
            apr,
        }
    }
}

/// Every place upstream may report an APR, as fractions (0.05 = 5%).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AprCandidates {
    /// Direct total APR (V3 API).
    pub direct_total: Option<Decimal>,
    /// APR components list.
    pub items: Option<Vec<AprItem>>,
    /// Bare `apr` field on the pool object.
    pub pool_field: Option<Decimal>,
    /// `apr` field on a root/parent pool object.
    pub root_field: Option<Decimal>,
}

impl AprCandidates {
    /// True when no candidate field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.direct_total.is_none()
            && self.items.as_ref().is_none_or(|items| items.is_empty())
            && self.pool_field.is_none()
            && self.root_field.is_none()
    }
}

/// Token allocation in a weighted pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWeight {
    pub symbol: String,
    /// Weight as a fraction (0.8 for an 80/20 pool's major side).
    pub weight: Decimal,
}

impl TokenWeight {
    #[must_use]
    pub fn new(symbol: impl Into<String>, weight: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
        }
    }
}

/// A current or historical observation of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPoolSnapshot {
    /// On-chain pool address.
    pub address: String,
    /// Chain identifier (e.g. `MAINNET`).
    pub chain: String,
    /// Full pool id where it differs from the address (V2 pool ids).
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// API generation that served this snapshot.
    pub version: Option<ApiVersion>,
    /// Resolved pool type.
    pub pool_type: PoolType,
    /// Total value locked in USD.
    pub tvl: Option<Decimal>,
    /// 24h volume in USD.
    pub volume_24h: Option<Decimal>,
    /// Volume over the comparison window in USD.
    pub volume_window: Option<Decimal>,
    /// 24h fees in USD.
    pub fees_24h: Option<Decimal>,
    /// Fees over the comparison window in USD.
    pub fees_window: Option<Decimal>,
    /// Swap fee as a fraction (0.003 = 0.3%).
    pub swap_fee: Option<Decimal>,
    /// APR sources.
    pub apr_candidates: AprCandidates,
    /// Token weights (weighted pools), in upstream token order.
    pub token_weights: Option<Vec<TokenWeight>>,
    /// Yield-bearing component APR as a fraction (boosted pools).
    pub boosted_apr: Option<Decimal>,
    /// Rebalances over the window (Gyro / ReClaMM pools).
    pub rebalance_count: Option<u32>,
    /// Current dynamic fee percentage (surge pools).
    pub surge_fee_pct: Option<Decimal>,
    /// Whether the pool is flagged as a core pool upstream.
    pub is_core_pool: bool,
    /// Full history vs 24h extrapolation.
    pub completeness: DataCompleteness,
    /// Observation time, unix seconds.
    pub timestamp: Option<u64>,
}

impl RawPoolSnapshot {
    /// Creates an empty snapshot for a pool.
    #[must_use]
    pub fn new(address: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            chain: chain.into(),
            id: None,
            name: None,
            version: None,
            pool_type: PoolType::default(),
            tvl: None,
            volume_24h: None,
            volume_window: None,
            fees_24h: None,
            fees_window: None,
            swap_fee: None,
            apr_candidates: AprCandidates::default(),
            token_weights: None,
            boosted_apr: None,
            rebalance_count: None,
            surge_fee_pct: None,
            is_core_pool: false,
            completeness: DataCompleteness::Complete,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn with_pool_type(mut self, pool_type: PoolType) -> Self {
        self.pool_type = pool_type;
        self
    }

    #[must_use]
    pub fn with_tvl(mut self, tvl: Decimal) -> Self {
        self.tvl = Some(tvl);
        self
    }

    #[must_use]
    pub fn with_volume_24h(mut self, volume: Decimal) -> Self {
        self.volume_24h = Some(volume);
        self
    }

    #[must_use]
    pub fn with_volume_window(mut self, volume: Decimal) -> Self {
        self.volume_window = Some(volume);
        self
    }

    #[must_use]
    pub fn with_fees_24h(mut self, fees: Decimal) -> Self {
        self.fees_24h = Some(fees);
        self
    }

    #[must_use]
    pub fn with_fees_window(mut self, fees: Decimal) -> Self {
        self.fees_window = Some(fees);
        self
    }

    #[must_use]
    pub fn with_swap_fee(mut self, fee: Decimal) -> Self {
        self.swap_fee = Some(fee);
        self
    }

    #[must_use]
    pub fn with_apr_candidates(mut self, candidates: AprCandidates) -> Self {
        self.apr_candidates = candidates;
        self
    }

    /// Sets the flat `apr` field on the pool object.
    #[must_use]
    pub fn with_apr(mut self, apr: Decimal) -> Self {
        self.apr_candidates.pool_field = Some(apr);
        self
    }

    #[must_use]
    pub fn with_token_weights(mut self, weights: Vec<TokenWeight>) -> Self {
        self.token_weights = Some(weights);
        self
    }

    #[must_use]
    pub fn with_boosted_apr(mut self, apr: Decimal) -> Self {
        self.boosted_apr = Some(apr);
        self
    }

    #[must_use]
    pub fn with_rebalance_count(mut self, count: u32) -> Self {
        self.rebalance_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_surge_fee_pct(mut self, pct: Decimal) -> Self {
        self.surge_fee_pct = Some(pct);
        self
    }

    #[must_use]
    pub fn with_completeness(mut self, completeness: DataCompleteness) -> Self {
        self.completeness = completeness;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Name to show in reports, falling back to the address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }

    /// True when the snapshot carries at least one APR candidate or fee figure.
    #[must_use]
    pub fn has_yield_data(&self) -> bool {
        !self.apr_candidates.is_empty() || self.fees_window.is_some() || self.fees_24h.is_some()
    }
}
