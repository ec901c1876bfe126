use crate::error::MetricsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream API generation that served a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiVersion {
    V2,
    V3,
}

impl ApiVersion {
    /// Maps the numeric `version` field reported by upstream.
    #[must_use]
    pub fn from_number(version: u64) -> Option<Self> {
        match version {
            2 => Some(Self::V2),
            3 => Some(Self::V3),
            _ => None,
        }
    }

    /// Path segment used in pool share URLs.
    #[must_use]
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }
}

/// Optional metric families a pool type can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Configurable token weights.
    Weights,
    /// Yield from yield-bearing wrapped tokens.
    BoostedApr,
    /// Number of rebalances over the window.
    RebalanceCount,
    /// Dynamic surge fee.
    SurgeFee,
}

impl Capability {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weights => "weights",
            Self::BoostedApr => "boosted_apr",
            Self::RebalanceCount => "rebalance_count",
            Self::SurgeFee => "surge_fee",
        }
    }
}

/// Pool type resolved from the free-form upstream tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    Weighted,
    Stable,
    Boosted,
    GyroE,
    StableSurge,
    ReClamm,
    LiquidityBootstrapping,
    /// Unrecognized tag, kept verbatim.
    Other(String),
}

impl PoolType {
    /// Resolves an upstream `type`/`poolType` tag.
    ///
    /// Matching is case-insensitive and checks the more specific markers
    /// first, so `STABLE_SURGE` resolves to [`PoolType::StableSurge`] rather
    /// than [`PoolType::Stable`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let upper = tag.trim().to_ascii_uppercase();
        if upper.contains("SURGE") {
            Self::StableSurge
        } else if upper.contains("BOOSTED") {
            Self::Boosted
        } else if upper.contains("GYRO") {
            Self::GyroE
        } else if upper.contains("RECLAMM") || upper.contains("LVR") {
            Self::ReClamm
        } else if upper.contains("LBP") || upper.contains("LIQUIDITY_BOOTSTRAPPING") {
            Self::LiquidityBootstrapping
        } else if upper.contains("WEIGHTED") {
            Self::Weighted
        } else if upper.contains("STABLE") {
            Self::Stable
        } else {
            Self::Other(tag.trim().to_string())
        }
    }

    /// Capabilities declared by this pool type.
    #[must_use]
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Weighted | Self::LiquidityBootstrapping => &[Capability::Weights],
            Self::Boosted => &[Capability::BoostedApr],
            Self::GyroE | Self::ReClamm => &[Capability::RebalanceCount],
            Self::StableSurge => &[Capability::SurgeFee],
            Self::Stable | Self::Other(_) => &[],
        }
    }

    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl Default for PoolType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weighted => write!(f, "Weighted"),
            Self::Stable => write!(f, "Stable"),
            Self::Boosted => write!(f, "Boosted"),
            Self::GyroE => write!(f, "GyroE"),
            Self::StableSurge => write!(f, "StableSurge"),
            Self::ReClamm => write!(f, "ReClamm"),
            Self::LiquidityBootstrapping => write!(f, "LBP"),
            Self::Other(tag) if tag.is_empty() => write!(f, "Unknown"),
            Self::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// Whether a snapshot came from a full historical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCompleteness {
    #[default]
    Complete,
    /// Window figures were extrapolated from 24h data.
    Estimated,
}

impl DataCompleteness {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Source that produced a resolved APR, in resolution priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AprSource {
    /// Total APR reported directly by the V3 API.
    DirectTotal,
    /// Sum of the APR components list.
    ItemsSum,
    /// Flat `apr` field on the pool object.
    PoolField,
    /// `apr` field on the root/parent pool object.
    RootField,
    /// Annualized from window fees and TVL.
    FeeEstimate,
}

impl AprSource {
    /// Fee-based values are estimates, everything else is authoritative.
    #[must_use]
    pub fn is_estimate(&self) -> bool {
        matches!(self, Self::FeeEstimate)
    }
}

/// Metrics pools can be ranked by in multi-pool reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    Volume,
    TvlGrowth,
    SwapFee,
    RebalanceCount,
    BoostedApr,
    Fees,
    Tvl,
    Apr,
}

impl RankingMetric {
    pub const ALL: [RankingMetric; 8] = [
        Self::Volume,
        Self::TvlGrowth,
        Self::SwapFee,
        Self::RebalanceCount,
        Self::BoostedApr,
        Self::Fees,
        Self::Tvl,
        Self::Apr,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::TvlGrowth => "tvl_growth",
            Self::SwapFee => "swap_fee",
            Self::RebalanceCount => "rebalance_count",
            Self::BoostedApr => "boosted_apr",
            Self::Fees => "fees",
            Self::Tvl => "tvl",
            Self::Apr => "apr",
        }
    }

    /// USD amounts, which renderers format themselves.
    #[must_use]
    pub fn is_currency(&self) -> bool {
        matches!(self, Self::Volume | Self::Fees | Self::Tvl)
    }
}

impl FromStr for RankingMetric {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| MetricsError::UnknownRankingMetric(s.to_string()))
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
