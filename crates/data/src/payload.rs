//! Upstream payload shapes.
//!
//! Numeric fields arrive as JSON strings or numbers depending on the API.
//! Anything that does not parse is read as absent instead of failing the
//! whole pool.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parses a JSON string or number as a decimal.
#[must_use]
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_decimal_str(s.trim()),
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        _ => None,
    }
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_decimal))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// One fixture document: the pool object plus its optional history.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolPayload {
    /// Chain identifier, e.g. `MAINNET`.
    #[serde(default)]
    pub chain: Option<String>,
    pub pool: PoolDocument,
    /// Cumulative snapshot series, any order.
    #[serde(default)]
    pub series: Option<Vec<SeriesPoint>>,
    /// Pool object as observed at the window start. Carries the rates the
    /// series does not track (boosted APR, surge fee).
    #[serde(default, rename = "historicalPool")]
    pub historical_pool: Option<PoolDocument>,
}

/// Pool object in either API shape.
///
/// V3 objects carry `dynamicData`; V2 subgraph objects carry `poolType`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PoolDocument {
    V3(V3Pool),
    V2(V2Pool),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3Pool {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub pool_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub version: Option<u64>,
    /// Static swap fee as a fraction.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub swap_fee: Option<Decimal>,
    #[serde(default)]
    pub is_core_pool: bool,
    pub dynamic_data: V3DynamicData,
    #[serde(default)]
    pub root_pool: Option<RootPool>,
    #[serde(default)]
    pub pool_tokens: Option<Vec<TokenDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3DynamicData {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_liquidity: Option<Decimal>,
    #[serde(rename = "volume24h", default, deserialize_with = "lenient_decimal")]
    pub volume_24h: Option<Decimal>,
    #[serde(rename = "fees24h", default, deserialize_with = "lenient_decimal")]
    pub fees_24h: Option<Decimal>,
    #[serde(default)]
    pub apr_items: Option<Vec<AprItemDto>>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_apr: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub apr: Option<Decimal>,
    /// Surge fee in percent.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub surge_fee_percentage: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub rebalance_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AprItemDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub apr: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RootPool {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub apr: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenDto {
    #[serde(default)]
    pub symbol: Option<String>,
    /// Fractional weight; absent for non-weighted pools.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub weight: Option<Decimal>,
}

/// V2 subgraph pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2Pool {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub pool_type: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub swap_fee: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_liquidity: Option<Decimal>,
    #[serde(default)]
    pub tokens: Option<Vec<TokenDto>>,
}

/// One point of a cumulative pool snapshot series.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Unix seconds.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub timestamp: Option<u64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub liquidity: Option<Decimal>,
    /// Cumulative swap volume since pool creation.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub swap_volume: Option<Decimal>,
    /// Cumulative swap fees since pool creation.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub swap_fees: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_decimal_variants() {
        assert_eq!(parse_decimal(&json!("1234.5")), Some(dec!(1234.5)));
        assert_eq!(parse_decimal(&json!(0.003)), Some(dec!(0.003)));
        assert_eq!(parse_decimal(&json!("1e3")), Some(dec!(1000)));
        assert_eq!(parse_decimal(&json!("n/a")), None);
        assert_eq!(parse_decimal(&json!(null)), None);
        assert_eq!(parse_decimal(&json!(true)), None);
    }

    #[test]
    fn test_v3_document() {
        let doc: PoolDocument = serde_json::from_value(json!({
            "id": "0xabc",
            "address": "0xabc",
            "type": "STABLE_SURGE",
            "version": 3,
            "dynamicData": {
                "totalLiquidity": "1000000",
                "volume24h": 5000,
                "fees24h": "garbage",
                "aprItems": [{"type": "SWAP_FEE", "apr": "0.01"}]
            }
        }))
        .unwrap();
        let PoolDocument::V3(pool) = doc else {
            panic!("expected V3 shape");
        };
        assert_eq!(pool.dynamic_data.total_liquidity, Some(dec!(1000000)));
        assert_eq!(pool.dynamic_data.volume_24h, Some(dec!(5000)));
        assert_eq!(pool.dynamic_data.fees_24h, None);
        assert_eq!(pool.version, Some(3));
    }

    #[test]
    fn test_v2_document() {
        let doc: PoolDocument = serde_json::from_value(json!({
            "id": "0xabc0002",
            "address": "0xabc",
            "poolType": "Weighted",
            "swapFee": "0.003",
            "totalLiquidity": "250.5",
            "tokens": [{"symbol": "BAL", "weight": "0.8"}, {"symbol": "WETH", "weight": "0.2"}]
        }))
        .unwrap();
        let PoolDocument::V2(pool) = doc else {
            panic!("expected V2 shape");
        };
        assert_eq!(pool.swap_fee, Some(dec!(0.003)));
        assert_eq!(pool.tokens.map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_series_point_string_timestamp() {
        let point: SeriesPoint = serde_json::from_value(json!({
            "timestamp": "1700000000",
            "liquidity": "10",
            "swapVolume": 20,
        }))
        .unwrap();
        assert_eq!(point.timestamp, Some(1_700_000_000));
        assert_eq!(point.swap_fees, None);
    }
}
