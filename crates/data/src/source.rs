//! Snapshot sources and batch fetching.

use crate::error::DataError;
use crate::normalize::{NormalizeOptions, NormalizedPool, normalize};
use crate::payload::PoolPayload;
use async_trait::async_trait;
use futures::future::join_all;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Supplier of raw pool payloads.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches the payload for one pool.
    async fn fetch_pool(&self, address: &str) -> Result<PoolPayload, DataError>;
}

/// Reads `<address>.json` documents from a directory.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, address: &str) -> PathBuf {
        self.dir.join(format!("{}.json", address.to_ascii_lowercase()))
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSource {
    async fn fetch_pool(&self, address: &str) -> Result<PoolPayload, DataError> {
        let path = self.path_for(address);
        debug!(path = %path.display(), "reading pool fixture");
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DataError::PoolNotFound(address.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        serde_json::from_value(value).map_err(|e| DataError::MalformedPayload {
            address: address.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Outcome of fetching one pool in a batch.
#[derive(Debug)]
pub struct PoolFetch {
    pub address: String,
    pub result: Result<NormalizedPool, DataError>,
}

/// Fetches and normalizes a single pool.
///
/// # Errors
///
/// Propagates any [`DataError`] from the source or normalization.
pub async fn fetch_pool<S>(
    source: &S,
    address: &str,
    options: &NormalizeOptions,
) -> Result<NormalizedPool, DataError>
where
    S: SnapshotSource + ?Sized,
{
    let payload = source.fetch_pool(address).await?;
    normalize(address, payload, options)
}

/// Fetches all pools concurrently.
///
/// Results keep request order and one failing pool never affects another.
pub async fn fetch_batch<S>(
    source: &S,
    addresses: &[String],
    options: &NormalizeOptions,
) -> Vec<PoolFetch>
where
    S: SnapshotSource + ?Sized,
{
    let fetches = addresses.iter().map(|address| async move {
        let result = fetch_pool(source, address, options).await;
        if let Err(e) = &result {
            warn!(pool = %address, error = %e, "pool fetch failed");
        }
        PoolFetch {
            address: address.clone(),
            result,
        }
    });
    let results = join_all(fetches).await;

    let failed = results.iter().filter(|f| f.result.is_err()).count();
    info!(
        requested = addresses.len(),
        failed, "batch fetch completed"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    const V2_FIXTURE: &str = r#"{
        "pool": {
            "id": "0xaaa0001",
            "address": "0xaaa",
            "poolType": "Weighted",
            "totalLiquidity": "1000"
        },
        "series": [
            {"timestamp": 7344000, "liquidity": "900", "swapVolume": "100", "swapFees": "1"},
            {"timestamp": 8640000, "liquidity": "1000", "swapVolume": "400", "swapFees": "2"}
        ]
    }"#;

    fn fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("0xaaa.json"), V2_FIXTURE).unwrap();
        fs::write(dir.path().join("0xbad.json"), "{ not json").unwrap();
        fs::write(dir.path().join("0xodd.json"), r#"{"pool": {"name": "x"}}"#).unwrap();
        dir
    }

    fn options() -> NormalizeOptions {
        NormalizeOptions::default().with_now(8_640_000)
    }

    #[tokio::test]
    async fn test_fetch_pool_from_fixture() {
        let dir = fixture_dir();
        let source = JsonFileSource::new(dir.path());
        let pool = fetch_pool(&source, "0xAAA", &options()).await.unwrap();
        assert_eq!(pool.current.tvl, Some(dec!(1000)));
        assert_eq!(pool.current.volume_window, Some(dec!(300)));
        assert_eq!(pool.historical.and_then(|h| h.tvl), Some(dec!(900)));
    }

    #[tokio::test]
    async fn test_fetch_pool_errors() {
        let dir = fixture_dir();
        let source = JsonFileSource::new(dir.path());
        assert!(matches!(
            source.fetch_pool("0xmissing").await,
            Err(DataError::PoolNotFound(_))
        ));
        assert!(matches!(
            source.fetch_pool("0xbad").await,
            Err(DataError::Json(_))
        ));
        assert!(matches!(
            source.fetch_pool("0xodd").await,
            Err(DataError::MalformedPayload { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_batch_isolates_failures() {
        let dir = fixture_dir();
        let source = JsonFileSource::new(dir.path());
        let addresses = vec!["0xaaa".to_string(), "0xmissing".to_string()];
        let results = fetch_batch(&source, &addresses, &options()).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].address, "0xaaa");
        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_err());
    }
}
