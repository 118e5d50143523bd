//! Where transaction records come from
//!
//! The database itself lives elsewhere; here records are read from JSON
//! exports, optionally behind the bulk-read cache.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use assetdesk_config::CacheConfig;

use crate::cache::TtlCache;
use crate::error::{CoreError, CoreResult};
use crate::models::AssetTransaction;
use crate::time::Clock;

/// Cache key of the bulk transaction read
pub const TRANSACTIONS_CACHE_KEY: &str = "assetTransactions";

/// Source reference type
pub type SourceRef = Arc<dyn TransactionSource>;

/// Trait for transaction stores
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// All transactions, newest first
    async fn fetch_transactions(&self) -> CoreResult<Vec<AssetTransaction>>;
}

/// Read a JSON array export
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> CoreResult<Vec<T>> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = tokio::fs::read_to_string(path).await?;
    let records: Vec<T> = serde_json::from_str(&content)?;
    log::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Transactions from a JSON export file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TransactionSource for JsonFileSource {
    async fn fetch_transactions(&self) -> CoreResult<Vec<AssetTransaction>> {
        let mut records: Vec<AssetTransaction> = load_json(&self.path).await?;
        // RFC 3339 strings in one offset sort chronologically
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

/// Wraps a source with the bulk-read cache
pub struct CachedTransactionSource {
    inner: SourceRef,
    cache: TtlCache<Vec<AssetTransaction>>,
    max_records: usize,
}

impl CachedTransactionSource {
    pub fn new(inner: SourceRef, ttl: Duration, max_records: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl, clock),
            max_records,
        }
    }

    pub fn from_config(inner: SourceRef, config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            inner,
            Duration::from_secs(config.ttl_secs),
            config.max_records,
            clock,
        )
    }

    /// Force the next read to go to the inner source
    pub fn invalidate(&self) {
        self.cache.invalidate(TRANSACTIONS_CACHE_KEY);
    }
}

#[async_trait]
impl TransactionSource for CachedTransactionSource {
    async fn fetch_transactions(&self) -> CoreResult<Vec<AssetTransaction>> {
        if let Some(entry) = self.cache.get(TRANSACTIONS_CACHE_KEY) {
            log::debug!("Transaction cache hit, expires at {}", entry.expires_at);
            return Ok(entry.value);
        }

        let mut records = self.inner.fetch_transactions().await?;
        records.truncate(self.max_records);
        let entry = self.cache.insert(TRANSACTIONS_CACHE_KEY, records);
        log::debug!(
            "Cached {} transactions until {}",
            entry.value.len(),
            entry.expires_at
        );
        Ok(entry.value)
    }
}
