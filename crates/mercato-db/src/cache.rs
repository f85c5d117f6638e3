//! # CSV Export Cache
//!
//! Redis-backed cache for CSV export bytes.
//!
//! ## Cache-Aside
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      export_csv read path                               │
//! │                                                                         │
//! │  GET csv:<table>[:col:val...]                                           │
//! │       │                                                                 │
//! │       ├── hit  ──► return cached bytes (no store query)                 │
//! │       │                                                                 │
//! │       └── miss ──► find_all → serialize → SET key EX 3600 → return      │
//! │                                                                         │
//! │  Writes never invalidate; staleness up to the 1-hour expiry is an       │
//! │  accepted tradeoff of the endpoint.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client is opened once at startup and connections are multiplexed per
//! call; a race between two concurrent misses overwrites the same key with
//! the same bytes.

use redis::AsyncCommands;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Expiry for cached CSV exports: one hour.
pub const CSV_CACHE_TTL_SECS: u64 = 3600;

/// Handle to the Redis cache used by `export_csv`.
#[derive(Debug, Clone)]
pub struct CsvCache {
    client: redis::Client,
}

impl CsvCache {
    /// Opens a client for the given Redis URL.
    ///
    /// No connection is made here; each call acquires a multiplexed
    /// connection on demand.
    pub fn new(redis_url: &str) -> DbResult<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| DbError::Cache(e.to_string()))?;
        Ok(CsvCache { client })
    }

    /// Fetches cached bytes for a key, `None` on a miss.
    pub async fn get(&self, key: &str) -> DbResult<Option<Vec<u8>>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let bytes: Option<Vec<u8>> = conn.get(key).await?;
        Ok(bytes)
    }

    /// Stores bytes under a key with the fixed CSV expiry.
    pub async fn put(&self, key: &str, bytes: &[u8]) -> DbResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, bytes, CSV_CACHE_TTL_SECS).await?;
        debug!(key = %key, bytes = bytes.len(), ttl_secs = CSV_CACHE_TTL_SECS, "cache entry stored");
        Ok(())
    }
}
