//! TTL cache for aggregate queries, stored in the same database.
//!
//! Keys are SHA-256 over the sorted query parameters, so equivalent
//! queries share an entry regardless of argument order. Writes are
//! INSERT OR REPLACE (last write wins); expiry is checked at read time
//! and stale rows are deleted lazily.

use rusqlite::params;
use sha2::{Digest, Sha256};

use crate::error::{Result, StoreError};
use crate::store::{InteractionRecord, Store};

/// Default time-to-live for cached aggregates, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Cache key for a named query with its parameters.
pub fn cache_key(query: &str, params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    for (k, v) in sorted {
        hasher.update(b"\x1f");
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Fetch a live cache entry; expired entries are removed and report a miss.
pub fn get(store: &Store, key: &str, now: u64) -> Result<Option<String>> {
    let mut stmt = store
        .conn()
        .prepare("SELECT value, expires_at FROM analytics_cache WHERE cache_key = ?1")?;
    let row: Option<(String, i64)> = stmt
        .query_row([key], |row| Ok((row.get(0)?, row.get(1)?)))
        .ok();

    match row {
        Some((value, expires_at)) if expires_at as u64 > now => Ok(Some(value)),
        Some(_) => {
            store
                .conn()
                .execute("DELETE FROM analytics_cache WHERE cache_key = ?1", [key])?;
            Ok(None)
        }
        None => Ok(None),
    }
}

pub fn put(store: &Store, key: &str, value: &str, now: u64, ttl_secs: u64) -> Result<()> {
    store.conn().execute(
        "INSERT OR REPLACE INTO analytics_cache (cache_key, value, expires_at)
         VALUES (?1, ?2, ?3)",
        params![key, value, (now + ttl_secs) as i64],
    )?;
    Ok(())
}

/// Recent interaction history, served from the cache when fresh.
pub fn emotion_history_cached(
    store: &Store,
    limit: usize,
    now: u64,
) -> Result<Vec<InteractionRecord>> {
    let limit_str = limit.to_string();
    let key = cache_key("emotion_history", &[("limit", &limit_str)]);

    if let Some(json) = get(store, &key, now)? {
        match serde_json::from_str(&json) {
            Ok(records) => return Ok(records),
            Err(e) => tracing::warn!(error = %e, "cached history unreadable, refetching"),
        }
    }

    let records = store.emotion_history(limit)?;
    let json = serde_json::to_string(&records)
        .map_err(|e| StoreError::InvalidData(format!("history: {e}")))?;
    put(store, &key, &json, now, DEFAULT_TTL_SECS)?;
    Ok(records)
}
