use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::services::StoreError;

/// Upper bound on a configured TTL (ten years)
const MAX_TTL_SECS: u64 = 315_360_000;

/// Time source for cache expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

/// A single cached value with a time-to-live
///
/// Readers never block each other. Concurrent refreshes are allowed and the
/// last writer wins.
struct TtlCell<T> {
    entry: RwLock<Option<Entry<T>>>,
}

impl<T: Copy> TtlCell<T> {
    fn new() -> Self {
        Self { entry: RwLock::new(None) }
    }

    fn get(&self, now: DateTime<Utc>, ttl: Duration) -> Option<T> {
        let guard = self.entry.read();
        guard
            .as_ref()
            .filter(|e| now - e.stored_at < ttl)
            .map(|e| e.value)
    }

    fn set(&self, value: T, now: DateTime<Utc>) {
        *self.entry.write() = Some(Entry { value, stored_at: now });
    }

    fn clear(&self) {
        *self.entry.write() = None;
    }
}

/// Cache for population-wide statistics used during scoring
///
/// Holds the population maximum years-of-experience. Values are refreshed
/// cache-aside: a stale or missing value is loaded from the store and stored
/// again with the current clock time.
pub struct PopulationStatsCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    max_years: TtlCell<i32>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PopulationStatsCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self::with_clock(ttl_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
            clock,
            max_years: TtlCell::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached max years, if present and fresh
    pub fn max_years(&self) -> Option<i32> {
        self.max_years.get(self.clock.now(), self.ttl)
    }

    /// Population max years, loading through `load` on a miss
    ///
    /// A missing or non-positive loaded value is replaced by `default_max`
    /// before caching. Load errors are returned and nothing is cached.
    pub async fn max_years_or_load<F, Fut>(&self, default_max: i32, load: F) -> Result<i32, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<i32>, StoreError>>,
    {
        if let Some(cached) = self.max_years() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Population max years cache hit: {}", cached);
            return Ok(cached);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let loaded = load().await?;
        let max_years = loaded.filter(|y| *y > 0).unwrap_or(default_max);

        self.max_years.set(max_years, self.clock.now());
        tracing::debug!("Refreshed population max years: {}", max_years);

        Ok(max_years)
    }

    pub fn invalidate(&self) {
        self.max_years.clear();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            hit_count: hits,
            miss_count: misses,
            hit_rate: if total > 0 { hits as f64 / total as f64 } else { 0.0 },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}
