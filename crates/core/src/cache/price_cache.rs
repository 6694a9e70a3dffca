use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use crate::constants::DEFAULT_PRICE_CACHE_TTL;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    value: f64,
    fetched_at: DateTime<Utc>,
}

/// A value read back from the cache, with how old it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedPrice {
    pub value: f64,
    pub age: Duration,
}

/// In-memory price memo keyed by query identity.
///
/// An entry is fresh while `now - fetched_at < ttl`. Expired entries are
/// kept (they back the stale fallback) and are only ever replaced by a
/// newer `put`.
pub struct PriceCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<CachedPrice> {
        self.get_stale(key).filter(|cached| cached.age < self.ttl)
    }

    /// Last stored value for `key`, however old.
    pub fn get_stale(&self, key: &str) -> Option<CachedPrice> {
        let entry = *self.entries.get(key)?;
        let age = (self.clock.now() - entry.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        Some(CachedPrice {
            value: entry.value,
            age,
        })
    }

    pub fn put(&self, key: impl Into<String>, value: f64) {
        let entry = CacheEntry {
            value,
            fetched_at: self.clock.now(),
        };
        self.entries.insert(key.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn cache_with_clock() -> (PriceCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = PriceCache::with_clock(DEFAULT_PRICE_CACHE_TTL, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_fresh_until_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.put("usd_krw", 1350.0);

        clock.advance(Duration::from_secs(599));
        let hit = cache.get("usd_krw").expect("entry should still be fresh");
        assert_eq!(hit.value, 1350.0);
        assert_eq!(hit.age, Duration::from_secs(599));

        clock.advance(Duration::from_secs(2));
        assert!(cache.get("usd_krw").is_none());
    }

    #[test]
    fn test_entry_at_exact_ttl_is_expired() {
        let (cache, clock) = cache_with_clock();
        cache.put("stock:AAPL", 190.0);
        clock.advance(Duration::from_secs(600));
        assert!(cache.get("stock:AAPL").is_none());
    }

    #[test]
    fn test_expired_entry_is_kept_for_stale_reads() {
        let (cache, clock) = cache_with_clock();
        cache.put("stock:AAPL", 190.0);
        clock.advance(Duration::from_secs(3600));

        assert!(cache.get("stock:AAPL").is_none());
        let stale = cache.get_stale("stock:AAPL").unwrap();
        assert_eq!(stale.value, 190.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_overwrites_and_resets_age() {
        let (cache, clock) = cache_with_clock();
        cache.put("usdt_krw", 1360.0);
        clock.advance(Duration::from_secs(700));
        cache.put("usdt_krw", 1370.0);

        let hit = cache.get("usdt_krw").unwrap();
        assert_eq!(hit.value, 1370.0);
        assert_eq!(hit.age, Duration::ZERO);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let cache = PriceCache::default();
        assert!(cache.is_empty());
        assert!(cache.get("nope").is_none());
        assert!(cache.get_stale("nope").is_none());
    }
}
