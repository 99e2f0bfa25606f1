//! In-memory TTL cache for raw provider responses.
//!
//! Payloads are opaque to the cache; expiry is evaluated lazily at lookup
//! time and there is no background eviction.

use crate::types::RequestKey;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL_SECS: u64 = 600;

#[derive(Debug)]
struct CacheEntry {
    payload: Value,
    fetched_at: Instant,
}

/// Maps a request fingerprint to the last fetched payload.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: HashMap<RequestKey, CacheEntry>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Return the cached payload for `key` if it is still fresh.
    ///
    /// An entry older than the TTL is evicted and reported absent.
    pub fn lookup(&mut self, key: &RequestKey) -> Option<Value> {
        self.lookup_at(key, Instant::now())
    }

    /// Store `payload` under `key`, replacing any prior entry.
    pub fn store(&mut self, key: RequestKey, payload: Value) {
        self.store_at(key, payload, Instant::now());
    }

    fn lookup_at(&mut self, key: &RequestKey, now: Instant) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if now.duration_since(entry.fetched_at) < self.ttl => {
                tracing::debug!(?key, "returning cached response");
                Some(entry.payload.clone())
            }
            Some(_) => {
                // Stale entry: evict on the way out
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn store_at(&mut self, key: RequestKey, payload: Value, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                fetched_at: now,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::{ResourceKind, UnitSystem};
    use serde_json::json;

    fn key(location: &str) -> RequestKey {
        RequestKey::new(location, UnitSystem::Imperial, ResourceKind::Current)
    }

    #[test]
    fn test_store_then_lookup_within_ttl() {
        let mut cache = ResponseCache::new(Duration::from_secs(600));
        let payload = json!({"name": "London", "main": {"temp": 51.3}});
        let now = Instant::now();

        cache.store_at(key("London"), payload.clone(), now);

        let hit = cache.lookup_at(&key("london"), now + Duration::from_secs(599));
        assert_eq!(hit, Some(payload));
    }

    #[test]
    fn test_lookup_after_ttl_evicts_entry() {
        let mut cache = ResponseCache::new(Duration::from_secs(600));
        let now = Instant::now();

        cache.store_at(key("london"), json!({"name": "London"}), now);

        let miss = cache.lookup_at(&key("london"), now + Duration::from_secs(600));
        assert!(miss.is_none());
        assert_eq!(cache.len(), 0, "stale entry should be evicted");
    }

    #[test]
    fn test_store_overwrites_prior_entry() {
        let mut cache = ResponseCache::new(Duration::from_secs(600));
        let now = Instant::now();

        cache.store_at(key("london"), json!({"version": 1}), now);
        cache.store_at(key("london"), json!({"version": 2}), now + Duration::from_secs(1));

        let hit = cache.lookup_at(&key("london"), now + Duration::from_secs(2));
        assert_eq!(hit, Some(json!({"version": 2})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_refreshes_fetch_time() {
        let mut cache = ResponseCache::new(Duration::from_secs(600));
        let now = Instant::now();

        cache.store_at(key("london"), json!({"version": 1}), now);
        cache.store_at(key("london"), json!({"version": 2}), now + Duration::from_secs(500));

        // 599s after the second store, still fresh
        let hit = cache.lookup_at(&key("london"), now + Duration::from_secs(1099));
        assert_eq!(hit, Some(json!({"version": 2})));
    }

    #[test]
    fn test_lookup_unknown_key() {
        let mut cache = ResponseCache::default();
        assert!(cache.lookup(&key("nowhere")).is_none());
    }

    #[test]
    fn test_keys_do_not_collide_across_kind() {
        let mut cache = ResponseCache::new(Duration::from_secs(600));
        let now = Instant::now();
        let current = RequestKey::new("london", UnitSystem::Metric, ResourceKind::Current);
        let forecast = RequestKey::new("london", UnitSystem::Metric, ResourceKind::Forecast);

        cache.store_at(current.clone(), json!({"kind": "current"}), now);
        cache.store_at(forecast.clone(), json!({"kind": "forecast"}), now);

        assert_eq!(
            cache.lookup_at(&current, now),
            Some(json!({"kind": "current"}))
        );
        assert_eq!(
            cache.lookup_at(&forecast, now),
            Some(json!({"kind": "forecast"}))
        );
    }
}
