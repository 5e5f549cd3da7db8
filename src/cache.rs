//! Result cache
//!
//! Barcode-keyed cache for analysis reports. The scoring engine never sees
//! it; the server consults it before scoring a food-database product.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;

use crate::config::DEFAULT_CACHE_MAX_ENTRIES;
use crate::scoring::AnalysisReport;

/// Cache of analysis reports keyed by barcode
pub trait ResultCache: Send + Sync {
    /// A fresh entry for `key`, if any
    fn get(&self, key: &str) -> Option<AnalysisReport>;

    fn put(&self, key: &str, report: AnalysisReport);

    /// Number of stored entries, fresh or not yet purged
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    report: AnalysisReport,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(report: AnalysisReport, ttl: Duration) -> Self {
        Self {
            report,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory LRU cache with a time-to-live
///
/// When full, expired entries are purged first, then the least recently
/// used entry is evicted.
#[derive(Debug)]
pub struct InMemoryResultCache {
    store: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl InMemoryResultCache {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CACHE_MAX_ENTRIES) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// A `max_entries` of zero falls back to the default capacity
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            store: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        // Entries are plain data, so a poisoned store is still usable
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn purge_expired(store: &mut LruCache<String, CacheEntry>) {
    let expired: Vec<String> = store
        .iter()
        .filter(|(_, entry)| entry.is_expired())
        .map(|(key, _)| key.clone())
        .collect();
    for key in expired {
        store.pop(&key);
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &str) -> Option<AnalysisReport> {
        let mut store = self.lock();

        // LruCache::get bumps the entry to most recently used
        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.report.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
            debug!("Cache entry for {} expired", key);
        }
        None
    }

    fn put(&self, key: &str, report: AnalysisReport) {
        let mut store = self.lock();

        if !store.contains(key) && store.len() >= store.cap().get() {
            purge_expired(&mut store);
        }

        if let Some((evicted, _)) = store.push(key.to_string(), CacheEntry::new(report, self.ttl)) {
            if evicted != key {
                debug!("Evicted cache entry for {}", evicted);
            }
        }
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductFacts;
    use crate::scoring::ScoringEngine;

    fn report(name: &str) -> AnalysisReport {
        let engine = ScoringEngine::builtin().unwrap();
        engine.analyze(&ProductFacts {
            name: name.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_put_and_get() {
        let cache = InMemoryResultCache::new(Duration::from_secs(60), 10);
        assert!(cache.is_empty());
        cache.put("12345678", report("Oats"));
        assert_eq!(cache.get("12345678").unwrap().name, "Oats");
        assert!(cache.get("87654321").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = InMemoryResultCache::new(Duration::ZERO, 10);
        cache.put("12345678", report("Oats"));
        assert!(cache.get("12345678").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = InMemoryResultCache::new(Duration::from_millis(20), 10);
        cache.put("12345678", report("Oats"));
        assert!(cache.get("12345678").is_some());
        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get("12345678").is_none());
    }

    #[test]
    fn test_least_recently_used_entry_is_evicted() {
        let cache = InMemoryResultCache::new(Duration::from_secs(60), 2);
        cache.put("11111111", report("First"));
        cache.put("22222222", report("Second"));
        assert!(cache.get("11111111").is_some());
        cache.put("33333333", report("Third"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("22222222").is_none());
        assert_eq!(cache.get("11111111").unwrap().name, "First");
        assert!(cache.get("33333333").is_some());
    }

    #[test]
    fn test_expired_entries_go_before_fresh_ones() {
        let cache = InMemoryResultCache::new(Duration::ZERO, 2);
        cache.put("11111111", report("First"));
        cache.put("22222222", report("Second"));
        cache.put("33333333", report("Third"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let cache = InMemoryResultCache::new(Duration::from_secs(60), 0);
        for i in 0..5 {
            cache.put(&format!("1000000{}", i), report("Bar"));
        }
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = InMemoryResultCache::new(Duration::from_secs(60), 2);
        cache.put("11111111", report("First"));
        cache.put("22222222", report("Second"));
        cache.put("22222222", report("Second again"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("22222222").unwrap().name, "Second again");
    }

    #[test]
    fn test_clear() {
        let cache = InMemoryResultCache::new(Duration::from_secs(60), 2);
        cache.put("11111111", report("First"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
