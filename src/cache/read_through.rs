//! Keyed read-through memoisation.
//!
//! A [`ReadThroughCache`] maps `(fetch descriptor name, parameter tuple)` to
//! the value the compute future produced the first time the key was asked
//! for. Entries never expire and are never evicted for size: they leave only
//! through [`invalidate`](ReadThroughCache::invalidate) (every entry of one
//! descriptor) or [`invalidate_all`](ReadThroughCache::invalidate_all).
//!
//! Empty and not-found values are memoised exactly like real data. A fetch
//! that failed and collapsed into an empty table stays empty until someone
//! invalidates its descriptor.
//!
//! Concurrent callers asking for the same missing key are coalesced onto a
//! single compute (moka's `get_with`).

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use moka::future::Cache;
use tracing::{debug, warn};

use crate::telemetry;
use crate::types::FetchDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    fetch: String,
    params: Vec<String>,
}

impl CacheKey {
    fn new(fetch: &FetchDescriptor, params: &[&str]) -> Self {
        Self {
            fetch: fetch.name().to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Process-lifetime memo store for one value type.
pub struct ReadThroughCache<V> {
    entries: Cache<CacheKey, V>,
}

impl<V> ReadThroughCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty, unbounded cache.
    pub fn new() -> Self {
        let entries = Cache::builder().support_invalidation_closures().build();
        Self { entries }
    }

    /// Return the memoised value for `(fetch, params)`, computing it on a miss.
    ///
    /// `compute` is only polled on a miss, and at most once per key between
    /// invalidations. Emits cache hit/miss metrics.
    ///
    /// # Panics
    ///
    /// In debug builds, if `params.len()` differs from `fetch.arity()`.
    /// Release builds key on whatever params are given.
    pub async fn get_or_compute<F>(
        &self,
        fetch: &FetchDescriptor,
        params: &[&str],
        compute: F,
    ) -> V
    where
        F: Future<Output = V>,
    {
        debug_assert_eq!(params.len(), fetch.arity(), "wrong arity for {fetch}");

        let key = CacheKey::new(fetch, params);
        let computed = AtomicBool::new(false);
        let value = self
            .entries
            .get_with(key, async {
                computed.store(true, Ordering::Relaxed);
                compute.await
            })
            .await;

        if computed.load(Ordering::Relaxed) {
            debug!(fetch = fetch.name(), ?params, "cache miss");
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "fetch" => fetch.name().to_string())
                .increment(1);
        } else {
            debug!(fetch = fetch.name(), ?params, "cache hit");
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "fetch" => fetch.name().to_string())
                .increment(1);
        }
        value
    }

    /// The memoised value, if any, without computing.
    pub async fn peek(&self, fetch: &FetchDescriptor, params: &[&str]) -> Option<V> {
        self.entries.get(&CacheKey::new(fetch, params)).await
    }

    /// Whether `(fetch, params)` currently has an entry.
    pub fn contains(&self, fetch: &FetchDescriptor, params: &[&str]) -> bool {
        self.entries.contains_key(&CacheKey::new(fetch, params))
    }

    /// Drop every entry of `fetch`, whatever its parameters.
    pub fn invalidate(&self, fetch: &FetchDescriptor) {
        let name = fetch.name().to_string();
        if let Err(e) = self
            .entries
            .invalidate_entries_if(move |key, _| key.fetch == name)
        {
            // Only reachable if the cache was built without invalidation closures.
            warn!(fetch = fetch.name(), error = %e, "could not invalidate entries");
        }
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

impl<V> Default for ReadThroughCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
