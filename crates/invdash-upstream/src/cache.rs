//! Single-slot TTL cache for the full-catalog scan.
//!
//! One value, one expiry. The lock is never held across an `.await`, so two
//! callers that miss at the same time will both run the fetcher and the later
//! write wins.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;

struct Entry<T> {
    value: Arc<T>,
    expires_at: Instant,
}

/// Hit/miss counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

pub struct TtlCache<T> {
    ttl: Duration,
    slot: RwLock<Option<Entry<T>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl<T> TtlCache<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value, if one exists and has not expired.
    pub fn get(&self) -> Option<Arc<T>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        let fresh = slot
            .as_ref()
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| Arc::clone(&entry.value));
        drop(slot);

        let counter = if fresh.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        fresh
    }

    /// Stores `value` with a fresh expiry and returns the shared handle.
    pub fn insert(&self, value: T) -> Arc<T> {
        self.insert_if(value, || true)
    }

    /// Like [`Self::insert`], but only stores `value` when `still_valid`
    /// holds. The check runs under the write lock, so it is ordered against
    /// [`Self::invalidate`]. The handle is returned either way.
    pub fn insert_if<V>(&self, value: T, still_valid: V) -> Arc<T>
    where
        V: FnOnce() -> bool,
    {
        let value = Arc::new(value);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if still_valid() {
            *slot = Some(Entry {
                value: Arc::clone(&value),
                expires_at: Instant::now() + self.ttl,
            });
        } else {
            tracing::debug!("stale cache fill discarded");
        }
        value
    }

    pub fn invalidate(&self) {
        let previous = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("catalog cache invalidated");
        }
    }

    /// Returns the cached value, or runs `fetch` and caches its `Ok` result.
    /// An `Err` is passed through and leaves the slot untouched.
    ///
    /// # Errors
    ///
    /// Returns whatever error `fetch` produced.
    pub async fn get_or_refresh<F, Fut, E>(&self, fetch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.get_or_refresh_if(fetch, || true).await
    }

    /// [`Self::get_or_refresh`] whose fill is dropped unless `still_valid`
    /// holds once `fetch` resolves.
    ///
    /// # Errors
    ///
    /// Returns whatever error `fetch` produced.
    pub async fn get_or_refresh_if<F, Fut, E, V>(
        &self,
        fetch: F,
        still_valid: V,
    ) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        V: FnOnce() -> bool,
    {
        if let Some(hit) = self.get() {
            return Ok(hit);
        }
        let value = fetch().await?;
        Ok(self.insert_if(value, still_valid))
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}
