//! Version-keyed memo tables using moka
//!
//! Every entry is keyed by the catalog version it was computed from, so
//! installing a new catalog never serves stale output. Old entries are left
//! for the LRU to evict.

use moka::sync::Cache;
use navdeck_model::CatalogVersion;
use std::hash::Hash;
use std::sync::Arc;

/// Memoized resolver output for one kind of view
#[derive(Debug, Clone)]
pub struct MemoTable<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    inner: Cache<(CatalogVersion, K), Arc<V>>,
}

impl<K, V> MemoTable<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Create table with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Get the cached value or compute and store it
    pub fn get_or_compute<F>(&self, version: CatalogVersion, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        self.inner.get_with((version, key), || Arc::new(compute()))
    }

    /// Drop every entry
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Entry count after flushing pending maintenance
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}
