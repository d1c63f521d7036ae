//! Memoization of loaded sales sheets.
//!
//! Parsed datasets are keyed by the SHA-256 of the uploaded bytes, so
//! re-submitting the same file is a cache hit and any new upload is a
//! new key. Entries are evicted least-recently-used.

use crate::loader::load_sales_csv;
use lru::LruCache;
use sales_core::config::CacheConfig;
use sales_core::{Error, Result, SalesDataset};
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info};

/// Hex SHA-256 of a byte slice.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// LRU cache of parsed datasets keyed by content hash.
pub struct DatasetCache {
    entries: LruCache<String, Arc<SalesDataset>>,
    hits: u64,
    misses: u64,
}

impl DatasetCache {
    /// Create a cache holding at most `capacity` datasets.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::config("dataset cache capacity must be at least 1"))?;
        Ok(Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        })
    }

    /// Create a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.capacity)
    }

    /// Return the dataset for these bytes, parsing them only on a miss.
    ///
    /// Parse failures are not cached.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Arc<SalesDataset>> {
        let hash = content_hash(bytes);

        if let Some(dataset) = self.entries.get(&hash) {
            self.hits += 1;
            debug!(hash = %hash, "Dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        self.misses += 1;
        let dataset = Arc::new(load_sales_csv(bytes)?);
        info!(hash = %hash, rows = dataset.len(), "Dataset cached");
        self.entries.put(hash, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Look up a dataset by hash without parsing.
    pub fn get(&mut self, hash: &str) -> Option<Arc<SalesDataset>> {
        self.entries.get(hash).cloned()
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&mut self, hash: &str) -> bool {
        self.entries.pop(hash).is_some()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
