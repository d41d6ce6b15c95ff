//! Bounded memo of converted pages.
//!
//! Entries are keyed by the serialized `(id, content)` pair, so an edited
//! document simply misses. There is no time-based expiry and no explicit
//! invalidation; the least recently used entry is evicted once the cache is
//! full.

use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::types::{CacheKey, PageOutput};
use lru::LruCache;
use once_cell::sync::{Lazy, OnceCell};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A slot is reserved on the first miss and filled once; concurrent misses on
/// the same key wait on the slot instead of converting again.
type Slot = Arc<OnceCell<Arc<PageOutput>>>;

static GLOBAL: Lazy<Arc<PageCache>> = Lazy::new(|| Arc::new(PageCache::new(DEFAULT_CACHE_CAPACITY)));

/// LRU cache of converted pages.
pub struct PageCache {
    entries: Mutex<LruCache<CacheKey, Slot>>,
}

impl PageCache {
    /// Creates a cache holding at most `capacity` pages (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// The process-wide cache, created on first use and never torn down.
    pub fn global() -> Arc<PageCache> {
        Arc::clone(&GLOBAL)
    }

    /// Returns the cached page for `key`, marking it most recently used.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<PageOutput>> {
        self.lock().get(key).and_then(|slot| slot.get().cloned())
    }

    /// Stores `value` under `key`, evicting the least recently used page when full.
    pub fn set(&self, key: CacheKey, value: PageOutput) -> Arc<PageOutput> {
        let value = Arc::new(value);
        let slot = Arc::new(OnceCell::with_value(Arc::clone(&value)));
        self.lock().put(key, slot);
        value
    }

    /// Returns the cached page for `key`, computing and storing it on a miss.
    ///
    /// Concurrent callers missing on the same key run `compute` once; the
    /// others block until it finishes. A failed computation is not cached,
    /// its reserved slot is released, and the next caller retries.
    pub fn get_or_try_insert_with<E, F>(&self, key: CacheKey, compute: F) -> Result<Arc<PageOutput>, E>
    where
        F: FnOnce() -> Result<PageOutput, E>,
    {
        let slot = {
            let mut entries = self.lock();
            Arc::clone(entries.get_or_insert(key.clone(), || Arc::new(OnceCell::new())))
        };
        let result = slot.get_or_try_init(|| compute().map(Arc::new)).cloned();
        if result.is_err() {
            let mut entries = self.lock();
            let abandoned = entries
                .peek(&key)
                .is_some_and(|current| Arc::ptr_eq(current, &slot) && current.get().is_none());
            if abandoned {
                entries.pop(&key);
            }
        }
        result
    }

    /// Whether a finished page is stored for `key`, without touching recency.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock()
            .peek(key)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of occupied entries, including in-flight ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
