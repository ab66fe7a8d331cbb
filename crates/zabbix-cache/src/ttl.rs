//! Time-bounded memoization of async lookups.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::OnceCell;
use tracing::{debug, trace};

struct Slot<V> {
    created: Instant,
    cell: Arc<OnceCell<V>>,
}

/// Caches the results of an async fetch per key for a fixed lifetime.
///
/// Concurrent callers asking for the same key share a single fetch. A failed
/// fetch leaves nothing behind: the error goes to the caller that ran it, and
/// the next waiting caller runs its own fetch. Fetches for one key never
/// overlap.
pub(crate) struct TtlCache<K, V> {
    name: &'static str,
    ttl: Duration,
    entries: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache; `name` labels log events.
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, calling `fetch` on a miss.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.slot(key);
        if let Some(value) = cell.get() {
            trace!(cache = self.name, "cache hit");
            return Ok(value.clone());
        }

        cell.get_or_try_init(|| async move {
            debug!(cache = self.name, "cache miss");
            fetch().await
        })
        .await
        .cloned()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .values()
            .filter(|slot| now.duration_since(slot.created) < self.ttl)
            .count()
    }

    /// Returns the cell for `key`, replacing it if expired.
    fn slot(&self, key: K) -> Arc<OnceCell<V>> {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut entries = self.lock();

        if let Some(slot) = entries.get(&key) {
            if now.duration_since(slot.created) < ttl {
                return Arc::clone(&slot.cell);
            }
        }

        entries.retain(|_, slot| now.duration_since(slot.created) < ttl);
        let cell = Arc::new(OnceCell::new());
        entries.insert(
            key,
            Slot {
                created: now,
                cell: Arc::clone(&cell),
            },
        );
        cell
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, Slot<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
