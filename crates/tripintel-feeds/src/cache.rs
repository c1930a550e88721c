//! In-process TTL cache backing the degradation tiers.
//!
//! Entries past their TTL are not evicted: a stale entry is still the
//! "last good" payload served when the upstream is down.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

pub(crate) struct TtlCache<T> {
    entries: Mutex<HashMap<String, Entry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the entry only if it is within its TTL.
    pub(crate) async fn get_fresh(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|e| e.stored_at.elapsed() <= self.ttl)
            .map(|e| e.value.clone())
    }

    /// Returns the entry regardless of age.
    pub(crate) async fn get_any(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().await;
        entries.get(key).map(|e| e.value.clone())
    }

    pub(crate) async fn put(&self, key: &str, value: T) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}
