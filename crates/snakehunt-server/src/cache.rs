//! A small expiring map.
//!
//! [`TtlCache`] stores values for a fixed time-to-live. Reads of an expired
//! entry remove it and miss. Writers invalidate explicitly when the data
//! behind an entry changes.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

pub struct TtlCache<K, V> {
    entries: DashMap<K, (Instant, V)>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns a clone of a live entry.
    pub fn get(&self, key: &K) -> Option<V> {
        let hit = self.entries.get(key).and_then(|entry| {
            let (expires_at, value) = entry.value();
            (Instant::now() < *expires_at).then(|| value.clone())
        });
        if hit.is_none() {
            // The read guard is dropped above; removing here cannot deadlock.
            self.entries
                .remove_if(key, |_, (expires_at, _)| Instant::now() >= *expires_at);
        }
        hit
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, (Instant::now() + self.ttl, value));
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
