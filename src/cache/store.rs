//! Cache Store Module
//!
//! Bounded key/value map with a fixed TTL and least-recently-used eviction.
//! Backs [`LocalCache`](super::LocalCache).

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    /// Access order; front is most recently used
    recency: VecDeque<String>,
    stats: CacheStats,
    max_entries: usize,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
        }
    }

    // == Set ==
    /// Stores `value`, resetting the TTL of an existing key.
    ///
    /// At capacity, the least recently used key is evicted first.
    pub fn set(&mut self, key: String, value: String) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self.recency.pop_back() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, self.ttl));
        self.touch(&key);
    }

    // == Get ==
    /// Returns the live value for `key`. An expired entry is dropped and
    /// counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.forget(key);
                self.stats.record_expirations(1);
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.entries.contains_key(key);
        self.forget(key);
        existed
    }

    // == Cleanup Expired ==
    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.forget(key);
        }
        self.stats.record_expirations(expired.len());
        expired.len()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        self.recency.retain(|k| k != key);
        self.recency.push_front(key.to_string());
    }

    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
        self.recency.retain(|k| k != key);
    }
}
