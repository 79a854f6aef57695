//! Cache Entry Module
//!
//! A stored value and the instant it stops being served.

use std::time::{Duration, Instant};

// == Cache Entry ==
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: String,
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Creates an entry that expires `ttl` from now.
    pub fn new(value: String, ttl: Duration) -> Self {
        Self::written_at(value, ttl, Instant::now())
    }

    pub fn written_at(value: String, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now + ttl,
        }
    }

    /// An entry is expired once `now` reaches its expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
