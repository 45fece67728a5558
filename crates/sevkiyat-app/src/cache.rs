//! Explicit result cache
//!
//! The caller owns the cache object and passes it into the service, which
//! keeps aggregation runs deterministic and testable. No module-level
//! mutable state.

use chrono::{DateTime, Duration, Utc};

/// Single-entry cache with an expiry timestamp
#[derive(Debug)]
pub struct TimedCache<T> {
    entry: Option<(T, DateTime<Utc>)>,
    ttl: Duration,
}

impl<T> TimedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// Return the cached value if it has not expired at `now`
    pub fn get(&self, now: DateTime<Utc>) -> Option<&T> {
        match &self.entry {
            Some((value, expires_at)) if now < *expires_at => Some(value),
            _ => None,
        }
    }

    /// Store a value, stamping its expiry from `now`
    pub fn put(&mut self, value: T, now: DateTime<Utc>) {
        self.entry = Some((value, now + self.ttl));
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
