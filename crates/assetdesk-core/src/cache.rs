//! Time-based read cache
//!
//! Entries carry their own expiry instant. A read inside the TTL window
//! returns the stored value even if the underlying data has changed since;
//! that staleness is accepted.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::time::Clock;

/// Cached value with its expiry
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Keyed cache whose entries expire a fixed TTL after insertion
pub struct TtlCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fresh entry for `key`, if any
    pub fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap();
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .cloned()
    }

    /// Store `value` under `key`, replacing any previous entry
    pub fn insert(&self, key: &str, value: V) -> CacheEntry<V> {
        let now = self.clock.now();
        let expires_at = TimeDelta::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry { value, expires_at };
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), entry.clone());
        entry
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.write().unwrap().remove(key);
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
