//! TTL Store Module
//!
//! Keyed storage combining insertion order tracking with per-key expiry.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::store::{InsertionOrder, TimerQueue};

/// Longest accepted time-to-live. Longer TTLs are clamped so a deadline can
/// always be represented as an `Instant`.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == TTL Store ==
/// Ordered keyed store where every entry owns exactly one expiry timer.
///
/// Re-inserting a key replaces its value, moves it to the tail and re-arms
/// its timer. The set of keys with a pending timer always equals the set of
/// keys with an entry.
#[derive(Debug)]
pub struct TtlStore<V> {
    /// Key-value storage
    values: HashMap<String, V>,
    /// Insertion/touch order
    order: InsertionOrder,
    /// Pending expiry timers
    timers: TimerQueue,
}

impl<V> Default for TtlStore<V> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            order: InsertionOrder::new(),
            timers: TimerQueue::new(),
        }
    }
}

impl<V> TtlStore<V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Put ==
    /// Inserts or replaces `key`, expiring `ttl` from now.
    ///
    /// Returns the replaced value, if any.
    pub fn put(&mut self, key: impl Into<String>, value: V, ttl: Duration) -> Option<V> {
        self.put_at(key, value, ttl, Instant::now())
    }

    /// Like [`put`](Self::put) with an explicit current instant.
    pub fn put_at(
        &mut self,
        key: impl Into<String>,
        value: V,
        ttl: Duration,
        now: Instant,
    ) -> Option<V> {
        let key = key.into();

        // Old timer goes first so it can never fire for the new value
        let previous = self.delete(&key);

        self.timers.schedule(&key, now + ttl.min(MAX_TTL));
        self.order.touch(&key);
        self.values.insert(key, value);

        previous
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<&V> {
        self.values.get(key)
    }

    // == Contains ==
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry and cancels its timer. No-op if absent.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let value = self.values.remove(key)?;
        self.timers.cancel(key);
        self.order.remove(key);
        Some(value)
    }

    // == Flush ==
    /// Removes all entries and cancels all timers. Returns how many were removed.
    pub fn flush(&mut self) -> usize {
        let removed = self.values.len();
        self.values.clear();
        self.order.clear();
        self.timers.clear();
        removed
    }

    // == Expire Due ==
    /// Fires every timer due at `now`, deleting its entry.
    ///
    /// Returns the expired entries in firing order.
    pub fn expire_due(&mut self, now: Instant) -> Vec<(String, V)> {
        let mut expired = Vec::new();
        while let Some(key) = self.timers.pop_due(now) {
            if let Some(value) = self.values.remove(&key) {
                self.order.remove(&key);
                expired.push((key, value));
            }
        }
        expired
    }

    // == Deadlines ==
    /// Earliest pending expiry.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Pending expiry of `key`.
    pub fn deadline_of(&self, key: &str) -> Option<Instant> {
        self.timers.deadline_of(key)
    }

    // == Iteration ==
    /// Keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter()
    }

    /// Values in store order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Entries in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        let values = &self.values;
        self.order
            .iter()
            .filter_map(move |key| values.get(key).map(|value| (key, value)))
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Entries whose timer is not yet due at `now`.
    pub fn live_len(&self, now: Instant) -> usize {
        self.values.len() - self.timers.due_count(now)
    }

    /// Whether `key` is stored and not yet due at `now`.
    pub fn is_live(&self, key: &str, now: Instant) -> bool {
        self.timers
            .deadline_of(key)
            .is_some_and(|deadline| deadline > now)
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every entry is ordered and armed, and nothing else is.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.order.len() == self.values.len()
            && self.timers.len() == self.values.len()
            && self
                .values
                .keys()
                .all(|key| self.order.contains(key) && self.timers.is_armed(key))
    }
}
