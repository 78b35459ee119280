//! Timer Queue Module
//!
//! One-shot expiry timers keyed by store key.

use std::collections::{BTreeMap, HashMap};

use tokio::time::Instant;

// == Timer Queue ==
/// A delay queue holding at most one pending timer per key.
///
/// Timers are ordered by deadline, ties broken by arming order. Cancelling
/// removes the scheduled timer for a key outright, so a cancelled timer can
/// never fire.
#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Pending timers ordered by (deadline, timer id)
    queue: BTreeMap<(Instant, u64), String>,
    /// Scheduled slot of each key
    armed: HashMap<String, (Instant, u64)>,
    /// Next timer id
    next_id: u64,
}

impl TimerQueue {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Schedule ==
    /// Arms a timer for `key` at `deadline`, cancelling any earlier one.
    pub fn schedule(&mut self, key: &str, deadline: Instant) {
        self.cancel(key);

        let slot = (deadline, self.next_id);
        self.next_id += 1;
        self.queue.insert(slot, key.to_string());
        self.armed.insert(key.to_string(), slot);
    }

    // == Cancel ==
    /// Cancels the pending timer for `key`. Returns false if none was armed.
    pub fn cancel(&mut self, key: &str) -> bool {
        match self.armed.remove(key) {
            Some(slot) => {
                self.queue.remove(&slot);
                true
            }
            None => false,
        }
    }

    // == Pop Due ==
    /// Removes and returns the key of the earliest timer due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<String> {
        let (&slot, _) = self.queue.first_key_value()?;
        if slot.0 > now {
            return None;
        }
        let key = self.queue.remove(&slot)?;
        self.armed.remove(&key);
        Some(key)
    }

    /// Number of timers due at `now` that have not been popped yet.
    pub fn due_count(&self, now: Instant) -> usize {
        self.queue.range(..=(now, u64::MAX)).count()
    }

    // == Next Deadline ==
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    // == Deadline Of ==
    pub fn deadline_of(&self, key: &str) -> Option<Instant> {
        self.armed.get(key).map(|(deadline, _)| *deadline)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.queue.clear();
        self.armed.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.armed.len()
    }

    // == Is Armed ==
    pub fn is_armed(&self, key: &str) -> bool {
        self.armed.contains_key(key)
    }
}
