//! Insertion Order Module
//!
//! Tracks the position of keys in store order.

use std::collections::{BTreeMap, HashMap};

// == Insertion Order ==
/// Tracks insertion/touch order of keys.
///
/// Every touch hands out a fresh sequence number, so the key with the
/// smallest sequence is the head and the most recently touched key is the
/// tail. Moving a key is O(log n).
#[derive(Debug, Default)]
pub struct InsertionOrder {
    /// Keys by sequence number
    by_seq: BTreeMap<u64, String>,
    /// Current sequence number of each key
    seq_of: HashMap<String, u64>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty order tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Moves `key` to the tail, appending it if it is new.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_seq.insert(seq, key.to_string());
        self.seq_of.insert(key.to_string(), seq);
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns false if it was not tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.seq_of.remove(key) {
            Some(seq) => {
                self.by_seq.remove(&seq);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.by_seq.clear();
        self.seq_of.clear();
    }

    // == Iterate ==
    /// Keys from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_seq.values().map(String::as_str)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.seq_of.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.seq_of.is_empty()
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.seq_of.contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(order: &InsertionOrder) -> Vec<&str> {
        order.iter().collect()
    }

    #[test]
    fn test_order_new() {
        let order = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn test_touch_appends() {
        let mut order = InsertionOrder::new();

        order.touch("a");
        order.touch("b");
        order.touch("c");

        assert_eq!(keys(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_touch_existing_moves_to_tail() {
        let mut order = InsertionOrder::new();

        order.touch("a");
        order.touch("b");
        order.touch("c");
        order.touch("a");

        assert_eq!(order.len(), 3);
        assert_eq!(keys(&order), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_remove() {
        let mut order = InsertionOrder::new();

        order.touch("a");
        order.touch("b");
        order.touch("c");

        assert!(order.remove("b"));
        assert!(!order.remove("b"));

        assert_eq!(keys(&order), vec!["a", "c"]);
        assert!(!order.contains("b"));
    }

    #[test]
    fn test_touch_same_key_multiple_times() {
        let mut order = InsertionOrder::new();

        order.touch("a");
        order.touch("a");
        order.touch("a");

        assert_eq!(order.len(), 1);
        assert_eq!(keys(&order), vec!["a"]);
    }

    #[test]
    fn test_clear() {
        let mut order = InsertionOrder::new();

        order.touch("a");
        order.touch("b");
        order.clear();

        assert!(order.is_empty());
        assert_eq!(order.iter().count(), 0);
    }
}
