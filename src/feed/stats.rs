//! Feed Statistics Module
//!
//! Tracks store activity: accepted and rejected writes, removals, and how
//! often the assembled feed was rebuilt versus served from cache.

use serde::Serialize;

// == Feed Stats ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedStats {
    /// Records accepted into the store
    pub writes: u64,
    /// Records dropped as unidentifiable or unencodable
    pub rejected: u64,
    /// Entities removed by explicit delete
    pub deletions: u64,
    /// Entities removed by TTL expiry
    pub expirations: u64,
    /// Feed buffers assembled from scratch
    pub builds: u64,
    /// Feed requests answered from the cached buffer
    pub cache_hits: u64,
    /// Current number of entities in the store
    pub entities: usize,
}

impl FeedStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Cache Hit Rate ==
    /// Share of assemblies served from cache, or 0.0 before the first one.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.builds + self.cache_hits;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    pub fn record_deletion(&mut self) {
        self.deletions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_build(&mut self) {
        self.builds += 1;
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn set_entities(&mut self, count: usize) {
        self.entities = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = FeedStats::new();
        assert_eq!(stats.writes, 0);
        assert_eq!(stats.rejected, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.entities, 0);
    }

    #[test]
    fn test_hit_rate_no_assemblies() {
        assert_eq!(FeedStats::new().cache_hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = FeedStats::new();
        stats.record_build();
        stats.record_cache_hit();
        stats.record_cache_hit();
        stats.record_cache_hit();
        assert_eq!(stats.cache_hit_rate(), 0.75);
    }

    #[test]
    fn test_record_expirations() {
        let mut stats = FeedStats::new();
        stats.record_expirations(3);
        stats.record_expirations(0);
        assert_eq!(stats.expirations, 3);
    }
}
