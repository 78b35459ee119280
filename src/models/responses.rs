//! Response DTOs for the feed server API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::feed::FeedStats;

/// Response body for record writes (PUT /trips, PUT /movements)
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// Store key the record was filed under
    pub key: String,
    /// Entities in the feed after the write
    pub entities: usize,
}

impl WriteResponse {
    pub fn new(key: impl Into<String>, entities: usize) -> Self {
        Self {
            key: key.into(),
            entities,
        }
    }
}

/// Response body for the DELETE /entities/*key operation
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
    /// Entities left in the feed
    pub entities: usize,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>, entities: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Entity '{}' deleted successfully", key),
            key,
            entities,
        }
    }
}

/// Response body for the DELETE /entities operation
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// Number of entities removed
    pub flushed: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: FeedStats,
    /// Share of feed requests served from the cached buffer
    pub cache_hit_rate: f64,
}

impl From<FeedStats> for StatsResponse {
    fn from(stats: FeedStats) -> Self {
        Self {
            cache_hit_rate: stats.cache_hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
