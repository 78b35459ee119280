//! Feed Module
//!
//! Keyed entity storage and assembly of the served `FeedMessage`.

mod entity;
mod stats;
mod store;

// Re-export public types
pub use entity::EntityRecord;
pub use stats::FeedStats;
pub use store::{FeedSnapshot, FeedStore, DEFAULT_TTL, GTFS_REALTIME_VERSION};
