//! GTFS Realtime Feed - An in-memory GTFS Realtime differential feed server
//!
//! Encodes live trip and movement records into feed entities, keeps them for
//! a fixed TTL and serves them as one `FeedMessage`.

pub mod api;
pub mod config;
pub mod encode;
pub mod error;
pub mod feed;
pub mod models;
pub mod record;
pub mod store;
pub mod tasks;
pub mod wire;

/// Generated GTFS Realtime types.
pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}

pub use api::AppState;
pub use config::Config;
pub use error::{FeedError, Result};
pub use feed::{FeedSnapshot, FeedStore};
pub use record::{Record, RecordKind};
pub use tasks::spawn_expiry_task;
