//! API Handlers
//!
//! HTTP request handlers for each feed server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::DateTime;

use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::feed::{FeedSnapshot, FeedStore};
use crate::models::{DeleteResponse, FlushResponse, HealthResponse, StatsResponse, WriteResponse};
use crate::record::{MovementRecord, Record, RecordKind, TripRecord};

/// Media type of the served feed.
pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// Application state shared across all handlers.
///
/// Contains the feed store wrapped in Arc<RwLock<>> so the expiry task and
/// the handlers serialize every mutation through one lock.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe feed store
    pub feed: Arc<RwLock<FeedStore>>,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState with the given feed store and default config.
    pub fn new(feed: FeedStore) -> Self {
        Self::with_config(feed, Config::default())
    }

    pub fn with_config(feed: FeedStore, config: Config) -> Self {
        Self {
            feed: Arc::new(RwLock::new(feed)),
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Initializes the feed store with the configured entity TTL.
    pub fn from_config(config: &Config) -> Self {
        Self::with_config(FeedStore::new(config.entity_ttl()), config.clone())
    }
}

// == Feed ==
/// Handler for GET / and GET /feed.pb
///
/// Serves the assembled `FeedMessage`. A request whose `If-None-Match`
/// matches the current entity tag gets `304 Not Modified` and no body.
pub async fn feed_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    // Write lock: a rebuild replaces the cached snapshot
    let snapshot = state.feed.write().await.snapshot()?;
    let etag = entity_tag(&snapshot);

    if if_none_match(&headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, PROTOBUF_CONTENT_TYPE.to_string()),
            (header::ETAG, etag),
            (header::LAST_MODIFIED, http_date(snapshot.timestamp)),
            (header::CACHE_CONTROL, state.config.feed_cache_control()),
        ],
        snapshot.buffer,
    )
        .into_response())
}

/// Weak entity tag from the buffer length and CRC32.
pub fn entity_tag(snapshot: &FeedSnapshot) -> String {
    format!("W/\"{:x}-{:08x}\"", snapshot.buffer.len(), snapshot.digest)
}

/// Weak comparison of `If-None-Match` against `etag`.
fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    let opaque = |tag: &str| tag.trim().trim_start_matches("W/").to_string();
    let current = opaque(etag);

    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|candidate| candidate.trim() == "*" || opaque(candidate) == current)
}

/// IMF-fixdate for `Last-Modified`.
fn http_date(unix_secs: u64) -> String {
    let secs = i64::try_from(unix_secs).unwrap_or(i64::MAX);
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

// == Writes ==
/// Handler for PUT /trips
///
/// Encodes a trip record and stores it as a `TripUpdate` entity.
pub async fn write_trip_handler(
    State(state): State<AppState>,
    Json(trip): Json<TripRecord>,
) -> Result<Json<WriteResponse>> {
    write_record(&state, Record::from(trip)).await
}

/// Handler for PUT /movements
///
/// Encodes a movement record and stores it as a `VehiclePosition` entity.
pub async fn write_movement_handler(
    State(state): State<AppState>,
    Json(movement): Json<MovementRecord>,
) -> Result<Json<WriteResponse>> {
    write_record(&state, Record::from(movement)).await
}

async fn write_record(state: &AppState, record: Record) -> Result<Json<WriteResponse>> {
    let mut feed = state.feed.write().await;
    let key = feed.write(&record)?;

    Ok(Json(WriteResponse::new(key, feed.count())))
}

// == Deletes ==
/// Handler for DELETE /entities/*key
///
/// Removes one entity by store key. Keys outside the `trip_update:` and
/// `vehicle_position:` namespaces are rejected as bad requests.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    validate_key(&key)?;

    let mut feed = state.feed.write().await;
    if !feed.delete(&key) {
        return Err(FeedError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key, feed.count())))
}

fn validate_key(key: &str) -> Result<()> {
    let namespaced = [RecordKind::TripUpdate, RecordKind::VehiclePosition]
        .iter()
        .filter_map(|kind| key.strip_prefix(kind.as_str())?.strip_prefix(':'))
        .any(|rest| !rest.is_empty());

    if namespaced {
        Ok(())
    } else {
        Err(FeedError::InvalidRequest(format!("Malformed entity key '{}'", key)))
    }
}

/// Handler for DELETE /entities
///
/// Removes every entity.
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    let flushed = state.feed.write().await.flush();
    Json(FlushResponse { flushed })
}

// == Introspection ==
/// Handler for GET /stats
///
/// Returns current feed statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let feed = state.feed.read().await;
    Json(StatsResponse::from(feed.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
