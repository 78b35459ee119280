//! Feed Store Module
//!
//! Owns the TTL store of encoded entities and the cached feed buffer built
//! from it.

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};
use prost::Message;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::encode::{compute_key, encode_record};
use crate::error::{FeedError, Result};
use crate::feed::{EntityRecord, FeedStats};
use crate::gtfs_rt::feed_header::Incrementality;
use crate::gtfs_rt::FeedHeader;
use crate::record::{Identified, Record};
use crate::store::{TtlStore, MAX_TTL};
use crate::wire::{encode_length_delimited_field, FEED_MESSAGE_HEADER};

/// Value of `FeedHeader.gtfs_realtime_version`.
pub const GTFS_REALTIME_VERSION: &str = "2.0";

/// Default entity time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

// == Feed Snapshot ==
/// An assembled `FeedMessage` buffer.
///
/// The header timestamp is fixed when the buffer is built, so serving the
/// same snapshot twice yields identical bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Encoded `FeedMessage`
    pub buffer: Bytes,
    /// Header timestamp, Unix seconds
    pub timestamp: u64,
    /// CRC32 of `buffer`
    pub digest: u32,
}

// == Feed Store ==
/// Keyed store of feed entities with a lazily rebuilt feed buffer.
///
/// Every put, effective delete, flush and expiry drops the cached buffer and
/// bumps the change generation seen by [`subscribe`](Self::subscribe) receivers.
#[derive(Debug)]
pub struct FeedStore {
    /// Encoded entities by record signature
    entities: TtlStore<EntityRecord>,
    /// Last assembled feed, if nothing changed since
    cache: Option<FeedSnapshot>,
    /// Entity time-to-live
    ttl: Duration,
    /// Last serial id handed to a feed entity
    last_entity_id: u64,
    /// Activity counters
    stats: FeedStats,
    /// Change generation
    changes: watch::Sender<u64>,
}

impl FeedStore {
    // == Constructor ==
    /// Creates an empty store whose entities expire `ttl` after their last write.
    ///
    /// TTLs above [`MAX_TTL`] are clamped to it.
    pub fn new(ttl: Duration) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            entities: TtlStore::new(),
            cache: None,
            ttl: ttl.min(MAX_TTL),
            last_entity_id: 0,
            stats: FeedStats::new(),
            changes,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Write ==
    /// Encodes and stores a record, returning its store key.
    ///
    /// Re-writing a key always replaces the entity, moves it to the end of
    /// the feed and restarts its TTL, even when the encoded bytes are
    /// unchanged. A failed write leaves the store and cached feed untouched.
    ///
    /// # Errors
    /// - `FeedError::UnidentifiableEntity` if no signature can be derived
    /// - `FeedError::Encoding` if the record cannot be encoded
    /// - `FeedError::Capacity` if the encoded entity cannot be framed
    pub fn write(&mut self, record: &Record) -> Result<String> {
        self.write_at(record, Utc::now())
    }

    /// Like [`write`](Self::write), encoding relative to `now`.
    pub fn write_at(&mut self, record: &Record, now: DateTime<Utc>) -> Result<String> {
        match self.insert(record, now) {
            Ok(key) => {
                debug!(key = %key, entities = self.entities.len(), "Entity stored");
                Ok(key)
            }
            Err(e) => {
                self.stats.record_rejection();
                warn!(kind = %record.kind(), error = %e, "Dropping record");
                Err(e)
            }
        }
    }

    fn insert(&mut self, record: &Record, now: DateTime<Utc>) -> Result<String> {
        let key = compute_key(record).ok_or(FeedError::UnidentifiableEntity(record.kind()))?;
        let submessage = encode_record(record, now)?;

        let entity_id = self.last_entity_id + 1;
        let entity = EntityRecord::new(entity_id, record.kind(), &submessage)?;
        self.last_entity_id = entity_id;

        self.entities.put(key.clone(), entity, self.ttl);
        self.stats.record_write();
        self.invalidate();

        Ok(key)
    }

    // == Delete ==
    /// Removes the entity stored under `key`. Returns false if there was none.
    pub fn delete(&mut self, key: &str) -> bool {
        self.expire_due(Instant::now());
        if self.entities.delete(key).is_none() {
            return false;
        }
        self.stats.record_deletion();
        self.invalidate();
        true
    }

    // == Flush ==
    /// Removes every entity. Returns how many were removed.
    pub fn flush(&mut self) -> usize {
        let removed = self.entities.flush();
        self.invalidate();
        removed
    }

    // == Expire Due ==
    /// Fires all expiry timers due at `now`. Returns how many entities expired.
    pub fn expire_due(&mut self, now: Instant) -> usize {
        let expired = self.entities.expire_due(now);
        if expired.is_empty() {
            return 0;
        }

        for (key, _) in &expired {
            debug!(key = %key, "Entity expired");
        }
        self.stats.record_expirations(expired.len());
        self.invalidate();
        expired.len()
    }

    /// Earliest pending expiry.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entities.next_deadline()
    }

    // == Assemble ==
    /// Returns the encoded `FeedMessage`, rebuilding it only if the store
    /// changed since the last call.
    pub fn assemble(&mut self) -> Result<Bytes> {
        Ok(self.snapshot()?.buffer)
    }

    /// Returns the current feed snapshot, rebuilding it if needed.
    ///
    /// Entities whose TTL has run out are expired first, so the snapshot
    /// never carries them even when no expiry task is running.
    pub fn snapshot(&mut self) -> Result<FeedSnapshot> {
        let timestamp = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        self.snapshot_at(timestamp)
    }

    fn snapshot_at(&mut self, timestamp: u64) -> Result<FeedSnapshot> {
        self.expire_due(Instant::now());

        if let Some(snapshot) = &self.cache {
            self.stats.record_cache_hit();
            return Ok(snapshot.clone());
        }

        let header = FeedHeader {
            gtfs_realtime_version: GTFS_REALTIME_VERSION.to_string(),
            incrementality: Some(Incrementality::Differential as i32),
            timestamp: Some(timestamp),
        }
        .encode_to_vec();
        let header_prefix = encode_length_delimited_field(FEED_MESSAGE_HEADER, header.len())?;

        let total = header_prefix.len()
            + header.len()
            + self
                .entities
                .values()
                .map(EntityRecord::framed_len)
                .sum::<usize>();

        let mut buffer = BytesMut::with_capacity(total);
        buffer.put_slice(&header_prefix);
        buffer.put_slice(&header);
        for entity in self.entities.values() {
            buffer.put_slice(entity.frame_prefix());
            buffer.put_slice(entity.payload());
        }
        let buffer = buffer.freeze();

        let snapshot = FeedSnapshot {
            digest: crc32fast::hash(&buffer),
            buffer,
            timestamp,
        };
        self.stats.record_build();
        debug!(
            entities = self.entities.len(),
            bytes = snapshot.buffer.len(),
            "Feed assembled"
        );

        self.cache = Some(snapshot.clone());
        Ok(snapshot)
    }

    // == Accessors ==
    /// Number of entities whose TTL has not run out.
    ///
    /// Due entities are left out even before their timer fires.
    pub fn count(&self) -> usize {
        self.entities.live_len(Instant::now())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entities.is_live(key, Instant::now())
    }

    /// Keys of unexpired entities in feed order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let now = Instant::now();
        self.entities
            .keys()
            .filter(move |key| self.entities.is_live(key, now))
    }

    pub fn stats(&self) -> FeedStats {
        let mut stats = self.stats.clone();
        stats.set_entities(self.count());
        stats
    }

    // == Change Notification ==
    /// Receiver of the change generation, bumped on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn generation(&self) -> u64 {
        *self.changes.borrow()
    }

    fn invalidate(&mut self) {
        self.cache = None;
        self.stats.set_entities(self.entities.len());
        self.changes.send_modify(|generation| *generation += 1);
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
