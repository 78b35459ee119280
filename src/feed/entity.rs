//! Entity Record Module
//!
//! A stored feed entity: its `FeedEntity` bytes plus the `FeedMessage.entity`
//! field prefix that precedes them in the assembled feed.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::record::RecordKind;
use crate::wire::{
    encode_length_delimited_field, FEED_ENTITY_ID, FEED_ENTITY_TRIP_UPDATE, FEED_ENTITY_VEHICLE,
    FEED_MESSAGE_ENTITY,
};

// == Entity Record ==
/// An encoded feed entity, framed once at insertion.
///
/// Both buffers are immutable; `frame_prefix` always declares exactly
/// `payload.len()` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    kind: RecordKind,
    entity_id: u64,
    frame_prefix: Bytes,
    payload: Bytes,
}

impl EntityRecord {
    // == Constructor ==
    /// Wraps an encoded `TripUpdate` or `VehiclePosition` into a `FeedEntity`
    /// with the given serial id and frames it as a feed entity field.
    ///
    /// # Errors
    /// - `FeedError::Capacity` if the entity is too large to frame
    pub fn new(entity_id: u64, kind: RecordKind, submessage: &[u8]) -> Result<Self> {
        let payload = encode_feed_entity(entity_id, kind, submessage)?;
        let frame_prefix = encode_length_delimited_field(FEED_MESSAGE_ENTITY, payload.len())?;

        Ok(Self {
            kind,
            entity_id,
            frame_prefix,
            payload,
        })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Serial id written into `FeedEntity.id`.
    pub fn entity_id(&self) -> u64 {
        self.entity_id
    }

    pub fn frame_prefix(&self) -> &Bytes {
        &self.frame_prefix
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Bytes this entity contributes to the assembled feed.
    pub fn framed_len(&self) -> usize {
        self.frame_prefix.len() + self.payload.len()
    }
}

/// `FeedEntity { id, trip_update | vehicle }` without re-encoding the submessage.
fn encode_feed_entity(entity_id: u64, kind: RecordKind, submessage: &[u8]) -> Result<Bytes> {
    let id = entity_id.to_string();
    let field = match kind {
        RecordKind::TripUpdate => FEED_ENTITY_TRIP_UPDATE,
        RecordKind::VehiclePosition => FEED_ENTITY_VEHICLE,
    };

    let id_prefix = encode_length_delimited_field(FEED_ENTITY_ID, id.len())?;
    let body_prefix = encode_length_delimited_field(field, submessage.len())?;

    let mut entity =
        BytesMut::with_capacity(id_prefix.len() + id.len() + body_prefix.len() + submessage.len());
    entity.put_slice(&id_prefix);
    entity.put_slice(id.as_bytes());
    entity.put_slice(&body_prefix);
    entity.put_slice(submessage);

    Ok(entity.freeze())
}
