//! Wire Module
//!
//! Low-level protocol buffers framing for the feed envelope.

mod framing;

pub use framing::{encode_length_delimited_field, MAX_FRAME_LENGTH, MAX_PREFIX_LEN};

// == Field Numbers ==
/// `FeedMessage.header`
pub const FEED_MESSAGE_HEADER: u32 = 1;
/// `FeedMessage.entity`
pub const FEED_MESSAGE_ENTITY: u32 = 2;
/// `FeedEntity.id`
pub const FEED_ENTITY_ID: u32 = 1;
/// `FeedEntity.trip_update`
pub const FEED_ENTITY_TRIP_UPDATE: u32 = 3;
/// `FeedEntity.vehicle`
pub const FEED_ENTITY_VEHICLE: u32 = 4;
