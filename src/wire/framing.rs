//! Length-Delimited Field Framing
//!
//! Writes the tag and varint length that precede an embedded message, without
//! touching the payload itself.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FeedError, Result};

/// Protocol buffers wire type for length-delimited fields.
const LENGTH_DELIMITED: u8 = 2;

/// Largest payload length a four byte varint can carry.
pub const MAX_FRAME_LENGTH: usize = (1 << 28) - 1;

/// One tag byte plus at most four varint bytes.
pub const MAX_PREFIX_LEN: usize = 5;

// == Encode Field Prefix ==
/// Encodes the prefix of a length-delimited field: `(field << 3) | 2`
/// followed by `payload_length` as an unsigned LEB128 varint.
///
/// Field numbers must be in `1..16` so the tag stays a single byte.
///
/// # Errors
/// - `FeedError::Capacity` if `payload_length` needs a fifth varint byte
/// - `FeedError::Encoding` if the field number does not fit a one byte tag
pub fn encode_length_delimited_field(field_number: u32, payload_length: usize) -> Result<Bytes> {
    if field_number == 0 || field_number >= 16 {
        return Err(FeedError::Encoding(format!(
            "field number {} does not fit a single tag byte",
            field_number
        )));
    }
    if payload_length > MAX_FRAME_LENGTH {
        return Err(FeedError::Capacity {
            length: payload_length,
        });
    }

    let mut prefix = BytesMut::with_capacity(MAX_PREFIX_LEN);
    prefix.put_u8(((field_number as u8) << 3) | LENGTH_DELIMITED);

    let mut remaining = payload_length;
    while remaining >= 0x80 {
        prefix.put_u8((remaining as u8 & 0x7F) | 0x80);
        remaining >>= 7;
    }
    prefix.put_u8(remaining as u8);

    Ok(prefix.freeze())
}
