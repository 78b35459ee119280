//! Encode Module
//!
//! Turns canonical records into store keys and GTFS Realtime submessages.

mod encoder;
mod signature;
mod stops;

pub use encoder::{encode_record, encode_trip_update, encode_vehicle_position};
pub use signature::compute_key;
pub use stops::{current_delay, infer_stop_position, StopPosition};
