//! Stopover Record
//!
//! A single stop along a trip, with realtime (or planned) times and delays.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// Half of the dwell window synthesized for zero-length stops.
const DWELL_PADDING_SECS: i64 = 5;

// == Stopover ==
/// Arrival and departure at one stop.
///
/// Times are instants with the offset they were reported in; delays are in
/// seconds relative to the schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stopover {
    #[serde(default)]
    pub stop_id: Option<String>,
    #[serde(default)]
    pub stop_sequence: Option<u32>,
    #[serde(default)]
    pub arrival: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub departure: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub arrival_delay: Option<i32>,
    #[serde(default)]
    pub departure_delay: Option<i32>,
    #[serde(default)]
    pub cancelled: bool,
}

impl Stopover {
    /// A stopover is usable for stop inference if it is served and has a time.
    pub fn is_reasonable(&self) -> bool {
        !self.cancelled && (self.arrival.is_some() || self.departure.is_some())
    }

    /// Widens a zero-length dwell to `[arrival - 5s, departure + 5s]`.
    ///
    /// Consumers treat equal arrival and departure at a stop as an
    /// impossible dwell; any other stopover is returned unchanged.
    pub fn with_dwell_buffer(&self) -> Stopover {
        match (self.arrival, self.departure) {
            (Some(arrival), Some(departure)) if arrival == departure => Stopover {
                arrival: Some(arrival - Duration::seconds(DWELL_PADDING_SECS)),
                departure: Some(departure + Duration::seconds(DWELL_PADDING_SECS)),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// The latest known time at this stop (departure, else arrival).
    pub fn latest_time(&self) -> Option<DateTime<FixedOffset>> {
        self.departure.or(self.arrival)
    }
}
