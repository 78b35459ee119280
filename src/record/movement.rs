//! Movement Record

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{non_empty, Identified, RecordKind, Stopover};

/// WGS84 coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

// == Movement Record ==
/// A vehicle's current position along a trip, encoded as a `VehiclePosition`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub direction_id: Option<u32>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub headsign: Option<String>,
    #[serde(default)]
    pub trip_planned_departure: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub location: Option<Location>,
    /// Upcoming (and possibly current) stopovers of the trip
    #[serde(default)]
    pub next_stopovers: Vec<Stopover>,
    #[serde(default)]
    pub updated_at: Option<u64>,
}

impl Identified for MovementRecord {
    fn kind(&self) -> RecordKind {
        RecordKind::VehiclePosition
    }

    fn trip_id(&self) -> Option<&str> {
        non_empty(&self.trip_id)
    }

    fn route_id(&self) -> Option<&str> {
        non_empty(&self.route_id)
    }

    fn vehicle_id(&self) -> Option<&str> {
        non_empty(&self.vehicle_id)
    }
}
