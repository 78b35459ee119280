//! Trip Record

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{non_empty, Identified, RecordKind, Stopover};

// == Trip Record ==
/// A full trip with its stopovers, encoded as a `TripUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Dataset trip id
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub direction_id: Option<u32>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    /// Destination shown on the vehicle, used as vehicle label
    #[serde(default)]
    pub headsign: Option<String>,
    /// Planned departure at the first stop; source of start time and date
    #[serde(default)]
    pub planned_departure: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub stopovers: Vec<Stopover>,
    /// Unix seconds of the last realtime update upstream
    #[serde(default)]
    pub updated_at: Option<u64>,
}

impl Identified for TripRecord {
    fn kind(&self) -> RecordKind {
        RecordKind::TripUpdate
    }

    fn trip_id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    fn route_id(&self) -> Option<&str> {
        non_empty(&self.route_id)
    }

    fn vehicle_id(&self) -> Option<&str> {
        non_empty(&self.vehicle_id)
    }
}
