//! Record Module
//!
//! Canonical trip and movement records as delivered by the schedule matcher.
//! Upstream alias resolution has already happened by the time a record gets
//! here; every field has exactly one name.

mod movement;
mod stopover;
mod trip;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use movement::{Location, MovementRecord};
pub use stopover::Stopover;
pub use trip::TripRecord;

// == Record Kind ==
/// Which feed entity a record turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    TripUpdate,
    VehiclePosition,
}

impl RecordKind {
    /// Namespace used in store keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::TripUpdate => "trip_update",
            RecordKind::VehiclePosition => "vehicle_position",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Identified ==
/// Identifiers shared by every record kind.
pub trait Identified {
    fn kind(&self) -> RecordKind;
    fn trip_id(&self) -> Option<&str>;
    fn route_id(&self) -> Option<&str>;
    fn vehicle_id(&self) -> Option<&str>;
}

// == Record ==
/// Either record kind, as accepted by the feed store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Trip(TripRecord),
    Movement(MovementRecord),
}

impl Identified for Record {
    fn kind(&self) -> RecordKind {
        match self {
            Record::Trip(trip) => trip.kind(),
            Record::Movement(movement) => movement.kind(),
        }
    }

    fn trip_id(&self) -> Option<&str> {
        match self {
            Record::Trip(trip) => trip.trip_id(),
            Record::Movement(movement) => movement.trip_id(),
        }
    }

    fn route_id(&self) -> Option<&str> {
        match self {
            Record::Trip(trip) => trip.route_id(),
            Record::Movement(movement) => movement.route_id(),
        }
    }

    fn vehicle_id(&self) -> Option<&str> {
        match self {
            Record::Trip(trip) => trip.vehicle_id(),
            Record::Movement(movement) => movement.vehicle_id(),
        }
    }
}

impl From<TripRecord> for Record {
    fn from(trip: TripRecord) -> Self {
        Record::Trip(trip)
    }
}

impl From<MovementRecord> for Record {
    fn from(movement: MovementRecord) -> Self {
        Record::Movement(movement)
    }
}

/// Treats empty strings like missing identifiers.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
