//! Record Encoder
//!
//! Maps canonical records onto GTFS Realtime submessages and encodes them.
//! Encoding is pure: the same record and `now` always yield the same bytes.

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Utc};
use prost::Message;

use crate::encode::stops::{current_delay, infer_stop_position};
use crate::error::{FeedError, Result};
use crate::gtfs_rt::trip_update::stop_time_update::ScheduleRelationship;
use crate::gtfs_rt::trip_update::{StopTimeEvent, StopTimeUpdate};
use crate::gtfs_rt::{Position, TripDescriptor, TripUpdate, VehicleDescriptor, VehiclePosition};
use crate::record::{Identified, Location, MovementRecord, Record, Stopover, TripRecord};

// == Encode Record ==
/// Encodes either record kind into its submessage bytes.
pub fn encode_record(record: &Record, now: DateTime<Utc>) -> Result<Bytes> {
    match record {
        Record::Trip(trip) => encode_trip_update(trip, now),
        Record::Movement(movement) => encode_vehicle_position(movement, now),
    }
}

// == Trip Update ==
/// Encodes a trip as a `TripUpdate` submessage.
///
/// # Errors
/// - `FeedError::UnidentifiableEntity` without trip id or route/vehicle pair
pub fn encode_trip_update(trip: &TripRecord, now: DateTime<Utc>) -> Result<Bytes> {
    ensure_identifiable(trip)?;

    let update = TripUpdate {
        trip: trip_descriptor(trip, trip.direction_id, trip.planned_departure),
        vehicle: vehicle_descriptor(trip.vehicle_id(), trip.headsign.as_deref()),
        stop_time_update: trip.stopovers.iter().map(stop_time_update).collect(),
        timestamp: trip.updated_at,
        delay: current_delay(&trip.stopovers, now),
    };

    Ok(Bytes::from(update.encode_to_vec()))
}

// == Vehicle Position ==
/// Encodes a movement as a `VehiclePosition` submessage.
///
/// # Errors
/// - `FeedError::UnidentifiableEntity` without trip id or route/vehicle pair
/// - `FeedError::Encoding` if the location is not a valid coordinate
pub fn encode_vehicle_position(movement: &MovementRecord, now: DateTime<Utc>) -> Result<Bytes> {
    ensure_identifiable(movement)?;

    let position = movement.location.map(to_position).transpose()?;
    let stop = infer_stop_position(&movement.next_stopovers, now);

    let descriptor = trip_descriptor(
        movement,
        movement.direction_id,
        movement.trip_planned_departure,
    );

    let vehicle_position = VehiclePosition {
        trip: Some(descriptor).filter(|d| *d != TripDescriptor::default()),
        vehicle: vehicle_descriptor(movement.vehicle_id(), movement.headsign.as_deref()),
        position,
        current_stop_sequence: None,
        stop_id: stop.stop_id,
        current_status: stop.status.map(|status| status as i32),
        timestamp: movement.updated_at,
    };

    Ok(Bytes::from(vehicle_position.encode_to_vec()))
}

fn ensure_identifiable<R: Identified>(record: &R) -> Result<()> {
    let by_trip = record.trip_id().is_some();
    let by_vehicle = record.route_id().is_some() && record.vehicle_id().is_some();
    if by_trip || by_vehicle {
        Ok(())
    } else {
        Err(FeedError::UnidentifiableEntity(record.kind()))
    }
}

fn trip_descriptor<R: Identified>(
    record: &R,
    direction_id: Option<u32>,
    planned_departure: Option<DateTime<FixedOffset>>,
) -> TripDescriptor {
    TripDescriptor {
        trip_id: record.trip_id().map(str::to_string),
        route_id: record.route_id().map(str::to_string),
        direction_id,
        start_time: planned_departure.map(|dep| dep.format("%H:%M:%S").to_string()),
        start_date: planned_departure.map(|dep| dep.format("%Y%m%d").to_string()),
    }
}

fn vehicle_descriptor(id: Option<&str>, label: Option<&str>) -> Option<VehicleDescriptor> {
    if id.is_none() && label.is_none() {
        return None;
    }
    Some(VehicleDescriptor {
        id: id.map(str::to_string),
        label: label.map(str::to_string),
        license_plate: None,
    })
}

fn stop_time_update(stopover: &Stopover) -> StopTimeUpdate {
    let relationship = if stopover.cancelled {
        ScheduleRelationship::Skipped
    } else {
        ScheduleRelationship::Scheduled
    };

    StopTimeUpdate {
        stop_sequence: stopover.stop_sequence,
        stop_id: stopover.stop_id.clone().filter(|id| !id.is_empty()),
        arrival: stop_time_event(stopover.arrival, stopover.arrival_delay),
        departure: stop_time_event(stopover.departure, stopover.departure_delay),
        schedule_relationship: Some(relationship as i32),
    }
}

/// Omitted entirely when neither time nor delay is known.
fn stop_time_event(when: Option<DateTime<FixedOffset>>, delay: Option<i32>) -> Option<StopTimeEvent> {
    let time = when.map(unix_seconds);
    if time.is_none() && delay.is_none() {
        return None;
    }
    Some(StopTimeEvent {
        delay,
        time,
        uncertainty: None,
    })
}

/// Unix seconds, rounded half up.
fn unix_seconds(when: DateTime<FixedOffset>) -> i64 {
    (when.timestamp_millis() + 500).div_euclid(1000)
}

fn to_position(location: Location) -> Result<Position> {
    let Location {
        latitude,
        longitude,
    } = location;

    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(FeedError::Encoding(format!("invalid latitude {}", latitude)));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(FeedError::Encoding(format!(
            "invalid longitude {}",
            longitude
        )));
    }

    Ok(Position {
        latitude: latitude as f32,
        longitude: longitude as f32,
        ..Default::default()
    })
}
