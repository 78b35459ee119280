//! Stop Inference
//!
//! Works out where a vehicle is relative to its stopovers at a given instant.

use chrono::{DateTime, Utc};

use crate::gtfs_rt::vehicle_position::VehicleStopStatus;
use crate::record::Stopover;

// == Stop Position ==
/// Stop id and status reported in a `VehiclePosition`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StopPosition {
    pub stop_id: Option<String>,
    pub status: Option<VehicleStopStatus>,
}

// == Infer Stop Position ==
/// Infers the current or next stop of a vehicle.
///
/// Cancelled and timeless stopovers are ignored and zero-length dwells are
/// widened first. The current stopover is the first one that has not been
/// departed and whose arrival, if known, is not in the future. Without one,
/// the vehicle is in transit to the first stopover with a future arrival or
/// departure. Once `now` is past the last known time, nothing is reported.
pub fn infer_stop_position(stopovers: &[Stopover], now: DateTime<Utc>) -> StopPosition {
    let stopovers: Vec<Stopover> = stopovers
        .iter()
        .filter(|st| st.is_reasonable())
        .map(Stopover::with_dwell_buffer)
        .collect();

    let latest = match stopovers.iter().filter_map(Stopover::latest_time).max() {
        Some(latest) => latest,
        None => return StopPosition::default(),
    };
    if now > latest {
        return StopPosition::default();
    }

    let current = stopovers.iter().find(|st| {
        let arrives_later = st.arrival.is_some_and(|arr| arr > now);
        let departed = st.departure.is_some_and(|dep| dep < now);
        !arrives_later && !departed
    });
    if let Some(current) = current {
        return StopPosition {
            stop_id: current.stop_id.clone(),
            status: Some(VehicleStopStatus::StoppedAt),
        };
    }

    let next = stopovers.iter().find(|st| {
        st.arrival.is_some_and(|arr| arr > now) || st.departure.is_some_and(|dep| dep > now)
    });
    StopPosition {
        stop_id: next.and_then(|st| st.stop_id.clone()),
        status: Some(VehicleStopStatus::InTransitTo),
    }
}

// == Trip Delay ==
/// Delay of the current or upcoming stopover of a trip.
///
/// Picks the first stopover whose departure (or arrival, if it has no
/// departure) is not before `now`, then reports its arrival delay while the
/// arrival is still ahead and its departure delay otherwise.
pub fn current_delay(stopovers: &[Stopover], now: DateTime<Utc>) -> Option<i32> {
    let upcoming = stopovers.iter().find(|st| match (st.departure, st.arrival) {
        (Some(dep), _) => dep >= now,
        (None, Some(arr)) => arr >= now,
        (None, None) => false,
    })?;

    if upcoming.arrival.is_some_and(|arr| arr > now) {
        upcoming.arrival_delay
    } else {
        upcoming.departure_delay
    }
}
