//! Record Signatures
//!
//! Derives the store key for a record. Keys depend only on the record's own
//! identifiers, never on the serial id written into the feed entity, so a
//! re-delivered record lands in the same slot.

use crate::record::Identified;

// == Compute Key ==
/// Computes the kind-namespaced identity key of a record.
///
/// Prefers the trip id and falls back to route id plus vehicle id. Returns
/// `None` when neither is available; such records cannot be stored.
///
/// # Examples
/// - trip update with trip id `t1`: `trip_update:trip:t1`
/// - vehicle position without trip id: `vehicle_position:vehicle:r1:v7`
pub fn compute_key<R: Identified + ?Sized>(record: &R) -> Option<String> {
    let kind = record.kind();

    if let Some(trip_id) = record.trip_id() {
        return Some(format!("{}:trip:{}", kind, trip_id));
    }

    match (record.route_id(), record.vehicle_id()) {
        (Some(route_id), Some(vehicle_id)) => {
            Some(format!("{}:vehicle:{}:{}", kind, route_id, vehicle_id))
        }
        _ => None,
    }
}
