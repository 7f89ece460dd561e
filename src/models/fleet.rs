//! Trip-slot expansion of a physical fleet.
//!
//! A vehicle that may drive several sequential round trips is represented by
//! one [`TripSlot`] per trip. Slots live in a flat array where slot `s`
//! belongs to vehicle `s % vehicle_count` and has trip ordinal
//! `s / vehicle_count`, so all first trips come before all second trips.
//! Consecutive trips of one vehicle are linked by index, never by mutating a
//! shared vehicle.

use serde::Serialize;

/// One usable round trip of one physical vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripSlot {
    index: usize,
    vehicle: usize,
    ordinal: usize,
    capacity: i64,
}

impl TripSlot {
    /// Position of this slot in the slot array.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Physical vehicle id (0-based).
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Trip ordinal within the vehicle (0 = first trip).
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Seats available on this trip.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Display name, e.g. `Vehicle 2 (Trip 1)`.
    pub fn label(&self) -> String {
        format!("Vehicle {} (Trip {})", self.vehicle + 1, self.ordinal + 1)
    }
}

/// Expands `vehicle_count` vehicles into `vehicle_count × max_trips` slots.
///
/// `max_trips` must be at least 1.
///
/// # Examples
///
/// ```
/// use u_multitrip::models::expand_trip_slots;
///
/// let slots = expand_trip_slots(2, 3, 10);
/// assert_eq!(slots.len(), 6);
/// assert_eq!((slots[3].vehicle(), slots[3].ordinal()), (1, 1));
/// ```
pub fn expand_trip_slots(vehicle_count: usize, max_trips: usize, capacity: i64) -> Vec<TripSlot> {
    debug_assert!(max_trips >= 1);
    (0..vehicle_count * max_trips)
        .map(|index| TripSlot {
            index,
            vehicle: index % vehicle_count,
            ordinal: index / vehicle_count,
            capacity,
        })
        .collect()
}

/// Inverse of the slot mapping: the slot index of `(vehicle, ordinal)`.
pub fn slot_index(vehicle_count: usize, vehicle: usize, ordinal: usize) -> usize {
    ordinal * vehicle_count + vehicle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_count() {
        assert_eq!(expand_trip_slots(5, 2, 10).len(), 10);
        assert_eq!(expand_trip_slots(3, 1, 10).len(), 3);
    }

    #[test]
    fn test_mapping_is_invertible() {
        let slots = expand_trip_slots(3, 3, 8);
        for slot in &slots {
            assert_eq!(slot_index(3, slot.vehicle(), slot.ordinal()), slot.index());
            assert_eq!(slot.capacity(), 8);
        }
    }

    #[test]
    fn test_first_trips_come_first() {
        let slots = expand_trip_slots(2, 2, 4);
        let ordinals: Vec<usize> = slots.iter().map(|s| s.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 0, 1, 1]);
        let vehicles: Vec<usize> = slots.iter().map(|s| s.vehicle()).collect();
        assert_eq!(vehicles, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_label() {
        let slots = expand_trip_slots(2, 2, 4);
        assert_eq!(slots[0].label(), "Vehicle 1 (Trip 1)");
        assert_eq!(slots[3].label(), "Vehicle 2 (Trip 2)");
    }
}
