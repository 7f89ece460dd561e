//! Solved plan types.

use serde::Serialize;

/// The timed route of one used trip slot.
///
/// `stops` excludes the depot at both ends. `service_starts[i]` is the clock
/// minute at which `stops[i]` is served; a vehicle arriving earlier waits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripPlan {
    pub slot: usize,
    pub vehicle: usize,
    pub ordinal: usize,
    pub stops: Vec<usize>,
    pub service_starts: Vec<i64>,
    /// Depot departure time.
    pub departure: i64,
    /// Depot return time.
    pub return_time: i64,
    /// Seats taken at the end of the trip.
    pub load: i64,
    /// Sum of matrix travel times along the trip.
    pub travel_time: i64,
}

impl TripPlan {
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// A complete feasible plan.
///
/// Only used slots are listed, ordered by slot index. The objective is the
/// total travel time plus the activation penalty of every used trip after a
/// vehicle's first.
///
/// # Examples
///
/// ```
/// use u_multitrip::models::Solution;
///
/// let sol = Solution::new(Vec::new(), 0, 0);
/// assert_eq!(sol.num_trips(), 0);
/// assert_eq!(sol.objective(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    trips: Vec<TripPlan>,
    objective: i64,
    activations: usize,
}

impl Solution {
    pub fn new(trips: Vec<TripPlan>, objective: i64, activations: usize) -> Self {
        Self {
            trips,
            objective,
            activations,
        }
    }

    pub fn trips(&self) -> &[TripPlan] {
        &self.trips
    }

    /// Travel time plus trip penalties.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Number of used trips with ordinal > 0.
    pub fn activations(&self) -> usize {
        self.activations
    }

    /// Number of used trip slots.
    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    /// Total stops served across all trips.
    pub fn num_served(&self) -> usize {
        self.trips.iter().map(TripPlan::len).sum()
    }

    /// Total matrix travel time, without penalties.
    pub fn travel_time(&self) -> i64 {
        self.trips.iter().map(|t| t.travel_time).sum()
    }

    /// The trip serving slot `slot`, if it is used.
    pub fn trip_for_slot(&self, slot: usize) -> Option<&TripPlan> {
        self.trips.iter().find(|t| t.slot == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(slot: usize, ordinal: usize, stops: Vec<usize>, travel_time: i64) -> TripPlan {
        let n = stops.len();
        TripPlan {
            slot,
            vehicle: 0,
            ordinal,
            stops,
            service_starts: vec![0; n],
            departure: 0,
            return_time: 0,
            load: n as i64,
            travel_time,
        }
    }

    #[test]
    fn test_solution_totals() {
        let sol = Solution::new(
            vec![trip(0, 0, vec![1, 2], 25), trip(1, 1, vec![3], 12)],
            1037,
            1,
        );
        assert_eq!(sol.num_trips(), 2);
        assert_eq!(sol.num_served(), 3);
        assert_eq!(sol.travel_time(), 37);
        assert_eq!(sol.activations(), 1);
        assert!(sol.trip_for_slot(1).is_some());
        assert!(sol.trip_for_slot(2).is_none());
    }
}
