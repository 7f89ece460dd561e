//! Trip and vehicle scheduling against the constraint model.

use std::iter::Sum;
use std::ops::Add;

use super::RoutingModel;
use crate::models::{RoutingInstance, Solution, TripPlan};

/// A constraint violation found while scheduling or verifying a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Running load exceeded the slot capacity.
    CapacityExceeded { slot: usize, load: i64, capacity: i64 },
    /// A route uses an unreachable arc.
    UnreachableArc { slot: usize, from: usize, to: usize },
    /// Arrival after the stop's window closed.
    TimeWindowViolated {
        slot: usize,
        stop: usize,
        arrival: i64,
        latest: i64,
    },
    /// The trip cannot leave the depot inside its departure window.
    DepartureWindowViolated {
        slot: usize,
        departure: i64,
        earliest: i64,
        latest: i64,
    },
    /// Depot return after the depot window closed.
    ReturnWindowViolated {
        slot: usize,
        return_time: i64,
        latest: i64,
    },
    /// A trip clock ran past the clock capacity.
    ClockCapacityExceeded { slot: usize, time: i64, capacity: i64 },
    /// A trip leaves before the vehicle's previous trip returned plus turnover.
    TurnoverViolated { slot: usize, departure: i64, ready: i64 },
    /// Recorded service times do not follow from the travel times.
    InconsistentTiming { slot: usize, stop: usize },
    /// A stop appears on no trip.
    Unserved { stop: usize },
    /// A stop appears more than once.
    DuplicateVisit { stop: usize },
}

/// Lexicographic search score: objective first, then used later trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub objective: i64,
    pub activations: usize,
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score {
            objective: self.objective + rhs.objective,
            activations: self.activations + rhs.activations,
        }
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Score {
        iter.fold(Score::default(), Add::add)
    }
}

/// All used trips of one physical vehicle, timed as early as possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSchedule {
    pub trips: Vec<TripPlan>,
    pub travel_time: i64,
    pub penalty: i64,
    pub activations: usize,
}

impl VehicleSchedule {
    pub fn score(&self) -> Score {
        Score {
            objective: self.travel_time + self.penalty,
            activations: self.activations,
        }
    }
}

/// Schedules routes under a [`RoutingModel`].
///
/// Each trip departs as early as its departure window and the turnover
/// allow. Waiting is allowed at stops, so the earliest schedule is feasible
/// whenever any schedule for the same stop orders is. Unused slots take no
/// time; the turnover links a trip to the vehicle's closest earlier used trip.
///
/// # Examples
///
/// ```
/// use u_multitrip::config::SolverConfig;
/// use u_multitrip::distance::TravelTimeMatrix;
/// use u_multitrip::evaluation::{PlanEvaluator, RoutingModel};
/// use u_multitrip::models::{RoutingInstance, StopRecord};
///
/// let stops = vec![
///     StopRecord::new("Facility", "Base", 35.0, 139.0),
///     StopRecord::new("Ito", "Home", 35.01, 139.0),
///     StopRecord::new("Sato", "Home", 35.02, 139.0),
/// ];
/// let matrix = TravelTimeMatrix::from_rows(vec![
///     vec![0, 10, 10],
///     vec![10, 0, 5],
///     vec![10, 5, 0],
/// ]).unwrap();
/// let config = SolverConfig { num_cars: 1, max_trips: 1, ..SolverConfig::default() };
/// let instance = RoutingInstance::new(&stops, matrix, &config).unwrap();
/// let model = RoutingModel::build(&instance);
///
/// let trip = PlanEvaluator::new(&model).schedule_trip(0, &[1, 2], None).unwrap();
/// assert_eq!(trip.service_starts, vec![1090, 1100]);
/// assert_eq!(trip.return_time, 1115);
/// assert_eq!(trip.travel_time, 25);
/// ```
pub struct PlanEvaluator<'a> {
    model: &'a RoutingModel<'a>,
}

impl<'a> PlanEvaluator<'a> {
    pub fn new(model: &'a RoutingModel<'a>) -> Self {
        Self { model }
    }

    /// Times a single trip. `ready` is the earliest departure imposed by the
    /// vehicle's previous trip, if any.
    pub fn schedule_trip(
        &self,
        slot: usize,
        stops: &[usize],
        ready: Option<i64>,
    ) -> Result<TripPlan, Violation> {
        let model = self.model;
        let depot = RoutingInstance::DEPOT;
        let capacity = model.capacity(slot);
        let clock_capacity = model.clock_capacity();

        let window = model.departure_window(slot);
        let departure = ready.map_or(window.earliest(), |r| r.max(window.earliest()));
        if window.is_violated(departure) {
            return Err(Violation::DepartureWindowViolated {
                slot,
                departure,
                earliest: window.earliest(),
                latest: window.latest(),
            });
        }

        let mut service_starts = Vec::with_capacity(stops.len());
        let mut clock = departure;
        let mut load = 0;
        let mut travel_time = 0;
        let mut prev = depot;

        for &stop in stops {
            load += model.demand(stop);
            if load > capacity {
                return Err(Violation::CapacityExceeded {
                    slot,
                    load,
                    capacity,
                });
            }

            let travel = model
                .arc_cost(prev, stop)
                .ok_or(Violation::UnreachableArc {
                    slot,
                    from: prev,
                    to: stop,
                })?;
            travel_time += travel;
            let arrival = clock + model.service_time(prev) + travel;

            let window = model.stop_window(stop);
            if window.is_violated(arrival) {
                return Err(Violation::TimeWindowViolated {
                    slot,
                    stop,
                    arrival,
                    latest: window.latest(),
                });
            }
            let start = arrival + window.waiting_time(arrival);
            if start > clock_capacity {
                return Err(Violation::ClockCapacityExceeded {
                    slot,
                    time: start,
                    capacity: clock_capacity,
                });
            }

            service_starts.push(start);
            clock = start;
            prev = stop;
        }

        let travel = model
            .arc_cost(prev, depot)
            .ok_or(Violation::UnreachableArc {
                slot,
                from: prev,
                to: depot,
            })?;
        travel_time += travel;
        let return_time = clock + model.service_time(prev) + travel;

        let window = model.return_window(slot);
        if window.is_violated(return_time) {
            return Err(Violation::ReturnWindowViolated {
                slot,
                return_time,
                latest: window.latest(),
            });
        }
        if return_time > clock_capacity {
            return Err(Violation::ClockCapacityExceeded {
                slot,
                time: return_time,
                capacity: clock_capacity,
            });
        }

        Ok(TripPlan {
            slot,
            vehicle: model.vehicle_of(slot),
            ordinal: model.ordinal_of(slot),
            stops: stops.to_vec(),
            service_starts,
            departure,
            return_time,
            load,
            travel_time,
        })
    }

    /// Times every used trip of `vehicle`. `routes` is indexed by slot.
    pub fn schedule_vehicle(
        &self,
        vehicle: usize,
        routes: &[Vec<usize>],
    ) -> Result<VehicleSchedule, Violation> {
        let mut schedule = VehicleSchedule {
            trips: Vec::new(),
            travel_time: 0,
            penalty: 0,
            activations: 0,
        };
        let mut ready = None;

        for slot in self.model.vehicle_slots(vehicle) {
            let stops = &routes[slot];
            if stops.is_empty() {
                continue;
            }
            let trip = self.schedule_trip(slot, stops, ready)?;
            ready = Some(trip.return_time + self.model.turnover());
            schedule.travel_time += trip.travel_time;
            let penalty = self.model.activation_penalty(slot);
            schedule.penalty += penalty;
            if self.model.ordinal_of(slot) > 0 {
                schedule.activations += 1;
            }
            schedule.trips.push(trip);
        }

        Ok(schedule)
    }

    /// Checks a finished plan against every constraint without trusting the
    /// search. Returns all violations found; empty means feasible.
    pub fn verify(&self, solution: &Solution) -> Vec<Violation> {
        let model = self.model;
        let instance = model.instance();
        let mut violations = Vec::new();

        let mut visits = vec![0usize; instance.num_stops()];
        for trip in solution.trips() {
            for &stop in &trip.stops {
                visits[stop] += 1;
            }
        }
        for stop in model.customers() {
            match visits[stop] {
                0 => violations.push(Violation::Unserved { stop }),
                1 => {}
                _ => violations.push(Violation::DuplicateVisit { stop }),
            }
        }

        for trip in solution.trips() {
            self.verify_trip(trip, &mut violations);
        }

        for vehicle in 0..model.num_vehicles() {
            let mut previous: Option<&TripPlan> = None;
            for slot in model.vehicle_slots(vehicle) {
                let Some(trip) = solution.trip_for_slot(slot) else {
                    continue;
                };
                if let Some(prev) = previous {
                    let ready = prev.return_time + model.turnover();
                    if trip.departure < ready {
                        violations.push(Violation::TurnoverViolated {
                            slot,
                            departure: trip.departure,
                            ready,
                        });
                    }
                }
                previous = Some(trip);
            }
        }

        violations
    }

    fn verify_trip(&self, trip: &TripPlan, violations: &mut Vec<Violation>) {
        let model = self.model;
        let slot = trip.slot;
        let depot = RoutingInstance::DEPOT;

        let window = model.departure_window(slot);
        if !window.contains(trip.departure) {
            violations.push(Violation::DepartureWindowViolated {
                slot,
                departure: trip.departure,
                earliest: window.earliest(),
                latest: window.latest(),
            });
        }

        let mut load = 0;
        let mut clock = trip.departure;
        let mut prev = depot;
        for (&stop, &start) in trip.stops.iter().zip(&trip.service_starts) {
            load += model.demand(stop);
            if load > model.capacity(slot) {
                violations.push(Violation::CapacityExceeded {
                    slot,
                    load,
                    capacity: model.capacity(slot),
                });
            }
            match model.arc_cost(prev, stop) {
                Some(travel) => {
                    if start < clock + model.service_time(prev) + travel {
                        violations.push(Violation::InconsistentTiming { slot, stop });
                    }
                }
                None => violations.push(Violation::UnreachableArc {
                    slot,
                    from: prev,
                    to: stop,
                }),
            }
            let window = model.stop_window(stop);
            if !window.contains(start) {
                violations.push(Violation::TimeWindowViolated {
                    slot,
                    stop,
                    arrival: start,
                    latest: window.latest(),
                });
            }
            clock = start;
            prev = stop;
        }

        match model.arc_cost(prev, depot) {
            Some(travel) => {
                if trip.return_time < clock + model.service_time(prev) + travel {
                    violations.push(Violation::InconsistentTiming { slot, stop: depot });
                }
            }
            None => violations.push(Violation::UnreachableArc {
                slot,
                from: prev,
                to: depot,
            }),
        }
        let window = model.return_window(slot);
        if !window.contains(trip.return_time) {
            violations.push(Violation::ReturnWindowViolated {
                slot,
                return_time: trip.return_time,
                latest: window.latest(),
            });
        }
    }
}
