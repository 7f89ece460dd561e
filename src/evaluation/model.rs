//! Constraint model over the trip-slot expanded fleet.
//!
//! The model fixes, per slot, everything the search needs to judge a route:
//!
//! - **Arc cost**: the matrix travel time; unreachable arcs have no cost and
//!   can never be used.
//! - **Clock**: leaving stop `i` for stop `j` advances the trip clock by
//!   `service(i) + travel(i, j)`. The clock is capped by a permissive
//!   absolute capacity; only the windows below restrict timing.
//! - **Capacity**: the running demand of a trip never exceeds the slot capacity.
//! - **Stop windows**: each stop is served inside its own window.
//! - **Departure discipline**: first trips leave exactly at the depot window
//!   start; later trips anywhere inside the depot window.
//! - **Return window**: every trip is back at the depot inside the depot window.
//! - **Turnover**: a trip leaves no earlier than the vehicle's previous used
//!   trip returned plus the turnover time.
//! - **Activation penalty**: each used trip after a vehicle's first adds a
//!   fixed penalty to the objective.

use crate::models::{RoutingInstance, TimeWindow};

/// Per-slot constraint data derived once from a [`RoutingInstance`].
///
/// # Examples
///
/// ```
/// use u_multitrip::config::SolverConfig;
/// use u_multitrip::distance::TravelTimeMatrix;
/// use u_multitrip::evaluation::RoutingModel;
/// use u_multitrip::models::{RoutingInstance, StopRecord};
///
/// let stops = vec![
///     StopRecord::new("Facility", "Base", 35.0, 139.0),
///     StopRecord::new("Ito", "Home", 35.01, 139.0),
/// ];
/// let matrix = TravelTimeMatrix::from_rows(vec![vec![0, 8], vec![8, 0]]).unwrap();
/// let config = SolverConfig { num_cars: 1, max_trips: 2, ..SolverConfig::default() };
/// let instance = RoutingInstance::new(&stops, matrix, &config).unwrap();
///
/// let model = RoutingModel::build(&instance);
/// assert_eq!(model.departure_window(0).latest(), 1080); // first trip: pinned
/// assert_eq!(model.departure_window(1).latest(), 1140); // second trip: free
/// assert_eq!(model.predecessor(1), Some(0));
/// assert_eq!(model.activation_penalty(1), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingModel<'a> {
    instance: &'a RoutingInstance,
    departure_windows: Vec<TimeWindow>,
    return_windows: Vec<TimeWindow>,
    predecessors: Vec<Option<usize>>,
    activation_penalties: Vec<i64>,
}

impl<'a> RoutingModel<'a> {
    /// Builds the model for every trip slot of the instance.
    pub fn build(instance: &'a RoutingInstance) -> Self {
        let depot_window = instance.stop(RoutingInstance::DEPOT).time_window();
        let vehicle_count = instance.vehicle_count();

        let mut departure_windows = Vec::with_capacity(instance.slots().len());
        let mut return_windows = Vec::with_capacity(instance.slots().len());
        let mut predecessors = Vec::with_capacity(instance.slots().len());
        let mut activation_penalties = Vec::with_capacity(instance.slots().len());

        for slot in instance.slots() {
            if slot.ordinal() == 0 {
                departure_windows.push(TimeWindow::instant(depot_window.earliest()));
                predecessors.push(None);
                activation_penalties.push(0);
            } else {
                departure_windows.push(depot_window);
                predecessors.push(Some(slot.index() - vehicle_count));
                activation_penalties.push(instance.trip_penalty());
            }
            return_windows.push(depot_window);
        }

        Self {
            instance,
            departure_windows,
            return_windows,
            predecessors,
            activation_penalties,
        }
    }

    pub fn instance(&self) -> &'a RoutingInstance {
        self.instance
    }

    pub fn num_slots(&self) -> usize {
        self.departure_windows.len()
    }

    pub fn num_vehicles(&self) -> usize {
        self.instance.vehicle_count()
    }

    /// Stops excluding the depot, in increasing index order.
    pub fn customers(&self) -> impl Iterator<Item = usize> {
        1..self.instance.num_stops()
    }

    /// Objective cost of driving `from → to`, `None` if unreachable.
    pub fn arc_cost(&self, from: usize, to: usize) -> Option<i64> {
        self.instance.matrix().travel_time(from, to)
    }

    /// Dwell time at `stop` before leaving it.
    pub fn service_time(&self, stop: usize) -> i64 {
        self.instance.service_time(stop)
    }

    pub fn demand(&self, stop: usize) -> i64 {
        self.instance.stop(stop).demand()
    }

    pub fn capacity(&self, slot: usize) -> i64 {
        self.instance.slot(slot).capacity()
    }

    pub fn stop_window(&self, stop: usize) -> TimeWindow {
        self.instance.stop(stop).time_window()
    }

    /// Allowed depot departure times of a slot.
    pub fn departure_window(&self, slot: usize) -> TimeWindow {
        self.departure_windows[slot]
    }

    /// Allowed depot return times of a slot.
    pub fn return_window(&self, slot: usize) -> TimeWindow {
        self.return_windows[slot]
    }

    /// The slot holding the same vehicle's previous trip ordinal.
    pub fn predecessor(&self, slot: usize) -> Option<usize> {
        self.predecessors[slot]
    }

    pub fn turnover(&self) -> i64 {
        self.instance.turnover()
    }

    /// Objective penalty charged when `slot` is used.
    pub fn activation_penalty(&self, slot: usize) -> i64 {
        self.activation_penalties[slot]
    }

    pub fn clock_capacity(&self) -> i64 {
        self.instance.clock_capacity()
    }

    pub fn vehicle_of(&self, slot: usize) -> usize {
        self.instance.slot(slot).vehicle()
    }

    pub fn ordinal_of(&self, slot: usize) -> usize {
        self.instance.slot(slot).ordinal()
    }

    /// Slots of `vehicle` in trip-ordinal order.
    pub fn vehicle_slots(&self, vehicle: usize) -> impl Iterator<Item = usize> + 'a {
        self.instance.vehicle_slots(vehicle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::distance::{TravelTimeMatrix, UNREACHABLE};
    use crate::models::StopRecord;

    fn instance(num_cars: usize, max_trips: usize) -> RoutingInstance {
        let stops = vec![
            StopRecord::new("Facility", "Base", 35.0, 139.0),
            StopRecord::new("Ito", "Home", 35.01, 139.0),
            StopRecord::new("Sato", "Home", 35.02, 139.0),
        ];
        let matrix = TravelTimeMatrix::from_rows(vec![
            vec![0, 10, UNREACHABLE],
            vec![10, 0, 5],
            vec![10, 5, 0],
        ])
        .expect("valid");
        let config = SolverConfig {
            num_cars,
            max_trips,
            ..SolverConfig::default()
        };
        RoutingInstance::new(&stops, matrix, &config).expect("valid")
    }

    #[test]
    fn test_slot_windows() {
        let inst = instance(2, 3);
        let model = RoutingModel::build(&inst);
        assert_eq!(model.num_slots(), 6);
        for slot in 0..2 {
            assert_eq!(model.departure_window(slot), TimeWindow::instant(1080));
        }
        for slot in 2..6 {
            assert_eq!(model.departure_window(slot), inst.horizon());
        }
        for slot in 0..6 {
            assert_eq!(model.return_window(slot), inst.horizon());
        }
    }

    #[test]
    fn test_predecessors_link_same_vehicle() {
        let inst = instance(2, 3);
        let model = RoutingModel::build(&inst);
        assert_eq!(model.predecessor(0), None);
        assert_eq!(model.predecessor(1), None);
        assert_eq!(model.predecessor(2), Some(0));
        assert_eq!(model.predecessor(5), Some(3));
        for slot in 2..6 {
            let prev = model.predecessor(slot).expect("linked");
            assert_eq!(model.vehicle_of(prev), model.vehicle_of(slot));
            assert_eq!(model.ordinal_of(prev) + 1, model.ordinal_of(slot));
        }
    }

    #[test]
    fn test_activation_penalties() {
        let inst = instance(1, 3);
        let model = RoutingModel::build(&inst);
        assert_eq!(model.activation_penalty(0), 0);
        assert_eq!(model.activation_penalty(1), 1000);
        assert_eq!(model.activation_penalty(2), 1000);
    }

    #[test]
    fn test_unreachable_arc_has_no_cost() {
        let inst = instance(1, 1);
        let model = RoutingModel::build(&inst);
        assert_eq!(model.arc_cost(0, 1), Some(10));
        assert_eq!(model.arc_cost(0, 2), None);
        assert_eq!(model.arc_cost(2, 0), Some(10));
    }

    #[test]
    fn test_customers_exclude_depot() {
        let inst = instance(1, 1);
        let model = RoutingModel::build(&inst);
        assert_eq!(model.customers().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(model.demand(0), 0);
        assert_eq!(model.demand(1), 1);
    }
}
