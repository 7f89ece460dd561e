//! Intra-trip 2-opt.
//!
//! # Algorithm
//!
//! For each pair of positions (i, j) in a trip, reverse the segment
//! `route[i..=j]`. The matrix may be asymmetric, so the reversed trip's
//! travel time is recomputed in full and only cheaper candidates are
//! scheduled; the schedule then decides feasibility against stop windows,
//! the depot return and turnover. First improvement, restarting after every
//! accepted move.
//!
//! # Complexity
//!
//! O(n³) per pass for a trip of n stops.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::evaluation::RoutingModel;
use crate::models::RoutingInstance;
use crate::search::{Deadline, PlanState};

/// Applies 2-opt reversals to every trip until none improves.
///
/// Returns `true` if the plan changed.
pub fn two_opt_improve(state: &mut PlanState, model: &RoutingModel, deadline: &Deadline) -> bool {
    let mut improved_any = false;
    for slot in 0..model.num_slots() {
        while !deadline.expired() && improve_slot(state, model, slot) {
            improved_any = true;
        }
    }
    improved_any
}

fn improve_slot(state: &mut PlanState, model: &RoutingModel, slot: usize) -> bool {
    let n = state.route(slot).len();
    if n < 2 {
        return false;
    }
    let Some(current) = route_travel_time(model, state.route(slot)) else {
        return false;
    };

    for i in 0..n - 1 {
        for j in i + 1..n {
            let mut candidate = state.route(slot).to_vec();
            candidate[i..=j].reverse();
            let cheaper = route_travel_time(model, &candidate).is_some_and(|t| t < current);
            if cheaper && state.try_improve(model, vec![(slot, candidate)]) {
                return true;
            }
        }
    }

    false
}

/// Travel time of `depot → route[0] → … → route[n-1] → depot`, or `None` if
/// the trip uses an unreachable arc. An empty trip costs nothing.
pub fn route_travel_time(model: &RoutingModel, route: &[usize]) -> Option<i64> {
    if route.is_empty() {
        return Some(0);
    }
    let depot = RoutingInstance::DEPOT;
    let mut total = 0;
    let mut prev = depot;
    for &stop in route.iter().chain(std::iter::once(&depot)) {
        total += model.arc_cost(prev, stop)?;
        prev = stop;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::distance::{TravelTimeMatrix, UNREACHABLE};
    use crate::models::StopRecord;
    use std::time::Duration;

    fn instance(rows: Vec<Vec<i64>>) -> RoutingInstance {
        let stops: Vec<StopRecord> = (0..rows.len())
            .map(|i| StopRecord::new(format!("P{i}"), format!("L{i}"), 35.0, 139.0))
            .collect();
        let matrix = TravelTimeMatrix::from_rows(rows).expect("valid");
        let config = SolverConfig {
            num_cars: 1,
            max_trips: 1,
            ..SolverConfig::default()
        };
        RoutingInstance::new(&stops, matrix, &config).expect("valid")
    }

    fn line() -> Vec<Vec<i64>> {
        vec![
            vec![0, 3, 6, 9],
            vec![3, 0, 3, 6],
            vec![6, 3, 0, 3],
            vec![9, 6, 3, 0],
        ]
    }

    #[test]
    fn test_route_travel_time() {
        let inst = instance(line());
        let model = RoutingModel::build(&inst);
        assert_eq!(route_travel_time(&model, &[]), Some(0));
        assert_eq!(route_travel_time(&model, &[2]), Some(12));
        assert_eq!(route_travel_time(&model, &[1, 2, 3]), Some(18));
    }

    #[test]
    fn test_route_travel_time_unreachable() {
        let mut rows = line();
        rows[1][2] = UNREACHABLE;
        let inst = instance(rows);
        let model = RoutingModel::build(&inst);
        assert_eq!(route_travel_time(&model, &[1, 2]), None);
        assert_eq!(route_travel_time(&model, &[2, 1]), Some(12));
    }

    #[test]
    fn test_2opt_untangles_trip() {
        let inst = instance(line());
        let model = RoutingModel::build(&inst);
        let mut state = PlanState::empty(&model);
        assert!(state.apply_if_feasible(&model, vec![(0, vec![2, 1, 3])]));
        assert_eq!(state.score().objective, 24);

        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(two_opt_improve(&mut state, &model, &deadline));
        assert_eq!(state.score().objective, 18);
    }

    #[test]
    fn test_2opt_already_optimal() {
        let inst = instance(line());
        let model = RoutingModel::build(&inst);
        let mut state = PlanState::empty(&model);
        assert!(state.apply_if_feasible(&model, vec![(0, vec![1, 2, 3])]));

        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(!two_opt_improve(&mut state, &model, &deadline));
        assert_eq!(state.route(0), &[1, 2, 3]);
    }
}
