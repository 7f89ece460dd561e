//! Inter-trip stop exchange.
//!
//! Swaps one stop of a trip with one stop of another trip, each taking the
//! other's position. First improvement, restarting after every accepted move.

use crate::evaluation::RoutingModel;
use crate::search::{Deadline, PlanState};

/// Applies swap moves until no improving one is left.
///
/// Returns `true` if the plan changed.
pub fn swap_improve(state: &mut PlanState, model: &RoutingModel, deadline: &Deadline) -> bool {
    let mut improved_any = false;
    while !deadline.expired() && find_and_apply(state, model, deadline) {
        improved_any = true;
    }
    improved_any
}

fn find_and_apply(state: &mut PlanState, model: &RoutingModel, deadline: &Deadline) -> bool {
    let slots = model.num_slots();

    for a in 0..slots {
        for b in (a + 1)..slots {
            if state.route(a).is_empty() || state.route(b).is_empty() {
                continue;
            }
            if deadline.expired() {
                return false;
            }
            let load_a = state.load(model, a);
            let load_b = state.load(model, b);

            for i in 0..state.route(a).len() {
                for j in 0..state.route(b).len() {
                    let x = state.route(a)[i];
                    let y = state.route(b)[j];
                    let shift = model.demand(y) - model.demand(x);
                    if load_a + shift > model.capacity(a) || load_b - shift > model.capacity(b) {
                        continue;
                    }

                    let mut route_a = state.route(a).to_vec();
                    let mut route_b = state.route(b).to_vec();
                    route_a[i] = y;
                    route_b[j] = x;
                    if state.try_improve(model, vec![(a, route_a), (b, route_b)]) {
                        return true;
                    }
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::distance::TravelTimeMatrix;
    use crate::models::{RoutingInstance, StopRecord};
    use std::time::Duration;

    #[test]
    fn test_swap_pairs_neighbours() {
        // Two clusters: {1, 2} and {3, 4}. Start with mixed trips.
        let rows = vec![
            vec![0, 10, 10, 10, 10],
            vec![10, 0, 1, 15, 15],
            vec![10, 1, 0, 15, 15],
            vec![10, 15, 15, 0, 1],
            vec![10, 15, 15, 1, 0],
        ];
        let stops: Vec<StopRecord> = (0..5)
            .map(|i| StopRecord::new(format!("P{i}"), format!("L{i}"), 35.0, 139.0))
            .collect();
        let matrix = TravelTimeMatrix::from_rows(rows).expect("valid");
        let config = SolverConfig {
            num_cars: 2,
            capacity: 2,
            max_trips: 1,
            ..SolverConfig::default()
        };
        let inst = RoutingInstance::new(&stops, matrix, &config).expect("valid");
        let model = RoutingModel::build(&inst);
        let mut state = PlanState::empty(&model);
        assert!(state.apply_if_feasible(&model, vec![(0, vec![1, 3]), (1, vec![2, 4])]));
        assert_eq!(state.score().objective, 70);

        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(swap_improve(&mut state, &model, &deadline));
        assert_eq!(state.score().objective, 42);
    }
}
