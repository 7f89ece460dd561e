//! Inter-trip exchange operator (2-opt*).
//!
//! # Algorithm
//!
//! Swaps tail segments between two trip slots. Given
//! A = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and B = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ],
//! produce:
//!
//! A' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! B' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//!
//! Cut points include both ends of each trip, so whole trips may move to
//! another slot (including another vehicle's idle slot). The two slots may
//! belong to the same vehicle. First improvement, restarting after every
//! accepted move.
//!
//! # Complexity
//!
//! O(n² × S²) candidate schedules per pass, where n = stops per trip and
//! S = trip slots.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use crate::evaluation::RoutingModel;
use crate::search::{Deadline, PlanState};

/// Applies 2-opt* tail exchanges until none improves.
///
/// Returns `true` if the plan changed.
pub fn exchange_improve(state: &mut PlanState, model: &RoutingModel, deadline: &Deadline) -> bool {
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
            let len_a = state.route(a).len();
            let len_b = state.route(b).len();
            if len_a == 0 && len_b == 0 {
                continue;
            }
            if deadline.expired() {
                return false;
            }

            for i in 0..=len_a {
                for j in 0..=len_b {
                    // Both tails empty: nothing moves.
                    if i == len_a && j == len_b {
                        continue;
                    }
                    // Both heads empty: the trips just trade slots.
                    if i == 0 && j == 0 && model.vehicle_of(a) == model.vehicle_of(b) {
                        continue;
                    }
                    let (route_a, route_b) = cross(state.route(a), i, state.route(b), j);
                    if route_a == state.route(a) {
                        continue;
                    }
                    let fits = load(model, &route_a) <= model.capacity(a)
                        && load(model, &route_b) <= model.capacity(b);
                    if fits && state.try_improve(model, vec![(a, route_a), (b, route_b)]) {
                        return true;
                    }
                }
            }
        }
    }

    false
}

fn cross(a: &[usize], i: usize, b: &[usize], j: usize) -> (Vec<usize>, Vec<usize>) {
    let mut new_a = a[..i].to_vec();
    new_a.extend_from_slice(&b[j..]);
    let mut new_b = b[..j].to_vec();
    new_b.extend_from_slice(&a[i..]);
    (new_a, new_b)
}

fn load(model: &RoutingModel, route: &[usize]) -> i64 {
    route.iter().map(|&s| model.demand(s)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::distance::TravelTimeMatrix;
    use crate::models::{RoutingInstance, StopRecord};
    use std::time::Duration;

    #[test]
    fn test_cross_tails() {
        let (a, b) = cross(&[1, 2, 3], 1, &[4, 5], 1);
        assert_eq!(a, vec![1, 5]);
        assert_eq!(b, vec![4, 2, 3]);
    }

    #[test]
    fn test_cross_whole_routes() {
        let (a, b) = cross(&[1, 2], 0, &[], 0);
        assert!(a.is_empty());
        assert_eq!(b, vec![1, 2]);
    }

    #[test]
    fn test_exchange_fixes_crossed_tails() {
        // Clusters {1, 2} and {3, 4}; trips start in one cluster and end in the other.
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
        assert!(state.apply_if_feasible(&model, vec![(0, vec![1, 3]), (1, vec![4, 2])]));
        assert_eq!(state.score().objective, 70);

        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(exchange_improve(&mut state, &model, &deadline));
        assert_eq!(state.score().objective, 42);
    }
}
