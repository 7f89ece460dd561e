//! Ruin operators for the perturbation step.
//!
//! # Operators
//!
//! - [`random_removal`] — removes stops picked uniformly at random
//! - [`related_removal`] — removes a random seed stop and its nearest routed
//!   neighbours by travel time
//!
//! Both remove stops one at a time and skip any removal the schedule rejects
//! (with a non-metric matrix, dropping a stop can make a trip longer).
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use rand::Rng;

use crate::distance::UNREACHABLE;
use crate::evaluation::RoutingModel;

use super::PlanState;

/// Removes up to `count` random stops. Returns the removed stops.
pub fn random_removal<R: Rng>(
    state: &mut PlanState,
    model: &RoutingModel,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut routed = routed_stops(state);
    let mut removed = Vec::with_capacity(count);

    while removed.len() < count && !routed.is_empty() {
        let pick = rng.random_range(0..routed.len() as u64) as usize;
        let stop = routed.swap_remove(pick);
        if remove_stop(state, model, stop) {
            removed.push(stop);
        }
    }

    removed
}

/// Removes a random seed stop plus the routed stops closest to it, up to
/// `count` in total. Returns the removed stops.
pub fn related_removal<R: Rng>(
    state: &mut PlanState,
    model: &RoutingModel,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let routed = routed_stops(state);
    if routed.is_empty() || count == 0 {
        return Vec::new();
    }

    let seed = routed[rng.random_range(0..routed.len() as u64) as usize];
    let mut by_relatedness: Vec<(i64, usize)> = routed
        .into_iter()
        .map(|stop| (relatedness(model, seed, stop), stop))
        .collect();
    by_relatedness.sort_unstable();

    let mut removed = Vec::with_capacity(count);
    for (_, stop) in by_relatedness {
        if removed.len() == count {
            break;
        }
        if remove_stop(state, model, stop) {
            removed.push(stop);
        }
    }
    removed
}

/// Shorter direction of travel between two stops; unreachable pairs sort last.
fn relatedness(model: &RoutingModel, a: usize, b: usize) -> i64 {
    if a == b {
        return 0;
    }
    let forward = model.arc_cost(a, b).unwrap_or(UNREACHABLE);
    let backward = model.arc_cost(b, a).unwrap_or(UNREACHABLE);
    forward.min(backward)
}

fn routed_stops(state: &PlanState) -> Vec<usize> {
    state.routes().iter().flatten().copied().collect()
}

fn remove_stop(state: &mut PlanState, model: &RoutingModel, stop: usize) -> bool {
    let Some(slot) = state.routes().iter().position(|r| r.contains(&stop)) else {
        return false;
    };
    let route: Vec<usize> = state.route(slot).iter().copied().filter(|&s| s != stop).collect();
    state.apply_if_feasible(model, vec![(slot, route)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::distance::TravelTimeMatrix;
    use crate::models::{RoutingInstance, StopRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instance() -> RoutingInstance {
        let stops: Vec<StopRecord> = (0..5)
            .map(|i| StopRecord::new(format!("P{i}"), format!("L{i}"), 35.0, 139.0))
            .collect();
        let rows = vec![
            vec![0, 5, 5, 5, 5],
            vec![5, 0, 1, 8, 8],
            vec![5, 1, 0, 8, 8],
            vec![5, 8, 8, 0, 1],
            vec![5, 8, 8, 1, 0],
        ];
        let matrix = TravelTimeMatrix::from_rows(rows).expect("valid");
        let config = SolverConfig {
            num_cars: 2,
            capacity: 4,
            max_trips: 1,
            ..SolverConfig::default()
        };
        RoutingInstance::new(&stops, matrix, &config).expect("valid")
    }

    fn filled(model: &RoutingModel) -> PlanState {
        let mut state = PlanState::empty(model);
        assert!(state.apply_if_feasible(model, vec![(0, vec![1, 2]), (1, vec![3, 4])]));
        state
    }

    #[test]
    fn test_random_removal_count() {
        let inst = instance();
        let model = RoutingModel::build(&inst);
        let mut state = filled(&model);
        let mut rng = StdRng::seed_from_u64(42);

        let removed = random_removal(&mut state, &model, 2, &mut rng);
        assert_eq!(removed.len(), 2);
        let mut unassigned = state.unassigned(&model);
        let mut expected = removed.clone();
        unassigned.sort_unstable();
        expected.sort_unstable();
        assert_eq!(unassigned, expected);
    }

    #[test]
    fn test_random_removal_caps_at_routed() {
        let inst = instance();
        let model = RoutingModel::build(&inst);
        let mut state = filled(&model);
        let mut rng = StdRng::seed_from_u64(7);

        let removed = random_removal(&mut state, &model, 10, &mut rng);
        assert_eq!(removed.len(), 4);
        assert!(state.routes().iter().all(|r| r.is_empty()));
        assert_eq!(state.score().objective, 0);
    }

    #[test]
    fn test_related_removal_takes_cluster() {
        let inst = instance();
        let model = RoutingModel::build(&inst);
        let mut state = filled(&model);
        let mut rng = StdRng::seed_from_u64(3);

        let mut removed = related_removal(&mut state, &model, 2, &mut rng);
        removed.sort_unstable();
        assert!(removed == vec![1, 2] || removed == vec![3, 4]);
    }

    #[test]
    fn test_relatedness_symmetric_min() {
        let inst = instance();
        let model = RoutingModel::build(&inst);
        assert_eq!(relatedness(&model, 1, 1), 0);
        assert_eq!(relatedness(&model, 1, 2), 1);
        assert_eq!(relatedness(&model, 1, 3), 8);
    }
}
