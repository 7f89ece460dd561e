//! Cheapest feasible insertion.
//!
//! Places each given stop, in the given order, at the slot and position
//! with the smallest score increase that keeps the plan feasible. Ties are
//! broken by lower activation change, then lower slot index, then earlier
//! position. Also serves as the recreate step of the perturbation.

use crate::evaluation::RoutingModel;
use crate::search::PlanState;

/// Inserts `stops` one by one at their cheapest feasible position.
///
/// Returns the stops that could not be inserted anywhere.
pub fn cheapest_insertion(model: &RoutingModel, state: &mut PlanState, stops: &[usize]) -> Vec<usize> {
    let mut leftover = Vec::new();

    for &stop in stops {
        let mut best: Option<((i64, i64), usize, usize)> = None;
        let demand = model.demand(stop);

        for slot in 0..model.num_slots() {
            if state.load(model, slot) + demand > model.capacity(slot) {
                continue;
            }
            for pos in 0..=state.route(slot).len() {
                let mut route = state.route(slot).to_vec();
                route.insert(pos, stop);
                if let Some(delta) = state.delta(model, vec![(slot, route)]) {
                    if best.as_ref().map_or(true, |b| delta < b.0) {
                        best = Some((delta, slot, pos));
                    }
                }
            }
        }

        match best {
            Some((_, slot, pos)) => {
                let mut route = state.route(slot).to_vec();
                route.insert(pos, stop);
                state.apply_if_feasible(model, vec![(slot, route)]);
            }
            None => leftover.push(stop),
        }
    }

    leftover
}
