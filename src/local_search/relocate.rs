//! Single-stop relocation operator.
//!
//! # Algorithm
//!
//! Tries moving each routed stop to every other position, in its own trip or
//! in any other trip slot (including idle ones). The first move that keeps
//! the plan feasible and strictly lowers the score is applied, then the scan
//! restarts from the beginning. Stops when a full pass finds nothing or the
//! deadline expires.
//!
//! # Complexity
//!
//! O(n² · S) candidate schedules per pass, where n = stops and S = trip slots.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::evaluation::RoutingModel;
use crate::search::{Deadline, PlanState};

/// Applies relocate moves until no improving one is left.
///
/// Returns `true` if the plan changed.
pub fn relocate_improve(state: &mut PlanState, model: &RoutingModel, deadline: &Deadline) -> bool {
    let mut improved_any = false;
    while !deadline.expired() && find_and_apply(state, model, deadline) {
        improved_any = true;
    }
    improved_any
}

fn find_and_apply(state: &mut PlanState, model: &RoutingModel, deadline: &Deadline) -> bool {
    let slots = model.num_slots();

    for from in 0..slots {
        for from_pos in 0..state.route(from).len() {
            if deadline.expired() {
                return false;
            }
            let stop = state.route(from)[from_pos];
            let mut source = state.route(from).to_vec();
            source.remove(from_pos);

            for to in 0..slots {
                if to == from {
                    for to_pos in 0..=source.len() {
                        if to_pos == from_pos {
                            continue;
                        }
                        let mut route = source.clone();
                        route.insert(to_pos, stop);
                        if state.try_improve(model, vec![(from, route)]) {
                            return true;
                        }
                    }
                    continue;
                }

                if state.load(model, to) + model.demand(stop) > model.capacity(to) {
                    continue;
                }
                for to_pos in 0..=state.route(to).len() {
                    let mut target = state.route(to).to_vec();
                    target.insert(to_pos, stop);
                    if state.try_improve(model, vec![(from, source.clone()), (to, target)]) {
                        return true;
                    }
                }
            }
        }
    }

    false
}
