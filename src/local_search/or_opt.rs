//! Or-opt segment relocation.
//!
//! # Algorithm
//!
//! Tries moving segments of 2 or 3 consecutive stops to another position,
//! either in the same trip or in any other trip slot, keeping their order.
//! Single stops are left to [`relocate_improve`](super::relocate_improve).
//! First improvement, restarting after every accepted move.
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

const SEGMENT_LENGTHS: [usize; 2] = [2, 3];

/// Applies Or-opt segment moves until none improves.
///
/// Returns `true` if the plan changed.
pub fn or_opt_improve(state: &mut PlanState, model: &RoutingModel, deadline: &Deadline) -> bool {
    let mut improved_any = false;
    while !deadline.expired() && find_and_apply(state, model, deadline) {
        improved_any = true;
    }
    improved_any
}

fn find_and_apply(state: &mut PlanState, model: &RoutingModel, deadline: &Deadline) -> bool {
    let slots = model.num_slots();

    for seg_len in SEGMENT_LENGTHS {
        for from in 0..slots {
            let n = state.route(from).len();
            if n < seg_len {
                continue;
            }
            for start in 0..=(n - seg_len) {
                if deadline.expired() {
                    return false;
                }
                let mut source = state.route(from).to_vec();
                let segment: Vec<usize> = source.drain(start..start + seg_len).collect();
                let seg_load: i64 = segment.iter().map(|&s| model.demand(s)).sum();

                for to in 0..slots {
                    if to == from {
                        for pos in 0..=source.len() {
                            if pos == start {
                                continue;
                            }
                            let route = splice(&source, pos, &segment);
                            if state.try_improve(model, vec![(from, route)]) {
                                return true;
                            }
                        }
                        continue;
                    }

                    if state.load(model, to) + seg_load > model.capacity(to) {
                        continue;
                    }
                    for pos in 0..=state.route(to).len() {
                        let target = splice(state.route(to), pos, &segment);
                        if state.try_improve(model, vec![(from, source.clone()), (to, target)]) {
                            return true;
                        }
                    }
                }
            }
        }
    }

    false
}

/// `route` with `segment` inserted before position `pos`.
fn splice(route: &[usize], pos: usize, segment: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(route.len() + segment.len());
    out.extend_from_slice(&route[..pos]);
    out.extend_from_slice(segment);
    out.extend_from_slice(&route[pos..]);
    out
}
