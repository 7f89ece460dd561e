//! Path-cheapest-arc construction.
//!
//! # Algorithm
//!
//! Trip slots are filled one at a time in slot order, which puts every
//! vehicle's first trip before any second trip. Starting at the depot, the
//! path is extended with the unrouted stop reached by the cheapest arc from
//! the path's last node, provided the vehicle stays feasible (capacity, stop
//! windows, depot return, turnover). Candidates are ranked by
//! `(travel time, stop index)`, so the result is fully deterministic. When no
//! stop can be appended the slot is closed and the next one is opened.
//!
//! # Complexity
//!
//! O(S · n² log n) schedule evaluations in the worst case, where S = trip
//! slots and n = stops.

use crate::evaluation::RoutingModel;
use crate::models::RoutingInstance;
use crate::search::PlanState;

/// Builds an initial plan with the path-cheapest-arc rule.
///
/// Stops that cannot be appended anywhere are left unassigned; see
/// [`PlanState::unassigned`].
pub fn path_cheapest_arc(model: &RoutingModel) -> PlanState {
    let n = model.instance().num_stops();
    let mut state = PlanState::empty(model);
    let mut routed = vec![false; n];
    routed[RoutingInstance::DEPOT] = true;

    for slot in 0..model.num_slots() {
        loop {
            let current = state
                .route(slot)
                .last()
                .copied()
                .unwrap_or(RoutingInstance::DEPOT);

            let mut candidates: Vec<(i64, usize)> = model
                .customers()
                .filter(|&stop| !routed[stop])
                .filter_map(|stop| model.arc_cost(current, stop).map(|cost| (cost, stop)))
                .collect();
            candidates.sort_unstable();

            let appended = candidates.into_iter().find(|&(_, stop)| {
                let mut route = state.route(slot).to_vec();
                route.push(stop);
                state.apply_if_feasible(model, vec![(slot, route)])
            });

            match appended {
                Some((_, stop)) => routed[stop] = true,
                None => break,
            }
        }

        if routed.iter().all(|&r| r) {
            break;
        }
    }

    state
}
