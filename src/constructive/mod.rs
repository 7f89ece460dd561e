//! Constructive heuristics for building initial plans.
//!
//! - [`path_cheapest_arc`] — Greedy path extension slot by slot, O(S·n² log n)
//! - [`cheapest_insertion`] — Cheapest feasible insertion of leftover stops, O(n·S·L)

mod insertion;
mod path_cheapest_arc;

pub use insertion::cheapest_insertion;
pub use path_cheapest_arc::path_cheapest_arc;
