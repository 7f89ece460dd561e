//! Local search operators over a [`PlanState`](crate::search::PlanState).
//!
//! Every operator uses first improvement, accepts only strict score
//! decreases that keep the plan feasible, and stops at the deadline.
//!
//! - [`relocate_improve`] — Single-stop move, within or across trips
//! - [`swap_improve`] — Stop exchange across trips
//! - [`two_opt_improve`] — Intra-trip segment reversal
//! - [`or_opt_improve`] — 2- and 3-stop segment move
//! - [`exchange_improve`] — Inter-trip tail exchange (2-opt*)

mod exchange;
mod or_opt;
mod relocate;
mod swap;
mod two_opt;

pub use exchange::exchange_improve;
pub use or_opt::or_opt_improve;
pub use relocate::relocate_improve;
pub use swap::swap_improve;
pub use two_opt::{route_travel_time, two_opt_improve};

use crate::evaluation::RoutingModel;
use crate::search::{Deadline, PlanState};

/// Signature shared by all operators.
pub type Operator = fn(&mut PlanState, &RoutingModel, &Deadline) -> bool;

/// Operators in the order the descent applies them.
pub const OPERATORS: [(&str, Operator); 5] = [
    ("relocate", relocate_improve),
    ("swap", swap_improve),
    ("two_opt", two_opt_improve),
    ("or_opt", or_opt_improve),
    ("exchange", exchange_improve),
];
