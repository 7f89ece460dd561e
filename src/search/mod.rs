//! Search engine: working plan state, time budget and the improvement driver.
//!
//! - [`PlanState`] — feasible routes per trip slot with cached schedules
//! - [`Deadline`] — wall-clock budget
//! - [`SearchEngine`] — construction, local search descent and perturbation
//! - [`ruin`] — removal operators used by the perturbation

mod deadline;
mod engine;
pub mod ruin;
mod state;

pub use deadline::Deadline;
pub use engine::SearchEngine;
pub use state::{PlanState, Trial};
