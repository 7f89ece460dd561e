//! Constraint model and route evaluation.
//!
//! - [`RoutingModel`] — cost, capacity, time, turnover, and penalty data per trip slot
//! - [`PlanEvaluator`] — earliest-start scheduling of trips and vehicles, plan verification

mod evaluator;
mod model;

pub use evaluator::{PlanEvaluator, Score, VehicleSchedule, Violation};
pub use model::RoutingModel;
