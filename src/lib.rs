//! # u-multitrip
//!
//! Multi-trip vehicle routing with time windows: a small fleet, each vehicle
//! allowed several round trips from one depot within a shared horizon, picks
//! up unit-demand stops while respecting capacity, stop windows, depot
//! departure discipline and turnover between trips.
//!
//! ## Modules
//!
//! - [`config`] — Solver configuration (fleet, horizon, search budget)
//! - [`error`] — Validation and infeasibility errors
//! - [`models`] — Stops, trip slots, instances and solved plans
//! - [`distance`] — Travel-time matrix and great-circle fallback
//! - [`evaluation`] — Constraint model and trip scheduling
//! - [`constructive`] — Path-cheapest-arc and cheapest insertion
//! - [`local_search`] — Relocate, swap, 2-opt, Or-opt and 2-opt* operators
//! - [`search`] — Time-bounded search driver with ruin-and-recreate
//! - [`schedule`] — Schedule rows and coordinate paths for presentation
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use u_multitrip::config::SolverConfig;
//! use u_multitrip::models::ProblemInput;
//!
//! let input = ProblemInput::from_json(r#"{
//!     "stops": [
//!         {"person_name": "Facility", "location_label": "Base", "latitude": 35.0, "longitude": 139.0},
//!         {"person_name": "Ito", "location_label": "Home", "latitude": 35.01, "longitude": 139.0},
//!         {"person_name": "Sato", "location_label": "Home", "latitude": 35.02, "longitude": 139.0}
//!     ],
//!     "travel_times": [[0, 10, 10], [10, 0, 5], [10, 5, 0]]
//! }"#).unwrap();
//! let config = SolverConfig { num_cars: 1, max_trips: 1, ..SolverConfig::default() }
//!     .with_time_limit(Duration::from_secs(1));
//!
//! let report = u_multitrip::plan(&input, &config).unwrap();
//! assert!(report.success);
//! assert_eq!(report.objective, Some(25));
//! assert_eq!(report.schedule.len(), 4);
//! ```

pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod schedule;
pub mod search;

use log::info;

use config::SolverConfig;
use error::RoutingError;
use evaluation::RoutingModel;
use models::{ProblemInput, RoutingInstance, Solution};
use schedule::PlanReport;
use search::SearchEngine;

/// Solves one validated instance within the configured time limit.
///
/// Returns [`RoutingError::NoSolution`] when no plan serves every stop.
pub fn solve(instance: &RoutingInstance, config: &SolverConfig) -> Result<Solution, RoutingError> {
    info!(
        "solving {} stop(s) with {} vehicle(s) x {} trip(s), budget {:?}",
        instance.num_stops() - 1,
        instance.vehicle_count(),
        instance.max_trips(),
        config.time_limit()
    );
    let model = RoutingModel::build(instance);
    SearchEngine::new(&model, config).run()
}

/// Validates a problem document, solves it and builds the presentation
/// report.
///
/// Invalid input is an error; an infeasible instance is a report with
/// `success == false`.
pub fn plan(input: &ProblemInput, config: &SolverConfig) -> Result<PlanReport, RoutingError> {
    let instance = RoutingInstance::from_input(input, config)?;
    match solve(&instance, config) {
        Err(err) if !err.is_infeasible() => Err(err),
        result => Ok(PlanReport::from_result(&instance, &result)),
    }
}
