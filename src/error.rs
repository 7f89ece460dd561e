//! Error types.
//!
//! Input problems are reported as [`ValidationError`] before any solver work
//! starts. [`RoutingError::NoSolution`] is only produced after the bounded
//! search has run and means the caller should relax the configuration.

/// A malformed stop, matrix, or configuration value.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("at least one stop (the depot) is required")]
    NoStops,
    #[error("stop {index} ({name}) is missing its {field}")]
    MissingCoordinate {
        index: usize,
        name: String,
        field: &'static str,
    },
    #[error("stop {index} ({name}) has a non-numeric {field} '{value}'")]
    NonNumericCoordinate {
        index: usize,
        name: String,
        field: &'static str,
        value: String,
    },
    #[error("stop {index} ({name}) has an out-of-range {field} {value}")]
    CoordinateOutOfRange {
        index: usize,
        name: String,
        field: &'static str,
        value: f64,
    },
    #[error("number of vehicles must be positive")]
    NoVehicles,
    #[error("vehicle capacity must be positive, got {0}")]
    NonPositiveCapacity(i64),
    #[error("max trips must be between 1 and {max}, got {value}")]
    MaxTripsOutOfRange { value: usize, max: usize },
    #[error("start time {start} must be before end time {end}")]
    EmptyHorizon { start: i64, end: i64 },
    #[error("service time must be positive, got {0}")]
    NonPositiveServiceTime(i64),
    #[error("turnover time must not be negative, got {0}")]
    NegativeTurnover(i64),
    #[error("trip penalty must not be negative, got {0}")]
    NegativeTripPenalty(i64),
    #[error("{field} must be at most {max}, got {value}")]
    ValueTooLarge {
        field: &'static str,
        value: i64,
        max: i64,
    },
    #[error("clock capacity {capacity} is below the horizon end {end}")]
    ClockCapacityBelowHorizon { capacity: i64, end: i64 },
    #[error("time limit must be at least one second")]
    ZeroTimeLimit,
    #[error("fallback speed must be positive, got {0}")]
    NonPositiveSpeed(f64),
    #[error("travel time matrix has {actual} rows, expected {expected}")]
    MatrixRows { expected: usize, actual: usize },
    #[error("travel time matrix row {row} has {actual} entries, expected {expected}")]
    MatrixColumns {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("travel time from {from} to {to} is negative ({value})")]
    NegativeTravelTime { from: usize, to: usize, value: i64 },
    #[error("time window [{earliest}, {latest}] is empty")]
    EmptyTimeWindow { earliest: i64, latest: i64 },
    #[error("stop index {0} is out of range")]
    UnknownStop(usize),
}

/// Failure of a solve call.
#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("no feasible plan found: {unassigned} stop(s) could not be routed")]
    NoSolution { unassigned: usize },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RoutingError {
    /// `true` when the input was valid but no plan satisfies the constraints.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, RoutingError::NoSolution { .. })
    }
}
