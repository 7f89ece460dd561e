//! Solver configuration.
//!
//! Every solve call receives a [`SolverConfig`] explicitly; nothing is read
//! from process-wide state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, ValidationError};

/// Largest number of round trips a vehicle may be configured for.
pub const MAX_TRIPS_LIMIT: usize = 3;

/// Largest accepted clock capacity, one year in minutes. Keeps every clock
/// sum well inside `i64`.
pub const MAX_CLOCK_CAPACITY: i64 = 366 * 24 * 60;

/// Largest accepted activation penalty per later trip.
pub const MAX_TRIP_PENALTY: i64 = 1_000_000_000;

/// Fleet, horizon, and search-budget settings for one solve.
///
/// All clock values are minutes from midnight.
///
/// # Examples
///
/// ```
/// use u_multitrip::config::SolverConfig;
///
/// let config = SolverConfig::from_json(r#"{ "num_cars": 2, "max_trips": 3 }"#).unwrap();
/// assert_eq!(config.num_cars, 2);
/// assert_eq!(config.capacity, 10); // default
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Number of physical vehicles.
    pub num_cars: usize,
    /// Passenger capacity shared by all vehicles.
    pub capacity: i64,
    /// Round trips allowed per vehicle.
    pub max_trips: usize,
    /// Horizon start; first trips leave the depot exactly at this time.
    pub start_minutes: i64,
    /// Horizon end; every visit and depot return must happen by then.
    pub end_minutes: i64,
    /// Dwell time at each passenger stop.
    pub service_time_minutes: i64,
    /// Minimum gap between a trip's depot return and the vehicle's next departure.
    pub turnover_minutes: i64,
    /// Objective penalty for each used trip after a vehicle's first.
    pub trip_penalty: i64,
    /// Absolute upper bound of any trip clock.
    pub clock_capacity: i64,
    /// Wall-clock budget for the improvement phase.
    pub time_limit_secs: u64,
    /// Failed perturbation rounds tolerated before the search stops early.
    pub max_stagnation: usize,
    /// Seed for the perturbation RNG.
    pub seed: u64,
    /// Speed used when travel times are approximated from coordinates.
    pub fallback_speed_kmh: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            num_cars: 5,
            capacity: 10,
            max_trips: 2,
            start_minutes: 18 * 60,
            end_minutes: 19 * 60,
            service_time_minutes: 5,
            turnover_minutes: 10,
            trip_penalty: 1000,
            clock_capacity: 10_000,
            time_limit_secs: 180,
            max_stagnation: 50,
            seed: 42,
            fallback_speed_kmh: 20.0,
        }
    }
}

impl SolverConfig {
    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RoutingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the improvement time budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = limit.as_secs().max(1);
        self
    }

    /// Improvement time budget as a [`Duration`].
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    /// Checks every bound; the first violation found is returned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.num_cars == 0 {
            return Err(ValidationError::NoVehicles);
        }
        if self.capacity <= 0 {
            return Err(ValidationError::NonPositiveCapacity(self.capacity));
        }
        if self.max_trips == 0 || self.max_trips > MAX_TRIPS_LIMIT {
            return Err(ValidationError::MaxTripsOutOfRange {
                value: self.max_trips,
                max: MAX_TRIPS_LIMIT,
            });
        }
        if self.start_minutes >= self.end_minutes {
            return Err(ValidationError::EmptyHorizon {
                start: self.start_minutes,
                end: self.end_minutes,
            });
        }
        if self.service_time_minutes <= 0 {
            return Err(ValidationError::NonPositiveServiceTime(
                self.service_time_minutes,
            ));
        }
        if self.turnover_minutes < 0 {
            return Err(ValidationError::NegativeTurnover(self.turnover_minutes));
        }
        if self.trip_penalty < 0 {
            return Err(ValidationError::NegativeTripPenalty(self.trip_penalty));
        }
        if self.trip_penalty > MAX_TRIP_PENALTY {
            return Err(ValidationError::ValueTooLarge {
                field: "trip_penalty",
                value: self.trip_penalty,
                max: MAX_TRIP_PENALTY,
            });
        }
        if self.clock_capacity > MAX_CLOCK_CAPACITY {
            return Err(ValidationError::ValueTooLarge {
                field: "clock_capacity",
                value: self.clock_capacity,
                max: MAX_CLOCK_CAPACITY,
            });
        }
        if self.clock_capacity < self.end_minutes {
            return Err(ValidationError::ClockCapacityBelowHorizon {
                capacity: self.clock_capacity,
                end: self.end_minutes,
            });
        }
        let bounded = [
            ("start_minutes", self.start_minutes.saturating_abs()),
            ("service_time_minutes", self.service_time_minutes),
            ("turnover_minutes", self.turnover_minutes),
        ];
        for (field, value) in bounded {
            if value > self.clock_capacity {
                return Err(ValidationError::ValueTooLarge {
                    field,
                    value,
                    max: self.clock_capacity,
                });
            }
        }
        if self.time_limit_secs == 0 {
            return Err(ValidationError::ZeroTimeLimit);
        }
        if !(self.fallback_speed_kmh.is_finite() && self.fallback_speed_kmh > 0.0) {
            return Err(ValidationError::NonPositiveSpeed(self.fallback_speed_kmh));
        }
        Ok(())
    }
}
