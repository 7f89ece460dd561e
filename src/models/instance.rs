//! Routing instance assembled from stops, a travel-time matrix, and a config.

use serde::{Deserialize, Serialize};

use super::fleet::{expand_trip_slots, slot_index, TripSlot};
use super::stop::{Stop, StopRecord, TimeWindow};
use crate::config::SolverConfig;
use crate::distance::TravelTimeMatrix;
use crate::error::{RoutingError, ValidationError};

/// Serializable problem document: stop rows plus an optional matrix.
///
/// When `travel_times` is absent, travel times are approximated from the
/// stop coordinates (see [`TravelTimeMatrix::from_coordinates`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInput {
    pub stops: Vec<StopRecord>,
    #[serde(default)]
    pub travel_times: Option<Vec<Vec<i64>>>,
}

impl ProblemInput {
    pub fn from_json(json: &str) -> Result<Self, RoutingError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A validated, immutable problem instance.
///
/// Stop 0 is the depot. Every stop starts with the global horizon
/// `[start, end]` as its time window; [`RoutingInstance::with_time_window`]
/// narrows individual stops before the instance is handed to the solver.
///
/// # Examples
///
/// ```
/// use u_multitrip::config::SolverConfig;
/// use u_multitrip::distance::TravelTimeMatrix;
/// use u_multitrip::models::{RoutingInstance, StopRecord};
///
/// let stops = vec![
///     StopRecord::new("Facility", "Base", 35.00, 139.00),
///     StopRecord::new("Ito", "Home", 35.01, 139.00),
/// ];
/// let matrix = TravelTimeMatrix::from_rows(vec![vec![0, 8], vec![8, 0]]).unwrap();
/// let config = SolverConfig { num_cars: 2, max_trips: 2, ..SolverConfig::default() };
///
/// let instance = RoutingInstance::new(&stops, matrix, &config).unwrap();
/// assert_eq!(instance.num_stops(), 2);
/// assert_eq!(instance.slots().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingInstance {
    stops: Vec<Stop>,
    matrix: TravelTimeMatrix,
    slots: Vec<TripSlot>,
    vehicle_count: usize,
    max_trips: usize,
    service_time: i64,
    horizon: TimeWindow,
    turnover: i64,
    trip_penalty: i64,
    clock_capacity: i64,
}

impl RoutingInstance {
    /// The depot is always stop 0.
    pub const DEPOT: usize = 0;

    /// Validates the configuration, stops, and matrix, and expands the fleet.
    pub fn new(
        records: &[StopRecord],
        matrix: TravelTimeMatrix,
        config: &SolverConfig,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        if records.is_empty() {
            return Err(ValidationError::NoStops);
        }
        if matrix.size() != records.len() {
            return Err(ValidationError::MatrixRows {
                expected: records.len(),
                actual: matrix.size(),
            });
        }

        let horizon = TimeWindow::new(config.start_minutes, config.end_minutes).ok_or(
            ValidationError::EmptyHorizon {
                start: config.start_minutes,
                end: config.end_minutes,
            },
        )?;
        let stops = records
            .iter()
            .enumerate()
            .map(|(index, record)| Stop::from_record(index, record, horizon))
            .collect::<Result<Vec<_>, _>>()?;

        let unreachable = matrix.unreachable_pairs();
        if unreachable > 0 {
            log::warn!("travel time matrix has {unreachable} unreachable pair(s)");
        }

        Ok(Self {
            stops,
            matrix,
            slots: expand_trip_slots(config.num_cars, config.max_trips, config.capacity),
            vehicle_count: config.num_cars,
            max_trips: config.max_trips,
            service_time: config.service_time_minutes,
            horizon,
            turnover: config.turnover_minutes,
            trip_penalty: config.trip_penalty,
            clock_capacity: config.clock_capacity,
        })
    }

    /// Builds an instance from a problem document, falling back to
    /// great-circle travel times when the document carries no matrix.
    pub fn from_input(input: &ProblemInput, config: &SolverConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let matrix = match &input.travel_times {
            Some(rows) => {
                if rows.len() != input.stops.len() {
                    return Err(ValidationError::MatrixRows {
                        expected: input.stops.len(),
                        actual: rows.len(),
                    });
                }
                TravelTimeMatrix::from_rows(rows.clone())?
            }
            None => {
                let points = input
                    .stops
                    .iter()
                    .enumerate()
                    .map(|(index, record)| {
                        Stop::from_record(index, record, TimeWindow::instant(0))
                            .map(|stop| stop.coordinates())
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                log::info!(
                    "no travel times supplied, approximating {} locations at {} km/h",
                    points.len(),
                    config.fallback_speed_kmh
                );
                TravelTimeMatrix::from_coordinates(&points, config.fallback_speed_kmh)
            }
        };
        Self::new(&input.stops, matrix, config)
    }

    /// Replaces the time window of a single stop.
    pub fn with_time_window(mut self, stop: usize, window: TimeWindow) -> Result<Self, ValidationError> {
        self.stops
            .get_mut(stop)
            .ok_or(ValidationError::UnknownStop(stop))?
            .set_time_window(window);
        Ok(self)
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop(&self, index: usize) -> &Stop {
        &self.stops[index]
    }

    /// Number of stops including the depot.
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn matrix(&self) -> &TravelTimeMatrix {
        &self.matrix
    }

    pub fn slots(&self) -> &[TripSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> &TripSlot {
        &self.slots[index]
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    pub fn max_trips(&self) -> usize {
        self.max_trips
    }

    /// Slot indices of one vehicle in trip-ordinal order.
    pub fn vehicle_slots(&self, vehicle: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.max_trips).map(move |ordinal| slot_index(self.vehicle_count, vehicle, ordinal))
    }

    /// Dwell time at `stop` (0 at the depot).
    pub fn service_time(&self, stop: usize) -> i64 {
        if stop == Self::DEPOT {
            0
        } else {
            self.service_time
        }
    }

    /// Global `[start, end]` horizon.
    pub fn horizon(&self) -> TimeWindow {
        self.horizon
    }

    pub fn turnover(&self) -> i64 {
        self.turnover
    }

    pub fn trip_penalty(&self) -> i64 {
        self.trip_penalty
    }

    pub fn clock_capacity(&self) -> i64 {
        self.clock_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<StopRecord> {
        vec![
            StopRecord::new("Facility", "Base", 35.00, 139.00),
            StopRecord::new("Ito", "Home", 35.01, 139.00),
            StopRecord::new("Sato", "School", 35.02, 139.00),
        ]
    }

    fn matrix() -> TravelTimeMatrix {
        TravelTimeMatrix::from_rows(vec![vec![0, 10, 10], vec![10, 0, 5], vec![10, 5, 0]])
            .expect("valid")
    }

    #[test]
    fn test_new() {
        let config = SolverConfig {
            num_cars: 2,
            max_trips: 3,
            ..SolverConfig::default()
        };
        let instance = RoutingInstance::new(&records(), matrix(), &config).expect("valid");
        assert_eq!(instance.num_stops(), 3);
        assert_eq!(instance.slots().len(), 6);
        assert_eq!(instance.stop(0).demand(), 0);
        assert_eq!(instance.stop(2).demand(), 1);
        assert_eq!(instance.service_time(0), 0);
        assert_eq!(instance.service_time(1), 5);
        assert_eq!(instance.vehicle_slots(1).collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_matrix_size_mismatch() {
        let small = TravelTimeMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).expect("valid");
        let err = RoutingInstance::new(&records(), small, &SolverConfig::default())
            .expect_err("mismatch");
        assert_eq!(
            err,
            ValidationError::MatrixRows {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_rejects_invalid_config_first() {
        let config = SolverConfig {
            num_cars: 0,
            ..SolverConfig::default()
        };
        assert_eq!(
            RoutingInstance::new(&records(), matrix(), &config).expect_err("invalid"),
            ValidationError::NoVehicles
        );
    }

    #[test]
    fn test_empty_stops() {
        let err = RoutingInstance::new(&[], TravelTimeMatrix::new(0), &SolverConfig::default())
            .expect_err("empty");
        assert_eq!(err, ValidationError::NoStops);
    }

    #[test]
    fn test_per_stop_window() {
        let window = TimeWindow::new(1090, 1100).expect("valid");
        let instance = RoutingInstance::new(&records(), matrix(), &SolverConfig::default())
            .expect("valid")
            .with_time_window(2, window)
            .expect("known stop");
        assert_eq!(instance.stop(2).time_window(), window);
        assert_eq!(instance.stop(1).time_window(), instance.horizon());
    }

    #[test]
    fn test_per_stop_window_unknown() {
        let window = TimeWindow::new(1090, 1100).expect("valid");
        let err = RoutingInstance::new(&records(), matrix(), &SolverConfig::default())
            .expect("valid")
            .with_time_window(9, window)
            .expect_err("unknown");
        assert_eq!(err, ValidationError::UnknownStop(9));
    }

    #[test]
    fn test_from_input_with_fallback() {
        let input = ProblemInput {
            stops: records(),
            travel_times: None,
        };
        let instance = RoutingInstance::from_input(&input, &SolverConfig::default()).expect("valid");
        // 0.01 degree of latitude ~1.11 km at 20 km/h ~3.3 min
        assert_eq!(instance.matrix().get(0, 1), 3);
    }

    #[test]
    fn test_from_input_json() {
        let json = r#"{
            "stops": [
                {"person_name": "Facility", "location_label": "Base", "latitude": 35.0, "longitude": 139.0},
                {"person_name": "Ito", "location_label": "Home", "latitude": null, "longitude": 139.0}
            ],
            "travel_times": [[0, 4], [4, 0]]
        }"#;
        let input = ProblemInput::from_json(json).expect("valid json");
        let err = RoutingInstance::from_input(&input, &SolverConfig::default()).expect_err("missing");
        assert!(matches!(
            err,
            ValidationError::MissingCoordinate {
                index: 1,
                field: "latitude",
                ..
            }
        ));
    }
}
