//! Turns a solved plan into schedule rows and per-trip coordinate paths.

use serde::Serialize;

use crate::error::RoutingError;
use crate::models::{RoutingInstance, Solution};

/// Placeholder for the departure and dwell of a depot return.
pub const NO_VALUE: &str = "-";

/// One line of the printed schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub vehicle_label: String,
    /// 1-based position within the trip, depot departure included.
    pub visit_order: usize,
    pub person_name: String,
    pub location_label: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub dwell: String,
}

/// Ordered coordinates of one used trip, depot at both ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPath {
    pub vehicle_label: String,
    pub vehicle: usize,
    pub ordinal: usize,
    pub points: Vec<(f64, f64)>,
}

/// Everything an adapter needs to present one solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub success: bool,
    pub objective: Option<i64>,
    pub schedule: Vec<ScheduleRow>,
    pub paths: Vec<TripPath>,
}

impl PlanReport {
    /// Builds a report from a solve result. Any error yields a failure report
    /// with no partial schedule.
    pub fn from_result(instance: &RoutingInstance, result: &Result<Solution, RoutingError>) -> Self {
        match result {
            Ok(solution) => Self {
                success: true,
                objective: Some(solution.objective()),
                schedule: extract_schedule(instance, solution),
                paths: trip_paths(instance, solution),
            },
            Err(_) => Self::failure(),
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            objective: None,
            schedule: Vec::new(),
            paths: Vec::new(),
        }
    }
}

/// Renders minutes from midnight as `HH:MM`, wrapping past 24 h.
///
/// # Examples
///
/// ```
/// use u_multitrip::schedule::format_clock;
///
/// assert_eq!(format_clock(1080), "18:00");
/// assert_eq!(format_clock(1445), "00:05");
/// ```
pub fn format_clock(minutes: i64) -> String {
    let m = minutes.rem_euclid(24 * 60);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Schedule rows for every used trip, in slot order.
///
/// Each trip starts with the depot departure (dwell 0), lists its stops with
/// service start, departure and dwell, and ends with the depot return, which
/// has no departure. Idle slots produce no rows.
pub fn extract_schedule(instance: &RoutingInstance, solution: &Solution) -> Vec<ScheduleRow> {
    let depot = instance.stop(RoutingInstance::DEPOT);
    let mut rows = Vec::new();

    for trip in solution.trips().iter().filter(|t| !t.is_empty()) {
        let label = instance.slot(trip.slot).label();

        rows.push(ScheduleRow {
            vehicle_label: label.clone(),
            visit_order: 1,
            person_name: depot.person_name().to_string(),
            location_label: depot.location_label().to_string(),
            arrival_time: format_clock(trip.departure),
            departure_time: format_clock(trip.departure),
            dwell: "0".to_string(),
        });

        for (i, (&index, &start)) in trip.stops.iter().zip(&trip.service_starts).enumerate() {
            let stop = instance.stop(index);
            let dwell = instance.service_time(index);
            rows.push(ScheduleRow {
                vehicle_label: label.clone(),
                visit_order: i + 2,
                person_name: stop.person_name().to_string(),
                location_label: stop.location_label().to_string(),
                arrival_time: format_clock(start),
                departure_time: format_clock(start + dwell),
                dwell: dwell.to_string(),
            });
        }

        rows.push(ScheduleRow {
            vehicle_label: label,
            visit_order: trip.len() + 2,
            person_name: format!("{} (return)", depot.person_name()),
            location_label: depot.location_label().to_string(),
            arrival_time: format_clock(trip.return_time),
            departure_time: NO_VALUE.to_string(),
            dwell: NO_VALUE.to_string(),
        });
    }

    rows
}

/// Coordinate sequence of every used trip, for map rendering.
pub fn trip_paths(instance: &RoutingInstance, solution: &Solution) -> Vec<TripPath> {
    let depot = instance.stop(RoutingInstance::DEPOT).coordinates();
    solution
        .trips()
        .iter()
        .filter(|t| !t.is_empty())
        .map(|trip| {
            let mut points = Vec::with_capacity(trip.len() + 2);
            points.push(depot);
            points.extend(trip.stops.iter().map(|&s| instance.stop(s).coordinates()));
            points.push(depot);
            TripPath {
                vehicle_label: instance.slot(trip.slot).label(),
                vehicle: trip.vehicle,
                ordinal: trip.ordinal,
                points,
            }
        })
        .collect()
}
