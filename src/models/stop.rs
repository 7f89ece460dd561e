//! Stop and time window types.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A closed interval of clock minutes, `[earliest, latest]`.
///
/// A vehicle may arrive before `earliest` and wait; arriving after `latest`
/// is a violation.
///
/// # Examples
///
/// ```
/// use u_multitrip::models::TimeWindow;
///
/// let tw = TimeWindow::new(1080, 1140).unwrap();
/// assert!(tw.contains(1100));
/// assert_eq!(tw.waiting_time(1070), 10);
/// assert!(tw.is_violated(1141));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    earliest: i64,
    latest: i64,
}

impl TimeWindow {
    /// Creates a new time window. Returns `None` if `earliest > latest`.
    pub fn new(earliest: i64, latest: i64) -> Option<Self> {
        (earliest <= latest).then_some(Self { earliest, latest })
    }

    /// A zero-width window pinned at `at`.
    pub fn instant(at: i64) -> Self {
        Self {
            earliest: at,
            latest: at,
        }
    }

    pub fn earliest(&self) -> i64 {
        self.earliest
    }

    pub fn latest(&self) -> i64 {
        self.latest
    }

    /// Returns `true` if `time` falls inside the window.
    pub fn contains(&self, time: i64) -> bool {
        time >= self.earliest && time <= self.latest
    }

    /// Minutes spent waiting if arriving at `arrival`.
    pub fn waiting_time(&self, arrival: i64) -> i64 {
        (self.earliest - arrival).max(0)
    }

    /// Returns `true` if arriving at `arrival` is too late.
    pub fn is_violated(&self, arrival: i64) -> bool {
        arrival > self.latest
    }
}

/// A raw stop row as delivered by an upstream source.
///
/// Index 0 of a stop list is the depot. Coordinates are optional so that a
/// missing value can be reported instead of silently defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    pub person_name: String,
    pub location_label: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StopRecord {
    /// Creates a record with known coordinates.
    pub fn new(
        person_name: impl Into<String>,
        location_label: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            person_name: person_name.into(),
            location_label: location_label.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Parses a record whose coordinates arrive as text (e.g. spreadsheet cells).
    ///
    /// `index` is only used for error reporting. Blank cells are reported as
    /// missing, anything else that does not parse as a number as non-numeric.
    pub fn parse(
        index: usize,
        person_name: &str,
        location_label: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<Self, ValidationError> {
        let parse_field = |field: &'static str, text: &str| -> Result<Option<f64>, ValidationError> {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map(Some)
                .map_err(|_| ValidationError::NonNumericCoordinate {
                    index,
                    name: person_name.to_string(),
                    field,
                    value: text.to_string(),
                })
        };
        Ok(Self {
            person_name: person_name.to_string(),
            location_label: location_label.to_string(),
            latitude: parse_field("latitude", latitude)?,
            longitude: parse_field("longitude", longitude)?,
        })
    }
}

/// A normalized, immutable stop of a routing instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    person_name: String,
    location_label: String,
    latitude: f64,
    longitude: f64,
    demand: i64,
    time_window: TimeWindow,
}

impl Stop {
    /// Validates a raw record into a stop.
    ///
    /// The depot (`index == 0`) gets demand 0, every other stop demand 1.
    pub fn from_record(
        index: usize,
        record: &StopRecord,
        time_window: TimeWindow,
    ) -> Result<Self, ValidationError> {
        let latitude = checked_coordinate(index, record, "latitude", record.latitude, 90.0)?;
        let longitude = checked_coordinate(index, record, "longitude", record.longitude, 180.0)?;
        Ok(Self {
            person_name: record.person_name.clone(),
            location_label: record.location_label.clone(),
            latitude,
            longitude,
            demand: if index == 0 { 0 } else { 1 },
            time_window,
        })
    }

    pub fn person_name(&self) -> &str {
        &self.person_name
    }

    pub fn location_label(&self) -> &str {
        &self.location_label
    }

    /// `(latitude, longitude)`.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Seats taken by this stop (0 for the depot).
    pub fn demand(&self) -> i64 {
        self.demand
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub(crate) fn set_time_window(&mut self, time_window: TimeWindow) {
        self.time_window = time_window;
    }
}

fn checked_coordinate(
    index: usize,
    record: &StopRecord,
    field: &'static str,
    value: Option<f64>,
    bound: f64,
) -> Result<f64, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::MissingCoordinate {
        index,
        name: record.person_name.clone(),
        field,
    })?;
    if !value.is_finite() || value.abs() > bound {
        return Err(ValidationError::CoordinateOutOfRange {
            index,
            name: record.person_name.clone(),
            field,
            value,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> TimeWindow {
        TimeWindow::new(1080, 1140).expect("valid")
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20, 10).is_none());
        assert!(TimeWindow::new(10, 10).is_some());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = window();
        assert!(tw.contains(1080));
        assert!(tw.contains(1140));
        assert!(!tw.contains(1079));
        assert!(!tw.contains(1141));
    }

    #[test]
    fn test_time_window_instant() {
        let tw = TimeWindow::instant(1080);
        assert_eq!(tw.earliest(), tw.latest());
        assert!(tw.is_violated(1081));
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = window();
        assert_eq!(tw.waiting_time(1000), 80);
        assert_eq!(tw.waiting_time(1100), 0);
    }

    #[test]
    fn test_stop_demand_by_index() {
        let record = StopRecord::new("Facility", "Base", 35.0, 139.0);
        let depot = Stop::from_record(0, &record, window()).expect("valid");
        let rider = Stop::from_record(1, &record, window()).expect("valid");
        assert_eq!(depot.demand(), 0);
        assert_eq!(rider.demand(), 1);
        assert_eq!(rider.coordinates(), (35.0, 139.0));
    }

    #[test]
    fn test_stop_missing_coordinate() {
        let record = StopRecord {
            person_name: "Ito".to_string(),
            location_label: "Home".to_string(),
            latitude: Some(35.0),
            longitude: None,
        };
        let err = Stop::from_record(2, &record, window()).expect_err("missing");
        assert_eq!(
            err,
            ValidationError::MissingCoordinate {
                index: 2,
                name: "Ito".to_string(),
                field: "longitude"
            }
        );
    }

    #[test]
    fn test_stop_out_of_range() {
        let record = StopRecord::new("Ito", "Home", 95.0, 139.0);
        assert!(matches!(
            Stop::from_record(1, &record, window()),
            Err(ValidationError::CoordinateOutOfRange {
                field: "latitude",
                ..
            })
        ));
        let record = StopRecord::new("Ito", "Home", f64::NAN, 139.0);
        assert!(Stop::from_record(1, &record, window()).is_err());
    }

    #[test]
    fn test_record_parse() {
        let record = StopRecord::parse(1, "Ito", "Home", " 35.5 ", "139.7").expect("numeric");
        assert_eq!(record.latitude, Some(35.5));
        assert_eq!(record.longitude, Some(139.7));

        let blank = StopRecord::parse(1, "Ito", "Home", "", "139.7").expect("blank is missing");
        assert_eq!(blank.latitude, None);
    }

    #[test]
    fn test_record_parse_non_numeric() {
        let err = StopRecord::parse(4, "Ito", "Home", "north", "139.7").expect_err("text");
        assert_eq!(
            err,
            ValidationError::NonNumericCoordinate {
                index: 4,
                name: "Ito".to_string(),
                field: "latitude",
                value: "north".to_string()
            }
        );
    }
}
