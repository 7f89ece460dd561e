//! Dense travel-time matrix.

use crate::error::ValidationError;

/// Travel time marking a confirmed-unreachable pair of locations.
///
/// Any entry at or above this value is treated as a missing arc, never as a
/// real cost.
pub const UNREACHABLE: i64 = 9999;

/// A dense n×n matrix of whole-minute travel times stored in row-major order.
///
/// Symmetry is not assumed. Index 0 is the depot by convention.
///
/// # Examples
///
/// ```
/// use u_multitrip::distance::{TravelTimeMatrix, UNREACHABLE};
///
/// let tm = TravelTimeMatrix::from_rows(vec![
///     vec![0, 10, UNREACHABLE],
///     vec![10, 0, 5],
///     vec![UNREACHABLE, 5, 0],
/// ])
/// .unwrap();
/// assert_eq!(tm.travel_time(0, 1), Some(10));
/// assert_eq!(tm.travel_time(0, 2), None);
/// assert_eq!(tm.unreachable_pairs(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeMatrix {
    data: Vec<i64>,
    size: usize,
}

impl TravelTimeMatrix {
    /// Creates a matrix of the given size with every entry zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// Fails if the rows are not square or any entry is negative.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, ValidationError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ValidationError::MatrixColumns {
                    row: from,
                    expected: size,
                    actual: row.len(),
                });
            }
            if let Some((to, &value)) = row.iter().enumerate().find(|&(_, &v)| v < 0) {
                return Err(ValidationError::NegativeTravelTime { from, to, value });
            }
            data.extend(row);
        }
        Ok(Self { data, size })
    }

    /// Approximates travel times from `(latitude, longitude)` pairs using
    /// great-circle distance at a constant speed, rounded to whole minutes.
    ///
    /// Estimates are capped at `UNREACHABLE - 1`: every pair of real
    /// coordinates stays reachable, however far apart.
    pub fn from_coordinates(points: &[(f64, f64)], speed_kmh: f64) -> Self {
        let n = points.len();
        let mut tm = Self::new(n);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let km = haversine_km(points[i], points[j]);
                    let minutes = (km / speed_kmh * 60.0).round() as i64;
                    tm.set(i, j, minutes.min(UNREACHABLE - 1));
                }
            }
        }
        tm
    }

    /// Raw entry, including the [`UNREACHABLE`] sentinel.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the entry from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, minutes: i64) {
        self.data[from * self.size + to] = minutes;
    }

    /// Travel time, or `None` when the pair is unreachable.
    pub fn travel_time(&self, from: usize, to: usize) -> Option<i64> {
        let value = self.get(from, to);
        (value < UNREACHABLE).then_some(value)
    }

    /// Returns `true` if the arc can be driven.
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.get(from, to) < UNREACHABLE
    }

    /// Number of ordered off-diagonal pairs marked unreachable.
    pub fn unreachable_pairs(&self) -> usize {
        (0..self.size)
            .flat_map(|i| (0..self.size).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j && !self.is_reachable(i, j))
            .count()
    }

    /// Number of locations.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

/// Great-circle distance in kilometres between two `(latitude, longitude)` points.
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let tm = TravelTimeMatrix::from_rows(vec![vec![0, 7], vec![9, 0]]).expect("valid");
        assert_eq!(tm.size(), 2);
        assert_eq!(tm.get(0, 1), 7);
        assert_eq!(tm.get(1, 0), 9);
        assert!(!tm.is_symmetric());
    }

    #[test]
    fn test_from_rows_not_square() {
        let err = TravelTimeMatrix::from_rows(vec![vec![0, 1], vec![1]]).expect_err("ragged");
        assert_eq!(
            err,
            ValidationError::MatrixColumns {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_from_rows_negative() {
        let err = TravelTimeMatrix::from_rows(vec![vec![0, -3], vec![1, 0]]).expect_err("negative");
        assert_eq!(
            err,
            ValidationError::NegativeTravelTime {
                from: 0,
                to: 1,
                value: -3
            }
        );
    }

    #[test]
    fn test_sentinel_is_unreachable() {
        let tm = TravelTimeMatrix::from_rows(vec![vec![0, UNREACHABLE], vec![4, 0]])
            .expect("valid");
        assert_eq!(tm.travel_time(0, 1), None);
        assert_eq!(tm.travel_time(1, 0), Some(4));
        assert!(!tm.is_reachable(0, 1));
        assert_eq!(tm.unreachable_pairs(), 1);
    }

    #[test]
    fn test_above_sentinel_is_unreachable() {
        let tm = TravelTimeMatrix::from_rows(vec![vec![0, UNREACHABLE + 50], vec![4, 0]])
            .expect("valid");
        assert_eq!(tm.travel_time(0, 1), None);
    }

    #[test]
    fn test_haversine_known_distance() {
        // One degree of latitude is ~111.19 km.
        let km = haversine_km((35.0, 139.0), (36.0, 139.0));
        assert!((km - 111.19).abs() < 0.1);
    }

    #[test]
    fn test_from_coordinates() {
        let points = [(35.0, 139.0), (35.1, 139.0)];
        let tm = TravelTimeMatrix::from_coordinates(&points, 20.0);
        // ~11.12 km at 20 km/h = ~33.4 min
        assert_eq!(tm.get(0, 1), 33);
        assert_eq!(tm.get(1, 0), 33);
        assert_eq!(tm.get(0, 0), 0);
        assert!(tm.is_symmetric());
    }

    #[test]
    fn test_from_coordinates_caps_long_distances() {
        // ~4448 km at 20 km/h is far beyond the sentinel.
        let points = [(0.0, 0.0), (0.0, 40.0)];
        let tm = TravelTimeMatrix::from_coordinates(&points, 20.0);
        assert_eq!(tm.get(0, 1), UNREACHABLE - 1);
        assert_eq!(tm.travel_time(1, 0), Some(UNREACHABLE - 1));
    }
}
