//! Support paths.
//!
//! A [`SupportPath`] runs from the contact point on the model (first, highest)
//! to the attachment point on the build plate or a tower top (last).
//!
//! # Example
//!
//! ```
//! use support_types::SupportPath;
//! use nalgebra::Point3;
//!
//! let path = SupportPath::vertical(Point3::new(1.0, 1.0, 10.0), 0.0);
//! assert_eq!(path.len(), 2);
//! assert!((path.length() - 10.0).abs() < 1e-12);
//! ```

use nalgebra::Point3;

/// An ordered polyline from contact point to attachment point.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportPath {
    points: Vec<Point3<f64>>,
}

impl SupportPath {
    /// Creates a path from waypoints.
    #[must_use]
    pub const fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// A path with no waypoints.
    #[must_use]
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Straight drop from `start` to the plane `z = target_z`.
    ///
    /// When `start` is already at or below the target, the path is just
    /// `[start]`.
    ///
    /// # Example
    ///
    /// ```
    /// use support_types::SupportPath;
    /// use nalgebra::Point3;
    ///
    /// let path = SupportPath::vertical(Point3::new(0.0, 0.0, 10.0), 0.0);
    /// assert_eq!(path.points(), &[Point3::new(0.0, 0.0, 10.0), Point3::new(0.0, 0.0, 0.0)]);
    ///
    /// let flat = SupportPath::vertical(Point3::new(0.0, 0.0, 0.0), 0.0);
    /// assert_eq!(flat.len(), 1);
    /// ```
    #[must_use]
    pub fn vertical(start: Point3<f64>, target_z: f64) -> Self {
        if start.z <= target_z {
            Self::new(vec![start])
        } else {
            Self::new(vec![start, Point3::new(start.x, start.y, target_z)])
        }
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Waypoints in order.
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Contact point.
    #[must_use]
    pub fn first(&self) -> Option<&Point3<f64>> {
        self.points.first()
    }

    /// Attachment point.
    #[must_use]
    pub fn last(&self) -> Option<&Point3<f64>> {
        self.points.last()
    }

    /// Waypoint with the smallest Z (the first one on ties).
    #[must_use]
    pub fn lowest_point(&self) -> Option<&Point3<f64>> {
        self.points
            .iter()
            .reduce(|low, p| if p.z < low.z { p } else { low })
    }

    /// Total polyline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Point3<f64>, &Point3<f64>)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Appends a waypoint.
    pub fn push(&mut self, point: Point3<f64>) {
        self.points.push(point);
    }

    /// Replaces the attachment point, or pushes it onto an empty path.
    pub fn replace_last(&mut self, point: Point3<f64>) {
        match self.points.last_mut() {
            Some(last) => *last = point,
            None => self.points.push(point),
        }
    }

    /// Consumes the path, returning its waypoints.
    #[must_use]
    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.points
    }
}

impl From<Vec<Point3<f64>>> for SupportPath {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point3<f64>> for SupportPath {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_path() {
        let path = SupportPath::empty();
        assert!(path.is_empty());
        assert!(path.lowest_point().is_none());
        assert!(path.length().abs() < f64::EPSILON);
        assert_eq!(path.segments().count(), 0);
    }

    #[test]
    fn test_lowest_point_prefers_first_on_ties() {
        let path: SupportPath = vec![
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 1.0),
        ]
        .into();
        let low = path.lowest_point().copied().unwrap_or_else(Point3::origin);
        assert_relative_eq!(low.x, 1.0);
    }

    #[test]
    fn test_length_and_segments() {
        let path: SupportPath = [
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(3.0, 4.0, 10.0),
            Point3::new(3.0, 4.0, 0.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(path.segments().count(), 2);
        assert_relative_eq!(path.length(), 15.0);
    }

    #[test]
    fn test_replace_last() {
        let mut path = SupportPath::vertical(Point3::new(0.0, 0.0, 10.0), 0.0);
        path.replace_last(Point3::new(2.0, 2.0, 3.0));
        assert_eq!(path.last(), Some(&Point3::new(2.0, 2.0, 3.0)));
        assert_eq!(path.len(), 2);

        let mut empty = SupportPath::empty();
        empty.replace_last(Point3::origin());
        assert_eq!(empty.len(), 1);
    }
}
