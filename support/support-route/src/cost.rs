//! Diagnostic path cost: length plus a bend penalty.

use nalgebra::Vector3;
use support_types::SupportPath;

/// Cost added per degree of direction change between segments.
pub const BEND_WEIGHT_PER_DEGREE: f64 = 0.1;

/// Length and bend cost of a path.
///
/// Only reported, never used to steer the search.
///
/// # Example
///
/// ```
/// use support_route::PathCost;
/// use support_types::SupportPath;
/// use nalgebra::Point3;
///
/// let straight = SupportPath::vertical(Point3::new(0.0, 0.0, 4.0), 0.0);
/// let cost = PathCost::of(&straight);
/// assert!((cost.length - 4.0).abs() < 1e-12);
/// assert!(cost.bend_degrees.abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathCost {
    /// Sum of segment lengths.
    pub length: f64,
    /// Sum of direction changes between consecutive segments, in degrees.
    pub bend_degrees: f64,
}

impl PathCost {
    /// Measures a path.
    #[must_use]
    pub fn of(path: &SupportPath) -> Self {
        let points = path.points();
        let mut cost = Self::default();
        let mut previous: Option<Vector3<f64>> = None;

        for w in points.windows(2) {
            let segment = w[1] - w[0];
            let length = segment.norm();
            cost.length += length;

            let direction = segment / (length + 1e-6);
            if let Some(prev) = previous {
                cost.bend_degrees += prev.dot(&direction).clamp(-1.0, 1.0).acos().to_degrees();
            }
            previous = Some(direction);
        }
        cost
    }

    /// Length plus the weighted bend penalty.
    #[must_use]
    pub fn total(&self) -> f64 {
        BEND_WEIGHT_PER_DEGREE.mul_add(self.bend_degrees, self.length)
    }
}
