//! Waypoint removal by direct-connection checks.

use nalgebra::Point3;
use support_collision::CollisionIndex;
use support_types::SupportPath;

/// Simplifies routed paths by dropping waypoints that can be bypassed.
///
/// Each pass walks the path; whenever waypoint `i` connects to `i + 2`
/// without a collision, `i + 1` is removed and the walk retries from `i`.
/// Otherwise it advances. Both endpoints always survive.
///
/// Routed segments all point into the same downward cone, so a bypass of
/// two of them stays inside the cone and keeps descending.
///
/// # Example
///
/// ```
/// use support_route::PathSmoother;
/// use support_collision::CollisionIndex;
/// use support_types::{CollisionConfig, SupportPath};
/// use nalgebra::Point3;
///
/// let collision = CollisionIndex::build(&[], &CollisionConfig::default());
/// let smoother = PathSmoother::new(&collision);
///
/// let path = SupportPath::new(vec![
///     Point3::new(0.0, 0.0, 3.0),
///     Point3::new(0.1, 0.0, 2.0),
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(0.0, 0.0, 0.0),
/// ]);
/// assert_eq!(smoother.smooth(&path, 0.2, 3).len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathSmoother<'a> {
    collision: &'a CollisionIndex,
}

impl<'a> PathSmoother<'a> {
    /// Creates a smoother that checks shortcuts against `collision`.
    #[must_use]
    pub const fn new(collision: &'a CollisionIndex) -> Self {
        Self { collision }
    }

    /// Runs up to `passes` simplification passes over `path`.
    #[must_use]
    pub fn smooth(&self, path: &SupportPath, radius: f64, passes: usize) -> SupportPath {
        let mut points: Vec<Point3<f64>> = path.points().to_vec();

        for _ in 0..passes {
            if points.len() <= 2 {
                break;
            }
            let before = points.len();
            let mut i = 0;
            while i + 2 < points.len() {
                if self
                    .collision
                    .cylinder_collides(&points[i], &points[i + 2], radius)
                {
                    i += 1;
                } else {
                    points.remove(i + 1);
                }
            }
            if points.len() == before {
                break;
            }
        }

        SupportPath::new(points)
    }
}
