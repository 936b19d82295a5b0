//! Approximate collision queries against sampled model points.

use std::f64::consts::TAU;

use nalgebra::{Point3, Rotation3, Vector3};
use support_types::CollisionConfig;
use tracing::info;

use crate::point_index::{PointIndex, to_array};
use crate::surface::SurfaceQuery;

/// Segments shorter than this never collide.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-3;

/// Collision index over a point cloud sampled from the model surface.
///
/// Cylinder checks sample the axis and compare the distance to the nearest
/// indexed points against `radius + resolution`. The resolution term is a
/// safety margin, so the test is conservative rather than exact.
///
/// # Example
///
/// ```
/// use support_collision::CollisionIndex;
/// use support_types::CollisionConfig;
/// use nalgebra::Point3;
///
/// let samples = vec![Point3::new(0.0, 0.0, 5.0)];
/// let index = CollisionIndex::build(&samples, &CollisionConfig::default());
///
/// // Passes straight through the sample.
/// assert!(index.cylinder_collides(
///     &Point3::new(0.0, 0.0, 10.0),
///     &Point3::new(0.0, 0.0, 0.0),
///     0.2,
/// ));
/// // Well clear of it.
/// assert!(!index.cylinder_collides(
///     &Point3::new(5.0, 0.0, 10.0),
///     &Point3::new(5.0, 0.0, 0.0),
///     0.2,
/// ));
/// ```
#[derive(Debug)]
pub struct CollisionIndex {
    points: PointIndex<3>,
    config: CollisionConfig,
}

impl CollisionIndex {
    /// Builds the index from sample positions.
    #[must_use]
    pub fn build(samples: &[Point3<f64>], config: &CollisionConfig) -> Self {
        let points = PointIndex::new(samples.iter().map(to_array).collect());
        info!(samples = points.len(), "Collision index built");
        Self {
            points,
            config: config.clone(),
        }
    }

    /// Builds the index from the surface's vertices and face centroids.
    #[must_use]
    pub fn from_surface<S: SurfaceQuery + ?Sized>(
        surface: &S,
        config: &CollisionConfig,
    ) -> Self {
        Self::build(&surface.sample_points(), config)
    }

    /// Number of indexed samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no samples are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Settings the index was built with.
    #[must_use]
    pub const fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Distance to the closest sample, infinite if there are none.
    #[must_use]
    pub fn nearest_distance(&self, point: &Point3<f64>) -> f64 {
        self.points
            .nearest(&to_array(point))
            .map_or(f64::INFINITY, |(_, d)| d)
    }

    /// Whether a cylinder of `radius` around the segment comes within the
    /// resolution margin of any sample.
    ///
    /// Always false when checking is disabled or the segment is shorter
    /// than [`MIN_SEGMENT_LENGTH`].
    #[must_use]
    pub fn cylinder_collides(&self, start: &Point3<f64>, end: &Point3<f64>, radius: f64) -> bool {
        if !self.config.enabled || self.points.is_empty() {
            return false;
        }

        let axis = end - start;
        let length = axis.norm();
        if length < MIN_SEGMENT_LENGTH {
            return false;
        }

        let samples = sample_count(length, self.config.resolution);
        let margin = radius + self.config.resolution;
        #[allow(clippy::cast_precision_loss)]
        let last = (samples - 1) as f64;

        (0..samples).any(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / last;
            let probe = start + axis * t;
            self.points
                .nearest_k(&to_array(&probe), self.config.neighbor_count)
                .iter()
                .any(|&(_, distance)| distance < margin)
        })
    }

    /// Whether any segment of the polyline collides.
    ///
    /// Paths with fewer than two points never collide.
    #[must_use]
    pub fn path_collides(&self, path: &[Point3<f64>], radius: f64) -> bool {
        if !self.config.enabled {
            return false;
        }
        path.windows(2)
            .any(|w| self.cylinder_collides(&w[0], &w[1], radius))
    }

    /// First direction from `point` whose short probe is collision free.
    ///
    /// The preferred direction is tried first, then the preferred direction
    /// rotated about Z by `k * 2π / probe_angles`. The probe is twice the
    /// resolution long. Returns unit vectors; `None` when every probe
    /// collides or the preferred direction is zero.
    #[must_use]
    pub fn find_clear_direction(
        &self,
        point: &Point3<f64>,
        preferred: &Vector3<f64>,
        radius: f64,
        probe_angles: usize,
    ) -> Option<Vector3<f64>> {
        let preferred = preferred.try_normalize(1e-12)?;
        let probe_length = self.config.resolution * 2.0;
        let clear = |dir: &Vector3<f64>| {
            !self.cylinder_collides(point, &(point + dir * probe_length), radius)
        };

        if clear(&preferred) {
            return Some(preferred);
        }

        #[allow(clippy::cast_precision_loss)]
        let step = TAU / probe_angles.max(1) as f64;
        (0..probe_angles)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let angle = step * k as f64;
                Rotation3::from_axis_angle(&Vector3::z_axis(), angle) * preferred
            })
            .find(|dir| clear(dir))
    }
}

/// Axis samples for a segment: `max(3, ceil(length / resolution))`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sample_count(length: f64, resolution: f64) -> usize {
    ((length / resolution).ceil() as usize).max(3)
}
