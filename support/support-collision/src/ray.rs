//! Rays and ray hits.

use nalgebra::{Point3, Vector3};

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Point3<f64>,
    /// Unit direction.
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Creates a ray, normalizing the direction.
    ///
    /// Returns `None` for a zero-length direction.
    ///
    /// # Example
    ///
    /// ```
    /// use support_collision::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -4.0)).unwrap();
    /// assert!((ray.direction.z + 1.0).abs() < 1e-12);
    /// assert!(Ray::new(Point3::origin(), Vector3::zeros()).is_none());
    /// ```
    #[must_use]
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        let direction = direction.try_normalize(1e-12)?;
        Some(Self { origin, direction })
    }

    /// Straight down from `origin`.
    #[must_use]
    pub fn down(origin: Point3<f64>) -> Self {
        Self {
            origin,
            direction: -Vector3::z(),
        }
    }

    /// Straight up from `origin`.
    #[must_use]
    pub fn up(origin: Point3<f64>) -> Self {
        Self {
            origin,
            direction: Vector3::z(),
        }
    }

    /// Point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Where a ray met the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin.
    pub distance: f64,
    /// Intersection point.
    pub point: Point3<f64>,
    /// Index of the face that was hit.
    pub face: usize,
}
