//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**
/// (normal points toward viewer).
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// let normal = tri.normal().unwrap();
/// assert!((normal.z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// The three corners in winding order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Compute the (unnormalized) face normal via cross product.
    ///
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate triangles (zero area).
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.normal_unnormalized().try_normalize(f64::EPSILON)
    }

    /// Compute the area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Compute the centroid.
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Interior angle in radians at the given corner (0, 1 or 2).
    ///
    /// Returns 0 when either adjacent edge has (near) zero length or the
    /// corner index is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    /// assert!((tri.interior_angle(0) - FRAC_PI_2).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn interior_angle(&self, corner: usize) -> f64 {
        let (apex, a, b) = match corner {
            0 => (self.v0, self.v1, self.v2),
            1 => (self.v1, self.v2, self.v0),
            2 => (self.v2, self.v0, self.v1),
            _ => return 0.0,
        };

        let e1 = a - apex;
        let e2 = b - apex;
        let n1 = e1.norm();
        let n2 = e2.norm();
        if n1 <= 1e-10 || n2 <= 1e-10 {
            return 0.0;
        }

        (e1.dot(&e2) / (n1 * n2)).clamp(-1.0, 1.0).acos()
    }

    /// Möller-Trumbore ray intersection.
    ///
    /// Returns the ray parameter `t` of the hit (distance along `direction`
    /// when it is unit length). Hits with `t <= epsilon` and rays parallel to
    /// the triangle plane are rejected. Both faces are hit.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3, Vector3};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(-1.0, -1.0, 0.0),
    ///     Point3::new(1.0, -1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    /// let t = tri.intersect_ray(&Point3::new(0.0, 0.0, 5.0), &-Vector3::z(), 1e-9);
    /// assert!((t.unwrap() - 5.0).abs() < 1e-12);
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn intersect_ray(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        epsilon: f64,
    ) -> Option<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = direction.cross(&edge2);
        let det = edge1.dot(&h);
        if det.abs() < 1e-12 {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = origin - self.v0;
        let u = inv_det * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = inv_det * direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(&q);
        (t > epsilon).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn equilateral() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 3.0_f64.sqrt() / 2.0, 0.0),
        )
    }

    #[test]
    fn interior_angles_sum_to_pi() {
        let tri = equilateral();
        let sum: f64 = (0..3).map(|c| tri.interior_angle(c)).sum();
        assert_relative_eq!(sum, PI, epsilon = 1e-12);
        assert_relative_eq!(tri.interior_angle(1), PI / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn interior_angle_out_of_range_is_zero() {
        assert!(equilateral().interior_angle(3).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_has_no_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(tri.normal().is_none());
        assert!(tri.area().abs() < f64::EPSILON);
    }

    #[test]
    fn centroid_is_mean() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 3.0),
        );
        let c = tri.centroid();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
        assert_relative_eq!(c.z, 1.0);
    }

    #[test]
    fn ray_misses_outside_triangle() {
        let tri = equilateral();
        let hit = tri.intersect_ray(&Point3::new(5.0, 5.0, 1.0), &-Vector3::z(), 1e-9);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_behind_origin_is_rejected() {
        let tri = equilateral();
        let hit = tri.intersect_ray(&Point3::new(0.5, 0.2, -1.0), &-Vector3::z(), 1e-9);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_hits_back_face() {
        let tri = equilateral();
        let hit = tri.intersect_ray(&Point3::new(0.5, 0.2, -2.0), &Vector3::z(), 1e-9);
        assert_relative_eq!(hit.unwrap_or(f64::NAN), 2.0, epsilon = 1e-12);
    }
}
