//! Cross-section frames along a polyline.

use nalgebra::{Point3, Vector3};

/// Tangents with |z| at or above this use X instead of Z as the reference.
const REFERENCE_SWITCH: f64 = 0.9;

/// Orthonormal frame of one cross-section ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingFrame {
    /// Direction along the path.
    pub tangent: Vector3<f64>,
    /// First in-plane axis, perpendicular to the tangent.
    pub right: Vector3<f64>,
    /// Second in-plane axis, completing the frame.
    pub up: Vector3<f64>,
}

impl RingFrame {
    /// Frame for a tangent direction.
    ///
    /// The in-plane axes come from crossing the tangent with world Z, or
    /// with world X when the tangent is close to vertical. A zero tangent
    /// is treated as straight down.
    ///
    /// # Example
    ///
    /// ```
    /// use support_sweep::RingFrame;
    /// use nalgebra::Vector3;
    ///
    /// let frame = RingFrame::from_tangent(&Vector3::new(0.0, 0.0, -3.0));
    /// assert!(frame.right.dot(&frame.tangent).abs() < 1e-12);
    /// assert!(frame.up.dot(&frame.tangent).abs() < 1e-12);
    /// assert!((frame.right.norm() - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_tangent(tangent: &Vector3<f64>) -> Self {
        let tangent = tangent.try_normalize(1e-12).unwrap_or_else(|| -Vector3::z());
        let reference = if tangent.z.abs() < REFERENCE_SWITCH {
            Vector3::z()
        } else {
            Vector3::x()
        };
        let right = tangent
            .cross(&reference)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::y);
        let up = right.cross(&tangent);
        Self { tangent, right, up }
    }

    /// Unit radial direction at `angle` around the tangent.
    #[must_use]
    pub fn radial(&self, angle: f64) -> Vector3<f64> {
        self.right * angle.cos() + self.up * angle.sin()
    }
}

/// One frame per point: forward difference at the start, backward at the
/// end, and the sum of both neighbouring segments in between.
#[must_use]
pub fn ring_frames(points: &[Point3<f64>]) -> Vec<RingFrame> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let tangent = if i == 0 {
                points[1] - points[0]
            } else if i == n - 1 {
                points[i] - points[i - 1]
            } else {
                (points[i] - points[i - 1]) + (points[i + 1] - points[i])
            };
            RingFrame::from_tangent(&tangent)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthonormal(frame: &RingFrame) {
        assert_relative_eq!(frame.tangent.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.right.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.up.norm(), 1.0, epsilon = 1e-12);
        assert!(frame.tangent.dot(&frame.right).abs() < 1e-12);
        assert!(frame.tangent.dot(&frame.up).abs() < 1e-12);
        assert!(frame.right.dot(&frame.up).abs() < 1e-12);
    }

    #[test]
    fn test_frames_are_orthonormal() {
        for tangent in [
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.3, -0.2, -0.9),
            Vector3::new(0.0, 0.1, -1.0),
        ] {
            assert_orthonormal(&RingFrame::from_tangent(&tangent));
        }
    }

    #[test]
    fn test_reference_axis_switches_near_vertical() {
        // |z| = 0.85 crosses with world Z, so `right` stays horizontal.
        let shallow = Vector3::new(0.0, (1.0_f64 - 0.85 * 0.85).sqrt(), -0.85);
        let frame = RingFrame::from_tangent(&shallow);
        assert_relative_eq!(frame.right.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.right.z, 0.0, epsilon = 1e-12);

        // |z| = 0.95 crosses with world X instead.
        let steep_y = (1.0_f64 - 0.95 * 0.95).sqrt();
        let frame = RingFrame::from_tangent(&Vector3::new(0.0, steep_y, -0.95));
        assert_relative_eq!(frame.right.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(frame.right.y, -0.95, epsilon = 1e-12);
        assert_relative_eq!(frame.right.z, -steep_y, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_tangent_points_down() {
        let frame = RingFrame::from_tangent(&Vector3::zeros());
        assert_relative_eq!(frame.tangent, -Vector3::z());
        assert_orthonormal(&frame);
    }

    #[test]
    fn test_middle_frames_average_neighbours() {
        let points = [
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let frames = ring_frames(&points);
        assert_eq!(frames.len(), 3);
        assert_relative_eq!(frames[0].tangent, -Vector3::z(), epsilon = 1e-12);
        let expected = Vector3::new(1.0, 0.0, -2.0).normalize();
        assert_relative_eq!(frames[1].tangent, expected, epsilon = 1e-12);
        assert!(ring_frames(&points[..1]).is_empty());
    }

    #[test]
    fn test_radial_is_unit() {
        let frame = RingFrame::from_tangent(&Vector3::new(0.2, 0.5, -0.8));
        for k in 0..12 {
            let angle = f64::from(k) * std::f64::consts::TAU / 12.0;
            assert_relative_eq!(frame.radial(angle).norm(), 1.0, epsilon = 1e-12);
            assert!(frame.radial(angle).dot(&frame.tangent).abs() < 1e-12);
        }
    }
}
