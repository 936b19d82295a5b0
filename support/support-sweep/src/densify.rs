//! Path densification and radius tapering.

use nalgebra::Point3;

/// Segments shorter than this are dropped while densifying.
const MIN_SEGMENT: f64 = 1e-9;

/// Subdivides each segment into `max(2, floor(length * segments_per_unit))`
/// equal steps, keeping every original waypoint.
///
/// Zero-length segments contribute nothing.
///
/// # Example
///
/// ```
/// use support_sweep::densify;
/// use nalgebra::Point3;
///
/// let points = [Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0)];
/// let dense = densify(&points, 2.0);
/// // 10 steps of 0.5 plus the start.
/// assert_eq!(dense.len(), 11);
/// assert_eq!(dense[10], Point3::new(0.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn densify(points: &[Point3<f64>], segments_per_unit: f64) -> Vec<Point3<f64>> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let mut out = vec![*first];

    for w in points.windows(2) {
        let (start, end) = (w[0], w[1]);
        let length = (end - start).norm();
        if length < MIN_SEGMENT {
            continue;
        }
        let steps = step_count(length, segments_per_unit);
        #[allow(clippy::cast_precision_loss)]
        let n = steps as f64;
        for j in 1..=steps {
            #[allow(clippy::cast_precision_loss)]
            let t = j as f64 / n;
            out.push(start + (end - start) * t);
        }
    }
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn step_count(length: f64, segments_per_unit: f64) -> usize {
    let raw = (length * segments_per_unit).floor();
    if raw.is_finite() && raw > 2.0 {
        raw as usize
    } else {
        2
    }
}

/// Radius at each point, interpolated by arc length from `tip` at the
/// first point to `base` at the last.
///
/// A path of zero total length gets `tip` everywhere.
#[must_use]
pub fn taper_radii(points: &[Point3<f64>], tip: f64, base: f64) -> Vec<f64> {
    let total: f64 = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    let mut travelled = 0.0;

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if i > 0 {
                travelled += (point - points[i - 1]).norm();
            }
            let t = if total > 0.0 { travelled / total } else { 0.0 };
            (base - tip).mul_add(t, tip)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_short_segments_get_two_steps() {
        let points = [Point3::new(0.0, 0.0, 0.3), Point3::new(0.0, 0.0, 0.0)];
        let dense = densify(&points, 2.0);
        assert_eq!(dense.len(), 3);
        assert_relative_eq!(dense[1].z, 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_waypoints_are_kept() {
        let points = [
            Point3::new(0.0, 0.0, 4.0),
            Point3::new(1.0, 0.0, 2.7),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let dense = densify(&points, 2.0);
        for p in &points {
            assert!(dense.iter().any(|d| (d - p).norm() < 1e-12));
        }
        assert_eq!(dense.first(), points.first());
        assert_eq!(dense.last(), points.last());
    }

    #[test]
    fn test_zero_length_segments_are_skipped() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(densify(&[p, p, p], 2.0), vec![p]);
        assert!(densify(&[], 2.0).is_empty());
    }

    #[test]
    fn test_taper_by_arc_length() {
        let points = [
            Point3::new(0.0, 0.0, 4.0),
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let radii = taper_radii(&points, 0.2, 1.0);
        assert_relative_eq!(radii[0], 0.2);
        assert_relative_eq!(radii[1], 0.4, epsilon = 1e-12);
        assert_relative_eq!(radii[2], 1.0, epsilon = 1e-12);

        let p = Point3::origin();
        assert_eq!(taper_radii(&[p, p], 0.3, 0.9), vec![0.3, 0.3]);
    }
}
