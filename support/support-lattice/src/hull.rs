//! Planar convex hull and base triangle selection.

use nalgebra::Point2;

/// Twice the signed area of `abc`; positive when counter-clockwise.
fn cross(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x).mul_add(c.y - a.y, -((b.y - a.y) * (c.x - a.x)))
}

/// Area of the triangle `abc`.
#[must_use]
pub fn triangle_area(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    0.5 * cross(a, b, c).abs()
}

/// Convex hull by Andrew's monotone chain, counter-clockwise.
///
/// Collinear and duplicate points are dropped, so a degenerate input
/// yields fewer than three vertices.
///
/// # Example
///
/// ```
/// use support_lattice::convex_hull;
/// use nalgebra::Point2;
///
/// let points = [
///     Point2::new(0.0, 0.0),
///     Point2::new(4.0, 0.0),
///     Point2::new(2.0, 1.0),
///     Point2::new(4.0, 4.0),
///     Point2::new(0.0, 4.0),
/// ];
/// assert_eq!(convex_hull(&points).len(), 4);
/// ```
#[must_use]
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Point2<f64>> = Vec::with_capacity(sorted.len() * 2);
    // Lower hull.
    for p in &sorted {
        while hull.len() >= 2 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(*p);
    }
    // Upper hull.
    let lower_len = hull.len() + 1;
    for p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(*p);
    }
    hull.pop();
    hull
}

/// The three points of `candidates` spanning the largest triangle.
///
/// Brute force over every triple. Returns `None` when no triple has a
/// positive area.
#[must_use]
pub fn largest_triangle(candidates: &[Point2<f64>]) -> Option<[Point2<f64>; 3]> {
    let mut best: Option<([Point2<f64>; 3], f64)> = None;
    let n = candidates.len();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let area = triangle_area(&candidates[i], &candidates[j], &candidates[k]);
                if area > best.map_or(0.0, |(_, a)| a) {
                    best = Some(([candidates[i], candidates[j], candidates[k]], area));
                }
            }
        }
    }
    best.map(|(triangle, _)| triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_hull_drops_interior_and_edge_points() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        // Counter-clockwise from the lowest-leftmost point.
        assert_eq!(hull[0], Point2::new(0.0, 0.0));
        assert_eq!(hull[1], Point2::new(4.0, 0.0));
    }

    #[test]
    fn test_collinear_hull_is_degenerate() {
        let points: Vec<Point2<f64>> = (0..5).map(|i| Point2::new(f64::from(i), 0.0)).collect();
        let hull = convex_hull(&points);
        assert!(hull.len() < 3);
        assert!(largest_triangle(&hull).is_none());
        assert!(largest_triangle(&points).is_none());
    }

    #[test]
    fn test_largest_triangle_in_square() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        let [a, b, c] = largest_triangle(&square).unwrap_or([Point2::origin(); 3]);
        assert_relative_eq!(triangle_area(&a, &b, &c), 8.0);
    }
}
