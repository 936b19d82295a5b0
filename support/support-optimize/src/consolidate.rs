//! Merging of support points that crowd each other.

use nalgebra::{Point3, Vector3};
use support_collision::{PointIndex, to_array};
use support_types::SupportPoint;
use tracing::debug;

/// Merges points lying within `merge_radius` of each other.
///
/// Points are visited in input order. Each unmerged point gathers every
/// still-unmerged point within the radius (itself included); a group of
/// one is kept unchanged, larger groups collapse into one point via
/// [`merge_points`]. A radius of zero only merges exact duplicates.
///
/// # Example
///
/// ```
/// use support_optimize::consolidate;
/// use support_types::{SourceType, SupportPoint};
/// use nalgebra::Point3;
///
/// let points = vec![
///     SupportPoint::new(Point3::new(0.0, 0.0, 5.0), SourceType::Overhang).with_area(1.0),
///     SupportPoint::new(Point3::new(0.5, 0.0, 5.0), SourceType::Overhang).with_area(1.0),
///     SupportPoint::new(Point3::new(9.0, 0.0, 5.0), SourceType::Island),
/// ];
/// let merged = consolidate(&points, 1.0);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged[0].merged_count, 2);
/// assert!((merged[0].position.x - 0.25).abs() < 1e-12);
/// ```
#[must_use]
pub fn consolidate(points: &[SupportPoint], merge_radius: f64) -> Vec<SupportPoint> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let index = PointIndex::new(points.iter().map(|p| to_array(&p.position)).collect());
    let mut merged = vec![false; points.len()];
    let mut result = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        if merged[i] {
            continue;
        }
        let mut group: Vec<usize> = index
            .within(&to_array(&point.position), merge_radius)
            .into_iter()
            .map(|(j, _)| j)
            .filter(|&j| !merged[j])
            .collect();

        if group.len() <= 1 {
            merged[i] = true;
            result.push(point.clone());
            continue;
        }

        group.sort_unstable();
        for &j in &group {
            merged[j] = true;
        }
        let members: Vec<&SupportPoint> = group.iter().map(|&j| &points[j]).collect();
        result.extend(merge_points(&members));
    }

    debug!(
        before = points.len(),
        after = result.len(),
        radius = merge_radius,
        "Support points consolidated"
    );
    result
}

/// Collapses a group into one point.
///
/// Position is the weighted centroid (weight = area, or 1 when the area is
/// unknown). Areas and merge counts add up, the smallest known angle wins,
/// the source comes from the first member and the tier is cleared for
/// reclassification. Returns `None` for an empty group.
#[must_use]
pub fn merge_points(members: &[&SupportPoint]) -> Option<SupportPoint> {
    let first = members.first()?;

    let total_weight: f64 = members.iter().map(|p| p.weight()).sum();
    let weighted = members
        .iter()
        .fold(Vector3::zeros(), |acc: Vector3<f64>, p| {
            acc + p.position.coords * p.weight()
        });

    let angle = members
        .iter()
        .filter_map(|p| p.angle)
        .reduce(f64::min);

    Some(SupportPoint {
        position: Point3::from(weighted / total_weight),
        source: first.source,
        area: members.iter().map(|p| p.area).sum(),
        angle,
        tier: None,
        merged_count: members.iter().map(|p| p.merged_count).sum(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use support_types::{SourceType, Tier};

    fn point(x: f64, y: f64) -> SupportPoint {
        SupportPoint::new(Point3::new(x, y, 10.0), SourceType::Overhang)
    }

    #[test]
    fn test_isolated_points_unchanged() {
        let points = vec![point(0.0, 0.0).with_tier(Tier::Heavy), point(5.0, 0.0)];
        let merged = consolidate(&points, 1.5);
        assert_eq!(merged, points);
    }

    #[test]
    fn test_weighted_centroid() {
        let points = vec![point(0.0, 0.0).with_area(3.0), point(1.0, 0.0).with_area(1.0)];
        let merged = consolidate(&points, 1.5);
        assert_eq!(merged.len(), 1);
        assert_relative_eq!(merged[0].position.x, 0.25, epsilon = 1e-12);
        assert_relative_eq!(merged[0].area, 4.0);
        assert_eq!(merged[0].merged_count, 2);
    }

    #[test]
    fn test_unknown_area_weighs_one() {
        let points = vec![point(0.0, 0.0), point(1.0, 0.0), point(0.5, 1.0)];
        let merged = consolidate(&points, 1.5);
        assert_eq!(merged.len(), 1);
        assert_relative_eq!(merged[0].position.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(merged[0].position.y, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_merge_keeps_min_angle_and_first_source() {
        let island = SupportPoint::new(Point3::new(0.0, 0.0, 10.0), SourceType::Island);
        let points = vec![
            island.with_angle(40.0).with_tier(Tier::Heavy),
            point(0.5, 0.0).with_angle(25.0),
            point(0.8, 0.0),
        ];
        let merged = consolidate(&points, 1.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, SourceType::Island);
        assert_eq!(merged[0].angle, Some(25.0));
        assert!(merged[0].tier.is_none());
    }

    #[test]
    fn test_chain_groups_around_first_seed() {
        // 0 and 1 are within range, 2 is only near 1.
        let points = vec![point(0.0, 0.0), point(1.0, 0.0), point(2.0, 0.0)];
        let merged = consolidate(&points, 1.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].merged_count, 2);
        assert_eq!(merged[1].position, points[2].position);
    }

    #[test]
    fn test_zero_radius_merges_duplicates_only() {
        let points = vec![point(0.0, 0.0), point(0.0, 0.0), point(0.1, 0.0)];
        let merged = consolidate(&points, 0.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].merged_count, 2);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(consolidate(&[], 1.0).is_empty());
        assert_eq!(consolidate(&[point(1.0, 1.0)], 1.0).len(), 1);
        assert!(merge_points(&[]).is_none());
    }
}
