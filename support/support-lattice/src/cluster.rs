//! Grouping of support endpoints by XY proximity.

use nalgebra::Point3;
use support_collision::{PointIndex, to_xy};

/// Groups endpoints whose XY distance chains within `spacing`.
///
/// Two endpoints share a cluster when they are within `spacing` of each
/// other directly or through other members. Seeds are taken in index
/// order, so cluster `k` always contains the lowest index not in an earlier
/// cluster. Members are listed in ascending index order.
///
/// # Example
///
/// ```
/// use support_lattice::flood_fill_clusters;
/// use nalgebra::Point3;
///
/// let endpoints = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(20.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
///     Point3::new(6.0, 0.0, 0.0),
/// ];
/// let clusters = flood_fill_clusters(&endpoints, 4.0);
/// assert_eq!(clusters, vec![vec![0, 2, 3], vec![1]]);
/// ```
#[must_use]
pub fn flood_fill_clusters(endpoints: &[Point3<f64>], spacing: f64) -> Vec<Vec<usize>> {
    let index = PointIndex::new(endpoints.iter().map(to_xy).collect());
    let mut assigned = vec![false; endpoints.len()];
    let mut clusters = Vec::new();

    for seed in 0..endpoints.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut cluster = vec![seed];
        let mut next = 0;
        while next < cluster.len() {
            let member = cluster[next];
            next += 1;
            for (other, _) in index.within(&to_xy(&endpoints[member]), spacing) {
                if !assigned[other] {
                    assigned[other] = true;
                    cluster.push(other);
                }
            }
        }
        cluster.sort_unstable();
        clusters.push(cluster);
    }
    clusters
}

/// Splits a cluster into strips along X so no strip exceeds `max_size`.
///
/// Members are ordered by X (ties by index) and cut into
/// `ceil(len / max_size)` contiguous chunks whose sizes differ by at most
/// one. A cluster already within the limit comes back as is.
#[must_use]
pub fn split_cluster(
    members: &[usize],
    endpoints: &[Point3<f64>],
    max_size: usize,
) -> Vec<Vec<usize>> {
    let max_size = max_size.max(1);
    if members.len() <= max_size {
        return vec![members.to_vec()];
    }

    let mut sorted = members.to_vec();
    sorted.sort_by(|&a, &b| {
        endpoints[a]
            .x
            .total_cmp(&endpoints[b].x)
            .then(a.cmp(&b))
    });

    let chunks = sorted.len().div_ceil(max_size);
    let base = sorted.len() / chunks;
    let extra = sorted.len() % chunks;

    let mut result = Vec::with_capacity(chunks);
    let mut start = 0;
    for chunk in 0..chunks {
        let size = base + usize::from(chunk < extra);
        result.push(sorted[start..start + size].to_vec());
        start += size;
    }
    result
}

/// Flood-fill clustering followed by splitting of oversized clusters.
#[must_use]
pub fn cluster_endpoints(
    endpoints: &[Point3<f64>],
    spacing: f64,
    max_size: usize,
) -> Vec<Vec<usize>> {
    flood_fill_clusters(endpoints, spacing)
        .iter()
        .flat_map(|cluster| split_cluster(cluster, endpoints, max_size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(xs: &[f64]) -> Vec<Point3<f64>> {
        xs.iter().map(|&x| Point3::new(x, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_chaining_is_transitive() {
        let endpoints = row(&[0.0, 7.0, 14.0, 21.0]);
        let clusters = flood_fill_clusters(&endpoints, 8.0);
        assert_eq!(clusters, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_spacing_is_inclusive_and_ignores_z() {
        let endpoints = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(8.0, 0.0, 50.0)];
        assert_eq!(flood_fill_clusters(&endpoints, 8.0).len(), 1);
        assert_eq!(flood_fill_clusters(&endpoints, 7.9).len(), 2);
    }

    #[test]
    fn test_roots_sharing_one_x_value() {
        let endpoints: Vec<Point3<f64>> = (0..100)
            .map(|i| Point3::new(5.0, 0.5 * f64::from(i), 0.0))
            .collect();
        let clusters = flood_fill_clusters(&endpoints, 8.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0], (0..100).collect::<Vec<_>>());

        let split = cluster_endpoints(&endpoints, 8.0, 30);
        assert_eq!(split.len(), 4);
        assert!(split.iter().all(|c| c.len() == 25));
        assert_eq!(split[1][0], 25);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_endpoints(&[], 8.0, 30).is_empty());
    }

    #[test]
    fn test_split_near_equal_chunks_by_x() {
        let endpoints = row(&[9.0, 1.0, 5.0, 3.0, 7.0, 2.0, 8.0]);
        let members: Vec<usize> = (0..7).collect();
        let chunks = split_cluster(&members, &endpoints, 3);
        // ceil(7 / 3) = 3 chunks of 3, 2, 2.
        assert_eq!(chunks, vec![vec![1, 5, 3], vec![2, 4], vec![6, 0]]);
    }

    #[test]
    fn test_split_keeps_small_cluster() {
        let endpoints = row(&[0.0, 1.0]);
        assert_eq!(split_cluster(&[0, 1], &endpoints, 5), vec![vec![0, 1]]);
    }

    #[test]
    fn test_cluster_endpoints_respects_max() {
        let xs: Vec<f64> = (0..25).map(f64::from).collect();
        let endpoints = row(&xs);
        let clusters = cluster_endpoints(&endpoints, 1.5, 10);
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.len() <= 10));
        assert_eq!(clusters.iter().map(Vec::len).sum::<usize>(), 25);
    }
}
