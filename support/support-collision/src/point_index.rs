//! KD-tree over a fixed point set.

use std::num::NonZero;

use kiddo::SquaredEuclidean;
use kiddo::immutable::float::kdtree::ImmutableKdTree;

use nalgebra::Point3;

type Tree<const K: usize> = ImmutableKdTree<f64, u64, K, 32>;

/// Coordinates of a point as a KD-tree key.
#[must_use]
pub fn to_array(point: &Point3<f64>) -> [f64; 3] {
    [point.x, point.y, point.z]
}

/// XY coordinates of a point as a 2-D KD-tree key.
#[must_use]
pub fn to_xy(point: &Point3<f64>) -> [f64; 2] {
    [point.x, point.y]
}

/// Read-only nearest-neighbour index over points in `K` dimensions.
///
/// Built once from a point set and never mutated, so it can be shared
/// freely between threads. Results carry the index of the point in the
/// original slice and the Euclidean (not squared) distance.
///
/// Coplanar and coincident inputs are fine: flat model faces put every
/// sample on one Z value and a row of support roots shares one X value.
///
/// # Example
///
/// ```
/// use support_collision::PointIndex;
///
/// let index = PointIndex::new(vec![[0.0, 0.0], [3.0, 4.0], [10.0, 0.0]]);
/// let (nearest, distance) = index.nearest(&[2.5, 4.0]).unwrap();
/// assert_eq!(nearest, 1);
/// assert!((distance - 0.5).abs() < 1e-12);
///
/// let near_origin = index.within(&[0.0, 0.0], 5.0);
/// assert_eq!(near_origin.len(), 2);
/// ```
pub struct PointIndex<const K: usize> {
    points: Vec<[f64; K]>,
    tree: Option<Tree<K>>,
}

impl<const K: usize> PointIndex<K> {
    /// Builds the index. An empty point set yields an index that answers
    /// every query with nothing.
    #[must_use]
    pub fn new(points: Vec<[f64; K]>) -> Self {
        let tree = (!points.is_empty()).then(|| Tree::<K>::new_from_slice(&points));
        Self { points, tree }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indexed point by position in the build slice.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&[f64; K]> {
        self.points.get(index)
    }

    /// All indexed points in build order.
    #[must_use]
    pub fn points(&self) -> &[[f64; K]] {
        &self.points
    }

    /// Closest point and its distance.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn nearest(&self, query: &[f64; K]) -> Option<(usize, f64)> {
        let tree = self.tree.as_ref()?;
        let hit = tree.nearest_one::<SquaredEuclidean>(query);
        Some((hit.item as usize, hit.distance.sqrt()))
    }

    /// Up to `k` closest points, nearest first.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn nearest_k(&self, query: &[f64; K], k: usize) -> Vec<(usize, f64)> {
        let (Some(tree), Some(k)) = (self.tree.as_ref(), NonZero::new(k)) else {
            return Vec::new();
        };
        tree.nearest_n::<SquaredEuclidean>(query, k)
            .into_iter()
            .map(|hit| (hit.item as usize, hit.distance.sqrt()))
            .collect()
    }

    /// Every point with distance `<= radius`, nearest first.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn within(&self, query: &[f64; K], radius: f64) -> Vec<(usize, f64)> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        if radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }

        let r2 = radius * radius;
        // Widen the tree query slightly, then apply the exact inclusive bound.
        let mut hits: Vec<(usize, f64)> = tree
            .within::<SquaredEuclidean>(query, r2.mul_add(1.000_001, 1e-12))
            .into_iter()
            .filter(|hit| hit.distance <= r2)
            .map(|hit| (hit.item as usize, hit.distance.sqrt()))
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }
}

impl<const K: usize> std::fmt::Debug for PointIndex<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointIndex")
            .field("dimensions", &K)
            .field("len", &self.points.len())
            .finish_non_exhaustive()
    }
}
