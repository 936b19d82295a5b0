//! Bounding volume hierarchy over mesh triangles for ray queries.

use mesh_types::{Aabb, IndexedMesh, MeshTopology, Triangle};
use nalgebra::{Point3, Vector3};

use crate::ray::{Ray, RayHit};

/// Faces per leaf.
const LEAF_SIZE: usize = 4;

/// Hits closer than this to the ray origin are ignored.
const HIT_EPSILON: f64 = 1e-9;

#[derive(Debug)]
enum BvhNode {
    Leaf {
        bounds: Aabb,
        start: usize,
        count: usize,
    },
    Internal {
        bounds: Aabb,
        left: usize,
        right: usize,
    },
}

impl BvhNode {
    const fn bounds(&self) -> &Aabb {
        match self {
            Self::Leaf { bounds, .. } | Self::Internal { bounds, .. } => bounds,
        }
    }
}

/// Median-split BVH over the faces of a mesh.
///
/// Nodes live in a flat arena; leaves reference contiguous runs of a face
/// permutation.
#[derive(Debug)]
pub struct TriangleBvh {
    triangles: Vec<Triangle>,
    order: Vec<usize>,
    nodes: Vec<BvhNode>,
    root: Option<usize>,
}

impl TriangleBvh {
    /// Builds the hierarchy over every face of `mesh`.
    #[must_use]
    pub fn from_mesh(mesh: &IndexedMesh) -> Self {
        Self::build(mesh.triangles().collect())
    }

    /// Builds the hierarchy over a triangle list; face indices in hits are
    /// positions in this list.
    #[must_use]
    pub fn build(triangles: Vec<Triangle>) -> Self {
        let centroids: Vec<Point3<f64>> = triangles.iter().map(Triangle::centroid).collect();
        let mut bvh = Self {
            order: (0..triangles.len()).collect(),
            nodes: Vec::with_capacity(2 * triangles.len() / LEAF_SIZE + 1),
            triangles,
            root: None,
        };
        if !bvh.triangles.is_empty() {
            let len = bvh.triangles.len();
            bvh.root = Some(bvh.build_range(&centroids, 0, len));
        }
        bvh
    }

    fn build_range(&mut self, centroids: &[Point3<f64>], start: usize, end: usize) -> usize {
        let mut bounds = Aabb::empty();
        for &face in &self.order[start..end] {
            for v in self.triangles[face].vertices() {
                bounds.expand_to_include(&v);
            }
        }

        if end - start <= LEAF_SIZE {
            self.nodes.push(BvhNode::Leaf {
                bounds,
                start,
                count: end - start,
            });
            return self.nodes.len() - 1;
        }

        let extent = bounds.size();
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        let mid = (end - start) / 2;
        self.order[start..end].select_nth_unstable_by(mid, |&a, &b| {
            centroids[a][axis].total_cmp(&centroids[b][axis])
        });

        let left = self.build_range(centroids, start, start + mid);
        let right = self.build_range(centroids, start + mid, end);
        self.nodes.push(BvhNode::Internal {
            bounds,
            left,
            right,
        });
        self.nodes.len() - 1
    }

    /// Number of indexed faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True when there are no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Closest hit within `max_distance`, ignoring faces in `skip_faces`.
    #[must_use]
    pub fn closest_hit(
        &self,
        ray: &Ray,
        max_distance: f64,
        skip_faces: &[usize],
    ) -> Option<RayHit> {
        let root = self.root?;
        let inv = inverse(&ray.direction);
        let mut best: Option<(f64, usize)> = None;
        let mut stack = vec![root];

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            let limit = best.map_or(max_distance, |(t, _)| t);
            match node.bounds().ray_interval(&ray.origin, &inv) {
                Some((enter, _)) if enter <= limit => {}
                _ => continue,
            }

            match *node {
                BvhNode::Leaf { start, count, .. } => {
                    for &face in &self.order[start..start + count] {
                        if skip_faces.contains(&face) {
                            continue;
                        }
                        let hit = self.triangles[face].intersect_ray(
                            &ray.origin,
                            &ray.direction,
                            HIT_EPSILON,
                        );
                        if let Some(t) = hit.filter(|&t| t <= limit) {
                            if best.is_none_or(|(bt, _)| t < bt) {
                                best = Some((t, face));
                            }
                        }
                    }
                }
                BvhNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        best.map(|(distance, face)| RayHit {
            distance,
            point: ray.at(distance),
            face,
        })
    }

    /// Every hit along the ray, nearest first.
    #[must_use]
    pub fn all_hits(&self, ray: &Ray) -> Vec<RayHit> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        let inv = inverse(&ray.direction);
        let mut hits = Vec::new();
        let mut stack = vec![root];

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.bounds().ray_interval(&ray.origin, &inv).is_none() {
                continue;
            }
            match *node {
                BvhNode::Leaf { start, count, .. } => {
                    for &face in &self.order[start..start + count] {
                        if let Some(t) = self.triangles[face].intersect_ray(
                            &ray.origin,
                            &ray.direction,
                            HIT_EPSILON,
                        ) {
                            hits.push(RayHit {
                                distance: t,
                                point: ray.at(t),
                                face,
                            });
                        }
                    }
                }
                BvhNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.face.cmp(&b.face)));
        hits
    }
}

fn inverse(direction: &Vector3<f64>) -> Vector3<f64> {
    direction.map(|c| 1.0 / c)
}
