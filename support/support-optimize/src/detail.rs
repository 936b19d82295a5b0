//! Per-vertex curvature and thin-feature analysis of the model.

// Mesh indices are u32; conversions to usize never truncate.
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::f64::consts::TAU;

use hashbrown::HashSet;
use mesh_types::{IndexedMesh, MeshTopology, Point3, Vector3};
use rayon::prelude::*;
use support_collision::{PointIndex, Ray, SurfaceQuery, to_array};
use support_types::OptimizerConfig;
use tracing::{debug, info};

/// Weight of mean vertex curvature in a face's detail score.
const CURVATURE_WEIGHT: f64 = 0.7;

/// Score added to a face touching a thin vertex.
const THIN_BONUS: f64 = 0.3;

/// Proximity heuristic: more nearby vertices than this may indicate a thin wall.
const PROXIMITY_NEARBY: usize = 5;

/// Proximity heuristic: more unconnected nearby vertices than this marks a thin wall.
const PROXIMITY_UNCONNECTED: usize = 3;

/// How thin features are detected.
///
/// Chosen once per model from what the surface backend can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinFeatureStrategy {
    /// Cast a ray from each vertex against its averaged normal and measure
    /// the distance to the opposite wall.
    RayCast,
    /// Count nearby vertices that do not share a face with the vertex.
    Proximity,
}

impl ThinFeatureStrategy {
    /// Ray casting when the surface supports it, proximity otherwise.
    #[must_use]
    pub fn for_surface<S: SurfaceQuery + ?Sized>(surface: &S) -> Self {
        if surface.supports_ray_casts() {
            Self::RayCast
        } else {
            Self::Proximity
        }
    }
}

/// Detail analysis of a model surface.
///
/// Combines normalized angle-deficit curvature with a thin-feature flag
/// into a score in `[0, 1]` per face. High scores mark fine detail that
/// should get light supports.
#[derive(Debug, Clone)]
pub struct DetailMap {
    curvature: Vec<f64>,
    thin: Vec<bool>,
    face_scores: Vec<f64>,
    vertex_faces: Vec<Vec<usize>>,
    strategy: ThinFeatureStrategy,
}

impl DetailMap {
    /// Analyzes a surface, picking the thin-feature strategy from its
    /// capabilities.
    #[must_use]
    pub fn analyze<S: SurfaceQuery + ?Sized>(surface: &S, config: &OptimizerConfig) -> Self {
        Self::analyze_with(surface, config, ThinFeatureStrategy::for_surface(surface))
    }

    /// Analyzes a surface with an explicit thin-feature strategy.
    ///
    /// Asking for [`ThinFeatureStrategy::RayCast`] on a surface without ray
    /// casts finds no thin features.
    #[must_use]
    pub fn analyze_with<S: SurfaceQuery + ?Sized>(
        surface: &S,
        config: &OptimizerConfig,
        strategy: ThinFeatureStrategy,
    ) -> Self {
        let mesh = surface.mesh();
        let vertex_faces = mesh.vertex_faces();
        let curvature = vertex_curvature(mesh, &vertex_faces);

        let threshold = config.thin_feature_threshold;
        let thin = match strategy {
            ThinFeatureStrategy::RayCast => thin_by_ray_cast(surface, &vertex_faces, threshold),
            ThinFeatureStrategy::Proximity => thin_by_proximity(mesh, &vertex_faces, threshold),
        };

        let face_scores = mesh
            .faces
            .iter()
            .map(|face| {
                let mean = face.iter().map(|&v| curvature[v as usize]).sum::<f64>() / 3.0;
                let bonus = if face.iter().any(|&v| thin[v as usize]) {
                    THIN_BONUS
                } else {
                    0.0
                };
                CURVATURE_WEIGHT.mul_add(mean, bonus).min(1.0)
            })
            .collect::<Vec<f64>>();

        let map = Self {
            curvature,
            thin,
            face_scores,
            vertex_faces,
            strategy,
        };
        info!(
            faces = map.face_scores.len(),
            high_detail = map.high_detail_faces(config.curvature_threshold),
            thin_vertices = map.thin_vertex_count(),
            strategy = ?strategy,
            "Detail analysis complete"
        );
        map
    }

    /// Normalized curvature per vertex, in `[0, 1]`.
    #[must_use]
    pub fn curvature(&self) -> &[f64] {
        &self.curvature
    }

    /// Thin-feature flag per vertex.
    #[must_use]
    pub fn thin(&self) -> &[bool] {
        &self.thin
    }

    /// Detail score per face, in `[0, 1]`.
    #[must_use]
    pub fn face_scores(&self) -> &[f64] {
        &self.face_scores
    }

    /// Strategy used for thin features.
    #[must_use]
    pub const fn strategy(&self) -> ThinFeatureStrategy {
        self.strategy
    }

    /// Number of vertices flagged thin.
    #[must_use]
    pub fn thin_vertex_count(&self) -> usize {
        self.thin.iter().filter(|&&t| t).count()
    }

    /// Number of faces scoring above `threshold`.
    #[must_use]
    pub fn high_detail_faces(&self, threshold: f64) -> usize {
        self.face_scores.iter().filter(|&&s| s > threshold).count()
    }

    /// Highest score among faces touching `vertex`; 0 for an isolated or
    /// unknown vertex.
    #[must_use]
    pub fn score_at_vertex(&self, vertex: usize) -> f64 {
        self.vertex_faces.get(vertex).map_or(0.0, |faces| {
            faces
                .iter()
                .map(|&f| self.face_scores[f])
                .fold(0.0, f64::max)
        })
    }

    /// Detail score at an arbitrary point: the score of its nearest vertex.
    #[must_use]
    pub fn score_at<S: SurfaceQuery + ?Sized>(
        &self,
        surface: &S,
        point: &Point3<f64>,
    ) -> f64 {
        surface
            .nearest_vertex(point)
            .map_or(0.0, |(vertex, _)| self.score_at_vertex(vertex))
    }
}

/// Angle deficit over a third of the incident area, normalized to `[0, 1]`.
///
/// Vertices with fewer than three incident faces get zero.
fn vertex_curvature(mesh: &IndexedMesh, vertex_faces: &[Vec<usize>]) -> Vec<f64> {
    let areas = mesh.face_areas();
    let mut curvature: Vec<f64> = vertex_faces
        .iter()
        .enumerate()
        .map(|(vertex, faces)| {
            if faces.len() < 3 {
                return 0.0;
            }
            let mut angle_sum = 0.0;
            let mut area = 0.0;
            for &f in faces {
                let face = mesh.faces[f];
                let Some(tri) = mesh.triangle(f) else {
                    continue;
                };
                if let Some(corner) = face.iter().position(|&v| v as usize == vertex) {
                    angle_sum += tri.interior_angle(corner);
                }
                area += areas[f];
            }
            let area = area / 3.0;
            if area > 1e-10 {
                (TAU - angle_sum).abs() / area
            } else {
                0.0
            }
        })
        .collect();

    let max = curvature.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        for c in &mut curvature {
            *c /= max;
        }
    }
    curvature
}

/// Thin if the opposite wall, found by a ray against the averaged face
/// normal, is closer than `threshold`. Incident faces are ignored.
fn thin_by_ray_cast<S: SurfaceQuery + ?Sized>(
    surface: &S,
    vertex_faces: &[Vec<usize>],
    threshold: f64,
) -> Vec<bool> {
    if !surface.supports_ray_casts() {
        debug!("Surface has no ray casts, no thin features detected");
        return vec![false; vertex_faces.len()];
    }
    let mesh = surface.mesh();
    let face_normals = mesh.face_normals();

    mesh.vertices
        .par_iter()
        .zip(vertex_faces.par_iter())
        .map(|(vertex, faces)| {
            if faces.is_empty() {
                return false;
            }
            let sum: Vector3<f64> = faces.iter().map(|&f| face_normals[f]).sum();
            let Some(ray) = Ray::new(vertex.position, -sum) else {
                return false;
            };
            surface
                .closest_hit(&ray, threshold, faces)
                .is_some_and(|hit| hit.distance < threshold)
        })
        .collect()
}

/// Thin if more than five vertices lie within `threshold` and more than
/// three of them share no face with the vertex.
fn thin_by_proximity(
    mesh: &IndexedMesh,
    vertex_faces: &[Vec<usize>],
    threshold: f64,
) -> Vec<bool> {
    let index = PointIndex::new(mesh.vertices.iter().map(|v| to_array(&v.position)).collect());

    (0..mesh.vertex_count())
        .into_par_iter()
        .map(|vertex| {
            let query = to_array(&mesh.vertices[vertex].position);
            let nearby = index.within(&query, threshold);
            if nearby.len() <= PROXIMITY_NEARBY {
                return false;
            }
            let connected: HashSet<usize> = vertex_faces[vertex]
                .iter()
                .flat_map(|&f| mesh.faces[f].iter().map(|&v| v as usize))
                .collect();
            let unconnected = nearby
                .iter()
                .filter(|(other, _)| *other != vertex && !connected.contains(other))
                .count();
            unconnected > PROXIMITY_UNCONNECTED
        })
        .collect()
}
