//! Read-only access to the model surface.
//!
//! The rest of the pipeline sees the model only through [`SurfaceQuery`]:
//! sample positions, nearest-vertex lookups, ray casts and bounds. Whether
//! ray casts are available is an explicit capability, so analyses that can
//! fall back to a cheaper heuristic choose their strategy up front.

use mesh_types::{Aabb, IndexedMesh, MeshBounds, MeshTopology};
use nalgebra::Point3;
use support_types::{SupportError, SupportResult};
use tracing::info;

use crate::bvh::TriangleBvh;
use crate::point_index::{PointIndex, to_array};
use crate::ray::{Ray, RayHit};

/// Hits closer together than this along one ray count once.
const DUPLICATE_HIT_TOLERANCE: f64 = 1e-9;

/// Queries the support pipeline needs from the model being supported.
pub trait SurfaceQuery: Send + Sync {
    /// The underlying triangle mesh.
    fn mesh(&self) -> &IndexedMesh;

    /// Closest mesh vertex index and its distance.
    fn nearest_vertex(&self, point: &Point3<f64>) -> Option<(usize, f64)>;

    /// Whether [`SurfaceQuery::ray_hits`] and [`SurfaceQuery::closest_hit`]
    /// return real results.
    fn supports_ray_casts(&self) -> bool;

    /// Every surface hit along the ray, nearest first.
    fn ray_hits(&self, ray: &Ray) -> Vec<RayHit>;

    /// Nearest hit within `max_distance`, ignoring `skip_faces`.
    fn closest_hit(&self, ray: &Ray, max_distance: f64, skip_faces: &[usize])
    -> Option<RayHit>;

    /// Whether every edge is shared by exactly two faces.
    fn is_watertight(&self) -> bool {
        self.mesh().is_watertight()
    }

    /// Bounding box of the model.
    fn bounds(&self) -> Aabb {
        self.mesh().bounds()
    }

    /// Height of the build plate: the model's lowest Z.
    fn plate_z(&self) -> f64 {
        self.mesh().min_z().unwrap_or(0.0)
    }

    /// Positions sampled for collision checks: every vertex followed by
    /// every face centroid.
    fn sample_points(&self) -> Vec<Point3<f64>> {
        let mesh = self.mesh();
        mesh.vertices
            .iter()
            .map(|v| v.position)
            .chain(mesh.triangles().map(|tri| tri.centroid()))
            .collect()
    }

    /// Ray parity test along +Z: odd crossings means inside.
    ///
    /// Returns `None` when ray casts are unavailable.
    fn contains_point(&self, point: &Point3<f64>) -> Option<bool> {
        if !self.supports_ray_casts() {
            return None;
        }
        let hits = self.ray_hits(&Ray::up(*point));
        let mut crossings = 0_usize;
        let mut last = f64::NEG_INFINITY;
        for hit in hits {
            // A ray through a shared edge reports the same crossing twice.
            if hit.distance - last > DUPLICATE_HIT_TOLERANCE {
                crossings += 1;
                last = hit.distance;
            }
        }
        Some(crossings % 2 == 1)
    }

    /// First surface hit straight down from `start`, or `None` if the way
    /// to the plate is clear.
    fn raycast_to_plate(&self, start: &Point3<f64>) -> Option<RayHit> {
        self.closest_hit(&Ray::down(*start), f64::INFINITY, &[])
    }
}

/// A model surface with a vertex KD-tree and an optional triangle BVH.
///
/// # Example
///
/// ```
/// use support_collision::{SurfaceModel, SurfaceQuery};
/// use mesh_types::unit_cube;
/// use nalgebra::Point3;
///
/// let model = SurfaceModel::new(unit_cube()).unwrap();
/// assert!(model.is_watertight());
/// assert_eq!(model.contains_point(&Point3::new(0.5, 0.4, 0.3)), Some(true));
/// assert_eq!(model.contains_point(&Point3::new(2.0, 0.4, 0.3)), Some(false));
/// ```
#[derive(Debug)]
pub struct SurfaceModel {
    mesh: IndexedMesh,
    vertices: PointIndex<3>,
    bvh: Option<TriangleBvh>,
    watertight: bool,
}

impl SurfaceModel {
    /// Wraps a mesh with ray casting enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::EmptySurface`] if the mesh has no vertices or
    /// no faces.
    pub fn new(mesh: IndexedMesh) -> SupportResult<Self> {
        let bvh = TriangleBvh::from_mesh(&mesh);
        Self::assemble(mesh, Some(bvh))
    }

    /// Wraps a mesh without a ray casting backend.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::EmptySurface`] if the mesh has no vertices or
    /// no faces.
    pub fn without_ray_casts(mesh: IndexedMesh) -> SupportResult<Self> {
        Self::assemble(mesh, None)
    }

    fn assemble(mesh: IndexedMesh, bvh: Option<TriangleBvh>) -> SupportResult<Self> {
        if mesh.is_empty() {
            return Err(SupportError::EmptySurface);
        }
        let vertices =
            PointIndex::new(mesh.vertices.iter().map(|v| to_array(&v.position)).collect());
        let watertight = mesh.is_watertight();
        info!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            watertight,
            ray_casts = bvh.is_some(),
            "Model surface loaded"
        );
        Ok(Self {
            mesh,
            vertices,
            bvh,
            watertight,
        })
    }

    /// Enclosed volume, meaningful for watertight models.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.mesh.volume()
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.mesh.surface_area()
    }

    /// Consumes the model, returning the mesh.
    #[must_use]
    pub fn into_mesh(self) -> IndexedMesh {
        self.mesh
    }
}

impl SurfaceQuery for SurfaceModel {
    fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    fn nearest_vertex(&self, point: &Point3<f64>) -> Option<(usize, f64)> {
        self.vertices.nearest(&to_array(point))
    }

    fn supports_ray_casts(&self) -> bool {
        self.bvh.is_some()
    }

    fn ray_hits(&self, ray: &Ray) -> Vec<RayHit> {
        self.bvh.as_ref().map_or_else(Vec::new, |bvh| bvh.all_hits(ray))
    }

    fn closest_hit(&self, ray: &Ray, max_distance: f64, skip_faces: &[usize]) -> Option<RayHit> {
        self.bvh
            .as_ref()
            .and_then(|bvh| bvh.closest_hit(ray, max_distance, skip_faces))
    }

    fn is_watertight(&self) -> bool {
        self.watertight
    }
}
