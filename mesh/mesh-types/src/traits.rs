//! Traits for mesh types.

use crate::{Aabb, Triangle, Vertex};
use nalgebra::Point3;

/// Read access to a triangle mesh's vertices and faces.
///
/// Lets analysis code accept any mesh representation that can hand out
/// positions and index triples.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of faces (triangles).
    fn face_count(&self) -> usize;

    /// True when there are no vertices or no faces.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex by index, `None` if out of bounds.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Face by index as vertex indices, `None` if out of bounds.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Face by index with resolved positions.
    ///
    /// Returns `None` if the face or one of its vertices is out of bounds.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all vertices.
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;

    /// Iterate over all faces as vertex index triples.
    fn faces(&self) -> impl Iterator<Item = [u32; 3]>;

    /// Iterate over all faces with resolved positions.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Types with an axis-aligned extent.
pub trait MeshBounds {
    /// Axis-aligned bounding box; empty if there are no vertices.
    fn bounds(&self) -> Aabb;

    /// Bounding box, or `None` if empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        (!b.is_empty()).then_some(b)
    }

    /// Center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }

    /// Lowest Z, where a model resting on the build plate touches it.
    ///
    /// Returns `None` if empty.
    fn min_z(&self) -> Option<f64> {
        self.bounds_opt().map(|b| b.min.z)
    }
}
