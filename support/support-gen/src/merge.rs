//! Joining support geometry onto the model.

use mesh_types::{IndexedMesh, MeshTopology};
use tracing::info;

/// Appends the support mesh to the model mesh.
///
/// The result is a disjoint union: the model's vertices and faces come
/// first, unchanged, followed by the supports with reindexed faces. No
/// boolean union is performed. With no supports the model is returned as
/// is.
///
/// # Example
///
/// ```
/// use support_gen::merge_with_model;
/// use mesh_types::{axis_aligned_box, unit_cube, IndexedMesh, Point3};
///
/// let model = unit_cube();
/// let supports = axis_aligned_box(Point3::new(0.4, 0.4, -2.0), Point3::new(0.6, 0.6, 0.0));
///
/// let merged = merge_with_model(&model, &supports);
/// assert_eq!(merged.vertices.len(), 16);
/// assert_eq!(merged.faces.len(), 24);
///
/// let unchanged = merge_with_model(&model, &IndexedMesh::new());
/// assert_eq!(unchanged.faces, model.faces);
/// ```
#[must_use]
pub fn merge_with_model(model: &IndexedMesh, supports: &IndexedMesh) -> IndexedMesh {
    if supports.is_empty() {
        return model.clone();
    }
    let merged = IndexedMesh::concat([model, supports]);
    info!(
        vertices = merged.vertex_count(),
        faces = merged.face_count(),
        "Supports merged with model"
    );
    merged
}
