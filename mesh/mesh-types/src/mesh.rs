//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, Vertex};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Used both for the model being supported and for generated support
/// geometry. Vertices and faces are stored separately, with faces
/// referencing vertices by index.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Vertex positions and optional normals
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside.
/// This means normals point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, Point3, MeshTopology};
///
/// // Create a single triangle
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let mesh = IndexedMesh::new();
    /// assert!(mesh.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `vertex_count` - Expected number of vertices
    /// * `face_count` - Expected number of faces
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let mesh = IndexedMesh::with_capacity(1000, 2000);
    /// assert!(mesh.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
    ///
    /// let vertices = vec![
    ///     Vertex::from_coords(0.0, 0.0, 0.0),
    ///     Vertex::from_coords(1.0, 0.0, 0.0),
    ///     Vertex::from_coords(0.0, 1.0, 0.0),
    /// ];
    /// let faces = vec![[0, 1, 2]];
    ///
    /// let mesh = IndexedMesh::from_parts(vertices, faces);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Area of every face, in face order.
    #[must_use]
    pub fn face_areas(&self) -> Vec<f64> {
        self.triangles().map(|tri| tri.area()).collect()
    }

    /// Unit normal of every face, in face order.
    ///
    /// Degenerate faces get a zero vector.
    #[must_use]
    pub fn face_normals(&self) -> Vec<Vector3<f64>> {
        self.triangles()
            .map(|tri| tri.normal().unwrap_or_else(Vector3::zeros))
            .collect()
    }

    /// For each vertex, the indices of the faces that reference it.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::unit_cube;
    ///
    /// let cube = unit_cube();
    /// let incident = cube.vertex_faces();
    /// assert_eq!(incident.len(), 8);
    /// assert!(incident.iter().all(|faces| faces.len() >= 3));
    /// ```
    #[must_use]
    pub fn vertex_faces(&self) -> Vec<Vec<usize>> {
        let mut incident = vec![Vec::new(); self.vertices.len()];
        for (face_index, face) in self.faces.iter().enumerate() {
            for &v in face {
                if let Some(list) = incident.get_mut(v as usize) {
                    list.push(face_index);
                }
            }
        }
        incident
    }

    /// Number of faces sharing each undirected edge.
    #[must_use]
    pub fn edge_face_counts(&self) -> HashMap<(u32, u32), u32> {
        let mut counts = HashMap::with_capacity(self.faces.len() * 3 / 2);
        for &[a, b, c] in &self.faces {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *counts.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Check whether every undirected edge is shared by exactly two faces.
    ///
    /// An empty mesh is not watertight.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{unit_cube, IndexedMesh, Vertex};
    ///
    /// assert!(unit_cube().is_watertight());
    ///
    /// let open = IndexedMesh::from_parts(
    ///     vec![
    ///         Vertex::from_coords(0.0, 0.0, 0.0),
    ///         Vertex::from_coords(1.0, 0.0, 0.0),
    ///         Vertex::from_coords(0.0, 1.0, 0.0),
    ///     ],
    ///     vec![[0, 1, 2]],
    /// );
    /// assert!(!open.is_watertight());
    /// ```
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        !self.faces.is_empty() && self.edge_face_counts().values().all(|&n| n == 2)
    }

    /// Signed enclosed volume, summed over origin tetrahedra.
    ///
    /// Positive for a closed mesh wound CCW from outside, negative when it
    /// is inside-out. Not meaningful for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|tri| tri.v0.coords.dot(&tri.v1.coords.cross(&tri.v2.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Absolute enclosed volume.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// True when the signed volume is negative.
    #[inline]
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Compute the total surface area of the mesh.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Flip all face normals by reversing winding order.
    ///
    /// Stored vertex normals are negated as well.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
        for vertex in &mut self.vertices {
            if let Some(normal) = vertex.normal.as_mut() {
                *normal = -*normal;
            }
        }
    }

    /// Make a closed mesh face outward: if its signed volume is negative,
    /// flip every face.
    ///
    /// Returns `true` if the mesh was flipped.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::unit_cube;
    ///
    /// let mut cube = unit_cube();
    /// cube.flip_normals();
    /// assert!(cube.orient_outward());
    /// assert!(cube.signed_volume() > 0.0);
    /// assert!(!cube.orient_outward());
    /// ```
    pub fn orient_outward(&mut self) -> bool {
        if self.is_inside_out() {
            self.flip_normals();
            true
        } else {
            false
        }
    }

    /// Append another mesh to this one.
    ///
    /// The other mesh's vertices and faces are appended with face indices
    /// offset past the existing vertices. No vertices are welded.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, vertex counts beyond that are unsupported
    pub fn merge(&mut self, other: &Self) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices.iter().cloned());
        self.faces
            .extend(other.faces.iter().map(|face| face.map(|i| i + offset)));
    }

    /// Disjoint union of several meshes.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{unit_cube, IndexedMesh, MeshTopology};
    ///
    /// let both = IndexedMesh::concat([unit_cube(), unit_cube()].iter());
    /// assert_eq!(both.vertex_count(), 16);
    /// assert_eq!(both.face_count(), 24);
    /// ```
    #[must_use]
    pub fn concat<'a>(meshes: impl IntoIterator<Item = &'a Self>) -> Self {
        let meshes: Vec<&Self> = meshes.into_iter().collect();
        let mut out = Self::with_capacity(
            meshes.iter().map(|m| m.vertices.len()).sum(),
            meshes.iter().map(|m| m.faces.len()).sum(),
        );
        for mesh in meshes {
            out.merge(mesh);
        }
        out
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face_index)?;
        Some(Triangle::new(
            self.vertices.get(i0 as usize)?.position,
            self.vertices.get(i1 as usize)?.position,
            self.vertices.get(i2 as usize)?.position,
        ))
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    fn faces(&self) -> impl Iterator<Item = [u32; 3]> {
        self.faces.iter().copied()
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.faces.iter().map(|&[i0, i1, i2]| {
            Triangle::new(
                self.vertices[i0 as usize].position,
                self.vertices[i1 as usize].position,
                self.vertices[i2 as usize].position,
            )
        })
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Create a unit cube mesh from (0,0,0) to (1,1,1) with outward-facing
/// normals.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    axis_aligned_box(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
}

/// Create a closed box between two corners, wound CCW from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{axis_aligned_box, Point3};
///
/// let slab = axis_aligned_box(Point3::new(-5.0, -5.0, 10.0), Point3::new(5.0, 5.0, 12.0));
/// assert!((slab.volume() - 200.0).abs() < 1e-9);
/// assert!(slab.is_watertight());
/// ```
#[must_use]
pub fn axis_aligned_box(a: Point3<f64>, b: Point3<f64>) -> IndexedMesh {
    let Aabb { min, max } = Aabb::new(a, b);

    let vertices = vec![
        Vertex::from_coords(min.x, min.y, min.z), // 0
        Vertex::from_coords(max.x, min.y, min.z), // 1
        Vertex::from_coords(max.x, max.y, min.z), // 2
        Vertex::from_coords(min.x, max.y, min.z), // 3
        Vertex::from_coords(min.x, min.y, max.z), // 4
        Vertex::from_coords(max.x, min.y, max.z), // 5
        Vertex::from_coords(max.x, max.y, max.z), // 6
        Vertex::from_coords(min.x, max.y, max.z), // 7
    ];

    let faces = vec![
        // -Z
        [0, 2, 1],
        [0, 3, 2],
        // +Z
        [4, 5, 6],
        [4, 6, 7],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [3, 7, 6],
        [3, 6, 2],
        // -X
        [0, 4, 7],
        [0, 7, 3],
        // +X
        [1, 2, 6],
        [1, 6, 5],
    ];

    IndexedMesh::from_parts(vertices, faces)
}
