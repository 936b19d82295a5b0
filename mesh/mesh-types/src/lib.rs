//! Core mesh types for support generation.
//!
//! This crate provides the triangle-mesh foundation shared by the model
//! being supported and the support geometry generated for it:
//!
//! - [`Vertex`] - A point in 3D space with an optional normal
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices, adjacency,
//!   volume, watertightness and outward orientation
//! - [`Triangle`] - A concrete triangle with ray intersection
//! - [`Aabb`] - Axis-aligned bounding box with a ray slab test
//!
//! # Units
//!
//! All coordinates are `f64` millimetres.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with Z up. The build plate is
//! the horizontal plane at the model's minimum Z; supports grow toward -Z.
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Vertex, IndexedMesh, Point3, MeshTopology};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{axis_aligned_box, unit_cube, IndexedMesh};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
