//! Surface queries and approximate collision checks for support routing.
//!
//! Everything in this crate is built once from the model and then only
//! read, so every structure is `Send + Sync` and can be shared by parallel
//! routing workers without locking.
//!
//! - [`SurfaceQuery`] / [`SurfaceModel`] - the model as the pipeline sees
//!   it: samples, nearest vertex, ray casts, bounds
//! - [`PointIndex`] - KD-tree over a fixed point set (2-D or 3-D)
//! - [`CollisionIndex`] - conservative cylinder-versus-surface checks
//! - [`TriangleBvh`] - ray casting backend
//!
//! # Example
//!
//! ```
//! use support_collision::{CollisionIndex, SurfaceModel, SurfaceQuery};
//! use support_types::CollisionConfig;
//! use mesh_types::axis_aligned_box;
//! use nalgebra::Point3;
//!
//! let model = SurfaceModel::new(axis_aligned_box(
//!     Point3::new(-2.0, -2.0, 0.0),
//!     Point3::new(2.0, 2.0, 4.0),
//! ))
//! .unwrap();
//! let index = CollisionIndex::from_surface(&model, &CollisionConfig::default());
//!
//! // A strut dropping far from the box never comes near it.
//! assert!(!index.cylinder_collides(
//!     &Point3::new(10.0, 0.0, 8.0),
//!     &Point3::new(10.0, 0.0, 0.0),
//!     0.3,
//! ));
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

mod bvh;
mod index;
mod point_index;
mod ray;
mod surface;

pub use bvh::TriangleBvh;
pub use index::{CollisionIndex, MIN_SEGMENT_LENGTH};
pub use point_index::{PointIndex, to_array, to_xy};
pub use ray::{Ray, RayHit};
pub use surface::{SurfaceModel, SurfaceQuery};
