//! Solid geometry for support paths.
//!
//! Turns a [`support_types::SupportPath`] into a closed triangle mesh by
//! sweeping a circular cross-section along it:
//!
//! 1. Densify the path ([`densify`])
//! 2. Taper the radius by arc length ([`taper_radii`])
//! 3. Place a ring of vertices in a frame perpendicular to the path
//!    ([`RingFrame`])
//! 4. Join consecutive rings with quads, cap both ends with a fan and
//!    orient the result outward
//!
//! Meshes from different supports are never merged with a boolean union;
//! they are concatenated.
//!
//! # Example
//!
//! ```
//! use support_sweep::{sweep_path, SweepError};
//! use support_types::{SupportPath, SweepConfig};
//! use nalgebra::Point3;
//!
//! let config = SweepConfig::default();
//! let path = SupportPath::vertical(Point3::new(0.0, 0.0, 10.0), 0.0);
//! let mesh = sweep_path(&path, 0.15, 0.4, &config).unwrap();
//! assert!(mesh.is_watertight());
//!
//! let point = SupportPath::new(vec![Point3::origin()]);
//! assert!(matches!(
//!     sweep_path(&point, 0.15, 0.4, &config),
//!     Err(SweepError::TooFewPoints { .. })
//! ));
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

mod densify;
mod error;
mod frame;
mod sweep;

pub use densify::{densify, taper_radii};
pub use error::{SweepError, SweepResult};
pub use frame::{RingFrame, ring_frames};
pub use sweep::{MIN_RADIAL_SEGMENTS, sweep_path, tapered_segment};
