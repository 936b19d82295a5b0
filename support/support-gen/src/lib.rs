//! Resin support generation for 3D printing.
//!
//! This crate ties the support-* crates into one pipeline: given a model
//! surface and the contact points a detector found on it, it produces the
//! support geometry that holds the model up during a resin print.
//!
//! # Quick Start
//!
//! ```
//! use support_gen::prelude::*;
//! use mesh_types::{axis_aligned_box, Point3};
//!
//! let model = SurfaceModel::new(axis_aligned_box(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(4.0, 4.0, 2.0),
//! ))
//! .unwrap();
//!
//! let config = SupportConfig::default()
//!     .with_routing(RoutingConfig::default().with_seed(42));
//! let generator = SupportGenerator::new(&model, &config).unwrap();
//!
//! // Nothing overhangs, so nothing is generated.
//! let output = generator.generate(&[]);
//! assert!(output.is_empty());
//!
//! let printable = merge_with_model(model.mesh(), &output.mesh);
//! assert_eq!(printable.faces.len(), 12);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Support points, paths, configuration and errors
//! - [`collision`] - Model surface queries and the collision index
//! - [`route`] - Randomized tree routing and path smoothing
//! - [`optimize`] - Point consolidation, tier classification, spacing
//! - [`sweep`] - Tapered tube sweeping
//! - [`lattice`] - Braced towers for clustered supports
//!
//! # Pipeline
//!
//! [`SupportGenerator::generate`] optimizes the points, routes each one to
//! the plate in parallel, smooths the routes, gathers clustered roots into
//! lattice towers and sweeps every path into a mesh. The result carries
//! each support with its route outcome, the towers, the combined mesh and
//! a [`SupportSummary`].

#![deny(clippy::unwrap_used, clippy::expect_used)]

mod generator;
mod merge;
mod summary;

pub use generator::{GeneratedSupport, SupportGenerator, SupportOutput};
pub use merge::merge_with_model;
pub use summary::{RouteCounts, SupportSummary};

// =============================================================================
// Re-exports
// =============================================================================

/// Support points, paths, configuration and errors.
pub use support_types as types;

/// Model surface queries and the collision index.
pub use support_collision as collision;

/// Randomized tree routing and path smoothing.
pub use support_route as route;

/// Point consolidation, tier classification and spacing.
pub use support_optimize as optimize;

/// Tapered tube sweeping.
pub use support_sweep as sweep;

/// Braced towers for clustered supports.
pub use support_lattice as lattice;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for support generation.
///
/// # Usage
///
/// ```
/// use support_gen::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use support_types::{
        LatticeConfig, OptimizerConfig, RoutingConfig, SourceType, SupportConfig, SupportError,
        SupportPath, SupportPoint, SupportResult, Tier,
    };

    // Surface
    pub use support_collision::{CollisionIndex, SurfaceModel, SurfaceQuery};

    // Routing
    pub use support_route::RouteOutcome;

    // Pipeline
    pub use crate::{
        GeneratedSupport, SupportGenerator, SupportOutput, SupportSummary, merge_with_model,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _config = SupportConfig::default();
        let _point = SupportPoint::new(mesh_types::Point3::origin(), SourceType::Island);
        let _outcome = RouteOutcome::Vertical;
    }

    #[test]
    fn test_module_reexports() {
        use crate::lattice::level_intervals;
        use crate::sweep::MIN_RADIAL_SEGMENTS;

        assert_eq!(MIN_RADIAL_SEGMENTS, 3);
        assert!(level_intervals(10.0, 3.0) >= 3);
    }
}
