//! Support point optimization.
//!
//! Detectors tend to over-produce support points. This crate reduces them
//! to a set that preserves fine surface detail while keeping enough
//! support where the model is heavy:
//!
//! - [`DetailMap`] - per-vertex curvature and thin-feature analysis, scored
//!   per face
//! - [`consolidate`] - merge points closer than the merge radius
//! - [`classify_tier`] - pick a light, medium or heavy support per point
//! - [`adaptive_spacing_filter`] - drop lower-priority points crowding
//!   higher-priority ones
//! - [`SupportOptimizer`] - all of the above in a fixed order
//!
//! Thin features are found by ray casting when the surface supports it and
//! by a vertex proximity heuristic otherwise; see [`ThinFeatureStrategy`].

#![deny(clippy::unwrap_used, clippy::expect_used)]

mod classify;
mod consolidate;
mod detail;
mod optimizer;
mod spacing;

pub use classify::{
    DEFAULT_ANGLE_DEG, DETAIL_LIGHT_SCORE, FLAT_ANGLE_DEG, LARGE_AREA, LOW_ISLAND_HEIGHT,
    SMALL_AREA, STEEP_ANGLE_DEG, classify_tier,
};
pub use consolidate::{consolidate, merge_points};
pub use detail::{DetailMap, ThinFeatureStrategy};
pub use optimizer::{OptimizationReport, SupportOptimizer};
pub use spacing::{adaptive_spacing_filter, min_spacing};
