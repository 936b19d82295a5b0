//! Lattice tower consolidation of support roots.
//!
//! Many supports ending close together on the build plate waste resin and
//! are fragile on their own. This crate groups their endpoints and replaces
//! the individual roots with shared, braced triangular towers.
//!
//! # Pipeline
//!
//! 1. [`cluster_endpoints`] - XY flood fill within the lattice spacing,
//!    then [`split_cluster`] on anything above the maximum size
//! 2. [`base_triangle`] - widest triangle on the [`convex_hull`] of a
//!    cluster, or a synthesized one for tiny and collinear clusters
//! 3. [`LatticeTower::build`] - three verticals, level braces and diagonal
//!    braces swept with [`support_sweep::tapered_segment`]
//! 4. [`LatticeConsolidator::consolidate`] - all of the above plus
//!    rewriting each member path to end on its tower
//!
//! Towers are built after every path has been routed, since cluster
//! membership depends on all endpoints at once.

#![deny(clippy::unwrap_used, clippy::expect_used)]

mod cluster;
mod consolidator;
mod hull;
mod tower;

pub use cluster::{cluster_endpoints, flood_fill_clusters, split_cluster};
pub use consolidator::{LatticeConsolidator, path_endpoints};
pub use hull::{convex_hull, largest_triangle, triangle_area};
pub use tower::{
    LatticeTower, MIN_LEVEL_INTERVALS, TowerKind, base_triangle, level_intervals,
};
