//! Support path routing.
//!
//! Given a contact point on the model and the build plate height, this
//! crate finds a descending, bend-limited path that stays clear of the
//! model according to a [`support_collision::CollisionIndex`]:
//!
//! - [`PathRouter`] - goal-biased randomized tree search over a
//!   [`RoutingTree`]
//! - [`PathSmoother`] - drops waypoints that can be bypassed
//! - [`PathCost`] - length and bend diagnostics
//!
//! Routing never fails. An exhausted search yields a partial route and a
//! search that cannot leave the contact point yields a straight drop; both
//! are reported through [`RouteOutcome`].
//!
//! # Randomness
//!
//! [`PathRouter::route`] takes any [`rand::Rng`]. Pass a seeded
//! `StdRng` for reproducible paths.
//!
//! # Example
//!
//! ```
//! use support_route::{PathRouter, PathSmoother, RouteOutcome};
//! use support_collision::CollisionIndex;
//! use support_types::{CollisionConfig, RoutingConfig};
//! use nalgebra::Point3;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let collision = CollisionIndex::build(&[], &CollisionConfig::default());
//! let config = RoutingConfig::default();
//! let router = PathRouter::new(&collision, &config);
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let routed = router.route(Point3::new(0.0, 0.0, 6.0), 0.0, 0.15, 5000, &mut rng);
//! assert_eq!(routed.outcome, RouteOutcome::Reached);
//!
//! let smoothed = PathSmoother::new(&collision).smooth(&routed.path, 0.15, 3);
//! assert!(smoothed.len() <= routed.path.len());
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

mod cost;
mod router;
mod smooth;
mod tree;

pub use cost::{BEND_WEIGHT_PER_DEGREE, PathCost};
pub use router::{PathRouter, RouteOutcome, RoutedPath, angle_from_vertical};
pub use smooth::PathSmoother;
pub use tree::{NodeId, RoutingTree};
