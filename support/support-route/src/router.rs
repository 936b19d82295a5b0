//! Goal-biased randomized tree search from a contact point to a target height.

use std::f64::consts::TAU;
use std::fmt;

use nalgebra::{Point3, Vector3};
use rand::Rng;
use support_collision::{CollisionIndex, MIN_SEGMENT_LENGTH};
use support_types::{RoutingConfig, SupportPath};
use tracing::{debug, warn};

use crate::tree::RoutingTree;

/// Points closer than this to the target height count as already there.
const TARGET_SNAP: f64 = 1e-9;

/// How a routed path was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteOutcome {
    /// No search was needed: lateral routing is off or the start is already
    /// at or below the target.
    Vertical,
    /// The tree reached the target height.
    Reached,
    /// The budget ran out; the path leads from the lowest node found
    /// straight down to the target.
    Partial,
    /// No node could be grown from the start; the path is a straight drop.
    Fallback,
}

impl RouteOutcome {
    /// Whether the path is a degraded result of an exhausted search.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Partial | Self::Fallback)
    }

    /// Lowercase label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Reached => "reached",
            Self::Partial => "partial",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A routed path together with search statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    /// Waypoints from the contact point down to the target height.
    pub path: SupportPath,
    /// How the path was obtained.
    pub outcome: RouteOutcome,
    /// Search iterations spent.
    pub iterations: usize,
    /// Nodes in the search tree when the search ended, root included.
    pub tree_nodes: usize,
}

impl RoutedPath {
    fn vertical(
        start: Point3<f64>,
        target_z: f64,
        outcome: RouteOutcome,
        iterations: usize,
    ) -> Self {
        Self {
            path: SupportPath::vertical(start, target_z),
            outcome,
            iterations,
            tree_nodes: 1,
        }
    }
}

/// Routes support paths around the model.
///
/// Each call grows a fresh [`RoutingTree`] from the contact point. Samples
/// are drawn either straight below the start (with probability
/// `goal_bias`) or inside a downward cone whose half-angle is the maximum
/// bend angle. The nearest node is steered at most one step toward the
/// sample and the new node is kept only if it is strictly lower than its
/// parent, within the bend angle of vertical and clear of the model.
///
/// # Example
///
/// ```
/// use support_route::{PathRouter, RouteOutcome};
/// use support_collision::CollisionIndex;
/// use support_types::{CollisionConfig, RoutingConfig};
/// use nalgebra::Point3;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let collision = CollisionIndex::build(&[], &CollisionConfig::default());
/// let router = PathRouter::new(&collision, &RoutingConfig::default().with_lateral(false));
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let routed = router.route(Point3::new(0.0, 0.0, 10.0), 0.0, 0.15, 500, &mut rng);
/// assert_eq!(routed.outcome, RouteOutcome::Vertical);
/// assert_eq!(routed.path.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PathRouter<'a> {
    collision: &'a CollisionIndex,
    config: RoutingConfig,
}

impl<'a> PathRouter<'a> {
    /// Creates a router over a collision index.
    #[must_use]
    pub fn new(collision: &'a CollisionIndex, config: &RoutingConfig) -> Self {
        Self {
            collision,
            config: config.clone(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Routes from `start` down to `target_z` for a strut of `radius`.
    ///
    /// Never fails: when the search cannot reach the target the result is a
    /// partial route or a straight drop, flagged by
    /// [`RoutedPath::outcome`].
    pub fn route<R: Rng + ?Sized>(
        &self,
        start: Point3<f64>,
        target_z: f64,
        radius: f64,
        max_iterations: usize,
        rng: &mut R,
    ) -> RoutedPath {
        if !self.config.lateral_enabled || start.z <= target_z {
            return RoutedPath::vertical(start, target_z, RouteOutcome::Vertical, 0);
        }

        let step = self.config.step_size;
        let max_angle = self.config.max_angle_rad();
        let cone_radius = (start.z - target_z) * max_angle.tan();
        let mut tree = RoutingTree::new(start);

        for iteration in 1..=max_iterations {
            let sample = self.sample(&start, target_z, cone_radius, rng);
            let parent_id = tree.nearest(&sample);
            let parent = tree.position(parent_id);

            let toward = sample - parent;
            let distance = toward.norm();
            if distance < MIN_SEGMENT_LENGTH {
                continue;
            }
            let candidate = if distance > step {
                parent + toward * (step / distance)
            } else {
                sample
            };

            if !self.segment_allowed(&parent, &candidate, radius, max_angle) {
                continue;
            }

            let node = tree.insert(candidate, parent_id);
            if candidate.z <= target_z + step {
                let path = finish_at_target(tree.path_to(node), target_z);
                return RoutedPath {
                    path,
                    outcome: RouteOutcome::Reached,
                    iterations: iteration,
                    tree_nodes: tree.len(),
                };
            }
        }

        if tree.only_root() {
            warn!(
                x = start.x,
                y = start.y,
                z = start.z,
                iterations = max_iterations,
                "Routing found no clear first step, using a straight support"
            );
            return RoutedPath::vertical(start, target_z, RouteOutcome::Fallback, max_iterations);
        }

        let lowest = tree.lowest();
        debug!(
            lowest_z = tree.position(lowest).z,
            target_z,
            nodes = tree.len(),
            "Routing budget exhausted, using partial route"
        );
        RoutedPath {
            path: finish_at_target(tree.path_to(lowest), target_z),
            outcome: RouteOutcome::Partial,
            iterations: max_iterations,
            tree_nodes: tree.len(),
        }
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        start: &Point3<f64>,
        target_z: f64,
        cone_radius: f64,
        rng: &mut R,
    ) -> Point3<f64> {
        let z = rng.gen_range(target_z..=start.z);
        if rng.gen_range(0.0..1.0) < self.config.goal_bias {
            return Point3::new(start.x, start.y, z);
        }
        let r = if cone_radius.is_finite() && cone_radius > 0.0 {
            rng.gen_range(0.0..=cone_radius)
        } else {
            0.0
        };
        let theta = rng.gen_range(0.0..TAU);
        Point3::new(start.x + r * theta.cos(), start.y + r * theta.sin(), z)
    }

    fn segment_allowed(
        &self,
        from: &Point3<f64>,
        to: &Point3<f64>,
        radius: f64,
        max_angle: f64,
    ) -> bool {
        if to.z >= from.z {
            return false;
        }
        if angle_from_vertical(&(to - from)) > max_angle {
            return false;
        }
        !self.collision.cylinder_collides(from, to, radius)
    }
}

/// Angle in radians between `direction` and straight down.
#[must_use]
pub fn angle_from_vertical(direction: &Vector3<f64>) -> f64 {
    let length = direction.norm();
    if length == 0.0 {
        return 0.0;
    }
    (-direction.z / length).clamp(-1.0, 1.0).acos()
}

/// Ends the waypoint list exactly at `target_z`, snapping the last point
/// when it is already there.
fn finish_at_target(mut points: Vec<Point3<f64>>, target_z: f64) -> SupportPath {
    if let Some(last) = points.last_mut() {
        if (last.z - target_z).abs() <= TARGET_SNAP {
            last.z = target_z;
        } else {
            let end = Point3::new(last.x, last.y, target_z);
            points.push(end);
        }
    }
    SupportPath::new(points)
}
