//! Braced triangular towers shared by several support roots.

// Level counts are small positive integers.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use std::f64::consts::TAU;

use mesh_types::IndexedMesh;
use nalgebra::{Point2, Point3, Vector2};
use support_sweep::tapered_segment;
use support_types::{LatticeConfig, SweepConfig};
use tracing::debug;

use crate::hull::{convex_hull, largest_triangle};

/// Fewest brace intervals in a tower.
pub const MIN_LEVEL_INTERVALS: usize = 3;

/// What a tower is made of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TowerKind {
    /// Three main verticals on a triangular base, braced at every level.
    Lattice {
        /// XY corners of the base triangle.
        base: [Point2<f64>; 3],
    },
    /// One vertical strut per member, for clusters too small to brace.
    Struts,
}

/// A support tower serving a cluster of endpoints.
///
/// Built once from the member endpoints and never modified. Each member
/// gets an attachment point, indexed like the members, where its support
/// path should end instead of the build plate.
#[derive(Debug, Clone)]
pub struct LatticeTower {
    kind: TowerKind,
    plate_z: f64,
    top_z: f64,
    intervals: usize,
    attachments: Vec<Point3<f64>>,
    mesh: IndexedMesh,
}

impl LatticeTower {
    /// Builds a tower over `members`.
    ///
    /// # Arguments
    ///
    /// * `members` - Endpoints served by the tower
    /// * `plate_z` - Height of the build plate
    /// * `config` - Strut diameters, level spacing and base radii
    /// * `sweep` - Cross-section resolution of the struts
    ///
    /// # Returns
    ///
    /// `None` when there are no members or no strut could be swept, for
    /// example when every member sits on the plate.
    ///
    /// # Example
    ///
    /// ```
    /// use support_lattice::{LatticeTower, TowerKind};
    /// use support_types::{LatticeConfig, SweepConfig};
    /// use nalgebra::Point3;
    ///
    /// let members = [
    ///     Point3::new(0.0, 0.0, 12.0),
    ///     Point3::new(4.0, 0.0, 15.0),
    ///     Point3::new(0.0, 4.0, 9.0),
    ///     Point3::new(4.0, 4.0, 11.0),
    /// ];
    /// let tower = LatticeTower::build(
    ///     &members,
    ///     0.0,
    ///     &LatticeConfig::default(),
    ///     &SweepConfig::default(),
    /// )
    /// .unwrap();
    ///
    /// assert!(matches!(tower.kind(), TowerKind::Lattice { .. }));
    /// assert!((tower.top_z() - 15.0).abs() < 1e-12);
    /// assert_eq!(tower.attachments().len(), 4);
    /// ```
    #[must_use]
    pub fn build(
        members: &[Point3<f64>],
        plate_z: f64,
        config: &LatticeConfig,
        sweep: &SweepConfig,
    ) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        if members.len() <= 2 {
            return Self::struts(members, plate_z, config, sweep);
        }

        let top_z = members
            .iter()
            .map(|p| p.z)
            .fold(f64::NEG_INFINITY, f64::max);
        let height = top_z - plate_z;
        let intervals = level_intervals(height, config.level_spacing);
        let base = base_triangle(members, config);

        let level_z = |level: usize| plate_z + level as f64 / intervals as f64 * height;
        let at = |corner: usize, z: f64| Point3::new(base[corner].x, base[corner].y, z);
        let main_radius = config.main_diameter / 2.0;
        let strut_radius = config.strut_diameter / 2.0;

        let mut segments = Vec::with_capacity(3 + 6 * intervals + 3);
        for corner in 0..3 {
            segments.push((at(corner, plate_z), at(corner, top_z), main_radius));
        }
        for level in 0..=intervals {
            let z = level_z(level);
            for corner in 0..3 {
                segments.push((at(corner, z), at((corner + 1) % 3, z), strut_radius));
            }
        }
        for level in 0..intervals {
            let (z0, z1) = (level_z(level), level_z(level + 1));
            for corner in 0..3 {
                segments.push((at(corner, z0), at((corner + 1) % 3, z1), strut_radius));
            }
        }

        let mesh = sweep_segments(&segments, sweep)?;
        let attachments = members
            .iter()
            .map(|p| {
                let corner = nearest_corner(&base, p);
                at(corner, top_z)
            })
            .collect();

        Some(Self {
            kind: TowerKind::Lattice { base },
            plate_z,
            top_z,
            intervals,
            attachments,
            mesh,
        })
    }

    /// One main-diameter vertical per member, from the plate up to the
    /// member itself. Members attach where they are.
    fn struts(
        members: &[Point3<f64>],
        plate_z: f64,
        config: &LatticeConfig,
        sweep: &SweepConfig,
    ) -> Option<Self> {
        let radius = config.main_diameter / 2.0;
        let segments: Vec<_> = members
            .iter()
            .map(|p| (Point3::new(p.x, p.y, plate_z), *p, radius))
            .collect();
        let mesh = sweep_segments(&segments, sweep)?;
        let top_z = members
            .iter()
            .map(|p| p.z)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            kind: TowerKind::Struts,
            plate_z,
            top_z,
            intervals: 0,
            attachments: members.to_vec(),
            mesh,
        })
    }

    /// Lattice or plain struts.
    #[must_use]
    pub const fn kind(&self) -> &TowerKind {
        &self.kind
    }

    /// Base triangle corners, for lattice towers.
    #[must_use]
    pub const fn base(&self) -> Option<&[Point2<f64>; 3]> {
        match &self.kind {
            TowerKind::Lattice { base } => Some(base),
            TowerKind::Struts => None,
        }
    }

    /// Height of the build plate under the tower.
    #[must_use]
    pub const fn plate_z(&self) -> f64 {
        self.plate_z
    }

    /// Height of the tower top: the highest member.
    #[must_use]
    pub const fn top_z(&self) -> f64 {
        self.top_z
    }

    /// Tower height above the plate.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.top_z - self.plate_z
    }

    /// Heights of the horizontal brace levels, plate first. Empty for
    /// strut towers.
    #[must_use]
    pub fn level_heights(&self) -> Vec<f64> {
        if self.intervals == 0 {
            return Vec::new();
        }
        (0..=self.intervals)
            .map(|i| self.plate_z + i as f64 / self.intervals as f64 * self.height())
            .collect()
    }

    /// Attachment point of member `index`.
    #[must_use]
    pub fn attachment(&self, index: usize) -> Option<&Point3<f64>> {
        self.attachments.get(index)
    }

    /// Attachment points in member order.
    #[must_use]
    pub fn attachments(&self) -> &[Point3<f64>] {
        &self.attachments
    }

    /// Tower geometry.
    #[must_use]
    pub const fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    /// Consumes the tower, returning its geometry.
    #[must_use]
    pub fn into_mesh(self) -> IndexedMesh {
        self.mesh
    }

    /// Mean angle of the diagonal braces from horizontal, in degrees.
    ///
    /// `None` for strut towers.
    #[must_use]
    pub fn brace_angle_deg(&self) -> Option<f64> {
        let base = self.base()?;
        let rise = self.height() / self.intervals as f64;
        let total: f64 = (0..3)
            .map(|i| {
                let run = (base[(i + 1) % 3] - base[i]).norm();
                rise.atan2(run).to_degrees()
            })
            .sum();
        Some(total / 3.0)
    }
}

/// Brace intervals for a tower of `height`: `max(3, ceil(height / spacing))`.
#[must_use]
pub fn level_intervals(height: f64, level_spacing: f64) -> usize {
    let wanted = (height / level_spacing).ceil();
    if wanted.is_finite() && wanted > 0.0 {
        (wanted as usize).max(MIN_LEVEL_INTERVALS)
    } else {
        MIN_LEVEL_INTERVALS
    }
}

/// Corners of the tower base.
///
/// Three or fewer members get an equilateral triangle of
/// `small_cluster_radius` around their XY centroid. Larger clusters use the
/// widest triangle on their convex hull, or an equilateral triangle of
/// `fallback_radius` when the members are collinear.
#[must_use]
pub fn base_triangle(members: &[Point3<f64>], config: &LatticeConfig) -> [Point2<f64>; 3] {
    let xy: Vec<Point2<f64>> = members.iter().map(|p| Point2::new(p.x, p.y)).collect();
    let centre = centroid(&xy);

    if xy.len() <= 3 {
        return equilateral(&centre, config.small_cluster_radius);
    }
    largest_triangle(&convex_hull(&xy))
        .unwrap_or_else(|| equilateral(&centre, config.fallback_radius))
}

fn centroid(points: &[Point2<f64>]) -> Point2<f64> {
    if points.is_empty() {
        return Point2::origin();
    }
    let sum = points
        .iter()
        .fold(Vector2::<f64>::zeros(), |acc, p| acc + p.coords);
    Point2::from(sum / points.len() as f64)
}

fn equilateral(centre: &Point2<f64>, radius: f64) -> [Point2<f64>; 3] {
    std::array::from_fn(|i| {
        let angle = TAU * i as f64 / 3.0;
        Point2::new(
            radius.mul_add(angle.cos(), centre.x),
            radius.mul_add(angle.sin(), centre.y),
        )
    })
}

/// Base corner closest to `point` in XY; the first wins ties.
fn nearest_corner(base: &[Point2<f64>; 3], point: &Point3<f64>) -> usize {
    let xy = Point2::new(point.x, point.y);
    let mut best = 0;
    for corner in 1..3 {
        if (base[corner] - xy).norm() < (base[best] - xy).norm() {
            best = corner;
        }
    }
    best
}

/// Sweeps every segment and joins the results. Degenerate segments are
/// skipped; `None` if nothing could be swept.
fn sweep_segments(
    segments: &[(Point3<f64>, Point3<f64>, f64)],
    sweep: &SweepConfig,
) -> Option<IndexedMesh> {
    let meshes: Vec<IndexedMesh> = segments
        .iter()
        .filter_map(|&(start, end, radius)| {
            tapered_segment(start, end, radius, radius, sweep)
                .map_err(|e| debug!(error = %e, "Skipped tower strut"))
                .ok()
        })
        .collect();
    if meshes.is_empty() {
        return None;
    }
    Some(IndexedMesh::concat(&meshes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(z: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(6.0, 0.0, z),
            Point3::new(6.0, 6.0, z),
            Point3::new(0.0, 6.0, z),
            Point3::new(3.0, 3.0, z - 2.0),
        ]
    }

    #[test]
    fn test_level_intervals() {
        assert_eq!(level_intervals(5.0, 10.0), 3);
        assert_eq!(level_intervals(35.0, 10.0), 4);
        assert_eq!(level_intervals(40.0, 10.0), 4);
        assert_eq!(level_intervals(0.0, 10.0), 3);
    }

    #[test]
    fn test_strut_counts() {
        let sweep = SweepConfig::default();
        let config = LatticeConfig::default();
        let tower = LatticeTower::build(&square(20.0), 0.0, &config, &sweep).unwrap();

        // ceil(20 / 10) is raised to 3 intervals: 3 verticals, 3 x 4 level
        // braces and 3 x 3 diagonals, each a two-ring strut.
        let per_strut = 2 * sweep.radial_segments + 2;
        assert_eq!(tower.mesh().vertices.len(), (3 + 12 + 9) * per_strut);

        let levels = tower.level_heights();
        assert_eq!(levels.len(), 4);
        for (level, expected) in levels.iter().zip([0.0, 20.0 / 3.0, 40.0 / 3.0, 20.0]) {
            assert_relative_eq!(*level, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_attachments_sit_on_top_corners() {
        let tower = LatticeTower::build(
            &square(20.0),
            1.0,
            &LatticeConfig::default(),
            &SweepConfig::default(),
        )
        .unwrap();
        let base = tower.base().unwrap();
        for a in tower.attachments() {
            assert_relative_eq!(a.z, 20.0);
            assert!(base.iter().any(|c| (c.x - a.x).abs() < 1e-12 && (c.y - a.y).abs() < 1e-12));
        }
        assert_relative_eq!(tower.height(), 19.0);
    }

    #[test]
    fn test_small_cluster_uses_equilateral_base() {
        let members = [
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(1.0, 0.0, 10.0),
            Point3::new(2.0, 0.0, 10.0),
        ];
        let config = LatticeConfig::default();
        let base = base_triangle(&members, &config);
        for corner in &base {
            assert_relative_eq!((corner - Point2::new(1.0, 0.0)).norm(), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_collinear_cluster_falls_back() {
        let members: Vec<Point3<f64>> =
            (0..5).map(|i| Point3::new(f64::from(i), 0.0, 10.0)).collect();
        let base = base_triangle(&members, &LatticeConfig::default());
        for corner in &base {
            assert_relative_eq!((corner - Point2::new(2.0, 0.0)).norm(), 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_two_members_get_struts() {
        let members = [Point3::new(0.0, 0.0, 5.0), Point3::new(3.0, 0.0, 7.0)];
        let tower = LatticeTower::build(
            &members,
            0.0,
            &LatticeConfig::default(),
            &SweepConfig::default(),
        )
        .unwrap();
        assert_eq!(*tower.kind(), TowerKind::Struts);
        assert_eq!(tower.attachments(), &members);
        assert!(tower.brace_angle_deg().is_none());
        assert!(tower.level_heights().is_empty());
    }

    #[test]
    fn test_degenerate_clusters() {
        // Every member on the plate: only zero-length verticals and
        // diagonals, but the horizontal braces still exist.
        let tower = LatticeTower::build(
            &square(0.0)[..4],
            0.0,
            &LatticeConfig::default(),
            &SweepConfig::default(),
        );
        assert!(tower.is_some());

        let on_plate = [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)];
        let struts = LatticeTower::build(
            &on_plate,
            0.0,
            &LatticeConfig::default(),
            &SweepConfig::default(),
        );
        assert!(struts.is_none());
        assert!(
            LatticeTower::build(&[], 0.0, &LatticeConfig::default(), &SweepConfig::default())
                .is_none()
        );
    }

    #[test]
    fn test_brace_angle() {
        // Right triangle base with legs 6: runs 6, 6*sqrt(2), 6.
        let members = [
            Point3::new(0.0, 0.0, 18.0),
            Point3::new(6.0, 0.0, 18.0),
            Point3::new(0.0, 6.0, 18.0),
            Point3::new(1.0, 1.0, 18.0),
        ];
        let tower = LatticeTower::build(
            &members,
            0.0,
            &LatticeConfig::default(),
            &SweepConfig::default(),
        )
        .unwrap();
        let rise = 6.0_f64;
        let expected = (2.0 * rise.atan2(6.0) + rise.atan2(6.0 * 2.0_f64.sqrt())).to_degrees() / 3.0;
        assert_relative_eq!(tower.brace_angle_deg().unwrap(), expected, epsilon = 1e-9);
    }
}
