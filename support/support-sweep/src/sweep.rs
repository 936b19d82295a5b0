//! Tapered tube sweeping.

use std::f64::consts::TAU;

use mesh_types::{IndexedMesh, Vertex};
use nalgebra::Point3;
use support_types::{SupportPath, SweepConfig};
use tracing::debug;

use crate::densify::{densify, taper_radii};
use crate::error::{SweepError, SweepResult};
use crate::frame::ring_frames;

/// Fewest sides a cross-section may have.
pub const MIN_RADIAL_SEGMENTS: usize = 3;

/// Sweeps a tapered circular tube along a support path.
///
/// The path is densified to `config.segments_per_unit`, the radius runs
/// from `tip_radius` at the first waypoint to `base_radius` at the last by
/// arc length, and both ends are closed with a fan around the end point.
/// The result is closed and faces outward.
///
/// # Errors
///
/// - [`SweepError::TooFewPoints`] for paths with fewer than 2 points
/// - [`SweepError::InvalidRadius`] for a non-positive or non-finite radius
/// - [`SweepError::TooFewSegments`] for fewer than 3 radial segments
/// - [`SweepError::Degenerate`] when every segment has zero length
///
/// # Example
///
/// ```
/// use support_sweep::sweep_path;
/// use support_types::{SupportPath, SweepConfig};
/// use nalgebra::Point3;
///
/// let path = SupportPath::vertical(Point3::new(0.0, 0.0, 10.0), 0.0);
/// let mesh = sweep_path(&path, 0.15, 0.4, &SweepConfig::default()).unwrap();
///
/// assert!(mesh.is_watertight());
/// assert!(mesh.signed_volume() > 0.0);
/// ```
pub fn sweep_path(
    path: &SupportPath,
    tip_radius: f64,
    base_radius: f64,
    config: &SweepConfig,
) -> SweepResult<IndexedMesh> {
    validate(path.len(), &[tip_radius, base_radius], config.radial_segments)?;

    let points = densify(path.points(), config.segments_per_unit);
    if points.len() < 2 {
        return Err(SweepError::Degenerate);
    }
    let radii = taper_radii(&points, tip_radius, base_radius);
    let mesh = sweep_rings(&points, &radii, config.radial_segments);
    debug!(
        rings = points.len(),
        faces = mesh.faces.len(),
        "Swept support path"
    );
    Ok(mesh)
}

/// Sweeps a straight tapered strut between two points without densifying.
///
/// # Errors
///
/// Same conditions as [`sweep_path`]; coincident end points are
/// [`SweepError::Degenerate`].
///
/// # Example
///
/// ```
/// use support_sweep::tapered_segment;
/// use support_types::SweepConfig;
/// use nalgebra::Point3;
///
/// let config = SweepConfig::default();
/// let strut = tapered_segment(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 4.0),
///     0.4,
///     0.4,
///     &config,
/// )
/// .unwrap();
/// // Two rings plus two cap centres.
/// assert_eq!(strut.vertices.len(), 2 * config.radial_segments + 2);
/// ```
pub fn tapered_segment(
    start: Point3<f64>,
    end: Point3<f64>,
    start_radius: f64,
    end_radius: f64,
    config: &SweepConfig,
) -> SweepResult<IndexedMesh> {
    validate(2, &[start_radius, end_radius], config.radial_segments)?;
    if (end - start).norm() < f64::EPSILON {
        return Err(SweepError::Degenerate);
    }
    Ok(sweep_rings(
        &[start, end],
        &[start_radius, end_radius],
        config.radial_segments,
    ))
}

fn validate(point_count: usize, radii: &[f64], radial_segments: usize) -> SweepResult<()> {
    if point_count < 2 {
        return Err(SweepError::TooFewPoints {
            min: 2,
            actual: point_count,
        });
    }
    if let Some(&bad) = radii.iter().find(|r| !r.is_finite() || **r <= 0.0) {
        return Err(SweepError::InvalidRadius(bad));
    }
    if radial_segments < MIN_RADIAL_SEGMENTS {
        return Err(SweepError::TooFewSegments {
            min: MIN_RADIAL_SEGMENTS,
            actual: radial_segments,
        });
    }
    Ok(())
}

/// Rings of `segments` vertices at each point, joined by quads and capped
/// at both ends. Caller guarantees at least two points and matching radii.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn sweep_rings(points: &[Point3<f64>], radii: &[f64], segments: usize) -> IndexedMesh {
    let frames = ring_frames(points);
    let rings = points.len();
    let mut mesh = IndexedMesh::with_capacity(rings * segments + 2, 2 * rings * segments);

    for ((center, frame), &radius) in points.iter().zip(&frames).zip(radii) {
        for j in 0..segments {
            let angle = TAU * j as f64 / segments as f64;
            let radial = frame.radial(angle);
            mesh.vertices
                .push(Vertex::with_normal(center + radial * radius, radial));
        }
    }

    let index = |ring: usize, j: usize| (ring * segments + j % segments) as u32;
    for ring in 1..rings {
        let prev = ring - 1;
        for j in 0..segments {
            mesh.faces
                .push([index(prev, j), index(ring, j), index(prev, j + 1)]);
            mesh.faces
                .push([index(ring, j), index(ring, j + 1), index(prev, j + 1)]);
        }
    }

    let start_center = mesh.vertices.len() as u32;
    mesh.vertices
        .push(Vertex::with_normal(points[0], -frames[0].tangent));
    let end_center = mesh.vertices.len() as u32;
    mesh.vertices
        .push(Vertex::with_normal(points[rings - 1], frames[rings - 1].tangent));

    for j in 0..segments {
        mesh.faces.push([start_center, index(0, j), index(0, j + 1)]);
        mesh.faces
            .push([end_center, index(rings - 1, j + 1), index(rings - 1, j)]);
    }

    mesh.orient_outward();
    mesh
}
