//! End-to-end support generation scenarios.

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use mesh_types::{IndexedMesh, MeshTopology, Point3, Vertex, axis_aligned_box};
use support_gen::prelude::*;
use support_gen::RouteCounts;

// =============================================================================
// Helpers
// =============================================================================

/// A flat 10 x 10 sheet at `z`, triangulated on a unit grid and facing up.
fn sheet(mesh: &mut IndexedMesh, z: f64) {
    let n = 10_u32;
    let first = mesh.vertices.len() as u32;
    for j in 0..=n {
        for i in 0..=n {
            mesh.vertices
                .push(Vertex::from_coords(f64::from(i), f64::from(j), z));
        }
    }
    let stride = n + 1;
    for j in 0..n {
        for i in 0..n {
            let a = first + j * stride + i;
            mesh.faces.push([a, a + 1, a + stride + 1]);
            mesh.faces.push([a, a + stride + 1, a + stride]);
        }
    }
}

/// A sheet 10 mm above a small block that sets the plate at z = 0.
fn sheet_over_plate() -> SurfaceModel {
    let mut mesh = axis_aligned_box(Point3::new(30.0, 0.0, 0.0), Point3::new(31.0, 1.0, 1.0));
    sheet(&mut mesh, 10.0);
    SurfaceModel::new(mesh).unwrap()
}

fn straight_down() -> SupportConfig {
    SupportConfig::default().with_routing(RoutingConfig::default().with_lateral(false))
}

fn overhang(x: f64, y: f64, z: f64) -> SupportPoint {
    SupportPoint::new(Point3::new(x, y, z), SourceType::Overhang).with_area(6.0)
}

/// Largest XY distance from `axis` among vertices at height `z`.
fn ring_radius(mesh: &IndexedMesh, axis: &Point3<f64>, z: f64) -> f64 {
    mesh.vertices
        .iter()
        .filter(|v| (v.position.z - z).abs() < 1e-9)
        .map(|v| (v.position.x - axis.x).hypot(v.position.y - axis.y))
        .fold(0.0, f64::max)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn single_point_drops_straight_to_the_plate() {
    let model = sheet_over_plate();
    let generator = SupportGenerator::new(&model, &straight_down()).unwrap();

    let output = generator.generate(&[overhang(5.0, 5.0, 10.0)]);
    assert_eq!(output.supports.len(), 1);

    let support = &output.supports[0];
    assert_eq!(support.point.tier, Some(Tier::Medium));
    assert_eq!(support.route.outcome, RouteOutcome::Vertical);
    assert_eq!(
        support.path.points(),
        &[Point3::new(5.0, 5.0, 10.0), Point3::new(5.0, 5.0, 0.0)]
    );

    let body = support.mesh.as_ref().unwrap();
    let axis = Point3::new(5.0, 5.0, 0.0);
    assert_relative_eq!(ring_radius(body, &axis, 10.0), 0.15, epsilon = 1e-9);
    assert_relative_eq!(ring_radius(body, &axis, 0.0), 0.4, epsilon = 1e-9);
    assert!(body.is_watertight());

    assert!(output.towers.is_empty());
    assert_eq!(output.summary.bodies, 1);
    assert_eq!(output.summary.routes.vertical, 1);
    assert_relative_eq!(output.summary.volume, output.mesh.volume(), epsilon = 1e-9);
}

#[test]
fn no_points_means_no_supports() {
    let model = sheet_over_plate();
    let generator = SupportGenerator::new(&model, &straight_down()).unwrap();
    let output = generator.generate(&[]);

    assert!(output.supports.is_empty());
    assert!(output.mesh.is_empty());
    assert_eq!(output.summary.to_string(), "No supports generated");
}

#[test]
fn empty_surface_is_rejected() {
    let err = SurfaceModel::new(IndexedMesh::new()).unwrap_err();
    assert!(err.is_empty_surface());
}

#[test]
fn invalid_config_is_rejected() {
    let model = sheet_over_plate();
    let config = SupportConfig::default()
        .with_routing(RoutingConfig::default().with_step_size(-1.0));
    let err = SupportGenerator::new(&model, &config).unwrap_err();
    assert!(err.is_invalid_config());
}

#[test]
fn points_near_the_plate_are_skipped() {
    let model = sheet_over_plate();
    let config = straight_down().with_min_support_height(12.0);
    let generator = SupportGenerator::new(&model, &config).unwrap();

    let output = generator.generate(&[overhang(5.0, 5.0, 10.0)]);
    assert!(output.supports.is_empty());
    assert!(output.is_empty());
    assert_eq!(output.summary.skipped_low, 1);
}

#[test]
fn dense_patch_shares_a_lattice_tower() {
    let model = sheet_over_plate();
    let generator = SupportGenerator::new(&model, &straight_down()).unwrap();

    let points: Vec<SupportPoint> = [3.0, 5.0, 7.0]
        .iter()
        .flat_map(|&x| [3.0, 5.0, 7.0].map(|y| overhang(x, y, 10.0)))
        .collect();
    let output = generator.generate(&points);

    assert_eq!(output.supports.len(), 9);
    assert_eq!(output.towers.len(), 1);
    assert_eq!(output.summary.towers, 1);

    let tower = &output.towers[0];
    for support in &output.supports {
        let root = support.path.last().unwrap();
        assert!(tower.attachments().contains(root));
        assert_relative_eq!(support.path.first().unwrap().z, 10.0);
    }
    assert!(output.mesh.face_count() > tower.mesh().faces.len());
}

#[test]
fn seeded_runs_are_reproducible() {
    // A box with a cantilevered shelf; contacts sit under the shelf.
    let mut mesh = axis_aligned_box(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 4.0, 12.0));
    mesh.merge(&axis_aligned_box(
        Point3::new(4.0, 0.0, 10.0),
        Point3::new(12.0, 4.0, 12.0),
    ));
    let model = SurfaceModel::new(mesh).unwrap();
    let config =
        SupportConfig::default().with_routing(RoutingConfig::default().with_seed(1234));
    let generator = SupportGenerator::new(&model, &config).unwrap();

    let points = vec![
        overhang(6.0, 2.0, 10.0),
        overhang(9.0, 1.0, 10.0),
        overhang(11.0, 3.0, 10.0).with_angle(5.0).with_area(20.0),
    ];
    let first = generator.generate(&points);
    let second = generator.generate(&points);

    assert_eq!(first.supports.len(), second.supports.len());
    for (a, b) in first.supports.iter().zip(&second.supports) {
        assert_eq!(a.path, b.path);
        assert_eq!(a.route.outcome, b.route.outcome);
        assert_eq!(a.point.position, a.path.first().copied().unwrap());
        assert!(a.path.last().unwrap().z.abs() < 1e-12);
    }

    let counts: RouteCounts = first.supports.iter().map(|s| s.route.outcome).collect();
    assert_eq!(counts, first.summary.routes);
    assert_eq!(counts.total(), first.supports.len());
    assert_relative_eq!(first.summary.volume, second.summary.volume, epsilon = 1e-12);
}

#[test]
fn merged_output_keeps_the_model_first() {
    let model = sheet_over_plate();
    let generator = SupportGenerator::new(&model, &straight_down()).unwrap();
    let output = generator.generate(&[overhang(5.0, 5.0, 10.0)]);

    let merged = merge_with_model(model.mesh(), &output.mesh);
    assert_eq!(
        merged.face_count(),
        model.mesh().face_count() + output.mesh.face_count()
    );
    assert_eq!(&merged.faces[..model.mesh().faces.len()], &model.mesh().faces[..]);
}
