//! Property-based tests for the full generation pipeline.
//!
//! Run with: cargo test -p support-gen -- proptest

#![allow(clippy::unwrap_used)]

use mesh_types::{IndexedMesh, MeshTopology, Point3, Vertex, axis_aligned_box};
use proptest::prelude::*;
use support_gen::prelude::*;

/// A 10 x 10 sheet at z = 10 over a small block that sets the plate at z = 0.
fn sheet_over_plate() -> SurfaceModel {
    let mut mesh: IndexedMesh =
        axis_aligned_box(Point3::new(30.0, 0.0, 0.0), Point3::new(31.0, 1.0, 1.0));
    let n = 10_u32;
    let first = mesh.vertices.len() as u32;
    for j in 0..=n {
        for i in 0..=n {
            mesh.vertices
                .push(Vertex::from_coords(f64::from(i), f64::from(j), 10.0));
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
    SurfaceModel::new(mesh).unwrap()
}

fn sheet_points() -> impl Strategy<Value = Vec<SupportPoint>> {
    prop::collection::vec((1.0..9.0_f64, 1.0..9.0_f64, 0.5..8.0_f64), 1..12).prop_map(|raw| {
        raw.into_iter()
            .map(|(x, y, area)| {
                SupportPoint::new(Point3::new(x, y, 10.0), SourceType::Overhang).with_area(area)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Straight supports under a flat sheet always run from their contact
    /// point to the plate, one per optimized point.
    #[test]
    fn straight_supports_span_contact_to_plate(points in sheet_points()) {
        let model = sheet_over_plate();
        let config = SupportConfig::default()
            .with_routing(RoutingConfig::default().with_lateral(false))
            .with_lattice(LatticeConfig::default().with_enabled(false));
        let generator = SupportGenerator::new(&model, &config).unwrap();
        let output = generator.generate(&points);

        let report = &output.summary.optimization;
        prop_assert_eq!(report.input, points.len());
        prop_assert!(!output.supports.is_empty());
        prop_assert!(output.supports.len() <= points.len());
        prop_assert_eq!(output.supports.len(), report.kept);
        prop_assert_eq!(output.summary.routes.vertical, output.supports.len());
        prop_assert_eq!(output.summary.skipped_low, 0);
        prop_assert!(output.towers.is_empty());

        for support in &output.supports {
            let path = support.path.points();
            prop_assert_eq!(path.first(), Some(&support.point.position));
            prop_assert!(path.last().unwrap().z.abs() < 1e-12);
            prop_assert!(support.mesh.as_ref().unwrap().is_watertight());
        }
    }
}
