//! Benchmarks for support-collision queries.
//!
//! Run with: cargo bench -p support-collision

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use support_collision::{CollisionIndex, Ray, SurfaceModel, SurfaceQuery};
use support_types::CollisionConfig;

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Flat n x n grid of unit quads at height `z`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn create_plate(n: usize, z: f64) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    for j in 0..=n {
        for i in 0..=n {
            mesh.vertices
                .push(Vertex::from_coords(i as f64, j as f64, z));
        }
    }
    let stride = (n + 1) as u32;
    for j in 0..n as u32 {
        for i in 0..n as u32 {
            let a = j * stride + i;
            mesh.faces.push([a, a + 1, a + stride + 1]);
            mesh.faces.push([a, a + stride + 1, a + stride]);
        }
    }
    mesh
}

// =============================================================================
// Collision Benchmarks
// =============================================================================

#[allow(clippy::cast_precision_loss)]
fn bench_cylinder_collides(c: &mut Criterion) {
    let mut group = c.benchmark_group("CylinderCollides");

    for n in [16_usize, 64, 128] {
        let model = SurfaceModel::without_ray_casts(create_plate(n, 5.0)).unwrap_or_else(|e| {
            panic!("plate mesh is not empty: {e}");
        });
        let index = CollisionIndex::from_surface(&model, &CollisionConfig::default());
        let extent = n as f64;

        let mut rng = StdRng::seed_from_u64(7);
        let segments: Vec<(Point3<f64>, Point3<f64>)> = (0..256)
            .map(|_| {
                let x = rng.gen_range(0.0..extent);
                let y = rng.gen_range(0.0..extent);
                (Point3::new(x, y, 12.0), Point3::new(x + 1.0, y, 0.0))
            })
            .collect();

        group.throughput(Throughput::Elements(segments.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("vertical_segments", index.len()),
            &segments,
            |b, segments| {
                b.iter(|| {
                    segments
                        .iter()
                        .filter(|(a, z)| index.cylinder_collides(black_box(a), black_box(z), 0.2))
                        .count()
                });
            },
        );
    }

    group.finish();
}

fn bench_ray_casts(c: &mut Criterion) {
    let mut group = c.benchmark_group("RayCasts");

    for n in [16_usize, 64, 128] {
        let model = SurfaceModel::new(create_plate(n, 5.0)).unwrap_or_else(|e| {
            panic!("plate mesh is not empty: {e}");
        });
        #[allow(clippy::cast_precision_loss)]
        let center = n as f64 / 2.0 + 0.25;

        group.bench_with_input(
            BenchmarkId::new("raycast_to_plate", model.mesh().faces.len()),
            &model,
            |b, model| {
                b.iter(|| model.raycast_to_plate(black_box(&Point3::new(center, center, 20.0))));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("all_hits", model.mesh().faces.len()),
            &model,
            |b, model| {
                b.iter(|| model.ray_hits(black_box(&Ray::up(Point3::new(center, center, 0.0)))));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_cylinder_collides, bench_ray_casts);
criterion_main!(benches);
