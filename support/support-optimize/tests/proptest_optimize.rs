//! Property-based tests for support point optimization.
//!
//! Run with: cargo test -p support-optimize -- proptest

use nalgebra::Point3;
use proptest::prelude::*;
use support_optimize::{adaptive_spacing_filter, consolidate};
use support_types::{OptimizerConfig, SourceType, SupportPoint, Tier};

// =============================================================================
// Strategies
// =============================================================================

/// Points on a jittered grid, at least `spacing - 2 * jitter` apart.
fn separated_points(spacing: f64) -> impl Strategy<Value = Vec<SupportPoint>> {
    let jitter = spacing * 0.2;
    prop::collection::vec(
        (0_u32..8, 0_u32..8, 0_u32..4, -jitter..jitter, -jitter..jitter),
        1..24,
    )
    .prop_map(move |cells| {
        let mut seen = std::collections::HashSet::new();
        cells
            .into_iter()
            .filter(|&(i, j, k, _, _)| seen.insert((i, j, k)))
            .map(|(i, j, k, dx, dy)| {
                let position = Point3::new(
                    f64::from(i) * spacing + dx,
                    f64::from(j) * spacing + dy,
                    f64::from(k) * spacing,
                );
                SupportPoint::new(position, SourceType::Overhang).with_area(f64::from(i + 1))
            })
            .collect()
    })
}

fn tiered_points() -> impl Strategy<Value = Vec<SupportPoint>> {
    prop::collection::vec(
        (0.0..20.0_f64, 0.0..20.0_f64, 0.0..5.0_f64, 0_usize..3),
        0..40,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(x, y, z, t)| {
                SupportPoint::new(Point3::new(x, y, z), SourceType::Overhang)
                    .with_tier(Tier::ALL[t])
            })
            .collect()
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Consolidation leaves well-separated points exactly as they were.
    #[test]
    fn consolidation_is_identity_when_separated(points in separated_points(5.0)) {
        // Closest pair is at least 5 - 2 * 1 = 3 apart.
        let merged = consolidate(&points, 1.5);
        prop_assert_eq!(merged, points);
    }

    /// Every input point ends up in exactly one output point.
    #[test]
    fn consolidation_preserves_counts(points in separated_points(1.0), radius in 0.0..3.0_f64) {
        let merged = consolidate(&points, radius);
        let total: usize = merged.iter().map(|p| p.merged_count).sum();
        prop_assert_eq!(total, points.len());
        prop_assert!(merged.len() <= points.len());
    }

    /// The filter only removes, keeps order, and never drops heavy points.
    #[test]
    fn spacing_filter_keeps_heavy_in_order(points in tiered_points()) {
        let kept = adaptive_spacing_filter(&points, &OptimizerConfig::default());
        prop_assert!(kept.len() <= points.len());

        let heavy_in = points.iter().filter(|p| p.tier == Some(Tier::Heavy)).count();
        let heavy_out = kept.iter().filter(|p| p.tier == Some(Tier::Heavy)).count();
        prop_assert_eq!(heavy_in, heavy_out);

        // Kept points appear in the input in the same relative order.
        let mut cursor = points.iter();
        for p in &kept {
            prop_assert!(cursor.any(|q| q == p));
        }
    }
}
