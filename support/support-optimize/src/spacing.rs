//! Layer-wise thinning of supports that sit too close together.

#![allow(clippy::cast_possible_truncation)]

use std::collections::BTreeMap;

use support_collision::{PointIndex, to_xy};
use support_types::{OptimizerConfig, SupportPoint, Tier};
use tracing::debug;

/// Edge spacing scale for light points.
const LIGHT_SPACING_SCALE: f64 = 0.8;

/// Base spacing scale for heavy points.
const HEAVY_SPACING_SCALE: f64 = 1.5;

/// Minimum spacing around a point of the given tier.
#[must_use]
pub fn min_spacing(tier: Tier, config: &OptimizerConfig) -> f64 {
    match tier {
        Tier::Light => config.edge_spacing * LIGHT_SPACING_SCALE,
        Tier::Medium => config.support_spacing,
        Tier::Heavy => config.support_spacing * HEAVY_SPACING_SCALE,
    }
}

/// Drops lower-priority points crowding higher-priority ones.
///
/// Points are binned into layers of `layer_height` by Z. Within a layer,
/// each surviving point (in input order) removes every other survivor
/// within its [`min_spacing`] in XY whose tier ranks strictly below
/// its own (Heavy > Medium > Light, unclassified counting as Medium).
/// Equal tiers never remove each other. Survivors keep their input order.
#[must_use]
pub fn adaptive_spacing_filter(
    points: &[SupportPoint],
    config: &OptimizerConfig,
) -> Vec<SupportPoint> {
    let mut layers: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, p) in points.iter().enumerate() {
        let layer = (p.position.z / config.layer_height).floor() as i64;
        layers.entry(layer).or_default().push(i);
    }

    let mut kept = vec![true; points.len()];
    for members in layers.values().filter(|m| m.len() > 1) {
        let index = PointIndex::new(members.iter().map(|&i| to_xy(&points[i].position)).collect());
        let mut alive = vec![true; members.len()];

        for (local, &i) in members.iter().enumerate() {
            if !alive[local] {
                continue;
            }
            let tier = points[i].tier.unwrap_or_default();
            let spacing = min_spacing(tier, config);

            for (other, _) in index.within(&to_xy(&points[i].position), spacing) {
                if other == local || !alive[other] {
                    continue;
                }
                let other_tier = points[members[other]].tier.unwrap_or_default();
                if other_tier.priority() > tier.priority() {
                    alive[other] = false;
                }
            }
        }

        for (local, &i) in members.iter().enumerate() {
            kept[i] = alive[local];
        }
    }

    let result: Vec<SupportPoint> = points
        .iter()
        .zip(&kept)
        .filter(|&(_, &keep)| keep)
        .map(|(p, _)| p.clone())
        .collect();
    debug!(
        before = points.len(),
        after = result.len(),
        "Adaptive spacing applied"
    );
    result
}
