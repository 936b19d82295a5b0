//! The optimization pipeline: consolidate, classify, thin out.

use std::fmt;

use support_collision::SurfaceQuery;
use support_types::{OptimizerConfig, SupportPoint, Tier};
use tracing::info;

use crate::classify::classify_tier;
use crate::consolidate::consolidate;
use crate::detail::DetailMap;
use crate::spacing::adaptive_spacing_filter;

/// Point counts through one optimizer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizationReport {
    /// Points handed in.
    pub input: usize,
    /// Points left after consolidation.
    pub consolidated: usize,
    /// Points left after the spacing filter.
    pub kept: usize,
    /// Kept points per tier, lightest first.
    pub tiers: [usize; 3],
}

impl OptimizationReport {
    /// Kept points of one tier.
    #[must_use]
    pub const fn tier_count(&self, tier: Tier) -> usize {
        match tier {
            Tier::Light => self.tiers[0],
            Tier::Medium => self.tiers[1],
            Tier::Heavy => self.tiers[2],
        }
    }

    /// Points removed by merging or filtering.
    #[must_use]
    pub const fn removed(&self) -> usize {
        self.input.saturating_sub(self.kept)
    }
}

impl fmt::Display for OptimizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} -> {} points (light {}, medium {}, heavy {})",
            self.input, self.consolidated, self.kept, self.tiers[0], self.tiers[1], self.tiers[2]
        )
    }
}

/// Detail-aware support point optimizer.
///
/// The detail analysis runs once at construction; every later call reuses
/// it. The pipeline order is fixed and never adds points:
///
/// 1. [`consolidate`](Self::consolidate) nearby points
/// 2. [`assign_tiers`](Self::assign_tiers) from detail, angle, area and source
/// 3. [`filter`](Self::filter) crowded lower-priority points
///
/// # Example
///
/// ```
/// use support_collision::SurfaceModel;
/// use support_optimize::SupportOptimizer;
/// use support_types::{OptimizerConfig, SourceType, SupportPoint};
/// use mesh_types::{axis_aligned_box, Point3};
///
/// let model = SurfaceModel::new(axis_aligned_box(
///     Point3::new(-10.0, -10.0, 0.0),
///     Point3::new(10.0, 10.0, 20.0),
/// ))
/// .unwrap();
/// let optimizer = SupportOptimizer::new(&model, &OptimizerConfig::default());
///
/// let points = vec![
///     SupportPoint::new(Point3::new(0.0, 0.0, 20.0), SourceType::Overhang).with_area(4.0),
///     SupportPoint::new(Point3::new(0.5, 0.0, 20.0), SourceType::Overhang).with_area(4.0),
/// ];
/// let optimized = optimizer.optimize(&points);
/// assert_eq!(optimized.len(), 1);
/// assert!(optimized[0].tier.is_some());
/// ```
#[derive(Debug)]
pub struct SupportOptimizer<'a, S: SurfaceQuery + ?Sized> {
    surface: &'a S,
    config: OptimizerConfig,
    detail: DetailMap,
}

impl<'a, S: SurfaceQuery + ?Sized> SupportOptimizer<'a, S> {
    /// Analyzes the surface and prepares the optimizer.
    #[must_use]
    pub fn new(surface: &'a S, config: &OptimizerConfig) -> Self {
        let detail = DetailMap::analyze(surface, config);
        Self {
            surface,
            config: config.clone(),
            detail,
        }
    }

    /// Uses an existing detail analysis instead of recomputing it.
    #[must_use]
    pub fn with_detail(surface: &'a S, config: &OptimizerConfig, detail: DetailMap) -> Self {
        Self {
            surface,
            config: config.clone(),
            detail,
        }
    }

    /// The surface analysis.
    #[must_use]
    pub const fn detail_map(&self) -> &DetailMap {
        &self.detail
    }

    /// Optimizer settings.
    #[must_use]
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Detail score of the surface near `point`.
    #[must_use]
    pub fn detail_score_at(&self, point: &SupportPoint) -> f64 {
        self.detail.score_at(self.surface, &point.position)
    }

    /// Merges points within the configured merge radius.
    #[must_use]
    pub fn consolidate(&self, points: &[SupportPoint]) -> Vec<SupportPoint> {
        consolidate(points, self.config.merge_radius)
    }

    /// Returns the points with their tiers set.
    #[must_use]
    pub fn assign_tiers(&self, points: &[SupportPoint]) -> Vec<SupportPoint> {
        let plate_z = self.surface.plate_z();
        points
            .iter()
            .map(|p| {
                let tier = classify_tier(p, self.detail_score_at(p), plate_z);
                p.clone().with_tier(tier)
            })
            .collect()
    }

    /// Applies the adaptive spacing filter.
    #[must_use]
    pub fn filter(&self, points: &[SupportPoint]) -> Vec<SupportPoint> {
        adaptive_spacing_filter(points, &self.config)
    }

    /// Runs the whole pipeline.
    #[must_use]
    pub fn optimize(&self, points: &[SupportPoint]) -> Vec<SupportPoint> {
        self.optimize_with_report(points).0
    }

    /// Runs the whole pipeline and reports the counts at each stage.
    #[must_use]
    pub fn optimize_with_report(
        &self,
        points: &[SupportPoint],
    ) -> (Vec<SupportPoint>, OptimizationReport) {
        if points.is_empty() {
            return (Vec::new(), OptimizationReport::default());
        }

        let consolidated = self.consolidate(points);
        let classified = self.assign_tiers(&consolidated);
        let kept = self.filter(&classified);

        let mut tiers = [0_usize; 3];
        for tier in kept.iter().filter_map(|p| p.tier) {
            tiers[usize::from(2 - tier.priority())] += 1;
        }
        let report = OptimizationReport {
            input: points.len(),
            consolidated: consolidated.len(),
            kept: kept.len(),
            tiers,
        };
        info!(
            input = report.input,
            consolidated = report.consolidated,
            kept = report.kept,
            light = tiers[0],
            medium = tiers[1],
            heavy = tiers[2],
            "Support points optimized"
        );
        (kept, report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mesh_types::{Point3, axis_aligned_box};
    use support_collision::SurfaceModel;
    use support_types::SourceType;

    fn block() -> SurfaceModel {
        SurfaceModel::new(axis_aligned_box(
            Point3::new(-10.0, -10.0, 0.0),
            Point3::new(10.0, 10.0, 20.0),
        ))
        .unwrap()
    }

    #[test]
    fn test_empty_input() {
        let model = block();
        let optimizer = SupportOptimizer::new(&model, &OptimizerConfig::default());
        let (points, report) = optimizer.optimize_with_report(&[]);
        assert!(points.is_empty());
        assert_eq!(report, OptimizationReport::default());
    }

    #[test]
    fn test_box_corners_make_every_face_detailed() {
        let model = block();
        let optimizer = SupportOptimizer::new(&model, &OptimizerConfig::default());

        // Every face touches at least two corners of curvature one.
        let centre = SupportPoint::new(Point3::new(0.0, 0.0, 10.0), SourceType::Island)
            .with_area(5.0);
        assert!(optimizer.detail_score_at(&centre) > 0.6);

        let low_island = SupportPoint::new(Point3::new(0.0, 0.0, 2.0), SourceType::Island)
            .with_area(5.0);
        let tiers = optimizer.assign_tiers(&[low_island]);
        assert_eq!(tiers[0].tier, Some(Tier::Light));
        assert_eq!(optimizer.detail_map().high_detail_faces(0.6), 12);
    }

    #[test]
    fn test_pipeline_never_adds_points() {
        let model = block();
        let optimizer = SupportOptimizer::new(&model, &OptimizerConfig::default());
        let points: Vec<SupportPoint> = (0..20)
            .map(|i| {
                let x = f64::from(i % 5) * 0.9 - 2.0;
                let y = f64::from(i / 5) * 0.9 - 2.0;
                SupportPoint::new(Point3::new(x, y, 20.0), SourceType::Overhang)
                    .with_area(f64::from(i))
            })
            .collect();
        let (kept, report) = optimizer.optimize_with_report(&points);
        assert_eq!(report.input, 20);
        assert!(report.consolidated <= report.input);
        assert!(report.kept <= report.consolidated);
        assert_eq!(kept.len(), report.kept);
        assert_eq!(report.tiers.iter().sum::<usize>(), report.kept);
        assert!(kept.iter().all(|p| p.tier.is_some()));
        assert_eq!(report.removed(), 20 - report.kept);
    }

    #[test]
    fn test_report_display() {
        let report = OptimizationReport {
            input: 10,
            consolidated: 7,
            kept: 5,
            tiers: [1, 3, 1],
        };
        assert_eq!(report.to_string(), "10 -> 7 -> 5 points (light 1, medium 3, heavy 1)");
        assert_eq!(report.tier_count(Tier::Medium), 3);
    }
}
