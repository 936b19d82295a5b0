//! Rewrites clustered support paths to end on shared towers.

use nalgebra::Point3;
use support_types::{LatticeConfig, SupportPath, SweepConfig};
use tracing::{debug, info, warn};

use crate::cluster::cluster_endpoints;
use crate::tower::LatticeTower;

/// Lowest waypoint of each non-empty path, with the path's index.
#[must_use]
pub fn path_endpoints(paths: &[SupportPath]) -> Vec<(usize, Point3<f64>)> {
    paths
        .iter()
        .enumerate()
        .filter_map(|(i, path)| path.lowest_point().map(|p| (i, *p)))
        .collect()
}

/// Consolidates support roots into lattice towers.
///
/// Endpoints are clustered in XY; every cluster of at least
/// `min_cluster_size` members gets a [`LatticeTower`] and its members'
/// paths are rewritten so their last waypoint is the member's attachment
/// point. Smaller clusters keep their paths unchanged.
///
/// # Example
///
/// ```
/// use support_lattice::LatticeConsolidator;
/// use support_types::{LatticeConfig, SupportPath, SweepConfig};
/// use nalgebra::Point3;
///
/// let paths: Vec<SupportPath> = (0..6)
///     .map(|i| {
///         let x = f64::from(i);
///         SupportPath::new(vec![Point3::new(x, 0.0, 20.0), Point3::new(x, 1.0, 12.0)])
///     })
///     .collect();
///
/// let consolidator = LatticeConsolidator::new(&LatticeConfig::default(), &SweepConfig::default());
/// let (towers, rewritten) = consolidator.consolidate(&paths, 0.0);
///
/// assert_eq!(towers.len(), 1);
/// assert_eq!(rewritten.len(), paths.len());
/// assert!((rewritten[0].last().unwrap().z - 12.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LatticeConsolidator {
    config: LatticeConfig,
    sweep: SweepConfig,
}

impl LatticeConsolidator {
    /// Creates a consolidator.
    #[must_use]
    pub fn new(config: &LatticeConfig, sweep: &SweepConfig) -> Self {
        Self {
            config: config.clone(),
            sweep: sweep.clone(),
        }
    }

    /// Lattice settings.
    #[must_use]
    pub const fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Clusters of path indices, as [`consolidate`](Self::consolidate) would
    /// form them. Empty paths belong to no cluster.
    #[must_use]
    pub fn clusters(&self, paths: &[SupportPath]) -> Vec<Vec<usize>> {
        let endpoints = path_endpoints(paths);
        let positions: Vec<Point3<f64>> = endpoints.iter().map(|&(_, p)| p).collect();
        cluster_endpoints(&positions, self.config.spacing, self.config.max_cluster_size)
            .into_iter()
            .map(|cluster| cluster.into_iter().map(|i| endpoints[i].0).collect())
            .collect()
    }

    /// Builds towers and rewrites the paths that attach to them.
    ///
    /// Returns the input paths unchanged and no towers when lattices are
    /// disabled or there are fewer endpoints than `min_cluster_size`. A
    /// cluster whose tower has no geometry keeps its individual supports.
    #[must_use]
    pub fn consolidate(
        &self,
        paths: &[SupportPath],
        plate_z: f64,
    ) -> (Vec<LatticeTower>, Vec<SupportPath>) {
        if !self.config.enabled {
            return (Vec::new(), paths.to_vec());
        }

        let endpoints = path_endpoints(paths);
        if endpoints.len() < self.config.min_cluster_size {
            debug!(
                endpoints = endpoints.len(),
                min_cluster_size = self.config.min_cluster_size,
                "Too few endpoints for lattice towers"
            );
            return (Vec::new(), paths.to_vec());
        }

        let positions: Vec<Point3<f64>> = endpoints.iter().map(|&(_, p)| p).collect();
        let clusters = cluster_endpoints(
            &positions,
            self.config.spacing,
            self.config.max_cluster_size,
        );
        info!(
            endpoints = endpoints.len(),
            clusters = clusters.len(),
            "Support endpoints clustered"
        );

        let mut rewritten = paths.to_vec();
        let mut towers = Vec::new();
        for (index, cluster) in clusters.iter().enumerate() {
            if cluster.len() < self.config.min_cluster_size {
                debug!(
                    cluster = index,
                    members = cluster.len(),
                    "Cluster too small, keeping individual supports"
                );
                continue;
            }

            let members: Vec<Point3<f64>> = cluster.iter().map(|&i| positions[i]).collect();
            let Some(tower) = LatticeTower::build(&members, plate_z, &self.config, &self.sweep)
            else {
                warn!(
                    cluster = index,
                    members = cluster.len(),
                    "Tower has no geometry, keeping individual supports"
                );
                continue;
            };

            debug!(
                cluster = index,
                members = cluster.len(),
                height = tower.height(),
                brace_angle = tower.brace_angle_deg(),
                configured_brace_angle = self.config.brace_angle_deg,
                "Lattice tower built"
            );
            for (local, &i) in cluster.iter().enumerate() {
                if let Some(attachment) = tower.attachment(local) {
                    rewritten[endpoints[i].0].replace_last(*attachment);
                }
            }
            towers.push(tower);
        }

        info!(towers = towers.len(), "Lattice consolidation complete");
        (towers, rewritten)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn drop_to(x: f64, y: f64, end_z: f64) -> SupportPath {
        SupportPath::new(vec![Point3::new(x, y, 30.0), Point3::new(x, y, end_z)])
    }

    fn consolidator(config: LatticeConfig) -> LatticeConsolidator {
        LatticeConsolidator::new(&config, &SweepConfig::default())
    }

    #[test]
    fn test_disabled_is_noop() {
        let paths: Vec<SupportPath> = (0..8).map(|i| drop_to(f64::from(i), 0.0, 10.0)).collect();
        let (towers, rewritten) =
            consolidator(LatticeConfig::default().with_enabled(false)).consolidate(&paths, 0.0);
        assert!(towers.is_empty());
        assert_eq!(rewritten, paths);
    }

    #[test]
    fn test_too_few_endpoints_is_noop() {
        let paths: Vec<SupportPath> = (0..4).map(|i| drop_to(f64::from(i), 0.0, 10.0)).collect();
        let (towers, rewritten) = consolidator(LatticeConfig::default()).consolidate(&paths, 0.0);
        assert!(towers.is_empty());
        assert_eq!(rewritten, paths);
    }

    #[test]
    fn test_small_cluster_paths_untouched() {
        // Five close roots and two far away ones.
        let mut paths: Vec<SupportPath> = (0..5)
            .map(|i| drop_to(f64::from(i), f64::from(i % 2), 10.0))
            .collect();
        paths.push(drop_to(50.0, 0.0, 10.0));
        paths.push(drop_to(52.0, 0.0, 10.0));

        let (towers, rewritten) = consolidator(LatticeConfig::default()).consolidate(&paths, 0.0);
        assert_eq!(towers.len(), 1);
        assert_eq!(rewritten[5], paths[5]);
        assert_eq!(rewritten[6], paths[6]);

        let base = towers[0].base().unwrap();
        for path in &rewritten[..5] {
            let end = path.last().unwrap();
            assert_relative_eq!(end.z, towers[0].top_z());
            assert!(base.iter().any(|c| c.x == end.x && c.y == end.y));
            // Only the final waypoint changes.
            assert_relative_eq!(path.first().unwrap().z, 30.0);
        }
    }

    #[test]
    fn test_roots_on_plate_still_brace() {
        // Zero-height tower: only horizontal braces at plate level exist,
        // so a tower is still produced and paths attach at the plate.
        let paths: Vec<SupportPath> = (0..6)
            .map(|i| drop_to(f64::from(i), f64::from(i % 3), 0.0))
            .collect();
        let (towers, rewritten) = consolidator(LatticeConfig::default()).consolidate(&paths, 0.0);
        assert_eq!(towers.len(), 1);
        assert!(rewritten.iter().all(|p| p.last().unwrap().z.abs() < 1e-12));
    }

    #[test]
    fn test_empty_paths_are_skipped() {
        let mut paths: Vec<SupportPath> =
            (0..5).map(|i| drop_to(f64::from(i), 0.5, 10.0)).collect();
        paths.insert(2, SupportPath::empty());

        let consolidator = consolidator(LatticeConfig::default());
        let clusters = consolidator.clusters(&paths);
        assert_eq!(clusters, vec![vec![0, 1, 3, 4, 5]]);

        let (towers, rewritten) = consolidator.consolidate(&paths, 0.0);
        assert_eq!(towers.len(), 1);
        assert!(rewritten[2].is_empty());
    }
}
