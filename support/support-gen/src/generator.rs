//! The end-to-end support generation pipeline.

use mesh_types::{IndexedMesh, MeshTopology};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use support_collision::{CollisionIndex, SurfaceQuery};
use support_lattice::{LatticeConsolidator, LatticeTower};
use support_optimize::{DetailMap, OptimizationReport, SupportOptimizer};
use support_route::{PathRouter, PathSmoother, RouteOutcome, RoutedPath};
use support_sweep::sweep_path;
use support_types::{SupportConfig, SupportError, SupportPath, SupportPoint, SupportResult};
use tracing::{debug, info, warn};

use crate::summary::{RouteCounts, SupportSummary};

/// One support from contact point to plate or tower.
#[derive(Debug, Clone)]
pub struct GeneratedSupport {
    /// The optimized, classified support point.
    pub point: SupportPoint,
    /// Router result before smoothing and tower attachment.
    pub route: RoutedPath,
    /// Final path the geometry was swept along.
    pub path: SupportPath,
    /// Swept body, `None` when the path was degenerate.
    pub mesh: Option<IndexedMesh>,
}

/// Everything a generation run produced.
#[derive(Debug, Clone, Default)]
pub struct SupportOutput {
    /// Supports in optimized point order.
    pub supports: Vec<GeneratedSupport>,
    /// Lattice towers shared by clustered supports.
    pub towers: Vec<LatticeTower>,
    /// All support and tower geometry in one mesh.
    pub mesh: IndexedMesh,
    /// Run statistics.
    pub summary: SupportSummary,
}

impl SupportOutput {
    /// True when the model needs no support geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// Generates resin support structures for a model.
///
/// Construction validates the configuration and builds the collision
/// index once; [`generate`](Self::generate) can then be called for any
/// number of support point sets. Each run:
///
/// 1. optimizes the points (consolidate, classify, thin out)
/// 2. skips points closer to the plate than `min_support_height`
/// 3. routes every point to the plate in parallel
/// 4. smooths searched paths
/// 5. consolidates clustered roots into lattice towers
/// 6. sweeps every path into a tapered tube in parallel
///
/// # Example
///
/// ```
/// use support_collision::SurfaceModel;
/// use support_gen::SupportGenerator;
/// use support_types::{RoutingConfig, SourceType, SupportConfig, SupportPoint};
/// use mesh_types::{axis_aligned_box, Point3};
///
/// // A small plate floating 10 mm above a base block.
/// let mut mesh = axis_aligned_box(Point3::new(-1.0, -1.0, 0.0), Point3::new(1.0, 1.0, 1.0));
/// mesh.merge(&axis_aligned_box(Point3::new(10.0, -3.0, 10.0), Point3::new(16.0, 3.0, 11.0)));
/// let model = SurfaceModel::new(mesh).unwrap();
///
/// let config = SupportConfig::default()
///     .with_routing(RoutingConfig::default().with_lateral(false));
/// let generator = SupportGenerator::new(&model, &config).unwrap();
///
/// let points = vec![
///     SupportPoint::new(Point3::new(13.0, 0.0, 10.0), SourceType::Island).with_area(8.0),
/// ];
/// let output = generator.generate(&points);
///
/// assert_eq!(output.supports.len(), 1);
/// assert!(!output.is_empty());
/// ```
#[derive(Debug)]
pub struct SupportGenerator<'a, S: SurfaceQuery + ?Sized> {
    surface: &'a S,
    config: SupportConfig,
    collision: CollisionIndex,
    detail: DetailMap,
}

impl<'a, S: SurfaceQuery + ?Sized> SupportGenerator<'a, S> {
    /// Prepares a generator for `surface`.
    ///
    /// Warns when the model does not fit the configured printer.
    ///
    /// # Errors
    ///
    /// - [`SupportError::InvalidConfig`] if the configuration fails
    ///   validation
    /// - [`SupportError::EmptySurface`] if the model has no faces
    pub fn new(surface: &'a S, config: &SupportConfig) -> SupportResult<Self> {
        config.validate()?;
        if surface.mesh().is_empty() {
            return Err(SupportError::EmptySurface);
        }

        let extent = surface.bounds().size();
        if !config.printer.fits(&extent) {
            warn!(
                x = extent.x,
                y = extent.y,
                z = extent.z,
                printer = %config.printer.name,
                "Model exceeds the printer build volume"
            );
        }

        let collision = CollisionIndex::from_surface(surface, &config.collision);
        let detail = DetailMap::analyze(surface, &config.optimizer);
        Ok(Self {
            surface,
            config: config.clone(),
            collision,
            detail,
        })
    }

    /// The run configuration.
    #[must_use]
    pub const fn config(&self) -> &SupportConfig {
        &self.config
    }

    /// The collision index built from the model.
    #[must_use]
    pub const fn collision_index(&self) -> &CollisionIndex {
        &self.collision
    }

    /// Curvature and thin-feature analysis of the model.
    #[must_use]
    pub const fn detail_map(&self) -> &DetailMap {
        &self.detail
    }

    /// Height of the build plate.
    #[must_use]
    pub fn plate_z(&self) -> f64 {
        self.surface.plate_z()
    }

    /// Runs the whole pipeline on a set of detected support points.
    #[must_use]
    pub fn generate(&self, points: &[SupportPoint]) -> SupportOutput {
        if points.is_empty() {
            info!("No support points, model needs no supports");
            return SupportOutput::default();
        }

        let plate_z = self.plate_z();
        let optimizer =
            SupportOptimizer::with_detail(self.surface, &self.config.optimizer, self.detail.clone());
        let (optimized, report) = optimizer.optimize_with_report(points);

        let min_height = self.config.min_support_height;
        let (eligible, too_low): (Vec<SupportPoint>, Vec<SupportPoint>) = optimized
            .into_iter()
            .partition(|p| p.height_above(plate_z) >= min_height);
        if !too_low.is_empty() {
            debug!(
                skipped = too_low.len(),
                min_height, "Points too close to the plate skipped"
            );
        }

        let routes = self.route_all(&eligible, plate_z);
        let smoothed = self.smooth_all(&eligible, &routes);

        let consolidator = LatticeConsolidator::new(&self.config.lattice, &self.config.sweep);
        let (towers, paths) = consolidator.consolidate(&smoothed, plate_z);

        let meshes = self.sweep_all(&eligible, &paths);
        let supports: Vec<GeneratedSupport> = eligible
            .into_iter()
            .zip(routes)
            .zip(paths)
            .zip(meshes)
            .map(|(((point, route), path), mesh)| GeneratedSupport {
                point,
                route,
                path,
                mesh,
            })
            .collect();

        let mesh = IndexedMesh::concat(
            supports
                .iter()
                .filter_map(|s| s.mesh.as_ref())
                .chain(towers.iter().map(LatticeTower::mesh)),
        );

        let summary = summarize(&supports, &towers, &mesh, report, too_low.len());
        info!(
            bodies = summary.bodies,
            towers = summary.towers,
            volume = summary.volume,
            resin_ml = summary.resin_ml(),
            degraded_routes = summary.routes.degraded(),
            "Support generation complete"
        );

        SupportOutput {
            supports,
            towers,
            mesh,
            summary,
        }
    }

    /// Routes every point in parallel, each with its own random source.
    fn route_all(&self, points: &[SupportPoint], plate_z: f64) -> Vec<RoutedPath> {
        let router = PathRouter::new(&self.collision, &self.config.routing);
        let seed = self.config.routing.seed;
        let max_iterations = self.config.routing.max_iterations;

        points
            .par_iter()
            .enumerate()
            .map(|(index, point)| {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
                    None => StdRng::from_entropy(),
                };
                let radius = self.config.tip_radius(point.tier);
                router.route(point.position, plate_z, radius, max_iterations, &mut rng)
            })
            .collect()
    }

    /// Smooths searched paths; straight drops are already minimal.
    fn smooth_all(&self, points: &[SupportPoint], routes: &[RoutedPath]) -> Vec<SupportPath> {
        let smoother = PathSmoother::new(&self.collision);
        let passes = self.config.routing.smoothing_passes;

        points
            .iter()
            .zip(routes)
            .map(|(point, route)| match route.outcome {
                RouteOutcome::Reached | RouteOutcome::Partial => {
                    smoother.smooth(&route.path, self.config.tip_radius(point.tier), passes)
                }
                RouteOutcome::Vertical | RouteOutcome::Fallback => route.path.clone(),
            })
            .collect()
    }

    /// Sweeps every path in parallel with its tier's radii.
    fn sweep_all(&self, points: &[SupportPoint], paths: &[SupportPath]) -> Vec<Option<IndexedMesh>> {
        points
            .par_iter()
            .zip(paths.par_iter())
            .map(|(point, path)| {
                sweep_path(
                    path,
                    self.config.tip_radius(point.tier),
                    self.config.base_radius(point.tier),
                    &self.config.sweep,
                )
                .map_err(|e| debug!(error = %e, position = %point.position, "Skipped support sweep"))
                .ok()
            })
            .collect()
    }
}

fn summarize(
    supports: &[GeneratedSupport],
    towers: &[LatticeTower],
    mesh: &IndexedMesh,
    optimization: OptimizationReport,
    skipped_low: usize,
) -> SupportSummary {
    let bodies = supports.iter().filter(|s| s.mesh.is_some()).count();
    SupportSummary {
        bodies,
        towers: towers.len(),
        failed_sweeps: supports.len() - bodies,
        skipped_low,
        volume: mesh.volume(),
        surface_area: mesh.surface_area(),
        routes: supports.iter().map(|s| s.route.outcome).collect::<RouteCounts>(),
        optimization,
    }
}
