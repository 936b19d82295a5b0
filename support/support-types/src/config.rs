//! Configuration for support generation.
//!
//! One immutable [`SupportConfig`] is built up front and passed by reference
//! to each component. Every sub-config has public fields, a `Default` with
//! the tuned values, and `with_*` builders.
//!
//! # Example
//!
//! ```
//! use support_types::{SupportConfig, RoutingConfig, LatticeConfig};
//!
//! let config = SupportConfig::default()
//!     .with_routing(RoutingConfig::default().with_lateral(false).with_seed(7))
//!     .with_lattice(LatticeConfig::default().with_spacing(6.0));
//!
//! assert!(!config.routing.lateral_enabled);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{SupportError, SupportResult};
use crate::point::Tier;
use crate::profile::{PrinterProfile, ResinProfile};

fn require_positive(name: &str, value: f64) -> SupportResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SupportError::invalid_config(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

fn require_angle(name: &str, degrees: f64) -> SupportResult<()> {
    if degrees.is_finite() && degrees > 0.0 && degrees < 90.0 {
        Ok(())
    } else {
        Err(SupportError::invalid_config(format!(
            "{name} must lie in (0, 90) degrees, got {degrees}"
        )))
    }
}

fn require_unit(name: &str, value: f64) -> SupportResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SupportError::invalid_config(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}

/// Collision index settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionConfig {
    /// When false, every collision query reports clear.
    pub enabled: bool,
    /// Axis sampling step and safety margin for cylinder checks (mm).
    pub resolution: f64,
    /// Nearest samples queried at each axis sample.
    pub neighbor_count: usize,
    /// Horizontal directions tried when searching for a clear direction.
    pub probe_angles: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resolution: 0.5,
            neighbor_count: 10,
            probe_angles: 12,
        }
    }
}

impl CollisionConfig {
    /// Enables or disables collision checking.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the sampling resolution.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the neighbor count per axis sample.
    #[must_use]
    pub const fn with_neighbor_count(mut self, count: usize) -> Self {
        self.neighbor_count = count;
        self
    }

    /// Sets the number of probe directions.
    #[must_use]
    pub const fn with_probe_angles(mut self, count: usize) -> Self {
        self.probe_angles = count;
        self
    }

    fn validate(&self) -> SupportResult<()> {
        require_positive("collision.resolution", self.resolution)?;
        if self.neighbor_count == 0 {
            return Err(SupportError::invalid_config(
                "collision.neighbor_count must be at least 1",
            ));
        }
        if self.probe_angles == 0 {
            return Err(SupportError::invalid_config(
                "collision.probe_angles must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Path router settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingConfig {
    /// When false, every path is a straight vertical drop.
    pub lateral_enabled: bool,
    /// Maximum tree extension per iteration (mm).
    pub step_size: f64,
    /// Maximum angle of any segment from straight down, in degrees.
    pub max_angle_deg: f64,
    /// Sampling budget per support point.
    pub max_iterations: usize,
    /// Probability of sampling directly below the start.
    pub goal_bias: f64,
    /// Shortcut passes run over routed paths.
    pub smoothing_passes: usize,
    /// Base seed for per-point random sources; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            lateral_enabled: true,
            step_size: 0.5,
            max_angle_deg: 30.0,
            max_iterations: 500,
            goal_bias: 0.3,
            smoothing_passes: 3,
            seed: None,
        }
    }
}

impl RoutingConfig {
    /// Enables or disables lateral routing.
    #[must_use]
    pub const fn with_lateral(mut self, enabled: bool) -> Self {
        self.lateral_enabled = enabled;
        self
    }

    /// Sets the step size.
    #[must_use]
    pub const fn with_step_size(mut self, step: f64) -> Self {
        self.step_size = step;
        self
    }

    /// Sets the maximum angle from vertical.
    #[must_use]
    pub const fn with_max_angle(mut self, degrees: f64) -> Self {
        self.max_angle_deg = degrees;
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the goal bias probability.
    #[must_use]
    pub const fn with_goal_bias(mut self, bias: f64) -> Self {
        self.goal_bias = bias;
        self
    }

    /// Sets the number of smoothing passes.
    #[must_use]
    pub const fn with_smoothing_passes(mut self, passes: usize) -> Self {
        self.smoothing_passes = passes;
        self
    }

    /// Seeds the random sources for reproducible routing.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Maximum angle from vertical in radians.
    #[must_use]
    pub fn max_angle_rad(&self) -> f64 {
        self.max_angle_deg.to_radians()
    }

    fn validate(&self) -> SupportResult<()> {
        require_positive("routing.step_size", self.step_size)?;
        require_angle("routing.max_angle_deg", self.max_angle_deg)?;
        require_unit("routing.goal_bias", self.goal_bias)
    }
}

/// Lattice tower settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeConfig {
    /// When false, no towers are built.
    pub enabled: bool,
    /// XY distance under which endpoints chain into one cluster (mm).
    pub spacing: f64,
    /// Fewest endpoints that warrant a tower.
    pub min_cluster_size: usize,
    /// Most endpoints served by one tower before the cluster is split.
    pub max_cluster_size: usize,
    /// Diameter of horizontal and diagonal braces (mm).
    pub strut_diameter: f64,
    /// Diameter of the three main verticals (mm).
    pub main_diameter: f64,
    /// Intended diagonal brace angle from horizontal, in degrees.
    pub brace_angle_deg: f64,
    /// Target vertical distance between brace levels (mm).
    pub level_spacing: f64,
    /// Circumradius of the synthesized base for clusters of three or fewer.
    pub small_cluster_radius: f64,
    /// Circumradius of the synthesized base when the hull is degenerate.
    pub fallback_radius: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spacing: 8.0,
            min_cluster_size: 5,
            max_cluster_size: 30,
            strut_diameter: 0.8,
            main_diameter: 1.0,
            brace_angle_deg: 60.0,
            level_spacing: 10.0,
            small_cluster_radius: 2.0,
            fallback_radius: 3.0,
        }
    }
}

impl LatticeConfig {
    /// Enables or disables towers.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the clustering distance.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the minimum and maximum cluster sizes.
    #[must_use]
    pub const fn with_cluster_size(mut self, min: usize, max: usize) -> Self {
        self.min_cluster_size = min;
        self.max_cluster_size = max;
        self
    }

    /// Sets the brace strut diameter.
    #[must_use]
    pub const fn with_strut_diameter(mut self, diameter: f64) -> Self {
        self.strut_diameter = diameter;
        self
    }

    /// Sets the main vertical diameter.
    #[must_use]
    pub const fn with_main_diameter(mut self, diameter: f64) -> Self {
        self.main_diameter = diameter;
        self
    }

    /// Sets the intended brace angle.
    #[must_use]
    pub const fn with_brace_angle(mut self, degrees: f64) -> Self {
        self.brace_angle_deg = degrees;
        self
    }

    fn validate(&self) -> SupportResult<()> {
        require_positive("lattice.spacing", self.spacing)?;
        require_positive("lattice.strut_diameter", self.strut_diameter)?;
        require_positive("lattice.main_diameter", self.main_diameter)?;
        require_positive("lattice.level_spacing", self.level_spacing)?;
        require_positive("lattice.small_cluster_radius", self.small_cluster_radius)?;
        require_positive("lattice.fallback_radius", self.fallback_radius)?;
        require_angle("lattice.brace_angle_deg", self.brace_angle_deg)?;
        if self.max_cluster_size == 0 {
            return Err(SupportError::invalid_config(
                "lattice.max_cluster_size must be at least 1",
            ));
        }
        if self.min_cluster_size > self.max_cluster_size {
            return Err(SupportError::invalid_config(format!(
                "lattice.min_cluster_size ({}) exceeds max_cluster_size ({})",
                self.min_cluster_size, self.max_cluster_size
            )));
        }
        Ok(())
    }
}

/// Support point optimizer settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    /// Points closer than this merge into one (mm).
    pub merge_radius: f64,
    /// Detail score above which a face counts as high detail.
    pub curvature_threshold: f64,
    /// Wall thickness below which a vertex is thin (mm).
    pub thin_feature_threshold: f64,
    /// Base spacing between medium supports (mm).
    pub support_spacing: f64,
    /// Tighter spacing used near edges and detail (mm).
    pub edge_spacing: f64,
    /// Z binning for the spacing filter (mm).
    pub layer_height: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            merge_radius: 1.5,
            curvature_threshold: 0.5,
            thin_feature_threshold: 2.0,
            support_spacing: 3.0,
            edge_spacing: 2.0,
            layer_height: 1.0,
        }
    }
}

impl OptimizerConfig {
    /// Sets the merge radius.
    #[must_use]
    pub const fn with_merge_radius(mut self, radius: f64) -> Self {
        self.merge_radius = radius;
        self
    }

    /// Sets the base and edge spacings.
    #[must_use]
    pub const fn with_spacing(mut self, support: f64, edge: f64) -> Self {
        self.support_spacing = support;
        self.edge_spacing = edge;
        self
    }

    /// Sets the thin feature threshold.
    #[must_use]
    pub const fn with_thin_feature_threshold(mut self, threshold: f64) -> Self {
        self.thin_feature_threshold = threshold;
        self
    }

    fn validate(&self) -> SupportResult<()> {
        if !(self.merge_radius.is_finite() && self.merge_radius >= 0.0) {
            return Err(SupportError::invalid_config(format!(
                "optimizer.merge_radius must be non-negative, got {}",
                self.merge_radius
            )));
        }
        require_unit("optimizer.curvature_threshold", self.curvature_threshold)?;
        require_positive("optimizer.thin_feature_threshold", self.thin_feature_threshold)?;
        require_positive("optimizer.support_spacing", self.support_spacing)?;
        require_positive("optimizer.edge_spacing", self.edge_spacing)?;
        require_positive("optimizer.layer_height", self.layer_height)
    }
}

/// Sweep mesh settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepConfig {
    /// Densified rings per unit of segment length.
    pub segments_per_unit: f64,
    /// Vertices per ring.
    pub radial_segments: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            segments_per_unit: 2.0,
            radial_segments: 12,
        }
    }
}

impl SweepConfig {
    /// Sets the ring density along the path.
    #[must_use]
    pub const fn with_segments_per_unit(mut self, density: f64) -> Self {
        self.segments_per_unit = density;
        self
    }

    /// Sets the number of vertices per ring.
    #[must_use]
    pub const fn with_radial_segments(mut self, segments: usize) -> Self {
        self.radial_segments = segments;
        self
    }

    fn validate(&self) -> SupportResult<()> {
        require_positive("sweep.segments_per_unit", self.segments_per_unit)?;
        if self.radial_segments < 3 {
            return Err(SupportError::invalid_config(format!(
                "sweep.radial_segments must be at least 3, got {}",
                self.radial_segments
            )));
        }
        Ok(())
    }
}

/// Tip and base diameters for each tier (mm).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierDiameters {
    /// Light tier contact diameter.
    pub light_tip: f64,
    /// Light tier plate diameter.
    pub light_base: f64,
    /// Medium tier contact diameter.
    pub medium_tip: f64,
    /// Medium tier plate diameter.
    pub medium_base: f64,
    /// Heavy tier contact diameter.
    pub heavy_tip: f64,
    /// Heavy tier plate diameter.
    pub heavy_base: f64,
}

impl Default for TierDiameters {
    fn default() -> Self {
        Self {
            light_tip: 0.2,
            light_base: 0.6,
            medium_tip: 0.3,
            medium_base: 0.8,
            heavy_tip: 0.4,
            heavy_base: 1.0,
        }
    }
}

impl TierDiameters {
    /// Contact diameter for a tier.
    #[must_use]
    pub const fn tip(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Light => self.light_tip,
            Tier::Medium => self.medium_tip,
            Tier::Heavy => self.heavy_tip,
        }
    }

    /// Plate diameter for a tier.
    #[must_use]
    pub const fn base(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Light => self.light_base,
            Tier::Medium => self.medium_base,
            Tier::Heavy => self.heavy_base,
        }
    }

    fn validate(&self) -> SupportResult<()> {
        for tier in Tier::ALL {
            require_positive(&format!("tiers.{tier}_tip"), self.tip(tier))?;
            require_positive(&format!("tiers.{tier}_base"), self.base(tier))?;
        }
        Ok(())
    }
}

/// Complete, immutable configuration for one support generation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportConfig {
    /// Collision index settings.
    pub collision: CollisionConfig,
    /// Router settings.
    pub routing: RoutingConfig,
    /// Lattice tower settings.
    pub lattice: LatticeConfig,
    /// Optimizer settings.
    pub optimizer: OptimizerConfig,
    /// Sweep settings.
    pub sweep: SweepConfig,
    /// Per-tier diameters.
    pub tiers: TierDiameters,
    /// Contact diameter for points without a tier (mm).
    pub tip_diameter: f64,
    /// Plate diameter for points without a tier (mm).
    pub base_diameter: f64,
    /// Points lower than this above the plate get no support (mm).
    pub min_support_height: f64,
    /// Target printer.
    pub printer: PrinterProfile,
    /// Target resin.
    pub resin: ResinProfile,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            collision: CollisionConfig::default(),
            routing: RoutingConfig::default(),
            lattice: LatticeConfig::default(),
            optimizer: OptimizerConfig::default(),
            sweep: SweepConfig::default(),
            tiers: TierDiameters::default(),
            tip_diameter: 0.3,
            base_diameter: 1.0,
            min_support_height: 1.0,
            printer: PrinterProfile::anycubic_photon_mono_4(),
            resin: ResinProfile::elegoo_abs_like_v3(),
        }
    }
}

impl SupportConfig {
    /// Replaces the collision settings.
    #[must_use]
    pub fn with_collision(mut self, collision: CollisionConfig) -> Self {
        self.collision = collision;
        self
    }

    /// Replaces the routing settings.
    #[must_use]
    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    /// Replaces the lattice settings.
    #[must_use]
    pub fn with_lattice(mut self, lattice: LatticeConfig) -> Self {
        self.lattice = lattice;
        self
    }

    /// Replaces the optimizer settings.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Replaces the sweep settings.
    #[must_use]
    pub fn with_sweep(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }

    /// Replaces the tier diameters.
    #[must_use]
    pub fn with_tiers(mut self, tiers: TierDiameters) -> Self {
        self.tiers = tiers;
        self
    }

    /// Sets the minimum support height.
    #[must_use]
    pub fn with_min_support_height(mut self, height: f64) -> Self {
        self.min_support_height = height;
        self
    }

    /// Replaces the printer profile.
    #[must_use]
    pub fn with_printer(mut self, printer: PrinterProfile) -> Self {
        self.printer = printer;
        self
    }

    /// Contact radius for a point of the given tier.
    ///
    /// # Example
    ///
    /// ```
    /// use support_types::{SupportConfig, Tier};
    ///
    /// let config = SupportConfig::default();
    /// assert!((config.tip_radius(Some(Tier::Light)) - 0.1).abs() < 1e-12);
    /// assert!((config.tip_radius(None) - 0.15).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn tip_radius(&self, tier: Option<Tier>) -> f64 {
        tier.map_or(self.tip_diameter, |t| self.tiers.tip(t)) / 2.0
    }

    /// Plate radius for a point of the given tier.
    #[must_use]
    pub fn base_radius(&self, tier: Option<Tier>) -> f64 {
        tier.map_or(self.base_diameter, |t| self.tiers.base(t)) / 2.0
    }

    /// Checks every parameter range.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::InvalidConfig`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> SupportResult<()> {
        self.collision.validate()?;
        self.routing.validate()?;
        self.lattice.validate()?;
        self.optimizer.validate()?;
        self.sweep.validate()?;
        self.tiers.validate()?;
        require_positive("tip_diameter", self.tip_diameter)?;
        require_positive("base_diameter", self.base_diameter)?;
        if !(self.min_support_height.is_finite() && self.min_support_height >= 0.0) {
            return Err(SupportError::invalid_config(format!(
                "min_support_height must be non-negative, got {}",
                self.min_support_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SupportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_tuned_values() {
        let config = SupportConfig::default();
        assert!((config.collision.resolution - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.collision.neighbor_count, 10);
        assert!((config.routing.max_angle_deg - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.lattice.min_cluster_size, 5);
        assert_eq!(config.lattice.max_cluster_size, 30);
        assert!((config.optimizer.merge_radius - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.sweep.radial_segments, 12);
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let config = SupportConfig::default()
            .with_routing(RoutingConfig::default().with_step_size(0.0));
        let err = config.validate().unwrap_err();
        assert!(err.is_invalid_config());
        assert!(err.to_string().contains("routing.step_size"));
    }

    #[test]
    fn test_rejects_nan_resolution() {
        let config = SupportConfig::default()
            .with_collision(CollisionConfig::default().with_resolution(f64::NAN));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_cluster_sizes() {
        let config = SupportConfig::default()
            .with_lattice(LatticeConfig::default().with_cluster_size(10, 4));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_cluster_size"));
    }

    #[test]
    fn test_rejects_right_angle() {
        let config = SupportConfig::default()
            .with_routing(RoutingConfig::default().with_max_angle(90.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_two_sided_ring() {
        let config =
            SupportConfig::default().with_sweep(SweepConfig::default().with_radial_segments(2));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tier_radii() {
        let config = SupportConfig::default();
        assert!((config.tip_radius(Some(Tier::Heavy)) - 0.2).abs() < 1e-12);
        assert!((config.base_radius(Some(Tier::Medium)) - 0.4).abs() < 1e-12);
        assert!((config.base_radius(None) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_builders_chain() {
        let config = SupportConfig::default()
            .with_min_support_height(2.0)
            .with_optimizer(OptimizerConfig::default().with_merge_radius(0.0));
        assert!((config.min_support_height - 2.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }
}
