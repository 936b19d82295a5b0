//! Statistics about a finished generation run.

use std::fmt;

use support_optimize::OptimizationReport;
use support_route::RouteOutcome;

/// How many paths ended with each routing outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteCounts {
    /// Straight drops without a search.
    pub vertical: usize,
    /// Searches that reached the plate.
    pub reached: usize,
    /// Exhausted searches finished with a straight drop.
    pub partial: usize,
    /// Searches that could not leave the contact point.
    pub fallback: usize,
}

impl RouteCounts {
    /// Counts one outcome.
    pub fn record(&mut self, outcome: RouteOutcome) {
        match outcome {
            RouteOutcome::Vertical => self.vertical += 1,
            RouteOutcome::Reached => self.reached += 1,
            RouteOutcome::Partial => self.partial += 1,
            RouteOutcome::Fallback => self.fallback += 1,
        }
    }

    /// Paths routed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.vertical + self.reached + self.partial + self.fallback
    }

    /// Paths from exhausted searches.
    #[must_use]
    pub const fn degraded(&self) -> usize {
        self.partial + self.fallback
    }
}

impl FromIterator<RouteOutcome> for RouteCounts {
    fn from_iter<I: IntoIterator<Item = RouteOutcome>>(iter: I) -> Self {
        let mut counts = Self::default();
        for outcome in iter {
            counts.record(outcome);
        }
        counts
    }
}

/// Summary of generated support geometry.
///
/// Volume and area are those of the combined support mesh; overlapping
/// bodies are not unioned, so both are upper bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportSummary {
    /// Individually swept support bodies.
    pub bodies: usize,
    /// Lattice towers.
    pub towers: usize,
    /// Paths whose sweep produced no geometry.
    pub failed_sweeps: usize,
    /// Points too close to the plate to need a support.
    pub skipped_low: usize,
    /// Support volume (mm³).
    pub volume: f64,
    /// Support surface area (mm²).
    pub surface_area: f64,
    /// Routing outcomes.
    pub routes: RouteCounts,
    /// Optimizer point counts.
    pub optimization: OptimizationReport,
}

impl SupportSummary {
    /// Estimated resin use in millilitres.
    #[must_use]
    pub fn resin_ml(&self) -> f64 {
        self.volume / 1000.0
    }

    /// True when no support geometry was produced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bodies == 0 && self.towers == 0
    }
}

impl fmt::Display for SupportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No supports generated");
        }
        writeln!(f, "Support Generation Summary:")?;
        writeln!(f, "  Support structures: {}", self.bodies)?;
        writeln!(f, "  Lattice towers: {}", self.towers)?;
        writeln!(f, "  Total support volume: {:.2} mm³", self.volume)?;
        writeln!(f, "  Support surface area: {:.2} mm²", self.surface_area)?;
        writeln!(f, "  Estimated resin usage: {:.2} ml", self.resin_ml())?;
        writeln!(
            f,
            "  Routes: {} reached, {} vertical, {} partial, {} fallback",
            self.routes.reached, self.routes.vertical, self.routes.partial, self.routes.fallback
        )?;
        write!(f, "  Support points: {}", self.optimization)?;
        if self.skipped_low > 0 {
            write!(f, ", {} too low", self.skipped_low)?;
        }
        Ok(())
    }
}
