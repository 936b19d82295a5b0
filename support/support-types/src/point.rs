//! Support points and their classification.
//!
//! A [`SupportPoint`] is a location on the model surface that needs external
//! scaffolding during printing. Detectors outside this workspace produce
//! them; the optimizer merges, classifies and thins them; the router grows a
//! path from each survivor to the build plate.
//!
//! # Example
//!
//! ```
//! use support_types::{SupportPoint, SourceType, Tier};
//! use nalgebra::Point3;
//!
//! let p = SupportPoint::new(Point3::new(1.0, 2.0, 8.0), SourceType::Overhang)
//!     .with_area(3.5)
//!     .with_angle(30.0);
//!
//! assert_eq!(p.source, SourceType::Overhang);
//! assert!(p.tier.is_none());
//! assert!((p.height_above(0.0) - 8.0).abs() < 1e-12);
//! ```

use nalgebra::Point3;

/// Which detector produced a support point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceType {
    /// Lowest point of a region that first appears mid-print with nothing
    /// below it.
    Island,

    /// Face sloping past the self-supporting angle.
    #[default]
    Overhang,

    /// Span between two supported regions that is too long to print
    /// unsupported.
    Bridge,
}

/// Support size tier, controlling tip and base thickness.
///
/// Priority order for spacing conflicts is Heavy > Medium > Light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    /// Thin support for fine detail and small contact areas.
    Light,

    /// General-purpose support.
    #[default]
    Medium,

    /// Thick support for islands near the plate and large flat overhangs.
    Heavy,
}

impl Tier {
    /// All tiers, lightest first.
    pub const ALL: [Self; 3] = [Self::Light, Self::Medium, Self::Heavy];

    /// Priority rank, lower wins.
    ///
    /// # Example
    ///
    /// ```
    /// use support_types::Tier;
    ///
    /// assert!(Tier::Heavy.priority() < Tier::Medium.priority());
    /// assert!(Tier::Medium.priority() < Tier::Light.priority());
    /// ```
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Heavy => 0,
            Self::Medium => 1,
            Self::Light => 2,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A location on the model that needs support.
///
/// Every field has a defined default, so detectors only fill what they
/// know: `area` is 0 when unknown, `angle` is `None` when the detector has
/// no surface angle, and `tier` stays `None` until classification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportPoint {
    /// Contact position on the model surface.
    pub position: Point3<f64>,

    /// Detector that produced this point.
    pub source: SourceType,

    /// Surface area this point is responsible for (mm²), 0 if unknown.
    pub area: f64,

    /// Angle of the supported surface from horizontal, in degrees.
    pub angle: Option<f64>,

    /// Assigned size tier.
    pub tier: Option<Tier>,

    /// Number of original points merged into this one.
    pub merged_count: usize,
}

impl SupportPoint {
    /// Creates an unclassified point with no area or angle.
    #[must_use]
    pub const fn new(position: Point3<f64>, source: SourceType) -> Self {
        Self {
            position,
            source,
            area: 0.0,
            angle: None,
            tier: None,
            merged_count: 1,
        }
    }

    /// Sets the supported area.
    #[must_use]
    pub const fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Sets the surface angle from horizontal, in degrees.
    #[must_use]
    pub const fn with_angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }

    /// Sets the tier.
    #[must_use]
    pub const fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Weight used when averaging positions during consolidation: the area
    /// when positive, otherwise 1.
    #[must_use]
    pub fn weight(&self) -> f64 {
        if self.area > 0.0 { self.area } else { 1.0 }
    }

    /// Height of the contact above the build plate.
    #[must_use]
    pub fn height_above(&self, plate_z: f64) -> f64 {
        self.position.z - plate_z
    }
}
