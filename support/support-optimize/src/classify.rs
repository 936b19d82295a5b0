//! Tier assignment for consolidated support points.

use support_types::{SourceType, SupportPoint, Tier};

/// Surface angle assumed when a point carries none, in degrees.
pub const DEFAULT_ANGLE_DEG: f64 = 45.0;

/// Detail score above which a point gets a light support.
pub const DETAIL_LIGHT_SCORE: f64 = 0.6;

/// Surfaces steeper than this are nearly self-supporting (degrees).
pub const STEEP_ANGLE_DEG: f64 = 60.0;

/// Areas below this need only a light support (mm²).
pub const SMALL_AREA: f64 = 2.0;

/// Islands closer to the plate than this get a heavy support (mm).
pub const LOW_ISLAND_HEIGHT: f64 = 5.0;

/// Surfaces flatter than this are heavy candidates (degrees).
pub const FLAT_ANGLE_DEG: f64 = 20.0;

/// Flat areas above this get a heavy support (mm²).
pub const LARGE_AREA: f64 = 10.0;

/// Picks the support tier for a point.
///
/// Rules apply in order and the first match wins:
///
/// 1. detail score above 0.6: light
/// 2. surface angle above 60°: light
/// 3. area below 2 mm²: light
/// 4. island less than 5 mm above the plate: heavy
/// 5. angle below 20° with area above 10 mm²: heavy
/// 6. anything else, bridges included: medium
///
/// # Example
///
/// ```
/// use support_optimize::classify_tier;
/// use support_types::{SourceType, SupportPoint, Tier};
/// use nalgebra::Point3;
///
/// let island = SupportPoint::new(Point3::new(0.0, 0.0, 3.0), SourceType::Island)
///     .with_area(5.0);
/// assert_eq!(classify_tier(&island, 0.0, 0.0), Tier::Heavy);
/// assert_eq!(classify_tier(&island, 0.9, 0.0), Tier::Light);
/// ```
#[must_use]
pub fn classify_tier(point: &SupportPoint, detail_score: f64, plate_z: f64) -> Tier {
    let angle = point.angle.unwrap_or(DEFAULT_ANGLE_DEG);

    if detail_score > DETAIL_LIGHT_SCORE || angle > STEEP_ANGLE_DEG || point.area < SMALL_AREA {
        return Tier::Light;
    }

    if point.source == SourceType::Island && point.height_above(plate_z) < LOW_ISLAND_HEIGHT {
        return Tier::Heavy;
    }
    if angle < FLAT_ANGLE_DEG && point.area > LARGE_AREA {
        return Tier::Heavy;
    }

    Tier::Medium
}
