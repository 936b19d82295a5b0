//! Printer and resin presets.

use nalgebra::Vector3;

/// Physical limits of the target resin printer.
///
/// # Example
///
/// ```
/// use support_types::PrinterProfile;
/// use nalgebra::Vector3;
///
/// let printer = PrinterProfile::anycubic_photon_mono_4();
/// assert!(printer.fits(&Vector3::new(100.0, 50.0, 120.0)));
/// assert!(!printer.fits(&Vector3::new(100.0, 90.0, 120.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrinterProfile {
    /// Display name.
    pub name: String,
    /// Usable build volume X, Y, Z (mm).
    pub build_volume: Vector3<f64>,
    /// Pixel pitch on the plate (mm).
    pub xy_resolution: f64,
    /// Default layer height (mm).
    pub layer_height: f64,
}

impl PrinterProfile {
    /// Anycubic Photon Mono 4: 153.4 × 87 × 165 mm, 17 µm pixels, 50 µm layers.
    #[must_use]
    pub fn anycubic_photon_mono_4() -> Self {
        Self {
            name: "Anycubic Photon Mono 4".to_owned(),
            build_volume: Vector3::new(153.4, 87.0, 165.0),
            xy_resolution: 0.017,
            layer_height: 0.05,
        }
    }

    /// True when an object of the given extent fits the build volume.
    #[must_use]
    pub fn fits(&self, extent: &Vector3<f64>) -> bool {
        extent
            .iter()
            .zip(self.build_volume.iter())
            .all(|(size, limit)| size <= limit)
    }
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self::anycubic_photon_mono_4()
    }
}

/// Mechanical properties of the resin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResinProfile {
    /// Display name.
    pub name: String,
    /// Fully cured tensile strength (MPa).
    pub tensile_strength: f64,
    /// Fraction of full strength while the part is still green on the plate.
    pub partial_cure_factor: f64,
}

impl ResinProfile {
    /// Elegoo ABS-Like V3+: 50 MPa, 30% strength while printing.
    #[must_use]
    pub fn elegoo_abs_like_v3() -> Self {
        Self {
            name: "Elegoo ABS-Like V3+".to_owned(),
            tensile_strength: 50.0,
            partial_cure_factor: 0.3,
        }
    }

    /// Strength available during printing (MPa).
    ///
    /// # Example
    ///
    /// ```
    /// use support_types::ResinProfile;
    ///
    /// let resin = ResinProfile::elegoo_abs_like_v3();
    /// assert!((resin.print_strength() - 15.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn print_strength(&self) -> f64 {
        self.tensile_strength * self.partial_cure_factor
    }
}

impl Default for ResinProfile {
    fn default() -> Self {
        Self::elegoo_abs_like_v3()
    }
}
