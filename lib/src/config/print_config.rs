//! Print configuration types.
//!
//! [`PrintConfig`] holds every user-facing setting: bed, layer heights,
//! extrusion, infill, speeds and temperatures. It is serde-serializable so a
//! profile can be kept as a JSON file and partially overridden from the CLI.

use crate::infill::InfillPattern;
use crate::{CoordF, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Main print configuration.
///
/// Missing fields in a JSON profile fall back to [`PrintConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    // === Bed Configuration ===
    /// Bed size X (mm).
    pub bed_size_x: CoordF,
    /// Bed size Y (mm).
    pub bed_size_y: CoordF,
    /// Drop the model onto the bed and center it before slicing.
    pub center_on_bed: bool,

    // === Layer Heights ===
    /// Default layer height (mm).
    pub layer_height: CoordF,
    /// First layer height (mm).
    pub first_layer_height: CoordF,

    // === Extrusion ===
    /// Nozzle diameter (mm).
    pub nozzle_diameter: CoordF,
    /// Extrusion width (mm); 0 means derive from the nozzle diameter.
    pub extrusion_width: CoordF,
    /// Filament diameter (mm).
    pub filament_diameter: CoordF,
    /// Extrusion multiplier (flow rate adjustment).
    pub extrusion_multiplier: CoordF,
    /// Filament density (g/cm³), used for weight estimates.
    pub filament_density: CoordF,
    /// Tool number selected at the start of the print.
    pub extruder: u32,

    // === Infill ===
    /// Infill density (0.0 - 1.0).
    pub infill_density: CoordF,
    /// Infill pattern.
    pub infill_pattern: InfillPattern,

    // === Speeds (mm/s) ===
    /// Default print speed.
    pub print_speed: CoordF,
    /// Infill print speed.
    pub infill_speed: CoordF,
    /// Travel move speed.
    pub travel_speed: CoordF,
    /// First layer speed.
    pub first_layer_speed: CoordF,

    // === Temperatures ===
    /// Extruder temperature (°C).
    pub extruder_temperature: u32,
    /// First layer extruder temperature (°C).
    pub first_layer_extruder_temperature: u32,
    /// Bed temperature (°C).
    pub bed_temperature: u32,
    /// First layer bed temperature (°C).
    pub first_layer_bed_temperature: u32,
}

impl PrintConfig {
    /// Create a new PrintConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder method: set layer height.
    pub fn layer_height(mut self, height: CoordF) -> Self {
        self.layer_height = height;
        self
    }

    /// Builder method: set bed size (mm).
    pub fn bed_size(mut self, x: CoordF, y: CoordF) -> Self {
        self.bed_size_x = x;
        self.bed_size_y = y;
        self
    }

    /// Builder method: set first layer height.
    pub fn first_layer_height(mut self, height: CoordF) -> Self {
        self.first_layer_height = height;
        self
    }

    /// Builder method: set nozzle diameter.
    pub fn nozzle_diameter(mut self, diameter: CoordF) -> Self {
        self.nozzle_diameter = diameter;
        self
    }

    /// Builder method: set filament diameter.
    pub fn filament_diameter(mut self, diameter: CoordF) -> Self {
        self.filament_diameter = diameter;
        self
    }

    /// Builder method: set infill density (0.0 - 1.0).
    pub fn infill_density(mut self, density: CoordF) -> Self {
        self.infill_density = density;
        self
    }

    /// Builder method: set infill pattern.
    pub fn infill_pattern(mut self, pattern: InfillPattern) -> Self {
        self.infill_pattern = pattern;
        self
    }

    /// Builder method: set print speed.
    pub fn print_speed(mut self, speed: CoordF) -> Self {
        self.print_speed = speed;
        self
    }

    /// Builder method: keep the model where it is instead of centering it.
    pub fn keep_position(mut self) -> Self {
        self.center_on_bed = false;
        self
    }

    /// Effective extrusion width (mm).
    ///
    /// Falls back to 1.125 × nozzle diameter when not set explicitly.
    pub fn effective_extrusion_width(&self) -> CoordF {
        if self.extrusion_width > 0.0 {
            self.extrusion_width
        } else {
            self.nozzle_diameter * 1.125
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("Layer height", self.layer_height),
            ("First layer height", self.first_layer_height),
            ("Nozzle diameter", self.nozzle_diameter),
            ("Filament diameter", self.filament_diameter),
            ("Extrusion multiplier", self.extrusion_multiplier),
            ("Filament density", self.filament_density),
            ("Bed size X", self.bed_size_x),
            ("Bed size Y", self.bed_size_y),
            ("Print speed", self.print_speed),
            ("Infill speed", self.infill_speed),
            ("Travel speed", self.travel_speed),
            ("First layer speed", self.first_layer_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::PreconditionViolation(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.infill_density) {
            return Err(Error::PreconditionViolation(format!(
                "Infill density must be within 0..=1, got {}",
                self.infill_density
            )));
        }
        if self.extrusion_width < 0.0 {
            return Err(Error::PreconditionViolation(format!(
                "Extrusion width must not be negative, got {}",
                self.extrusion_width
            )));
        }
        Ok(())
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            // Bed
            bed_size_x: 256.0,
            bed_size_y: 256.0,
            center_on_bed: true,

            // Layer heights
            layer_height: 0.2,
            first_layer_height: 0.2,

            // Extrusion
            nozzle_diameter: 0.4,
            extrusion_width: 0.0,
            filament_diameter: 1.75,
            extrusion_multiplier: 1.0,
            filament_density: 1.24, // PLA
            extruder: 0,

            // Infill
            infill_density: 0.2,
            infill_pattern: InfillPattern::CrossHatch,

            // Speeds
            print_speed: 50.0,
            infill_speed: 80.0,
            travel_speed: 150.0,
            first_layer_speed: 20.0,

            // Temperatures
            extruder_temperature: 210,
            first_layer_extruder_temperature: 215,
            bed_temperature: 60,
            first_layer_bed_temperature: 65,
        }
    }
}

impl fmt::Display for PrintConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PrintConfig(layer={:.2}mm, nozzle={:.2}mm, infill={:.0}% {}, speed={:.0}mm/s)",
            self.layer_height,
            self.nozzle_diameter,
            self.infill_density * 100.0,
            self.infill_pattern,
            self.print_speed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_print_config_default() {
        let config = PrintConfig::default();
        assert!((config.layer_height - 0.2).abs() < 1e-6);
        assert!((config.nozzle_diameter - 0.4).abs() < 1e-6);
        assert!((config.effective_extrusion_width() - 0.45).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_print_config_builder() {
        let config = PrintConfig::new()
            .layer_height(0.15)
            .nozzle_diameter(0.6)
            .infill_density(0.5)
            .infill_pattern(InfillPattern::Rectilinear)
            .keep_position();

        assert!((config.layer_height - 0.15).abs() < 1e-6);
        assert!((config.nozzle_diameter - 0.6).abs() < 1e-6);
        assert!((config.infill_density - 0.5).abs() < 1e-6);
        assert_eq!(config.infill_pattern, InfillPattern::Rectilinear);
        assert!(!config.center_on_bed);
    }

    #[test]
    fn test_print_config_validation() {
        let mut config = PrintConfig::default();
        assert!(config.validate().is_ok());

        config.layer_height = 0.0;
        assert!(matches!(
            config.validate(),
            Err(Error::PreconditionViolation(_))
        ));

        config.layer_height = 0.2;
        config.nozzle_diameter = -1.0;
        assert!(config.validate().is_err());

        config.nozzle_diameter = 0.4;
        config.infill_density = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = PrintConfig::new().layer_height(0.28).infill_density(0.0);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"layer_height\": 0.28"));
        assert!(json.contains("\"infill_pattern\": \"cross_hatch\""));

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let loaded = PrintConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(br#"{ "layer_height": 0.1, "infill_pattern": "rectilinear" }"#)
            .unwrap();
        let loaded = PrintConfig::from_json_file(file.path()).unwrap();
        assert!((loaded.layer_height - 0.1).abs() < 1e-12);
        assert_eq!(loaded.infill_pattern, InfillPattern::Rectilinear);
        assert_eq!(loaded.extruder_temperature, 210);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(b"{ layer_height: }").unwrap();
        assert!(matches!(
            PrintConfig::from_json_file(file.path()),
            Err(Error::Config(_))
        ));

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(br#"{ "layer_height": -1.0 }"#).unwrap();
        assert!(matches!(
            PrintConfig::from_json_file(file.path()),
            Err(Error::PreconditionViolation(_))
        ));
    }
}
