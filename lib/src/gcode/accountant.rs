//! Extrusion accounting.
//!
//! Filament consumption is a running sum over the toolpath: every printed
//! segment adds `length × multiplier` to the total, where the multiplier
//! converts mm of path into mm of filament for the current bead geometry.
//! The running total is exactly the absolute `E` coordinate the G-code writer
//! emits after that segment.

use std::f64::consts::PI;

use super::path::{cross_section_area, ExtrusionPath};
use crate::geometry::Segment;
use crate::CoordF;

/// Add one segment to a running filament total.
///
/// `new = previous + segment.length() × multiplier`
#[inline]
pub fn accumulate(previous: CoordF, segment: &Segment, multiplier: CoordF) -> CoordF {
    previous + segment.length() * multiplier
}

/// Millimetres of filament per millimetre of path.
///
/// `flow × bead cross-section / filament cross-section`, with the bead taken
/// as a rounded rectangle `nozzle_width` wide and `layer_height` tall.
pub fn extrusion_multiplier(
    nozzle_width: CoordF,
    layer_height: CoordF,
    filament_diameter: CoordF,
    flow: CoordF,
) -> CoordF {
    let filament_area = PI * (filament_diameter / 2.0).powi(2);
    flow * cross_section_area(nozzle_width, layer_height) / filament_area
}

/// Filament usage summary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilamentStats {
    /// Printed path length (mm).
    pub path_length_mm: CoordF,
    /// Filament fed into the extruder (mm).
    pub filament_length_mm: CoordF,
    /// Filament volume (mm³).
    pub filament_volume_mm3: CoordF,
    /// Filament weight (g).
    pub filament_weight_g: CoordF,
}

impl FilamentStats {
    /// Derive volume and weight from a filament length.
    ///
    /// `density` is in g/cm³.
    pub fn new(
        path_length_mm: CoordF,
        filament_length_mm: CoordF,
        filament_diameter: CoordF,
        density: CoordF,
    ) -> Self {
        let filament_volume_mm3 = filament_length_mm * PI * (filament_diameter / 2.0).powi(2);
        Self {
            path_length_mm,
            filament_length_mm,
            filament_volume_mm3,
            filament_weight_g: filament_volume_mm3 / 1000.0 * density,
        }
    }

    /// Filament length in metres.
    pub fn filament_length_m(&self) -> CoordF {
        self.filament_length_mm / 1000.0
    }
}

/// Running filament total over a toolpath traversal.
#[derive(Debug, Clone, Default)]
pub struct ExtrusionAccountant {
    multiplier: CoordF,
    total: CoordF,
    path_length: CoordF,
    segments: usize,
}

impl ExtrusionAccountant {
    /// Start a traversal at zero with the given multiplier.
    pub fn new(multiplier: CoordF) -> Self {
        Self {
            multiplier,
            ..Default::default()
        }
    }

    /// Change the multiplier for the segments that follow (e.g. on a layer
    /// with a different height).
    pub fn set_multiplier(&mut self, multiplier: CoordF) {
        self.multiplier = multiplier;
    }

    /// Current multiplier.
    pub fn multiplier(&self) -> CoordF {
        self.multiplier
    }

    /// Account for one segment and return the new total.
    pub fn add(&mut self, segment: &Segment) -> CoordF {
        self.total = accumulate(self.total, segment, self.multiplier);
        self.path_length += segment.length();
        self.segments += 1;
        self.total
    }

    /// Account for every segment of a path and return the new total.
    pub fn add_path(&mut self, path: &ExtrusionPath) -> CoordF {
        for seg in &path.segments {
            self.add(seg);
        }
        self.total
    }

    /// Filament consumed so far (mm).
    pub fn total(&self) -> CoordF {
        self.total
    }

    /// Path length walked so far (mm).
    pub fn path_length(&self) -> CoordF {
        self.path_length
    }

    /// Segments walked so far.
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// Summary for the traversal so far.
    pub fn stats(&self, filament_diameter: CoordF, density: CoordF) -> FilamentStats {
        FilamentStats::new(self.path_length, self.total, filament_diameter, density)
    }
}
