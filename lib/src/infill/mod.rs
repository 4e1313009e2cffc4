//! Scanline infill generation.
//!
//! Fills the interior of a contour with straight lines parallel to one axis:
//!
//! 1. Walk scan coordinates `v = min + k * spacing` (`k >= 1`, `v < max`)
//!    across the contour's extent on the scan axis. The extremes themselves
//!    are never scanned. With a work area set, lines outside it are skipped
//!    and the rest are clipped to it.
//! 2. Collect the points where contour segments straddle the scan line,
//!    sorted along the line. The straddle test is half-open, so a scan line
//!    through a contour vertex counts that vertex once.
//! 3. Pair them up in order (1st with 2nd, 3rd with 4th, ...). Each pair is
//!    one infill segment running in increasing perpendicular coordinate.
//!    Pairs that collapse to a point (a scan line grazing a vertex) are
//!    dropped.
//!
//! A trailing unpaired crossing only appears on a malformed contour and is
//! skipped.
//!
//! Cross-hatch infill is an X sweep followed by a Y sweep.

use crate::geometry::{BoundingBox, Contour, Point2, Segment};
use crate::{CoordF, Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis the scan coordinate is measured along.
///
/// [`ScanAxis::X`] produces vertical lines (`x = v`), [`ScanAxis::Y`]
/// horizontal ones (`y = v`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanAxis {
    X,
    Y,
}

impl ScanAxis {
    /// The other axis.
    pub fn perpendicular(self) -> Self {
        match self {
            ScanAxis::X => ScanAxis::Y,
            ScanAxis::Y => ScanAxis::X,
        }
    }

    fn range(self, bb: &BoundingBox) -> (CoordF, CoordF) {
        match self {
            ScanAxis::X => (bb.min.x, bb.max.x),
            ScanAxis::Y => (bb.min.y, bb.max.y),
        }
    }
}

/// Infill pattern types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfillPattern {
    /// One sweep per layer, alternating between X and Y on successive layers.
    Rectilinear,
    /// Both sweeps on every layer.
    #[default]
    CrossHatch,
}

impl fmt::Display for InfillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfillPattern::Rectilinear => write!(f, "Rectilinear"),
            InfillPattern::CrossHatch => write!(f, "Cross Hatch"),
        }
    }
}

/// Configuration for infill generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfillConfig {
    /// The infill pattern to use.
    pub pattern: InfillPattern,

    /// Infill density (0.0 - 1.0, where 0 means no infill and 1.0 is solid).
    pub density: CoordF,

    /// Extrusion width for infill lines (mm).
    pub extrusion_width: CoordF,

    /// Work area; infill is clipped to it.
    pub bounds: Option<BoundingBox>,
}

impl Default for InfillConfig {
    fn default() -> Self {
        Self {
            pattern: InfillPattern::CrossHatch,
            density: 0.2,          // 20% infill
            extrusion_width: 0.45, // mm
            bounds: None,
        }
    }
}

impl InfillConfig {
    /// Create a solid infill configuration.
    pub fn solid() -> Self {
        Self {
            density: 1.0,
            ..Default::default()
        }
    }

    /// Create a configuration with the given density.
    pub fn with_density(density: CoordF) -> Self {
        Self {
            density: density.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Builder: restrict scan lines to a work area.
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Distance between adjacent scan lines.
    ///
    /// Returns `None` when density is zero (no infill requested).
    pub fn line_spacing(&self) -> Option<CoordF> {
        if self.density <= 0.0 {
            return None;
        }
        if self.density >= 1.0 {
            return Some(self.extrusion_width);
        }
        Some(self.extrusion_width / self.density)
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.density) {
            return Err(Error::PreconditionViolation(format!(
                "infill density must be within 0..=1, got {}",
                self.density
            )));
        }
        if !(self.extrusion_width > 0.0) || !self.extrusion_width.is_finite() {
            return Err(Error::PreconditionViolation(format!(
                "infill extrusion width must be positive, got {}",
                self.extrusion_width
            )));
        }
        Ok(())
    }
}

/// Result of infill generation for one contour.
#[derive(Debug, Clone, Default)]
pub struct InfillResult {
    /// Infill segments in generation order.
    pub segments: Vec<Segment>,

    /// Total segment length in mm.
    pub total_length: CoordF,
}

impl InfillResult {
    fn new(segments: Vec<Segment>) -> Self {
        let total_length = segments.iter().map(Segment::length).sum();
        Self {
            segments,
            total_length,
        }
    }

    /// Check if any infill was generated.
    pub fn has_infill(&self) -> bool {
        !self.segments.is_empty()
    }
}

/// Infill generator.
#[derive(Debug, Clone, Default)]
pub struct InfillGenerator {
    config: InfillConfig,
}

impl InfillGenerator {
    /// Create a new infill generator with the given configuration.
    pub fn new(config: InfillConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &InfillConfig {
        &self.config
    }

    /// Generate infill for one contour.
    ///
    /// `layer_index` selects the sweep axis for [`InfillPattern::Rectilinear`].
    pub fn generate(&self, contour: &Contour, layer_index: usize) -> InfillResult {
        let Some(spacing) = self.config.line_spacing() else {
            return InfillResult::default();
        };
        let bounds = self.config.bounds.as_ref();

        let segments = match self.config.pattern {
            InfillPattern::CrossHatch => {
                let mut segments = scan(contour, spacing, ScanAxis::X, bounds);
                segments.extend(scan(contour, spacing, ScanAxis::Y, bounds));
                segments
            }
            InfillPattern::Rectilinear => {
                let axis = if layer_index % 2 == 0 {
                    ScanAxis::X
                } else {
                    ScanAxis::Y
                };
                scan(contour, spacing, axis, bounds)
            }
        };

        InfillResult::new(segments)
    }
}

/// Scanline infill along one axis.
pub fn generate_infill(contour: &Contour, spacing: CoordF, axis: ScanAxis) -> Vec<Segment> {
    scan(contour, spacing, axis, None)
}

/// Cross-hatch infill: the X sweep followed by the Y sweep.
pub fn generate_cross_hatch(contour: &Contour, spacing: CoordF) -> Vec<Segment> {
    let mut segments = generate_infill(contour, spacing, ScanAxis::X);
    segments.extend(generate_infill(contour, spacing, ScanAxis::Y));
    segments
}

fn scan(
    contour: &Contour,
    spacing: CoordF,
    axis: ScanAxis,
    bounds: Option<&BoundingBox>,
) -> Vec<Segment> {
    if !(spacing > 0.0) || !spacing.is_finite() {
        debug!("Skipping infill: spacing {} is not usable", spacing);
        return Vec::new();
    }

    let contour_bb = contour.bounding_box();
    let region = match bounds {
        Some(bb) => contour_bb.intersection(bb),
        None => contour_bb,
    };
    if region.is_empty() {
        return Vec::new();
    }
    // Scan coordinates stay anchored at the contour's own minimum
    let (min, _) = axis.range(&contour_bb);
    let (lower, upper) = axis.range(&region);
    let (cut_lo, cut_hi) = axis.perpendicular().range(&region);

    let mut segments = Vec::new();
    let mut crossings = Vec::new();
    let mut k = ((lower - min) / spacing).ceil().max(1.0) as u64;
    loop {
        let v = min + k as CoordF * spacing;
        if v >= upper {
            break;
        }
        k += 1;
        if v < lower {
            continue;
        }

        crossings.clear();
        crossings.extend(contour.segments().iter().filter_map(|seg| match axis {
            ScanAxis::X if seg.crosses_x(v) => Some(seg.intersect_x(v).y),
            ScanAxis::Y if seg.crosses_y(v) => Some(seg.intersect_y(v).x),
            _ => None,
        }));
        crossings.sort_by(|a, b| a.total_cmp(b));

        let pairs = crossings.chunks_exact(2);
        if !pairs.remainder().is_empty() {
            debug!(
                "Odd crossing count {} on {:?} = {}, skipping the last",
                crossings.len(),
                axis,
                v
            );
        }
        for pair in pairs {
            let (lo, hi) = (pair[0].max(cut_lo), pair[1].min(cut_hi));
            if lo >= hi {
                continue;
            }
            let (a, b) = match axis {
                ScanAxis::X => (Point2::new(v, lo), Point2::new(v, hi)),
                ScanAxis::Y => (Point2::new(lo, v), Point2::new(hi, v)),
            };
            let seg = Segment::new(a, b);
            if !seg.is_point() {
                segments.push(seg);
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: CoordF) -> Contour {
        Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ])
        .unwrap()
    }

    /// A "U": two 2 mm arms rising from a 2 mm base, 10 mm wide and tall.
    fn u_shape() -> Contour {
        Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(8.0, 10.0),
            Point2::new(8.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_infill_config_line_spacing() {
        let config = InfillConfig::with_density(0.5);
        assert!((config.line_spacing().unwrap() - 0.9).abs() < 1e-12);

        assert_eq!(InfillConfig::with_density(0.0).line_spacing(), None);
        assert_eq!(InfillConfig::solid().line_spacing(), Some(0.45));
    }

    #[test]
    fn test_infill_config_validate() {
        assert!(InfillConfig::default().validate().is_ok());

        let config = InfillConfig {
            density: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::PreconditionViolation(_))
        ));

        let config = InfillConfig {
            extrusion_width: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_square_single_scan_line() {
        let segments = generate_infill(&square(10.0), 5.0, ScanAxis::X);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, Point2::new(5.0, 0.0));
        assert_eq!(segments[0].end, Point2::new(5.0, 10.0));
    }

    #[test]
    fn test_range_boundaries_not_scanned() {
        // Spacing equal to the width leaves no interior scan coordinate
        assert!(generate_infill(&square(10.0), 10.0, ScanAxis::X).is_empty());
        assert!(generate_infill(&square(10.0), 20.0, ScanAxis::Y).is_empty());
    }

    #[test]
    fn test_convex_one_segment_per_line() {
        let contour = Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(9.0, 1.0),
            Point2::new(10.0, 7.0),
            Point2::new(3.0, 9.0),
        ])
        .unwrap();
        let spacing = 0.7;
        let segments = generate_infill(&contour, spacing, ScanAxis::X);

        // One segment for each interior scan coordinate
        let interior_lines = (1..)
            .map(|k| k as CoordF * spacing)
            .take_while(|v| *v < 10.0)
            .count();
        assert_eq!(segments.len(), interior_lines);

        for seg in &segments {
            assert!(seg.start.y < seg.end.y);
            assert_eq!(seg.start.x, seg.end.x);
        }
    }

    #[test]
    fn test_cross_hatch_is_x_then_y() {
        let segments = generate_cross_hatch(&square(10.0), 2.5);
        assert_eq!(segments.len(), 6);
        // X sweep first: vertical lines
        for seg in &segments[..3] {
            assert_eq!(seg.start.x, seg.end.x);
        }
        // Then horizontal lines
        for seg in &segments[3..] {
            assert_eq!(seg.start.y, seg.end.y);
            assert!(seg.start.x < seg.end.x);
        }
    }

    #[test]
    fn test_concave_u_two_segments() {
        let segments = generate_infill(&u_shape(), 3.0, ScanAxis::Y);
        // y = 3, 6, 9 cross both arms
        assert_eq!(segments.len(), 6);
        assert_eq!(segments[0].start, Point2::new(0.0, 3.0));
        assert_eq!(segments[0].end, Point2::new(2.0, 3.0));
        assert_eq!(segments[1].start, Point2::new(8.0, 3.0));
        assert_eq!(segments[1].end, Point2::new(10.0, 3.0));

        // Below the gap the line spans the full base
        let base = generate_infill(&u_shape(), 1.0, ScanAxis::Y);
        assert_eq!(base[0].start, Point2::new(0.0, 1.0));
        assert_eq!(base[0].end, Point2::new(10.0, 1.0));
    }

    #[test]
    fn test_scan_line_through_vertices() {
        // Square with its walls split at mid-span, as a sliced cube yields
        let split = Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(10.0, 10.0),
            Point2::new(5.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(0.0, 5.0),
        ])
        .unwrap();
        for axis in [ScanAxis::X, ScanAxis::Y] {
            let segments = generate_infill(&split, 5.0, axis);
            assert_eq!(segments.len(), 1, "{:?}", axis);
            assert!((segments[0].length() - 10.0).abs() < 1e-9);
        }

        let diamond = Contour::from_points(&[
            Point2::new(0.0, 5.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(5.0, 10.0),
        ])
        .unwrap();
        let x = generate_infill(&diamond, 5.0, ScanAxis::X);
        assert_eq!(x, vec![Segment::from_coords(5.0, 0.0, 5.0, 10.0)]);
        let y = generate_infill(&diamond, 5.0, ScanAxis::Y);
        assert_eq!(y, vec![Segment::from_coords(0.0, 5.0, 10.0, 5.0)]);
    }

    #[test]
    fn test_notch_apex_on_scan_line() {
        // Notch rising from the base to an apex at (5, 5) on the scan line
        let contour = Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 5.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
        .unwrap();
        let segments = generate_infill(&contour, 5.0, ScanAxis::Y);
        assert_eq!(
            segments,
            vec![
                Segment::from_coords(0.0, 5.0, 5.0, 5.0),
                Segment::from_coords(5.0, 5.0, 10.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_peak_touching_scan_line_dropped() {
        // Two peaks; y = 6 only touches the lower one at (7, 6)
        let contour = Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(7.0, 6.0),
            Point2::new(5.0, 4.0),
            Point2::new(2.0, 10.0),
        ])
        .unwrap();
        let segments = generate_infill(&contour, 6.0, ScanAxis::Y);
        assert!(segments.iter().all(|s| !s.is_point()));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start.y, 6.0);
    }

    #[test]
    fn test_orientation_independent_of_winding() {
        let forward = generate_infill(&square(10.0), 5.0, ScanAxis::Y);
        let backward = generate_infill(&square(10.0).reversed(), 5.0, ScanAxis::Y);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_bounds_clamp_scan_range() {
        let bounds = BoundingBox::new(Point2::new(0.0, 0.0), Point2::new(6.0, 100.0));
        let config = InfillConfig {
            pattern: InfillPattern::Rectilinear,
            density: 1.0,
            extrusion_width: 2.0,
            bounds: Some(bounds),
        };
        let result = InfillGenerator::new(config).generate(&square(10.0), 0);
        // x = 2 and 4 only; 6 is the clamped upper limit
        assert_eq!(result.segments.len(), 2);
        assert!((result.total_length - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_clip_perpendicular() {
        let bounds = BoundingBox::new(Point2::new(0.0, 0.0), Point2::new(100.0, 4.0));
        let config = InfillConfig {
            pattern: InfillPattern::CrossHatch,
            density: 1.0,
            extrusion_width: 5.0,
            bounds: Some(bounds),
        };
        let result = InfillGenerator::new(config).generate(&square(10.0), 0);
        // The vertical line is cut at y = 4; the horizontal one at y = 5 is off the area
        assert_eq!(
            result.segments,
            vec![Segment::from_coords(5.0, 0.0, 5.0, 4.0)]
        );

        let away = BoundingBox::new(Point2::new(50.0, 50.0), Point2::new(60.0, 60.0));
        let config = InfillConfig {
            bounds: Some(away),
            ..InfillConfig::solid()
        };
        assert!(!InfillGenerator::new(config).generate(&square(10.0), 0).has_infill());
    }

    #[test]
    fn test_rectilinear_alternates_axis() {
        let generator = InfillGenerator::new(InfillConfig {
            pattern: InfillPattern::Rectilinear,
            density: 1.0,
            extrusion_width: 5.0,
            bounds: None,
        });
        let even = generator.generate(&square(10.0), 0);
        let odd = generator.generate(&square(10.0), 1);
        assert_eq!(even.segments[0].start.x, even.segments[0].end.x);
        assert_eq!(odd.segments[0].start.y, odd.segments[0].end.y);
    }

    #[test]
    fn test_zero_density() {
        let generator = InfillGenerator::new(InfillConfig::with_density(0.0));
        let result = generator.generate(&square(10.0), 0);
        assert!(!result.has_infill());
        assert_eq!(result.total_length, 0.0);
    }

    #[test]
    fn test_non_positive_spacing() {
        assert!(generate_infill(&square(10.0), 0.0, ScanAxis::X).is_empty());
        assert!(generate_cross_hatch(&square(10.0), -1.0).is_empty());
    }
}
