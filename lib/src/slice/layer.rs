//! Layer types.

use super::StitchStats;
use crate::geometry::{Contour, Point2, Segment};
use crate::CoordF;

/// One closed contour of a layer together with the infill generated inside it.
#[derive(Debug, Clone)]
pub struct LayerRegion {
    /// Wall loop.
    pub contour: Contour,

    /// Area-weighted centroid, `None` for a degenerate (zero-area) contour.
    pub centroid: Option<Point2>,

    /// Infill segments in generation order.
    pub infill: Vec<Segment>,
}

impl LayerRegion {
    /// Wall length plus infill length.
    pub fn path_length(&self) -> CoordF {
        self.contour.perimeter() + self.infill.iter().map(Segment::length).sum::<CoordF>()
    }

    /// Whether the contour has (nearly) zero area.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.centroid.is_none()
    }
}

/// Per-layer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    /// Reconstruction counters.
    pub stitch: StitchStats,

    /// Contours whose centroid could not be computed.
    pub degenerate_contours: usize,

    /// Infill segments across all regions.
    pub infill_segments: usize,
}

impl LayerStats {
    /// Accumulate another layer's counters.
    pub fn merge(&mut self, other: &LayerStats) {
        self.stitch.merge(&other.stitch);
        self.degenerate_contours += other.degenerate_contours;
        self.infill_segments += other.infill_segments;
    }
}

/// A single horizontal slice of the model.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Layer index, 0 at the bottom.
    pub index: usize,

    /// Height of the cutting plane (mm).
    pub z: CoordF,

    /// Top of the layer, where the nozzle sits when printing it (mm).
    pub print_z: CoordF,

    /// Layer thickness (mm).
    pub thickness: CoordF,

    /// Regions in contour discovery order.
    pub regions: Vec<LayerRegion>,

    /// Counters gathered while building the layer.
    pub stats: LayerStats,
}

impl Layer {
    /// Create an empty layer.
    pub fn new(index: usize, z: CoordF, print_z: CoordF, thickness: CoordF) -> Self {
        Self {
            index,
            z,
            print_z,
            thickness,
            regions: Vec::new(),
            stats: LayerStats::default(),
        }
    }

    /// Bottom of the layer (mm).
    #[inline]
    pub fn bottom_z(&self) -> CoordF {
        self.print_z - self.thickness
    }

    /// Whether the plane missed the model.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Contours in discovery order.
    pub fn contours(&self) -> impl Iterator<Item = &Contour> {
        self.regions.iter().map(|r| &r.contour)
    }

    /// Number of contours.
    #[inline]
    pub fn contour_count(&self) -> usize {
        self.regions.len()
    }

    /// Total wall and infill length (mm).
    pub fn path_length(&self) -> CoordF {
        self.regions.iter().map(LayerRegion::path_length).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_accessors() {
        let contour = Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ])
        .unwrap();
        let region = LayerRegion {
            centroid: contour.centroid().ok(),
            contour,
            infill: vec![Segment::from_coords(1.0, 0.0, 1.0, 2.0)],
        };
        assert!(!region.is_degenerate());
        assert!((region.path_length() - 10.0).abs() < 1e-12);

        let mut layer = Layer::new(3, 0.7, 0.8, 0.2);
        assert!(layer.is_empty());
        assert!((layer.bottom_z() - 0.6).abs() < 1e-12);

        layer.regions.push(region);
        assert_eq!(layer.contour_count(), 1);
        assert_eq!(layer.contours().count(), 1);
        assert!((layer.path_length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_stats_merge() {
        let mut total = LayerStats::default();
        let layer = LayerStats {
            stitch: StitchStats {
                input_segments: 4,
                synthetic_segments: 1,
                swapped_segments: 2,
                ambiguous_stitches: 0,
            },
            degenerate_contours: 1,
            infill_segments: 7,
        };
        total.merge(&layer);
        total.merge(&layer);
        assert_eq!(total.stitch.input_segments, 8);
        assert_eq!(total.degenerate_contours, 2);
        assert_eq!(total.infill_segments, 14);
    }
}
