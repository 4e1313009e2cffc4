//! Toolpath types.
//!
//! A layer's toolpath is the ordered traversal the nozzle follows: for each
//! region in discovery order, the contour walls, then the infill segments in
//! generation order. [`LayerPaths::from_layer`] builds that order; the
//! accountant and the G-code writer both walk it as-is.

use std::f64::consts::PI;

use crate::geometry::{Contour, Point2, Segment};
use crate::slice::Layer;
use crate::CoordF;

/// Type of extrusion for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtrusionRole {
    /// Contour wall.
    Wall,
    /// Scanline infill.
    Infill,
}

impl ExtrusionRole {
    /// Check if this role is a wall.
    pub fn is_wall(&self) -> bool {
        matches!(self, ExtrusionRole::Wall)
    }

    /// Check if this role is infill.
    pub fn is_infill(&self) -> bool {
        matches!(self, ExtrusionRole::Infill)
    }

    /// Feature name for `; FEATURE:` comments.
    pub fn feature_name(&self) -> &'static str {
        match self {
            ExtrusionRole::Wall => "Wall",
            ExtrusionRole::Infill => "Infill",
        }
    }
}

/// A single extrusion path: a run of segments printed without lifting.
#[derive(Debug, Clone)]
pub struct ExtrusionPath {
    /// The segments, in print order.
    pub segments: Vec<Segment>,

    /// The role/type of this extrusion.
    pub role: ExtrusionRole,

    /// Extrusion width (mm).
    pub width: CoordF,

    /// Layer height (mm).
    pub height: CoordF,
}

impl ExtrusionPath {
    /// Create a new extrusion path.
    pub fn new(segments: Vec<Segment>, role: ExtrusionRole, width: CoordF, height: CoordF) -> Self {
        Self {
            segments,
            role,
            width,
            height,
        }
    }

    /// A wall path following a contour.
    pub fn from_contour(contour: &Contour, width: CoordF, height: CoordF) -> Self {
        Self::new(contour.segments().to_vec(), ExtrusionRole::Wall, width, height)
    }

    /// An infill path made of one segment.
    pub fn from_infill(segment: Segment, width: CoordF, height: CoordF) -> Self {
        Self::new(vec![segment], ExtrusionRole::Infill, width, height)
    }

    /// Where the nozzle has to be before printing.
    pub fn first_point(&self) -> Option<Point2> {
        self.segments.first().map(|s| s.start)
    }

    /// Where the nozzle ends up.
    pub fn last_point(&self) -> Option<Point2> {
        self.segments.last().map(|s| s.end)
    }

    /// Sum of segment lengths (mm).
    pub fn length(&self) -> CoordF {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Cross-section area of the extruded bead (mm²).
    ///
    /// Rectangle with semicircular ends: `height × (width - height × (1 - π/4))`.
    pub fn cross_section_area(&self) -> CoordF {
        cross_section_area(self.width, self.height)
    }
}

/// Rounded-rectangle bead cross-section (mm²).
#[inline]
pub fn cross_section_area(width: CoordF, height: CoordF) -> CoordF {
    height * (width - height * (1.0 - 0.25 * PI))
}

/// Toolpath for one layer.
#[derive(Debug, Clone, Default)]
pub struct LayerPaths {
    /// All extrusion paths for this layer, in print order.
    pub paths: Vec<ExtrusionPath>,

    /// Layer index.
    pub layer_index: usize,

    /// Nozzle Z while printing this layer (mm).
    pub z_height: CoordF,

    /// Layer thickness (mm).
    pub layer_height: CoordF,
}

impl LayerPaths {
    /// Create a new layer paths container.
    pub fn new(layer_index: usize, z_height: CoordF, layer_height: CoordF) -> Self {
        Self {
            paths: Vec::new(),
            layer_index,
            z_height,
            layer_height,
        }
    }

    /// Build the print order for a sliced layer.
    ///
    /// Regions follow discovery order; within a region the wall comes first,
    /// then each infill segment.
    pub fn from_layer(layer: &Layer, width: CoordF) -> Self {
        let mut paths = Self::new(layer.index, layer.print_z, layer.thickness);
        for region in &layer.regions {
            paths.add_path(ExtrusionPath::from_contour(
                &region.contour,
                width,
                layer.thickness,
            ));
            for seg in &region.infill {
                paths.add_path(ExtrusionPath::from_infill(*seg, width, layer.thickness));
            }
        }
        paths
    }

    /// Add a path to this layer.
    pub fn add_path(&mut self, path: ExtrusionPath) {
        self.paths.push(path);
    }

    /// Get the number of paths.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Check if this layer has any paths.
    pub fn has_paths(&self) -> bool {
        !self.paths.is_empty()
    }

    /// Every segment of the layer, in print order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.paths.iter().flat_map(|p| p.segments.iter())
    }

    /// Total extruded path length (mm).
    pub fn path_length(&self) -> CoordF {
        self.paths.iter().map(ExtrusionPath::length).sum()
    }

    /// Wall paths only.
    pub fn wall_paths(&self) -> impl Iterator<Item = &ExtrusionPath> {
        self.paths.iter().filter(|p| p.role.is_wall())
    }

    /// Infill paths only.
    pub fn infill_paths(&self) -> impl Iterator<Item = &ExtrusionPath> {
        self.paths.iter().filter(|p| p.role.is_infill())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::LayerRegion;

    fn square_layer() -> Layer {
        let contour = Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
        .unwrap();
        let mut layer = Layer::new(0, 0.1, 0.2, 0.2);
        layer.regions.push(LayerRegion {
            centroid: contour.centroid().ok(),
            contour,
            infill: vec![
                Segment::from_coords(5.0, 0.0, 5.0, 10.0),
                Segment::from_coords(0.0, 5.0, 10.0, 5.0),
            ],
        });
        layer
    }

    #[test]
    fn test_cross_section_area() {
        let path = ExtrusionPath::new(Vec::new(), ExtrusionRole::Wall, 0.45, 0.2);
        let expected = 0.2 * (0.45 - 0.2 * (1.0 - PI / 4.0));
        assert!((path.cross_section_area() - expected).abs() < 1e-12);
        // Rounded ends make it smaller than the bounding rectangle
        assert!(path.cross_section_area() < 0.45 * 0.2);
    }

    #[test]
    fn test_from_layer_order() {
        let paths = LayerPaths::from_layer(&square_layer(), 0.45);
        assert_eq!(paths.path_count(), 3);
        assert!(paths.paths[0].role.is_wall());
        assert!(paths.paths[1].role.is_infill());
        assert!(paths.paths[2].role.is_infill());
        assert_eq!(paths.wall_paths().count(), 1);
        assert_eq!(paths.infill_paths().count(), 2);
        assert_eq!(paths.segments().count(), 6);
        assert!((paths.path_length() - 60.0).abs() < 1e-12);
        assert!((paths.z_height - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_path_endpoints() {
        let paths = LayerPaths::from_layer(&square_layer(), 0.45);
        let wall = &paths.paths[0];
        assert_eq!(wall.first_point(), Some(Point2::new(0.0, 0.0)));
        assert_eq!(wall.last_point(), Some(Point2::new(0.0, 0.0)));
        assert!((wall.length() - 40.0).abs() < 1e-12);

        let empty = ExtrusionPath::new(Vec::new(), ExtrusionRole::Infill, 0.45, 0.2);
        assert_eq!(empty.first_point(), None);
        assert_eq!(empty.length(), 0.0);
    }
}
