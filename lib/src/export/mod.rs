//! SVG export of sliced layers.
//!
//! Each contour becomes a `<polyline>` in model millimetres, closed by
//! repeating its first vertex. Infill segments are drawn as `<line>`
//! elements in a second colour. Layers can be written one document per
//! layer, or stacked in a single document with one `<g>` group per layer.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::geometry::{BoundingBox, Contour};
use crate::slice::Layer;
use crate::{CoordF, Result};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>"#;

/// Appearance of the exported drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgStyle {
    /// Stroke colour for contour walls.
    pub contour_color: String,
    /// Stroke colour for infill lines.
    pub infill_color: String,
    /// Stroke width (model mm).
    pub stroke_width: CoordF,
    /// Draw infill segments.
    pub show_infill: bool,
    /// Margin around the drawing (model mm).
    pub margin: CoordF,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            contour_color: "red".to_string(),
            infill_color: "blue".to_string(),
            stroke_width: 1.0,
            show_infill: true,
            margin: 2.0,
        }
    }
}

/// Writes layers as SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgWriter {
    style: SvgStyle,
}

impl SvgWriter {
    /// Writer with the default style (red contours, blue infill).
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with a custom style.
    pub fn with_style(style: SvgStyle) -> Self {
        Self { style }
    }

    /// Builder: toggle infill drawing.
    pub fn show_infill(mut self, show: bool) -> Self {
        self.style.show_infill = show;
        self
    }

    /// The active style.
    pub fn style(&self) -> &SvgStyle {
        &self.style
    }

    /// A complete document for one layer.
    pub fn layer_document(&self, layer: &Layer) -> String {
        let mut svg = self.open_document(&bounds_of(std::slice::from_ref(layer)));
        self.push_layer_body(&mut svg, layer, "");
        svg.push_str("</svg>\n");
        svg
    }

    /// A complete document with every layer in its own `<g>` group.
    pub fn document(&self, layers: &[Layer]) -> String {
        let mut svg = self.open_document(&bounds_of(layers));
        for layer in layers {
            let _ = writeln!(
                svg,
                r#"<g id="layer-{}" data-z="{:.4}">"#,
                layer.index, layer.z
            );
            self.push_layer_body(&mut svg, layer, "  ");
            svg.push_str("</g>\n");
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write all layers into a single file.
    pub fn write_to_file<P: AsRef<Path>>(&self, layers: &[Layer], path: P) -> Result<()> {
        fs::write(path.as_ref(), self.document(layers))?;
        debug!(
            "Wrote {} layers to {}",
            layers.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Write one file per layer into `dir`, named `<stem>_<index>.svg`.
    ///
    /// Returns the written paths in layer order.
    pub fn write_layer_files<P: AsRef<Path>>(
        &self,
        layers: &[Layer],
        dir: P,
        stem: &str,
    ) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(layers.len());
        for layer in layers {
            let path = dir.join(format!("{}_{:04}.svg", stem, layer.index));
            fs::write(&path, self.layer_document(layer))?;
            written.push(path);
        }
        debug!("Wrote {} layer files to {}", written.len(), dir.display());
        Ok(written)
    }

    fn open_document(&self, bounds: &BoundingBox) -> String {
        let mut svg = String::new();
        svg.push_str(XML_HEADER);
        svg.push('\n');
        if bounds.is_empty() {
            svg.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1">"#);
        } else {
            let m = self.style.margin;
            let _ = write!(
                svg,
                r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="{:.4} {:.4} {:.4} {:.4}">"#,
                bounds.min.x - m,
                bounds.min.y - m,
                bounds.width() + 2.0 * m,
                bounds.height() + 2.0 * m
            );
        }
        svg.push('\n');
        svg
    }

    fn push_layer_body(&self, svg: &mut String, layer: &Layer, indent: &str) {
        for region in &layer.regions {
            let _ = writeln!(
                svg,
                r#"{}<polyline points="{}" stroke="{}" stroke-width="{}" fill="none"/>"#,
                indent,
                polyline_points(&region.contour),
                self.style.contour_color,
                self.style.stroke_width
            );
        }
        if !self.style.show_infill {
            return;
        }
        for seg in layer.regions.iter().flat_map(|r| r.infill.iter()) {
            let _ = writeln!(
                svg,
                r#"{}<line x1="{:.4}" y1="{:.4}" x2="{:.4}" y2="{:.4}" stroke="{}" stroke-width="{}"/>"#,
                indent,
                seg.start.x,
                seg.start.y,
                seg.end.x,
                seg.end.y,
                self.style.infill_color,
                self.style.stroke_width
            );
        }
    }
}

/// `x,y` pairs of a contour's vertices, with the first vertex repeated at the
/// end so the polyline closes.
pub fn polyline_points(contour: &Contour) -> String {
    let mut points: Vec<String> = contour.points().iter().map(|p| p.to_pair()).collect();
    points.push(contour.start_point().to_pair());
    points.join(" ")
}

fn bounds_of(layers: &[Layer]) -> BoundingBox {
    let mut bb = BoundingBox::empty();
    for contour in layers.iter().flat_map(Layer::contours) {
        let other = contour.bounding_box();
        bb.merge_point(other.min);
        bb.merge_point(other.max);
    }
    bb
}
