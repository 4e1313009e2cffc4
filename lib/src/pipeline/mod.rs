//! Pipeline module - orchestrates the complete slicing process.
//!
//! mesh → layers (contours, centroids, infill) → toolpaths → extrusion totals
//!
//! Layer work runs in parallel inside [`Slicer`]; the toolpath walk and the
//! extrusion accounting that follow are strictly sequential, so the running
//! filament total follows print order.
//!
//! # Example
//!
//! ```rust,ignore
//! use slicer::pipeline::{PipelineConfig, PrintPipeline};
//!
//! let model = slicer::load_stl("cube.stl")?;
//! let pipeline = PrintPipeline::new(PipelineConfig::default().layer_height(0.2));
//! let print = pipeline.process(&model)?;
//! print.to_gcode().write_to_file("cube.gcode")?;
//! ```

use log::info;

use crate::config::PrintConfig;
use crate::export::SvgWriter;
use crate::gcode::{
    extrusion_multiplier, ExtrusionAccountant, FilamentStats, GCode, GCodeWriter, LayerPaths,
};
use crate::geometry::{BoundingBox, Point2};
use crate::infill::{InfillConfig, InfillPattern};
use crate::mesh::Model;
use crate::slice::{Layer, LayerStats, Slicer, SlicingParams};
use crate::{CoordF, Result};

/// Configuration for the printing pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Global print configuration.
    pub print: PrintConfig,

    /// Slicing parameters.
    pub slicing: SlicingParams,

    /// Infill parameters.
    pub infill: InfillConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_print_config(PrintConfig::default())
    }
}

impl PipelineConfig {
    /// Create a new pipeline configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive slicing and infill parameters from a print configuration.
    pub fn from_print_config(print: PrintConfig) -> Self {
        let slicing = SlicingParams {
            layer_height: print.layer_height,
            first_layer_height: print.first_layer_height,
            ..SlicingParams::default()
        };
        let infill = InfillConfig {
            pattern: print.infill_pattern,
            density: print.infill_density,
            extrusion_width: print.effective_extrusion_width(),
            bounds: Some(bed_bounds(&print)),
        };
        Self {
            print,
            slicing,
            infill,
        }
    }

    /// Builder: set layer height.
    pub fn layer_height(mut self, height: CoordF) -> Self {
        self.slicing.layer_height = height;
        self.print.layer_height = height;
        self
    }

    /// Builder: set first layer height.
    pub fn first_layer_height(mut self, height: CoordF) -> Self {
        self.slicing.first_layer_height = height;
        self.print.first_layer_height = height;
        self
    }

    /// Builder: set infill density (0..=1).
    pub fn infill_density(mut self, density: CoordF) -> Self {
        self.infill.density = density;
        self.print.infill_density = density;
        self
    }

    /// Builder: set infill pattern.
    pub fn infill_pattern(mut self, pattern: InfillPattern) -> Self {
        self.infill.pattern = pattern;
        self.print.infill_pattern = pattern;
        self
    }

    /// Builder: set nozzle diameter. Updates the infill line width when the
    /// extrusion width is automatic.
    pub fn nozzle_diameter(mut self, diameter: CoordF) -> Self {
        self.print.nozzle_diameter = diameter;
        self.infill.extrusion_width = self.print.effective_extrusion_width();
        self
    }

    /// Builder: set filament diameter.
    pub fn filament_diameter(mut self, diameter: CoordF) -> Self {
        self.print.filament_diameter = diameter;
        self
    }

    /// Builder: set bed size. Infill is clipped to the new bed.
    pub fn bed_size(mut self, x: CoordF, y: CoordF) -> Self {
        self.print = self.print.bed_size(x, y);
        self.infill = self.infill.with_bounds(bed_bounds(&self.print));
        self
    }

    /// Builder: slice sequentially instead of on the rayon pool.
    pub fn sequential(mut self) -> Self {
        self.slicing.parallel = false;
        self
    }

    /// Builder: keep the model where it is instead of centering it on the bed.
    pub fn keep_position(mut self) -> Self {
        self.print.center_on_bed = false;
        self
    }

    /// Validate every part of the configuration.
    pub fn validate(&self) -> Result<()> {
        self.print.validate()?;
        self.slicing.validate()?;
        self.infill.validate()
    }
}

/// The printable area, `(0, 0)` to the bed size.
fn bed_bounds(print: &PrintConfig) -> BoundingBox {
    BoundingBox::new(
        Point2::zero(),
        Point2::new(print.bed_size_x, print.bed_size_y),
    )
}

/// The main printing pipeline.
#[derive(Debug, Clone, Default)]
pub struct PrintPipeline {
    config: PipelineConfig,
}

impl PrintPipeline {
    /// Create a new pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process a model through the complete pipeline.
    pub fn process(&self, model: &Model) -> Result<ProcessedPrint> {
        self.process_with_callback(model, |_, _| {})
    }

    /// Process a model with a progress callback.
    ///
    /// The callback receives (stage_name, progress_0_to_1). Preconditions
    /// (configuration and mesh) are checked before any layer work.
    pub fn process_with_callback<F>(
        &self,
        model: &Model,
        mut callback: F,
    ) -> Result<ProcessedPrint>
    where
        F: FnMut(&str, f64),
    {
        self.config.validate()?;
        model.validate()?;

        callback("preparing", 0.0);
        let mut model = model.clone();
        if self.config.print.center_on_bed {
            model.center_on(
                self.config.print.bed_size_x / 2.0,
                self.config.print.bed_size_y / 2.0,
            );
            model.drop_to_bed();
        }
        callback("preparing", 1.0);

        callback("slicing", 0.0);
        let slicer =
            Slicer::new(self.config.slicing.clone()).with_infill(self.config.infill.clone());
        let layers = slicer.slice(&model)?;
        callback("slicing", 1.0);

        callback("toolpaths", 0.0);
        let print = &self.config.print;
        let width = print.effective_extrusion_width();
        let mut accountant = ExtrusionAccountant::new(0.0);
        let mut stats = LayerStats::default();
        let mut layer_paths = Vec::with_capacity(layers.len());
        let total = layers.len().max(1) as f64;

        for (i, layer) in layers.iter().enumerate() {
            let paths = LayerPaths::from_layer(layer, width);
            accountant.set_multiplier(extrusion_multiplier(
                width,
                paths.layer_height,
                print.filament_diameter,
                print.extrusion_multiplier,
            ));
            for path in &paths.paths {
                accountant.add_path(path);
            }
            stats.merge(&layer.stats);
            layer_paths.push(paths);
            callback("toolpaths", (i + 1) as f64 / total);
        }
        callback("toolpaths", 1.0);

        let filament = accountant.stats(print.filament_diameter, print.filament_density);
        info!(
            "Processed {} layers: {:.1} mm of path, {:.2} m of filament ({:.2} g)",
            layers.len(),
            filament.path_length_mm,
            filament.filament_length_m(),
            filament.filament_weight_g
        );

        Ok(ProcessedPrint {
            layers,
            layer_paths,
            stats,
            filament,
            config: self.config.clone(),
        })
    }
}

/// Result of running the pipeline.
#[derive(Debug, Clone)]
pub struct ProcessedPrint {
    /// Sliced layers, bottom to top.
    pub layers: Vec<Layer>,

    /// Toolpaths per layer, in print order.
    pub layer_paths: Vec<LayerPaths>,

    /// Diagnostics summed over all layers.
    pub stats: LayerStats,

    /// Filament usage over the whole toolpath.
    pub filament: FilamentStats,

    /// Configuration used.
    pub config: PipelineConfig,
}

impl ProcessedPrint {
    /// Get the number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of contours over all layers.
    pub fn contour_count(&self) -> usize {
        self.layers.iter().map(Layer::contour_count).sum()
    }

    /// Render the print as G-code.
    pub fn to_gcode(&self) -> GCode {
        let mut writer = GCodeWriter::with_config(self.config.print.clone());
        writer.write_preamble();
        for paths in &self.layer_paths {
            writer.write_layer(paths);
        }
        writer.write_end();
        writer.finish()
    }

    /// Render every layer into one SVG document.
    pub fn to_svg(&self) -> String {
        SvgWriter::new().document(&self.layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::mesh::tests::cube;
    use crate::Error;

    fn unit_layers() -> PipelineConfig {
        PipelineConfig::new().layer_height(1.0).first_layer_height(1.0)
    }

    #[test]
    fn test_config_from_print_config() {
        let print = PrintConfig::default()
            .layer_height(0.3)
            .first_layer_height(0.25)
            .infill_density(0.5);
        let config = PipelineConfig::from_print_config(print);
        assert!((config.slicing.layer_height - 0.3).abs() < 1e-12);
        assert!((config.slicing.first_layer_height - 0.25).abs() < 1e-12);
        assert!((config.infill.density - 0.5).abs() < 1e-12);
        assert!((config.infill.extrusion_width - 0.45).abs() < 1e-12);
        assert_eq!(
            config.infill.bounds,
            Some(BoundingBox::new(
                Point2::zero(),
                Point2::new(256.0, 256.0)
            ))
        );

        let small = PipelineConfig::new().bed_size(100.0, 50.0);
        assert_eq!(small.print.bed_size_y, 50.0);
        assert_eq!(small.infill.bounds.map(|b| b.max), Some(Point2::new(100.0, 50.0)));
    }

    #[test]
    fn test_builders_keep_parts_in_sync() {
        let config = PipelineConfig::new()
            .layer_height(0.1)
            .infill_pattern(InfillPattern::Rectilinear)
            .nozzle_diameter(0.6);
        assert!((config.print.layer_height - 0.1).abs() < 1e-12);
        assert!((config.slicing.layer_height - 0.1).abs() < 1e-12);
        assert_eq!(config.infill.pattern, InfillPattern::Rectilinear);
        assert!((config.infill.extrusion_width - 0.675).abs() < 1e-12);
    }

    #[test]
    fn test_process_cube() {
        let pipeline = PrintPipeline::new(unit_layers());
        let print = pipeline.process(&cube(10.0)).unwrap();

        assert_eq!(print.layer_count(), 10);
        assert_eq!(print.contour_count(), 10);
        assert_eq!(print.layer_paths.len(), 10);
        assert_eq!(print.stats.degenerate_contours, 0);
        assert!(print.stats.infill_segments > 0);

        // Every layer walks a 40 mm wall plus its infill
        let walls: f64 = print
            .layer_paths
            .iter()
            .flat_map(|p| p.wall_paths())
            .map(|p| p.length())
            .sum();
        assert!((walls - 400.0).abs() < 1e-6);
        assert!(print.filament.filament_length_mm > 0.0);
        assert!(print.filament.path_length_mm > walls);
    }

    #[test]
    fn test_model_centered_on_bed() {
        let pipeline = PrintPipeline::new(unit_layers());
        let print = pipeline.process(&cube(10.0)).unwrap();
        let bb = print.layers[0].regions[0].contour.bounding_box();
        assert!((bb.min.x - 123.0).abs() < 1e-9);
        assert!((bb.max.y - 133.0).abs() < 1e-9);

        let kept = PrintPipeline::new(unit_layers().keep_position())
            .process(&cube(10.0))
            .unwrap();
        let bb = kept.layers[0].regions[0].contour.bounding_box();
        assert!(bb.min.x.abs() < 1e-9);
    }

    #[test]
    fn test_infill_stays_on_bed() {
        let mut model = cube(10.0);
        model.translate(Point3::new(-5.0, 45.0, 0.0));
        let config = unit_layers().keep_position().bed_size(50.0, 50.0);
        let print = PrintPipeline::new(config).process(&model).unwrap();

        let infill: Vec<_> = print
            .layers
            .iter()
            .flat_map(|l| l.regions.iter().flat_map(|r| r.infill.iter()))
            .collect();
        assert!(!infill.is_empty());
        for seg in infill {
            for p in [seg.start, seg.end] {
                assert!((0.0..=50.0).contains(&p.x), "{:?}", seg);
                assert!((0.0..=50.0).contains(&p.y), "{:?}", seg);
            }
        }
        // Walls are still the full 40 mm square
        let wall = print.layer_paths[0].wall_paths().map(|p| p.length()).sum::<f64>();
        assert!((wall - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_gcode_matches_accounting() {
        let pipeline = PrintPipeline::new(unit_layers().sequential());
        let print = pipeline.process(&cube(5.0)).unwrap();
        let gcode = print.to_gcode();

        let stats = gcode.stats();
        assert_eq!(stats.layers, 5);
        assert!(
            (stats.filament.filament_length_mm - print.filament.filament_length_mm).abs() < 1e-9
        );
        assert!(gcode.content().contains("; LAYER:4"));
        assert!(gcode.content().contains("M84"));
    }

    #[test]
    fn test_svg_output() {
        let pipeline = PrintPipeline::new(unit_layers());
        let print = pipeline.process(&cube(4.0)).unwrap();
        let svg = print.to_svg();
        assert_eq!(svg.matches("<g id=").count(), 4);
        assert_eq!(svg.matches("<polyline").count(), 4);
    }

    #[test]
    fn test_callback_stages() {
        let pipeline = PrintPipeline::new(unit_layers());
        let mut stages = Vec::new();
        pipeline
            .process_with_callback(&cube(3.0), |stage, progress| {
                if progress >= 1.0 && stages.last().map(String::as_str) != Some(stage) {
                    stages.push(stage.to_string());
                }
            })
            .unwrap();
        assert_eq!(stages, vec!["preparing", "slicing", "toolpaths"]);
    }

    #[test]
    fn test_preconditions_checked_first() {
        let bad_height = PrintPipeline::new(PipelineConfig::new().layer_height(0.0));
        assert!(matches!(
            bad_height.process(&cube(10.0)),
            Err(Error::PreconditionViolation(_))
        ));

        let bad_density = PrintPipeline::new(PipelineConfig::new().infill_density(1.5));
        assert!(matches!(
            bad_density.process(&cube(10.0)),
            Err(Error::PreconditionViolation(_))
        ));

        let pipeline = PrintPipeline::default();
        assert!(matches!(
            pipeline.process(&Model::default()),
            Err(Error::Mesh(_))
        ));
    }
}
