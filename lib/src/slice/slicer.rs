//! Layer slicer.
//!
//! Turns a [`Model`] into a stack of [`Layer`]s. Each layer is independent:
//! intersect the facets at the layer's mid-height, stitch the segments into
//! contours, then compute centroids and infill per contour. Layers run on the
//! rayon pool and are collected back in index order.

use super::{
    intersect_facets, reconstruct_contours, Layer, LayerRegion, SlicingParams, MAX_LAYERS,
};
use crate::infill::{InfillConfig, InfillGenerator};
use crate::mesh::Model;
use crate::{CoordF, Error, Result};
use log::{debug, info, warn};
use rayon::prelude::*;

/// A planned layer: index, cutting plane, top and thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayerPlane {
    index: usize,
    z: CoordF,
    print_z: CoordF,
    thickness: CoordF,
}

/// Main slicing engine.
#[derive(Debug, Clone)]
pub struct Slicer {
    params: SlicingParams,
    infill: Option<InfillGenerator>,
}

impl Slicer {
    /// Create a slicer that produces contours only.
    pub fn new(params: SlicingParams) -> Self {
        Self {
            params,
            infill: None,
        }
    }

    /// Builder: also generate infill inside every contour.
    pub fn with_infill(mut self, config: InfillConfig) -> Self {
        self.infill = Some(InfillGenerator::new(config));
        self
    }

    /// The slicing parameters.
    pub fn params(&self) -> &SlicingParams {
        &self.params
    }

    /// Slice the model into layers, bottom to top.
    ///
    /// Empty layers (planes that miss the model) are kept so layer indices
    /// stay contiguous.
    pub fn slice(&self, model: &Model) -> Result<Vec<Layer>> {
        self.params.validate()?;
        if let Some(infill) = &self.infill {
            infill.config().validate()?;
        }
        model.validate()?;

        let planes = self.layer_planes(model)?;
        info!(
            "Slicing '{}': {} facets into {} layers",
            model.name(),
            model.facet_count(),
            planes.len()
        );

        let layers = if self.params.parallel {
            planes
                .par_iter()
                .map(|plane| self.slice_layer(model, plane))
                .collect::<Result<Vec<_>>>()?
        } else {
            planes
                .iter()
                .map(|plane| self.slice_layer(model, plane))
                .collect::<Result<Vec<_>>>()?
        };

        let contours: usize = layers.iter().map(Layer::contour_count).sum();
        info!("Sliced {} layers, {} contours", layers.len(), contours);
        Ok(layers)
    }

    /// Slice a single plane `Z = z` outside of any layer stack.
    pub fn slice_at(&self, model: &Model, z: CoordF) -> Result<Layer> {
        let plane = LayerPlane {
            index: 0,
            z,
            print_z: z,
            thickness: 0.0,
        };
        self.slice_layer(model, &plane)
    }

    fn layer_planes(&self, model: &Model) -> Result<Vec<LayerPlane>> {
        let bb = model.bounding_box();
        let z_min = self.params.z_min.unwrap_or(bb.min.z);
        let z_max = self.params.z_max.unwrap_or(bb.max.z);
        if !(z_min < z_max) {
            return Err(Error::PreconditionViolation(format!(
                "model '{}' has no height to slice (z {} to {})",
                model.name(),
                z_min,
                z_max
            )));
        }

        let span = z_max - z_min - self.params.first_layer_height;
        let estimate = 1.0 + (span / self.params.layer_height).max(0.0).ceil();
        if !(estimate <= MAX_LAYERS as CoordF) {
            return Err(Error::PreconditionViolation(format!(
                "layer height {} would cut {:.0} mm into more than {} layers",
                self.params.layer_height,
                z_max - z_min,
                MAX_LAYERS
            )));
        }

        let mut planes = Vec::new();
        let mut previous_z = CoordF::NEG_INFINITY;
        for index in 0.. {
            let thickness = self.params.layer_thickness(index);
            let bottom = z_min + self.params.layer_bottom(index);
            let z = bottom + thickness / 2.0;
            if z >= z_max {
                break;
            }
            if z <= previous_z || index >= MAX_LAYERS {
                return Err(Error::PreconditionViolation(format!(
                    "layer height {} does not advance past z = {}",
                    self.params.layer_height, z
                )));
            }
            previous_z = z;
            planes.push(LayerPlane {
                index,
                z,
                print_z: bottom + thickness,
                thickness,
            });
        }
        Ok(planes)
    }

    fn slice_layer(&self, model: &Model, plane: &LayerPlane) -> Result<Layer> {
        let segments = intersect_facets(model.facets(), plane.z);
        let stitched = reconstruct_contours(segments)?;

        let mut layer = Layer::new(plane.index, plane.z, plane.print_z, plane.thickness);
        layer.stats.stitch = stitched.stats;

        for contour in stitched.contours {
            let centroid = match contour.centroid() {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!("Layer {}: skipping degenerate contour: {}", plane.index, e);
                    layer.stats.degenerate_contours += 1;
                    None
                }
            };

            let infill = match (&self.infill, centroid) {
                (Some(generator), Some(_)) => generator.generate(&contour, plane.index).segments,
                _ => Vec::new(),
            };
            layer.stats.infill_segments += infill.len();

            layer.regions.push(LayerRegion {
                contour,
                centroid,
                infill,
            });
        }

        debug!(
            "Layer {} at z={:.3}: {} segments, {} contours, {} infill segments",
            plane.index,
            plane.z,
            layer.stats.stitch.input_segments,
            layer.contour_count(),
            layer.stats.infill_segments
        );
        Ok(layer)
    }
}
