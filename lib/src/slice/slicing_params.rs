//! Slicing parameters.

use crate::{CoordF, Error, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of layers one slicing run may plan.
pub const MAX_LAYERS: usize = 1_000_000;

/// Parameters controlling how a model is cut into layers.
///
/// Layer `0` is `first_layer_height` thick; every later layer is
/// `layer_height` thick. Each layer is sliced at its mid-height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlicingParams {
    /// Layer height for all layers after the first (mm).
    pub layer_height: CoordF,

    /// Height of the first layer (mm).
    pub first_layer_height: CoordF,

    /// Lowest Z to slice from. Defaults to the model's minimum Z.
    pub z_min: Option<CoordF>,

    /// Highest Z to slice up to. Defaults to the model's maximum Z.
    pub z_max: Option<CoordF>,

    /// Slice layers on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SlicingParams {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            first_layer_height: 0.2,
            z_min: None,
            z_max: None,
            parallel: true,
        }
    }
}

impl SlicingParams {
    /// Parameters with a uniform layer height.
    pub fn with_layer_height(layer_height: CoordF) -> Self {
        Self {
            layer_height,
            first_layer_height: layer_height,
            ..Default::default()
        }
    }

    /// Builder: slice sequentially on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Thickness of the layer at `index`.
    #[inline]
    pub fn layer_thickness(&self, index: usize) -> CoordF {
        if index == 0 {
            self.first_layer_height
        } else {
            self.layer_height
        }
    }

    /// Bottom Z of the layer at `index`, relative to the slicing start.
    #[inline]
    pub fn layer_bottom(&self, index: usize) -> CoordF {
        if index == 0 {
            0.0
        } else {
            self.first_layer_height + (index - 1) as CoordF * self.layer_height
        }
    }

    /// Check the parameters.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("layer height", self.layer_height),
            ("first layer height", self.first_layer_height),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::PreconditionViolation(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if let (Some(lo), Some(hi)) = (self.z_min, self.z_max) {
            if lo >= hi {
                return Err(Error::PreconditionViolation(format!(
                    "slicing range is empty: z_min {} >= z_max {}",
                    lo, hi
                )));
            }
        }
        Ok(())
    }
}
