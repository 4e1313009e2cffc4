//! Slicing module - converts meshes into layers.
//!
//! This module contains the core slicing functionality:
//! - [`intersect_facets`] - Plane/mesh intersection producing raw segments
//! - [`reconstruct_contours`] - Stitching raw segments into closed contours
//! - [`Slicer`] - Main slicing engine running both per layer
//! - [`Layer`] - Represents a single layer of the print
//! - [`SlicingParams`] - Configuration for the slicing process

mod layer;
mod mesh_slicer;
mod reconstruct;
mod slicer;
mod slicing_params;

pub use layer::{Layer, LayerRegion, LayerStats};
pub use mesh_slicer::{intersect_facet, intersect_facets};
pub use reconstruct::{reconstruct_contours, StitchResult, StitchStats};
pub use slicer::Slicer;
pub use slicing_params::{SlicingParams, MAX_LAYERS};
