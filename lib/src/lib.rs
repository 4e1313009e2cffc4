//! # Slicer
//!
//! Converts a triangulated surface mesh into planar toolpaths, one per layer.
//!
//! This library provides the layer slicing pipeline:
//! - STL mesh loading and in-place translation/rotation
//! - Plane/mesh intersection at each layer height
//! - Stitching of unordered intersection segments into closed contours
//! - Contour area and centroid computation
//! - Cross-hatched scanline infill
//! - Extrusion length accounting, G-code and SVG output
//!
//! ## Example
//!
//! ```rust,ignore
//! use slicer::{load_stl, PipelineConfig, PrintPipeline};
//!
//! let model = load_stl("model.stl")?;
//! let pipeline = PrintPipeline::new(PipelineConfig::default());
//! let print = pipeline.process(&model)?;
//! print.to_gcode().write_to_file("output.gcode")?;
//! ```

// Core modules
pub mod config;
pub mod export;
pub mod gcode;
pub mod geometry;
pub mod infill;
pub mod mesh;
pub mod pipeline;
pub mod slice;

// Re-export commonly used types
pub use config::PrintConfig;
pub use export::{SvgStyle, SvgWriter};
pub use gcode::{
    accumulate, extrusion_multiplier, ExtrusionAccountant, ExtrusionPath, ExtrusionRole,
    FilamentStats, GCode, GCodeCommand, GCodeStats, GCodeWriter, LayerPaths,
};
pub use geometry::{cross2d, subtract, BoundingBox, Contour, Point2, Point3, Segment};
pub use infill::{
    generate_cross_hatch, generate_infill, InfillConfig, InfillGenerator, InfillPattern,
    InfillResult, ScanAxis,
};
pub use mesh::{load_stl, parse_stl, save_stl, Axis, Facet, Model};
pub use pipeline::{PipelineConfig, PrintPipeline, ProcessedPrint};
pub use slice::{
    intersect_facets, reconstruct_contours, Layer, LayerRegion, LayerStats, Slicer, SlicingParams,
    StitchResult, StitchStats,
};

/// Floating-point coordinate type, in millimetres.
pub type CoordF = f64;

/// Tolerance used when comparing point coordinates.
///
/// Independently interpolated intersection points that describe the same
/// location differ in the last bits; anything closer than this on both axes
/// is the same point.
pub const EPSILON: CoordF = 1e-5;

/// Areas with an absolute value below this are treated as zero.
pub const AREA_EPSILON: CoordF = 1e-10;

/// Result type used throughout the slicer.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for slicer operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mesh error: {0}")]
    Mesh(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Contour is not closed: {0}")]
    OpenContour(String),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
