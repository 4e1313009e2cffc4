//! Geometry primitives for the slicer.
//!
//! This module provides the fundamental geometric types used throughout the slicing pipeline:
//! - [`Point2`] and [`Point3`] - 2D plane points and 3D mesh vertices
//! - [`Segment`] - Directed line segment, optionally carrying a facet normal hint
//! - [`Contour`] - Closed loop of segments with cached area and centroid
//! - [`BoundingBox`] and [`BoundingBox3`] - Axis-aligned bounding boxes
//!
//! ## Coordinates and tolerance
//!
//! All coordinates are `f64` millimetres. Point equality is tolerance based
//! (see [`crate::EPSILON`]) because segment endpoints coming from separate
//! plane/edge interpolations rarely agree to the last bit.
//!
//! Vector algebra uses named functions ([`cross2d`], [`subtract`], ...) rather
//! than operator overloads, so point and vector roles stay explicit.

mod bounding_box;
mod contour;
mod point;
mod segment;

pub use bounding_box::{BoundingBox, BoundingBox3};
pub use contour::{Contour, Contours};
pub use point::{add, cross2d, dot, scale, subtract, Point2, Point3};
pub use segment::{Segment, Segments};

use crate::CoordF;

/// Linear interpolation between two points.
#[inline]
pub fn lerp(a: Point2, b: Point2, t: CoordF) -> Point2 {
    Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}
