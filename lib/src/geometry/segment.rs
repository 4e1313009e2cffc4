//! Directed line segment type.
//!
//! Segments are the unit of work for the whole pipeline: the plane
//! intersector emits them, the reconstructor stitches them into contours and
//! the infill generator produces more of them.

use super::{cross2d, subtract, BoundingBox, Point2};
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed line segment from `start` to `end`.
///
/// `normal` is an optional hint carried from the originating facet. It is
/// metadata only; no algorithm reads it and equality ignores it.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
    pub normal: Option<Point2>,
}

impl Segment {
    /// Create a new segment without a normal hint.
    #[inline]
    pub const fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            normal: None,
        }
    }

    /// Create a segment carrying a facet normal hint.
    #[inline]
    pub const fn with_normal(start: Point2, end: Point2, normal: Point2) -> Self {
        Self {
            start,
            end,
            normal: Some(normal),
        }
    }

    /// Create a segment from coordinates.
    #[inline]
    pub const fn from_coords(ax: CoordF, ay: CoordF, bx: CoordF, by: CoordF) -> Self {
        Self::new(Point2::new(ax, ay), Point2::new(bx, by))
    }

    /// A new segment with start and end exchanged. The normal hint is kept.
    #[inline]
    pub fn swapped(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            normal: self.normal,
        }
    }

    /// Direction vector (`end - start`).
    #[inline]
    pub fn direction(&self) -> Point2 {
        subtract(self.end, self.start)
    }

    /// Euclidean length.
    #[inline]
    pub fn length(&self) -> CoordF {
        self.start.distance(&self.end)
    }

    /// Whether start and end coincide within tolerance.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Whether the segment straddles the vertical line `x = v`.
    ///
    /// Half-open: the endpoint with the larger X may lie on the line, the
    /// smaller may not. A vertex shared by two segments of a closed contour is
    /// therefore counted exactly once, and a segment lying along the line is
    /// never counted.
    #[inline]
    pub fn crosses_x(&self, v: CoordF) -> bool {
        straddles(self.start.x, self.end.x, v)
    }

    /// Whether the segment straddles the horizontal line `y = v`.
    ///
    /// Same half-open rule as [`Segment::crosses_x`].
    #[inline]
    pub fn crosses_y(&self, v: CoordF) -> bool {
        straddles(self.start.y, self.end.y, v)
    }

    /// Point where the segment's supporting line meets `x = v`.
    ///
    /// A vertical segment has no unique crossing; its start Y is used.
    pub fn intersect_x(&self, v: CoordF) -> Point2 {
        let dx = self.end.x - self.start.x;
        if dx == 0.0 {
            return Point2::new(v, self.start.y);
        }
        let t = (v - self.start.x) / dx;
        Point2::new(v, self.start.y + t * (self.end.y - self.start.y))
    }

    /// Point where the segment's supporting line meets `y = v`.
    pub fn intersect_y(&self, v: CoordF) -> Point2 {
        let dy = self.end.y - self.start.y;
        if dy == 0.0 {
            return Point2::new(self.start.x, v);
        }
        let t = (v - self.start.y) / dy;
        Point2::new(self.start.x + t * (self.end.x - self.start.x), v)
    }

    /// Check if two segments properly cross each other.
    ///
    /// Touching at an endpoint or overlapping collinearly is not a crossing.
    pub fn intersects(&self, other: &Segment) -> bool {
        let d = other.direction();
        let side_start = cross2d(subtract(self.start, other.start), d);
        let side_end = cross2d(subtract(self.end, other.start), d);
        if side_start * side_end >= 0.0 {
            return false;
        }

        let dir = self.direction();
        let side_a = cross2d(subtract(other.start, self.start), dir);
        let side_b = cross2d(subtract(other.end, self.start), dir);
        side_a * side_b < 0.0
    }

    /// Intersection point of two segments, if they properly cross.
    pub fn intersection(&self, other: &Segment) -> Option<Point2> {
        if !self.intersects(other) {
            return None;
        }

        let d1 = self.direction();
        let d2 = other.direction();
        let denom = cross2d(d1, d2);
        let t = cross2d(subtract(other.start, self.start), d2) / denom;
        Some(Point2::new(
            self.start.x + t * d1.x,
            self.start.y + t * d1.y,
        ))
    }

    /// Bounding box of both endpoints.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points([&self.start, &self.end])
    }
}

impl PartialEq for Segment {
    /// Direction-sensitive: a segment and its swap are not equal.
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment({:?} -> {:?})", self.start, self.end)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl From<(Point2, Point2)> for Segment {
    #[inline]
    fn from((start, end): (Point2, Point2)) -> Self {
        Self::new(start, end)
    }
}

#[inline]
fn straddles(a: CoordF, b: CoordF, v: CoordF) -> bool {
    (a < v && b >= v) || (b < v && a >= v)
}

/// Type alias for a collection of segments.
pub type Segments = Vec<Segment>;
