//! Axis-aligned bounding boxes.

use super::{Point2, Point3};
use crate::CoordF;
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    #[inline]
    pub const fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// An empty box that any merged point will replace.
    pub fn empty() -> Self {
        Self {
            min: Point2::new(CoordF::INFINITY, CoordF::INFINITY),
            max: Point2::new(CoordF::NEG_INFINITY, CoordF::NEG_INFINITY),
        }
    }

    /// Bounding box of a set of points. Empty input yields [`BoundingBox::empty`].
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut bb = Self::empty();
        for p in points {
            bb.merge_point(*p);
        }
        bb
    }

    /// Grow the box to contain `p`.
    #[inline]
    pub fn merge_point(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Whether nothing has been merged yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Width along X.
    #[inline]
    pub fn width(&self) -> CoordF {
        self.max.x - self.min.x
    }

    /// Height along Y.
    #[inline]
    pub fn height(&self) -> CoordF {
        self.max.y - self.min.y
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Intersection of two boxes; empty when they do not overlap.
    pub fn intersection(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point2::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point2::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// A 3D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox3 {
    /// An empty box.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(CoordF::INFINITY, CoordF::INFINITY, CoordF::INFINITY),
            max: Point3::new(
                CoordF::NEG_INFINITY,
                CoordF::NEG_INFINITY,
                CoordF::NEG_INFINITY,
            ),
        }
    }

    /// Grow the box to contain `p`.
    #[inline]
    pub fn merge_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Whether nothing has been merged yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Size along each axis.
    pub fn size(&self) -> Point3 {
        self.max.sub(&self.min)
    }

    /// Footprint on the XY plane.
    pub fn to_2d(&self) -> BoundingBox {
        BoundingBox::new(self.min.to_point2(), self.max.to_point2())
    }
}

impl Default for BoundingBox3 {
    fn default() -> Self {
        Self::empty()
    }
}
