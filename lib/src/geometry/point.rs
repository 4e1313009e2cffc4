//! Point types.
//!
//! [`Point2`] lives on the slicing plane and doubles as a 2D vector.
//! [`Point3`] is a mesh vertex (or face normal) in model space.

use crate::{CoordF, EPSILON};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the XY plane, in millimetres.
///
/// Equality is tolerance based: two points are equal when both coordinates
/// differ by less than [`EPSILON`]. This relation is not transitive, so
/// `Point2` deliberately does not implement `Eq` or `Hash`.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: CoordF,
    pub y: CoordF,
}

impl Point2 {
    /// Create a new point.
    #[inline]
    pub const fn new(x: CoordF, y: CoordF) -> Self {
        Self { x, y }
    }

    /// The origin.
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Check whether `other` lies within `tolerance` on both axes.
    #[inline]
    pub fn coincides_with(&self, other: &Point2, tolerance: CoordF) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }

    /// Euclidean length when used as a vector.
    #[inline]
    pub fn length(&self) -> CoordF {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2) -> CoordF {
        subtract(*other, *self).length()
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Format as `x,y` with four decimals (SVG point list format).
    pub fn to_pair(&self) -> String {
        format!("{:.4},{:.4}", self.x, self.y)
    }
}

impl PartialEq for Point2 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.coincides_with(other, EPSILON)
    }
}

impl fmt::Debug for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{:.4} Y{:.4}", self.x, self.y)
    }
}

impl From<(CoordF, CoordF)> for Point2 {
    #[inline]
    fn from((x, y): (CoordF, CoordF)) -> Self {
        Self { x, y }
    }
}

/// Vector sum `a + b`.
#[inline]
pub fn add(a: Point2, b: Point2) -> Point2 {
    Point2::new(a.x + b.x, a.y + b.y)
}

/// Vector from `b` to `a` (`a - b`).
#[inline]
pub fn subtract(a: Point2, b: Point2) -> Point2 {
    Point2::new(a.x - b.x, a.y - b.y)
}

/// Multiply a vector by a scalar.
#[inline]
pub fn scale(v: Point2, factor: CoordF) -> Point2 {
    Point2::new(v.x * factor, v.y * factor)
}

/// Z component of the cross product of two 2D vectors.
///
/// Positive when `b` is counter-clockwise from `a`.
#[inline]
pub fn cross2d(a: Point2, b: Point2) -> CoordF {
    a.x * b.y - a.y * b.x
}

/// Dot product of two 2D vectors.
#[inline]
pub fn dot(a: Point2, b: Point2) -> CoordF {
    a.x * b.x + a.y * b.y
}

/// A point or direction in model space.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: CoordF,
    pub y: CoordF,
    pub z: CoordF,
}

impl Point3 {
    /// Create a new 3D point.
    #[inline]
    pub const fn new(x: CoordF, y: CoordF, z: CoordF) -> Self {
        Self { x, y, z }
    }

    /// Project onto the XY plane by dropping Z.
    #[inline]
    pub fn to_point2(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Add `offset` to this point in place.
    #[inline]
    pub fn translate(&mut self, offset: Point3) {
        self.x += offset.x;
        self.y += offset.y;
        self.z += offset.z;
    }

    /// Rotate in place about the X axis by `angle` radians.
    pub fn rotate_x(&mut self, angle: CoordF) {
        let (sin, cos) = angle.sin_cos();
        let (y, z) = (self.y, self.z);
        self.y = y * cos - z * sin;
        self.z = y * sin + z * cos;
    }

    /// Rotate in place about the Y axis by `angle` radians.
    pub fn rotate_y(&mut self, angle: CoordF) {
        let (sin, cos) = angle.sin_cos();
        let (x, z) = (self.x, self.z);
        self.x = x * cos + z * sin;
        self.z = -x * sin + z * cos;
    }

    /// Rotate in place about the Z axis by `angle` radians.
    pub fn rotate_z(&mut self, angle: CoordF) {
        let (sin, cos) = angle.sin_cos();
        let (x, y) = (self.x, self.y);
        self.x = x * cos - y * sin;
        self.y = x * sin + y * cos;
    }

    /// Vector `self - other`.
    #[inline]
    pub fn sub(&self, other: &Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Cross product `self × other`.
    #[inline]
    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length.
    #[inline]
    pub fn length(&self) -> CoordF {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalize(&self) -> Point3 {
        let len = self.length();
        if len == 0.0 {
            return Point3::default();
        }
        Point3::new(self.x / len, self.y / len, self.z / len)
    }

    /// Whether all coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Debug for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_tolerance_equality() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(1.0 + 5e-6, 2.0 - 5e-6);
        let c = Point2::new(1.0 + 2e-5, 2.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_cross2d() {
        let x = Point2::new(1.0, 0.0);
        let y = Point2::new(0.0, 1.0);
        assert_eq!(cross2d(x, y), 1.0); // Counter-clockwise
        assert_eq!(cross2d(y, x), -1.0); // Clockwise
    }

    #[test]
    fn test_vector_functions() {
        let a = Point2::new(3.0, 4.0);
        let b = Point2::new(1.0, 1.0);
        assert_eq!(subtract(a, b), Point2::new(2.0, 3.0));
        assert_eq!(add(a, b), Point2::new(4.0, 5.0));
        assert_eq!(scale(a, 2.0), Point2::new(6.0, 8.0));
        assert!((a.length() - 5.0).abs() < 1e-12);
        assert!((dot(a, b) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_display() {
        let p = Point2::new(1.5, -2.25);
        assert_eq!(p.to_string(), "X1.5000 Y-2.2500");
        assert_eq!(p.to_pair(), "1.5000,-2.2500");
    }

    #[test]
    fn test_point3_rotate_z() {
        let mut p = Point3::new(1.0, 0.0, 0.0);
        p.rotate_z(FRAC_PI_2);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_point3_rotate_x_and_y() {
        let mut p = Point3::new(0.0, 1.0, 0.0);
        p.rotate_x(FRAC_PI_2);
        assert!((p.z - 1.0).abs() < 1e-12);

        let mut q = Point3::new(0.0, 0.0, 1.0);
        q.rotate_y(FRAC_PI_2);
        assert!((q.x - 1.0).abs() < 1e-12);
        assert!(q.z.abs() < 1e-12);
    }

    #[test]
    fn test_point3_cross_normalize() {
        let x = Point3::new(2.0, 0.0, 0.0);
        let y = Point3::new(0.0, 3.0, 0.0);
        let n = x.cross(&y).normalize();
        assert_eq!(n, Point3::new(0.0, 0.0, 1.0));
        assert_eq!(Point3::default().normalize(), Point3::default());
    }

    #[test]
    fn test_point3_translate_and_project() {
        let mut p = Point3::new(1.0, 2.0, 3.0);
        p.translate(Point3::new(-1.0, 1.0, 0.5));
        assert_eq!(p, Point3::new(0.0, 3.0, 3.5));
        assert_eq!(p.to_point2(), Point2::new(0.0, 3.0));
    }
}
