//! Triangle mesh model.
//!
//! A [`Model`] is a named triangle soup: an ordered list of [`Facet`]s, each
//! with three vertices and a face normal. The model is read-only while layers
//! are being sliced; translation and rotation mutate it in place beforehand.

mod stl;

pub use stl::{load_stl, parse_stl, save_stl};

use crate::geometry::{BoundingBox3, Point3};
use crate::{CoordF, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A triangular face of the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    /// Face normal as supplied by the mesh source (not necessarily unit length).
    pub normal: Point3,
    /// The three corner vertices.
    pub vertices: [Point3; 3],
}

impl Facet {
    /// Create a facet from a normal and three vertices.
    #[inline]
    pub const fn new(normal: Point3, vertices: [Point3; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Create a facet from three vertices, computing the normal from winding.
    pub fn from_triangle(v0: Point3, v1: Point3, v2: Point3) -> Self {
        let normal = v1.sub(&v0).cross(&v2.sub(&v0)).normalize();
        Self::new(normal, [v0, v1, v2])
    }

    /// Create a facet from a raw vertex list.
    ///
    /// Four entries are read as `[normal, v0, v1, v2]` (the normal is the
    /// auxiliary "vertex 0" of the STL record layout); three entries are the
    /// corners and the normal is computed. Anything shorter is a precondition
    /// violation.
    pub fn from_vertices(vertices: &[Point3]) -> Result<Self> {
        match vertices {
            [normal, v0, v1, v2, ..] => Ok(Self::new(*normal, [*v0, *v1, *v2])),
            [v0, v1, v2] => Ok(Self::from_triangle(*v0, *v1, *v2)),
            _ => Err(Error::PreconditionViolation(format!(
                "facet needs at least 3 vertices, got {}",
                vertices.len()
            ))),
        }
    }

    /// Lowest vertex Z.
    #[inline]
    pub fn min_z(&self) -> CoordF {
        self.vertices[0]
            .z
            .min(self.vertices[1].z)
            .min(self.vertices[2].z)
    }

    /// Highest vertex Z.
    #[inline]
    pub fn max_z(&self) -> CoordF {
        self.vertices[0]
            .z
            .max(self.vertices[1].z)
            .max(self.vertices[2].z)
    }

    /// The three edges `(v0, v1)`, `(v1, v2)`, `(v2, v0)`.
    #[inline]
    pub fn edges(&self) -> [(Point3, Point3); 3] {
        let [v0, v1, v2] = self.vertices;
        [(v0, v1), (v1, v2), (v2, v0)]
    }

    fn is_finite(&self) -> bool {
        self.normal.is_finite() && self.vertices.iter().all(Point3::is_finite)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Facet with V1: {} V2: {} V3: {}",
            self.vertices[0], self.vertices[1], self.vertices[2]
        )
    }
}

/// A coordinate axis, used for rotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A named triangle mesh.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Model {
    name: String,
    facets: Vec<Facet>,
}

impl Model {
    /// Create a model from facets.
    pub fn new(name: impl Into<String>, facets: Vec<Facet>) -> Self {
        Self {
            name: name.into(),
            facets,
        }
    }

    /// Display name of the model.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The facets, in source order.
    #[inline]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Number of facets.
    #[inline]
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Whether the model has no facets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Bounding box of every vertex.
    pub fn bounding_box(&self) -> BoundingBox3 {
        let mut bb = BoundingBox3::empty();
        for facet in &self.facets {
            for v in &facet.vertices {
                bb.merge_point(v);
            }
        }
        bb
    }

    /// Add `offset` to every vertex of every facet.
    pub fn translate(&mut self, offset: Point3) {
        for facet in &mut self.facets {
            for v in &mut facet.vertices {
                v.translate(offset);
            }
        }
    }

    /// Rotate every vertex and normal about `axis` through the origin.
    ///
    /// Positive angles follow the right-hand rule.
    pub fn rotate(&mut self, axis: Axis, angle_degrees: CoordF) {
        let angle = angle_degrees.to_radians();
        let rotate = |p: &mut Point3| match axis {
            Axis::X => p.rotate_x(angle),
            Axis::Y => p.rotate_y(angle),
            Axis::Z => p.rotate_z(angle),
        };
        for facet in &mut self.facets {
            rotate(&mut facet.normal);
            for v in &mut facet.vertices {
                rotate(v);
            }
        }
    }

    /// Translate so the lowest vertex sits at Z = 0.
    pub fn drop_to_bed(&mut self) {
        let bb = self.bounding_box();
        if !bb.is_empty() {
            self.translate(Point3::new(0.0, 0.0, -bb.min.z));
        }
    }

    /// Translate so the XY footprint is centred on `(x, y)`.
    pub fn center_on(&mut self, x: CoordF, y: CoordF) {
        let bb = self.bounding_box();
        if bb.is_empty() {
            return;
        }
        let cx = (bb.min.x + bb.max.x) / 2.0;
        let cy = (bb.min.y + bb.max.y) / 2.0;
        self.translate(Point3::new(x - cx, y - cy, 0.0));
    }

    /// Check the model is usable for slicing.
    ///
    /// This is not manifoldness validation; it only rejects inputs the
    /// slicer cannot work with at all.
    pub fn validate(&self) -> Result<()> {
        if self.facets.is_empty() {
            return Err(Error::Mesh(format!("model '{}' has no facets", self.name)));
        }
        if let Some(index) = self.facets.iter().position(|f| !f.is_finite()) {
            return Err(Error::PreconditionViolation(format!(
                "facet {} of '{}' has non-finite coordinates",
                index, self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Axis-aligned cube from (0,0,0) to (size,size,size), 12 facets.
    pub(crate) fn cube(size: CoordF) -> Model {
        let p = |x: CoordF, y: CoordF, z: CoordF| Point3::new(x * size, y * size, z * size);
        let quads = [
            // bottom, top
            [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
            [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
            // front, back
            [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
            [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
            // left, right
            [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
            [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
        ];
        let facets = quads
            .iter()
            .flat_map(|q| {
                [
                    Facet::from_triangle(q[0], q[1], q[2]),
                    Facet::from_triangle(q[0], q[2], q[3]),
                ]
            })
            .collect();
        Model::new("cube", facets)
    }

    #[test]
    fn test_from_vertices() {
        let n = Point3::new(0.0, 0.0, 1.0);
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let with_normal = Facet::from_vertices(&[n, a, b, c]).unwrap();
        assert_eq!(with_normal.normal, n);
        assert_eq!(with_normal.vertices, [a, b, c]);

        let computed = Facet::from_vertices(&[a, b, c]).unwrap();
        assert_eq!(computed.normal, n);

        assert!(matches!(
            Facet::from_vertices(&[a, b]),
            Err(Error::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_cube_bounds() {
        let model = cube(10.0);
        assert_eq!(model.facet_count(), 12);
        let bb = model.bounding_box();
        assert_eq!(bb.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bb.max, Point3::new(10.0, 10.0, 10.0));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_translate() {
        let mut model = cube(10.0);
        model.translate(Point3::new(5.0, -5.0, 2.0));
        let bb = model.bounding_box();
        assert_eq!(bb.min, Point3::new(5.0, -5.0, 2.0));
        assert_eq!(bb.max, Point3::new(15.0, 5.0, 12.0));
    }

    #[test]
    fn test_rotate_about_z() {
        let mut model = Model::new(
            "tri",
            vec![Facet::new(
                Point3::new(1.0, 0.0, 0.0),
                [
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(0.0, 0.0, 1.0),
                    Point3::new(0.0, 0.0, 2.0),
                ],
            )],
        );
        model.rotate(Axis::Z, 90.0);
        let facet = model.facets()[0];
        assert!(facet.vertices[0].x.abs() < 1e-12);
        assert!((facet.vertices[0].y - 1.0).abs() < 1e-12);
        assert!((facet.normal.y - 1.0).abs() < 1e-12);
        assert_eq!(facet.vertices[2].z, 2.0);
    }

    #[test]
    fn test_rotate_about_x_changes_height() {
        let mut model = cube(10.0);
        model.rotate(Axis::X, 90.0);
        let bb = model.bounding_box();
        assert!((bb.min.z - 0.0).abs() < 1e-9);
        assert!((bb.max.z - 10.0).abs() < 1e-9);
        assert!((bb.min.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_drop_to_bed_and_center() {
        let mut model = cube(10.0);
        model.translate(Point3::new(0.0, 0.0, 7.5));
        model.drop_to_bed();
        model.center_on(100.0, 100.0);
        let bb = model.bounding_box();
        assert_eq!(bb.min, Point3::new(95.0, 95.0, 0.0));
        assert_eq!(bb.max, Point3::new(105.0, 105.0, 10.0));
    }

    #[test]
    fn test_validate_rejects_bad_models() {
        let empty = Model::new("empty", Vec::new());
        assert!(matches!(empty.validate(), Err(Error::Mesh(_))));

        let nan = Model::new(
            "nan",
            vec![Facet::from_triangle(
                Point3::new(CoordF::NAN, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            )],
        );
        assert!(matches!(
            nan.validate(),
            Err(Error::PreconditionViolation(_))
        ));
    }
}
