//! Mesh-plane intersection.
//!
//! Cuts every facet with the horizontal plane `Z = z` and emits one directed
//! segment for each facet that straddles it. The segments come out in facet
//! order with no connectivity; stitching them into loops is the job of
//! [`super::reconstruct_contours`].
//!
//! The crossing test is strict on both sides. A vertex lying exactly on the
//! plane never produces an intersection point, so a facet touching the plane
//! with one vertex contributes nothing, and a facet with one vertex on the
//! plane and the other two on opposite sides has only one crossing edge and
//! is dropped as well. Layer planes are placed mid-layer, which keeps this
//! from mattering for ordinary models with vertices on layer boundaries.

use crate::geometry::{lerp, Point2, Point3, Segment};
use crate::mesh::Facet;
use crate::CoordF;

/// Intersect a set of facets with the plane `Z = z`.
///
/// A facet yields a segment only when exactly two of its edges cross. The
/// segment runs from the first crossing to the second, with edges taken in
/// `(v0, v1)`, `(v1, v2)`, `(v2, v0)` order, and carries the facet normal
/// projected onto XY as its hint.
pub fn intersect_facets(facets: &[Facet], z: CoordF) -> Vec<Segment> {
    facets
        .iter()
        .filter(|facet| facet.min_z() < z && facet.max_z() > z)
        .filter_map(|facet| intersect_facet(facet, z))
        .collect()
}

/// Intersect one facet with the plane `Z = z`.
pub fn intersect_facet(facet: &Facet, z: CoordF) -> Option<Segment> {
    let mut crossings = [Point2::zero(); 2];
    let mut count = 0;

    for (a, b) in facet.edges() {
        if let Some(p) = intersect_edge(a, b, z) {
            if count == 2 {
                return None;
            }
            crossings[count] = p;
            count += 1;
        }
    }

    if count != 2 {
        return None;
    }

    Some(Segment::with_normal(
        crossings[0],
        crossings[1],
        facet.normal.to_point2(),
    ))
}

/// Point where edge `(a, b)` strictly crosses `Z = z`, if it does.
///
/// `t = (z - b.z) / (a.z - b.z)` measured from `b` toward `a`.
#[inline]
fn intersect_edge(a: Point3, b: Point3, z: CoordF) -> Option<Point2> {
    let crosses = (a.z > z && b.z < z) || (a.z < z && b.z > z);
    if !crosses {
        return None;
    }
    let t = (z - b.z) / (a.z - b.z);
    Some(lerp(b.to_point2(), a.to_point2(), t))
}
