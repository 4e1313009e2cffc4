//! Closed contour type.
//!
//! A [`Contour`] is one cross-section boundary at a layer height: an ordered
//! loop of directed segments where each segment ends where the next one
//! starts and the last one ends where the first one starts.
//!
//! Area and centroid are computed lazily and cached in [`OnceCell`]s, so a
//! contour whose area is exactly zero is never mistaken for an uncomputed one.

use super::{BoundingBox, Point2, Segment};
use crate::{CoordF, Error, Result, AREA_EPSILON};
use std::cell::OnceCell;
use std::fmt;

/// A closed, directed polygonal loop.
#[derive(Clone)]
pub struct Contour {
    segments: Vec<Segment>,
    synthetic_segments: usize,
    swapped_segments: usize,
    area: OnceCell<CoordF>,
    centroid: OnceCell<Option<Point2>>,
}

impl Contour {
    /// Build a contour from segments that already form a closed loop.
    ///
    /// Fails with [`Error::OpenContour`] when the list is empty, when two
    /// consecutive segments do not connect, or when the last segment does not
    /// return to the start of the first.
    pub fn new(segments: Vec<Segment>) -> Result<Self> {
        Self::with_bookkeeping(segments, 0, 0)
    }

    /// Build a contour and record how many of its segments were synthesized
    /// to force closure and how many were reversed while stitching.
    pub fn with_bookkeeping(
        segments: Vec<Segment>,
        synthetic_segments: usize,
        swapped_segments: usize,
    ) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::OpenContour("contour has no segments".into()));
        }

        for (i, pair) in segments.windows(2).enumerate() {
            if pair[0].end != pair[1].start {
                return Err(Error::OpenContour(format!(
                    "segment {} ends at {} but segment {} starts at {}",
                    i,
                    pair[0].end,
                    i + 1,
                    pair[1].start
                )));
            }
        }

        let first = segments[0].start;
        let last = segments[segments.len() - 1].end;
        if first != last {
            return Err(Error::OpenContour(format!(
                "loop ends at {} instead of {}",
                last, first
            )));
        }

        Ok(Self {
            segments,
            synthetic_segments,
            swapped_segments,
            area: OnceCell::new(),
            centroid: OnceCell::new(),
        })
    }

    /// Build a closed contour from a vertex ring (the closing edge is implied).
    pub fn from_points(points: &[Point2]) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::OpenContour(format!(
                "{} point(s) cannot form a loop",
                points.len()
            )));
        }
        let segments = (0..points.len())
            .map(|i| Segment::new(points[i], points[(i + 1) % points.len()]))
            .collect();
        Self::new(segments)
    }

    /// The wall segments, in traversal order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consume the contour and return its segments.
    #[inline]
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments appended by the reconstructor to close an open chain.
    #[inline]
    pub fn synthetic_segments(&self) -> usize {
        self.synthetic_segments
    }

    /// Segments reversed by the reconstructor to keep the chain continuous.
    #[inline]
    pub fn swapped_segments(&self) -> usize {
        self.swapped_segments
    }

    /// Segment start points, one per vertex of the loop.
    pub fn points(&self) -> Vec<Point2> {
        self.segments.iter().map(|s| s.start).collect()
    }

    /// First vertex of the loop.
    #[inline]
    pub fn start_point(&self) -> Point2 {
        self.segments[0].start
    }

    /// Whether the loop closes within tolerance. Holds for every constructed contour.
    pub fn is_closed(&self) -> bool {
        let connected = self
            .segments
            .windows(2)
            .all(|pair| pair[0].end == pair[1].start);
        connected && self.segments[self.segments.len() - 1].end == self.segments[0].start
    }

    /// Total length of all wall segments.
    pub fn perimeter(&self) -> CoordF {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Bounding box of all segment endpoints.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for seg in &self.segments {
            bb.merge_point(seg.start);
            bb.merge_point(seg.end);
        }
        bb
    }

    /// Signed area (shoelace), positive for counter-clockwise winding.
    ///
    /// Computed on first call and cached.
    pub fn area(&self) -> CoordF {
        *self.area.get_or_init(|| self.compute_area())
    }

    /// Area-weighted centroid.
    ///
    /// Fails with [`Error::DegenerateGeometry`] when the area is (nearly)
    /// zero. The outcome, success or failure, is computed once.
    pub fn centroid(&self) -> Result<Point2> {
        let centroid = self.centroid.get_or_init(|| self.compute_centroid());
        centroid.ok_or_else(|| {
            Error::DegenerateGeometry(format!(
                "centroid of a contour with area {:e} is undefined",
                self.area()
            ))
        })
    }

    /// A copy with segment order and every segment's direction reversed.
    ///
    /// The reversed contour has the negated signed area.
    pub fn reversed(&self) -> Self {
        let segments = self.segments.iter().rev().map(Segment::swapped).collect();
        Self {
            segments,
            synthetic_segments: self.synthetic_segments,
            swapped_segments: self.swapped_segments,
            area: OnceCell::new(),
            centroid: OnceCell::new(),
        }
    }

    /// The shoelace sum uses each segment's own endpoints and the gap to the
    /// next segment's start; on a closed contour the gap term vanishes.
    fn compute_area(&self) -> CoordF {
        let mut twice_area = 0.0;
        for (seg, next) in self.segment_pairs() {
            let (p, q, n) = (seg.start, seg.end, next.start);
            twice_area += p.x * q.y - q.x * p.y;
            twice_area += q.x * n.y - n.x * q.y;
        }
        twice_area / 2.0
    }

    fn compute_centroid(&self) -> Option<Point2> {
        let area = self.area();
        if area.abs() < AREA_EPSILON {
            return None;
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for (seg, next) in self.segment_pairs() {
            let (p, q, n) = (seg.start, seg.end, next.start);

            let along = p.x * q.y - q.x * p.y;
            cx += (p.x + q.x) * along;
            cy += (p.y + q.y) * along;

            let gap = q.x * n.y - n.x * q.y;
            cx += (q.x + n.x) * gap;
            cy += (q.y + n.y) * gap;
        }

        Some(Point2::new(cx / (6.0 * area), cy / (6.0 * area)))
    }

    fn segment_pairs(&self) -> impl Iterator<Item = (&Segment, &Segment)> {
        let n = self.segments.len();
        (0..n).map(move |i| (&self.segments[i], &self.segments[(i + 1) % n]))
    }
}

impl PartialEq for Contour {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl fmt::Debug for Contour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contour")
            .field("segments", &self.segments)
            .field("synthetic_segments", &self.synthetic_segments)
            .field("swapped_segments", &self.swapped_segments)
            .finish()
    }
}

/// Type alias for a collection of contours.
pub type Contours = Vec<Contour>;

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: CoordF) -> Contour {
        Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ])
        .unwrap()
    }

    #[test]
    fn test_square_area_and_centroid() {
        let contour = square(10.0);
        assert_eq!(contour.len(), 4);
        assert!((contour.area() - 100.0).abs() < 1e-9);
        let c = contour.centroid().unwrap();
        assert!((c.x - 5.0).abs() < 1e-9);
        assert!((c.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_reversed_negates_area() {
        let contour = square(10.0);
        let reversed = contour.reversed();
        assert!(reversed.is_closed());
        assert!((reversed.area() + contour.area()).abs() < 1e-9);

        let c1 = contour.centroid().unwrap();
        let c2 = reversed.centroid().unwrap();
        assert_eq!(c1, c2);
    }

    #[test]
    fn test_triangle_centroid() {
        let tri = Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(6.0, 0.0),
            Point2::new(0.0, 3.0),
        ])
        .unwrap();
        assert!((tri.area() - 9.0).abs() < 1e-9);
        let c = tri.centroid().unwrap();
        assert!((c.x - 2.0).abs() < 1e-9);
        assert!((c.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_centroid() {
        let flat = Contour::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        ])
        .unwrap();
        assert_eq!(flat.area(), 0.0);
        assert!(matches!(
            flat.centroid(),
            Err(Error::DegenerateGeometry(_))
        ));
        // Cached failure is reported again, not recomputed into something else
        assert!(flat.centroid().is_err());
    }

    #[test]
    fn test_open_segments_rejected() {
        let open = vec![
            Segment::from_coords(0.0, 0.0, 1.0, 0.0),
            Segment::from_coords(1.0, 0.0, 1.0, 1.0),
        ];
        assert!(matches!(Contour::new(open), Err(Error::OpenContour(_))));

        let gap = vec![
            Segment::from_coords(0.0, 0.0, 1.0, 0.0),
            Segment::from_coords(2.0, 0.0, 0.0, 0.0),
        ];
        assert!(Contour::new(gap).is_err());

        assert!(Contour::new(Vec::new()).is_err());
    }

    #[test]
    fn test_tolerant_closure() {
        let segments = vec![
            Segment::from_coords(0.0, 0.0, 1.0, 0.0),
            Segment::from_coords(1.0 + 1e-7, 0.0, 0.0, 1.0),
            Segment::from_coords(0.0, 1.0 - 1e-7, 0.0, 0.0),
        ];
        let contour = Contour::new(segments).unwrap();
        assert!(contour.is_closed());
        assert!((contour.area() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_perimeter_and_bounds() {
        let contour = square(4.0);
        assert!((contour.perimeter() - 16.0).abs() < 1e-12);
        let bb = contour.bounding_box();
        assert_eq!(bb.min, Point2::new(0.0, 0.0));
        assert_eq!(bb.max, Point2::new(4.0, 4.0));
    }

    #[test]
    fn test_centroid_inside_bbox_for_convex() {
        let hexagon = Contour::from_points(&[
            Point2::new(2.0, 0.0),
            Point2::new(6.0, 0.5),
            Point2::new(8.0, 4.0),
            Point2::new(6.0, 8.0),
            Point2::new(2.0, 7.5),
            Point2::new(0.0, 4.0),
        ])
        .unwrap();
        let c = hexagon.centroid().unwrap();
        assert!(hexagon.bounding_box().contains(&c));
    }
}
