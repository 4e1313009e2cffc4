//! Contour reconstruction.
//!
//! Stitches the unordered segments of one layer into closed [`Contour`]s by
//! greedy endpoint chaining:
//!
//! 1. The first remaining segment seeds a chain.
//! 2. The working set is scanned from the front for a segment whose start
//!    (appended as-is) or end (appended swapped) coincides with the chain's
//!    tail. The first match wins; the scan restarts from the front after each
//!    append.
//! 3. When nothing continues the chain, it is closed with a synthetic
//!    segment from tail to head if the two differ, and emitted.
//!
//! Removal from the working set preserves order, so results depend only on
//! the input order. Contours come out in discovery order with no nesting or
//! orientation fix-up.

use crate::geometry::{Contour, Point2, Segment};
use crate::Result;
use log::{debug, warn};

/// Counters collected while stitching one layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StitchStats {
    /// Segments handed to the reconstructor.
    pub input_segments: usize,
    /// Closing segments added to chains that did not return to their start.
    pub synthetic_segments: usize,
    /// Segments reversed to continue a chain.
    pub swapped_segments: usize,
    /// Steps where more than one segment could have continued the chain.
    pub ambiguous_stitches: usize,
}

impl StitchStats {
    /// Accumulate another layer's counters.
    pub fn merge(&mut self, other: &StitchStats) {
        self.input_segments += other.input_segments;
        self.synthetic_segments += other.synthetic_segments;
        self.swapped_segments += other.swapped_segments;
        self.ambiguous_stitches += other.ambiguous_stitches;
    }
}

/// Output of [`reconstruct_contours`].
#[derive(Debug, Default)]
pub struct StitchResult {
    /// Closed contours in discovery order.
    pub contours: Vec<Contour>,
    /// Bookkeeping for the run.
    pub stats: StitchStats,
}

impl StitchResult {
    /// Total number of segments across all contours.
    ///
    /// Always `stats.input_segments + stats.synthetic_segments`.
    pub fn segment_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }
}

/// How a candidate segment attaches to the chain tail.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Attach {
    Forward,
    Reversed,
}

/// Stitch unordered segments into closed contours.
///
/// Never fails on well-formed input: every chain is closed before it is
/// turned into a [`Contour`]. An empty input yields no contours.
pub fn reconstruct_contours(segments: Vec<Segment>) -> Result<StitchResult> {
    let mut stats = StitchStats {
        input_segments: segments.len(),
        ..Default::default()
    };
    let mut working = segments;
    let mut contours = Vec::new();

    while !working.is_empty() {
        let seed = working.remove(0);
        let head = seed.start;
        let mut tail = seed.end;
        let mut chain = vec![seed];
        let mut swapped = 0;

        while let Some((index, attach, candidates)) = find_continuation(&working, tail) {
            if candidates > 1 {
                stats.ambiguous_stitches += 1;
                warn!(
                    "Ambiguous stitch at {}: {} candidates, taking the first",
                    tail, candidates
                );
            }

            let next = working.remove(index);
            let next = match attach {
                Attach::Forward => next,
                Attach::Reversed => {
                    swapped += 1;
                    next.swapped()
                }
            };
            tail = next.end;
            chain.push(next);
        }

        let mut synthetic = 0;
        if tail != head {
            debug!("Closing open chain from {} back to {}", tail, head);
            chain.push(Segment::new(tail, head));
            synthetic = 1;
        }

        stats.synthetic_segments += synthetic;
        stats.swapped_segments += swapped;
        contours.push(Contour::with_bookkeeping(chain, synthetic, swapped)?);
    }

    Ok(StitchResult { contours, stats })
}

/// First segment in working-set order that continues from `tail`, plus the
/// number of segments that could have.
fn find_continuation(working: &[Segment], tail: Point2) -> Option<(usize, Attach, usize)> {
    let mut first = None;
    let mut candidates = 0;

    for (i, seg) in working.iter().enumerate() {
        let attach = if seg.start == tail {
            Attach::Forward
        } else if seg.end == tail {
            Attach::Reversed
        } else {
            continue;
        };
        candidates += 1;
        if first.is_none() {
            first = Some((i, attach));
        }
    }

    first.map(|(i, attach)| (i, attach, candidates))
}
