use crate::primitives::{Line, Segment};
use crate::vector::Vector;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegmentDistance<const N: usize> {
    pub distance: f64,
    pub sqr_distance: f64,
    /// `[line parameter, segment parameter in [0, 1]]`.
    pub parameter: [f64; 2],
    /// `[closest line point, closest segment point]`.
    pub closest: [Vector<N>; 2],
}

/// Closest pair between a line and a segment.
///
/// The line direction need not be unit length but must be nonzero. When the two are
/// parallel the segment endpoint `p0` is reported.
pub fn distance<const N: usize>(line: &Line<N>, segment: &Segment<N>) -> LineSegmentDistance<N> {
    let seg_direction = segment.direction();
    let diff = line.origin - segment.p0;
    let a00 = line.direction.squared_length();
    let a01 = -line.direction.dot(seg_direction);
    let a11 = seg_direction.squared_length();
    let b0 = line.direction.dot(diff);
    let det = (a00 * a11 - a01 * a01).max(0.0);

    let (s0, s1) = if det > 0.0 {
        let b1 = -seg_direction.dot(diff);
        let s1 = a01 * b0 - a00 * b1;
        if s1 >= 0.0 {
            if s1 <= det {
                ((a01 * b1 - a11 * b0) / det, s1 / det)
            } else {
                (-(a01 + b0) / a00, 1.0)
            }
        } else {
            (-b0 / a00, 0.0)
        }
    } else {
        (-b0 / a00, 0.0)
    };

    let closest = [line.point_at(s0), segment.p0 + seg_direction * s1];
    let sqr_distance = (closest[0] - closest[1]).squared_length();
    LineSegmentDistance {
        distance: sqr_distance.sqrt(),
        sqr_distance,
        parameter: [s0, s1],
        closest,
    }
}
