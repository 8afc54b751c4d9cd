use crate::primitives::{AlignedBox, Line, Ray, Segment};
use crate::vector::Vector;

/// Intersection of a linear component with a solid axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearBoxIntersection<const N: usize> {
    pub intersect: bool,
    /// 0, 1 (touching) or 2 (entry and exit).
    pub num_points: usize,
    /// Parameters of the clipped interval, valid for the first `num_points` entries.
    pub parameter: [f64; 2],
    pub point: [Vector<N>; 2],
}

impl<const N: usize> Default for LinearBoxIntersection<N> {
    fn default() -> Self {
        Self {
            intersect: false,
            num_points: 0,
            parameter: [0.0; 2],
            point: [Vector::ZERO; 2],
        }
    }
}

/// Liang-Barsky clip of `[t0, t1]` against the half-line `denom * t >= numer`.
///
/// Returns `false` when the interval is clipped away entirely.
fn clip(denom: f64, numer: f64, t0: &mut f64, t1: &mut f64) -> bool {
    if denom > 0.0 {
        if numer > denom * *t1 {
            return false;
        }
        if numer > denom * *t0 {
            *t0 = numer / denom;
        }
        true
    } else if denom < 0.0 {
        if numer > denom * *t0 {
            return false;
        }
        if numer > denom * *t1 {
            *t1 = numer / denom;
        }
        true
    } else {
        numer <= 0.0
    }
}

/// Clips `origin + t * direction` for `t` in `[t_min, t_max]` against the box.
///
/// Infinite interval ends are allowed. The direction need not be unit length.
pub fn find_interval<const N: usize>(
    origin: Vector<N>,
    direction: Vector<N>,
    t_min: f64,
    t_max: f64,
    aligned_box: &AlignedBox<N>,
) -> LinearBoxIntersection<N> {
    let center = aligned_box.center();
    let extent = aligned_box.extent();
    let local = origin - center;

    let mut t0 = t_min;
    let mut t1 = t_max;
    let mut not_all_clipped = t0 <= t1;
    for i in 0..N {
        if !not_all_clipped {
            break;
        }
        not_all_clipped = clip(direction[i], -local[i] - extent[i], &mut t0, &mut t1)
            && clip(-direction[i], local[i] - extent[i], &mut t0, &mut t1);
    }

    let mut result = LinearBoxIntersection::default();
    if not_all_clipped {
        result.intersect = true;
        if t1 > t0 {
            result.num_points = 2;
            result.parameter = [t0, t1];
        } else {
            result.num_points = 1;
            result.parameter = [t0, t0];
        }
        result.point = [origin + direction * result.parameter[0], origin + direction * result.parameter[1]];
    }
    result
}

pub fn test_interval<const N: usize>(
    origin: Vector<N>,
    direction: Vector<N>,
    t_min: f64,
    t_max: f64,
    aligned_box: &AlignedBox<N>,
) -> bool {
    find_interval(origin, direction, t_min, t_max, aligned_box).intersect
}

pub fn find_line<const N: usize>(line: &Line<N>, aligned_box: &AlignedBox<N>) -> LinearBoxIntersection<N> {
    find_interval(line.origin, line.direction, f64::NEG_INFINITY, f64::INFINITY, aligned_box)
}

pub fn find_ray<const N: usize>(ray: &Ray<N>, aligned_box: &AlignedBox<N>) -> LinearBoxIntersection<N> {
    find_interval(ray.origin, ray.direction, 0.0, f64::INFINITY, aligned_box)
}

/// Segment parameters are relative to `p0 + t * (p1 - p0)`.
pub fn find_segment<const N: usize>(segment: &Segment<N>, aligned_box: &AlignedBox<N>) -> LinearBoxIntersection<N> {
    find_interval(segment.p0, segment.direction(), 0.0, 1.0, aligned_box)
}
