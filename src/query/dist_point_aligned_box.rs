use crate::primitives::AlignedBox;
use crate::vector::Vector;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointBoxDistance<const N: usize> {
    pub distance: f64,
    pub sqr_distance: f64,
    /// `[point, closest box point]`.
    pub closest: [Vector<N>; 2],
}

/// Closest point of a solid axis-aligned box to `point`, found by clamping each coordinate.
pub fn distance<const N: usize>(point: Vector<N>, aligned_box: &AlignedBox<N>) -> PointBoxDistance<N> {
    let mut closest = point;
    let mut sqr_distance = 0.0;
    for i in 0..N {
        if point[i] < aligned_box.min[i] {
            let delta = point[i] - aligned_box.min[i];
            sqr_distance += delta * delta;
            closest[i] = aligned_box.min[i];
        } else if point[i] > aligned_box.max[i] {
            let delta = point[i] - aligned_box.max[i];
            sqr_distance += delta * delta;
            closest[i] = aligned_box.max[i];
        }
    }
    PointBoxDistance {
        distance: f64::sqrt(sqr_distance),
        sqr_distance,
        closest: [point, closest],
    }
}
