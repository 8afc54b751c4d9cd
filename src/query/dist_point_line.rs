use crate::primitives::Line;
use crate::vector::Vector;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLineDistance<const N: usize> {
    pub distance: f64,
    pub sqr_distance: f64,
    pub parameter: f64,
    /// `[point, closest line point]`.
    pub closest: [Vector<N>; 2],
}

/// Projection of `point` onto `line`. The line direction must be unit length.
pub fn distance<const N: usize>(point: Vector<N>, line: &Line<N>) -> PointLineDistance<N> {
    let parameter = line.direction.dot(point - line.origin);
    let closest = line.point_at(parameter);
    let sqr_distance = (point - closest).squared_length();
    PointLineDistance {
        distance: sqr_distance.sqrt(),
        sqr_distance,
        parameter,
        closest: [point, closest],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;

    #[test]
    fn test_projection_behind_origin() {
        let line = Line::new(Vector3::ZERO, Vector3::unit(0));
        let r = distance(Vector3::xyz(-3.0, 4.0, 0.0), &line);
        assert_eq!(r.parameter, -3.0);
        assert_eq!(r.distance, 4.0);
        assert_eq!(r.closest[1], Vector3::xyz(-3.0, 0.0, 0.0));
    }
}
