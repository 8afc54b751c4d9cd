use crate::primitives::Segment;
use crate::vector::Vector;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSegmentDistance<const N: usize> {
    pub distance: f64,
    pub sqr_distance: f64,
    /// Segment parameter of the closest point, in `[0, 1]`.
    pub parameter: f64,
    /// `[point, closest segment point]`.
    pub closest: [Vector<N>; 2],
}

/// Closest point on `segment` to `point`.
///
/// A zero-length segment yields `p0` with parameter 0.
pub fn distance<const N: usize>(point: Vector<N>, segment: &Segment<N>) -> PointSegmentDistance<N> {
    let direction = segment.direction();
    let sqr_length = direction.squared_length();

    let (parameter, closest) = if sqr_length == 0.0 {
        (0.0, segment.p0)
    } else if direction.dot(point - segment.p1) >= 0.0 {
        (1.0, segment.p1)
    } else {
        let t = direction.dot(point - segment.p0);
        if t <= 0.0 {
            (0.0, segment.p0)
        } else {
            let t = t / sqr_length;
            (t, segment.p0 + direction * t)
        }
    };

    let sqr_distance = (point - closest).squared_length();
    PointSegmentDistance {
        distance: sqr_distance.sqrt(),
        sqr_distance,
        parameter,
        closest: [point, closest],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector2;

    fn segment() -> Segment<2> {
        Segment::new(Vector2::xy(0.0, 0.0), Vector2::xy(4.0, 0.0))
    }

    #[test]
    fn test_interior_projection() {
        let r = distance(Vector2::xy(1.0, 3.0), &segment());
        assert_eq!(r.parameter, 0.25);
        assert_eq!(r.closest[1], Vector2::xy(1.0, 0.0));
        assert_eq!(r.distance, 3.0);
    }

    #[test]
    fn test_endpoint_clamping() {
        let before = distance(Vector2::xy(-2.0, 0.0), &segment());
        assert_eq!(before.parameter, 0.0);
        assert_eq!(before.sqr_distance, 4.0);

        let after = distance(Vector2::xy(7.0, 4.0), &segment());
        assert_eq!(after.parameter, 1.0);
        assert_eq!(after.distance, 5.0);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Vector2::xy(1.0, 1.0);
        let r = distance(Vector2::xy(2.0, 1.0), &Segment::new(p, p));
        assert_eq!(r.parameter, 0.0);
        assert_eq!(r.closest[1], p);
        assert_eq!(r.distance, 1.0);
    }
}
