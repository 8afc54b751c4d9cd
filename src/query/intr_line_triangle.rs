use crate::primitives::{Line, Ray, Segment, Triangle};
use crate::vector::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineTriangleIntersection {
    pub intersect: bool,
    /// Parameter of the hit along the linear component.
    pub parameter: f64,
    pub triangle_bary: [f64; 3],
    pub point: Vector3,
}

impl Default for LineTriangleIntersection {
    fn default() -> Self {
        Self {
            intersect: false,
            parameter: 0.0,
            triangle_bary: [0.0; 3],
            point: Vector3::ZERO,
        }
    }
}

/// Scaled hit quantities: the hit parameter is `qdn / ddn` and the barycentric
/// coordinates of `v1`, `v2` are `b1 / ddn`, `b2 / ddn`, with `ddn > 0`.
struct Crossing {
    ddn: f64,
    qdn: f64,
    b1: f64,
    b2: f64,
}

/// Locates where the infinite line through `origin` along `direction` crosses the
/// triangle. Returns `None` when the line is parallel to the triangle plane or the
/// crossing lies outside the triangle.
fn crossing(origin: Vector3, direction: Vector3, triangle: &Triangle<3>) -> Option<Crossing> {
    let diff = origin - triangle.v[0];
    let edge1 = triangle.v[1] - triangle.v[0];
    let edge2 = triangle.v[2] - triangle.v[0];
    let normal = edge1.cross(edge2);

    // With D = direction, Q = diff, E1 = edge1, E2 = edge2, N = Cross(E1, E2) solve
    // Q + t*D = b1*E1 + b2*E2:
    //   |Dot(D,N)|*b1 = sign(Dot(D,N))*Dot(D,Cross(Q,E2))
    //   |Dot(D,N)|*b2 = sign(Dot(D,N))*Dot(D,Cross(E1,Q))
    //   |Dot(D,N)|*t  = -sign(Dot(D,N))*Dot(Q,N)
    let mut ddn = direction.dot(normal);
    let sign = if ddn > 0.0 {
        1.0
    } else if ddn < 0.0 {
        ddn = -ddn;
        -1.0
    } else {
        return None;
    };

    let b1 = sign * direction.dot_cross(diff, edge2);
    if b1 < 0.0 {
        return None;
    }
    let b2 = sign * direction.dot_cross(edge1, diff);
    if b2 < 0.0 || b1 + b2 > ddn {
        return None;
    }
    let qdn = -sign * diff.dot(normal);
    Some(Crossing { ddn, qdn, b1, b2 })
}

fn finish(origin: Vector3, direction: Vector3, c: Crossing) -> LineTriangleIntersection {
    let inv = 1.0 / c.ddn;
    let parameter = c.qdn * inv;
    let b1 = c.b1 * inv;
    let b2 = c.b2 * inv;
    LineTriangleIntersection {
        intersect: true,
        parameter,
        triangle_bary: [1.0 - b1 - b2, b1, b2],
        point: origin + direction * parameter,
    }
}

pub fn test(line: &Line<3>, triangle: &Triangle<3>) -> bool {
    crossing(line.origin, line.direction, triangle).is_some()
}

/// Intersection of a line with a triangle. Parallel lines, including lines in the
/// triangle plane, do not intersect.
pub fn find(line: &Line<3>, triangle: &Triangle<3>) -> LineTriangleIntersection {
    crossing(line.origin, line.direction, triangle)
        .map(|c| finish(line.origin, line.direction, c))
        .unwrap_or_default()
}

pub fn test_ray(ray: &Ray<3>, triangle: &Triangle<3>) -> bool {
    matches!(crossing(ray.origin, ray.direction, triangle), Some(c) if c.qdn >= 0.0)
}

pub fn find_ray(ray: &Ray<3>, triangle: &Triangle<3>) -> LineTriangleIntersection {
    match crossing(ray.origin, ray.direction, triangle) {
        Some(c) if c.qdn >= 0.0 => finish(ray.origin, ray.direction, c),
        _ => LineTriangleIntersection::default(),
    }
}

/// Segment parameters are relative to `p0 + t * (p1 - p0)`, `t` in `[0, 1]`.
pub fn test_segment(segment: &Segment<3>, triangle: &Triangle<3>) -> bool {
    matches!(
        crossing(segment.p0, segment.direction(), triangle),
        Some(c) if c.qdn >= 0.0 && c.qdn <= c.ddn
    )
}

pub fn find_segment(segment: &Segment<3>, triangle: &Triangle<3>) -> LineTriangleIntersection {
    let direction = segment.direction();
    match crossing(segment.p0, direction, triangle) {
        Some(c) if c.qdn >= 0.0 && c.qdn <= c.ddn => finish(segment.p0, direction, c),
        _ => LineTriangleIntersection::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Triangle<3> {
        Triangle::new(Vector3::ZERO, Vector3::unit(0), Vector3::unit(1))
    }

    #[test]
    fn test_vertical_line_hits_interior() {
        let line = Line::new(Vector3::xyz(0.25, 0.25, 2.0), -Vector3::unit(2));
        let r = find(&line, &triangle());
        assert!(r.intersect);
        assert_eq!(r.parameter, 2.0);
        assert_eq!(r.triangle_bary, [0.5, 0.25, 0.25]);
        assert_eq!(r.point, Vector3::xyz(0.25, 0.25, 0.0));
    }

    #[test]
    fn test_line_behind_origin_hits_but_ray_misses() {
        let line = Line::new(Vector3::xyz(0.25, 0.25, 2.0), Vector3::unit(2));
        assert_eq!(find(&line, &triangle()).parameter, -2.0);
        assert!(!find_ray(&Ray::new(line.origin, line.direction), &triangle()).intersect);
    }

    #[test]
    fn test_parallel_and_outside_miss() {
        let parallel = Line::new(Vector3::xyz(0.1, 0.1, 0.0), Vector3::unit(0));
        assert!(!test(&parallel, &triangle()));
        let outside = Line::new(Vector3::xyz(1.0, 1.0, 1.0), Vector3::unit(2));
        assert!(!test(&outside, &triangle()));
    }

    #[test]
    fn test_segment_range() {
        let short = Segment::new(Vector3::xyz(0.2, 0.2, 2.0), Vector3::xyz(0.2, 0.2, 1.0));
        assert!(!test_segment(&short, &triangle()));
        let long = Segment::new(Vector3::xyz(0.2, 0.2, 2.0), Vector3::xyz(0.2, 0.2, -2.0));
        let r = find_segment(&long, &triangle());
        assert!(r.intersect);
        assert_eq!(r.parameter, 0.5);
    }
}
