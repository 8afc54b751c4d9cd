use crate::primitives::{Hypersphere, Line, Ray, Segment};
use crate::vector::Vector;

/// Intersection of a linear component with a solid hypersphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearSphereIntersection<const N: usize> {
    pub intersect: bool,
    pub num_points: usize,
    pub parameter: [f64; 2],
    pub point: [Vector<N>; 2],
}

impl<const N: usize> Default for LinearSphereIntersection<N> {
    fn default() -> Self {
        Self {
            intersect: false,
            num_points: 0,
            parameter: [0.0; 2],
            point: [Vector::ZERO; 2],
        }
    }
}

/// Whether `origin + t * direction` for some `t` in `[t_min, t_max]` lies in the sphere.
///
/// Clamps the parameter of the closest approach to the interval, so infinite ends and
/// zero directions are both handled.
pub fn test_interval<const N: usize>(
    origin: Vector<N>,
    direction: Vector<N>,
    t_min: f64,
    t_max: f64,
    sphere: &Hypersphere<N>,
) -> bool {
    let diff = origin - sphere.center;
    let sqr_radius = sphere.radius * sphere.radius;
    let a2 = direction.squared_length();
    if a2 == 0.0 {
        return diff.squared_length() <= sqr_radius;
    }
    let t = (-direction.dot(diff) / a2).max(t_min).min(t_max);
    (diff + direction * t).squared_length() <= sqr_radius
}

/// Entry and exit parameters of `origin + t * direction` clipped to `[t_min, t_max]`.
pub fn find_interval<const N: usize>(
    origin: Vector<N>,
    direction: Vector<N>,
    t_min: f64,
    t_max: f64,
    sphere: &Hypersphere<N>,
) -> LinearSphereIntersection<N> {
    let mut result = LinearSphereIntersection::default();
    let diff = origin - sphere.center;
    let a0 = diff.squared_length() - sphere.radius * sphere.radius;
    let a1 = direction.dot(diff);
    let a2 = direction.squared_length();
    if a2 == 0.0 {
        return result;
    }

    let discr = a1 * a1 - a0 * a2;
    if discr < 0.0 {
        return result;
    }
    let root = discr.sqrt();
    let t0 = ((-a1 - root) / a2).max(t_min);
    let t1 = ((-a1 + root) / a2).min(t_max);
    if t0 > t1 {
        return result;
    }

    result.intersect = true;
    result.num_points = if t1 > t0 { 2 } else { 1 };
    result.parameter = [t0, t1];
    result.point = [origin + direction * t0, origin + direction * t1];
    result
}

pub fn test_line<const N: usize>(line: &Line<N>, sphere: &Hypersphere<N>) -> bool {
    test_interval(line.origin, line.direction, f64::NEG_INFINITY, f64::INFINITY, sphere)
}

pub fn test_ray<const N: usize>(ray: &Ray<N>, sphere: &Hypersphere<N>) -> bool {
    test_interval(ray.origin, ray.direction, 0.0, f64::INFINITY, sphere)
}

pub fn test_segment<const N: usize>(segment: &Segment<N>, sphere: &Hypersphere<N>) -> bool {
    test_interval(segment.p0, segment.direction(), 0.0, 1.0, sphere)
}

pub fn find_line<const N: usize>(line: &Line<N>, sphere: &Hypersphere<N>) -> LinearSphereIntersection<N> {
    find_interval(line.origin, line.direction, f64::NEG_INFINITY, f64::INFINITY, sphere)
}

pub fn find_ray<const N: usize>(ray: &Ray<N>, sphere: &Hypersphere<N>) -> LinearSphereIntersection<N> {
    find_interval(ray.origin, ray.direction, 0.0, f64::INFINITY, sphere)
}
