use super::dist_point_aligned_box;
use super::intr_linear_aligned_box;
use super::IntersectionType;
use crate::primitives::{AlignedBox, Circle2};
use crate::vector::Vector2;

/// First contact between a moving box and a moving circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCircleContact {
    pub intersection_type: IntersectionType,
    /// Zero when overlapping at the start, the first time of contact otherwise.
    pub contact_time: f64,
    /// Contact point relative to the box at its starting position, in world
    /// coordinates. Meaningless when the intersection type is `None`.
    pub contact_point: Vector2,
}

impl Default for BoxCircleContact {
    fn default() -> Self {
        Self {
            intersection_type: IntersectionType::None,
            contact_time: 0.0,
            contact_point: Vector2::ZERO,
        }
    }
}

/// Static overlap test of a solid box and a solid circle.
pub fn test(aligned_box: &AlignedBox<2>, circle: &Circle2) -> bool {
    dist_point_aligned_box::distance(circle.center, aligned_box).sqr_distance <= circle.radius * circle.radius
}

/// Finds the first time the moving circle touches the moving box.
///
/// The problem is reduced to a circle moving with the relative velocity against a box
/// centered at the origin, then mirrored into the first quadrant. The contact point is
/// mirrored back before returning.
pub fn find(
    aligned_box: &AlignedBox<2>,
    box_velocity: Vector2,
    circle: &Circle2,
    circle_velocity: Vector2,
) -> BoxCircleContact {
    let box_center = aligned_box.center();
    let extent = aligned_box.extent();
    let c = circle.center - box_center;
    let v = circle_velocity - box_velocity;

    // The circle center must pass through the box grown by the radius.
    let super_box = AlignedBox::from_center_extent(Vector2::ZERO, extent + Vector2::splat(circle.radius));
    let mut result = BoxCircleContact::default();
    if intr_linear_aligned_box::test_interval(c, v, 0.0, f64::INFINITY, &super_box) {
        do_query(extent, c, circle.radius, v, &mut result);
        if result.intersection_type != IntersectionType::None {
            result.contact_point += box_center;
        }
    }
    result
}

fn do_query(k: Vector2, c_in: Vector2, radius: f64, v_in: Vector2, result: &mut BoxCircleContact) {
    let mut c = c_in;
    let mut v = v_in;
    let mut sign = [1.0; 2];
    for i in 0..2 {
        if c[i] < 0.0 {
            c[i] = -c[i];
            v[i] = -v[i];
            sign[i] = -1.0;
        }
    }

    let delta = c - k;
    if delta[1] <= radius {
        if delta[0] <= radius {
            if delta[1] <= 0.0 {
                if delta[0] <= 0.0 {
                    interior_overlap(c, result);
                } else {
                    edge_overlap(0, 1, k, c, delta, radius, result);
                }
            } else if delta[0] <= 0.0 {
                edge_overlap(1, 0, k, c, delta, radius, result);
            } else if delta.squared_length() <= radius * radius {
                vertex_overlap(k, delta, radius, result);
            } else {
                vertex_separated(k, delta, v, radius, result);
            }
        } else {
            edge_unbounded(0, 1, k, c, delta, v, radius, result);
        }
    } else if delta[0] <= radius {
        edge_unbounded(1, 0, k, c, delta, v, radius, result);
    } else {
        vertex_unbounded(k, c, delta, v, radius, result);
    }

    if result.intersection_type != IntersectionType::None {
        for i in 0..2 {
            if sign[i] < 0.0 {
                result.contact_point[i] = -result.contact_point[i];
            }
        }
    }
}

fn interior_overlap(c: Vector2, result: &mut BoxCircleContact) {
    result.intersection_type = IntersectionType::Overlapping;
    result.contact_time = 0.0;
    result.contact_point = c;
}

fn edge_overlap(
    i0: usize,
    i1: usize,
    k: Vector2,
    c: Vector2,
    delta: Vector2,
    radius: f64,
    result: &mut BoxCircleContact,
) {
    result.intersection_type = if delta[i0] < radius {
        IntersectionType::Overlapping
    } else {
        IntersectionType::Future
    };
    result.contact_time = 0.0;
    result.contact_point[i0] = k[i0];
    result.contact_point[i1] = c[i1];
}

fn vertex_overlap(k: Vector2, delta: Vector2, radius: f64, result: &mut BoxCircleContact) {
    result.intersection_type = if delta.squared_length() < radius * radius {
        IntersectionType::Overlapping
    } else {
        IntersectionType::Future
    };
    result.contact_time = 0.0;
    result.contact_point = k;
}

fn vertex_separated(k: Vector2, delta: Vector2, v: Vector2, radius: f64, result: &mut BoxCircleContact) {
    if v[0] < 0.0 || v[1] < 0.0 {
        rounded_vertex(k, delta, v, radius, result);
    }
}

#[allow(clippy::too_many_arguments)]
fn edge_unbounded(
    i0: usize,
    i1: usize,
    k: Vector2,
    c: Vector2,
    delta: Vector2,
    v: Vector2,
    radius: f64,
    result: &mut BoxCircleContact,
) {
    if v[i0] < 0.0 {
        rounded_edge(i0, i1, k, c, delta, v, radius, result);
    }
}

fn vertex_unbounded(k: Vector2, c: Vector2, delta: Vector2, v: Vector2, radius: f64, result: &mut BoxCircleContact) {
    if v[0] < 0.0 && v[1] < 0.0 {
        // The edge whose grown line is crossed last is the one that is hit.
        let t0 = (radius - delta[0]) / v[0];
        let t1 = (radius - delta[1]) / v[1];
        let j0 = if t1 > t0 { 1 } else { 0 };
        rounded_edge(j0, 1 - j0, k, c, delta, v, radius, result);
    }
}

/// Moving circle against the vertex `k` of the rounded box.
fn rounded_vertex(k: Vector2, delta: Vector2, v: Vector2, radius: f64, result: &mut BoxCircleContact) {
    let a1 = v.dot(delta);
    if a1 < 0.0 {
        let a0 = delta.squared_length() - radius * radius;
        let a2 = v.squared_length();
        let discr = a1 * a1 - a2 * a0;
        if discr >= 0.0 {
            result.intersection_type = IntersectionType::Future;
            result.contact_time = -(a1 + discr.sqrt()) / a2;
            result.contact_point = k;
        }
    }
}

/// Moving circle against the edge `x[i0] = k[i0]` of the rounded box.
#[allow(clippy::too_many_arguments)]
fn rounded_edge(
    i0: usize,
    i1: usize,
    k: Vector2,
    c: Vector2,
    delta: Vector2,
    v: Vector2,
    radius: f64,
    result: &mut BoxCircleContact,
) {
    let t_max = (radius - delta[i0]) / v[i0];
    let p1 = c[i1] + t_max * v[i1];
    if p1 < -k[i1] {
        let mut other_k = k;
        other_k[i1] = -k[i1];
        rounded_vertex(other_k, c - other_k, v, radius, result);
    } else if p1 <= k[i1] {
        result.intersection_type = IntersectionType::Future;
        result.contact_time = t_max;
        result.contact_point[i0] = k[i0];
        result.contact_point[i1] = p1;
    } else {
        rounded_vertex(k, delta, v, radius, result);
    }
}
