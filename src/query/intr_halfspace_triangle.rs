use crate::primitives::{Halfspace, Triangle};
use crate::vector::Vector3;

/// The part of a triangle inside a halfspace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfspaceTriangleClip {
    pub intersect: bool,
    /// 0 (none), 1 (vertex), 2 (edge), 3 (triangle) or 4 (quadrilateral).
    pub num_points: usize,
    /// Polygon vertices in triangle winding order, valid for the first `num_points`.
    pub point: [Vector3; 4],
}

impl Default for HalfspaceTriangleClip {
    fn default() -> Self {
        Self {
            intersect: false,
            num_points: 0,
            point: [Vector3::ZERO; 4],
        }
    }
}

impl HalfspaceTriangleClip {
    fn push(&mut self, p: Vector3) {
        self.point[self.num_points] = p;
        self.num_points += 1;
    }

    /// The clipped points as a slice.
    pub fn points(&self) -> &[Vector3] {
        &self.point[..self.num_points]
    }
}

fn signed_distances(halfspace: &Halfspace<3>, triangle: &Triangle<3>) -> [f64; 3] {
    std::array::from_fn(|i| halfspace.signed_distance(triangle.v[i]))
}

/// The triangle intersects the halfspace iff some vertex is on or inside the plane.
pub fn test(halfspace: &Halfspace<3>, triangle: &Triangle<3>) -> bool {
    let s = signed_distances(halfspace, triangle);
    s[0].max(s[1]).max(s[2]) >= 0.0
}

/// Clips the triangle against the halfspace.
///
/// When exactly one vertex is outside and the other two lie on the plane, the two
/// on-plane vertices are reported but `intersect` stays `false`: the contact is only
/// an edge of the triangle.
pub fn find(halfspace: &Halfspace<3>, triangle: &Triangle<3>) -> HalfspaceTriangleClip {
    let s = signed_distances(halfspace, triangle);
    let v = &triangle.v;
    let num_positive = s.iter().filter(|&&d| d > 0.0).count();
    let num_negative = s.iter().filter(|&&d| d < 0.0).count();

    // Point on edge (i, j) where the signed distance crosses zero.
    let crossing = |i: usize, j: usize| -> Vector3 {
        let t = s[i] / (s[i] - s[j]);
        v[i] + (v[j] - v[i]) * t
    };

    let mut result = HalfspaceTriangleClip::default();
    match (num_negative, num_positive) {
        (0, _) => {
            // fully inside
            result.intersect = true;
            for p in v.iter() {
                result.push(*p);
            }
        }
        (1, 2) => {
            // one vertex outside, the remainder is a quadrilateral
            let i0 = (0..3).find(|&i| s[i] < 0.0).unwrap_or(0);
            let i1 = (i0 + 1) % 3;
            let i2 = (i0 + 2) % 3;
            result.intersect = true;
            result.push(v[i1]);
            result.push(v[i2]);
            result.push(crossing(i2, i0));
            result.push(crossing(i0, i1));
        }
        (1, 1) => {
            // one outside, one on the plane, one inside
            let i0 = (0..3).find(|&i| s[i] < 0.0).unwrap_or(0);
            let i1 = (i0 + 1) % 3;
            let i2 = (i0 + 2) % 3;
            result.intersect = true;
            result.push(v[i1]);
            result.push(v[i2]);
            if s[i1] > 0.0 {
                result.push(crossing(i0, i1));
            } else {
                result.push(crossing(i2, i0));
            }
        }
        (1, _) => {
            // only the on-plane edge touches the halfspace
            for i in 0..3 {
                if s[i] == 0.0 {
                    result.push(v[i]);
                }
            }
        }
        (2, 1) => {
            // one vertex inside, the remainder is a triangle
            let i0 = (0..3).find(|&i| s[i] > 0.0).unwrap_or(0);
            let i1 = (i0 + 1) % 3;
            let i2 = (i0 + 2) % 3;
            result.intersect = true;
            result.push(v[i0]);
            result.push(crossing(i0, i1));
            result.push(crossing(i2, i0));
        }
        (2, _) => {
            // a single vertex on the plane
            result.intersect = true;
            if let Some(i) = (0..3).find(|&i| s[i] == 0.0) {
                result.push(v[i]);
            }
        }
        _ => {
            // fully outside
        }
    }
    result
}
