use super::dist_point_aligned_box;
use super::intr_linear_aligned_box;
use super::IntersectionType;
use crate::primitives::{AlignedBox, Sphere3};
use crate::vector::Vector3;

/// First contact between a moving box and a moving sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSphereContact {
    pub intersection_type: IntersectionType,
    pub contact_time: f64,
    /// Contact point relative to the box at its starting position, in world coordinates.
    pub contact_point: Vector3,
}

impl Default for BoxSphereContact {
    fn default() -> Self {
        Self {
            intersection_type: IntersectionType::None,
            contact_time: 0.0,
            contact_point: Vector3::ZERO,
        }
    }
}

pub fn test(aligned_box: &AlignedBox<3>, sphere: &Sphere3) -> bool {
    dist_point_aligned_box::distance(sphere.center, aligned_box).sqr_distance <= sphere.radius * sphere.radius
}

/// Finds the first time the moving sphere touches the moving box.
///
/// Same reduction as the box-circle query: relative motion, box centered at the
/// origin, sphere center folded into the first octant. The rounded box (the box
/// grown by the sphere radius) has face, edge and vertex pieces that are tested in
/// order along the path of the center.
pub fn find(
    aligned_box: &AlignedBox<3>,
    box_velocity: Vector3,
    sphere: &Sphere3,
    sphere_velocity: Vector3,
) -> BoxSphereContact {
    let box_center = aligned_box.center();
    let extent = aligned_box.extent();
    let c = sphere.center - box_center;
    let v = sphere_velocity - box_velocity;

    let super_box = AlignedBox::from_center_extent(Vector3::ZERO, extent + Vector3::splat(sphere.radius));
    let mut result = BoxSphereContact::default();
    if intr_linear_aligned_box::test_interval(c, v, 0.0, f64::INFINITY, &super_box) {
        let mut query = RoundedBox {
            k: extent,
            radius: sphere.radius,
            result: &mut result,
        };
        query.run(c, v);
        if result.intersection_type != IntersectionType::None {
            result.contact_point += box_center;
        }
    }
    result
}

/// Box half-extents `k` grown by `radius`, with the folded center `c` and velocity `v`.
struct RoundedBox<'a> {
    k: Vector3,
    radius: f64,
    result: &'a mut BoxSphereContact,
}

impl RoundedBox<'_> {
    fn run(&mut self, c_in: Vector3, v_in: Vector3) {
        let mut c = c_in;
        let mut v = v_in;
        let mut sign = [1.0; 3];
        for i in 0..3 {
            if c[i] < 0.0 {
                c[i] = -c[i];
                v[i] = -v[i];
                sign[i] = -1.0;
            }
        }

        let r = self.radius;
        let rsqr = r * r;
        let delta = c - self.k;
        if delta[2] <= r {
            if delta[1] <= r {
                if delta[0] <= r {
                    if delta[2] <= 0.0 {
                        if delta[1] <= 0.0 {
                            if delta[0] <= 0.0 {
                                self.interior_overlap(c);
                            } else {
                                self.face_overlap(0, 1, 2, c, delta);
                            }
                        } else if delta[0] <= 0.0 {
                            self.face_overlap(1, 2, 0, c, delta);
                        } else if delta[0] * delta[0] + delta[1] * delta[1] <= rsqr {
                            self.edge_overlap(0, 1, 2, c, delta);
                        } else {
                            self.edge_separated(0, 1, 2, c, delta, v);
                        }
                    } else if delta[1] <= 0.0 {
                        if delta[0] <= 0.0 {
                            self.face_overlap(2, 0, 1, c, delta);
                        } else if delta[0] * delta[0] + delta[2] * delta[2] <= rsqr {
                            self.edge_overlap(2, 0, 1, c, delta);
                        } else {
                            self.edge_separated(2, 0, 1, c, delta, v);
                        }
                    } else if delta[0] <= 0.0 {
                        if delta[1] * delta[1] + delta[2] * delta[2] <= rsqr {
                            self.edge_overlap(1, 2, 0, c, delta);
                        } else {
                            self.edge_separated(1, 2, 0, c, delta, v);
                        }
                    } else if delta.squared_length() <= rsqr {
                        self.vertex_overlap(delta);
                    } else {
                        self.vertex_separated(delta, v);
                    }
                } else {
                    self.face_unbounded(0, 1, 2, c, delta, v);
                }
            } else if delta[0] <= r {
                self.face_unbounded(1, 2, 0, c, delta, v);
            } else {
                self.edge_unbounded(0, 1, c, delta, v);
            }
        } else if delta[1] <= r {
            if delta[0] <= r {
                self.face_unbounded(2, 0, 1, c, delta, v);
            } else {
                self.edge_unbounded(2, 0, c, delta, v);
            }
        } else if delta[0] <= r {
            self.edge_unbounded(1, 2, c, delta, v);
        } else {
            self.vertex_unbounded(c, delta, v);
        }

        if self.result.intersection_type != IntersectionType::None {
            for i in 0..3 {
                if sign[i] < 0.0 {
                    self.result.contact_point[i] = -self.result.contact_point[i];
                }
            }
        }
    }

    fn interior_overlap(&mut self, c: Vector3) {
        self.result.intersection_type = IntersectionType::Overlapping;
        self.result.contact_time = 0.0;
        self.result.contact_point = c;
    }

    fn overlap_type(&self, sqr_distance: f64) -> IntersectionType {
        if sqr_distance < self.radius * self.radius {
            IntersectionType::Overlapping
        } else {
            IntersectionType::Future
        }
    }

    fn vertex_overlap(&mut self, delta: Vector3) {
        self.result.intersection_type = self.overlap_type(delta.squared_length());
        self.result.contact_time = 0.0;
        self.result.contact_point = self.k;
    }

    fn edge_overlap(&mut self, i0: usize, i1: usize, i2: usize, c: Vector3, delta: Vector3) {
        self.result.intersection_type = self.overlap_type(delta[i0] * delta[i0] + delta[i1] * delta[i1]);
        self.result.contact_time = 0.0;
        self.result.contact_point[i0] = self.k[i0];
        self.result.contact_point[i1] = self.k[i1];
        self.result.contact_point[i2] = c[i2];
    }

    fn face_overlap(&mut self, i0: usize, i1: usize, i2: usize, c: Vector3, delta: Vector3) {
        self.result.intersection_type = if delta[i0] < self.radius {
            IntersectionType::Overlapping
        } else {
            IntersectionType::Future
        };
        self.result.contact_time = 0.0;
        self.result.contact_point[i0] = self.k[i0];
        self.result.contact_point[i1] = c[i1];
        self.result.contact_point[i2] = c[i2];
    }

    fn vertex_separated(&mut self, delta: Vector3, v: Vector3) {
        if v[0] < 0.0 || v[1] < 0.0 || v[2] < 0.0 {
            self.ray_rounded_vertex(self.k, delta, v);
        }
    }

    fn edge_separated(&mut self, i0: usize, i1: usize, i2: usize, c: Vector3, delta: Vector3, v: Vector3) {
        if v[i0] < 0.0 || v[i1] < 0.0 {
            self.ray_rounded_edge(i0, i1, i2, self.k, c, delta, v);
        }
    }

    fn vertex_unbounded(&mut self, c: Vector3, delta: Vector3, v: Vector3) {
        if v[0] < 0.0 && v[1] < 0.0 && v[2] < 0.0 {
            let mut t_max = (self.radius - delta[0]) / v[0];
            let mut j0 = 0;
            for j in 1..3 {
                let temp = (self.radius - delta[j]) / v[j];
                if temp > t_max {
                    t_max = temp;
                    j0 = j;
                }
            }
            let j1 = (j0 + 1) % 3;
            let j2 = (j1 + 1) % 3;
            self.ray_rounded_face(j0, j1, j2, c, delta, v);
        }
    }

    fn edge_unbounded(&mut self, i0: usize, i1: usize, c: Vector3, delta: Vector3, v: Vector3) {
        if v[i0] < 0.0 && v[i1] < 0.0 {
            let t_max = (self.radius - delta[i0]) / v[i0];
            let temp = (self.radius - delta[i1]) / v[i1];
            let j0 = if temp > t_max { i1 } else { i0 };
            let j1 = (j0 + 1) % 3;
            let j2 = (j1 + 1) % 3;
            self.ray_rounded_face(j0, j1, j2, c, delta, v);
        }
    }

    fn face_unbounded(&mut self, i0: usize, i1: usize, i2: usize, c: Vector3, delta: Vector3, v: Vector3) {
        if v[i0] < 0.0 {
            self.ray_rounded_face(i0, i1, i2, c, delta, v);
        }
    }

    /// Center path against the sphere of radius `radius` around the box vertex `k`.
    fn ray_rounded_vertex(&mut self, k: Vector3, delta: Vector3, v: Vector3) {
        let a1 = v.dot(delta);
        if a1 < 0.0 {
            let a0 = delta.squared_length() - self.radius * self.radius;
            let a2 = v.squared_length();
            let discr = a1 * a1 - a2 * a0;
            if discr >= 0.0 {
                self.result.intersection_type = IntersectionType::Future;
                self.result.contact_time = -(a1 + discr.sqrt()) / a2;
                self.result.contact_point = k;
            }
        }
    }

    /// Center path against the cylinder around the box edge parallel to axis `i2`
    /// through `(k[i0], k[i1])`.
    #[allow(clippy::too_many_arguments)]
    fn ray_rounded_edge(&mut self, i0: usize, i1: usize, i2: usize, k: Vector3, c: Vector3, delta: Vector3, v: Vector3) {
        let b1 = v[i0] * delta[i0] + v[i1] * delta[i1];
        if b1 < 0.0 {
            let b0 = delta[i0] * delta[i0] + delta[i1] * delta[i1] - self.radius * self.radius;
            let b2 = v[i0] * v[i0] + v[i1] * v[i1];
            let discr = b1 * b1 - b2 * b0;
            if discr >= 0.0 {
                let t_max = -(b1 + discr.sqrt()) / b2;
                let p2 = c[i2] + t_max * v[i2];
                if -k[i2] <= p2 {
                    if p2 <= k[i2] {
                        self.result.intersection_type = IntersectionType::Future;
                        self.result.contact_time = t_max;
                        self.result.contact_point[i0] = k[i0];
                        self.result.contact_point[i1] = k[i1];
                        self.result.contact_point[i2] = p2;
                    } else {
                        self.ray_rounded_vertex(k, delta, v);
                    }
                } else {
                    let mut other_k = k;
                    other_k[i2] = -k[i2];
                    self.ray_rounded_vertex(other_k, c - other_k, v);
                }
            }
        }
    }

    /// Center path against the face `x[i0] = k[i0] + radius` of the rounded box,
    /// falling back to the neighboring edges when the crossing is outside the face.
    fn ray_rounded_face(&mut self, i0: usize, i1: usize, i2: usize, c: Vector3, delta: Vector3, v: Vector3) {
        let k = self.k;
        let t_max = (self.radius - delta[i0]) / v[i0];
        let p1 = c[i1] + t_max * v[i1];
        let p2 = c[i2] + t_max * v[i2];

        let flipped = |axis: usize| {
            let mut other_k = k;
            other_k[axis] = -k[axis];
            other_k
        };

        if p1 < -k[i1] {
            let other_k = flipped(i1);
            self.ray_rounded_edge(i0, i1, i2, other_k, c, c - other_k, v);
            if self.result.intersection_type == IntersectionType::None {
                self.far_edge_i2(i0, i1, i2, c, delta, v, p2);
            }
        } else if p1 <= k[i1] {
            if p2 < -k[i2] {
                let other_k = flipped(i2);
                self.ray_rounded_edge(i2, i0, i1, other_k, c, c - other_k, v);
            } else if p2 <= k[i2] {
                self.result.intersection_type = IntersectionType::Future;
                self.result.contact_time = t_max;
                self.result.contact_point[i0] = k[i0];
                self.result.contact_point[i1] = p1;
                self.result.contact_point[i2] = p2;
            } else {
                self.ray_rounded_edge(i2, i0, i1, k, c, delta, v);
            }
        } else {
            self.ray_rounded_edge(i0, i1, i2, k, c, delta, v);
            if self.result.intersection_type == IntersectionType::None {
                self.far_edge_i2(i0, i1, i2, c, delta, v, p2);
            }
        }
    }

    /// Second chance after missing an `i1` edge: the edges bounding the face along `i2`.
    #[allow(clippy::too_many_arguments)]
    fn far_edge_i2(&mut self, i0: usize, i1: usize, i2: usize, c: Vector3, delta: Vector3, v: Vector3, p2: f64) {
        let k = self.k;
        if p2 < -k[i2] {
            let mut other_k = k;
            other_k[i2] = -k[i2];
            self.ray_rounded_edge(i2, i0, i1, other_k, c, c - other_k, v);
        } else if p2 > k[i2] {
            self.ray_rounded_edge(i2, i0, i1, k, c, delta, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> AlignedBox<3> {
        AlignedBox::new(Vector3::splat(-1.0), Vector3::splat(1.0))
    }

    #[test]
    fn test_face_contact() {
        let sphere = Sphere3::new(Vector3::xyz(0.0, 0.0, 5.0), 1.0);
        let r = find(&cube(), Vector3::ZERO, &sphere, Vector3::xyz(0.0, 0.0, -1.0));
        assert_eq!(r.intersection_type, IntersectionType::Future);
        assert_eq!(r.contact_time, 3.0);
        assert_eq!(r.contact_point, Vector3::xyz(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_edge_contact() {
        let sphere = Sphere3::new(Vector3::xyz(5.0, 5.0, 0.5), 1.0);
        let r = find(&cube(), Vector3::ZERO, &sphere, Vector3::xyz(-1.0, -1.0, 0.0));
        assert_eq!(r.intersection_type, IntersectionType::Future);
        assert_eq!(r.contact_point, Vector3::xyz(1.0, 1.0, 0.5));
        let expected = 4.0 - 1.0 / std::f64::consts::SQRT_2;
        assert!((r.contact_time - expected).abs() < 1e-12);
    }

    #[test]
    fn test_vertex_contact() {
        let sphere = Sphere3::new(Vector3::splat(-5.0), 1.0);
        let r = find(&cube(), Vector3::ZERO, &sphere, Vector3::splat(1.0));
        assert_eq!(r.intersection_type, IntersectionType::Future);
        assert_eq!(r.contact_point, Vector3::splat(-1.0));
        let expected = 4.0 - 1.0 / 3f64.sqrt();
        assert!((r.contact_time - expected).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_and_miss() {
        let inside = Sphere3::new(Vector3::xyz(0.0, 0.0, 1.5), 1.0);
        let r = find(&cube(), Vector3::ZERO, &inside, Vector3::ZERO);
        assert_eq!(r.intersection_type, IntersectionType::Overlapping);
        assert!(test(&cube(), &inside));

        let passing = Sphere3::new(Vector3::xyz(5.0, 3.0, 0.0), 1.0);
        let r = find(&cube(), Vector3::ZERO, &passing, Vector3::xyz(-1.0, 0.0, 0.0));
        assert_eq!(r.intersection_type, IntersectionType::None);
    }
}
