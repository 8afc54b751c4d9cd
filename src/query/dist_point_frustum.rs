use crate::primitives::Frustum3;
use crate::vector::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointFrustumDistance {
    pub distance: f64,
    pub sqr_distance: f64,
    /// `[point, closest frustum point]`.
    pub closest: [Vector3; 2],
}

/// Corner dot products of the folded frustum, shared by every region test.
struct FrustumCorners {
    rmin: f64,
    rmax: f64,
    umin: f64,
    umax: f64,
    dmin: f64,
    dmax: f64,
    min_rd_dot: f64,
    min_ud_dot: f64,
    min_rud_dot: f64,
    max_rd_dot: f64,
    max_ud_dot: f64,
    max_rud_dot: f64,
}

impl FrustumCorners {
    fn new(frustum: &Frustum3) -> Self {
        let ratio = frustum.d_ratio();
        let rmin = frustum.r_bound;
        let umin = frustum.u_bound;
        let dmin = frustum.d_min;
        let min_rd_dot = rmin * rmin + dmin * dmin;
        let min_ud_dot = umin * umin + dmin * dmin;
        let min_rud_dot = rmin * rmin + min_ud_dot;
        Self {
            rmin,
            rmax: ratio * rmin,
            umin,
            umax: ratio * umin,
            dmin,
            dmax: frustum.d_max,
            min_rd_dot,
            min_ud_dot,
            min_rud_dot,
            max_rd_dot: ratio * min_rd_dot,
            max_ud_dot: ratio * min_ud_dot,
            max_rud_dot: ratio * min_rud_dot,
        }
    }

    /// Closest point on the R-face (or its bounding edges) for a point beyond it.
    fn r_face(&self, test: [f64; 3], r_dot: f64, clamp_near: bool) -> [f64; 3] {
        let rd_dot = self.rmin * test[0] + self.dmin * test[2];
        if rd_dot >= self.max_rd_dot {
            [self.rmax, test[1], self.dmax]
        } else if !clamp_near || rd_dot >= self.min_rd_dot {
            let t = r_dot / self.min_rd_dot;
            [test[0] - t * self.dmin, test[1], test[2] + t * self.rmin]
        } else {
            [self.rmin, test[1], self.dmin]
        }
    }

    /// Closest point on the U-face (or its bounding edges) for a point beyond it.
    fn u_face(&self, test: [f64; 3], u_dot: f64, clamp_near: bool) -> [f64; 3] {
        let ud_dot = self.umin * test[1] + self.dmin * test[2];
        if ud_dot >= self.max_ud_dot {
            [test[0], self.umax, self.dmax]
        } else if !clamp_near || ud_dot >= self.min_ud_dot {
            let t = u_dot / self.min_ud_dot;
            [test[0], test[1] - t * self.dmin, test[2] + t * self.umin]
        } else {
            [test[0], self.umin, self.dmin]
        }
    }

    /// Closest point on the RU-edge (or its endpoints).
    fn ru_edge(&self, rud_dot: f64, clamp_near: bool) -> [f64; 3] {
        if rud_dot >= self.max_rud_dot {
            [self.rmax, self.umax, self.dmax]
        } else if !clamp_near || rud_dot >= self.min_rud_dot {
            let t = rud_dot / self.min_rud_dot;
            [t * self.rmin, t * self.umin, t * self.dmin]
        } else {
            [self.rmin, self.umin, self.dmin]
        }
    }
}

/// Closest point of a solid orthogonal frustum to `point`.
///
/// The point is expressed in the frustum frame and folded into the octant `r >= 0,
/// u >= 0`; the frustum is symmetric under both reflections. The case split then
/// follows the Voronoi regions of the near face, the far face, the side faces and
/// the edges and vertices between them.
pub fn distance(point: Vector3, frustum: &Frustum3) -> PointFrustumDistance {
    let diff = point - frustum.origin;
    let mut test = [
        diff.dot(frustum.r_vector),
        diff.dot(frustum.u_vector),
        diff.dot(frustum.d_vector),
    ];

    let r_sign_change = test[0] < 0.0;
    if r_sign_change {
        test[0] = -test[0];
    }
    let u_sign_change = test[1] < 0.0;
    if u_sign_change {
        test[1] = -test[1];
    }

    let k = FrustumCorners::new(frustum);

    let closest: [f64; 3] = if test[2] >= k.dmax {
        // beyond the far face
        [test[0].min(k.rmax), test[1].min(k.umax), k.dmax]
    } else if test[2] <= k.dmin {
        // in front of the near face
        if test[0] <= k.rmin {
            if test[1] <= k.umin {
                [test[0], test[1], k.dmin]
            } else {
                let u_dot = k.dmin * test[1] - k.umin * test[2];
                k.u_face(test, u_dot, true)
            }
        } else if test[1] <= k.umin {
            let r_dot = k.dmin * test[0] - k.rmin * test[2];
            k.r_face(test, r_dot, true)
        } else {
            let rud_dot = k.rmin * test[0] + k.umin * test[1] + k.dmin * test[2];
            let r_edge_dot = k.umin * rud_dot - k.min_rud_dot * test[1];
            if r_edge_dot >= 0.0 {
                // the near-edge arm is never taken here; the near-face test above owns it
                let r_dot = k.dmin * test[0] - k.rmin * test[2];
                k.r_face(test, r_dot, true)
            } else {
                let u_edge_dot = k.rmin * rud_dot - k.min_rud_dot * test[0];
                if u_edge_dot >= 0.0 {
                    // likewise for the U-face near edge
                    let u_dot = k.dmin * test[1] - k.umin * test[2];
                    k.u_face(test, u_dot, true)
                } else {
                    k.ru_edge(rud_dot, true)
                }
            }
        }
    } else {
        // between the near and far planes
        let r_dot = k.dmin * test[0] - k.rmin * test[2];
        let u_dot = k.dmin * test[1] - k.umin * test[2];
        if r_dot <= 0.0 {
            if u_dot <= 0.0 {
                // inside
                test
            } else {
                k.u_face(test, u_dot, false)
            }
        } else if u_dot <= 0.0 {
            k.r_face(test, r_dot, false)
        } else {
            let rud_dot = k.rmin * test[0] + k.umin * test[1] + k.dmin * test[2];
            let r_edge_dot = k.umin * rud_dot - k.min_rud_dot * test[1];
            if r_edge_dot >= 0.0 {
                // rd_dot >= min_rd_dot is implied by the near-plane test above
                k.r_face(test, r_dot, false)
            } else {
                let u_edge_dot = k.rmin * rud_dot - k.min_rud_dot * test[0];
                if u_edge_dot >= 0.0 {
                    // ud_dot >= min_ud_dot is implied by the near-plane test above
                    k.u_face(test, u_dot, false)
                } else {
                    // rud_dot >= min_rud_dot is implied by the near-plane test above
                    k.ru_edge(rud_dot, false)
                }
            }
        }
    };

    let local_diff = Vector3::new(test) - Vector3::new(closest);
    let sqr_distance = local_diff.squared_length();

    let mut folded = closest;
    if r_sign_change {
        folded[0] = -folded[0];
    }
    if u_sign_change {
        folded[1] = -folded[1];
    }
    let world = frustum.origin
        + frustum.r_vector * folded[0]
        + frustum.u_vector * folded[1]
        + frustum.d_vector * folded[2];

    PointFrustumDistance {
        distance: sqr_distance.sqrt(),
        sqr_distance,
        closest: [point, world],
    }
}
