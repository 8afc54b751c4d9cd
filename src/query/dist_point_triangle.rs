use crate::primitives::Triangle;
use crate::vector::{Vector, Vector2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointTriangleDistance<const N: usize> {
    pub distance: f64,
    pub sqr_distance: f64,
    /// Barycentric coordinates of the closest triangle point.
    pub barycentric: [f64; 3],
    /// `[point, closest triangle point]`.
    pub closest: [Vector<N>; 2],
}

impl<const N: usize> PointTriangleDistance<N> {
    fn from_parameters(point: Vector<N>, triangle: &Triangle<N>, s: f64, t: f64) -> Self {
        let edge0 = triangle.v[1] - triangle.v[0];
        let edge1 = triangle.v[2] - triangle.v[0];
        let closest = triangle.v[0] + edge0 * s + edge1 * t;
        let sqr_distance = (point - closest).squared_length();
        Self {
            distance: sqr_distance.sqrt(),
            sqr_distance,
            barycentric: [1.0 - s - t, s, t],
            closest: [point, closest],
        }
    }
}

/// Closest point on `triangle` to `point`.
///
/// Minimizes `Q(s, t) = |v0 + s * e0 + t * e1 - point|^2` over `s >= 0, t >= 0,
/// s + t <= 1` by classifying the unconstrained minimizer into one of seven regions:
///
/// ```text
///        t
///    \ 2 |
///     \  |
///      \ |
///       \|
///        \
///        |\
///    3   | \  1
///        |  \
///        | 0 \
///   -----+----\------ s
///    4   | 5   \  6
/// ```
pub fn distance<const N: usize>(point: Vector<N>, triangle: &Triangle<N>) -> PointTriangleDistance<N> {
    let diff = triangle.v[0] - point;
    let edge0 = triangle.v[1] - triangle.v[0];
    let edge1 = triangle.v[2] - triangle.v[0];
    let a00 = edge0.dot(edge0);
    let a01 = edge0.dot(edge1);
    let a11 = edge1.dot(edge1);
    let b0 = diff.dot(edge0);
    let b1 = diff.dot(edge1);
    let det = (a00 * a11 - a01 * a01).max(0.0);
    let mut s = a01 * b1 - a11 * b0;
    let mut t = a01 * b0 - a00 * b1;

    if s + t <= det {
        if s < 0.0 {
            if t < 0.0 {
                // region 4
                if b0 < 0.0 {
                    t = 0.0;
                    s = if -b0 >= a00 { 1.0 } else { -b0 / a00 };
                } else {
                    s = 0.0;
                    t = if b1 >= 0.0 {
                        0.0
                    } else if -b1 >= a11 {
                        1.0
                    } else {
                        -b1 / a11
                    };
                }
            } else {
                // region 3
                s = 0.0;
                t = if b1 >= 0.0 {
                    0.0
                } else if -b1 >= a11 {
                    1.0
                } else {
                    -b1 / a11
                };
            }
        } else if t < 0.0 {
            // region 5
            t = 0.0;
            s = if b0 >= 0.0 {
                0.0
            } else if -b0 >= a00 {
                1.0
            } else {
                -b0 / a00
            };
        } else if det > 0.0 {
            // region 0
            s /= det;
            t /= det;
        } else {
            // collapsed triangle with the minimizer at v0
            s = 0.0;
            t = 0.0;
        }
    } else if s < 0.0 {
        // region 2
        let tmp0 = a01 + b0;
        let tmp1 = a11 + b1;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            let denom = a00 - 2.0 * a01 + a11;
            if numer >= denom {
                s = 1.0;
                t = 0.0;
            } else {
                s = numer / denom;
                t = 1.0 - s;
            }
        } else {
            s = 0.0;
            t = if tmp1 <= 0.0 {
                1.0
            } else if b1 >= 0.0 {
                0.0
            } else {
                -b1 / a11
            };
        }
    } else if t < 0.0 {
        // region 6
        let tmp0 = a01 + b1;
        let tmp1 = a00 + b0;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            let denom = a00 - 2.0 * a01 + a11;
            if numer >= denom {
                t = 1.0;
                s = 0.0;
            } else {
                t = numer / denom;
                s = 1.0 - t;
            }
        } else {
            t = 0.0;
            s = if tmp1 <= 0.0 {
                1.0
            } else if b0 >= 0.0 {
                0.0
            } else {
                -b0 / a00
            };
        }
    } else {
        // region 1
        let numer = a11 + b1 - a01 - b0;
        if numer <= 0.0 {
            s = 0.0;
            t = 1.0;
        } else {
            let denom = a00 - 2.0 * a01 + a11;
            if numer >= denom {
                s = 1.0;
                t = 0.0;
            } else {
                s = numer / denom;
                t = 1.0 - s;
            }
        }
    }

    PointTriangleDistance::from_parameters(point, triangle, s, t)
}

/// Closest point on `triangle` to `point`, robust to rounding errors.
///
/// With `F = Q_s / 2` and `G = Q_t / 2`, the level set `F = 0` crosses the domain in a
/// segment (or misses it). The minimizer lies on that segment or on the triangle edge
/// where `G` changes sign, found by walking along the segment with monotone directional
/// derivatives instead of the exact region search of [`distance`].
pub fn distance_conjugate_gradient<const N: usize>(
    point: Vector<N>,
    triangle: &Triangle<N>,
) -> PointTriangleDistance<N> {
    let diff = point - triangle.v[0];
    let edge0 = triangle.v[1] - triangle.v[0];
    let edge1 = triangle.v[2] - triangle.v[0];
    let a00 = edge0.dot(edge0);
    let a01 = edge0.dot(edge1);
    let a11 = edge1.dot(edge1);
    let b0 = -diff.dot(edge0);
    let b1 = -diff.dot(edge1);

    let f00 = b0;
    let f10 = b0 + a00;
    let f01 = b0 + a01;

    let p = if f00 >= 0.0 {
        if f01 >= 0.0 {
            // (1) p0 = (0,0), p1 = (0,1)
            min_edge02(a11, b1)
        } else {
            // (2) p0 = (0,t10), p1 = (t01,1-t01)
            walk_from_edge02(a01, a11, b1, f00, f10, f01)
        }
    } else if f01 <= 0.0 {
        if f10 <= 0.0 {
            // (3) p0 = (1,0), p1 = (0,1)
            min_edge12(a01, a11, b1, f10, f01)
        } else {
            // (4) p0 = (t00,0), p1 = (t01,1-t01)
            let p0 = Vector2::xy(f00 / (f00 - f10), 0.0);
            let p1x = f01 / (f01 - f10);
            let p1 = Vector2::xy(p1x, 1.0 - p1x);
            let h0 = p1[1] * (a01 * p0[0] + b1);
            if h0 >= 0.0 {
                min_edge01(p0)
            } else {
                let h1 = p1[1] * (a01 * p1[0] + a11 * p1[1] + b1);
                if h1 <= 0.0 {
                    min_edge12(a01, a11, b1, f10, f01)
                } else {
                    min_interior(p0, h0, p1, h1)
                }
            }
        }
    } else if f10 <= 0.0 {
        // (5) p0 = (0,t10), p1 = (t01,1-t01)
        walk_from_edge02(a01, a11, b1, f00, f10, f01)
    } else {
        // (6) p0 = (t00,0), p1 = (0,t11)
        let p0 = Vector2::xy(f00 / (f00 - f10), 0.0);
        let p1 = Vector2::xy(0.0, f00 / (f00 - f01));
        let h0 = p1[1] * (a01 * p0[0] + b1);
        if h0 >= 0.0 {
            min_edge01(p0)
        } else {
            let h1 = p1[1] * (a11 * p1[1] + b1);
            if h1 <= 0.0 {
                min_edge02(a11, b1)
            } else {
                min_interior(p0, h0, p1, h1)
            }
        }
    };

    PointTriangleDistance::from_parameters(point, triangle, p[0], p[1])
}

/// Cases (2) and (5): the `F = 0` segment runs from edge `s = 0` to edge `s + t = 1`.
fn walk_from_edge02(a01: f64, a11: f64, b1: f64, f00: f64, f10: f64, f01: f64) -> Vector2 {
    let p0 = Vector2::xy(0.0, f00 / (f00 - f01));
    let p1x = f01 / (f01 - f10);
    let p1 = Vector2::xy(p1x, 1.0 - p1x);
    let dt1 = p1[1] - p0[1];
    let h0 = dt1 * (a11 * p0[1] + b1);
    if h0 >= 0.0 {
        return min_edge02(a11, b1);
    }
    let h1 = dt1 * (a01 * p1[0] + a11 * p1[1] + b1);
    if h1 <= 0.0 {
        min_edge12(a01, a11, b1, f10, f01)
    } else {
        min_interior(p0, h0, p1, h1)
    }
}

#[inline]
fn min_edge01(p0: Vector2) -> Vector2 {
    p0
}

fn min_edge02(a11: f64, b1: f64) -> Vector2 {
    let t = if b1 >= 0.0 {
        0.0
    } else if a11 + b1 <= 0.0 {
        1.0
    } else {
        -b1 / a11
    };
    Vector2::xy(0.0, t)
}

fn min_edge12(a01: f64, a11: f64, b1: f64, f10: f64, f01: f64) -> Vector2 {
    let h0 = a01 + b1 - f10;
    let t = if h0 >= 0.0 {
        0.0
    } else {
        let h1 = a11 + b1 - f01;
        if h1 <= 0.0 { 1.0 } else { h0 / (h0 - h1) }
    };
    Vector2::xy(1.0 - t, t)
}

fn min_interior(p0: Vector2, h0: f64, p1: Vector2, h1: f64) -> Vector2 {
    let z = h0 / (h0 - h1);
    p0 * (1.0 - z) + p1 * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;

    fn unit_triangle() -> Triangle<3> {
        Triangle::new(Vector3::ZERO, Vector3::unit(0), Vector3::unit(1))
    }

    #[test]
    fn test_point_above_hypotenuse() {
        let point = Vector3::xyz(0.5, 0.5, 5.0);
        for r in [
            distance(point, &unit_triangle()),
            distance_conjugate_gradient(point, &unit_triangle()),
        ] {
            assert_eq!(r.closest[1], Vector3::xyz(0.5, 0.5, 0.0));
            assert_eq!(r.distance, 5.0);
            assert_eq!(r.barycentric, [0.0, 0.5, 0.5]);
        }
    }

    #[test]
    fn test_vertex_regions() {
        let t = unit_triangle();
        let r = distance(Vector3::xyz(-1.0, -1.0, 0.0), &t);
        assert_eq!(r.barycentric, [1.0, 0.0, 0.0]);
        let r = distance(Vector3::xyz(3.0, -1.0, 0.0), &t);
        assert_eq!(r.barycentric, [0.0, 1.0, 0.0]);
        let r = distance(Vector3::xyz(-1.0, 3.0, 0.0), &t);
        assert_eq!(r.barycentric, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_conjugate_gradient_vertex_regions() {
        let t = unit_triangle();
        let r = distance_conjugate_gradient(Vector3::xyz(-1.0, -1.0, 0.0), &t);
        assert_eq!(r.closest[1], Vector3::ZERO);
        let r = distance_conjugate_gradient(Vector3::xyz(3.0, -1.0, 0.0), &t);
        assert_eq!(r.closest[1], Vector3::unit(0));
        let r = distance_conjugate_gradient(Vector3::xyz(-1.0, 3.0, 0.0), &t);
        assert_eq!(r.closest[1], Vector3::unit(1));
    }

    #[test]
    fn test_interior_barycentric() {
        let r = distance(Vector3::xyz(0.2, 0.3, -1.0), &unit_triangle());
        let sum: f64 = r.barycentric.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(r.barycentric.iter().all(|&b| b > 0.0 && b < 1.0));
        assert!((r.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collapsed_triangle_is_finite() {
        let p = Vector3::xyz(1.0, 1.0, 1.0);
        let t = Triangle::new(p, p, p);
        let r = distance(Vector3::ZERO, &t);
        assert_eq!(r.closest[1], p);
        assert!(r.distance.is_finite());
    }
}
