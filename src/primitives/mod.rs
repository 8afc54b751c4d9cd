mod frustum;
mod hyperellipsoid;

pub use frustum::Frustum3;
pub use hyperellipsoid::{Ellipse2, Ellipsoid3, Hyperellipsoid};

use crate::vector::Vector;

/// The line `origin + t * direction` for all real `t`.
///
/// Queries assume `direction` is unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line<const N: usize> {
    pub origin: Vector<N>,
    pub direction: Vector<N>,
}

impl<const N: usize> Line<N> {
    pub fn new(origin: Vector<N>, direction: Vector<N>) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f64) -> Vector<N> {
        self.origin + self.direction * t
    }
}

/// The half-line `origin + t * direction` for `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray<const N: usize> {
    pub origin: Vector<N>,
    pub direction: Vector<N>,
}

impl<const N: usize> Ray<N> {
    pub fn new(origin: Vector<N>, direction: Vector<N>) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f64) -> Vector<N> {
        self.origin + self.direction * t
    }
}

/// Segment with endpoints `p0` and `p1`, parameterized as `p0 + t * (p1 - p0)` for `t` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<const N: usize> {
    pub p0: Vector<N>,
    pub p1: Vector<N>,
}

impl<const N: usize> Segment<N> {
    pub fn new(p0: Vector<N>, p1: Vector<N>) -> Self {
        Self { p0, p1 }
    }

    /// `p1 - p0`, not normalized.
    pub fn direction(&self) -> Vector<N> {
        self.p1 - self.p0
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    pub fn center(&self) -> Vector<N> {
        (self.p0 + self.p1) * 0.5
    }

    pub fn point_at(&self, t: f64) -> Vector<N> {
        self.p0 + self.direction() * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle<const N: usize> {
    pub v: [Vector<N>; 3],
}

impl<const N: usize> Triangle<N> {
    pub fn new(v0: Vector<N>, v1: Vector<N>, v2: Vector<N>) -> Self {
        Self { v: [v0, v1, v2] }
    }

    /// `b0 * v0 + b1 * v1 + b2 * v2`.
    pub fn point_from_barycentric(&self, bary: [f64; 3]) -> Vector<N> {
        self.v[0] * bary[0] + self.v[1] * bary[1] + self.v[2] * bary[2]
    }
}

impl Triangle<3> {
    /// Unnormalized normal `(v1 - v0) x (v2 - v0)`.
    pub fn normal(&self) -> Vector<3> {
        (self.v[1] - self.v[0]).cross(self.v[2] - self.v[0])
    }
}

/// Axis-aligned box in N-dimensional space.
///
/// The box is empty, and most queries meaningless, when `min[i] > max[i]` for some axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignedBox<const N: usize> {
    pub min: Vector<N>,
    pub max: Vector<N>,
}

impl<const N: usize> AlignedBox<N> {
    pub fn new(min: Vector<N>, max: Vector<N>) -> Self {
        Self { min, max }
    }

    pub fn from_center_extent(center: Vector<N>, extent: Vector<N>) -> Self {
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Smallest box containing every point, `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vector<N>>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min = bounds.min.component_min(p);
            bounds.max = bounds.max.component_max(p);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Vector<N> {
        (self.min + self.max) * 0.5
    }

    /// Half-widths along each axis.
    pub fn extent(&self) -> Vector<N> {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, p: Vector<N>) -> bool {
        (0..N).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.component_min(other.min),
            max: self.max.component_max(other.max),
        }
    }
}

impl AlignedBox<3> {
    /// The eight corners; bit `i` of the corner index selects `max` along axis `i`.
    pub fn corners(&self) -> [Vector<3>; 8] {
        std::array::from_fn(|c| {
            let mut p = self.min;
            for i in 0..3 {
                if c & (1 << i) != 0 {
                    p[i] = self.max[i];
                }
            }
            p
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hypersphere<const N: usize> {
    pub center: Vector<N>,
    pub radius: f64,
}

impl<const N: usize> Hypersphere<N> {
    pub fn new(center: Vector<N>, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: Vector<N>) -> bool {
        (p - self.center).squared_length() <= self.radius * self.radius
    }
}

/// The set `{ x : Dot(normal, x) >= constant }`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Halfspace<const N: usize> {
    pub normal: Vector<N>,
    pub constant: f64,
}

impl<const N: usize> Halfspace<N> {
    pub fn new(normal: Vector<N>, constant: f64) -> Self {
        Self { normal, constant }
    }

    /// Halfspace through `point` with the given unit `normal`.
    pub fn from_point(normal: Vector<N>, point: Vector<N>) -> Self {
        Self {
            normal,
            constant: normal.dot(point),
        }
    }

    /// `Dot(normal, p) - constant`, positive inside.
    pub fn signed_distance(&self, p: Vector<N>) -> f64 {
        self.normal.dot(p) - self.constant
    }
}

pub type Line3 = Line<3>;
pub type Ray3 = Ray<3>;
pub type Segment3 = Segment<3>;
pub type Triangle3 = Triangle<3>;
pub type AlignedBox2 = AlignedBox<2>;
pub type AlignedBox3 = AlignedBox<3>;
pub type Circle2 = Hypersphere<2>;
pub type Sphere3 = Hypersphere<3>;
pub type Halfspace3 = Halfspace<3>;
