use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// A fixed-size vector of `f64` components.
///
/// Vectors are plain values: they are `Copy`, compared componentwise and never shared.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<const N: usize>(pub [f64; N]);

pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;
pub type Vector4 = Vector<4>;

impl<const N: usize> Vector<N> {
    pub const ZERO: Self = Self([0.0; N]);

    pub const fn new(components: [f64; N]) -> Self {
        Self(components)
    }

    /// The standard basis vector along axis `d`.
    pub fn unit(d: usize) -> Self {
        let mut v = Self::ZERO;
        v.0[d] = 1.0;
        v
    }

    pub fn splat(value: f64) -> Self {
        Self([value; N])
    }

    pub fn dot(self, rhs: Self) -> f64 {
        let mut sum = 0.0;
        for i in 0..N {
            sum += self.0[i] * rhs.0[i];
        }
        sum
    }

    pub fn squared_length(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.squared_length().sqrt()
    }

    /// Normalizes in place and returns the length the vector had before.
    ///
    /// A zero-length vector stays zero and `0.0` is returned.
    pub fn normalize(&mut self) -> f64 {
        let length = self.length();
        if length > 0.0 {
            *self /= length;
        } else {
            *self = Self::ZERO;
        }
        length
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Applies `f` to every component.
    pub fn map<F: Fn(f64) -> f64>(self, f: F) -> Self {
        let mut out = self;
        for c in out.0.iter_mut() {
            *c = f(*c);
        }
        out
    }

    pub fn component_min(self, rhs: Self) -> Self {
        let mut out = self;
        for i in 0..N {
            out.0[i] = self.0[i].min(rhs.0[i]);
        }
        out
    }

    pub fn component_max(self, rhs: Self) -> Self {
        let mut out = self;
        for i in 0..N {
            out.0[i] = self.0[i].max(rhs.0[i]);
        }
        out
    }

    pub fn as_array(&self) -> &[f64; N] {
        &self.0
    }
}

impl Vector<2> {
    pub const fn xy(x: f64, y: f64) -> Self {
        Self([x, y])
    }
}

impl Vector<3> {
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self([
            self.0[1] * rhs.0[2] - self.0[2] * rhs.0[1],
            self.0[2] * rhs.0[0] - self.0[0] * rhs.0[2],
            self.0[0] * rhs.0[1] - self.0[1] * rhs.0[0],
        ])
    }

    /// `Dot(self, Cross(v1, v2))`, the triple product.
    pub fn dot_cross(self, v1: Self, v2: Self) -> f64 {
        self.dot(v1.cross(v2))
    }

    /// Homogeneous lift: `(x, y, z) -> (x, y, z, w)`.
    pub fn lift(self, w: f64) -> Vector4 {
        Vector([self.0[0], self.0[1], self.0[2], w])
    }
}

impl Vector<4> {
    pub const fn xyzw(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self([x, y, z, w])
    }

    /// Homogeneous projection: drops the last component.
    pub fn project(self) -> Vector3 {
        Vector([self.0[0], self.0[1], self.0[2]])
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[f64; N]> for Vector<N> {
    fn from(components: [f64; N]) -> Self {
        Self(components)
    }
}

impl<const N: usize> From<Vector<N>> for [f64; N] {
    fn from(v: Vector<N>) -> Self {
        v.0
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const N: usize> SubAssign for Vector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.0[i] -= rhs.0[i];
        }
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|c| -c)
    }
}

impl<const N: usize> Mul<f64> for Vector<N> {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self {
        self *= rhs;
        self
    }
}

impl<const N: usize> Mul<Vector<N>> for f64 {
    type Output = Vector<N>;

    fn mul(self, rhs: Vector<N>) -> Vector<N> {
        rhs * self
    }
}

impl<const N: usize> MulAssign<f64> for Vector<N> {
    fn mul_assign(&mut self, rhs: f64) {
        for c in self.0.iter_mut() {
            *c *= rhs;
        }
    }
}

impl<const N: usize> Div<f64> for Vector<N> {
    type Output = Self;

    fn div(mut self, rhs: f64) -> Self {
        self /= rhs;
        self
    }
}

impl<const N: usize> DivAssign<f64> for Vector<N> {
    fn div_assign(&mut self, rhs: f64) {
        for c in self.0.iter_mut() {
            *c /= rhs;
        }
    }
}
