use crate::vector::{Vector, Vector3};
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// A square `N x N` matrix stored in row-major order.
///
/// Matrices act on column vectors: `m * v`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix<const N: usize>(pub [[f64; N]; N]);

pub type Matrix2 = Matrix<2>;
pub type Matrix3 = Matrix<3>;
pub type Matrix4 = Matrix<4>;

impl<const N: usize> Matrix<N> {
    pub const ZERO: Self = Self([[0.0; N]; N]);

    pub const IDENTITY: Self = {
        let mut m = [[0.0; N]; N];
        let mut i = 0;
        while i < N {
            m[i][i] = 1.0;
            i += 1;
        }
        Self(m)
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_rows(rows: [[f64; N]; N]) -> Self {
        Self(rows)
    }

    pub fn from_diagonal(diagonal: Vector<N>) -> Self {
        let mut m = Self::ZERO;
        for i in 0..N {
            m.0[i][i] = diagonal[i];
        }
        m
    }

    /// `u * v^T`.
    pub fn outer_product(u: Vector<N>, v: Vector<N>) -> Self {
        let mut m = Self::ZERO;
        for r in 0..N {
            for c in 0..N {
                m.0[r][c] = u[r] * v[c];
            }
        }
        m
    }

    pub fn row(&self, r: usize) -> Vector<N> {
        Vector(self.0[r])
    }

    pub fn col(&self, c: usize) -> Vector<N> {
        let mut v = Vector::ZERO;
        for r in 0..N {
            v[r] = self.0[r][c];
        }
        v
    }

    pub fn set_col(&mut self, c: usize, v: Vector<N>) {
        for r in 0..N {
            self.0[r][c] = v[r];
        }
    }

    pub fn transpose(&self) -> Self {
        let mut m = Self::ZERO;
        for r in 0..N {
            for c in 0..N {
                m.0[c][r] = self.0[r][c];
            }
        }
        m
    }

    pub fn scaled(&self, s: f64) -> Self {
        let mut m = *self;
        for row in m.0.iter_mut() {
            for e in row.iter_mut() {
                *e *= s;
            }
        }
        m
    }

    /// Determinant by Gaussian elimination with partial pivoting.
    pub fn determinant(&self) -> f64 {
        let mut a = self.0;
        let mut det = 1.0;
        for col in 0..N {
            let mut pivot = col;
            for r in (col + 1)..N {
                if a[r][col].abs() > a[pivot][col].abs() {
                    pivot = r;
                }
            }
            if a[pivot][col] == 0.0 {
                return 0.0;
            }
            if pivot != col {
                a.swap(pivot, col);
                det = -det;
            }
            det *= a[col][col];
            for r in (col + 1)..N {
                let factor = a[r][col] / a[col][col];
                for c in col..N {
                    a[r][c] -= factor * a[col][c];
                }
            }
        }
        det
    }

    /// Gauss-Jordan inverse with partial pivoting. Returns `None` when a pivot is exactly zero.
    pub fn inverse(&self) -> Option<Self> {
        let mut a = self.0;
        let mut inv = Self::identity().0;
        for col in 0..N {
            let mut pivot = col;
            for r in (col + 1)..N {
                if a[r][col].abs() > a[pivot][col].abs() {
                    pivot = r;
                }
            }
            if a[pivot][col] == 0.0 {
                return None;
            }
            a.swap(pivot, col);
            inv.swap(pivot, col);

            let inv_diag = 1.0 / a[col][col];
            for c in 0..N {
                a[col][c] *= inv_diag;
                inv[col][c] *= inv_diag;
            }

            for r in 0..N {
                if r == col {
                    continue;
                }
                let factor = a[r][col];
                if factor != 0.0 {
                    for c in 0..N {
                        a[r][c] -= factor * a[col][c];
                        inv[r][c] -= factor * inv[col][c];
                    }
                }
            }
        }
        Some(Self(inv))
    }
}

impl Matrix<4> {
    pub fn from_translation(t: Vector3) -> Self {
        let mut m = Self::identity();
        m.0[0][3] = t[0];
        m.0[1][3] = t[1];
        m.0[2][3] = t[2];
        m
    }

    pub fn from_scale(s: Vector3) -> Self {
        Self::from_diagonal(s.lift(1.0))
    }

    /// Rotation by `angle` radians about the unit-length `axis`.
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let [x, y, z] = axis.0;
        Self([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        (*self * p.lift(1.0)).project()
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        (*self * v.lift(0.0)).project()
    }
}

impl<const N: usize> Default for Matrix<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> Index<(usize, usize)> for Matrix<N> {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.0[r][c]
    }
}

impl<const N: usize> IndexMut<(usize, usize)> for Matrix<N> {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.0[r][c]
    }
}

impl<const N: usize> Add for Matrix<N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        for r in 0..N {
            for c in 0..N {
                self.0[r][c] += rhs.0[r][c];
            }
        }
        self
    }
}

impl<const N: usize> Sub for Matrix<N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        for r in 0..N {
            for c in 0..N {
                self.0[r][c] -= rhs.0[r][c];
            }
        }
        self
    }
}

impl<const N: usize> Mul for Matrix<N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut m = Self::ZERO;
        for r in 0..N {
            for c in 0..N {
                let mut sum = 0.0;
                for k in 0..N {
                    sum += self.0[r][k] * rhs.0[k][c];
                }
                m.0[r][c] = sum;
            }
        }
        m
    }
}

impl<const N: usize> Mul<Vector<N>> for Matrix<N> {
    type Output = Vector<N>;

    fn mul(self, v: Vector<N>) -> Vector<N> {
        let mut out = Vector::ZERO;
        for r in 0..N {
            out[r] = self.row(r).dot(v);
        }
        out
    }
}

impl<const N: usize> Mul<f64> for Matrix<N> {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        self.scaled(s)
    }
}

/// Eigendecomposition `M = R * D * R^T` of a symmetric matrix.
///
/// Eigenvalues are sorted in nondecreasing order and the eigenvectors are the matching
/// columns of `eigenvectors`. Computed with cyclic Jacobi sweeps, which is accurate for the
/// small matrices used by the quadric conversions.
#[derive(Clone, Copy, Debug)]
pub struct SymmetricEigen<const N: usize> {
    pub eigenvalues: Vector<N>,
    pub eigenvectors: Matrix<N>,
}

impl<const N: usize> SymmetricEigen<N> {
    pub fn new(m: &Matrix<N>, max_sweeps: usize) -> Self {
        let mut a = m.0;
        let mut v = Matrix::<N>::identity().0;

        let mut norm = 0.0;
        for row in a.iter() {
            for e in row.iter() {
                norm += e * e;
            }
        }
        let tolerance = f64::EPSILON * f64::EPSILON * norm;

        for _ in 0..max_sweeps {
            let mut off = 0.0;
            for p in 0..N {
                for q in (p + 1)..N {
                    off += a[p][q] * a[p][q];
                }
            }
            if off <= tolerance {
                break;
            }

            for p in 0..N {
                for q in (p + 1)..N {
                    let apq = a[p][q];
                    if apq == 0.0 {
                        continue;
                    }
                    let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
                    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                    let c = 1.0 / (t * t + 1.0).sqrt();
                    let s = t * c;

                    for row in a.iter_mut() {
                        let akp = row[p];
                        let akq = row[q];
                        row[p] = c * akp - s * akq;
                        row[q] = s * akp + c * akq;
                    }
                    for k in 0..N {
                        let apk = a[p][k];
                        let aqk = a[q][k];
                        a[p][k] = c * apk - s * aqk;
                        a[q][k] = s * apk + c * aqk;
                    }
                    for row in v.iter_mut() {
                        let vkp = row[p];
                        let vkq = row[q];
                        row[p] = c * vkp - s * vkq;
                        row[q] = s * vkp + c * vkq;
                    }
                }
            }
        }

        let mut order: [usize; N] = std::array::from_fn(|i| i);
        order.sort_by(|&i, &j| a[i][i].partial_cmp(&a[j][j]).unwrap_or(std::cmp::Ordering::Equal));

        let mut eigenvalues = Vector::ZERO;
        let mut eigenvectors = Matrix::ZERO;
        for (dst, &src) in order.iter().enumerate() {
            eigenvalues[dst] = a[src][src];
            for r in 0..N {
                eigenvectors.0[r][dst] = v[r][src];
            }
        }

        Self {
            eigenvalues,
            eigenvectors,
        }
    }

    /// True when the eigenvector matrix is a rotation, false when it is a reflection.
    pub fn is_rotation(&self) -> bool {
        self.eigenvectors.determinant() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_round_trip() {
        let m = Matrix3::from_rows([[4.0, 1.0, 2.0], [0.5, 3.0, -1.0], [2.0, -2.0, 5.0]]);
        let inv = m.inverse().expect("matrix should be invertible");
        let id = m * inv;
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert!((id[(r, c)] - expected).abs() < 1e-12, "entry ({}, {}) = {}", r, c, id[(r, c)]);
            }
        }
    }

    #[test]
    fn test_singular_inverse_is_none() {
        let m = Matrix2::from_rows([[1.0, 2.0], [2.0, 4.0]]);
        assert!(m.inverse().is_none());
        assert_eq!(m.determinant(), 0.0);
    }

    #[test]
    fn test_symmetric_eigen_reconstructs() {
        let m = Matrix3::from_rows([[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 4.0]]);
        let eigen = SymmetricEigen::new(&m, 32);
        assert!(eigen.eigenvalues[0] <= eigen.eigenvalues[1]);
        assert!(eigen.eigenvalues[1] <= eigen.eigenvalues[2]);

        let r = eigen.eigenvectors;
        let rebuilt = r * Matrix3::from_diagonal(eigen.eigenvalues) * r.transpose();
        for i in 0..3 {
            for j in 0..3 {
                assert!((rebuilt[(i, j)] - m[(i, j)]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_axis_angle_rotates_x_to_y() {
        let m = Matrix4::from_axis_angle(Vector3::unit(2), std::f64::consts::FRAC_PI_2);
        let p = m.transform_point(Vector3::xyz(1.0, 0.0, 0.0));
        assert!((p - Vector3::xyz(0.0, 1.0, 0.0)).length() < 1e-12);
    }
}
