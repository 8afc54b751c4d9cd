use crate::error::Error;
use crate::matrix::{Matrix, SymmetricEigen};
use crate::vector::Vector;
use tracing::debug;

const EIGEN_SWEEPS: usize = 64;

/// Hyperellipsoid `(X - C)^T M (X - C) = 1` with `M = sum_i U_i U_i^T / e_i^2`.
///
/// `axis` must be orthonormal and every `extent` positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hyperellipsoid<const N: usize> {
    pub center: Vector<N>,
    pub axis: [Vector<N>; N],
    pub extent: Vector<N>,
}

pub type Ellipse2 = Hyperellipsoid<2>;
pub type Ellipsoid3 = Hyperellipsoid<3>;

impl<const N: usize> Hyperellipsoid<N> {
    pub fn new(center: Vector<N>, axis: [Vector<N>; N], extent: Vector<N>) -> Self {
        Self { center, axis, extent }
    }

    /// Unit hypersphere aligned with the coordinate axes.
    pub fn unit() -> Self {
        Self {
            center: Vector::ZERO,
            axis: std::array::from_fn(Vector::unit),
            extent: Vector::splat(1.0),
        }
    }

    /// Length of the coefficient vector used by [`Self::to_coefficients`].
    pub const fn num_coefficients() -> usize {
        (N + 1) * (N + 2) / 2
    }

    /// The shape matrix `M`.
    pub fn m_matrix(&self) -> Matrix<N> {
        let mut m = Matrix::<N>::ZERO;
        for d in 0..N {
            let ratio = self.axis[d] / self.extent[d];
            m = m + Matrix::outer_product(ratio, ratio);
        }
        m
    }

    /// `M^{-1} = sum_i e_i^2 U_i U_i^T`, available in closed form.
    pub fn m_inverse(&self) -> Matrix<N> {
        let mut m = Matrix::<N>::ZERO;
        for d in 0..N {
            let product = self.axis[d] * self.extent[d];
            m = m + Matrix::outer_product(product, product);
        }
        m
    }

    /// `true` when `point` lies on or inside the hyperellipsoid.
    pub fn contains(&self, point: Vector<N>) -> bool {
        let diff = point - self.center;
        diff.dot(self.m_matrix() * diff) <= 1.0
    }

    /// The quadratic `X^T A X + B^T X + C = 0` with `A = M`, `B = -2 M K`,
    /// `C = K^T M K - 1`.
    pub fn to_quadratic(&self) -> (Matrix<N>, Vector<N>, f64) {
        let a = self.m_matrix();
        let product = a * self.center;
        let b = product * -2.0;
        let c = product.dot(self.center) - 1.0;
        (a, b, c)
    }

    /// Recovers center, axes and extents from a quadratic equation.
    ///
    /// `a` must be symmetric. Fails when `a` is singular, when the derived right side is
    /// zero or when the normalized matrix is not positive definite.
    pub fn from_quadratic(a: &Matrix<N>, b: Vector<N>, c: f64) -> Result<Self, Error> {
        let Some(inv_a) = a.inverse() else {
            debug!("quadratic form matrix is singular");
            return Err(Error::SingularQuadratic);
        };

        let center = (inv_a * b) * -0.5;

        let right_side = -0.5 * center.dot(b) - c;
        if right_side == 0.0 {
            debug!("quadric right side is zero");
            return Err(Error::ZeroRightSide);
        }

        let m = a.scaled(1.0 / right_side);
        let eigen = SymmetricEigen::new(&m, EIGEN_SWEEPS);
        let mut rotation = eigen.eigenvectors;
        if N > 0 && !eigen.is_rotation() {
            let last = rotation.col(N - 1);
            rotation.set_col(N - 1, -last);
        }

        let mut axis = [Vector::<N>::ZERO; N];
        let mut extent = Vector::<N>::ZERO;
        for d in 0..N {
            let eigenvalue = eigen.eigenvalues[d];
            if eigenvalue <= 0.0 {
                debug!(eigenvalue, "quadratic form is not positive definite");
                return Err(Error::NotPositiveDefinite { eigenvalue });
            }
            extent[d] = 1.0 / eigenvalue.sqrt();
            axis[d] = rotation.col(d);
        }

        Ok(Self { center, axis, extent })
    }

    /// Coefficient vector `[C, B_0 .. B_{N-1}, A_00, 2 A_01, .., A_11, 2 A_12, ..]`,
    /// scaled so that the largest diagonal coefficient in magnitude is exactly 1.
    pub fn to_coefficients(&self) -> Vec<f64> {
        let (a, b, c) = self.to_quadratic();
        let mut coefficients = Vec::with_capacity(Self::num_coefficients());
        coefficients.push(c);
        coefficients.extend_from_slice(b.as_array());

        let mut max_index = 0;
        let mut max_value = 0.0;
        for r in 0..N {
            for col in r..N {
                if col == r {
                    let value = a[(r, r)];
                    if value.abs() > max_value {
                        max_value = value.abs();
                        max_index = coefficients.len();
                    }
                    coefficients.push(value);
                } else {
                    coefficients.push(2.0 * a[(r, col)]);
                }
            }
        }

        if max_value > 0.0 {
            let inv_max = 1.0 / max_value;
            for (i, coefficient) in coefficients.iter_mut().enumerate() {
                if i == max_index {
                    *coefficient = 1.0;
                } else {
                    *coefficient *= inv_max;
                }
            }
        }
        coefficients
    }

    /// Inverse of [`Self::to_coefficients`]; any nonzero scale of the coefficients is accepted.
    pub fn from_coefficients(coefficients: &[f64]) -> Result<Self, Error> {
        let expected = Self::num_coefficients();
        if coefficients.len() != expected {
            return Err(Error::CoefficientCount {
                expected,
                actual: coefficients.len(),
            });
        }

        let c = coefficients[0];
        let mut b = Vector::<N>::ZERO;
        b.0.copy_from_slice(&coefficients[1..=N]);

        let mut a = Matrix::<N>::ZERO;
        let mut k = N + 1;
        for r in 0..N {
            for col in r..N {
                if col == r {
                    a[(r, r)] = coefficients[k];
                } else {
                    let half = 0.5 * coefficients[k];
                    a[(r, col)] = half;
                    a[(col, r)] = half;
                }
                k += 1;
            }
        }

        Self::from_quadratic(&a, b, c)
    }
}
