use crate::error::Error;
use tracing::debug;

/// Layout of a dense matrix stored in a flat slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StorageOrder {
    #[default]
    RowMajor,
    ColumnMajor,
}

impl StorageOrder {
    /// Flat index of `(row, col)` in a `num_rows x num_cols` matrix.
    #[inline]
    pub fn index(self, row: usize, col: usize, num_rows: usize, num_cols: usize) -> usize {
        match self {
            StorageOrder::RowMajor => row * num_cols + col,
            StorageOrder::ColumnMajor => col * num_rows + row,
        }
    }
}

/// A square matrix that stores only its main diagonal and a fixed number of
/// sub- and super-diagonal bands.
///
/// Band `b` of the lower storage holds the entries `(c + b + 1, c)` and has
/// `size - 1 - b` elements; the upper storage mirrors this for `(r, r + b + 1)`.
/// Everything outside the stored bands is zero and cannot be written.
///
/// The Cholesky routines expect a symmetric positive-definite matrix with
/// equal lower and upper band counts. After a successful factorization the
/// lower bands hold `L` and the upper bands hold `L^T`.
#[derive(Clone, Debug, PartialEq)]
pub struct BandedMatrix {
    size: usize,
    d_band: Vec<f64>,
    l_bands: Vec<Vec<f64>>,
    u_bands: Vec<Vec<f64>>,
}

impl BandedMatrix {
    /// Creates a zero matrix. Fails when `size` is zero or a band count is not smaller than `size`.
    pub fn new(size: usize, num_l_bands: usize, num_u_bands: usize) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::InvalidSize);
        }
        if num_l_bands >= size || num_u_bands >= size {
            return Err(Error::InvalidBandCount {
                size,
                lower: num_l_bands,
                upper: num_u_bands,
            });
        }

        let bands = |count: usize| -> Vec<Vec<f64>> {
            (0..count).map(|b| vec![0.0; size - 1 - b]).collect()
        };

        Ok(Self {
            size,
            d_band: vec![0.0; size],
            l_bands: bands(num_l_bands),
            u_bands: bands(num_u_bands),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_l_bands(&self) -> usize {
        self.l_bands.len()
    }

    pub fn num_u_bands(&self) -> usize {
        self.u_bands.len()
    }

    pub fn d_band(&self) -> &[f64] {
        &self.d_band
    }

    pub fn d_band_mut(&mut self) -> &mut [f64] {
        &mut self.d_band
    }

    pub fn l_bands(&self) -> &[Vec<f64>] {
        &self.l_bands
    }

    pub fn l_bands_mut(&mut self) -> &mut [Vec<f64>] {
        &mut self.l_bands
    }

    pub fn u_bands(&self) -> &[Vec<f64>] {
        &self.u_bands
    }

    pub fn u_bands_mut(&mut self) -> &mut [Vec<f64>] {
        &mut self.u_bands
    }

    /// Reads an entry. Positions outside the stored bands, or outside the matrix, read as zero.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.size || col >= self.size {
            return 0.0;
        }
        if col > row {
            let band = col - row - 1;
            if band < self.u_bands.len() {
                return self.u_bands[band][row];
            }
        } else if row > col {
            let band = row - col - 1;
            if band < self.l_bands.len() {
                return self.l_bands[band][col];
            }
        } else {
            return self.d_band[row];
        }
        0.0
    }

    /// Mutable access to a stored entry, `None` when `(row, col)` is not stored.
    pub fn try_at(&mut self, row: usize, col: usize) -> Option<&mut f64> {
        if row >= self.size || col >= self.size {
            return None;
        }
        if col > row {
            let band = col - row - 1;
            self.u_bands.get_mut(band).map(|b| &mut b[row])
        } else if row > col {
            let band = row - col - 1;
            self.l_bands.get_mut(band).map(|b| &mut b[col])
        } else {
            Some(&mut self.d_band[row])
        }
    }

    /// Writes a stored entry. Returns `false`, leaving the matrix untouched, when
    /// `(row, col)` is not stored.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> bool {
        match self.try_at(row, col) {
            Some(entry) => {
                *entry = value;
                true
            }
            None => false,
        }
    }

    #[inline]
    fn update<F: FnOnce(f64) -> f64>(&mut self, row: usize, col: usize, f: F) {
        if let Some(entry) = self.try_at(row, col) {
            *entry = f(*entry);
        }
    }

    /// In-place Cholesky factorization `A = L L^T`.
    ///
    /// Stops at the first pivot that is not strictly positive; the storage is
    /// partially overwritten in that case.
    pub fn cholesky_factor(&mut self) -> Result<(), Error> {
        if self.l_bands.len() != self.u_bands.len() {
            return Err(Error::AsymmetricBands);
        }

        let size_m1 = self.size - 1;
        let num_bands = self.l_bands.len();
        for i in 0..self.size {
            let j_min = i.saturating_sub(num_bands);
            for j in j_min..i {
                let k_max = (j + num_bands).min(size_m1);
                let lij = self.get(i, j);
                for k in i..=k_max {
                    let lkj = self.get(k, j);
                    self.update(k, i, |v| v - lij * lkj);
                }
            }

            for k in j_min..i {
                let lik = self.get(i, k);
                self.set(k, i, lik);
            }

            let diagonal = self.get(i, i);
            if diagonal <= 0.0 {
                debug!(row = i, diagonal, "cholesky pivot is not positive");
                return Err(Error::NonPositivePivot { row: i });
            }
            let inv_sqrt = 1.0 / diagonal.sqrt();
            let k_max = (i + num_bands).min(size_m1);
            for k in i..=k_max {
                self.update(k, i, |v| v * inv_sqrt);
            }
        }
        Ok(())
    }

    /// Solves `A x = b` in place, overwriting `b` with `x`.
    ///
    /// The matrix is replaced by its Cholesky factor.
    pub fn solve_system(&mut self, b: &mut [f64]) -> Result<(), Error> {
        self.solve_system_matrix(b, 1, StorageOrder::RowMajor)
    }

    /// Solves `A X = B` in place for a `size x num_columns` right-hand side.
    pub fn solve_system_matrix(
        &mut self,
        b: &mut [f64],
        num_columns: usize,
        order: StorageOrder,
    ) -> Result<(), Error> {
        let expected = self.size * num_columns;
        if b.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: b.len(),
            });
        }
        self.cholesky_factor()?;
        self.solve_lower(b, num_columns, order)?;
        self.solve_upper(b, num_columns, order)
    }

    fn solve_lower(&self, data: &mut [f64], num_columns: usize, order: StorageOrder) -> Result<(), Error> {
        let n = self.size;
        let num_bands = self.l_bands.len();
        for r in 0..n {
            let lower_rr = self.get(r, r);
            if lower_rr <= 0.0 {
                debug!(row = r, "forward substitution hit a non-positive pivot");
                return Err(Error::NonPositivePivot { row: r });
            }
            for c in r.saturating_sub(num_bands)..r {
                let lower_rc = self.get(r, c);
                for b_col in 0..num_columns {
                    let src = data[order.index(c, b_col, n, num_columns)];
                    data[order.index(r, b_col, n, num_columns)] -= lower_rc * src;
                }
            }
            let inverse = 1.0 / lower_rr;
            for b_col in 0..num_columns {
                data[order.index(r, b_col, n, num_columns)] *= inverse;
            }
        }
        Ok(())
    }

    fn solve_upper(&self, data: &mut [f64], num_columns: usize, order: StorageOrder) -> Result<(), Error> {
        let n = self.size;
        let num_bands = self.u_bands.len();
        for r in (0..n).rev() {
            let upper_rr = self.get(r, r);
            if upper_rr <= 0.0 {
                debug!(row = r, "back substitution hit a non-positive pivot");
                return Err(Error::NonPositivePivot { row: r });
            }
            let c_max = (r + 1 + num_bands).min(n);
            for c in (r + 1)..c_max {
                let upper_rc = self.get(r, c);
                for b_col in 0..num_columns {
                    let src = data[order.index(c, b_col, n, num_columns)];
                    data[order.index(r, b_col, n, num_columns)] -= upper_rc * src;
                }
            }
            let inverse = 1.0 / upper_rr;
            for b_col in 0..num_columns {
                data[order.index(r, b_col, n, num_columns)] *= inverse;
            }
        }
        Ok(())
    }

    /// Dense inverse by Gauss-Jordan elimination restricted to the bands.
    ///
    /// Works on a copy; fails on the first pivot that is exactly zero.
    pub fn compute_inverse(&self, order: StorageOrder) -> Result<Vec<f64>, Error> {
        let n = self.size;
        let num_l = self.l_bands.len();
        let num_u = self.u_bands.len();
        let at = |r: usize, c: usize| order.index(r, c, n, n);

        let mut tmp = self.clone();
        let mut inv = vec![0.0; n * n];
        for i in 0..n {
            inv[at(i, i)] = 1.0;
        }

        for row in 0..n {
            let diag = tmp.get(row, row);
            if diag == 0.0 {
                debug!(row, "banded inverse hit a zero pivot");
                return Err(Error::ZeroPivot { row });
            }
            let inv_diag = 1.0 / diag;
            tmp.set(row, row, 1.0);

            let col_min = row + 1;
            let col_max = (col_min + num_u).min(n);
            for c in col_min..col_max {
                tmp.update(row, c, |v| v * inv_diag);
            }
            for c in 0..=row {
                inv[at(row, c)] *= inv_diag;
            }

            let row_max = (row + 1 + num_l).min(n);
            for r in (row + 1)..row_max {
                let mult = tmp.get(r, row);
                tmp.set(r, row, 0.0);
                for c in col_min..col_max {
                    let pivot_rc = tmp.get(row, c);
                    tmp.update(r, c, |v| v - mult * pivot_rc);
                }
                for c in 0..=row {
                    let pivot_rc = inv[at(row, c)];
                    inv[at(r, c)] -= mult * pivot_rc;
                }
            }
        }

        for row in (1..n).rev() {
            let row_min = row.saturating_sub(num_u);
            for r in (row_min..row).rev() {
                let mult = tmp.get(r, row);
                tmp.set(r, row, 0.0);
                for c in 0..n {
                    let pivot_rc = inv[at(row, c)];
                    inv[at(r, c)] -= mult * pivot_rc;
                }
            }
        }

        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal(size: usize) -> BandedMatrix {
        let mut m = BandedMatrix::new(size, 1, 1).unwrap();
        for i in 0..size {
            m.set(i, i, 4.0);
            if i + 1 < size {
                m.set(i, i + 1, -1.0);
                m.set(i + 1, i, -1.0);
            }
        }
        m
    }

    #[test]
    fn test_constructor_rejects_bad_bands() {
        assert_eq!(BandedMatrix::new(0, 0, 0), Err(Error::InvalidSize));
        assert!(matches!(BandedMatrix::new(3, 3, 0), Err(Error::InvalidBandCount { .. })));
        assert!(BandedMatrix::new(3, 2, 2).is_ok());
    }

    #[test]
    fn test_band_lengths() {
        let m = BandedMatrix::new(5, 2, 1).unwrap();
        assert_eq!(m.l_bands()[0].len(), 4);
        assert_eq!(m.l_bands()[1].len(), 3);
        assert_eq!(m.u_bands()[0].len(), 4);
    }

    #[test]
    fn test_out_of_band_access_is_none() {
        let mut m = BandedMatrix::new(4, 1, 1).unwrap();
        assert!(m.try_at(0, 2).is_none());
        assert!(m.try_at(3, 0).is_none());
        assert!(m.try_at(4, 4).is_none());
        assert!(!m.set(0, 3, 7.0));
        assert_eq!(m.get(0, 3), 0.0);
        assert!(m.set(1, 2, 7.0));
        assert_eq!(m.get(1, 2), 7.0);
    }

    #[test]
    fn test_cholesky_leaves_transpose_in_upper_bands() {
        let mut m = tridiagonal(5);
        m.cholesky_factor().unwrap();
        for i in 0..4 {
            assert_eq!(m.get(i + 1, i), m.get(i, i + 1));
        }
        assert!((m.get(0, 0) - 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_matrix_fails_to_factor() {
        let mut m = BandedMatrix::new(3, 1, 1).unwrap();
        assert_eq!(m.cholesky_factor(), Err(Error::NonPositivePivot { row: 0 }));
    }

    #[test]
    fn test_asymmetric_bands_fail_to_factor() {
        let mut m = BandedMatrix::new(3, 1, 0).unwrap();
        assert_eq!(m.cholesky_factor(), Err(Error::AsymmetricBands));
    }

    #[test]
    fn test_solve_matches_known_solution() {
        let mut m = tridiagonal(4);
        // A * [1, 2, 3, 4]
        let mut b = vec![2.0, 4.0, 6.0, 13.0];
        m.solve_system(&mut b).unwrap();
        for (i, x) in b.iter().enumerate() {
            assert!((x - (i + 1) as f64).abs() < 1e-12, "x[{}] = {}", i, x);
        }
    }

    #[test]
    fn test_solve_rejects_wrong_length() {
        let mut m = tridiagonal(4);
        let mut b = vec![1.0; 3];
        assert_eq!(
            m.solve_system(&mut b),
            Err(Error::DimensionMismatch { expected: 4, actual: 3 })
        );
    }

    #[test]
    fn test_inverse_zero_pivot() {
        let m = BandedMatrix::new(3, 1, 1).unwrap();
        assert_eq!(m.compute_inverse(StorageOrder::RowMajor), Err(Error::ZeroPivot { row: 0 }));
    }
}
