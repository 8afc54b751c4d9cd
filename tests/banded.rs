use approx::assert_relative_eq;
use querythree::{BandedMatrix, Error, StorageOrder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZE: usize = 8;
const BANDS: usize = 2;

/// Random diagonally dominant symmetric matrix, returned in banded and dense row-major form.
fn random_spd(seed: u64) -> (BandedMatrix, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut banded = BandedMatrix::new(SIZE, BANDS, BANDS).expect("valid band counts");
    let mut dense = vec![0.0; SIZE * SIZE];
    for r in 0..SIZE {
        for c in (r + 1)..(r + 1 + BANDS).min(SIZE) {
            let value: f64 = rng.gen_range(-1.0..1.0);
            dense[r * SIZE + c] = value;
            dense[c * SIZE + r] = value;
        }
    }
    for r in 0..SIZE {
        let off: f64 = (0..SIZE).filter(|&c| c != r).map(|c| dense[r * SIZE + c].abs()).sum();
        dense[r * SIZE + r] = off + rng.gen_range(0.5..2.0);
    }
    for r in 0..SIZE {
        for c in 0..SIZE {
            if dense[r * SIZE + c] != 0.0 {
                assert!(banded.set(r, c, dense[r * SIZE + c]), "({}, {}) should be stored", r, c);
            }
        }
    }
    (banded, dense)
}

fn dense_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; SIZE * SIZE];
    for r in 0..SIZE {
        for c in 0..SIZE {
            out[r * SIZE + c] = (0..SIZE).map(|k| a[r * SIZE + k] * b[k * SIZE + c]).sum();
        }
    }
    out
}

#[test]
fn test_inverse_reproduces_identity() {
    for seed in 0..10 {
        let (banded, dense) = random_spd(seed);
        let inverse = banded.compute_inverse(StorageOrder::RowMajor).expect("matrix is invertible");
        let product = dense_mul(&dense, &inverse);
        for r in 0..SIZE {
            for c in 0..SIZE {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_relative_eq!(product[r * SIZE + c], expected, epsilon = 1e-10);
            }
        }
    }
}

#[test]
fn test_column_major_inverse_is_transpose_of_row_major() {
    let (banded, _) = random_spd(42);
    let row_major = banded.compute_inverse(StorageOrder::RowMajor).expect("invertible");
    let column_major = banded.compute_inverse(StorageOrder::ColumnMajor).expect("invertible");
    for r in 0..SIZE {
        for c in 0..SIZE {
            assert_eq!(row_major[r * SIZE + c], column_major[c * SIZE + r]);
        }
    }
}

#[test]
fn test_solve_matches_dense_product() {
    let mut rng = StdRng::seed_from_u64(3);
    let (mut banded, dense) = random_spd(3);
    let x: Vec<f64> = (0..SIZE).map(|_| rng.gen_range(-5.0..5.0)).collect();
    let mut b: Vec<f64> = (0..SIZE)
        .map(|r| (0..SIZE).map(|c| dense[r * SIZE + c] * x[c]).sum())
        .collect();

    banded.solve_system(&mut b).expect("matrix is positive definite");
    for (solved, expected) in b.iter().zip(&x) {
        assert_relative_eq!(*solved, *expected, epsilon = 1e-10);
    }
}

#[test]
fn test_solve_with_identity_right_side_gives_inverse() {
    let (banded, dense) = random_spd(11);
    for order in [StorageOrder::RowMajor, StorageOrder::ColumnMajor] {
        let mut m = banded.clone();
        let mut b = vec![0.0; SIZE * SIZE];
        for i in 0..SIZE {
            b[i * SIZE + i] = 1.0;
        }
        m.solve_system_matrix(&mut b, SIZE, order).expect("matrix is positive definite");
        // The inverse of a symmetric matrix is symmetric, so either order reads the same.
        let product = dense_mul(&dense, &b);
        for r in 0..SIZE {
            for c in 0..SIZE {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_relative_eq!(product[r * SIZE + c], expected, epsilon = 1e-10);
            }
        }
    }
}

#[test]
fn test_zero_matrix_fails_cleanly() {
    let mut zero = BandedMatrix::new(SIZE, BANDS, BANDS).expect("valid band counts");
    assert_eq!(zero.cholesky_factor(), Err(Error::NonPositivePivot { row: 0 }));

    let mut zero = BandedMatrix::new(SIZE, BANDS, BANDS).expect("valid band counts");
    let mut b = vec![1.0; SIZE];
    assert!(zero.solve_system(&mut b).is_err());
}

#[test]
fn test_negative_pivot_fails() {
    let mut m = BandedMatrix::new(3, 1, 1).expect("valid band counts");
    m.set(0, 0, 1.0);
    m.set(1, 1, -4.0);
    m.set(2, 2, 1.0);
    assert_eq!(m.cholesky_factor(), Err(Error::NonPositivePivot { row: 1 }));
}

#[test]
fn test_out_of_band_writes_do_not_alias() {
    let mut m = BandedMatrix::new(SIZE, 1, 1).expect("valid band counts");
    assert!(m.try_at(0, 5).is_none());
    assert!(!m.set(0, 5, 9.0));
    assert_eq!(m.get(0, 5), 0.0);
    assert_eq!(m.get(6, 1), 0.0);
    *m.try_at(3, 4).expect("in band") = 2.5;
    assert_eq!(m.get(3, 4), 2.5);
    assert_eq!(m.get(4, 3), 0.0);
}
