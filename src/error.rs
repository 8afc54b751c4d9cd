use thiserror::Error;

/// Recoverable failures reported by the solver, the quadric conversions and the scene.
///
/// Contract violations (a malformed ray interval, a leaf without positions) are not
/// represented here; they panic at the call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("banded matrix size must be positive")]
    InvalidSize,

    #[error("band counts ({lower}, {upper}) must be smaller than the matrix size {size}")]
    InvalidBandCount { size: usize, lower: usize, upper: usize },

    #[error("Cholesky factorization requires equal lower and upper band counts")]
    AsymmetricBands,

    #[error("non-positive pivot at row {row}")]
    NonPositivePivot { row: usize },

    #[error("zero pivot at row {row}")]
    ZeroPivot { row: usize },

    #[error("right-hand side has length {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("expected {expected} quadric coefficients, got {actual}")]
    CoefficientCount { expected: usize, actual: usize },

    #[error("quadratic form matrix is singular")]
    SingularQuadratic,

    #[error("quadric right side is zero")]
    ZeroRightSide,

    #[error("quadratic form is not positive definite (eigenvalue {eigenvalue})")]
    NotPositiveDefinite { eigenvalue: f64 },

    #[error("world transform is not invertible")]
    SingularTransform,
}
