use approx::assert_relative_eq;
use querythree::{Ellipse2, Ellipsoid3, Error, Vector2, Vector3};

fn rotated_ellipsoid() -> Ellipsoid3 {
    let (s, c) = 0.3f64.sin_cos();
    Ellipsoid3::new(
        Vector3::xyz(1.0, -2.0, 0.5),
        [Vector3::xyz(c, s, 0.0), Vector3::xyz(-s, c, 0.0), Vector3::unit(2)],
        Vector3::xyz(3.0, 2.0, 1.0),
    )
}

#[test]
fn test_coefficient_round_trip() {
    let original = rotated_ellipsoid();
    let coefficients = original.to_coefficients();
    assert_eq!(coefficients.len(), 10);

    let recovered = Ellipsoid3::from_coefficients(&coefficients).expect("coefficients describe an ellipsoid");
    for d in 0..3 {
        assert_relative_eq!(recovered.center[d], original.center[d], epsilon = 1e-10);
    }
    for (a, b) in recovered.to_coefficients().iter().zip(&coefficients) {
        assert_relative_eq!(*a, *b, epsilon = 1e-10);
    }

    // Extents come back sorted by eigenvalue, largest extent first.
    assert_relative_eq!(recovered.extent[0], 3.0, epsilon = 1e-10);
    assert_relative_eq!(recovered.extent[1], 2.0, epsilon = 1e-10);
    assert_relative_eq!(recovered.extent[2], 1.0, epsilon = 1e-10);
}

#[test]
fn test_recovered_shape_contains_same_points() {
    let original = rotated_ellipsoid();
    let recovered = Ellipsoid3::from_coefficients(&original.to_coefficients()).expect("valid ellipsoid");
    for d in 0..3 {
        let tip = original.axis[d] * original.extent[d];
        for (scale, inside) in [(0.99, true), (1.01, false), (-0.99, true), (-1.01, false)] {
            let p = original.center + tip * scale;
            assert_eq!(original.contains(p), inside);
            assert_eq!(recovered.contains(p), inside, "axis {} scale {}", d, scale);
        }
    }
}

#[test]
fn test_scaled_coefficients_are_accepted() {
    let ellipse = Ellipse2::new(Vector2::xy(2.0, 1.0), [Vector2::unit(0), Vector2::unit(1)], Vector2::xy(1.0, 4.0));
    let scaled: Vec<f64> = ellipse.to_coefficients().iter().map(|c| c * -7.5).collect();
    let recovered = Ellipse2::from_coefficients(&scaled).expect("any nonzero scale describes the same ellipse");
    assert_relative_eq!(recovered.center[0], 2.0, epsilon = 1e-12);
    assert_relative_eq!(recovered.center[1], 1.0, epsilon = 1e-12);
    assert_relative_eq!(recovered.extent[0], 4.0, epsilon = 1e-12);
    assert_relative_eq!(recovered.extent[1], 1.0, epsilon = 1e-12);
}

#[test]
fn test_indefinite_quadratic_is_rejected() {
    // x^2 - y^2 + z^2 - 1 = 0
    let coefficients = [-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 1.0];
    let result = Ellipsoid3::from_coefficients(&coefficients);
    assert!(matches!(result, Err(Error::NotPositiveDefinite { .. })), "got {:?}", result);
}

#[test]
fn test_wrong_coefficient_count() {
    assert_eq!(
        Ellipse2::from_coefficients(&[1.0, 2.0]),
        Err(Error::CoefficientCount { expected: 6, actual: 2 })
    );
}
