// ABOUTME: Integration tests for least-squares fitting and perpendicular-distance search
// ABOUTME: Covers degenerate inputs, exact fits, cubic recovery, and D-max peak location
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_training_engine::errors::ErrorCode;
use pierre_training_engine::intelligence::curve_fitting::{
    linear_regression, max_perpendicular_distance, polynomial_regression3, r_squared, DataPoint,
    LinearFit,
};

#[test]
fn test_linear_regression_degenerate_inputs_return_zero_fit() {
    assert_eq!(linear_regression(&[]), LinearFit::default());
    assert_eq!(
        linear_regression(&[DataPoint::new(3.0, 4.0)]),
        LinearFit::default()
    );

    // Zero variance in x
    let vertical = [DataPoint::new(2.0, 1.0), DataPoint::new(2.0, 5.0)];
    assert_eq!(linear_regression(&vertical), LinearFit::default());
}

#[test]
fn test_linear_regression_exact_line() {
    let points: Vec<DataPoint> = (0..6)
        .map(|i| {
            let x = f64::from(i);
            DataPoint::new(x, 2.0f64.mul_add(x, 1.0))
        })
        .collect();
    let fit = linear_regression(&points);

    assert!((fit.slope - 2.0).abs() < 1e-12);
    assert!((fit.intercept - 1.0).abs() < 1e-12);
    assert!((fit.r_squared - 1.0).abs() < 1e-12);
    assert!((fit.solve_for_x(7.0).unwrap() - 3.0).abs() < 1e-12);
}

#[test]
fn test_cubic_recovers_known_polynomial() {
    // y = 0.05x³ - 0.2x² + 0.3x + 1
    let curve = |x: f64| 0.05f64.mul_add(x.powi(3), (-0.2f64).mul_add(x * x, 0.3f64.mul_add(x, 1.0)));
    let points: Vec<DataPoint> = (0..8)
        .map(|i| {
            let x = f64::from(i);
            DataPoint::new(x, curve(x))
        })
        .collect();

    let fit = polynomial_regression3(&points).unwrap();
    for point in &points {
        assert!((fit.evaluate(point.x) - point.y).abs() < 1e-6);
    }
    assert!(r_squared(&points, |x| fit.evaluate(x)) > 0.999_999);
}

#[test]
fn test_cubic_needs_four_points() {
    let points = [
        DataPoint::new(1.0, 1.0),
        DataPoint::new(2.0, 2.0),
        DataPoint::new(3.0, 4.0),
    ];
    let error = polynomial_regression3(&points).unwrap_err();
    assert_eq!(error.code, ErrorCode::InsufficientData);
}

#[test]
fn test_perpendicular_peak_of_parabola_below_chord() {
    // y = x² on [0, 2]; chord y = 2x; the furthest point is x = 1
    let chord = LinearFit::through(DataPoint::new(0.0, 0.0), DataPoint::new(2.0, 4.0));
    let peak = max_perpendicular_distance(|x| x * x, &chord, 0.0, 2.0, 999).unwrap();

    assert!((peak.x - 1.0).abs() < 0.01);
    assert!(peak.x > 0.0 && peak.x < 2.0);
    assert!(peak.distance > 0.0);
}
