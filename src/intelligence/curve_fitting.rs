// ABOUTME: Least-squares curve fitting for threshold and load-velocity models
// ABOUTME: Linear and cubic regression, R-squared, and the perpendicular-distance grid search used by D-max
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Curve Fitting
//!
//! Pure numerical helpers shared by the critical velocity model, the lactate
//! D-max extractor and the load-velocity profiler.
//!
//! The cubic fit works on centred and scaled abscissae so that the normal
//! equations stay well conditioned for intensities in the 10-20 km/h or
//! 100-400 W range, then expands the coefficients back to raw `x`.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Pivot magnitude below which the normal equations are treated as singular
const SINGULAR_PIVOT: f64 = 1e-12;

/// Number of coefficients in a cubic polynomial
const CUBIC_TERMS: usize = 4;

/// A single `(x, y)` observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Independent variable
    pub x: f64,
    /// Dependent variable
    pub y: f64,
}

impl DataPoint {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Least-squares straight line `y = slope·x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearFit {
    /// Slope of the line
    pub slope: f64,
    /// Y-intercept of the line
    pub intercept: f64,
    /// Coefficient of determination (0-1)
    pub r_squared: f64,
}

impl LinearFit {
    /// Chord through two points (`r_squared` is 1 by construction)
    #[must_use]
    pub fn through(start: DataPoint, end: DataPoint) -> Self {
        let dx = end.x - start.x;
        if dx.abs() < f64::EPSILON {
            return Self::default();
        }
        let slope = (end.y - start.y) / dx;
        Self {
            slope,
            intercept: slope.mul_add(-start.x, start.y),
            r_squared: 1.0,
        }
    }

    /// Value of the line at `x`
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }

    /// `x` at which the line reaches `y`, if the line is not flat
    #[must_use]
    pub fn solve_for_x(&self, y: f64) -> Option<f64> {
        if self.slope.abs() < f64::EPSILON {
            return None;
        }
        Some((y - self.intercept) / self.slope)
    }
}

/// Cubic polynomial `y = a·x³ + b·x² + c·x + d`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicFit {
    /// Cubic coefficient
    pub a: f64,
    /// Quadratic coefficient
    pub b: f64,
    /// Linear coefficient
    pub c: f64,
    /// Constant term
    pub d: f64,
}

impl CubicFit {
    /// Value of the polynomial at `x` (Horner form)
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.a.mul_add(x, self.b).mul_add(x, self.c).mul_add(x, self.d)
    }
}

/// Location and size of the largest gap between a chord and a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerpendicularPeak {
    /// Abscissa of the maximum
    pub x: f64,
    /// Signed perpendicular distance; positive when the curve lies below the chord
    pub distance: f64,
}

/// Ordinary least-squares straight line
///
/// Degenerate input (fewer than two points or no spread in `x`) yields an
/// all-zero fit rather than an error so callers can classify the result.
#[must_use]
pub fn linear_regression(points: &[DataPoint]) -> LinearFit {
    if points.len() < 2 {
        return LinearFit::default();
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    let (sxx, sxy, syy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), p| {
        let dx = p.x - mean_x;
        let dy = p.y - mean_y;
        (dx.mul_add(dx, sxx), dx.mul_add(dy, sxy), dy.mul_add(dy, syy))
    });

    if sxx.abs() < f64::EPSILON {
        return LinearFit::default();
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);
    let r_squared = if syy.abs() < f64::EPSILON {
        // Perfectly flat data is perfectly explained by a flat line
        1.0
    } else {
        (sxy * sxy / (sxx * syy)).clamp(0.0, 1.0)
    };

    LinearFit {
        slope,
        intercept,
        r_squared,
    }
}

/// Least-squares cubic polynomial
///
/// # Errors
///
/// Returns `InsufficientData` for fewer than four points and
/// `ModelFitFailed` when the normal equations are singular (for example when
/// fewer than four distinct `x` values are present).
pub fn polynomial_regression3(points: &[DataPoint]) -> AppResult<CubicFit> {
    if points.len() < CUBIC_TERMS {
        return Err(AppError::insufficient_data(
            CUBIC_TERMS,
            points.len(),
            "cubic regression",
        ));
    }

    let n = points.len() as f64;
    let center = points.iter().map(|p| p.x).sum::<f64>() / n;
    let scale = points
        .iter()
        .map(|p| (p.x - center).abs())
        .fold(0.0_f64, f64::max);
    if scale < f64::EPSILON {
        return Err(AppError::model_fit_failed(
            "Cubic regression requires spread in the independent variable",
        ));
    }

    // Normal equations in the scaled variable u = (x - center) / scale
    let mut matrix = [[0.0_f64; CUBIC_TERMS + 1]; CUBIC_TERMS];
    for point in points {
        let u = (point.x - center) / scale;
        let powers = [1.0, u, u * u, u * u * u];
        for (row, &pr) in powers.iter().enumerate() {
            for (col, &pc) in powers.iter().enumerate() {
                matrix[row][col] += pr * pc;
            }
            matrix[row][CUBIC_TERMS] += pr * point.y;
        }
    }

    let scaled = solve_gaussian(matrix)?;
    Ok(expand_scaled_cubic(&scaled, center, scale))
}

/// Coefficient of determination of any fitted model over `points`
///
/// A constant response is reported as 1 when the model reproduces it exactly
/// and 0 otherwise.
pub fn r_squared<F>(points: &[DataPoint], model: F) -> f64
where
    F: Fn(f64) -> f64,
{
    if points.is_empty() {
        return 0.0;
    }
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64;
    let (ss_res, ss_tot) = points.iter().fold((0.0, 0.0), |(res, tot), p| {
        let residual = p.y - model(p.x);
        let deviation = p.y - mean_y;
        (
            residual.mul_add(residual, res),
            deviation.mul_add(deviation, tot),
        )
    });

    if ss_tot.abs() < f64::EPSILON {
        return if ss_res.abs() < f64::EPSILON { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Interior grid search for the point where `curve` sits furthest below `line`
///
/// Evaluates `steps` points strictly between `from` and `to` (the endpoints
/// themselves are never candidates) and returns the one with the largest
/// signed perpendicular distance `(line(x) - curve(x)) / sqrt(1 + slope²)`.
/// Returns `None` for an empty grid or an empty interval.
pub fn max_perpendicular_distance<F>(
    curve: F,
    line: &LinearFit,
    from: f64,
    to: f64,
    steps: usize,
) -> Option<PerpendicularPeak>
where
    F: Fn(f64) -> f64,
{
    if steps == 0 || to <= from {
        return None;
    }

    let norm = line.slope.mul_add(line.slope, 1.0).sqrt();
    let step = (to - from) / (steps + 1) as f64;

    (1..=steps)
        .map(|i| {
            let x = step.mul_add(i as f64, from);
            PerpendicularPeak {
                x,
                distance: (line.evaluate(x) - curve(x)) / norm,
            }
        })
        .fold(None, |best: Option<PerpendicularPeak>, candidate| match best {
            Some(current) if current.distance >= candidate.distance => Some(current),
            _ => Some(candidate),
        })
}

/// Solve an augmented `4 x 5` system with partial pivoting
fn solve_gaussian(
    mut matrix: [[f64; CUBIC_TERMS + 1]; CUBIC_TERMS],
) -> AppResult<[f64; CUBIC_TERMS]> {
    for col in 0..CUBIC_TERMS {
        let pivot_row = (col..CUBIC_TERMS)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .unwrap_or(col);
        if matrix[pivot_row][col].abs() < SINGULAR_PIVOT {
            return Err(AppError::model_fit_failed(
                "Cubic regression normal equations are singular; supply at least four distinct intensities",
            ));
        }
        matrix.swap(col, pivot_row);

        for row in (col + 1)..CUBIC_TERMS {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..=CUBIC_TERMS {
                matrix[row][k] -= factor * matrix[col][k];
            }
        }
    }

    let mut solution = [0.0_f64; CUBIC_TERMS];
    for row in (0..CUBIC_TERMS).rev() {
        let tail: f64 = ((row + 1)..CUBIC_TERMS)
            .map(|k| matrix[row][k] * solution[k])
            .sum();
        solution[row] = (matrix[row][CUBIC_TERMS] - tail) / matrix[row][row];
    }
    Ok(solution)
}

/// Expand `Σ p_k·((x - center)/scale)^k` into raw cubic coefficients
fn expand_scaled_cubic(scaled: &[f64; CUBIC_TERMS], center: f64, scale: f64) -> CubicFit {
    let q0 = scaled[0];
    let q1 = scaled[1] / scale;
    let q2 = scaled[2] / (scale * scale);
    let q3 = scaled[3] / (scale * scale * scale);
    let h = center;

    CubicFit {
        a: q3,
        b: q2 - 3.0 * q3 * h,
        c: q1 - 2.0 * q2 * h + 3.0 * q3 * h * h,
        d: q0 - q1 * h + q2 * h * h - q3 * h * h * h,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_linear_regression_exact_line() {
        let points: Vec<DataPoint> = (0..5)
            .map(|i| {
                let x = f64::from(i);
                DataPoint::new(x, 2.0f64.mul_add(x, 1.0))
            })
            .collect();
        let fit = linear_regression(&points);

        assert!(approx_eq(fit.slope, 2.0, 1e-9));
        assert!(approx_eq(fit.intercept, 1.0, 1e-9));
        assert!(approx_eq(fit.r_squared, 1.0, 1e-9));
    }

    #[test]
    fn test_linear_regression_degenerate_inputs() {
        assert_eq!(linear_regression(&[]), LinearFit::default());
        assert_eq!(
            linear_regression(&[DataPoint::new(1.0, 5.0)]),
            LinearFit::default()
        );
        assert_eq!(
            linear_regression(&[DataPoint::new(2.0, 1.0), DataPoint::new(2.0, 3.0)]),
            LinearFit::default()
        );
    }

    #[test]
    fn test_cubic_recovers_known_polynomial() {
        // y = 0.01x³ - 0.3x² + 3x - 8 over a lactate-like intensity range
        let truth = CubicFit {
            a: 0.01,
            b: -0.3,
            c: 3.0,
            d: -8.0,
        };
        let points: Vec<DataPoint> = (10..=20)
            .map(|i| {
                let x = f64::from(i);
                DataPoint::new(x, truth.evaluate(x))
            })
            .collect();

        let fit = polynomial_regression3(&points).unwrap();
        assert!(approx_eq(fit.a, truth.a, 1e-6));
        assert!(approx_eq(fit.b, truth.b, 1e-5));
        assert!(approx_eq(fit.c, truth.c, 1e-4));
        assert!(approx_eq(fit.d, truth.d, 1e-3));
        assert!(approx_eq(r_squared(&points, |x| fit.evaluate(x)), 1.0, 1e-9));
    }

    #[test]
    fn test_cubic_rejects_insufficient_or_singular_input() {
        let three = [
            DataPoint::new(1.0, 1.0),
            DataPoint::new(2.0, 2.0),
            DataPoint::new(3.0, 3.0),
        ];
        assert!(polynomial_regression3(&three).is_err());

        let repeated = [
            DataPoint::new(1.0, 1.0),
            DataPoint::new(1.0, 2.0),
            DataPoint::new(2.0, 3.0),
            DataPoint::new(2.0, 4.0),
        ];
        assert!(polynomial_regression3(&repeated).is_err());
    }

    #[test]
    fn test_perpendicular_search_is_interior() {
        // Parabola below the chord from (0,0) to (2,4): max gap at x = 1
        let chord = LinearFit::through(DataPoint::new(0.0, 0.0), DataPoint::new(2.0, 4.0));
        let peak = max_perpendicular_distance(|x| x * x, &chord, 0.0, 2.0, 999).unwrap();

        assert!(peak.x > 0.0 && peak.x < 2.0);
        assert!(approx_eq(peak.x, 1.0, 1e-2));
        assert!(peak.distance > 0.0);
        assert!(max_perpendicular_distance(|x| x, &chord, 1.0, 1.0, 10).is_none());
    }
}
