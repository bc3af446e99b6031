// ABOUTME: Critical velocity estimation from 2-4 maximal running trials
// ABOUTME: Linear distance-time model giving CV (LT2 speed proxy) and D' (finite work capacity)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{Assessment, FieldTestResult, FieldTestType, ProtocolMetrics, RETEST_GUIDANCE};
use crate::config::FieldTestConfig;
use crate::errors::{AppError, AppResult};
use crate::intelligence::curve_fitting::{linear_regression, DataPoint, LinearFit};
use crate::intelligence::physiological_constants::critical_velocity as cv_constants;
use crate::models::{format_pace, Confidence, ThresholdEstimate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One maximal effort
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalVelocityTrial {
    /// Distance covered (m)
    pub distance_m: f64,
    /// Time taken (seconds)
    pub time_seconds: f64,
}

/// Set of maximal trials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalVelocityInput {
    /// Two to four trials of different durations
    pub trials: Vec<CriticalVelocityTrial>,
}

/// Analyze critical velocity trials
///
/// Fits `distance = CV·time + D'` by least squares. CV approximates the
/// speed at LT2; D' is the distance that can be covered above CV.
///
/// # Errors
///
/// Returns an error if fewer than two or more than four trials are supplied
pub fn analyze(input: &CriticalVelocityInput, config: &FieldTestConfig) -> AppResult<FieldTestResult> {
    let count = input.trials.len();
    if !(cv_constants::MIN_TRIALS..=cv_constants::MAX_TRIALS).contains(&count) {
        return Err(AppError::invalid_input(format!(
            "Critical velocity requires {}-{} trials, got {count}",
            cv_constants::MIN_TRIALS,
            cv_constants::MAX_TRIALS
        ))
        .with_field("trials"));
    }

    let mut trials = input.trials.clone();
    trials.sort_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds));

    let cap = if count == cv_constants::MIN_TRIALS {
        Confidence::Medium
    } else {
        Confidence::VeryHigh
    };
    let mut assessment = Assessment::new(cap);
    check_trial_design(&trials, &mut assessment);

    let points: Vec<DataPoint> = trials
        .iter()
        .map(|t| DataPoint::new(t.time_seconds, t.distance_m))
        .collect();
    let fit = if assessment.is_valid() {
        linear_regression(&points)
    } else {
        LinearFit::default()
    };
    let critical_velocity = fit.slope;
    let d_prime = fit.intercept;
    debug!(critical_velocity, d_prime, r_squared = fit.r_squared, "Critical velocity fitted");

    if assessment.is_valid() {
        check_fit_quality(&fit, config, &mut assessment);
    }

    let lt2 = ThresholdEstimate::from_speed(critical_velocity, None);
    let recommendations = if assessment.is_valid() {
        let mut recs = vec![
            format!(
                "Set threshold (LT2) pace to {} (critical velocity {critical_velocity:.2} m/s)",
                format_pace(lt2.pace_sec_per_km)
            ),
            format!("D' of {d_prime:.0} m is available above critical velocity for finishing surges"),
        ];
        if count == cv_constants::MIN_TRIALS {
            recs.push(
                "Add a third trial between the existing durations to confirm the model".to_owned(),
            );
        }
        recs.push(RETEST_GUIDANCE.to_owned());
        recs
    } else {
        vec![format!(
            "Repeat with trials of clearly different duration (e.g. 3 and 12 minutes), at least {:.0} s apart",
            cv_constants::MIN_DURATION_GAP_SECONDS
        )]
    };

    Ok(assessment.finish(
        FieldTestType::CriticalVelocity,
        None,
        Some(lt2),
        recommendations,
        ProtocolMetrics::CriticalVelocity {
            critical_velocity_mps: critical_velocity,
            d_prime_m: d_prime,
            r_squared: fit.r_squared,
            trial_count: count,
        },
    ))
}

/// Hard violations in the trial set; `trials` is sorted by time
fn check_trial_design(trials: &[CriticalVelocityTrial], assessment: &mut Assessment) {
    for (index, trial) in trials.iter().enumerate() {
        if !(trial.time_seconds > 0.0 && trial.distance_m > 0.0) {
            assessment.fail(format!(
                "Trial {} has a non-positive time or distance ({} m in {} s)",
                index + 1,
                trial.distance_m,
                trial.time_seconds
            ));
        }
    }
    if !assessment.is_valid() {
        return;
    }

    for pair in trials.windows(2) {
        let gap = pair[1].time_seconds - pair[0].time_seconds;
        if gap < cv_constants::MIN_DURATION_GAP_SECONDS {
            assessment.fail(format!(
                "Trials of {:.0} s and {:.0} s are only {gap:.0} s apart (minimum {:.0} s)",
                pair[0].time_seconds,
                pair[1].time_seconds,
                cv_constants::MIN_DURATION_GAP_SECONDS
            ));
        }
    }

    if let (Some(shortest), Some(longest)) = (trials.first(), trials.last()) {
        if longest.time_seconds < shortest.time_seconds * cv_constants::MIN_DURATION_RATIO {
            assessment.fail(format!(
                "Longest trial ({:.0} s) must be at least {}x the shortest ({:.0} s)",
                longest.time_seconds,
                cv_constants::MIN_DURATION_RATIO,
                shortest.time_seconds
            ));
        }
        if shortest.time_seconds < cv_constants::RECOMMENDED_MIN_DURATION_SECONDS
            || longest.time_seconds > cv_constants::RECOMMENDED_MAX_DURATION_SECONDS
        {
            assessment.note(format!(
                "Trials between {:.0} s and {:.0} s give the most reliable critical velocity",
                cv_constants::RECOMMENDED_MIN_DURATION_SECONDS,
                cv_constants::RECOMMENDED_MAX_DURATION_SECONDS
            ));
        }
    }
}

/// Model-quality warnings on a fitted distance-time line
fn check_fit_quality(fit: &LinearFit, config: &FieldTestConfig, assessment: &mut Assessment) {
    if fit.r_squared < config.cv_min_r_squared {
        assessment.penalize(format!(
            "Distance-time fit R² of {:.3} is below {}; one trial may not have been maximal",
            fit.r_squared, config.cv_min_r_squared
        ));
    }
    if fit.intercept <= 0.0 {
        assessment.penalize(format!(
            "D' of {:.0} m is not positive; the short trial was probably paced too conservatively",
            fit.intercept
        ));
    }
    if !(cv_constants::MIN_PLAUSIBLE_CV..=cv_constants::MAX_PLAUSIBLE_CV).contains(&fit.slope) {
        assessment.penalize(format!(
            "Critical velocity of {:.2} m/s is outside the plausible {}-{} m/s range",
            fit.slope,
            cv_constants::MIN_PLAUSIBLE_CV,
            cv_constants::MAX_PLAUSIBLE_CV
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn trial(distance_m: f64, time_seconds: f64) -> CriticalVelocityTrial {
        CriticalVelocityTrial {
            distance_m,
            time_seconds,
        }
    }

    #[test]
    fn test_exact_model_recovers_cv_and_d_prime() {
        // distance = 4.5 t + 200
        let input = CriticalVelocityInput {
            trials: vec![trial(1010.0, 180.0), trial(2900.0, 600.0), trial(5600.0, 1200.0)],
        };
        let result = analyze(&input, &FieldTestConfig::default()).unwrap();

        let ProtocolMetrics::CriticalVelocity {
            critical_velocity_mps,
            d_prime_m,
            ..
        } = result.metrics
        else {
            panic!("unexpected metrics");
        };
        assert!((critical_velocity_mps - 4.5).abs() < 1e-9);
        assert!((d_prime_m - 200.0).abs() < 1e-6);
        assert_eq!(result.confidence, Confidence::VeryHigh);
    }

    #[test]
    fn test_two_trials_capped_at_medium() {
        let input = CriticalVelocityInput {
            trials: vec![trial(1010.0, 180.0), trial(3800.0, 800.0)],
        };
        let result = analyze(&input, &FieldTestConfig::default()).unwrap();
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_trial_count_outside_range_is_rejected() {
        let one = CriticalVelocityInput {
            trials: vec![trial(1000.0, 180.0)],
        };
        assert!(analyze(&one, &FieldTestConfig::default()).is_err());
    }

    #[test]
    fn test_trials_too_close_invalidate() {
        let input = CriticalVelocityInput {
            trials: vec![trial(1010.0, 180.0), trial(1200.0, 220.0), trial(5600.0, 1200.0)],
        };
        let result = analyze(&input, &FieldTestConfig::default()).unwrap();

        assert!(!result.validation.valid);
        assert!(result.lt2.is_none());
    }
}
