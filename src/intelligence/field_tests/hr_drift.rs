// ABOUTME: Heart rate drift (aerobic decoupling) analysis for LT1 pace and heart rate
// ABOUTME: Classifies second-half HR drift at a fixed pace into below, near, or well above LT1
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    mean, plausible_heart_rates, validate_heart_rate, validate_range, Assessment, FieldTestResult,
    FieldTestType, ProtocolMetrics, RETEST_GUIDANCE,
};
use crate::config::FieldTestConfig;
use crate::errors::AppResult;
use crate::intelligence::physiological_constants::hr_drift;
use crate::models::{format_pace, Confidence, ThresholdEstimate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Steady run at a fixed target pace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrDriftInput {
    /// Duration of the steady portion (seconds)
    pub duration_seconds: f64,
    /// Pace held throughout (s/km)
    pub target_pace_sec_per_km: f64,
    /// Average HR over the first half (bpm)
    pub first_half_avg_hr: f64,
    /// Average HR over the second half (bpm)
    pub second_half_avg_hr: f64,
    /// Optional 1 Hz HR samples used to cross-check the half averages
    #[serde(default)]
    pub heart_rate_samples: Option<Vec<f64>>,
}

/// Drift band for the tested pace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftClassification {
    /// Pace at or below LT1; suitable as an easy pace
    BelowLt1,
    /// Pace close to LT1
    NearLt1,
    /// Pace clearly above LT1
    SignificantDrift,
}

impl DriftClassification {
    /// Band for a drift percentage
    #[must_use]
    pub fn from_drift(drift_percent: f64, config: &FieldTestConfig) -> Self {
        if drift_percent < config.lt1_drift_percent {
            Self::BelowLt1
        } else if drift_percent < config.significant_drift_percent {
            Self::NearLt1
        } else {
            Self::SignificantDrift
        }
    }

    /// Coach-facing interpretation
    #[must_use]
    pub const fn interpretation(self) -> &'static str {
        match self {
            Self::BelowLt1 => "below LT1, suitable for easy pace",
            Self::NearLt1 => "near LT1, this pace approximates the aerobic threshold",
            Self::SignificantDrift => "significant drift, reduce pace",
        }
    }
}

/// Analyze an HR drift run
///
/// # Errors
///
/// Returns an error if the duration, pace, or heart rates are outside their
/// accepted ranges
pub fn analyze(input: &HrDriftInput, config: &FieldTestConfig) -> AppResult<FieldTestResult> {
    validate_range(
        "duration_seconds",
        input.duration_seconds,
        hr_drift::MIN_DURATION_SECONDS,
        hr_drift::MAX_DURATION_SECONDS,
    )?;
    validate_range(
        "target_pace_sec_per_km",
        input.target_pace_sec_per_km,
        hr_drift::MIN_TARGET_PACE,
        hr_drift::MAX_TARGET_PACE,
    )?;
    validate_heart_rate("first_half_avg_hr", input.first_half_avg_hr)?;
    validate_heart_rate("second_half_avg_hr", input.second_half_avg_hr)?;

    let drift_percent = (input.second_half_avg_hr - input.first_half_avg_hr)
        / input.first_half_avg_hr
        * 100.0;
    let classification = DriftClassification::from_drift(drift_percent, config);
    debug!(drift_percent, ?classification, "HR drift computed");

    let mut assessment = Assessment::new(Confidence::High);
    if drift_percent < hr_drift::NEGATIVE_DRIFT_WARNING_PERCENT {
        assessment.penalize(format!(
            "Heart rate fell by {:.1}% in the second half; check the warm-up and sensor contact",
            drift_percent.abs()
        ));
    }
    if let Some(samples) = input.heart_rate_samples.as_deref() {
        cross_check_halves(samples, input, &mut assessment);
    }

    let headline = format!("{drift_percent:.1}% HR drift: {}", classification.interpretation());
    let pace = format_pace(input.target_pace_sec_per_km);
    let (lt1, recommendations) = match classification {
        DriftClassification::BelowLt1 => {
            // The tested pace is a lower bound on LT1 speed
            assessment.cap_at(Confidence::Medium);
            (
                Some(ThresholdEstimate::from_pace(
                    input.target_pace_sec_per_km,
                    Some(input.first_half_avg_hr),
                )),
                vec![
                    headline,
                    format!("Use {pace} or slower for easy runs"),
                    format!("Retest 5-10 s/km faster than {pace} to locate LT1 more precisely"),
                ],
            )
        }
        DriftClassification::NearLt1 => (
            Some(ThresholdEstimate::from_pace(
                input.target_pace_sec_per_km,
                Some(input.first_half_avg_hr),
            )),
            vec![
                headline,
                format!(
                    "Set aerobic threshold (LT1) pace to {pace} at about {:.0} bpm",
                    input.first_half_avg_hr
                ),
                RETEST_GUIDANCE.to_owned(),
            ],
        ),
        DriftClassification::SignificantDrift => {
            assessment.cap_at(Confidence::Low);
            (
                None,
                vec![
                    headline,
                    format!("Reduce pace by 10-15 s/km from {pace} and retest to locate LT1"),
                ],
            )
        }
    };

    Ok(assessment.finish(
        FieldTestType::HrDrift,
        lt1,
        None,
        recommendations,
        ProtocolMetrics::HrDrift {
            drift_percent,
            classification,
        },
    ))
}

/// Compare sample-derived half averages with the supplied ones
fn cross_check_halves(samples: &[f64], input: &HrDriftInput, assessment: &mut Assessment) {
    let (samples, dropped) = plausible_heart_rates(samples);
    if dropped > 0 {
        assessment.note(format!("Dropped {dropped} implausible heart rate samples"));
    }
    let half = samples.len() / 2;
    let (Some(first), Some(second)) = (mean(&samples[..half]), mean(&samples[half..])) else {
        return;
    };

    let disagreement = (first - input.first_half_avg_hr)
        .abs()
        .max((second - input.second_half_avg_hr).abs());
    if disagreement > hr_drift::HALF_AVERAGE_TOLERANCE_BPM {
        assessment.penalize(format!(
            "Heart rate samples give half averages of {first:.0}/{second:.0} bpm, {disagreement:.1} bpm away from the supplied averages"
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(first: f64, second: f64) -> HrDriftInput {
        HrDriftInput {
            duration_seconds: 3600.0,
            target_pace_sec_per_km: 330.0,
            first_half_avg_hr: first,
            second_half_avg_hr: second,
            heart_rate_samples: None,
        }
    }

    #[test]
    fn test_near_lt1_band() {
        let result = analyze(&input(140.0, 150.0), &FieldTestConfig::default()).unwrap();

        assert!(matches!(
            result.metrics,
            ProtocolMetrics::HrDrift {
                classification: DriftClassification::NearLt1,
                ..
            }
        ));
        assert_eq!(result.confidence, Confidence::High);
        assert!((result.lt1.unwrap().heart_rate.unwrap() - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_drift_warns() {
        let result = analyze(&input(150.0, 145.0), &FieldTestConfig::default()).unwrap();
        assert_eq!(result.validation.warnings.len(), 1);
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_samples_disagreeing_with_averages_warn() {
        let mut test = input(140.0, 143.0);
        let mut samples = vec![130.0; 1800];
        samples.extend(vec![143.0; 1800]);
        test.heart_rate_samples = Some(samples);

        let result = analyze(&test, &FieldTestConfig::default()).unwrap();
        assert!(result
            .validation
            .warnings
            .iter()
            .any(|w| w.contains("half averages")));
    }

    #[test]
    fn test_out_of_range_pace_is_rejected() {
        let mut test = input(140.0, 143.0);
        test.target_pace_sec_per_km = 120.0;
        assert!(analyze(&test, &FieldTestConfig::default()).is_err());
    }
}
