// ABOUTME: Thirty-minute solo time trial analysis for LT2 pace and LTHR
// ABOUTME: Whole-test pace as LT2, last-20-minute HR as LTHR, with pacing and data-quality checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    assumptions, coefficient_of_variation_percent, mean, plausible_heart_rates, validate_heart_rate,
    validate_range, validate_splits, Assessment, FieldTestResult, FieldTestType, ProtocolMetrics,
    RETEST_GUIDANCE,
};
use crate::config::FieldTestConfig;
use crate::errors::AppResult;
use crate::intelligence::physiological_constants::thirty_minute_tt;
use crate::models::{format_pace, Confidence, ThresholdEstimate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw 30-minute time trial data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirtyMinuteTtInput {
    /// Distance covered in 30 minutes (m)
    pub total_distance_m: f64,
    /// Distance covered in the first 15 minutes (m)
    #[serde(default)]
    pub first_half_distance_m: Option<f64>,
    /// Distance covered in the last 15 minutes (m)
    #[serde(default)]
    pub second_half_distance_m: Option<f64>,
    /// Six consecutive 5-minute split distances (m)
    #[serde(default)]
    pub five_minute_splits_m: Option<Vec<f64>>,
    /// 1 Hz heart rate samples (bpm)
    #[serde(default)]
    pub heart_rate_samples: Option<Vec<f64>>,
    /// Whole-test average heart rate (bpm)
    #[serde(default)]
    pub avg_heart_rate: Option<f64>,
}

/// Analyze a 30-minute time trial
///
/// # Errors
///
/// Returns an error if the distance is outside 4,000-12,000 m, the average HR
/// is implausible, or the split list is malformed
pub fn analyze(input: &ThirtyMinuteTtInput, config: &FieldTestConfig) -> AppResult<FieldTestResult> {
    validate_range(
        "total_distance_m",
        input.total_distance_m,
        thirty_minute_tt::MIN_DISTANCE_M,
        thirty_minute_tt::MAX_DISTANCE_M,
    )?;
    if let Some(avg) = input.avg_heart_rate {
        validate_heart_rate("avg_heart_rate", avg)?;
    }
    for (field, half) in [
        ("first_half_distance_m", input.first_half_distance_m),
        ("second_half_distance_m", input.second_half_distance_m),
    ] {
        if let Some(distance) = half {
            validate_range(field, distance, f64::MIN_POSITIVE, input.total_distance_m)?;
        }
    }
    if let Some(splits) = &input.five_minute_splits_m {
        validate_splits(
            "five_minute_splits_m",
            splits,
            thirty_minute_tt::FIVE_MINUTE_SPLITS,
        )?;
    }

    let mut assessment = Assessment::new(Confidence::VeryHigh);
    let test_speed = input.total_distance_m / thirty_minute_tt::DURATION_SECONDS;

    let split_deviation = resolve_halves(input, config, &mut assessment)
        .map(|(first, second)| check_half_split(first, second, config, &mut assessment));
    let split_cv = input
        .five_minute_splits_m
        .as_deref()
        .and_then(|splits| check_five_minute_splits(splits, input.total_distance_m, config, &mut assessment));

    let lthr = estimate_lthr(input, config, &mut assessment);
    debug!(test_speed, ?split_deviation, ?split_cv, ?lthr, "30-minute TT metrics");

    let lt2 = ThresholdEstimate::from_speed(test_speed, lthr);
    let recommendations = if assessment.is_valid() {
        let mut recs = vec![format!(
            "Set threshold (LT2) pace to {}",
            format_pace(lt2.pace_sec_per_km)
        )];
        if let Some(hr) = lthr {
            recs.push(format!("Set lactate threshold heart rate to {hr:.0} bpm"));
        }
        recs.push(RETEST_GUIDANCE.to_owned());
        recs
    } else {
        vec![format!(
            "Repeat the test with even pacing; keep both halves within {}% of each other",
            config.even_split_tolerance_percent
        )]
    };

    Ok(assessment.finish(
        FieldTestType::ThirtyMinTt,
        None,
        Some(lt2),
        recommendations,
        ProtocolMetrics::ThirtyMinTt {
            test_speed_mps: test_speed,
            split_deviation_percent: split_deviation,
            split_cv_percent: split_cv,
        },
    ))
}

/// Half distances from explicit halves, derived from splits, or from the total
fn resolve_halves(
    input: &ThirtyMinuteTtInput,
    config: &FieldTestConfig,
    assessment: &mut Assessment,
) -> Option<(f64, f64)> {
    match (input.first_half_distance_m, input.second_half_distance_m) {
        (Some(first), Some(second)) => {
            check_half_sum(first + second, input.total_distance_m, config, assessment);
            Some((first, second))
        }
        (Some(first), None) => {
            let filled = assumptions::other_half_from_total(
                input.total_distance_m,
                first,
                "secondHalfDistanceM",
            );
            if let Some(assumed) = filled.assumed {
                assessment.assume(assumed);
            }
            Some((first, filled.value))
        }
        (None, Some(second)) => {
            let filled = assumptions::other_half_from_total(
                input.total_distance_m,
                second,
                "firstHalfDistanceM",
            );
            if let Some(assumed) = filled.assumed {
                assessment.assume(assumed);
            }
            Some((filled.value, second))
        }
        (None, None) => {
            if let Some(splits) = &input.five_minute_splits_m {
                let half = splits.len() / 2;
                return Some((splits[..half].iter().sum(), splits[half..].iter().sum()));
            }
            assessment.penalize("No half or split distances supplied; pacing could not be verified");
            None
        }
    }
}

/// Explicit halves must add up to the total distance
fn check_half_sum(
    half_sum: f64,
    total_distance_m: f64,
    config: &FieldTestConfig,
    assessment: &mut Assessment,
) {
    let sum_error = (half_sum - total_distance_m).abs() / total_distance_m * 100.0;
    if sum_error > config.split_sum_tolerance_percent {
        assessment.penalize(format!(
            "Half distances sum to {half_sum:.0} m, {sum_error:.1}% away from the total distance of {total_distance_m:.0} m"
        ));
    }
}

/// Half-to-half deviation relative to the mean half (%)
fn check_half_split(
    first: f64,
    second: f64,
    config: &FieldTestConfig,
    assessment: &mut Assessment,
) -> f64 {
    let mean_half = (first + second) / 2.0;
    let deviation = if mean_half > 0.0 {
        (second - first).abs() / mean_half * 100.0
    } else {
        0.0
    };

    let direction = if second < first { "positive" } else { "negative" };
    if deviation > config.max_split_deviation_percent {
        assessment.fail(format!(
            "{direction} split of {deviation:.1}% exceeds {}%; the effort was not a steady threshold effort",
            config.max_split_deviation_percent
        ));
    } else if deviation > config.even_split_tolerance_percent {
        assessment.penalize(format!(
            "Uneven pacing: {direction} split of {deviation:.1}% (target within {}%)",
            config.even_split_tolerance_percent
        ));
    }
    deviation
}

/// Consistency of the six 5-minute splits; returns their CV (%)
fn check_five_minute_splits(
    splits: &[f64],
    total_distance_m: f64,
    config: &FieldTestConfig,
    assessment: &mut Assessment,
) -> Option<f64> {
    let split_sum: f64 = splits.iter().sum();
    let sum_error = (split_sum - total_distance_m).abs() / total_distance_m * 100.0;
    if sum_error > config.split_sum_tolerance_percent {
        assessment.penalize(format!(
            "5-minute splits sum to {split_sum:.0} m, {sum_error:.1}% away from the total distance of {total_distance_m:.0} m"
        ));
    }

    let cv = coefficient_of_variation_percent(splits)?;
    if cv > config.split_cv_warning_percent {
        assessment.penalize(format!(
            "5-minute splits vary by {cv:.1}% (CV above {}%)",
            config.split_cv_warning_percent
        ));
    }
    Some(cv)
}

/// LTHR from the last 20 minutes of the HR series, else an assumed value
fn estimate_lthr(
    input: &ThirtyMinuteTtInput,
    config: &FieldTestConfig,
    assessment: &mut Assessment,
) -> Option<f64> {
    let samples = input
        .heart_rate_samples
        .as_deref()
        .map(plausible_heart_rates)
        .map(|(kept, dropped)| {
            if dropped > 0 {
                assessment.note(format!(
                    "Dropped {dropped} implausible heart rate samples"
                ));
            }
            kept
        })
        .unwrap_or_default();

    if !samples.is_empty() && (samples.len() as f64) < thirty_minute_tt::DURATION_SECONDS {
        assessment.penalize(format!(
            "Heart rate series covers {} s of the {} s test",
            samples.len(),
            thirty_minute_tt::DURATION_SECONDS
        ));
    }

    if samples.len() >= thirty_minute_tt::LTHR_WINDOW_SECONDS {
        let window = &samples[samples.len() - thirty_minute_tt::LTHR_WINDOW_SECONDS..];
        return mean(window);
    }

    let fallback_average = input.avg_heart_rate.or_else(|| mean(&samples));
    if let Some(avg) = fallback_average {
        let filled = assumptions::lthr_from_whole_test_average(avg, config.lthr_hr_multiplier);
        if let Some(assumed) = filled.assumed {
            assessment.assume(assumed);
        }
        return Some(filled.value);
    }

    assessment.penalize("No heart rate data; LTHR not estimated");
    None
}
