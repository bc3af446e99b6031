// ABOUTME: Twenty-minute time trial analysis for LT2 pace and LTHR
// ABOUTME: Applies speed and heart rate reduction factors with a 5-minute split pacing check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    assumptions, mean, validate_heart_rate, validate_range, validate_splits, Assessment,
    FieldTestResult, FieldTestType, ProtocolMetrics, RETEST_GUIDANCE,
};
use crate::config::FieldTestConfig;
use crate::errors::AppResult;
use crate::intelligence::physiological_constants::twenty_minute_tt;
use crate::models::{format_pace, Confidence, ThresholdEstimate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw 20-minute time trial data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwentyMinuteTtInput {
    /// Distance covered (m)
    pub distance_m: f64,
    /// Actual duration (seconds); 1,200 s when omitted
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    /// Average heart rate over the trial (bpm)
    pub avg_heart_rate: f64,
    /// Four consecutive 5-minute split distances (m)
    #[serde(default)]
    pub five_minute_splits_m: Option<Vec<f64>>,
}

/// Analyze a 20-minute time trial
///
/// LT2 speed is 95 % of the test speed and LTHR 97 % of the test heart rate
/// (configurable). Confidence never exceeds HIGH because both values are
/// scaled rather than measured.
///
/// # Errors
///
/// Returns an error if distance, duration, or heart rate are out of range or
/// the split list is malformed
pub fn analyze(input: &TwentyMinuteTtInput, config: &FieldTestConfig) -> AppResult<FieldTestResult> {
    validate_range(
        "distance_m",
        input.distance_m,
        twenty_minute_tt::MIN_DISTANCE_M,
        twenty_minute_tt::MAX_DISTANCE_M,
    )?;
    if let Some(duration) = input.duration_seconds {
        validate_range(
            "duration_seconds",
            duration,
            twenty_minute_tt::MIN_DURATION_SECONDS,
            twenty_minute_tt::MAX_DURATION_SECONDS,
        )?;
    }
    validate_heart_rate("avg_heart_rate", input.avg_heart_rate)?;
    if let Some(splits) = &input.five_minute_splits_m {
        validate_splits(
            "five_minute_splits_m",
            splits,
            twenty_minute_tt::FIVE_MINUTE_SPLITS,
        )?;
    }

    let mut assessment = Assessment::new(Confidence::High);
    let duration = assumptions::twenty_minute_duration(input.duration_seconds);
    if let Some(assumed) = duration.assumed {
        assessment.assume(assumed);
    }

    let test_speed = input.distance_m / duration.value;
    let lt2_speed = test_speed * config.twenty_minute_speed_factor;
    let lthr = input.avg_heart_rate * config.twenty_minute_hr_factor;

    let max_split_deviation = match input.five_minute_splits_m.as_deref() {
        Some(splits) => max_deviation_percent(splits),
        None => {
            assessment.penalize("No 5-minute splits supplied; pacing could not be verified");
            None
        }
    };
    if let Some(deviation) = max_split_deviation {
        if deviation > twenty_minute_tt::SPLIT_SEVERE_PERCENT {
            assessment.penalize_by(
                2,
                format!(
                    "A 5-minute split deviates {deviation:.1}% from the mean; the effort was poorly paced"
                ),
            );
        } else if deviation > twenty_minute_tt::SPLIT_WARNING_PERCENT {
            assessment.penalize(format!(
                "A 5-minute split deviates {deviation:.1}% from the mean (target within {}%)",
                twenty_minute_tt::SPLIT_WARNING_PERCENT
            ));
        }
    }
    debug!(test_speed, lt2_speed, lthr, ?max_split_deviation, "20-minute TT metrics");

    let lt2 = ThresholdEstimate::from_speed(lt2_speed, Some(lthr));
    let recommendations = vec![
        format!(
            "Set threshold (LT2) pace to {} ({:.0}% of the {} test pace)",
            format_pace(lt2.pace_sec_per_km),
            config.twenty_minute_speed_factor * 100.0,
            format_pace(1000.0 / test_speed)
        ),
        format!("Set lactate threshold heart rate to {lthr:.0} bpm"),
        RETEST_GUIDANCE.to_owned(),
    ];

    Ok(assessment.finish(
        FieldTestType::TwentyMinTt,
        None,
        Some(lt2),
        recommendations,
        ProtocolMetrics::TwentyMinTt {
            test_speed_mps: test_speed,
            max_split_deviation_percent: max_split_deviation,
        },
    ))
}

/// Largest absolute deviation of any split from the split mean (%)
fn max_deviation_percent(splits: &[f64]) -> Option<f64> {
    let avg = mean(splits)?;
    splits
        .iter()
        .map(|split| (split - avg).abs() / avg * 100.0)
        .reduce(f64::max)
}
