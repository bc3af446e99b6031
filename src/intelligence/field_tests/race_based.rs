// ABOUTME: Threshold estimation from a recent race result
// ABOUTME: Distance and athlete-level correction factors convert race speed and HR to LT2 pace and LTHR
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    assumptions, validate_heart_rate, validate_range, Assessment, FieldTestResult, FieldTestType,
    ProtocolMetrics,
};
use crate::errors::AppResult;
use crate::models::{format_pace, Confidence, ThresholdEstimate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Standard race distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaceDistance {
    /// 5 km
    FiveK,
    /// 10 km
    TenK,
    /// 21.0975 km
    HalfMarathon,
    /// 42.195 km
    Marathon,
}

impl RaceDistance {
    /// Distance in metres
    #[must_use]
    pub const fn meters(self) -> f64 {
        match self {
            Self::FiveK => 5_000.0,
            Self::TenK => 10_000.0,
            Self::HalfMarathon => 21_097.5,
            Self::Marathon => 42_195.0,
        }
    }

    /// Plausible finish-time window in seconds (world record margin to walking pace)
    #[must_use]
    pub const fn plausible_finish_seconds(self) -> (f64, f64) {
        match self {
            Self::FiveK => (720.0, 3_600.0),
            Self::TenK => (1_560.0, 7_200.0),
            Self::HalfMarathon => (3_420.0, 14_400.0),
            Self::Marathon => (7_200.0, 25_200.0),
        }
    }

    /// Multiplier from average race HR to LTHR
    ///
    /// Short races are run above LTHR, the marathon below it.
    #[must_use]
    pub const fn hr_factor(self) -> f64 {
        match self {
            Self::FiveK => 0.96,
            Self::TenK => 0.98,
            Self::HalfMarathon => 1.00,
            Self::Marathon => 1.05,
        }
    }

    /// Multiplier from race speed to LT2 speed for an athlete level
    ///
    /// Better trained athletes race longer distances closer to LT2 and short
    /// distances further above it.
    #[must_use]
    pub const fn speed_factor(self, level: AthleteLevel) -> f64 {
        match (self, level) {
            (Self::FiveK, AthleteLevel::Beginner) => 0.91,
            (Self::FiveK, AthleteLevel::Intermediate) => 0.90,
            (Self::FiveK, AthleteLevel::Advanced) => 0.89,
            (Self::FiveK, AthleteLevel::Elite) => 0.88,
            (Self::TenK, AthleteLevel::Beginner) => 0.95,
            (Self::TenK, AthleteLevel::Intermediate) => 0.94,
            (Self::TenK, AthleteLevel::Advanced) => 0.935,
            (Self::TenK, AthleteLevel::Elite) => 0.93,
            (Self::HalfMarathon, AthleteLevel::Beginner) => 1.01,
            (Self::HalfMarathon, AthleteLevel::Intermediate) => 0.99,
            (Self::HalfMarathon, AthleteLevel::Advanced) => 0.98,
            (Self::HalfMarathon, AthleteLevel::Elite) => 0.975,
            (Self::Marathon, AthleteLevel::Beginner) => 1.12,
            (Self::Marathon, AthleteLevel::Intermediate) => 1.08,
            (Self::Marathon, AthleteLevel::Advanced) => 1.06,
            (Self::Marathon, AthleteLevel::Elite) => 1.04,
        }
    }
}

/// Training background used to pick correction factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AthleteLevel {
    /// Less than a year of structured training
    Beginner,
    /// Regular training and racing
    Intermediate,
    /// Competitive age-group athlete
    Advanced,
    /// National level or better
    Elite,
}

/// Recent race result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceBasedInput {
    /// Race distance
    pub race_distance: RaceDistance,
    /// Finish time (seconds)
    pub finish_time_seconds: f64,
    /// Average race heart rate (bpm)
    #[serde(default)]
    pub avg_heart_rate: Option<f64>,
    /// Athlete level; intermediate when omitted
    #[serde(default)]
    pub athlete_level: Option<AthleteLevel>,
}

/// Estimate LT2 from a race result
///
/// Race efforts are not controlled tests, so confidence never exceeds MEDIUM
/// and a marathon (heavily affected by fuelling and pacing) is always LOW.
///
/// # Errors
///
/// Returns an error if the finish time is outside the distance's plausible
/// window or the heart rate is implausible
pub fn analyze(input: &RaceBasedInput) -> AppResult<FieldTestResult> {
    let (min_time, max_time) = input.race_distance.plausible_finish_seconds();
    validate_range(
        "finish_time_seconds",
        input.finish_time_seconds,
        min_time,
        max_time,
    )?;
    if let Some(hr) = input.avg_heart_rate {
        validate_heart_rate("avg_heart_rate", hr)?;
    }

    let mut assessment = Assessment::new(Confidence::Medium);
    if input.race_distance == RaceDistance::Marathon {
        assessment.cap_at(Confidence::Low);
    }
    let level = assumptions::athlete_level(input.athlete_level);
    if let Some(assumed) = level.assumed {
        assessment.assume(assumed);
    }

    let race_speed = input.race_distance.meters() / input.finish_time_seconds;
    let speed_factor = input.race_distance.speed_factor(level.value);
    let hr_factor = input.race_distance.hr_factor();
    let lt2_speed = race_speed * speed_factor;
    let lthr = input.avg_heart_rate.map(|hr| hr * hr_factor);
    if lthr.is_none() {
        assessment.penalize("No race heart rate supplied; LTHR not estimated");
    }
    debug!(race_speed, speed_factor, ?lthr, "Race-based threshold estimate");

    let lt2 = ThresholdEstimate::from_speed(lt2_speed, lthr);
    let mut recommendations = vec![format!(
        "Estimated threshold (LT2) pace of {} from a race pace of {}",
        format_pace(lt2.pace_sec_per_km),
        format_pace(1000.0 / race_speed)
    )];
    if let Some(hr) = lthr {
        recommendations.push(format!("Estimated lactate threshold heart rate of {hr:.0} bpm"));
    }
    recommendations.push(
        "Confirm with a 30-minute time trial or lactate test before building a threshold block"
            .to_owned(),
    );

    Ok(assessment.finish(
        FieldTestType::RaceBased,
        None,
        Some(lt2),
        recommendations,
        ProtocolMetrics::RaceBased {
            race_speed_mps: race_speed,
            speed_factor,
            hr_factor,
        },
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_k_intermediate() {
        let input = RaceBasedInput {
            race_distance: RaceDistance::TenK,
            finish_time_seconds: 2_500.0,
            avg_heart_rate: Some(172.0),
            athlete_level: Some(AthleteLevel::Intermediate),
        };
        let result = analyze(&input).unwrap();

        let lt2 = result.lt2.unwrap();
        assert!((lt2.speed_mps - 4.0 * 0.94).abs() < 1e-9);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_marathon_and_unknown_level_are_low() {
        let input = RaceBasedInput {
            race_distance: RaceDistance::Marathon,
            finish_time_seconds: 12_600.0,
            avg_heart_rate: Some(160.0),
            athlete_level: None,
        };
        let result = analyze(&input).unwrap();

        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.assumptions.len(), 1);
    }

    #[test]
    fn test_implausible_finish_time_is_rejected() {
        let input = RaceBasedInput {
            race_distance: RaceDistance::FiveK,
            finish_time_seconds: 600.0,
            avg_heart_rate: None,
            athlete_level: None,
        };
        assert!(analyze(&input).is_err());
    }
}
