// ABOUTME: Named default-filling step for optional field test inputs
// ABOUTME: Every synthesized value is returned with an AssumedField record so results can surface it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Optional inputs are never silently defaulted inside an analyzer. Each
//! function here either passes the supplied value through or returns the
//! substitute together with an [`AssumedField`] that the analyzer records
//! (costing one confidence step).

use super::race_based::AthleteLevel;
use crate::intelligence::physiological_constants::twenty_minute_tt;
use crate::models::AssumedField;

/// A value that may have been synthesized
#[derive(Debug, Clone, PartialEq)]
pub struct Filled<T> {
    /// Supplied or assumed value
    pub value: T,
    /// Present when the value was assumed
    pub assumed: Option<AssumedField>,
}

impl<T> Filled<T> {
    const fn supplied(value: T) -> Self {
        Self {
            value,
            assumed: None,
        }
    }

    fn assumed(value: T, field: &str, assumption: String) -> Self {
        Self {
            value,
            assumed: Some(AssumedField::new(field, assumption)),
        }
    }
}

/// 20-minute TT duration defaults to the nominal 1,200 s
#[must_use]
pub fn twenty_minute_duration(duration_seconds: Option<f64>) -> Filled<f64> {
    duration_seconds.map_or_else(
        || {
            Filled::assumed(
                twenty_minute_tt::DURATION_SECONDS,
                "durationSeconds",
                format!("{} s", twenty_minute_tt::DURATION_SECONDS),
            )
        },
        Filled::supplied,
    )
}

/// Race-based estimation defaults to an intermediate athlete
#[must_use]
pub fn athlete_level(level: Option<AthleteLevel>) -> Filled<AthleteLevel> {
    level.map_or_else(
        || {
            Filled::assumed(
                AthleteLevel::Intermediate,
                "athleteLevel",
                "INTERMEDIATE".to_owned(),
            )
        },
        Filled::supplied,
    )
}

/// LTHR from a whole-test average when no usable HR series exists
///
/// The series mean over the last 20 minutes is the measured value; a whole-test
/// average underestimates it by roughly 3 % (Friel).
#[must_use]
pub fn lthr_from_whole_test_average(avg_heart_rate: f64, multiplier: f64) -> Filled<f64> {
    Filled::assumed(
        avg_heart_rate * multiplier,
        "heartRateSamples",
        format!("LTHR = whole-test average HR {avg_heart_rate:.0} x {multiplier}"),
    )
}

/// Missing half of a 30-minute TT derived from the total distance
#[must_use]
pub fn other_half_from_total(total_distance_m: f64, known_half_m: f64, missing: &str) -> Filled<f64> {
    Filled::assumed(
        total_distance_m - known_half_m,
        missing,
        format!("total distance minus the supplied half ({known_half_m:.0} m)"),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_supplied_values_pass_through() {
        let duration = twenty_minute_duration(Some(1180.0));
        assert!((duration.value - 1180.0).abs() < f64::EPSILON);
        assert!(duration.assumed.is_none());

        let level = athlete_level(Some(AthleteLevel::Elite));
        assert_eq!(level.value, AthleteLevel::Elite);
        assert!(level.assumed.is_none());
    }

    #[test]
    fn test_missing_values_are_recorded() {
        let duration = twenty_minute_duration(None);
        assert!((duration.value - 1200.0).abs() < f64::EPSILON);
        assert_eq!(
            duration.assumed.map(|a| a.field),
            Some("durationSeconds".to_owned())
        );

        let lthr = lthr_from_whole_test_average(165.0, 1.03);
        assert!((lthr.value - 169.95).abs() < 1e-9);
        assert!(lthr.assumed.is_some());
    }
}
