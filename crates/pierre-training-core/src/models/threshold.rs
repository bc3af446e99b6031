// ABOUTME: Threshold estimate value objects and pace conversions
// ABOUTME: Speed/pace/heart-rate triples emitted by field tests and consumed by zone derivation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Seconds per kilometre for a speed in m/s
#[must_use]
pub fn speed_to_pace(speed_mps: f64) -> f64 {
    if speed_mps <= 0.0 {
        return 0.0;
    }
    1000.0 / speed_mps
}

/// Speed in m/s for a pace in seconds per kilometre
#[must_use]
pub fn pace_to_speed(pace_sec_per_km: f64) -> f64 {
    if pace_sec_per_km <= 0.0 {
        return 0.0;
    }
    1000.0 / pace_sec_per_km
}

/// Format a pace as `m:ss/km`
#[must_use]
pub fn format_pace(pace_sec_per_km: f64) -> String {
    let total = pace_sec_per_km.round().max(0.0) as u64;
    format!("{}:{:02}/km", total / 60, total % 60)
}

/// A single threshold expressed as speed, pace and (optionally) heart rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdEstimate {
    /// Speed at threshold (m/s)
    pub speed_mps: f64,
    /// Pace at threshold (s/km)
    pub pace_sec_per_km: f64,
    /// Heart rate at threshold (bpm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
}

impl ThresholdEstimate {
    /// Build from a speed in m/s
    #[must_use]
    pub fn from_speed(speed_mps: f64, heart_rate: Option<f64>) -> Self {
        Self {
            speed_mps,
            pace_sec_per_km: speed_to_pace(speed_mps),
            heart_rate,
        }
    }

    /// Build from a pace in s/km
    #[must_use]
    pub fn from_pace(pace_sec_per_km: f64, heart_rate: Option<f64>) -> Self {
        Self {
            speed_mps: pace_to_speed(pace_sec_per_km),
            pace_sec_per_km,
            heart_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pace_formatting() {
        assert_eq!(format_pace(245.0), "4:05/km");
        assert_eq!(format_pace(299.6), "5:00/km");
        assert_eq!(format_pace(60.0), "1:00/km");
    }

    #[test]
    fn test_speed_pace_conversion() {
        let estimate = ThresholdEstimate::from_speed(4.0, Some(172.0));
        assert!((estimate.pace_sec_per_km - 250.0).abs() < 1e-9);
        assert!((pace_to_speed(estimate.pace_sec_per_km) - 4.0).abs() < 1e-9);
        assert!(speed_to_pace(0.0).abs() < f64::EPSILON);
    }
}
