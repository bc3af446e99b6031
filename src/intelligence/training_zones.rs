// ABOUTME: Five-zone pace and heart-rate model anchored on the LT1/LT2 thresholds
// ABOUTME: Converts threshold estimates into prescribable recovery-to-VO2max zones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use crate::intelligence::physiological_constants::training_zones::{
    AEROBIC_FLOOR_FRACTION_OF_LT1, DEFAULT_LT1_FRACTION_OF_LT2, HR_ZONE_FRACTIONS,
    RECOVERY_FLOOR_FRACTION_OF_LT1, THRESHOLD_CEILING_FRACTION_OF_LT2,
    THRESHOLD_FLOOR_FRACTION_OF_LT2, VO2MAX_CEILING_FRACTION_OF_LT2,
};
use crate::models::{speed_to_pace, ThresholdEstimate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Zone name, slowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneName {
    /// Active recovery
    Recovery,
    /// Aerobic base, up to LT1
    Aerobic,
    /// Between LT1 and LT2
    Tempo,
    /// Around LT2
    Threshold,
    /// Above LT2
    Vo2max,
}

/// One zone as speed, pace and optional heart-rate bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingZone {
    /// Zone name
    pub zone: ZoneName,
    /// Lower speed bound (m/s)
    pub min_speed_mps: f64,
    /// Upper speed bound (m/s)
    pub max_speed_mps: f64,
    /// Pace at the upper speed bound (s/km)
    pub fastest_pace_sec_per_km: f64,
    /// Pace at the lower speed bound (s/km)
    pub slowest_pace_sec_per_km: f64,
    /// Lower heart-rate bound (bpm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_heart_rate: Option<f64>,
    /// Upper heart-rate bound (bpm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<f64>,
}

/// Zones derived from a threshold pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingZones {
    /// Recovery through VO2max
    pub zones: Vec<TrainingZone>,
    /// LT1 was not measured and was set to a fixed fraction of LT2
    pub lt1_estimated: bool,
}

impl TrainingZones {
    /// Derive zones from LT1 (optional) and LT2
    ///
    /// Heart-rate bounds are filled when LT2 carries a heart rate, using
    /// fractions of LTHR.
    ///
    /// # Errors
    ///
    /// Returns an error if a speed is not positive or LT1 is not slower than LT2
    pub fn from_thresholds(
        lt1: Option<&ThresholdEstimate>,
        lt2: &ThresholdEstimate,
    ) -> AppResult<Self> {
        if !lt2.speed_mps.is_finite() || lt2.speed_mps <= 0.0 {
            return Err(AppError::invalid_input("LT2 speed must be positive").with_field("lt2"));
        }
        let (lt1_speed, lt1_estimated) = match lt1 {
            Some(lt1) if lt1.speed_mps.is_finite() && lt1.speed_mps > 0.0 => (lt1.speed_mps, false),
            Some(_) => {
                return Err(AppError::invalid_input("LT1 speed must be positive").with_field("lt1"))
            }
            None => (lt2.speed_mps * DEFAULT_LT1_FRACTION_OF_LT2, true),
        };
        if lt1_speed >= lt2.speed_mps {
            return Err(AppError::invalid_input(format!(
                "LT1 speed {lt1_speed:.2} m/s must be below LT2 speed {:.2} m/s",
                lt2.speed_mps
            ))
            .with_field("lt1"));
        }

        let threshold_floor = (lt2.speed_mps * THRESHOLD_FLOOR_FRACTION_OF_LT2).max(lt1_speed);
        let threshold_ceiling = lt2.speed_mps * THRESHOLD_CEILING_FRACTION_OF_LT2;
        let speed_bounds = [
            (ZoneName::Recovery, lt1_speed * RECOVERY_FLOOR_FRACTION_OF_LT1, lt1_speed * AEROBIC_FLOOR_FRACTION_OF_LT1),
            (ZoneName::Aerobic, lt1_speed * AEROBIC_FLOOR_FRACTION_OF_LT1, lt1_speed),
            (ZoneName::Tempo, lt1_speed, threshold_floor),
            (ZoneName::Threshold, threshold_floor, threshold_ceiling),
            (ZoneName::Vo2max, threshold_ceiling, lt2.speed_mps * VO2MAX_CEILING_FRACTION_OF_LT2),
        ];

        let zones = speed_bounds
            .iter()
            .enumerate()
            .map(|(index, &(zone, min_speed, max_speed))| {
                let hr_bounds = lt2.heart_rate.map(|lthr| {
                    (
                        lthr * HR_ZONE_FRACTIONS[index],
                        lthr * HR_ZONE_FRACTIONS[index + 1],
                    )
                });
                TrainingZone {
                    zone,
                    min_speed_mps: min_speed,
                    max_speed_mps: max_speed,
                    fastest_pace_sec_per_km: speed_to_pace(max_speed),
                    slowest_pace_sec_per_km: speed_to_pace(min_speed),
                    min_heart_rate: hr_bounds.map(|(low, _)| low),
                    max_heart_rate: hr_bounds.map(|(_, high)| high),
                }
            })
            .collect();

        debug!(lt1_speed, lt2_speed = lt2.speed_mps, lt1_estimated, "Derived training zones");
        Ok(Self {
            zones,
            lt1_estimated,
        })
    }

    /// Zone containing `speed_mps`, if any
    #[must_use]
    pub fn zone_for_speed(&self, speed_mps: f64) -> Option<ZoneName> {
        self.zones
            .iter()
            .find(|zone| speed_mps >= zone.min_speed_mps && speed_mps < zone.max_speed_mps)
            .map(|zone| zone.zone)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lt1_is_flagged() {
        let lt2 = ThresholdEstimate::from_speed(4.0, Some(170.0));
        let zones = TrainingZones::from_thresholds(None, &lt2).unwrap();

        assert!(zones.lt1_estimated);
        assert_eq!(zones.zones.len(), 5);
        assert!((zones.zones[1].max_speed_mps - 3.48).abs() < 1e-9);
        assert!((zones.zones[4].max_heart_rate.unwrap() - 180.2).abs() < 1e-9);
    }

    #[test]
    fn test_zones_are_contiguous() {
        let lt1 = ThresholdEstimate::from_speed(3.4, None);
        let lt2 = ThresholdEstimate::from_speed(4.0, None);
        let zones = TrainingZones::from_thresholds(Some(&lt1), &lt2).unwrap();

        for pair in zones.zones.windows(2) {
            assert!((pair[0].max_speed_mps - pair[1].min_speed_mps).abs() < 1e-12);
        }
        assert_eq!(zones.zone_for_speed(4.0), Some(ZoneName::Threshold));
        assert_eq!(zones.zone_for_speed(3.0), Some(ZoneName::Aerobic));
        assert!(zones.zones[0].min_heart_rate.is_none());
    }

    #[test]
    fn test_lt1_above_lt2_rejected() {
        let lt1 = ThresholdEstimate::from_speed(4.2, None);
        let lt2 = ThresholdEstimate::from_speed(4.0, None);
        assert!(TrainingZones::from_thresholds(Some(&lt1), &lt2).is_err());
    }
}
