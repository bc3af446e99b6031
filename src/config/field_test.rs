// ABOUTME: Field test protocol thresholds (split tolerances, drift bands, fit quality, conversion factors)
// ABOUTME: Environment-driven with defaults from physiological constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env_or, ConfigError};
use crate::intelligence::physiological_constants::{
    critical_velocity, hr_drift, thirty_minute_tt, twenty_minute_tt,
};
use serde::{Deserialize, Serialize};

/// Thresholds used by the field test analyzers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTestConfig {
    /// 30-min TT: half-to-half deviation still considered even pacing (%)
    pub even_split_tolerance_percent: f64,
    /// 30-min TT: half-to-half deviation that invalidates the test (%)
    pub max_split_deviation_percent: f64,
    /// 30-min TT: 5-minute split CV that triggers a warning (%)
    pub split_cv_warning_percent: f64,
    /// 30-min TT: allowed split-sum mismatch against total distance (%)
    pub split_sum_tolerance_percent: f64,
    /// 30-min TT: multiplier on whole-test average HR when no series is present
    pub lthr_hr_multiplier: f64,
    /// HR drift: upper bound of the below-LT1 band (%)
    pub lt1_drift_percent: f64,
    /// HR drift: lower bound of the significant-drift band (%)
    pub significant_drift_percent: f64,
    /// Critical velocity: R² below which a warning is raised
    pub cv_min_r_squared: f64,
    /// 20-min TT: fraction of test speed taken as LT2
    pub twenty_minute_speed_factor: f64,
    /// 20-min TT: fraction of test HR taken as LTHR
    pub twenty_minute_hr_factor: f64,
}

impl Default for FieldTestConfig {
    fn default() -> Self {
        Self {
            even_split_tolerance_percent: thirty_minute_tt::EVEN_SPLIT_TOLERANCE_PERCENT,
            max_split_deviation_percent: thirty_minute_tt::MAX_SPLIT_DEVIATION_PERCENT,
            split_cv_warning_percent: thirty_minute_tt::SPLIT_CV_WARNING_PERCENT,
            split_sum_tolerance_percent: thirty_minute_tt::SPLIT_SUM_TOLERANCE_PERCENT,
            lthr_hr_multiplier: thirty_minute_tt::WHOLE_TEST_HR_MULTIPLIER,
            lt1_drift_percent: hr_drift::LT1_DRIFT_PERCENT,
            significant_drift_percent: hr_drift::SIGNIFICANT_DRIFT_PERCENT,
            cv_min_r_squared: critical_velocity::MIN_R_SQUARED,
            twenty_minute_speed_factor: twenty_minute_tt::SPEED_FACTOR,
            twenty_minute_hr_factor: twenty_minute_tt::HR_FACTOR,
        }
    }
}

impl FieldTestConfig {
    /// Load field test configuration from environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when a variable is set but not numeric
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            even_split_tolerance_percent: env_or(
                "PIERRE_FIELD_TEST_EVEN_SPLIT_PERCENT",
                defaults.even_split_tolerance_percent,
            )?,
            max_split_deviation_percent: env_or(
                "PIERRE_FIELD_TEST_MAX_SPLIT_DEVIATION_PERCENT",
                defaults.max_split_deviation_percent,
            )?,
            split_cv_warning_percent: env_or(
                "PIERRE_FIELD_TEST_SPLIT_CV_WARNING_PERCENT",
                defaults.split_cv_warning_percent,
            )?,
            split_sum_tolerance_percent: env_or(
                "PIERRE_FIELD_TEST_SPLIT_SUM_TOLERANCE_PERCENT",
                defaults.split_sum_tolerance_percent,
            )?,
            lthr_hr_multiplier: env_or(
                "PIERRE_FIELD_TEST_LTHR_MULTIPLIER",
                defaults.lthr_hr_multiplier,
            )?,
            lt1_drift_percent: env_or("PIERRE_HR_DRIFT_LT1_PERCENT", defaults.lt1_drift_percent)?,
            significant_drift_percent: env_or(
                "PIERRE_HR_DRIFT_SIGNIFICANT_PERCENT",
                defaults.significant_drift_percent,
            )?,
            cv_min_r_squared: env_or("PIERRE_CV_MIN_R_SQUARED", defaults.cv_min_r_squared)?,
            twenty_minute_speed_factor: env_or(
                "PIERRE_TWENTY_MIN_SPEED_FACTOR",
                defaults.twenty_minute_speed_factor,
            )?,
            twenty_minute_hr_factor: env_or(
                "PIERRE_TWENTY_MIN_HR_FACTOR",
                defaults.twenty_minute_hr_factor,
            )?,
        })
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is not positive, the drift bands or
    /// split bands are inverted, or a conversion factor is outside (0, 1.2]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.even_split_tolerance_percent <= 0.0 || self.split_cv_warning_percent <= 0.0 {
            return Err(ConfigError::InvalidRange(
                "Split tolerances must be positive",
            ));
        }
        if self.split_sum_tolerance_percent <= 0.0 {
            return Err(ConfigError::InvalidRange(
                "Split sum tolerance must be positive",
            ));
        }
        if self.even_split_tolerance_percent >= self.max_split_deviation_percent {
            return Err(ConfigError::Inconsistent(
                "Even split tolerance must be below the maximum split deviation",
            ));
        }
        if self.lt1_drift_percent <= 0.0 || self.lt1_drift_percent >= self.significant_drift_percent
        {
            return Err(ConfigError::Inconsistent(
                "LT1 drift band must be positive and below the significant drift band",
            ));
        }
        if !(0.0..=1.0).contains(&self.cv_min_r_squared) {
            return Err(ConfigError::InvalidRange(
                "Critical velocity R² threshold must be between 0 and 1",
            ));
        }
        for factor in [
            self.lthr_hr_multiplier,
            self.twenty_minute_speed_factor,
            self.twenty_minute_hr_factor,
        ] {
            if factor <= 0.0 || factor > 1.2 {
                return Err(ConfigError::InvalidRange(
                    "Conversion factors must be in (0, 1.2]",
                ));
            }
        }
        Ok(())
    }
}
