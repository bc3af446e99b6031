// ABOUTME: Methodology entry requirements (training age and aerobic base per gated methodology)
// ABOUTME: Environment-driven with defaults from physiological constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env_or, ConfigError};
use crate::intelligence::physiological_constants::methodology;
use serde::{Deserialize, Serialize};

/// Entry requirements for gated methodologies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Norwegian double threshold: minimum training age (years)
    pub norwegian_min_training_age_years: f64,
    /// Norwegian double threshold: minimum trailing weekly distance (km)
    pub norwegian_min_weekly_km: f64,
    /// Norwegian double threshold: lactate meter required
    pub norwegian_requires_equipment: bool,
    /// Canova: minimum training age (years)
    pub canova_min_training_age_years: f64,
    /// Canova: minimum trailing weekly distance (km)
    pub canova_min_weekly_km: f64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            norwegian_min_training_age_years: methodology::NORWEGIAN_MIN_TRAINING_AGE_YEARS,
            norwegian_min_weekly_km: methodology::NORWEGIAN_MIN_WEEKLY_KM,
            norwegian_requires_equipment: true,
            canova_min_training_age_years: methodology::CANOVA_MIN_TRAINING_AGE_YEARS,
            canova_min_weekly_km: methodology::CANOVA_MIN_WEEKLY_KM,
        }
    }
}

impl EligibilityConfig {
    /// Load eligibility configuration from environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when a variable is set but not parsable
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            norwegian_min_training_age_years: env_or(
                "PIERRE_NORWEGIAN_MIN_TRAINING_AGE_YEARS",
                defaults.norwegian_min_training_age_years,
            )?,
            norwegian_min_weekly_km: env_or(
                "PIERRE_NORWEGIAN_MIN_WEEKLY_KM",
                defaults.norwegian_min_weekly_km,
            )?,
            norwegian_requires_equipment: env_or(
                "PIERRE_NORWEGIAN_REQUIRES_LACTATE_METER",
                defaults.norwegian_requires_equipment,
            )?,
            canova_min_training_age_years: env_or(
                "PIERRE_CANOVA_MIN_TRAINING_AGE_YEARS",
                defaults.canova_min_training_age_years,
            )?,
            canova_min_weekly_km: env_or(
                "PIERRE_CANOVA_MIN_WEEKLY_KM",
                defaults.canova_min_weekly_km,
            )?,
        })
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if any requirement is negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.norwegian_min_training_age_years < 0.0 || self.canova_min_training_age_years < 0.0
        {
            return Err(ConfigError::InvalidRange(
                "Training age requirements must not be negative",
            ));
        }
        if self.norwegian_min_weekly_km < 0.0 || self.canova_min_weekly_km < 0.0 {
            return Err(ConfigError::InvalidRange(
                "Weekly distance requirements must not be negative",
            ));
        }
        Ok(())
    }
}
