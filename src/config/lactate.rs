// ABOUTME: Lactate curve analysis settings (grid resolution, LT1 offset, confidence bands)
// ABOUTME: Environment-driven with defaults from physiological constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env_or, ConfigError};
use crate::intelligence::physiological_constants::lactate;
use serde::{Deserialize, Serialize};

/// Smallest grid the D-max search accepts
const MIN_GRID_STEPS: usize = 10;

/// Settings for the D-max threshold extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LactateConfig {
    /// Interior grid points evaluated by the perpendicular-distance search
    pub grid_steps: usize,
    /// Rise above the sub-curve baseline that marks LT1 (mmol/L)
    pub lt1_offset_mmol: f64,
    /// R² above which confidence is HIGH
    pub high_confidence_r2: f64,
    /// R² above which confidence is MEDIUM
    pub medium_confidence_r2: f64,
}

impl Default for LactateConfig {
    fn default() -> Self {
        Self {
            grid_steps: lactate::GRID_STEPS,
            lt1_offset_mmol: lactate::LT1_OFFSET_MMOL,
            high_confidence_r2: lactate::HIGH_CONFIDENCE_R2,
            medium_confidence_r2: lactate::MEDIUM_CONFIDENCE_R2,
        }
    }
}

impl LactateConfig {
    /// Load lactate configuration from environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when a variable is set but not numeric
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            grid_steps: env_or("PIERRE_LACTATE_GRID_STEPS", defaults.grid_steps)?,
            lt1_offset_mmol: env_or("PIERRE_LACTATE_LT1_OFFSET_MMOL", defaults.lt1_offset_mmol)?,
            high_confidence_r2: env_or(
                "PIERRE_LACTATE_HIGH_CONFIDENCE_R2",
                defaults.high_confidence_r2,
            )?,
            medium_confidence_r2: env_or(
                "PIERRE_LACTATE_MEDIUM_CONFIDENCE_R2",
                defaults.medium_confidence_r2,
            )?,
        })
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is too coarse, the offset is not positive,
    /// or the confidence bands are not ordered within (0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_steps < MIN_GRID_STEPS {
            return Err(ConfigError::InvalidRange(
                "Lactate grid must have at least 10 steps",
            ));
        }
        if self.lt1_offset_mmol <= 0.0 {
            return Err(ConfigError::InvalidRange("LT1 offset must be positive"));
        }
        if self.medium_confidence_r2 <= 0.0
            || self.medium_confidence_r2 >= self.high_confidence_r2
            || self.high_confidence_r2 > 1.0
        {
            return Err(ConfigError::Inconsistent(
                "Confidence R² bands must satisfy 0 < medium < high <= 1",
            ));
        }
        Ok(())
    }
}
