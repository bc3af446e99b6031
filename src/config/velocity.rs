// ABOUTME: Velocity-based training settings (profile validity rules and velocity-loss stop criteria)
// ABOUTME: Environment-driven with defaults from physiological constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{env_or, ConfigError};
use crate::intelligence::physiological_constants::velocity_based_training as vbt;
use serde::{Deserialize, Serialize};

/// Settings for the load-velocity profiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityConfig {
    /// Distinct loads required for a valid profile
    pub min_valid_loads: usize,
    /// Minimum R² for a valid profile
    pub min_r_squared: f64,
    /// Minimum tested load range as a fraction of e1RM
    pub min_load_range_fraction: f64,
    /// Velocity-loss stop threshold relative to the first rep (%)
    pub max_loss_percent: f64,
    /// Velocity-loss stop threshold in absolute terms (m/s)
    pub max_loss_mps: f64,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            min_valid_loads: vbt::MIN_VALID_LOADS,
            min_r_squared: vbt::MIN_R_SQUARED,
            min_load_range_fraction: vbt::MIN_LOAD_RANGE_FRACTION,
            max_loss_percent: vbt::MAX_VELOCITY_LOSS_PERCENT,
            max_loss_mps: vbt::MAX_VELOCITY_LOSS_MPS,
        }
    }
}

impl VelocityConfig {
    /// Load velocity configuration from environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when a variable is set but not numeric
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            min_valid_loads: env_or("PIERRE_VBT_MIN_VALID_LOADS", defaults.min_valid_loads)?,
            min_r_squared: env_or("PIERRE_VBT_MIN_R_SQUARED", defaults.min_r_squared)?,
            min_load_range_fraction: env_or(
                "PIERRE_VBT_MIN_LOAD_RANGE_FRACTION",
                defaults.min_load_range_fraction,
            )?,
            max_loss_percent: env_or("PIERRE_VBT_MAX_LOSS_PERCENT", defaults.max_loss_percent)?,
            max_loss_mps: env_or("PIERRE_VBT_MAX_LOSS_MPS", defaults.max_loss_mps)?,
        })
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two loads are required or a threshold is
    /// outside its meaningful range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_valid_loads < vbt::MIN_FIT_LOADS {
            return Err(ConfigError::InvalidRange(
                "A valid profile needs at least two distinct loads",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_r_squared) {
            return Err(ConfigError::InvalidRange(
                "Load-velocity R² threshold must be between 0 and 1",
            ));
        }
        if self.min_load_range_fraction < 0.0 || self.min_load_range_fraction >= 1.0 {
            return Err(ConfigError::InvalidRange(
                "Load range fraction must be in [0, 1)",
            ));
        }
        if self.max_loss_percent <= 0.0 || self.max_loss_percent >= 100.0 {
            return Err(ConfigError::InvalidRange(
                "Velocity loss percentage must be in (0, 100)",
            ));
        }
        if self.max_loss_mps <= 0.0 {
            return Err(ConfigError::InvalidRange(
                "Absolute velocity loss must be positive",
            ));
        }
        Ok(())
    }
}
