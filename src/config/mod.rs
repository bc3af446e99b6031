// ABOUTME: Engine configuration aggregated from environment variables
// ABOUTME: Field test, lactate, velocity, and eligibility settings with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Engine Configuration
//!
//! Environment-only configuration. Every value falls back to the matching
//! constant in [`crate::intelligence::physiological_constants`] when its
//! `PIERRE_*` variable is unset. Components receive their section by value at
//! construction; nothing reads configuration from a global.

/// Methodology entry requirements
pub mod eligibility;
/// Configuration error type
pub mod error;
/// Field test protocol thresholds
pub mod field_test;
/// Lactate curve analysis settings
pub mod lactate;
/// Velocity-based training settings
pub mod velocity;

pub use eligibility::EligibilityConfig;
pub use error::ConfigError;
pub use field_test::FieldTestConfig;
pub use lactate::LactateConfig;
pub use velocity::VelocityConfig;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Field test analyzers
    pub field_tests: FieldTestConfig,
    /// D-max extractor
    pub lactate: LactateConfig,
    /// Load-velocity profiler
    pub velocity: VelocityConfig,
    /// Methodology eligibility validator
    pub eligibility: EligibilityConfig,
}

impl EngineConfig {
    /// Load and validate the full configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or a section fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            field_tests: FieldTestConfig::from_env()?,
            lactate: LactateConfig::from_env()?,
            velocity: VelocityConfig::from_env()?,
            eligibility: EligibilityConfig::from_env()?,
        };
        config.validate()?;
        debug!(?config, "Loaded engine configuration");
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first section error encountered
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field_tests.validate()?;
        self.lactate.validate()?;
        self.velocity.validate()?;
        self.eligibility.validate()
    }
}

/// Read `key` from the environment, falling back to `default` when unset
pub(crate) fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse { key, value }),
        Err(_) => Ok(default),
    }
}
