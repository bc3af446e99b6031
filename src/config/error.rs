// ABOUTME: Configuration error types for engine threshold validation
// ABOUTME: Defines error variants for invalid ranges, unparsable environment values, and inconsistent thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for engine threshold validation.

use crate::errors::AppError;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., a factor that is not positive)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Environment variable present but not parsable
    #[error("Parse error: {key}={value:?} could not be parsed")]
    Parse {
        /// Environment variable name
        key: &'static str,
        /// Raw value found in the environment
        value: String,
    },

    /// Two related thresholds are ordered the wrong way round
    #[error("Inconsistent thresholds: {0}")]
    Inconsistent(&'static str),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string()).with_source(error)
    }
}
