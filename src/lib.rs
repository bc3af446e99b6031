// ABOUTME: Main library entry point for the Pierre training science engine
// ABOUTME: Thresholds, zones, and weekly workout distributions from raw performance data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Pierre Training Engine
//!
//! Converts raw athlete performance measurements into physiological
//! thresholds and training zones, and converts an athlete's training
//! constraints into a structured weekly workout distribution.
//!
//! ## Components
//!
//! - **Field test analyzers**: 30-minute TT, HR drift, critical velocity,
//!   20-minute TT and race-based LT1/LT2 estimates
//! - **D-max extractor**: LT1/LT2 from a graded lactate test
//! - **Load-velocity profiler**: e1RM and velocity-loss set termination
//! - **Intensity distribution resolver**: easy/moderate/hard split
//! - **Methodology eligibility validator**: Norwegian and Canova entry gates
//! - **Workout distribution planner**: weekly slots per methodology
//!
//! Every component is a pure function over explicit inputs. The library
//! never installs a tracing subscriber; binaries do.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_training_engine::config::EngineConfig;
//! use pierre_training_engine::engine::{IntensityTargetsRequest, TrainingEngine};
//! use pierre_training_engine::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let engine = TrainingEngine::new(EngineConfig::from_env()?);
//!     let targets = engine.resolve_intensity_targets(&IntensityTargetsRequest {
//!         weekly_hours: 7.0,
//!         sessions_per_week: 5,
//!         custom_targets: None,
//!     })?;
//!     println!("{}: {:.0}/{:.0}/{:.0}", targets.label, targets.easy_percent,
//!              targets.moderate_percent, targets.hard_percent);
//!     Ok(())
//! }
//! ```

/// Environment-based configuration for model parameters
pub mod config;

/// Typed facade over all engine operations
pub mod engine;

/// Training science algorithms
pub mod intelligence;

/// Structured logging setup for binaries
pub mod logging;

/// Engine-wide constants
pub use pierre_training_core::constants;
/// Unified error handling system with standard error codes
pub use pierre_training_core::errors;
/// Shared value objects
pub use pierre_training_core::models;
