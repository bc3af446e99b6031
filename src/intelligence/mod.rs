// ABOUTME: Training science algorithms: threshold detection, profiling, distribution, and planning
// ABOUTME: Pure, synchronous computations over explicit inputs with structured outputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Converts raw performance measurements into physiological thresholds and
//! training zones, and an athlete's constraints into a weekly workout
//! distribution. No component here performs I/O or reads global state.

/// Least-squares fits and perpendicular-distance search
pub mod curve_fitting;
/// Field test protocols estimating LT1/LT2 without a lab
pub mod field_tests;
/// Easy/moderate/hard split from weekly volume and frequency
pub mod intensity_distribution;
/// LT1/LT2 from graded lactate tests (modified D-max)
pub mod lactate_dmax;
/// Load-velocity profiles and velocity-loss set termination
pub mod load_velocity;
/// Entry requirements and transition plans for advanced methodologies
pub mod methodology_eligibility;
/// Physiological limits and default model parameters
pub mod physiological_constants;
/// Five-zone pace/HR model from thresholds
pub mod training_zones;
/// Weekly workout slot allocation per methodology
pub mod workout_distribution;

pub use curve_fitting::{
    linear_regression, polynomial_regression3, r_squared, CubicFit, DataPoint, LinearFit,
};
pub use field_tests::{FieldTest, FieldTestAnalyzer, FieldTestResult, FieldTestType};
pub use intensity_distribution::{
    normalize_targets, resolve_intensity_targets, CustomTargets, FrequencyBin, VolumeBin,
};
pub use lactate_dmax::{DmaxAnalyzer, LactateCurveAnalysis, LactateStage, LactateThreshold};
pub use load_velocity::{
    LoadVelocityDataPoint, LoadVelocityProfile, LoadVelocityProfiler, SetAction,
    VelocityLossReport,
};
pub use methodology_eligibility::{
    InMemoryTrainingHistory, MethodologyEligibility, MethodologyEligibilityValidator,
    TrainingHistoryProvider, TrainingMethodology,
};
pub use training_zones::{TrainingZone, TrainingZones, ZoneName};
pub use workout_distribution::{
    plan_weekly_distribution, MethodologyConfig, NorwegianVariant, PlanRequest,
};
