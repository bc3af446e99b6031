// ABOUTME: Shared value objects passed between training science components
// ABOUTME: Re-exports quality, threshold, intensity, and workout models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Intensity targets and athlete constraints
pub mod intensity;
/// Confidence, validation summaries, and assumed-data annotations
pub mod quality;
/// Threshold estimates and pace conversions
pub mod threshold;
/// Workout slots and weekly distributions
pub mod workout;

pub use intensity::{
    AthleteTrainingContext, DistributionMethodology, IntensityTargets, TargetSource,
    TrailingTrainingLoad,
};
pub use quality::{AssumedField, Confidence, ValidationSummary};
pub use threshold::{format_pace, pace_to_speed, speed_to_pace, ThresholdEstimate};
pub use workout::{
    IntensityZone, SessionVolume, TrainingPhase, WeeklyDistribution, WorkoutSlot, WorkoutType,
};
