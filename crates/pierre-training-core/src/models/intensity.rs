// ABOUTME: Intensity distribution and athlete constraint value objects
// ABOUTME: Easy/moderate/hard targets, distribution philosophies, and the athlete training context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::INVARIANT_EPSILON;
use serde::{Deserialize, Serialize};

/// Named training-intensity-distribution philosophy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionMethodology {
    /// Mostly easy with a block of hard work and little in between (~80/5/15)
    Polarized,
    /// Volume decreasing with intensity (~75/15/10)
    Pyramidal,
    /// Substantial time between LT1 and LT2, suited to low volume
    ThresholdFocused,
    /// Lactate-controlled sub-threshold work (Norwegian double threshold)
    Norwegian,
    /// Race-specific intensity around goal pace (Canova)
    Canova,
    /// Caller-supplied split
    Custom,
}

/// Which rule produced a set of targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetSource {
    /// Straight lookup from the weekly-volume table
    VolumeTable,
    /// Many short sessions forced onto the polarized entry
    HighFrequencyGate,
    /// Few sessions allowed a pyramidal/threshold-heavy entry
    LowFrequencyGate,
    /// Explicit caller targets
    Custom,
    /// Built-in split of a planning methodology
    MethodologyDefault,
}

/// Target share of weekly training time per intensity domain
///
/// Producers must return targets whose percentages sum to 100 within
/// [`INVARIANT_EPSILON`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityTargets {
    /// Below LT1
    pub easy_percent: f64,
    /// Between LT1 and LT2
    pub moderate_percent: f64,
    /// Above LT2
    pub hard_percent: f64,
    /// Distribution philosophy the split belongs to
    pub methodology: DistributionMethodology,
    /// Display label
    pub label: String,
    /// Rule that produced the split
    pub source: TargetSource,
}

impl IntensityTargets {
    /// Create targets as given; callers are responsible for normalization
    pub fn new(
        easy_percent: f64,
        moderate_percent: f64,
        hard_percent: f64,
        methodology: DistributionMethodology,
        label: impl Into<String>,
        source: TargetSource,
    ) -> Self {
        Self {
            easy_percent,
            moderate_percent,
            hard_percent,
            methodology,
            label: label.into(),
            source,
        }
    }

    /// Sum of the three percentages
    #[must_use]
    pub fn total_percent(&self) -> f64 {
        self.easy_percent + self.moderate_percent + self.hard_percent
    }

    /// Whether the sum-to-100 invariant holds
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (self.total_percent() - 100.0).abs() <= INVARIANT_EPSILON
    }
}

/// Training load over the trailing four weeks
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailingTrainingLoad {
    /// Total distance over the last 28 days (km)
    pub total_distance_km: f64,
    /// Total training time over the last 28 days (hours)
    pub total_hours: f64,
    /// Number of sessions over the last 28 days
    pub session_count: u32,
}

impl TrailingTrainingLoad {
    /// Average weekly distance (`sum over 28 days / 4`)
    #[must_use]
    pub fn weekly_average_km(&self) -> f64 {
        self.total_distance_km / 4.0
    }

    /// Average weekly hours
    #[must_use]
    pub fn weekly_average_hours(&self) -> f64 {
        self.total_hours / 4.0
    }
}

/// Constraint set describing an athlete's current training situation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteTrainingContext {
    /// Planned weekly training hours
    pub weekly_hours: f64,
    /// Planned sessions per week
    pub sessions_per_week: u32,
    /// Years of structured training
    pub training_age_years: f64,
    /// Whether methodology-specific equipment (e.g. a lactate meter) is available
    pub has_required_equipment: bool,
    /// Load over the trailing 28 days
    pub trailing_training_load: TrailingTrainingLoad,
}
