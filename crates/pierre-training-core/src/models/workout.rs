// ABOUTME: Weekly workout distribution value objects
// ABOUTME: Workout slots, intensity zones, workout types, training phases, and the weekly distribution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Three-zone intensity model matching [`super::IntensityTargets`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntensityZone {
    /// Below LT1
    Easy,
    /// Between LT1 and LT2
    Moderate,
    /// At or above LT2
    Hard,
}

/// Periodization phase the week belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingPhase {
    /// General preparation
    #[default]
    Base,
    /// Specific preparation
    Build,
    /// Race-specific sharpening
    Peak,
    /// Pre-race volume reduction
    Taper,
}

impl TrainingPhase {
    /// Multiplier applied to session durations in this phase
    #[must_use]
    pub const fn duration_factor(self) -> f64 {
        match self {
            Self::Base | Self::Build => 1.0,
            Self::Peak => 0.9,
            Self::Taper => 0.6,
        }
    }
}

/// Kind of session placed in a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkoutType {
    /// Conversational aerobic run
    EasyRun,
    /// Short easy run as the second session of a day
    EasyDouble,
    /// Weekly long aerobic run
    LongRun,
    /// Continuous run between LT1 and LT2
    Tempo,
    /// Intervals at LT2
    ThresholdIntervals,
    /// Lactate-controlled intervals just below LT2 (Norwegian)
    SubThresholdIntervals,
    /// Intervals at VO2max pace
    Vo2maxIntervals,
    /// Short uphill repeats
    HillRepeats,
    /// Race-pace work at 95-105 % of goal pace (Canova)
    SpecificEndurance,
    /// Short sharp efforts to keep speed during a taper
    Sharpening,
    /// Generic mixed-pace intervals
    Intervals,
}

/// How much work a slot carries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum SessionVolume {
    /// Continuous duration
    Minutes {
        /// Total minutes
        minutes: u32,
    },
    /// Repeated work bouts
    Intervals {
        /// Number of repetitions
        reps: u32,
        /// Work duration per repetition (minutes)
        work_minutes: f64,
        /// Recovery between repetitions (minutes)
        recovery_minutes: f64,
    },
}

impl SessionVolume {
    /// Scale the session by a phase factor, keeping at least one rep / minute
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            Self::Minutes { minutes } => Self::Minutes {
                minutes: ((f64::from(minutes) * factor).round() as u32).max(1),
            },
            Self::Intervals {
                reps,
                work_minutes,
                recovery_minutes,
            } => Self::Intervals {
                reps: ((f64::from(reps) * factor).round() as u32).max(1),
                work_minutes,
                recovery_minutes,
            },
        }
    }
}

/// One session of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSlot {
    /// Day of the week
    pub day: Weekday,
    /// 1 for the first session of the day, 2 for a double
    pub session_of_day: u8,
    /// Session kind
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    /// Intensity zone
    pub zone: IntensityZone,
    /// Duration or interval structure
    pub duration_or_volume: SessionVolume,
    /// Why a rule (e.g. no back-to-back hard days) was deliberately broken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// A planned training week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDistribution {
    /// Training slots ordered by day then session of day
    pub slots: Vec<WorkoutSlot>,
    /// Days without training
    pub rest_days: Vec<Weekday>,
}

impl WeeklyDistribution {
    /// Number of slots tagged with `zone`
    #[must_use]
    pub fn count_in_zone(&self, zone: IntensityZone) -> usize {
        self.slots.iter().filter(|slot| slot.zone == zone).count()
    }

    /// Slots scheduled on `day`
    pub fn slots_on(&self, day: Weekday) -> impl Iterator<Item = &WorkoutSlot> {
        self.slots.iter().filter(move |slot| slot.day == day)
    }
}
