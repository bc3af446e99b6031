// ABOUTME: Intensity distribution resolution from weekly volume and session frequency
// ABOUTME: Volume table, frequency gates, custom targets, and sum-to-100 normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intensity Distribution Resolver
//!
//! Maps an athlete's weekly hours and session count to an easy / moderate /
//! hard split. Low-volume athletes get more threshold work because they lack
//! the time for a purely polarized week; high-volume athletes spend most of
//! their time below LT1.
//!
//! # Scientific References
//!
//! - Seiler, S. (2010). *IJSPP*, 5(3), 276-291.
//! - Stöggl, T. & Sperlich, B. (2014). *Front. Physiol.*, 5, 33.
//! - Foster, C. et al. (2022). Regulation of training intensity distribution. *IJSPP*, 17(7), 1-8.

use crate::constants::{INVARIANT_EPSILON, MAX_SESSIONS_PER_WEEK};
use crate::errors::{AppError, AppResult};
use crate::intelligence::physiological_constants::intensity_distribution as tid;
use crate::models::{DistributionMethodology, IntensityTargets, TargetSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weekly volume category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeBin {
    /// Under 3 h/week
    VeryLow,
    /// 3-5 h/week
    Low,
    /// 5-9 h/week
    Moderate,
    /// 9-15 h/week
    High,
    /// Over 15 h/week
    VeryHigh,
}

impl VolumeBin {
    /// Bin for a weekly training time
    #[must_use]
    pub fn from_hours(weekly_hours: f64) -> Self {
        if weekly_hours < tid::VERY_LOW_VOLUME_HOURS {
            Self::VeryLow
        } else if weekly_hours < tid::LOW_VOLUME_HOURS {
            Self::Low
        } else if weekly_hours < tid::MODERATE_VOLUME_HOURS {
            Self::Moderate
        } else if weekly_hours <= tid::HIGH_VOLUME_HOURS {
            Self::High
        } else {
            Self::VeryHigh
        }
    }
}

/// Weekly session-count category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrequencyBin {
    /// Three sessions or fewer
    Low,
    /// Four or five sessions
    Moderate,
    /// Six or more sessions
    High,
}

impl FrequencyBin {
    /// Bin for a weekly session count
    #[must_use]
    pub const fn from_sessions(sessions_per_week: u32) -> Self {
        if sessions_per_week <= tid::LOW_FREQUENCY_SESSIONS {
            Self::Low
        } else if sessions_per_week <= tid::MODERATE_FREQUENCY_SESSIONS {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

/// Caller-supplied split, used as-is after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTargets {
    /// Below LT1 (%)
    pub easy_percent: f64,
    /// Between LT1 and LT2 (%)
    pub moderate_percent: f64,
    /// Above LT2 (%)
    pub hard_percent: f64,
    /// Optional display label
    #[serde(default)]
    pub label: Option<String>,
}

/// Volume-table entry for a bin
#[must_use]
pub fn volume_table_entry(bin: VolumeBin) -> IntensityTargets {
    let (easy, moderate, hard, methodology, label) = match bin {
        VolumeBin::VeryLow => (
            65.0,
            20.0,
            15.0,
            DistributionMethodology::ThresholdFocused,
            "Threshold-focused (very low volume)",
        ),
        VolumeBin::Low => (
            70.0,
            20.0,
            10.0,
            DistributionMethodology::Pyramidal,
            "Pyramidal (low volume)",
        ),
        VolumeBin::Moderate => (
            80.0,
            5.0,
            15.0,
            DistributionMethodology::Polarized,
            "Polarized (moderate volume)",
        ),
        VolumeBin::High => (
            85.0,
            5.0,
            10.0,
            DistributionMethodology::Polarized,
            "Polarized (high volume)",
        ),
        VolumeBin::VeryHigh => (
            85.0,
            10.0,
            5.0,
            DistributionMethodology::Pyramidal,
            "Pyramidal (very high volume)",
        ),
    };
    IntensityTargets::new(easy, moderate, hard, methodology, label, TargetSource::VolumeTable)
}

/// Resolve the intensity split for a week
///
/// Custom targets win unconditionally. Otherwise a high session count at low
/// volume is forced onto the polarized entry (many short sessions leave no
/// room for quality threshold work), a low session count at moderate or
/// higher volume uses the pyramidal entry (few long sessions), and all other
/// cases read the volume table.
///
/// # Errors
///
/// Returns an error if hours or sessions are out of range, or custom
/// targets cannot be normalized
pub fn resolve_intensity_targets(
    weekly_hours: f64,
    sessions_per_week: u32,
    custom: Option<&CustomTargets>,
) -> AppResult<IntensityTargets> {
    if !weekly_hours.is_finite() || weekly_hours < 0.0 || weekly_hours > tid::MAX_WEEKLY_HOURS {
        return Err(AppError::out_of_range(
            "weekly_hours",
            weekly_hours,
            0.0,
            tid::MAX_WEEKLY_HOURS,
        ));
    }
    if !(1..=MAX_SESSIONS_PER_WEEK).contains(&sessions_per_week) {
        return Err(AppError::out_of_range(
            "sessions_per_week",
            f64::from(sessions_per_week),
            1.0,
            f64::from(MAX_SESSIONS_PER_WEEK),
        ));
    }

    if let Some(custom) = custom {
        let targets = IntensityTargets::new(
            custom.easy_percent,
            custom.moderate_percent,
            custom.hard_percent,
            DistributionMethodology::Custom,
            custom.label.clone().unwrap_or_else(|| "Custom".to_owned()),
            TargetSource::Custom,
        );
        return normalize_targets(targets);
    }

    let volume = VolumeBin::from_hours(weekly_hours);
    let frequency = FrequencyBin::from_sessions(sessions_per_week);
    debug!(?volume, ?frequency, "Resolving intensity targets");

    let targets = match (frequency, volume) {
        (FrequencyBin::High, _) if weekly_hours < tid::HIGH_FREQUENCY_GATE_HOURS => {
            let mut entry = volume_table_entry(VolumeBin::Moderate);
            entry.label = "Polarized (high frequency, low volume)".to_owned();
            entry.source = TargetSource::HighFrequencyGate;
            entry
        }
        (FrequencyBin::Low, bin) if bin >= VolumeBin::Moderate => IntensityTargets::new(
            70.0,
            20.0,
            10.0,
            DistributionMethodology::Pyramidal,
            "Pyramidal (low frequency)",
            TargetSource::LowFrequencyGate,
        ),
        (_, bin) => volume_table_entry(bin),
    };
    normalize_targets(targets)
}

/// Rescale percentages proportionally so they sum to 100
///
/// Targets already within [`INVARIANT_EPSILON`] of 100 are returned unchanged.
///
/// # Errors
///
/// Returns an error if any component is negative or non-finite, or the sum
/// is not positive
pub fn normalize_targets(mut targets: IntensityTargets) -> AppResult<IntensityTargets> {
    let components = [
        targets.easy_percent,
        targets.moderate_percent,
        targets.hard_percent,
    ];
    if components.iter().any(|c| !c.is_finite() || *c < 0.0) {
        return Err(AppError::invalid_input(format!(
            "Intensity percentages must be non-negative (easy {}, moderate {}, hard {})",
            targets.easy_percent, targets.moderate_percent, targets.hard_percent
        )));
    }
    let total = targets.total_percent();
    if total <= 0.0 {
        return Err(AppError::invalid_input(
            "Intensity percentages must have a positive sum",
        ));
    }
    if (total - 100.0).abs() <= INVARIANT_EPSILON {
        return Ok(targets);
    }

    let scale = 100.0 / total;
    targets.easy_percent *= scale;
    targets.moderate_percent *= scale;
    targets.hard_percent *= scale;
    debug!(total, "Normalized intensity targets");
    Ok(targets)
}
