// ABOUTME: Weekly workout distribution planner dispatching on the training methodology
// ABOUTME: Allocates exactly sessions_per_week slots across days, zones, and workout types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Distribution Planner
//!
//! Turns a methodology, a session count, and a phase into a week of workout
//! slots. The number of quality slots follows the resolved
//! [`IntensityTargets`]: `round(n × hard%)` hard and `round(n × moderate%)`
//! moderate sessions, trimmed so at least one easy session remains.
//!
//! Placement rules shared by every methodology:
//!
//! - training days come from a fixed pattern per session count; more than
//!   seven sessions become same-day doubles
//! - quality sessions go to Tuesday, Thursday, then Saturday, never on
//!   cyclically adjacent days unless the week leaves no alternative, in which
//!   case the slot carries a justification
//! - the long run sits on Sunday (Saturday when Sunday is not a training day)
//!
//! The methodology decides which workouts fill the quality slots, and the
//! phase scales every session's volume.

use crate::constants::MAX_SESSIONS_PER_WEEK;
use crate::errors::{AppError, AppResult};
use crate::intelligence::intensity_distribution::normalize_targets;
use crate::intelligence::methodology_eligibility::TrainingMethodology;
use crate::models::{
    DistributionMethodology, IntensityTargets, IntensityZone, SessionVolume, TargetSource,
    TrainingPhase, WeeklyDistribution, WorkoutSlot, WorkoutType,
};
use chrono::Weekday::{self, Fri, Mon, Sat, Sun, Thu, Tue, Wed};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Training days for 1 to 7 sessions
const TRAINING_DAY_PATTERNS: [&[Weekday]; 7] = [
    &[Sat],
    &[Tue, Sat],
    &[Tue, Thu, Sat],
    &[Tue, Thu, Sat, Sun],
    &[Mon, Tue, Thu, Sat, Sun],
    &[Mon, Tue, Wed, Thu, Sat, Sun],
    &[Mon, Tue, Wed, Thu, Fri, Sat, Sun],
];

/// Order in which days receive quality sessions
const QUALITY_DAY_PREFERENCE: [Weekday; 7] = [Tue, Thu, Sat, Wed, Mon, Fri, Sun];

/// Order in which days receive an easy second session
const DOUBLE_DAY_PREFERENCE: [Weekday; 7] = [Tue, Thu, Wed, Fri, Mon, Sat, Sun];

const EASY_RUN_MINUTES: u32 = 45;
const EASY_DOUBLE_MINUTES: u32 = 30;
const LONG_RUN_MINUTES: u32 = 90;

/// Norwegian session structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NorwegianVariant {
    /// Two threshold sessions on the same day (AM/PM)
    #[default]
    Doubles,
    /// One threshold session per day
    Singles,
}

/// Planning methodology, dispatched with an exhaustive match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodologyConfig {
    /// Race-specific intensity around goal pace
    Canova,
    /// Easy volume plus a small block of hard work
    Polarized,
    /// Lactate-controlled sub-threshold work
    Norwegian {
        /// Doubles or singles
        #[serde(default)]
        variant: NorwegianVariant,
    },
    /// Volume decreasing with intensity
    Pyramidal,
    /// Balanced fallback
    Default,
}

impl MethodologyConfig {
    /// Methodology family, for eligibility checks
    #[must_use]
    pub const fn methodology(self) -> TrainingMethodology {
        match self {
            Self::Canova => TrainingMethodology::Canova,
            Self::Polarized => TrainingMethodology::Polarized,
            Self::Norwegian { .. } => TrainingMethodology::Norwegian,
            Self::Pyramidal => TrainingMethodology::Pyramidal,
            Self::Default => TrainingMethodology::Default,
        }
    }

    /// The methodology's own intensity split
    #[must_use]
    pub fn default_targets(self) -> IntensityTargets {
        let (easy, moderate, hard, methodology, label) = match self {
            Self::Canova => (
                70.0,
                20.0,
                10.0,
                DistributionMethodology::Canova,
                "Canova race-specific",
            ),
            Self::Polarized => (
                80.0,
                5.0,
                15.0,
                DistributionMethodology::Polarized,
                "Polarized 80/20",
            ),
            Self::Norwegian { .. } => (
                70.0,
                25.0,
                5.0,
                DistributionMethodology::Norwegian,
                "Norwegian double threshold",
            ),
            Self::Pyramidal => (
                75.0,
                15.0,
                10.0,
                DistributionMethodology::Pyramidal,
                "Pyramidal",
            ),
            Self::Default => (
                80.0,
                10.0,
                10.0,
                DistributionMethodology::Pyramidal,
                "Balanced default",
            ),
        };
        IntensityTargets::new(
            easy,
            moderate,
            hard,
            methodology,
            label,
            TargetSource::MethodologyDefault,
        )
    }

    /// Threshold sessions are placed as same-day AM/PM pairs
    const fn pairs_threshold_sessions(self) -> bool {
        matches!(
            self,
            Self::Norwegian {
                variant: NorwegianVariant::Doubles
            }
        )
    }

    /// Threshold work takes the preferred days ahead of hard work
    const fn threshold_first(self) -> bool {
        matches!(self, Self::Norwegian { .. } | Self::Canova)
    }

    /// Workout for the `ordinal`-th quality session of a zone
    fn quality_workout(
        self,
        zone: IntensityZone,
        ordinal: usize,
        phase: TrainingPhase,
    ) -> (WorkoutType, SessionVolume) {
        let alternate = ordinal % 2 == 1;
        match (self, zone) {
            (_, IntensityZone::Easy) => (
                WorkoutType::EasyRun,
                SessionVolume::Minutes {
                    minutes: EASY_RUN_MINUTES,
                },
            ),
            (_, IntensityZone::Hard) if phase == TrainingPhase::Taper => {
                (WorkoutType::Sharpening, intervals(6, 1.0, 2.0))
            }
            (Self::Canova, IntensityZone::Moderate) => {
                (WorkoutType::SpecificEndurance, intervals(3, 10.0, 3.0))
            }
            (Self::Canova | Self::Default, IntensityZone::Hard) => {
                (WorkoutType::Intervals, intervals(6, 3.0, 2.0))
            }
            (Self::Polarized | Self::Default, IntensityZone::Moderate) => (
                WorkoutType::Tempo,
                SessionVolume::Minutes { minutes: 25 },
            ),
            (Self::Polarized, IntensityZone::Hard) if alternate => {
                (WorkoutType::HillRepeats, intervals(10, 1.0, 2.0))
            }
            (Self::Polarized, IntensityZone::Hard) => {
                (WorkoutType::Vo2maxIntervals, intervals(5, 3.0, 3.0))
            }
            (Self::Norwegian { .. }, IntensityZone::Moderate) if alternate => {
                (WorkoutType::SubThresholdIntervals, intervals(10, 3.0, 1.0))
            }
            (Self::Norwegian { .. }, IntensityZone::Moderate) => {
                (WorkoutType::SubThresholdIntervals, intervals(5, 6.0, 1.0))
            }
            (Self::Norwegian { .. }, IntensityZone::Hard) => {
                (WorkoutType::HillRepeats, intervals(10, 0.5, 2.0))
            }
            (Self::Pyramidal, IntensityZone::Moderate) => (
                WorkoutType::Tempo,
                SessionVolume::Minutes { minutes: 30 },
            ),
            (Self::Pyramidal, IntensityZone::Hard) if alternate => {
                (WorkoutType::Vo2maxIntervals, intervals(6, 2.0, 2.0))
            }
            (Self::Pyramidal, IntensityZone::Hard) => {
                (WorkoutType::ThresholdIntervals, intervals(4, 8.0, 2.0))
            }
        }
    }
}

const fn intervals(reps: u32, work_minutes: f64, recovery_minutes: f64) -> SessionVolume {
    SessionVolume::Intervals {
        reps,
        work_minutes,
        recovery_minutes,
    }
}

/// Planning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Methodology to plan with
    pub methodology_config: MethodologyConfig,
    /// Training sessions in the week (1-14)
    pub sessions_per_week: u32,
    /// Periodization phase
    #[serde(default)]
    pub phase: TrainingPhase,
    /// Resolved targets; the methodology's own split when omitted
    #[serde(default)]
    pub intensity_targets: Option<IntensityTargets>,
}

/// Number of sessions per zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZoneCounts {
    easy: u32,
    moderate: u32,
    hard: u32,
}

impl ZoneCounts {
    fn from_targets(sessions: u32, targets: &IntensityTargets) -> Self {
        let share = |percent: f64| (f64::from(sessions) * percent / 100.0).round() as u32;
        let max_quality = if sessions >= 2 { sessions - 1 } else { sessions };
        let hard = share(targets.hard_percent).min(max_quality);
        let moderate = share(targets.moderate_percent).min(max_quality - hard);
        Self {
            easy: sessions - hard - moderate,
            moderate,
            hard,
        }
    }
}

/// Quality work occupying one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QualityUnit {
    Single(IntensityZone),
    ThresholdPair,
}

#[derive(Debug, Clone)]
struct PlannedSession {
    zone: IntensityZone,
    workout_type: WorkoutType,
    volume: SessionVolume,
    justification: Option<String>,
}

#[derive(Debug, Clone)]
struct DayPlan {
    day: Weekday,
    sessions: Vec<PlannedSession>,
}

impl DayPlan {
    fn has_quality(&self) -> bool {
        self.sessions
            .iter()
            .any(|session| session.zone != IntensityZone::Easy)
    }
}

/// Mutable week under construction
struct WeekBuilder {
    methodology: MethodologyConfig,
    phase: TrainingPhase,
    days: Vec<DayPlan>,
    hard_placed: usize,
    moderate_placed: usize,
}

impl WeekBuilder {
    fn new(methodology: MethodologyConfig, phase: TrainingPhase, training_days: &[Weekday]) -> Self {
        Self {
            methodology,
            phase,
            days: training_days
                .iter()
                .map(|&day| DayPlan {
                    day,
                    sessions: Vec::new(),
                })
                .collect(),
            hard_placed: 0,
            moderate_placed: 0,
        }
    }

    fn day_mut(&mut self, day: Weekday) -> Option<&mut DayPlan> {
        self.days.iter_mut().find(|plan| plan.day == day)
    }

    fn session_count(&self, day: Weekday) -> Option<usize> {
        self.days
            .iter()
            .find(|plan| plan.day == day)
            .map(|plan| plan.sessions.len())
    }

    fn adjacent_to_quality(&self, day: Weekday) -> bool {
        self.days
            .iter()
            .any(|plan| (plan.day == day.pred() || plan.day == day.succ()) && plan.has_quality())
    }

    fn quality_session(&mut self, zone: IntensityZone, justification: Option<String>) -> PlannedSession {
        let ordinal = match zone {
            IntensityZone::Hard => {
                self.hard_placed += 1;
                self.hard_placed - 1
            }
            IntensityZone::Moderate => {
                self.moderate_placed += 1;
                self.moderate_placed - 1
            }
            IntensityZone::Easy => 0,
        };
        let (workout_type, volume) = self.methodology.quality_workout(zone, ordinal, self.phase);
        PlannedSession {
            zone,
            workout_type,
            volume,
            justification,
        }
    }

    fn place(&mut self, day: Weekday, unit: QualityUnit, justification: Option<String>) {
        let sessions = match unit {
            QualityUnit::Single(zone) => vec![self.quality_session(zone, justification)],
            QualityUnit::ThresholdPair => {
                let reason = justification.unwrap_or_else(|| {
                    "Norwegian double threshold: AM and PM sessions held below LT2 (2.0-3.0 mmol/L) so two sessions cost less than one harder session".to_owned()
                });
                vec![
                    self.quality_session(IntensityZone::Moderate, Some(reason.clone())),
                    self.quality_session(IntensityZone::Moderate, Some(reason)),
                ]
            }
        };
        if let Some(plan) = self.day_mut(day) {
            plan.sessions.extend(sessions);
        }
    }

    /// Place quality units; returns any that could not be placed
    fn place_quality(&mut self, units: Vec<QualityUnit>) -> Vec<QualityUnit> {
        let total_units = units.len();
        let training_days = self.days.len();
        let mut pending = units.into_iter().peekable();

        for day in QUALITY_DAY_PREFERENCE {
            if pending.peek().is_none() {
                break;
            }
            if self.session_count(day) == Some(0) && !self.adjacent_to_quality(day) {
                if let Some(unit) = pending.next() {
                    self.place(day, unit, None);
                }
            }
        }

        for day in QUALITY_DAY_PREFERENCE {
            if pending.peek().is_none() {
                break;
            }
            if self.session_count(day) == Some(0) {
                if let Some(unit) = pending.next() {
                    let reason = format!(
                        "{day:?} follows or precedes another quality day: {total_units} quality days do not fit {training_days} training days without back-to-back sessions"
                    );
                    self.place(day, unit, Some(reason));
                }
            }
        }

        let mut unplaced = Vec::new();
        let mut days = QUALITY_DAY_PREFERENCE.iter().copied();
        for unit in pending {
            let QualityUnit::Single(zone) = unit else {
                unplaced.push(unit);
                continue;
            };
            let Some(day) = days.find(|&day| self.session_count(day) == Some(1)) else {
                unplaced.push(unit);
                continue;
            };
            let reason = format!(
                "Second quality session on {day:?}: more quality sessions than training days"
            );
            self.place(day, QualityUnit::Single(zone), Some(reason));
        }
        unplaced
    }

    fn easy_session(workout_type: WorkoutType, minutes: u32) -> PlannedSession {
        PlannedSession {
            zone: IntensityZone::Easy,
            workout_type,
            volume: SessionVolume::Minutes { minutes },
            justification: None,
        }
    }

    /// Give every empty training day an easy run, then add easy doubles
    fn fill_easy(&mut self, total_sessions: usize) {
        for plan in &mut self.days {
            if plan.sessions.is_empty() {
                plan.sessions
                    .push(Self::easy_session(WorkoutType::EasyRun, EASY_RUN_MINUTES));
            }
        }

        let mut remaining = total_sessions.saturating_sub(self.placed());
        for day in DOUBLE_DAY_PREFERENCE {
            if remaining == 0 {
                break;
            }
            if let Some(plan) = self.day_mut(day) {
                if plan.sessions.len() == 1 {
                    plan.sessions.push(Self::easy_session(
                        WorkoutType::EasyDouble,
                        EASY_DOUBLE_MINUTES,
                    ));
                    remaining -= 1;
                }
            }
        }
    }

    fn placed(&self) -> usize {
        self.days.iter().map(|plan| plan.sessions.len()).sum()
    }

    /// Convert the first easy run on Sunday, else Saturday, into the long run
    fn assign_long_run(&mut self) {
        for day in [Sun, Sat] {
            if let Some(plan) = self.day_mut(day) {
                if let Some(first) = plan.sessions.first_mut() {
                    if first.workout_type == WorkoutType::EasyRun {
                        first.workout_type = WorkoutType::LongRun;
                        first.volume = SessionVolume::Minutes {
                            minutes: LONG_RUN_MINUTES,
                        };
                        return;
                    }
                }
            }
        }
    }

    fn finish(mut self) -> WeeklyDistribution {
        self.days.sort_by_key(|plan| plan.day.num_days_from_monday());
        let factor = self.phase.duration_factor();
        let rest_days = [Mon, Tue, Wed, Thu, Fri, Sat, Sun]
            .into_iter()
            .filter(|day| self.days.iter().all(|plan| plan.day != *day))
            .collect();
        let slots = self
            .days
            .into_iter()
            .flat_map(|plan| {
                let day = plan.day;
                plan.sessions
                    .into_iter()
                    .zip(1_u8..)
                    .map(move |(session, session_of_day)| WorkoutSlot {
                        day,
                        session_of_day,
                        workout_type: session.workout_type,
                        zone: session.zone,
                        duration_or_volume: session.volume.scaled(factor),
                        justification: session.justification,
                    })
            })
            .collect();
        WeeklyDistribution { slots, rest_days }
    }
}

/// Plan one training week
///
/// # Errors
///
/// Returns an error if `sessions_per_week` is outside 1-14 or supplied
/// targets cannot be normalized
pub fn plan_weekly_distribution(request: &PlanRequest) -> AppResult<WeeklyDistribution> {
    let sessions = request.sessions_per_week;
    if !(1..=MAX_SESSIONS_PER_WEEK).contains(&sessions) {
        return Err(AppError::out_of_range(
            "sessions_per_week",
            f64::from(sessions),
            1.0,
            f64::from(MAX_SESSIONS_PER_WEEK),
        ));
    }
    let methodology = request.methodology_config;
    let targets = match &request.intensity_targets {
        Some(targets) => normalize_targets(targets.clone())?,
        None => methodology.default_targets(),
    };

    let counts = ZoneCounts::from_targets(sessions, &targets);
    let pairs = if methodology.pairs_threshold_sessions() {
        counts.moderate / 2
    } else {
        0
    };
    let single_moderate = counts.moderate - 2 * pairs;
    debug!(?counts, pairs, "Allocating weekly sessions");

    let mut units = vec![QualityUnit::ThresholdPair; pairs as usize];
    let moderate_units = std::iter::repeat(QualityUnit::Single(IntensityZone::Moderate))
        .take(single_moderate as usize);
    let hard_units =
        std::iter::repeat(QualityUnit::Single(IntensityZone::Hard)).take(counts.hard as usize);
    if methodology.threshold_first() {
        units.extend(moderate_units.chain(hard_units));
    } else {
        units.extend(hard_units.chain(moderate_units));
    }

    // Each AM/PM pair frees a training day
    let training_day_count = (sessions - pairs).min(7) as usize;
    let mut week = WeekBuilder::new(
        methodology,
        request.phase,
        TRAINING_DAY_PATTERNS[training_day_count - 1],
    );

    let unplaced = week.place_quality(units);
    if !unplaced.is_empty() {
        return Err(AppError::internal(format!(
            "{} quality sessions could not be placed in a {sessions}-session week",
            unplaced.len()
        )));
    }
    week.fill_easy(sessions as usize);
    week.assign_long_run();

    let placed = week.placed();
    if placed != sessions as usize {
        return Err(AppError::internal(format!(
            "Planned {placed} sessions for a {sessions}-session week"
        )));
    }

    let distribution = week.finish();
    info!(
        ?methodology,
        sessions,
        hard = counts.hard,
        moderate = counts.moderate,
        rest_days = distribution.rest_days.len(),
        "Planned weekly distribution"
    );
    Ok(distribution)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(methodology_config: MethodologyConfig, sessions_per_week: u32) -> PlanRequest {
        PlanRequest {
            methodology_config,
            sessions_per_week,
            phase: TrainingPhase::Base,
            intensity_targets: None,
        }
    }

    #[test]
    fn test_zone_counts_keep_an_easy_session() {
        let targets = IntensityTargets::new(
            0.0,
            50.0,
            50.0,
            DistributionMethodology::Custom,
            "Custom",
            TargetSource::Custom,
        );
        let counts = ZoneCounts::from_targets(4, &targets);
        assert_eq!(counts.easy, 1);
        assert_eq!(counts.hard + counts.moderate, 3);
    }

    #[test]
    fn test_single_session_week() {
        let week = plan_weekly_distribution(&request(MethodologyConfig::Polarized, 1)).unwrap();
        assert_eq!(week.slots.len(), 1);
        assert_eq!(week.slots[0].day, Sat);
        assert_eq!(week.rest_days.len(), 6);
    }

    #[test]
    fn test_norwegian_doubles_pair_threshold_sessions() {
        let config = MethodologyConfig::Norwegian {
            variant: NorwegianVariant::Doubles,
        };
        let week = plan_weekly_distribution(&request(config, 7)).unwrap();

        let tuesday: Vec<_> = week.slots_on(Tue).collect();
        assert_eq!(tuesday.len(), 2);
        assert!(tuesday
            .iter()
            .all(|slot| slot.workout_type == WorkoutType::SubThresholdIntervals
                && slot.justification.is_some()));
    }

    #[test]
    fn test_taper_scales_volume() {
        let mut taper = request(MethodologyConfig::Pyramidal, 5);
        taper.phase = TrainingPhase::Taper;
        let week = plan_weekly_distribution(&taper).unwrap();

        let long_run = week
            .slots
            .iter()
            .find(|slot| slot.workout_type == WorkoutType::LongRun)
            .unwrap();
        assert_eq!(
            long_run.duration_or_volume,
            SessionVolume::Minutes { minutes: 54 }
        );
    }

    #[test]
    fn test_out_of_range_sessions_rejected() {
        assert!(plan_weekly_distribution(&request(MethodologyConfig::Default, 0)).is_err());
        assert!(plan_weekly_distribution(&request(MethodologyConfig::Default, 15)).is_err());
    }
}
