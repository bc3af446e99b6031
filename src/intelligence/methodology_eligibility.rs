// ABOUTME: Entry gating for advanced training methodologies (Norwegian double threshold, Canova)
// ABOUTME: Checks training age, trailing aerobic base, and equipment, and attaches a staged transition plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Methodology Eligibility Validator
//!
//! High-density threshold methodologies are only safe for athletes with
//! several years of training and a solid aerobic base. The validator reports
//! every requirement with a coach-facing message and always attaches a staged
//! transition plan for gated methodologies, so an athlete who is not ready
//! yet still sees the path in.
//!
//! Training history is read through [`TrainingHistoryProvider`], injected by
//! the caller. [`MethodologyEligibilityValidator::evaluate`] is the pure entry
//! point for callers that already hold an [`AthleteTrainingContext`].

use crate::config::EligibilityConfig;
use crate::errors::{AppError, AppResult};
use crate::intelligence::physiological_constants::methodology as requirements;
use crate::models::{AthleteTrainingContext, TrailingTrainingLoad};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Methodology family used for eligibility and planning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingMethodology {
    /// Lactate-controlled double threshold
    Norwegian,
    /// Race-specific intensity (Renato Canova)
    Canova,
    /// Polarized 80/20
    Polarized,
    /// Pyramidal
    Pyramidal,
    /// Volume-table default
    Default,
}

impl TrainingMethodology {
    /// Whether the methodology has entry requirements
    #[must_use]
    pub const fn is_gated(self) -> bool {
        matches!(self, Self::Norwegian | Self::Canova)
    }
}

/// Kind of entry requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementKind {
    /// Years of structured training
    TrainingAge,
    /// Trailing four-week average distance
    AerobicBase,
    /// Methodology-specific equipment (lactate meter)
    Equipment,
}

/// One checked requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequirement {
    /// Requirement kind
    pub requirement: RequirementKind,
    /// Whether the athlete meets it
    pub met: bool,
    /// Coach-facing explanation citing measured and required values
    pub message: String,
}

/// One stage of the transition into a gated methodology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPhase {
    /// 1-based phase number
    pub phase: u8,
    /// Phase name
    pub name: String,
    /// Week range, e.g. "1-4" or "13+"
    pub weeks: String,
    /// Weekly volume of methodology-specific work, e.g. "8-10 km"
    pub weekly_threshold_volume: String,
    /// Key sessions of the phase
    pub sessions: Vec<String>,
    /// Conditions to satisfy before starting the phase
    pub entry_criteria: Vec<String>,
}

/// Eligibility verdict, recomputed on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodologyEligibility {
    /// Methodology checked
    pub methodology: TrainingMethodology,
    /// True when every requirement is met
    pub eligible: bool,
    /// Requirement-by-requirement results
    pub requirements: Vec<EligibilityRequirement>,
    /// Staged plan for gated methodologies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_plan: Option<Vec<TransitionPhase>>,
}

/// Completed training session as reported by the history store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingActivity {
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Distance covered (km)
    pub distance_km: f64,
    /// Session duration (hours)
    pub duration_hours: f64,
}

/// Static athlete facts held by the history store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteBackground {
    /// Years of structured training
    pub training_age_years: f64,
    /// Whether the athlete owns a lactate meter
    pub has_lactate_meter: bool,
}

/// Source of training history, supplied by the caller
pub trait TrainingHistoryProvider {
    /// Background facts for an athlete
    ///
    /// # Errors
    ///
    /// Returns an error if the athlete is unknown or the store is unavailable
    fn athlete_background(&self, athlete_id: Uuid) -> AppResult<AthleteBackground>;

    /// Activities dated within `[from, to]` inclusive
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable
    fn activities_between(
        &self,
        athlete_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<TrainingActivity>>;
}

/// In-memory history store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryTrainingHistory {
    athletes: HashMap<Uuid, AthleteHistory>,
}

/// Stored history for one athlete
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteHistory {
    /// Background facts
    pub background: AthleteBackground,
    /// Completed sessions
    pub activities: Vec<TrainingActivity>,
}

impl InMemoryTrainingHistory {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an athlete's history
    pub fn insert(&mut self, athlete_id: Uuid, history: AthleteHistory) {
        self.athletes.insert(athlete_id, history);
    }

    fn history(&self, athlete_id: Uuid) -> AppResult<&AthleteHistory> {
        self.athletes
            .get(&athlete_id)
            .ok_or_else(|| AppError::not_found(format!("Athlete {athlete_id}")).with_athlete_id(athlete_id))
    }
}

impl TrainingHistoryProvider for InMemoryTrainingHistory {
    fn athlete_background(&self, athlete_id: Uuid) -> AppResult<AthleteBackground> {
        Ok(self.history(athlete_id)?.background)
    }

    fn activities_between(
        &self,
        athlete_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<TrainingActivity>> {
        Ok(self
            .history(athlete_id)?
            .activities
            .iter()
            .filter(|activity| activity.date >= from && activity.date <= to)
            .copied()
            .collect())
    }
}

/// Validates athletes against methodology entry requirements
#[derive(Debug, Clone, Default)]
pub struct MethodologyEligibilityValidator {
    config: EligibilityConfig,
}

impl MethodologyEligibilityValidator {
    /// Create a validator with explicit requirements
    #[must_use]
    pub const fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    /// Check eligibility using history read from `provider`
    ///
    /// The aerobic base is the distance logged over the 28 days ending on
    /// `as_of`, divided by four.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot supply the athlete's history or
    /// `as_of` is too early for the trailing window
    pub fn validate(
        &self,
        athlete_id: Uuid,
        methodology: TrainingMethodology,
        as_of: NaiveDate,
        provider: &dyn TrainingHistoryProvider,
    ) -> AppResult<MethodologyEligibility> {
        let background = provider
            .athlete_background(athlete_id)
            .map_err(|e| e.with_athlete_id(athlete_id))?;
        let from = as_of
            .checked_sub_signed(Duration::days(requirements::TRAILING_WINDOW_DAYS - 1))
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "as_of {as_of} leaves no room for a {}-day trailing window",
                    requirements::TRAILING_WINDOW_DAYS
                ))
                .with_field("as_of")
                .with_athlete_id(athlete_id)
            })?;
        let activities = provider
            .activities_between(athlete_id, from, as_of)
            .map_err(|e| e.with_athlete_id(athlete_id))?;

        let context = training_context(background, &activities);
        debug!(
            %athlete_id,
            weekly_km = context.trailing_training_load.weekly_average_km(),
            "Built training context from history"
        );
        let eligibility = self.evaluate(methodology, &context);
        info!(%athlete_id, ?methodology, eligible = eligibility.eligible, "Methodology eligibility evaluated");
        Ok(eligibility)
    }

    /// Check eligibility for a known training context
    #[must_use]
    pub fn evaluate(
        &self,
        methodology: TrainingMethodology,
        context: &AthleteTrainingContext,
    ) -> MethodologyEligibility {
        let requirements = match methodology {
            TrainingMethodology::Norwegian => {
                let mut checks = vec![
                    training_age_requirement(
                        context.training_age_years,
                        self.config.norwegian_min_training_age_years,
                    ),
                    aerobic_base_requirement(
                        &context.trailing_training_load,
                        self.config.norwegian_min_weekly_km,
                    ),
                ];
                if self.config.norwegian_requires_equipment {
                    checks.push(equipment_requirement(context.has_required_equipment));
                }
                checks
            }
            TrainingMethodology::Canova => vec![
                training_age_requirement(
                    context.training_age_years,
                    self.config.canova_min_training_age_years,
                ),
                aerobic_base_requirement(
                    &context.trailing_training_load,
                    self.config.canova_min_weekly_km,
                ),
            ],
            TrainingMethodology::Polarized
            | TrainingMethodology::Pyramidal
            | TrainingMethodology::Default => Vec::new(),
        };

        let eligible = requirements.iter().all(|r| r.met);
        let transition_plan = methodology.is_gated().then(|| {
            let unmet: Vec<String> = requirements
                .iter()
                .filter(|r| !r.met)
                .map(|r| r.message.clone())
                .collect();
            transition_plan(methodology, unmet)
        });

        MethodologyEligibility {
            methodology,
            eligible,
            requirements,
            transition_plan,
        }
    }
}

/// Aggregate background and trailing activities into a training context
fn training_context(
    background: AthleteBackground,
    activities: &[TrainingActivity],
) -> AthleteTrainingContext {
    let load = TrailingTrainingLoad {
        total_distance_km: activities.iter().map(|a| a.distance_km).sum(),
        total_hours: activities.iter().map(|a| a.duration_hours).sum(),
        session_count: u32::try_from(activities.len()).unwrap_or(u32::MAX),
    };
    AthleteTrainingContext {
        weekly_hours: load.weekly_average_hours(),
        sessions_per_week: (f64::from(load.session_count) / requirements::TRAILING_WINDOW_WEEKS)
            .round() as u32,
        training_age_years: background.training_age_years,
        has_required_equipment: background.has_lactate_meter,
        trailing_training_load: load,
    }
}

/// Whole numbers print without a decimal ("1 years"), others with one
fn format_years(years: f64) -> String {
    if years.fract().abs() < f64::EPSILON {
        format!("{years:.0}")
    } else {
        format!("{years:.1}")
    }
}

fn training_age_requirement(actual: f64, required: f64) -> EligibilityRequirement {
    let met = actual >= required;
    let message = if met {
        format!(
            "Training age of {} years meets the required {} years",
            format_years(actual),
            format_years(required)
        )
    } else {
        format!(
            "Training age of {} years is below the required {} years",
            format_years(actual),
            format_years(required)
        )
    };
    EligibilityRequirement {
        requirement: RequirementKind::TrainingAge,
        met,
        message,
    }
}

fn aerobic_base_requirement(load: &TrailingTrainingLoad, required_km: f64) -> EligibilityRequirement {
    let weekly_km = load.weekly_average_km();
    let met = weekly_km >= required_km;
    let message = if met {
        format!(
            "Trailing 4-week average of {weekly_km:.1} km/week meets the required {required_km:.1} km/week"
        )
    } else {
        format!(
            "Trailing 4-week average of {weekly_km:.1} km/week is below the required {required_km:.1} km/week"
        )
    };
    EligibilityRequirement {
        requirement: RequirementKind::AerobicBase,
        met,
        message,
    }
}

fn equipment_requirement(available: bool) -> EligibilityRequirement {
    EligibilityRequirement {
        requirement: RequirementKind::Equipment,
        met: available,
        message: if available {
            "Lactate meter available for intensity control".to_owned()
        } else {
            "A lactate meter is required to keep threshold sessions at 2-3 mmol/L".to_owned()
        },
    }
}

/// Four-phase plan; phase 1 lists unmet requirements as entry criteria
fn transition_plan(methodology: TrainingMethodology, unmet: Vec<String>) -> Vec<TransitionPhase> {
    let stages: [(&str, &str, &str, &[&str]); 4] = match methodology {
        TrainingMethodology::Canova => [
            (
                "Aerobic Foundation",
                "1-4",
                "6-8 km",
                &[
                    "Progressive long run finishing at marathon pace",
                    "Fartlek with 1-2 min surges at 10K pace",
                ],
            ),
            (
                "Fundamental Period",
                "5-8",
                "10-12 km",
                &[
                    "Extensive intervals at 90-95% of race pace",
                    "Long run at 85-90% of race pace",
                ],
            ),
            (
                "Special Period",
                "9-12",
                "14-18 km",
                &[
                    "Special block: two sessions in one day at 95-100% of race pace",
                    "Long fast run at 95% of race pace",
                ],
            ),
            (
                "Specific Period",
                "13+",
                "18-24 km",
                &[
                    "Specific endurance at 98-102% of race pace",
                    "Race-pace long run with alternations",
                ],
            ),
        ],
        _ => [
            (
                "Threshold Familiarization",
                "1-4",
                "8-10 km",
                &[
                    "One threshold session per week: 5 x 6 min at 2.0-2.5 mmol/L",
                    "Measure lactate after reps 2 and 5 to learn the pace-to-lactate relationship",
                ],
            ),
            (
                "Threshold Volume Build",
                "5-8",
                "12-15 km",
                &[
                    "Two single threshold sessions per week on non-consecutive days",
                    "Extend reps toward 10 x 1000 m at 2.5-3.0 mmol/L",
                ],
            ),
            (
                "Double Threshold Introduction",
                "9-12",
                "15-20 km",
                &[
                    "One double threshold day per week: AM 5 x 2000 m, PM 10 x 1000 m",
                    "One single threshold session later in the week",
                ],
            ),
            (
                "Full Protocol",
                "13+",
                "20-25 km",
                &[
                    "Two double threshold days per week (Tuesday and Thursday)",
                    "Saturday hill sprints or short VO2max session; all other running easy",
                ],
            ),
        ],
    };

    let mut first_phase_criteria = Some(unmet);
    stages
        .iter()
        .zip(1_u8..)
        .map(|(&(name, weeks, volume, sessions), phase)| TransitionPhase {
            phase,
            name: name.to_owned(),
            weeks: weeks.to_owned(),
            weekly_threshold_volume: volume.to_owned(),
            sessions: sessions.iter().map(|s| (*s).to_owned()).collect(),
            entry_criteria: match first_phase_criteria.take() {
                Some(unmet) => unmet,
                None => vec![format!(
                    "Completed phase {} without persistent fatigue or elevated resting heart rate",
                    phase - 1
                )],
            },
        })
        .collect()
}
