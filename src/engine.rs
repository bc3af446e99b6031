// ABOUTME: Typed facade over every training science operation
// ABOUTME: Request types, configured analyzers, and per-athlete error context in one entry point
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Training Engine
//!
//! [`TrainingEngine`] holds one instance of each configured analyzer and
//! exposes the engine's operations with request types that mirror the JSON
//! accepted by the CLI. The engine is immutable after construction and can be
//! shared across threads.

use crate::config::EngineConfig;
use crate::errors::{AppError, AppResult};
use crate::intelligence::field_tests::{FieldTest, FieldTestAnalyzer, FieldTestResult};
use crate::intelligence::intensity_distribution::{self, CustomTargets};
use crate::intelligence::lactate_dmax::{DmaxAnalyzer, LactateCurveAnalysis, LactateStage};
use crate::intelligence::load_velocity::{
    LoadVelocityDataPoint, LoadVelocityProfile, LoadVelocityProfiler, VelocityLossReport,
};
use crate::intelligence::methodology_eligibility::{
    AthleteBackground, AthleteHistory, InMemoryTrainingHistory, MethodologyEligibility,
    MethodologyEligibilityValidator, TrainingActivity, TrainingHistoryProvider,
    TrainingMethodology,
};
use crate::intelligence::training_zones::TrainingZones;
use crate::intelligence::workout_distribution::{self, PlanRequest};
use crate::models::{AthleteTrainingContext, IntensityTargets, ThresholdEstimate, WeeklyDistribution};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Field test submitted for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTestSubmission {
    /// Athlete the test belongs to
    #[serde(default)]
    pub athlete_id: Option<Uuid>,
    /// Protocol and measurements
    pub test: FieldTest,
}

/// Graded lactate test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LactateCurveRequest {
    /// Athlete the test belongs to
    #[serde(default)]
    pub athlete_id: Option<Uuid>,
    /// Stages ordered by strictly increasing intensity
    pub stages: Vec<LactateStage>,
}

/// Load-velocity samples for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadVelocityRequest {
    /// Athlete the samples belong to
    #[serde(default)]
    pub athlete_id: Option<Uuid>,
    /// Exercise name, for logging
    #[serde(default)]
    pub exercise: Option<String>,
    /// Mean concentric velocity per set
    pub samples: Vec<LoadVelocityDataPoint>,
}

/// Rep velocities of one set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityLossRequest {
    /// Mean concentric velocity of each rep, in order (m/s)
    pub rep_velocities: Vec<f64>,
}

/// Weekly volume and frequency to resolve targets for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityTargetsRequest {
    /// Weekly training time (hours)
    pub weekly_hours: f64,
    /// Sessions per week
    pub sessions_per_week: u32,
    /// Explicit split overriding the volume table
    #[serde(default)]
    pub custom_targets: Option<CustomTargets>,
}

/// Eligibility check over a supplied training history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    /// Athlete to check
    pub athlete_id: Uuid,
    /// Methodology requested
    pub methodology: TrainingMethodology,
    /// Last day of the trailing window
    pub as_of: NaiveDate,
    /// Background facts
    pub background: AthleteBackground,
    /// Completed sessions; only the 28 days ending on `as_of` count
    #[serde(default)]
    pub activities: Vec<TrainingActivity>,
}

/// Thresholds to derive zones from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesRequest {
    /// Aerobic threshold; estimated from LT2 when omitted
    #[serde(default)]
    pub lt1: Option<ThresholdEstimate>,
    /// Anaerobic threshold
    pub lt2: ThresholdEstimate,
}

/// Configured entry point for all engine operations
#[derive(Debug, Clone, Default)]
pub struct TrainingEngine {
    config: EngineConfig,
    field_tests: FieldTestAnalyzer,
    dmax: DmaxAnalyzer,
    profiler: LoadVelocityProfiler,
    eligibility: MethodologyEligibilityValidator,
}

/// Decode a JSON request body
///
/// # Errors
///
/// Returns `MissingRequiredField` naming the absent field, or `InvalidFormat`
/// for any other malformed body
pub fn decode_request<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    serde_json::from_str(raw).map_err(AppError::malformed_request)
}

/// Attach the athlete id, when known, to an error
fn for_athlete(athlete_id: Option<Uuid>) -> impl FnOnce(AppError) -> AppError {
    move |error| match athlete_id {
        Some(id) => error.with_athlete_id(id),
        None => error,
    }
}

impl TrainingEngine {
    /// Build every analyzer from one configuration
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            field_tests: FieldTestAnalyzer::new(config.field_tests.clone()),
            dmax: DmaxAnalyzer::new(config.lactate.clone()),
            profiler: LoadVelocityProfiler::new(config.velocity.clone()),
            eligibility: MethodologyEligibilityValidator::new(config.eligibility.clone()),
            config,
        }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a field test
    ///
    /// # Errors
    ///
    /// Returns an error if the submission violates its protocol's input contract
    pub fn submit_field_test(&self, submission: &FieldTestSubmission) -> AppResult<FieldTestResult> {
        let result = self
            .field_tests
            .analyze(&submission.test)
            .map_err(for_athlete(submission.athlete_id))?;
        info!(
            athlete_id = ?submission.athlete_id,
            test_type = ?result.test_type,
            valid = result.validation.valid,
            "Field test submission processed"
        );
        Ok(result)
    }

    /// Locate LT1/LT2 on a graded lactate curve
    ///
    /// # Errors
    ///
    /// Returns an error if there are too few stages or the fit fails
    pub fn fit_lactate_curve(&self, request: &LactateCurveRequest) -> AppResult<LactateCurveAnalysis> {
        self.dmax
            .analyze(&request.stages)
            .map_err(for_athlete(request.athlete_id))
    }

    /// Build a load-velocity profile
    ///
    /// # Errors
    ///
    /// Returns an error if the samples are empty or non-positive
    pub fn build_load_velocity_profile(
        &self,
        request: &LoadVelocityRequest,
    ) -> AppResult<LoadVelocityProfile> {
        let profile = self
            .profiler
            .build_profile(&request.samples)
            .map_err(for_athlete(request.athlete_id))?;
        info!(
            athlete_id = ?request.athlete_id,
            exercise = request.exercise.as_deref().unwrap_or("unspecified"),
            valid = profile.is_valid,
            "Load-velocity profile built"
        );
        Ok(profile)
    }

    /// Check a set for velocity loss
    ///
    /// # Errors
    ///
    /// Returns an error if no reps are supplied or a velocity is not positive
    pub fn check_velocity_loss(&self, request: &VelocityLossRequest) -> AppResult<VelocityLossReport> {
        self.profiler.check_velocity_loss(&request.rep_velocities)
    }

    /// Resolve the weekly intensity split
    ///
    /// # Errors
    ///
    /// Returns an error if hours or sessions are out of range
    pub fn resolve_intensity_targets(
        &self,
        request: &IntensityTargetsRequest,
    ) -> AppResult<IntensityTargets> {
        intensity_distribution::resolve_intensity_targets(
            request.weekly_hours,
            request.sessions_per_week,
            request.custom_targets.as_ref(),
        )
    }

    /// Check methodology eligibility with history from `provider`
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot supply the athlete's history
    pub fn validate_methodology_eligibility(
        &self,
        athlete_id: Uuid,
        methodology: TrainingMethodology,
        as_of: NaiveDate,
        provider: &dyn TrainingHistoryProvider,
    ) -> AppResult<MethodologyEligibility> {
        self.eligibility
            .validate(athlete_id, methodology, as_of, provider)
    }

    /// Check methodology eligibility for a known training context
    #[must_use]
    pub fn evaluate_methodology_eligibility(
        &self,
        methodology: TrainingMethodology,
        context: &AthleteTrainingContext,
    ) -> MethodologyEligibility {
        self.eligibility.evaluate(methodology, context)
    }

    /// Check methodology eligibility over a history carried in the request
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read
    pub fn check_eligibility(&self, request: &EligibilityRequest) -> AppResult<MethodologyEligibility> {
        let mut history = InMemoryTrainingHistory::new();
        history.insert(
            request.athlete_id,
            AthleteHistory {
                background: request.background,
                activities: request.activities.clone(),
            },
        );
        self.validate_methodology_eligibility(
            request.athlete_id,
            request.methodology,
            request.as_of,
            &history,
        )
    }

    /// Plan one training week
    ///
    /// # Errors
    ///
    /// Returns an error if the session count is out of range
    pub fn plan_weekly_distribution(&self, request: &PlanRequest) -> AppResult<WeeklyDistribution> {
        workout_distribution::plan_weekly_distribution(request)
    }

    /// Derive training zones from thresholds
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds are not positive or out of order
    pub fn derive_training_zones(&self, request: &ZonesRequest) -> AppResult<TrainingZones> {
        TrainingZones::from_thresholds(request.lt1.as_ref(), &request.lt2)
    }
}
