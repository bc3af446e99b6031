// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Command handlers for pierre-training-cli
// ABOUTME: One handler per engine operation plus the parallel field-test batch

use crate::helpers::io::{read_request, write_response};
use pierre_training_engine::engine::{
    EligibilityRequest, FieldTestSubmission, IntensityTargetsRequest, LactateCurveRequest,
    LoadVelocityRequest, TrainingEngine, VelocityLossRequest, ZonesRequest,
};
use pierre_training_engine::errors::{AppResult, ErrorResponse};
use pierre_training_engine::intelligence::field_tests::FieldTestResult;
use pierre_training_engine::intelligence::workout_distribution::PlanRequest;
use pierre_training_engine::logging::EngineLogger;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Read a request, run `operation`, and print its response
fn respond<Req, Resp>(
    name: &str,
    input: Option<&Path>,
    pretty: bool,
    operation: impl FnOnce(&Req) -> AppResult<Resp>,
) -> AppResult<()>
where
    Req: serde::de::DeserializeOwned,
    Resp: Serialize,
{
    let request: Req = read_request(input)?;
    let start = Instant::now();
    let outcome = operation(&request);
    EngineLogger::log_operation(name, outcome.is_ok(), elapsed_ms(start));
    write_response(&outcome?, pretty)
}

pub fn field_test(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    respond("field_test", input, pretty, |request: &FieldTestSubmission| {
        engine.submit_field_test(request)
    })
}

pub fn lactate(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    respond("lactate", input, pretty, |request: &LactateCurveRequest| {
        engine.fit_lactate_curve(request)
    })
}

pub fn load_velocity(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    respond("load_velocity", input, pretty, |request: &LoadVelocityRequest| {
        engine.build_load_velocity_profile(request)
    })
}

pub fn velocity_loss(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    respond("velocity_loss", input, pretty, |request: &VelocityLossRequest| {
        engine.check_velocity_loss(request)
    })
}

pub fn intensity(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    respond("intensity", input, pretty, |request: &IntensityTargetsRequest| {
        engine.resolve_intensity_targets(request)
    })
}

pub fn eligibility(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    respond("eligibility", input, pretty, |request: &EligibilityRequest| {
        engine.check_eligibility(request)
    })
}

pub fn plan(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    respond("plan", input, pretty, |request: &PlanRequest| {
        engine.plan_weekly_distribution(request)
    })
}

pub fn zones(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    respond("zones", input, pretty, |request: &ZonesRequest| {
        engine.derive_training_zones(request)
    })
}

/// Outcome of one submission in a batch
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchOutcome {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    athlete_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<FieldTestResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorResponse>,
}

/// Analyze independent submissions in parallel; failures are reported per entry
pub fn batch(engine: &TrainingEngine, input: Option<&Path>, pretty: bool) -> AppResult<()> {
    let submissions: Vec<FieldTestSubmission> = read_request(input)?;
    let start = Instant::now();

    let outcomes: Vec<BatchOutcome> = submissions
        .par_iter()
        .enumerate()
        .map(|(index, submission)| match engine.submit_field_test(submission) {
            Ok(result) => BatchOutcome {
                index,
                athlete_id: submission.athlete_id,
                result: Some(result),
                error: None,
            },
            Err(error) => BatchOutcome {
                index,
                athlete_id: submission.athlete_id,
                result: None,
                error: Some(error.into()),
            },
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    EngineLogger::log_batch(outcomes.len(), failed, elapsed_ms(start));
    write_response(&outcomes, pretty)
}
