// ABOUTME: Integration tests for load-velocity profiling and velocity-loss monitoring
// ABOUTME: Covers e1RM estimation, validity gating of prescriptions, and set stop decisions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_training_engine::engine::{LoadVelocityRequest, TrainingEngine, VelocityLossRequest};
use pierre_training_engine::errors::ErrorCode;
use pierre_training_engine::intelligence::load_velocity::{
    LoadVelocityDataPoint, LoadVelocityProfiler, SetAction,
};

#[test]
fn test_four_load_profile_is_valid() {
    common::init_test_logging();
    let profile = LoadVelocityProfiler::default()
        .build_profile(&common::linear_load_velocity(&[100.0, 150.0, 200.0, 250.0]))
        .unwrap();

    assert!(profile.is_valid, "{:?}", profile.invalid_reasons);
    assert!((profile.slope + 0.01).abs() < 1e-12);
    assert!((profile.r_squared - 1.0).abs() < 1e-9);
    assert!((profile.reference_e1rm().unwrap() - 280.0).abs() < 1e-6);
    assert_eq!(profile.e1rm.len(), 3);

    let load = profile.load_for_velocity(0.5).unwrap();
    assert!((load - 250.0).abs() < 1e-6);
}

#[test]
fn test_two_loads_give_invalid_profile_that_cannot_prescribe() {
    let profile = LoadVelocityProfiler::default()
        .build_profile(&common::linear_load_velocity(&[100.0, 150.0]))
        .unwrap();

    assert!(!profile.is_valid);
    assert!(!profile.invalid_reasons.is_empty());

    let error = profile.load_for_velocity(0.5).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidModel);
}

#[test]
fn test_fastest_rep_per_load_is_kept() {
    let mut samples = common::linear_load_velocity(&[100.0, 150.0, 200.0, 250.0]);
    samples.push(LoadVelocityDataPoint {
        load: 100.0,
        velocity: 1.8,
    });
    let profile = LoadVelocityProfiler::default()
        .build_profile(&samples)
        .unwrap();

    assert_eq!(profile.points.len(), 4);
    assert!((profile.points[0].velocity - 2.0).abs() < 1e-12);
}

#[test]
fn test_narrow_load_range_is_invalid() {
    let profile = LoadVelocityProfiler::default()
        .build_profile(&common::linear_load_velocity(&[200.0, 210.0, 220.0]))
        .unwrap();

    assert!(!profile.is_valid);
    assert!(profile
        .invalid_reasons
        .iter()
        .any(|reason| reason.contains("of e1RM")));
}

#[test]
fn test_non_positive_samples_are_rejected() {
    let error = LoadVelocityProfiler::default()
        .build_profile(&[LoadVelocityDataPoint {
            load: 0.0,
            velocity: 1.0,
        }])
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let error = LoadVelocityProfiler::default().build_profile(&[]).unwrap_err();
    assert_eq!(error.code, ErrorCode::InsufficientData);
}

#[test]
fn test_velocity_loss_stops_set() {
    let report = LoadVelocityProfiler::default()
        .check_velocity_loss(&[1.0, 0.95, 0.9, 0.78])
        .unwrap();

    assert_eq!(report.action, SetAction::Stop);
    assert_eq!(report.triggering_rep, Some(4));
    assert_eq!(report.reps.len(), 4);
    assert!(report.reps[0].loss_percent.abs() < f64::EPSILON);
}

#[test]
fn test_velocity_loss_within_limits_continues() {
    let report = TrainingEngine::default()
        .check_velocity_loss(&VelocityLossRequest {
            rep_velocities: vec![0.5, 0.48, 0.45],
        })
        .unwrap();

    assert_eq!(report.action, SetAction::Continue);
    assert_eq!(report.triggering_rep, None);
}

#[test]
fn test_engine_builds_profile_for_athlete() {
    let request = LoadVelocityRequest {
        athlete_id: None,
        exercise: Some("back squat".to_owned()),
        samples: common::linear_load_velocity(&[100.0, 150.0, 200.0, 250.0]),
    };
    let profile = TrainingEngine::default()
        .build_load_velocity_profile(&request)
        .unwrap();
    assert!(profile.is_valid);
}
