// ABOUTME: Integration tests for field test analysis through the engine
// ABOUTME: Covers every protocol's JSON dispatch, pacing consistency penalties, and omitted thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_training_engine::engine::{FieldTestSubmission, TrainingEngine};
use pierre_training_engine::errors::ErrorCode;
use pierre_training_engine::intelligence::field_tests::{
    CriticalVelocityInput, CriticalVelocityTrial, DriftClassification, FieldTest,
    FieldTestAnalyzer, FieldTestResult, FieldTestType, HrDriftInput, ProtocolMetrics,
    ThirtyMinuteTtInput,
};
use pierre_training_engine::models::Confidence;
use serde_json::json;
use uuid::Uuid;

fn hr_drift(first: f64, second: f64) -> FieldTest {
    FieldTest::HrDrift(HrDriftInput {
        duration_seconds: 3600.0,
        target_pace_sec_per_km: 330.0,
        first_half_avg_hr: first,
        second_half_avg_hr: second,
        heart_rate_samples: None,
    })
}

fn trials(pairs: &[(f64, f64)]) -> FieldTest {
    FieldTest::CriticalVelocity(CriticalVelocityInput {
        trials: pairs
            .iter()
            .map(|&(distance_m, time_seconds)| CriticalVelocityTrial {
                distance_m,
                time_seconds,
            })
            .collect(),
    })
}

#[test]
fn test_low_drift_marks_pace_as_easy() {
    common::init_test_logging();
    let result = FieldTestAnalyzer::default()
        .analyze(&hr_drift(140.0, 144.2))
        .unwrap();

    let ProtocolMetrics::HrDrift {
        drift_percent,
        classification,
    } = result.metrics
    else {
        panic!("expected HR drift metrics");
    };
    assert!((drift_percent - 3.0).abs() < 1e-9);
    assert_eq!(classification, DriftClassification::BelowLt1);
    assert!(result.recommendations[0].contains("below LT1, suitable for easy pace"));
    assert!(result.confidence <= Confidence::Medium);

    let lt1 = result.lt1.unwrap();
    assert!((lt1.pace_sec_per_km - 330.0).abs() < 1e-9);
}

#[test]
fn test_high_drift_withholds_lt1() {
    let result = FieldTestAnalyzer::default()
        .analyze(&hr_drift(140.0, 156.8))
        .unwrap();

    let ProtocolMetrics::HrDrift { classification, .. } = result.metrics else {
        panic!("expected HR drift metrics");
    };
    assert_eq!(classification, DriftClassification::SignificantDrift);
    assert!(result.lt1.is_none());
    assert!(result.lt2.is_none());
    assert!(result.recommendations[0].contains("significant drift, reduce pace"));
    assert_eq!(result.confidence, Confidence::Low);
}

#[test]
fn test_hr_drift_out_of_range_is_rejected() {
    let error = FieldTestAnalyzer::default()
        .analyze(&FieldTest::HrDrift(HrDriftInput {
            duration_seconds: 600.0,
            target_pace_sec_per_km: 330.0,
            first_half_avg_hr: 140.0,
            second_half_avg_hr: 145.0,
            heart_rate_samples: None,
        }))
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
}

#[test]
fn test_critical_velocity_recovers_exact_line() {
    // distance = 4.5 t + 200
    let result = FieldTestAnalyzer::default()
        .analyze(&trials(&[(1010.0, 180.0), (1820.0, 360.0), (3440.0, 720.0)]))
        .unwrap();

    assert!(result.validation.valid);
    assert_eq!(result.test_type, FieldTestType::CriticalVelocity);
    assert_eq!(result.confidence, Confidence::VeryHigh);

    let lt2 = result.lt2.unwrap();
    assert!((lt2.speed_mps - 4.5).abs() < 1e-9);
    let ProtocolMetrics::CriticalVelocity {
        d_prime_m,
        trial_count,
        ..
    } = result.metrics
    else {
        panic!("expected critical velocity metrics");
    };
    assert!((d_prime_m - 200.0).abs() < 1e-6);
    assert_eq!(trial_count, 3);
}

#[test]
fn test_critical_velocity_with_close_trials_omits_threshold() {
    let result = FieldTestAnalyzer::default()
        .analyze(&trials(&[(1010.0, 180.0), (1100.0, 200.0)]))
        .unwrap();

    assert!(!result.validation.valid);
    assert!(!result.validation.errors.is_empty());
    assert!(result.lt2.is_none());
    assert_eq!(result.confidence, Confidence::Low);
}

#[test]
fn test_critical_velocity_trial_count_is_a_contract_error() {
    let error = FieldTestAnalyzer::default()
        .analyze(&trials(&[(1010.0, 180.0)]))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[test]
fn test_engine_dispatches_json_submission() {
    let athlete_id = Uuid::new_v4();
    let submission: FieldTestSubmission = serde_json::from_value(json!({
        "athleteId": athlete_id,
        "test": {
            "testType": "HR_DRIFT",
            "durationSeconds": 3600.0,
            "targetPaceSecPerKm": 330.0,
            "firstHalfAvgHr": 140.0,
            "secondHalfAvgHr": 144.2
        }
    }))
    .unwrap();

    let result = TrainingEngine::default()
        .submit_field_test(&submission)
        .unwrap();
    assert_eq!(result.test_type, FieldTestType::HrDrift);

    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body["testType"], "HR_DRIFT");
    assert_eq!(body["metrics"]["protocol"], "HR_DRIFT");
    assert_eq!(body["metrics"]["classification"], "BELOW_LT1");
}

#[test]
fn test_engine_attaches_athlete_to_contract_errors() {
    let athlete_id = Uuid::new_v4();
    let submission = FieldTestSubmission {
        athlete_id: Some(athlete_id),
        test: trials(&[]),
    };

    let error = TrainingEngine::default()
        .submit_field_test(&submission)
        .unwrap_err();
    assert_eq!(error.context.athlete_id, Some(athlete_id));
}

fn thirty_minute(
    halves: Option<(f64, f64)>,
    five_minute_splits_m: Option<Vec<f64>>,
) -> FieldTest {
    FieldTest::ThirtyMinTt(ThirtyMinuteTtInput {
        total_distance_m: 7200.0,
        first_half_distance_m: halves.map(|(first, _)| first),
        second_half_distance_m: halves.map(|(_, second)| second),
        five_minute_splits_m,
        heart_rate_samples: Some(vec![170.0; 1800]),
        avg_heart_rate: None,
    })
}

fn has_warning(result: &FieldTestResult, fragment: &str) -> bool {
    result
        .validation
        .warnings
        .iter()
        .any(|warning| warning.contains(fragment))
}

#[test]
fn test_thirty_minute_halves_must_match_total_distance() {
    let consistent = FieldTestAnalyzer::default()
        .analyze(&thirty_minute(Some((3600.0, 3600.0)), None))
        .unwrap();
    assert_eq!(consistent.confidence, Confidence::VeryHigh);
    assert!(consistent.validation.warnings.is_empty());

    let contradictory = FieldTestAnalyzer::default()
        .analyze(&thirty_minute(Some((6000.0, 6000.0)), None))
        .unwrap();
    assert!(contradictory.validation.valid);
    assert!(contradictory.confidence < Confidence::VeryHigh);
    assert!(has_warning(&contradictory, "Half distances sum to 12000 m"));
}

#[test]
fn test_thirty_minute_split_sum_mismatch_lowers_confidence() {
    let result = FieldTestAnalyzer::default()
        .analyze(&thirty_minute(None, Some(vec![1250.0; 6])))
        .unwrap();

    assert!(result.validation.valid);
    assert_eq!(result.confidence, Confidence::High);
    assert!(has_warning(&result, "5-minute splits sum to 7500 m"));
}

#[test]
fn test_thirty_minute_split_variation_lowers_confidence() {
    // Halves are equal (3600 m each) so only the split CV is penalized
    let splits = vec![1100.0, 1300.0, 1200.0, 1300.0, 1100.0, 1200.0];
    let result = FieldTestAnalyzer::default()
        .analyze(&thirty_minute(None, Some(splits)))
        .unwrap();

    assert_eq!(result.confidence, Confidence::High);
    assert!(has_warning(&result, "5-minute splits vary by 6.8%"));
    let ProtocolMetrics::ThirtyMinTt {
        split_deviation_percent,
        split_cv_percent,
        ..
    } = result.metrics
    else {
        panic!("expected 30-minute TT metrics");
    };
    assert!(split_deviation_percent.unwrap().abs() < 1e-9);
    assert!((split_cv_percent.unwrap() - 6.804).abs() < 1e-3);
}

#[test]
fn test_engine_dispatches_thirty_minute_json() {
    let submission: FieldTestSubmission = serde_json::from_value(json!({
        "test": {
            "testType": "THIRTY_MIN_TT",
            "totalDistanceM": 7200.0,
            "fiveMinuteSplitsM": [1200.0, 1200.0, 1200.0, 1200.0, 1200.0, 1200.0],
            "heartRateSamples": vec![170.0; 1800]
        }
    }))
    .unwrap();

    let result = TrainingEngine::default()
        .submit_field_test(&submission)
        .unwrap();
    assert_eq!(result.test_type, FieldTestType::ThirtyMinTt);
    assert_eq!(result.confidence, Confidence::VeryHigh);
    let lt2 = result.lt2.as_ref().unwrap();
    assert!((lt2.speed_mps - 4.0).abs() < 1e-9);
    assert!((lt2.heart_rate.unwrap() - 170.0).abs() < 1e-9);

    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body["testType"], "THIRTY_MIN_TT");
    assert_eq!(body["metrics"]["protocol"], "THIRTY_MIN_TT");
}

#[test]
fn test_engine_dispatches_twenty_minute_json() {
    let submission: FieldTestSubmission = serde_json::from_value(json!({
        "test": {
            "testType": "TWENTY_MIN_TT",
            "distanceM": 5000.0,
            "durationSeconds": 1200.0,
            "avgHeartRate": 175.0,
            "fiveMinuteSplitsM": [1250.0, 1250.0, 1250.0, 1250.0]
        }
    }))
    .unwrap();

    let result = TrainingEngine::default()
        .submit_field_test(&submission)
        .unwrap();
    assert_eq!(result.test_type, FieldTestType::TwentyMinTt);
    // Scaled estimates never exceed HIGH
    assert_eq!(result.confidence, Confidence::High);
    assert!(result.assumptions.is_empty());

    let lt2 = result.lt2.as_ref().unwrap();
    assert!((lt2.speed_mps - 5000.0 / 1200.0 * 0.95).abs() < 1e-9);
    assert!((lt2.heart_rate.unwrap() - 175.0 * 0.97).abs() < 1e-9);

    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body["metrics"]["protocol"], "TWENTY_MIN_TT");
}

#[test]
fn test_engine_dispatches_race_based_json() {
    let submission: FieldTestSubmission = serde_json::from_value(json!({
        "test": {
            "testType": "RACE_BASED",
            "raceDistance": "TEN_K",
            "finishTimeSeconds": 2500.0,
            "avgHeartRate": 172.0,
            "athleteLevel": "INTERMEDIATE"
        }
    }))
    .unwrap();

    let result = TrainingEngine::default()
        .submit_field_test(&submission)
        .unwrap();
    assert_eq!(result.test_type, FieldTestType::RaceBased);
    assert_eq!(result.confidence, Confidence::Medium);

    let lt2 = result.lt2.as_ref().unwrap();
    assert!((lt2.speed_mps - 4.0 * 0.94).abs() < 1e-9);
    assert!((lt2.heart_rate.unwrap() - 172.0 * 0.98).abs() < 1e-9);

    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body["metrics"]["protocol"], "RACE_BASED");
    assert!((body["metrics"]["speedFactor"].as_f64().unwrap() - 0.94).abs() < 1e-12);
}
