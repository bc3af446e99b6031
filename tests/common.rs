// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides quiet logging setup and canonical lactate, load-velocity, and athlete fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::wildcard_in_or_patterns
)]
//! Shared test utilities for `pierre_training_engine`
//!
//! Each integration test binary includes this module with `mod common;` and
//! uses only the fixtures it needs.

use chrono::{Duration, NaiveDate};
use pierre_training_engine::intelligence::lactate_dmax::LactateStage;
use pierre_training_engine::intelligence::load_velocity::LoadVelocityDataPoint;
use pierre_training_engine::intelligence::methodology_eligibility::{
    AthleteBackground, AthleteHistory, TrainingActivity,
};
use pierre_training_engine::intelligence::workout_distribution::{
    MethodologyConfig, NorwegianVariant,
};
use pierre_training_engine::models::{AthleteTrainingContext, TrailingTrainingLoad};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Seven-stage running test with a classic exponential rise (km/h, mmol/L, bpm)
pub fn classic_lactate_curve() -> Vec<LactateStage> {
    [
        (10.0, 1.0, 130.0),
        (11.0, 1.1, 138.0),
        (12.0, 1.3, 146.0),
        (13.0, 1.8, 154.0),
        (14.0, 2.8, 162.0),
        (15.0, 4.5, 170.0),
        (16.0, 7.5, 178.0),
    ]
    .into_iter()
    .map(|(intensity, lactate, heart_rate)| LactateStage {
        intensity,
        lactate,
        heart_rate: Some(heart_rate),
    })
    .collect()
}

/// Samples on the exact line `v = -0.01 * load + 3.0`
pub fn linear_load_velocity(loads: &[f64]) -> Vec<LoadVelocityDataPoint> {
    loads
        .iter()
        .map(|&load| LoadVelocityDataPoint {
            load,
            velocity: (-0.01_f64).mul_add(load, 3.0),
        })
        .collect()
}

/// Training context with a given training age and trailing weekly distance
pub fn training_context(training_age_years: f64, weekly_km: f64) -> AthleteTrainingContext {
    AthleteTrainingContext {
        weekly_hours: 8.0,
        sessions_per_week: 7,
        training_age_years,
        has_required_equipment: true,
        trailing_training_load: TrailingTrainingLoad {
            total_distance_km: weekly_km * 4.0,
            total_hours: 32.0,
            session_count: 28,
        },
    }
}

/// History with one run per day over the 28 days ending on `as_of`
pub fn daily_history(
    as_of: NaiveDate,
    training_age_years: f64,
    weekly_km: f64,
) -> AthleteHistory {
    AthleteHistory {
        background: AthleteBackground {
            training_age_years,
            has_lactate_meter: true,
        },
        activities: (0..28)
            .map(|day| TrainingActivity {
                date: as_of - Duration::days(day),
                distance_km: weekly_km / 7.0,
                duration_hours: 1.0,
            })
            .collect(),
    }
}

/// Every planning methodology, Norwegian in both variants
pub fn all_methodologies() -> Vec<MethodologyConfig> {
    vec![
        MethodologyConfig::Canova,
        MethodologyConfig::Polarized,
        MethodologyConfig::Norwegian {
            variant: NorwegianVariant::Doubles,
        },
        MethodologyConfig::Norwegian {
            variant: NorwegianVariant::Singles,
        },
        MethodologyConfig::Pyramidal,
        MethodologyConfig::Default,
    ]
}
