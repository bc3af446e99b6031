// ABOUTME: Criterion benchmarks for training science algorithms
// ABOUTME: Measures D-max curve analysis, load-velocity fitting, target resolution, and week planning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for training science algorithms.
//!
//! The D-max grid search dominates lactate analysis cost, so it is measured
//! across grid resolutions. Planning is measured across the full session range.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_training_engine::config::LactateConfig;
use pierre_training_engine::intelligence::intensity_distribution::resolve_intensity_targets;
use pierre_training_engine::intelligence::lactate_dmax::{DmaxAnalyzer, LactateStage};
use pierre_training_engine::intelligence::load_velocity::{
    LoadVelocityDataPoint, LoadVelocityProfiler,
};
use pierre_training_engine::intelligence::workout_distribution::{
    plan_weekly_distribution, MethodologyConfig, NorwegianVariant, PlanRequest,
};
use pierre_training_engine::models::TrainingPhase;

fn lactate_stages() -> Vec<LactateStage> {
    [1.0, 1.1, 1.3, 1.8, 2.8, 4.5, 7.5, 11.0]
        .into_iter()
        .zip(10..)
        .map(|(lactate, kmh)| LactateStage {
            intensity: f64::from(kmh),
            lactate,
            heart_rate: Some(f64::from(kmh).mul_add(8.0, 50.0)),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn load_velocity_samples(count: usize) -> Vec<LoadVelocityDataPoint> {
    (0..count)
        .map(|index| {
            let load = 60.0 + (index % 12) as f64 * 10.0;
            // Rep-to-rep noise so grouping keeps the fastest rep
            let noise = ((index * 7) % 5) as f64 * 0.01;
            LoadVelocityDataPoint {
                load,
                velocity: (-0.008_f64).mul_add(load, 1.8) - noise,
            }
        })
        .collect()
}

/// Benchmark D-max analysis at increasing grid resolution
fn bench_dmax_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("dmax");
    let stages = lactate_stages();

    for grid_steps in [250, 1000, 4000] {
        let analyzer = DmaxAnalyzer::new(LactateConfig {
            grid_steps,
            ..LactateConfig::default()
        });
        group.throughput(Throughput::Elements(grid_steps as u64));
        group.bench_with_input(
            BenchmarkId::new("analyze", grid_steps),
            &stages,
            |b, stages| b.iter(|| analyzer.analyze(black_box(stages))),
        );
    }

    group.finish();
}

/// Benchmark profile fitting with growing rep counts
fn bench_load_velocity_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_velocity");
    let profiler = LoadVelocityProfiler::default();

    for count in [12, 120, 1200] {
        let samples = load_velocity_samples(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("build_profile", count),
            &samples,
            |b, samples| b.iter(|| profiler.build_profile(black_box(samples))),
        );
    }

    group.finish();
}

/// Benchmark target resolution across the volume and frequency grid
fn bench_intensity_resolution(c: &mut Criterion) {
    c.bench_function("resolve_intensity_targets_grid", |b| {
        b.iter(|| {
            for tenths in (0..=400_u32).step_by(5) {
                for sessions in 1..=14 {
                    let _ = resolve_intensity_targets(
                        black_box(f64::from(tenths) / 10.0),
                        black_box(sessions),
                        None,
                    );
                }
            }
        });
    });
}

/// Benchmark week planning for every session count
fn bench_week_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("planner");
    group.sample_size(50);

    for methodology_config in [
        MethodologyConfig::Polarized,
        MethodologyConfig::Norwegian {
            variant: NorwegianVariant::Doubles,
        },
    ] {
        group.bench_function(format!("{methodology_config:?}"), |b| {
            b.iter(|| {
                for sessions_per_week in 1..=14 {
                    let _ = plan_weekly_distribution(black_box(&PlanRequest {
                        methodology_config,
                        sessions_per_week,
                        phase: TrainingPhase::Build,
                        intensity_targets: None,
                    }));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_dmax_analysis,
    bench_load_velocity_profile,
    bench_intensity_resolution,
    bench_week_planning,
);
criterion_main!(benches);
