// ABOUTME: Load-velocity profiling for velocity-based strength training
// ABOUTME: Best-rep-per-load linear profile, e1RM at minimum velocity thresholds, validity rules, and velocity-loss stop check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Load-Velocity Profiler
//!
//! Mean concentric velocity falls almost linearly with load. The fitted line
//! is inverted at a minimum velocity threshold to estimate a one-repetition
//! maximum (e1RM) without a maximal attempt.
//!
//! # Scientific References
//!
//! - González-Badillo, J.J. & Sánchez-Medina, L. (2010). *IJSM*, 31(5), 347-352.
//! - Banyard, H.G. et al. (2017). Validity of various methods for determining velocity, force, and power in the back squat. *IJSPP*, 12(9), 1170-1176.
//! - Pareja-Blanco, F. et al. (2017). Effects of velocity loss during resistance training on athletic performance. *SJMSS*, 27(7), 724-735.

use crate::config::VelocityConfig;
use crate::errors::{AppError, AppResult};
use crate::intelligence::curve_fitting::{linear_regression, DataPoint, LinearFit};
use crate::intelligence::physiological_constants::velocity_based_training as vbt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One measured repetition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadVelocityDataPoint {
    /// External load (kg)
    pub load: f64,
    /// Mean concentric velocity (m/s)
    pub velocity: f64,
}

/// Estimated 1RM at a given minimum velocity threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct E1rmEstimate {
    /// Minimum velocity threshold (m/s)
    pub velocity: f64,
    /// Load at which the profile reaches that velocity (kg)
    pub load: f64,
}

/// Fitted load-velocity relationship for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadVelocityProfile {
    /// Fastest repetition at each distinct load, ordered by load
    pub points: Vec<LoadVelocityDataPoint>,
    /// Velocity change per kg (m/s per kg)
    pub slope: f64,
    /// Velocity at zero load (m/s)
    pub intercept: f64,
    /// Goodness of fit
    pub r_squared: f64,
    /// e1RM at 0.30, 0.20 and 0.15 m/s (empty unless slope is negative)
    pub e1rm: Vec<E1rmEstimate>,
    /// Tested load range as a percentage of the 0.20 m/s e1RM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_range_percent: Option<f64>,
    /// Whether the profile may be used for prescription
    pub is_valid: bool,
    /// Every validity rule the profile failed
    pub invalid_reasons: Vec<String>,
}

impl LoadVelocityProfile {
    /// Reference e1RM at 0.20 m/s
    #[must_use]
    pub fn reference_e1rm(&self) -> Option<f64> {
        self.e1rm
            .iter()
            .find(|estimate| (estimate.velocity - vbt::REFERENCE_VELOCITY).abs() < f64::EPSILON)
            .map(|estimate| estimate.load)
    }

    /// Load expected to move at `target_velocity`
    ///
    /// # Errors
    ///
    /// Returns `InvalidModel` when the profile is not valid; an invalid profile
    /// must never be used to prescribe loads
    pub fn load_for_velocity(&self, target_velocity: f64) -> AppResult<f64> {
        if !self.is_valid {
            return Err(AppError::invalid_model(format!(
                "Load-velocity profile is not valid for prescription: {}",
                self.invalid_reasons.join("; ")
            )));
        }
        if target_velocity <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "Target velocity must be positive, got {target_velocity}"
            ))
            .with_field("target_velocity"));
        }
        let line = LinearFit {
            slope: self.slope,
            intercept: self.intercept,
            r_squared: self.r_squared,
        };
        line.solve_for_x(target_velocity)
            .ok_or_else(|| AppError::invalid_model("Load-velocity profile has a flat slope"))
    }
}

/// Decision for the current set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetAction {
    /// Velocity loss within limits
    Continue,
    /// Velocity loss limit exceeded; end the set
    Stop,
}

/// Velocity loss of one repetition relative to the first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepVelocityLoss {
    /// 1-based repetition number
    pub rep: usize,
    /// Mean concentric velocity (m/s)
    pub velocity: f64,
    /// Absolute loss from rep 1 (m/s)
    pub loss_mps: f64,
    /// Relative loss from rep 1 (%)
    pub loss_percent: f64,
}

/// Outcome of a within-set velocity-loss check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityLossReport {
    /// Per-repetition losses
    pub reps: Vec<RepVelocityLoss>,
    /// Continue or stop
    pub action: SetAction,
    /// First repetition that exceeded a limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggering_rep: Option<usize>,
    /// Relative loss limit applied (%)
    pub max_loss_percent: f64,
    /// Absolute loss limit applied (m/s)
    pub max_loss_mps: f64,
}

/// Builds load-velocity profiles and checks velocity loss
#[derive(Debug, Clone, Default)]
pub struct LoadVelocityProfiler {
    config: VelocityConfig,
}

impl LoadVelocityProfiler {
    /// Create a profiler with explicit validity rules
    #[must_use]
    pub const fn new(config: VelocityConfig) -> Self {
        Self { config }
    }

    /// Fit a profile from raw repetitions
    ///
    /// # Errors
    ///
    /// Returns an error for empty input or any non-positive load or velocity
    pub fn build_profile(&self, samples: &[LoadVelocityDataPoint]) -> AppResult<LoadVelocityProfile> {
        if samples.is_empty() {
            return Err(AppError::insufficient_data(
                vbt::MIN_FIT_LOADS,
                0,
                "load-velocity profile",
            ));
        }
        if let Some(bad) = samples.iter().find(|p| {
            !p.load.is_finite() || !p.velocity.is_finite() || p.load <= 0.0 || p.velocity <= 0.0
        }) {
            return Err(AppError::invalid_input(format!(
                "Load and velocity must be positive (load {} kg, velocity {} m/s)",
                bad.load, bad.velocity
            )));
        }

        let points = best_per_load(samples);
        debug!(distinct_loads = points.len(), "Grouped repetitions by load");

        if points.len() < vbt::MIN_FIT_LOADS {
            return Ok(LoadVelocityProfile {
                points,
                slope: 0.0,
                intercept: 0.0,
                r_squared: 0.0,
                e1rm: Vec::new(),
                load_range_percent: None,
                is_valid: false,
                invalid_reasons: vec![format!(
                    "At least {} distinct loads are needed to fit a profile",
                    vbt::MIN_FIT_LOADS
                )],
            });
        }

        let fit = linear_regression(
            &points
                .iter()
                .map(|p| DataPoint::new(p.load, p.velocity))
                .collect::<Vec<_>>(),
        );
        let e1rm: Vec<E1rmEstimate> = if fit.slope < 0.0 {
            vbt::E1RM_VELOCITIES
                .iter()
                .filter_map(|&velocity| {
                    fit.solve_for_x(velocity)
                        .map(|load| E1rmEstimate { velocity, load })
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut profile = LoadVelocityProfile {
            points,
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            e1rm,
            load_range_percent: None,
            is_valid: false,
            invalid_reasons: Vec::new(),
        };
        self.classify(&mut profile);

        info!(
            slope = profile.slope,
            r_squared = profile.r_squared,
            e1rm = ?profile.reference_e1rm(),
            is_valid = profile.is_valid,
            "Load-velocity profile built"
        );
        Ok(profile)
    }

    /// Apply the validity rules, recording every failure
    fn classify(&self, profile: &mut LoadVelocityProfile) {
        let mut reasons = Vec::new();
        if profile.points.len() < self.config.min_valid_loads {
            reasons.push(format!(
                "Only {} distinct loads tested; at least {} are required",
                profile.points.len(),
                self.config.min_valid_loads
            ));
        }
        if profile.r_squared < self.config.min_r_squared {
            reasons.push(format!(
                "R² of {:.3} is below {}",
                profile.r_squared, self.config.min_r_squared
            ));
        }
        if profile.slope >= 0.0 {
            reasons.push("Velocity does not decrease with load".to_owned());
        }

        let loads = profile.points.iter().map(|p| p.load);
        let min_load = loads.clone().fold(f64::INFINITY, f64::min);
        let max_load = loads.fold(f64::NEG_INFINITY, f64::max);
        match profile.reference_e1rm().filter(|e1rm| *e1rm > 0.0) {
            Some(e1rm) => {
                let range_percent = (max_load - min_load) / e1rm * 100.0;
                profile.load_range_percent = Some(range_percent);
                if range_percent < self.config.min_load_range_fraction * 100.0 {
                    reasons.push(format!(
                        "Tested loads span {range_percent:.1}% of e1RM; at least {:.0}% is required",
                        self.config.min_load_range_fraction * 100.0
                    ));
                }
            }
            None => reasons.push("e1RM could not be estimated from the profile".to_owned()),
        }

        profile.is_valid = reasons.is_empty();
        profile.invalid_reasons = reasons;
    }

    /// Rep-by-rep velocity loss from the first repetition
    ///
    /// # Errors
    ///
    /// Returns an error for an empty set or non-positive velocities
    pub fn check_velocity_loss(&self, rep_velocities: &[f64]) -> AppResult<VelocityLossReport> {
        let Some(&first) = rep_velocities.first() else {
            return Err(AppError::insufficient_data(1, 0, "velocity loss check"));
        };
        if rep_velocities.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(AppError::invalid_input(
                "Repetition velocities must be positive",
            ));
        }

        let reps: Vec<RepVelocityLoss> = rep_velocities
            .iter()
            .enumerate()
            .map(|(index, &velocity)| {
                let loss_mps = first - velocity;
                RepVelocityLoss {
                    rep: index + 1,
                    velocity,
                    loss_mps,
                    loss_percent: loss_mps / first * 100.0,
                }
            })
            .collect();

        let triggering_rep = reps
            .iter()
            .find(|rep| {
                rep.loss_percent > self.config.max_loss_percent
                    || rep.loss_mps > self.config.max_loss_mps
            })
            .map(|rep| rep.rep);
        let action = if triggering_rep.is_some() {
            SetAction::Stop
        } else {
            SetAction::Continue
        };
        debug!(?action, ?triggering_rep, "Velocity loss checked");

        Ok(VelocityLossReport {
            reps,
            action,
            triggering_rep,
            max_loss_percent: self.config.max_loss_percent,
            max_loss_mps: self.config.max_loss_mps,
        })
    }
}

/// Fastest repetition per load, with loads keyed to 0.01 kg
fn best_per_load(samples: &[LoadVelocityDataPoint]) -> Vec<LoadVelocityDataPoint> {
    let mut best: BTreeMap<i64, LoadVelocityDataPoint> = BTreeMap::new();
    for sample in samples {
        let key = (sample.load / vbt::LOAD_RESOLUTION_KG).round() as i64;
        best.entry(key)
            .and_modify(|current| {
                if sample.velocity > current.velocity {
                    *current = *sample;
                }
            })
            .or_insert(*sample);
    }
    best.into_values().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn point(load: f64, velocity: f64) -> LoadVelocityDataPoint {
        LoadVelocityDataPoint { load, velocity }
    }

    #[test]
    fn test_best_rep_per_load_is_kept() {
        let points = best_per_load(&[point(100.0, 0.9), point(100.004, 1.0), point(120.0, 0.7)]);
        assert_eq!(points.len(), 2);
        assert!((points[0].velocity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_load_is_invalid_without_fit() {
        let profile = LoadVelocityProfiler::default()
            .build_profile(&[point(100.0, 0.8), point(100.0, 0.75)])
            .unwrap();
        assert!(!profile.is_valid);
        assert!(profile.e1rm.is_empty());
        assert!(profile.load_for_velocity(0.5).is_err());
    }

    #[test]
    fn test_velocity_loss_stops_set() {
        let report = LoadVelocityProfiler::default()
            .check_velocity_loss(&[0.80, 0.78, 0.74, 0.70, 0.62])
            .unwrap();

        assert_eq!(report.action, SetAction::Stop);
        assert_eq!(report.triggering_rep, Some(5));
        assert_eq!(report.reps.len(), 5);
    }

    #[test]
    fn test_velocity_loss_within_limits() {
        let report = LoadVelocityProfiler::default()
            .check_velocity_loss(&[0.80, 0.79, 0.77])
            .unwrap();
        assert_eq!(report.action, SetAction::Continue);
        assert!(report.triggering_rep.is_none());
    }
}
