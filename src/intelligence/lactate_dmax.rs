// ABOUTME: Lactate threshold extraction from incremental step tests using the modified D-max method
// ABOUTME: Cubic curve fit, chord-distance LT2, baseline-plus-offset LT1, dip handling, and HR interpolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # D-max Threshold Extractor
//!
//! LT2 is the intensity where the fitted lactate curve lies furthest below the
//! chord joining the first and last measured stages. LT1 is where the curve
//! first rises a fixed offset above its pre-LT2 minimum, falling back to a
//! D-max on the sub-curve below LT2.
//!
//! # Scientific References
//!
//! - Cheng, B. et al. (1992). A new approach for the determination of ventilatory and lactate thresholds. *IJSM*, 13(7), 518-522.
//! - Bishop, D., Jenkins, D.G. & Mackinnon, L.T. (1998). *MSSE*, 30(8), 1270-1275.
//! - Jamnick, N.A. et al. (2018). Manipulating graded exercise test variables affects the validity of the lactate threshold. *MSSE*, 50(11), 2227-2236.

use crate::config::LactateConfig;
use crate::errors::{AppError, AppResult};
use crate::intelligence::curve_fitting::{
    max_perpendicular_distance, polynomial_regression3, r_squared, CubicFit, DataPoint, LinearFit,
};
use crate::intelligence::physiological_constants::lactate;
use crate::models::Confidence;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One stage of an incremental test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LactateStage {
    /// Stage intensity (speed in km/h or power in W)
    pub intensity: f64,
    /// Blood lactate at the end of the stage (mmol/L)
    pub lactate: f64,
    /// Heart rate at the end of the stage (bpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
}

/// How a threshold was located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdMethod {
    /// Maximum perpendicular distance below the first-to-last chord
    ModifiedDmax,
    /// First rise of a fixed offset above the pre-LT2 minimum
    BaselinePlusOffset,
    /// D-max on the sub-curve between the first stage and LT2
    SubcurveDmax,
}

/// Threshold located on the lactate curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LactateThreshold {
    /// Intensity at threshold
    pub intensity: f64,
    /// Fitted lactate at threshold (mmol/L)
    pub lactate: f64,
    /// Interpolated heart rate at threshold (bpm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    /// Method used
    pub method: ThresholdMethod,
}

/// Uncertainty band around LT2
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

/// Result of a lactate curve analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LactateCurveAnalysis {
    /// Aerobic threshold, absent when no rise before LT2 can be located
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt1: Option<LactateThreshold>,
    /// Anaerobic threshold
    pub lt2: LactateThreshold,
    /// Uncertainty band around LT2 intensity
    pub lt2_interval: IntensityInterval,
    /// Fitted cubic
    pub curve: CubicFit,
    /// Goodness of fit of the cubic
    pub r2: f64,
    /// Number of stages where lactate fell compared with the previous stage
    pub dip_count: usize,
    /// Confidence in the thresholds
    pub confidence: Confidence,
    /// Quality warnings
    pub warnings: Vec<String>,
}

/// D-max lactate threshold extractor
#[derive(Debug, Clone, Default)]
pub struct DmaxAnalyzer {
    config: LactateConfig,
}

impl DmaxAnalyzer {
    /// Create an extractor with explicit settings
    #[must_use]
    pub const fn new(config: LactateConfig) -> Self {
        Self { config }
    }

    /// Locate LT1 and LT2 on an incremental lactate curve
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` for fewer than four stages, `InvalidInput`
    /// for non-increasing intensities or negative lactate, and
    /// `ModelFitFailed` if the cubic cannot be fitted
    pub fn analyze(&self, stages: &[LactateStage]) -> AppResult<LactateCurveAnalysis> {
        validate_stages(stages)?;

        let points: Vec<DataPoint> = stages
            .iter()
            .map(|s| DataPoint::new(s.intensity, s.lactate))
            .collect();
        let curve = polynomial_regression3(&points)?;
        let r2 = r_squared(&points, |x| curve.evaluate(x));
        debug!(?curve, r2, "Fitted lactate curve");

        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(AppError::insufficient_data(lactate::MIN_STAGES, 0, "D-max")),
        };
        let mut warnings = Vec::new();

        let chord = LinearFit::through(first, last);
        let peak = max_perpendicular_distance(
            |x| curve.evaluate(x),
            &chord,
            first.x,
            last.x,
            self.config.grid_steps,
        )
        .ok_or_else(|| AppError::model_fit_failed("D-max search produced no candidates"))?;

        let never_below_chord = peak.distance <= 0.0;
        if never_below_chord {
            warnings.push(
                "Fitted curve never falls below the first-to-last chord; the test may have started too hard or stopped too early"
                    .to_owned(),
            );
        }

        let lt2_intensity = peak.x;
        let lt2 = self.threshold_at(
            stages,
            &curve,
            lt2_intensity,
            ThresholdMethod::ModifiedDmax,
        );
        let lt1 = self.locate_lt1(stages, &curve, first.x, lt2_intensity);
        if lt1.is_none() {
            warnings.push("No lactate rise found below LT2; LT1 could not be located".to_owned());
        }

        let dip_count = count_dips(stages, &mut warnings);
        let lt2_interval = lt2_interval(lt2_intensity, first.x, last.x, r2, dip_count);

        let confidence = if never_below_chord {
            Confidence::Low
        } else {
            self.fit_confidence(r2, stages.len(), dip_count)
        };
        if r2 <= self.config.medium_confidence_r2 {
            warnings.push(format!(
                "Cubic fit R² of {r2:.3} is low; thresholds are approximate"
            ));
        }

        if warnings.is_empty() {
            info!(lt2 = lt2.intensity, ?confidence, "Lactate thresholds located");
        } else {
            warn!(lt2 = lt2.intensity, ?confidence, ?warnings, "Lactate thresholds located with warnings");
        }

        Ok(LactateCurveAnalysis {
            lt1,
            lt2,
            lt2_interval,
            curve,
            r2,
            dip_count,
            confidence,
            warnings,
        })
    }

    fn fit_confidence(&self, r2: f64, stage_count: usize, dip_count: usize) -> Confidence {
        if r2 > self.config.high_confidence_r2 {
            if stage_count >= lactate::VERY_HIGH_CONFIDENCE_STAGES && dip_count == 0 {
                Confidence::VeryHigh
            } else {
                Confidence::High
            }
        } else if r2 > self.config.medium_confidence_r2 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// LT1 by baseline-plus-offset, falling back to the sub-curve D-max
    fn locate_lt1(
        &self,
        stages: &[LactateStage],
        curve: &CubicFit,
        min_intensity: f64,
        lt2_intensity: f64,
    ) -> Option<LactateThreshold> {
        let steps = self.config.grid_steps;
        let span = lt2_intensity - min_intensity;
        if span <= 0.0 {
            return None;
        }
        let grid: Vec<(f64, f64)> = (0..=steps)
            .map(|i| {
                let x = span.mul_add(i as f64 / steps as f64, min_intensity);
                (x, curve.evaluate(x))
            })
            .collect();

        let (baseline_index, baseline) = grid
            .iter()
            .enumerate()
            .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
            .map(|(index, &(_, value))| (index, value))?;

        let crossing = grid[baseline_index..]
            .iter()
            .find(|(x, value)| *value > baseline + self.config.lt1_offset_mmol && *x < lt2_intensity);
        if let Some(&(x, _)) = crossing {
            return Some(self.threshold_at(stages, curve, x, ThresholdMethod::BaselinePlusOffset));
        }

        let sub_chord = LinearFit::through(
            DataPoint::new(min_intensity, curve.evaluate(min_intensity)),
            DataPoint::new(lt2_intensity, curve.evaluate(lt2_intensity)),
        );
        max_perpendicular_distance(
            |x| curve.evaluate(x),
            &sub_chord,
            min_intensity,
            lt2_intensity,
            steps,
        )
        .filter(|peak| peak.distance > 0.0)
        .map(|peak| self.threshold_at(stages, curve, peak.x, ThresholdMethod::SubcurveDmax))
    }

    fn threshold_at(
        &self,
        stages: &[LactateStage],
        curve: &CubicFit,
        intensity: f64,
        method: ThresholdMethod,
    ) -> LactateThreshold {
        debug!(intensity, ?method, grid_steps = self.config.grid_steps, "Threshold located");
        LactateThreshold {
            intensity,
            lactate: curve.evaluate(intensity),
            heart_rate: interpolate_heart_rate(stages, intensity),
            method,
        }
    }
}

fn validate_stages(stages: &[LactateStage]) -> AppResult<()> {
    if stages.len() < lactate::MIN_STAGES {
        return Err(AppError::insufficient_data(
            lactate::MIN_STAGES,
            stages.len(),
            "D-max lactate analysis",
        ));
    }
    if let Some(stage) = stages
        .iter()
        .find(|s| !s.intensity.is_finite() || !s.lactate.is_finite() || s.lactate < 0.0)
    {
        return Err(AppError::invalid_input(format!(
            "Stage at intensity {} has an invalid lactate value {}",
            stage.intensity, stage.lactate
        ))
        .with_field("lactate"));
    }
    if let Some(pair) = stages.windows(2).find(|w| w[1].intensity <= w[0].intensity) {
        return Err(AppError::invalid_input(format!(
            "Stage intensities must be strictly increasing ({} followed by {})",
            pair[0].intensity, pair[1].intensity
        ))
        .with_field("intensity"));
    }
    Ok(())
}

/// Count stage-to-stage lactate drops, recording a warning for each
fn count_dips(stages: &[LactateStage], warnings: &mut Vec<String>) -> usize {
    let mut dips = 0;
    for pair in stages.windows(2) {
        let drop = pair[0].lactate - pair[1].lactate;
        if drop > lactate::DIP_TOLERANCE_MMOL {
            dips += 1;
            warnings.push(format!(
                "Lactate fell from {:.1} to {:.1} mmol/L between intensities {} and {}",
                pair[0].lactate, pair[1].lactate, pair[0].intensity, pair[1].intensity
            ));
        }
    }
    dips
}

/// Uncertainty band that widens with poor fit and with each dip
fn lt2_interval(lt2: f64, min: f64, max: f64, r2: f64, dip_count: usize) -> IntensityInterval {
    let range = max - min;
    let fraction = (1.0 - r2).max(0.0).mul_add(
        0.5,
        lactate::DIP_INTERVAL_FRACTION.mul_add(dip_count as f64, lactate::BASE_INTERVAL_FRACTION),
    );
    let half_width = (range * fraction).min(range / 2.0);
    IntensityInterval {
        lower: (lt2 - half_width).max(min),
        upper: (lt2 + half_width).min(max),
    }
}

/// Linear interpolation of stage HR at `intensity`; requires HR on every stage
fn interpolate_heart_rate(stages: &[LactateStage], intensity: f64) -> Option<f64> {
    let rates: Option<Vec<f64>> = stages.iter().map(|s| s.heart_rate).collect();
    let rates = rates?;

    stages
        .windows(2)
        .zip(rates.windows(2))
        .find(|(pair, _)| intensity >= pair[0].intensity && intensity <= pair[1].intensity)
        .map(|(pair, hr)| {
            let t = (intensity - pair[0].intensity) / (pair[1].intensity - pair[0].intensity);
            (hr[1] - hr[0]).mul_add(t, hr[0])
        })
}
