// ABOUTME: Field test protocol dispatch and the shared result model for threshold tests
// ABOUTME: Tagged FieldTest enum, FieldTestResult, per-protocol metrics, and confidence bookkeeping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Field Test Analyzers
//!
//! Each protocol turns one raw performance sample into LT1/LT2 estimates.
//! Errors follow three tiers:
//!
//! 1. Input contract violations (bounds, missing data) return `Err(AppError)`.
//! 2. Model-quality degradations add a warning and lower confidence.
//! 3. Hard domain violations set `validation.valid = false` and omit thresholds.

/// Explicit default-filling for optional inputs
pub mod assumptions;
/// Distance-time model over 2-4 maximal trials
pub mod critical_velocity;
/// Aerobic decoupling test for LT1
pub mod hr_drift;
/// Threshold estimate from a recent race
pub mod race_based;
/// Thirty-minute solo time trial
pub mod thirty_minute;
/// Twenty-minute time trial
pub mod twenty_minute;

pub use critical_velocity::{CriticalVelocityInput, CriticalVelocityTrial};
pub use hr_drift::{DriftClassification, HrDriftInput};
pub use race_based::{AthleteLevel, RaceBasedInput, RaceDistance};
pub use thirty_minute::ThirtyMinuteTtInput;
pub use twenty_minute::TwentyMinuteTtInput;

use crate::config::FieldTestConfig;
use crate::errors::{AppError, AppResult};
use crate::intelligence::physiological_constants::heart_rate;
use crate::models::{AssumedField, Confidence, ThresholdEstimate, ValidationSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Raw field test submission, discriminated by `testType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "testType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldTest {
    /// 30-minute solo time trial
    ThirtyMinTt(ThirtyMinuteTtInput),
    /// Steady run at a fixed pace analyzed for HR drift
    HrDrift(HrDriftInput),
    /// 2-4 maximal trials fitted with the distance-time model
    CriticalVelocity(CriticalVelocityInput),
    /// 20-minute time trial
    TwentyMinTt(TwentyMinuteTtInput),
    /// Estimate from a recent race result
    RaceBased(RaceBasedInput),
}

impl FieldTest {
    /// Protocol discriminator
    #[must_use]
    pub const fn test_type(&self) -> FieldTestType {
        match self {
            Self::ThirtyMinTt(_) => FieldTestType::ThirtyMinTt,
            Self::HrDrift(_) => FieldTestType::HrDrift,
            Self::CriticalVelocity(_) => FieldTestType::CriticalVelocity,
            Self::TwentyMinTt(_) => FieldTestType::TwentyMinTt,
            Self::RaceBased(_) => FieldTestType::RaceBased,
        }
    }
}

/// Protocol name carried on results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldTestType {
    /// 30-minute solo time trial
    ThirtyMinTt,
    /// Aerobic decoupling run
    HrDrift,
    /// Critical velocity trials
    CriticalVelocity,
    /// 20-minute time trial
    TwentyMinTt,
    /// Race result
    RaceBased,
}

/// Protocol-specific numbers behind an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "protocol",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ProtocolMetrics {
    /// 30-minute time trial
    ThirtyMinTt {
        /// Whole-test speed (m/s)
        test_speed_mps: f64,
        /// Half-to-half deviation (%)
        #[serde(skip_serializing_if = "Option::is_none")]
        split_deviation_percent: Option<f64>,
        /// Coefficient of variation of the 5-minute splits (%)
        #[serde(skip_serializing_if = "Option::is_none")]
        split_cv_percent: Option<f64>,
    },
    /// Aerobic decoupling
    HrDrift {
        /// (second half - first half) / first half (%)
        drift_percent: f64,
        /// Drift band
        classification: DriftClassification,
    },
    /// Distance-time model
    CriticalVelocity {
        /// Slope of distance vs. time (m/s)
        critical_velocity_mps: f64,
        /// Intercept of distance vs. time (m)
        d_prime_m: f64,
        /// Goodness of fit
        r_squared: f64,
        /// Number of trials fitted
        trial_count: usize,
    },
    /// 20-minute time trial
    TwentyMinTt {
        /// Whole-test speed (m/s)
        test_speed_mps: f64,
        /// Largest 5-minute split deviation from the mean (%)
        #[serde(skip_serializing_if = "Option::is_none")]
        max_split_deviation_percent: Option<f64>,
    },
    /// Race result
    RaceBased {
        /// Average race speed (m/s)
        race_speed_mps: f64,
        /// Multiplier from race speed to LT2 speed
        speed_factor: f64,
        /// Multiplier from race HR to LTHR
        hr_factor: f64,
    },
}

/// Outcome of one field test analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTestResult {
    /// Protocol that produced the result
    pub test_type: FieldTestType,
    /// Aerobic threshold estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt1: Option<ThresholdEstimate>,
    /// Anaerobic threshold estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt2: Option<ThresholdEstimate>,
    /// Confidence after all quality penalties
    pub confidence: Confidence,
    /// Validation outcome
    pub validation: ValidationSummary,
    /// Coach-facing guidance
    pub recommendations: Vec<String>,
    /// Inputs the engine filled in
    pub assumptions: Vec<AssumedField>,
    /// Protocol-specific numbers
    pub metrics: ProtocolMetrics,
}

/// Dispatches submissions to the protocol analyzers
#[derive(Debug, Clone, Default)]
pub struct FieldTestAnalyzer {
    config: FieldTestConfig,
}

impl FieldTestAnalyzer {
    /// Create an analyzer with explicit thresholds
    #[must_use]
    pub const fn new(config: FieldTestConfig) -> Self {
        Self { config }
    }

    /// Analyze a field test submission
    ///
    /// # Errors
    ///
    /// Returns an error when the submission violates its protocol's input
    /// contract (out-of-range values, wrong trial or split counts)
    pub fn analyze(&self, test: &FieldTest) -> AppResult<FieldTestResult> {
        debug!(test_type = ?test.test_type(), "Analyzing field test");
        let result = match test {
            FieldTest::ThirtyMinTt(input) => thirty_minute::analyze(input, &self.config),
            FieldTest::HrDrift(input) => hr_drift::analyze(input, &self.config),
            FieldTest::CriticalVelocity(input) => critical_velocity::analyze(input, &self.config),
            FieldTest::TwentyMinTt(input) => twenty_minute::analyze(input, &self.config),
            FieldTest::RaceBased(input) => race_based::analyze(input),
        }?;

        if result.validation.valid {
            info!(
                test_type = ?result.test_type,
                confidence = %result.confidence,
                warnings = result.validation.warnings.len(),
                "Field test analyzed"
            );
        } else {
            warn!(
                test_type = ?result.test_type,
                errors = ?result.validation.errors,
                "Field test failed validation; thresholds omitted"
            );
        }
        Ok(result)
    }
}

/// Confidence and validation bookkeeping shared by the protocol analyzers
#[derive(Debug)]
pub(crate) struct Assessment {
    cap: Confidence,
    penalties: usize,
    validation: ValidationSummary,
    assumptions: Vec<AssumedField>,
}

impl Assessment {
    /// Start at the protocol's confidence ceiling
    pub(crate) const fn new(cap: Confidence) -> Self {
        Self {
            cap,
            penalties: 0,
            validation: ValidationSummary::new(),
            assumptions: Vec::new(),
        }
    }

    /// Lower the ceiling (e.g. marathon results never exceed LOW)
    pub(crate) fn cap_at(&mut self, ceiling: Confidence) {
        self.cap = self.cap.capped_at(ceiling);
    }

    /// Warning that costs one confidence step
    pub(crate) fn penalize(&mut self, message: impl Into<String>) {
        self.penalize_by(1, message);
    }

    /// Warning that costs `steps` confidence steps
    pub(crate) fn penalize_by(&mut self, steps: usize, message: impl Into<String>) {
        self.penalties += steps;
        self.validation.warn(message);
    }

    /// Warning without a confidence cost
    pub(crate) fn note(&mut self, message: impl Into<String>) {
        self.validation.warn(message);
    }

    /// Hard domain violation
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.validation.fail(message);
    }

    /// Record a synthesized input; costs one confidence step
    pub(crate) fn assume(&mut self, assumed: AssumedField) {
        self.penalize(format!(
            "{} was not supplied; assumed {}",
            assumed.field, assumed.assumption
        ));
        self.assumptions.push(assumed);
    }

    /// Whether no hard violation has been recorded
    pub(crate) const fn is_valid(&self) -> bool {
        self.validation.valid
    }

    /// Confidence after penalties
    pub(crate) const fn confidence(&self) -> Confidence {
        if self.validation.valid {
            self.cap.lowered_by(self.penalties)
        } else {
            Confidence::Low
        }
    }

    /// Assemble the final result; thresholds are dropped when validation failed
    pub(crate) fn finish(
        self,
        test_type: FieldTestType,
        lt1: Option<ThresholdEstimate>,
        lt2: Option<ThresholdEstimate>,
        recommendations: Vec<String>,
        metrics: ProtocolMetrics,
    ) -> FieldTestResult {
        let confidence = self.confidence();
        let valid = self.validation.valid;
        FieldTestResult {
            test_type,
            lt1: lt1.filter(|_| valid),
            lt2: lt2.filter(|_| valid),
            confidence,
            validation: self.validation,
            recommendations,
            assumptions: self.assumptions,
            metrics,
        }
    }
}

/// Reject a value outside `[min, max]`
pub(crate) fn validate_range(field: &str, value: f64, min: f64, max: f64) -> AppResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(AppError::out_of_range(field, value, min, max));
    }
    Ok(())
}

/// Reject a heart rate outside the plausible physiological range
pub(crate) fn validate_heart_rate(field: &str, value: f64) -> AppResult<()> {
    validate_range(
        field,
        value,
        heart_rate::MIN_PLAUSIBLE_HR,
        heart_rate::MAX_PLAUSIBLE_HR,
    )
}

/// Drop implausible HR samples (sensor dropouts), reporting how many were removed
pub(crate) fn plausible_heart_rates(samples: &[f64]) -> (Vec<f64>, usize) {
    let kept: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|hr| (heart_rate::MIN_PLAUSIBLE_HR..=heart_rate::MAX_PLAUSIBLE_HR).contains(hr))
        .collect();
    let dropped = samples.len() - kept.len();
    (kept, dropped)
}

/// Arithmetic mean, `None` for an empty slice
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Coefficient of variation (%) using the population standard deviation
pub(crate) fn coefficient_of_variation_percent(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    if avg.abs() < f64::EPSILON {
        return None;
    }
    let variance = values
        .iter()
        .map(|v| (v - avg).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt() / avg * 100.0)
}

/// Reject empty or non-positive split distances and enforce the protocol's split count
pub(crate) fn validate_splits(field: &str, splits: &[f64], expected: usize) -> AppResult<()> {
    if splits.len() != expected {
        return Err(AppError::invalid_input(format!(
            "{field} must contain exactly {expected} five-minute splits, got {}",
            splits.len()
        ))
        .with_field(field));
    }
    if let Some(bad) = splits.iter().find(|s| !s.is_finite() || **s <= 0.0) {
        return Err(AppError::invalid_input(format!(
            "{field} contains a non-positive split distance ({bad})"
        ))
        .with_field(field));
    }
    Ok(())
}

/// Standard retest guidance appended to successful results
pub(crate) const RETEST_GUIDANCE: &str =
    "Retest every 6-8 weeks, under similar conditions, to track threshold changes";

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_penalties_and_assumptions() {
        let mut assessment = Assessment::new(Confidence::VeryHigh);
        assessment.penalize("uneven pacing");
        assessment.assume(AssumedField::new("durationSeconds", "1200 s"));
        assert_eq!(assessment.confidence(), Confidence::Medium);

        assessment.cap_at(Confidence::Low);
        assert_eq!(assessment.confidence(), Confidence::Low);
    }

    #[test]
    fn test_failed_assessment_drops_thresholds() {
        let mut assessment = Assessment::new(Confidence::High);
        assessment.fail("positive split beyond 8%");
        let result = assessment.finish(
            FieldTestType::ThirtyMinTt,
            None,
            Some(ThresholdEstimate::from_speed(4.0, None)),
            Vec::new(),
            ProtocolMetrics::ThirtyMinTt {
                test_speed_mps: 4.0,
                split_deviation_percent: Some(9.0),
                split_cv_percent: None,
            },
        );

        assert!(!result.validation.valid);
        assert!(result.lt2.is_none());
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert!(coefficient_of_variation_percent(&[]).is_none());
        let cv = coefficient_of_variation_percent(&[10.0, 10.0, 10.0]).unwrap_or(f64::NAN);
        assert!(cv.abs() < 1e-12);
    }
}
