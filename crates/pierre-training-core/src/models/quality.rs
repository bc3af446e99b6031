// ABOUTME: Result-quality value objects shared by every estimator
// ABOUTME: Confidence levels, validation summaries, and assumed-data annotations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence in an estimate, derived from input quality signals
///
/// Ordered from least to most confident so that `min`/`max` and comparisons
/// read naturally (`Confidence::Low < Confidence::VeryHigh`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    /// Estimate should be treated as a rough indication only
    Low,
    /// Usable with caution
    Medium,
    /// Good quality estimate
    High,
    /// Direct, well-executed measurement
    VeryHigh,
}

impl Confidence {
    const LADDER: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    const fn rank(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::VeryHigh => 3,
        }
    }

    /// Lower the confidence by `steps`, saturating at `Low`
    #[must_use]
    pub const fn lowered_by(self, steps: usize) -> Self {
        let rank = self.rank().saturating_sub(steps);
        Self::LADDER[rank]
    }

    /// Cap the confidence at `ceiling`
    #[must_use]
    pub fn capped_at(self, ceiling: Self) -> Self {
        self.min(ceiling)
    }

    /// Wire name (`VERY_HIGH`, `HIGH`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY_HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the model-quality and domain checks on one result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// False when a hard domain violation was found; the result must not be
    /// used for prescription
    pub valid: bool,
    /// Quality degradations that lowered confidence but did not block
    pub warnings: Vec<String>,
    /// Hard domain violations
    pub errors: Vec<String>,
}

impl ValidationSummary {
    /// Empty, valid summary
    #[must_use]
    pub const fn new() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Record a quality degradation
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record a hard domain violation and mark the result invalid
    pub fn fail(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }
}

impl Default for ValidationSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// A value the engine synthesized because the caller did not supply it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumedField {
    /// Input field that was filled in
    pub field: String,
    /// What was assumed in its place
    pub assumption: String,
}

impl AssumedField {
    /// Create a new annotation
    pub fn new(field: impl Into<String>, assumption: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            assumption: assumption.into(),
        }
    }
}
