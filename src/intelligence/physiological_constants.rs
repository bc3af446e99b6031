// ABOUTME: Sports-science constants for field tests, lactate curves, VBT, and intensity distribution
// ABOUTME: Default values behind every configurable threshold in the training science engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Physiological constants based on sports science research
//!
//! Every configurable threshold in [`crate::config`] defaults to a value from
//! this module.

/// Heart rate plausibility bounds
pub mod heart_rate {
    /// Lowest heart rate accepted from any test (bpm)
    pub const MIN_PLAUSIBLE_HR: f64 = 40.0;

    /// Highest heart rate accepted from any test (bpm)
    /// Reference: Tanaka, H., Monahan, K.D., & Seals, D.R. (2001). Age-predicted maximal heart rate revisited
    pub const MAX_PLAUSIBLE_HR: f64 = 220.0;
}

/// Thirty-minute time trial protocol
///
/// References:
/// - Friel, J. (2009). "The Cyclist's Training Bible" (4th ed.). `VeloPress`.
/// - McGehee, J.C. et al. (2005). A comparison of methods for estimating the lactate threshold. *JSCR*, 19(3), 553-558.
pub mod thirty_minute_tt {
    /// Protocol duration (seconds)
    pub const DURATION_SECONDS: f64 = 1800.0;
    /// Minimum accepted distance (m)
    pub const MIN_DISTANCE_M: f64 = 4000.0;
    /// Maximum accepted distance (m)
    pub const MAX_DISTANCE_M: f64 = 12000.0;
    /// Window at the end of the test averaged for LTHR (seconds)
    pub const LTHR_WINDOW_SECONDS: usize = 1200;
    /// Multiplier applied to a whole-test average HR when no series is available
    pub const WHOLE_TEST_HR_MULTIPLIER: f64 = 1.03;
    /// Number of five-minute splits in the protocol
    pub const FIVE_MINUTE_SPLITS: usize = 6;
    /// Half-to-half deviation treated as even pacing (%)
    pub const EVEN_SPLIT_TOLERANCE_PERCENT: f64 = 3.0;
    /// Half-to-half deviation beyond which the effort is not a threshold effort (%)
    pub const MAX_SPLIT_DEVIATION_PERCENT: f64 = 8.0;
    /// Coefficient of variation of 5-minute splits that triggers a warning (%)
    pub const SPLIT_CV_WARNING_PERCENT: f64 = 5.0;
    /// Allowed mismatch between split sum and total distance (%)
    pub const SPLIT_SUM_TOLERANCE_PERCENT: f64 = 2.0;
}

/// Aerobic decoupling (HR drift) protocol
///
/// References:
/// - Friel, J. (2009). Aerobic decoupling (Pa:HR) as an aerobic endurance marker.
/// - Johnston, S. & House, S. (2014). "Training for the New Alpinism". Patagonia.
pub mod hr_drift {
    /// Minimum test duration (seconds)
    pub const MIN_DURATION_SECONDS: f64 = 1800.0;
    /// Maximum test duration (seconds)
    pub const MAX_DURATION_SECONDS: f64 = 7200.0;
    /// Fastest accepted target pace (s/km)
    pub const MIN_TARGET_PACE: f64 = 150.0;
    /// Slowest accepted target pace (s/km)
    pub const MAX_TARGET_PACE: f64 = 600.0;
    /// Drift below which the pace is at or below LT1 (%)
    pub const LT1_DRIFT_PERCENT: f64 = 5.0;
    /// Drift at or above which the pace is well above LT1 (%)
    pub const SIGNIFICANT_DRIFT_PERCENT: f64 = 10.0;
    /// Negative drift that suggests a warm-up or sensor problem (%)
    pub const NEGATIVE_DRIFT_WARNING_PERCENT: f64 = -2.0;
    /// Allowed disagreement between sample-derived and supplied half averages (bpm)
    pub const HALF_AVERAGE_TOLERANCE_BPM: f64 = 3.0;
}

/// Critical velocity (distance-time) model
///
/// References:
/// - Monod, H., & Scherrer, J. (1965). The work capacity of a synergic muscular group. *Ergonomics*, 8(3), 329-338.
/// - Jones, A.M. & Vanhatalo, A. (2017). The 'critical power' concept. *Sports Medicine*, 47(S1), 65-78.
pub mod critical_velocity {
    /// Minimum number of trials
    pub const MIN_TRIALS: usize = 2;
    /// Maximum number of trials
    pub const MAX_TRIALS: usize = 4;
    /// R² below which the fit is questionable
    pub const MIN_R_SQUARED: f64 = 0.95;
    /// Minimum gap between two trial durations (seconds)
    pub const MIN_DURATION_GAP_SECONDS: f64 = 60.0;
    /// Minimum ratio of longest to shortest trial duration
    pub const MIN_DURATION_RATIO: f64 = 1.5;
    /// Shortest recommended trial duration (seconds)
    pub const RECOMMENDED_MIN_DURATION_SECONDS: f64 = 120.0;
    /// Longest recommended trial duration (seconds)
    pub const RECOMMENDED_MAX_DURATION_SECONDS: f64 = 1800.0;
    /// Plausible CV range (m/s)
    pub const MIN_PLAUSIBLE_CV: f64 = 2.0;
    /// Plausible CV range (m/s)
    pub const MAX_PLAUSIBLE_CV: f64 = 7.0;
}

/// Twenty-minute time trial protocol
pub mod twenty_minute_tt {
    /// Nominal duration (seconds)
    pub const DURATION_SECONDS: f64 = 1200.0;
    /// Accepted duration window (seconds)
    pub const MIN_DURATION_SECONDS: f64 = 1140.0;
    /// Accepted duration window (seconds)
    pub const MAX_DURATION_SECONDS: f64 = 1260.0;
    /// Minimum accepted distance (m)
    pub const MIN_DISTANCE_M: f64 = 3000.0;
    /// Maximum accepted distance (m)
    pub const MAX_DISTANCE_M: f64 = 8000.0;
    /// Fraction of 20-minute speed sustainable at LT2 (Coggan's 0.95 applied to running)
    pub const SPEED_FACTOR: f64 = 0.95;
    /// Fraction of 20-minute average HR taken as LTHR
    pub const HR_FACTOR: f64 = 0.97;
    /// Number of five-minute splits in the protocol
    pub const FIVE_MINUTE_SPLITS: usize = 4;
    /// Split deviation from the mean that triggers a warning (%)
    pub const SPLIT_WARNING_PERCENT: f64 = 5.0;
    /// Split deviation from the mean treated as a pacing failure (%)
    pub const SPLIT_SEVERE_PERCENT: f64 = 10.0;
}

/// Lactate curve analysis (D-max)
///
/// References:
/// - Cheng, B. et al. (1992). A new approach for the determination of ventilatory and lactate thresholds. *IJSM*, 13(7), 518-522.
/// - Bishop, D., Jenkins, D.G. & Mackinnon, L.T. (1998). The relationship between plasma lactate parameters and endurance cycling performance. *MSSE*, 30(8), 1270-1275.
pub mod lactate {
    /// Minimum number of stages for a cubic fit
    pub const MIN_STAGES: usize = 4;
    /// Stages needed for the highest confidence level
    pub const VERY_HIGH_CONFIDENCE_STAGES: usize = 6;
    /// Grid resolution for the perpendicular-distance search
    pub const GRID_STEPS: usize = 1000;
    /// Rise above the sub-curve baseline marking LT1 (mmol/L)
    pub const LT1_OFFSET_MMOL: f64 = 0.5;
    /// R² above which the fit is high confidence
    pub const HIGH_CONFIDENCE_R2: f64 = 0.95;
    /// R² above which the fit is medium confidence
    pub const MEDIUM_CONFIDENCE_R2: f64 = 0.90;
    /// Drop between consecutive stages counted as a dip (mmol/L)
    pub const DIP_TOLERANCE_MMOL: f64 = 0.1;
    /// Base half-width of the LT2 interval as a fraction of the intensity range
    pub const BASE_INTERVAL_FRACTION: f64 = 0.02;
    /// Interval widening per dip as a fraction of the intensity range
    pub const DIP_INTERVAL_FRACTION: f64 = 0.02;
}

/// Velocity-based training
///
/// References:
/// - González-Badillo, J.J. & Sánchez-Medina, L. (2010). Movement velocity as a measure of loading intensity. *IJSM*, 31(5), 347-352.
/// - Weakley, J. et al. (2021). Velocity-based training: from theory to application. *Strength Cond J*, 43(2), 31-49.
pub mod velocity_based_training {
    /// Minimum velocity thresholds at which e1RM is reported (m/s)
    pub const E1RM_VELOCITIES: [f64; 3] = [0.30, 0.20, 0.15];
    /// Velocity whose e1RM is used as the reference 1RM (m/s)
    pub const REFERENCE_VELOCITY: f64 = 0.20;
    /// Distinct loads required for a valid profile
    pub const MIN_VALID_LOADS: usize = 3;
    /// Distinct loads required to fit at all
    pub const MIN_FIT_LOADS: usize = 2;
    /// Minimum R² for a valid profile
    pub const MIN_R_SQUARED: f64 = 0.8;
    /// Minimum tested load range as a fraction of e1RM
    pub const MIN_LOAD_RANGE_FRACTION: f64 = 0.2;
    /// Load resolution used when grouping samples (kg)
    pub const LOAD_RESOLUTION_KG: f64 = 0.01;
    /// Default velocity-loss ceiling within a set (%)
    pub const MAX_VELOCITY_LOSS_PERCENT: f64 = 20.0;
    /// Default absolute velocity-loss ceiling within a set (m/s)
    pub const MAX_VELOCITY_LOSS_MPS: f64 = 0.15;
}

/// Intensity distribution tables
///
/// References:
/// - Seiler, S. (2010). What is best practice for training intensity and duration distribution? *IJSPP*, 5(3), 276-291.
/// - Stöggl, T. & Sperlich, B. (2014). Polarized training has greater impact on key endurance variables. *Front. Physiol.*, 5, 33.
pub mod intensity_distribution {
    /// Upper bound of the very-low volume bin (hours/week)
    pub const VERY_LOW_VOLUME_HOURS: f64 = 3.0;
    /// Upper bound of the low volume bin (hours/week)
    pub const LOW_VOLUME_HOURS: f64 = 5.0;
    /// Upper bound of the moderate volume bin (hours/week)
    pub const MODERATE_VOLUME_HOURS: f64 = 9.0;
    /// Upper bound of the high volume bin (hours/week)
    pub const HIGH_VOLUME_HOURS: f64 = 15.0;
    /// Highest session count in the low frequency bin
    pub const LOW_FREQUENCY_SESSIONS: u32 = 3;
    /// Highest session count in the moderate frequency bin
    pub const MODERATE_FREQUENCY_SESSIONS: u32 = 5;
    /// Hours below which high frequency forces the polarized entry
    pub const HIGH_FREQUENCY_GATE_HOURS: f64 = 6.0;
    /// Maximum accepted weekly hours
    pub const MAX_WEEKLY_HOURS: f64 = 40.0;
}

/// Methodology entry requirements
///
/// References:
/// - Bakken, M. (2017). The Norwegian model of lactate-guided threshold training.
/// - Casado, A. et al. (2023). Training periodization, methods, intensity distribution of elite distance runners. *Sports Med Open*.
/// - Canova, R. (2007). "Marathon Training: A Scientific Approach".
pub mod methodology {
    /// Minimum training age for Norwegian double threshold (years)
    pub const NORWEGIAN_MIN_TRAINING_AGE_YEARS: f64 = 2.0;
    /// Minimum trailing 4-week average for Norwegian double threshold (km/week)
    pub const NORWEGIAN_MIN_WEEKLY_KM: f64 = 60.0;
    /// Minimum training age for Canova (years)
    pub const CANOVA_MIN_TRAINING_AGE_YEARS: f64 = 3.0;
    /// Minimum trailing 4-week average for Canova (km/week)
    pub const CANOVA_MIN_WEEKLY_KM: f64 = 70.0;
    /// Trailing window for the aerobic base check (days)
    pub const TRAILING_WINDOW_DAYS: i64 = 28;
    /// Weeks in the trailing window
    pub const TRAILING_WINDOW_WEEKS: f64 = 4.0;
}

/// Five-zone model anchored on LT1/LT2
///
/// Reference: Seiler, S. & Kjerland, G.Ø. (2006). Quantifying training intensity distribution in elite endurance athletes. *SJMSS*, 16(1), 49-56.
pub mod training_zones {
    /// LT1 as a fraction of LT2 speed when LT1 is unknown
    pub const DEFAULT_LT1_FRACTION_OF_LT2: f64 = 0.87;
    /// Bottom of the recovery zone as a fraction of LT1 speed
    pub const RECOVERY_FLOOR_FRACTION_OF_LT1: f64 = 0.70;
    /// Bottom of the aerobic zone as a fraction of LT1 speed
    pub const AEROBIC_FLOOR_FRACTION_OF_LT1: f64 = 0.85;
    /// Top of the threshold zone as a fraction of LT2 speed
    pub const THRESHOLD_CEILING_FRACTION_OF_LT2: f64 = 1.03;
    /// Top of the VO2max zone as a fraction of LT2 speed
    pub const VO2MAX_CEILING_FRACTION_OF_LT2: f64 = 1.15;
    /// Bottom of the threshold zone as a fraction of LT2 speed
    pub const THRESHOLD_FLOOR_FRACTION_OF_LT2: f64 = 0.97;
    /// LTHR fractions bounding the HR zones (Friel)
    pub const HR_ZONE_FRACTIONS: [f64; 6] = [0.70, 0.85, 0.90, 0.95, 1.00, 1.06];
}
