// ABOUTME: Engine-wide numeric constants shared by every component
// ABOUTME: Tolerances used consistently across invariant checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Fixed tolerance for invariant checks (percentage sums, R² bounds)
pub const INVARIANT_EPSILON: f64 = 1e-2;

/// Sessions per week accepted by the resolver and the planner
pub const MAX_SESSIONS_PER_WEEK: u32 = 14;
