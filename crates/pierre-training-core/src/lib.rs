// ABOUTME: Core types for the Pierre training science engine
// ABOUTME: Foundation crate with error handling, constants, and shared value objects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Training Core
//!
//! Foundation crate providing the types that cross component boundaries in
//! the training science engine. Every type here is a value object: created by
//! one computation, consumed by the next, never mutated in place.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ErrorResponse`
//! - **constants**: Tolerances and limits shared by all validators
//! - **models**: Confidence, thresholds, intensity targets, workout slots

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine-wide constants
pub mod constants;

/// Shared value objects
pub mod models;

pub use errors::{AppError, AppResult, ErrorCode, ErrorResponse};
