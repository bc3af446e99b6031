// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports helper modules for pierre-training-cli
// ABOUTME: Provides JSON request reading and response writing

pub mod io;
