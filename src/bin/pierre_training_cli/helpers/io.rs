// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: JSON request/response helpers for pierre-training-cli
// ABOUTME: Reads a typed request from a file or stdin and prints typed responses to stdout

use pierre_training_engine::engine::decode_request;
use pierre_training_engine::errors::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Read and deserialize a request from `input`, or stdin when absent
pub fn read_request<T: DeserializeOwned>(input: Option<&Path>) -> AppResult<T> {
    let raw = match input {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            AppError::invalid_input(format!("Cannot read {}: {e}", path.display())).with_source(e)
        })?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AppError::invalid_input(format!("Cannot read stdin: {e}")).with_source(e))?;
            buffer
        }
    };
    debug!(bytes = raw.len(), "Read request");
    decode_request(&raw)
}

/// Serialize a response to stdout
pub fn write_response<T: Serialize>(response: &T, pretty: bool) -> AppResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    println!("{json}");
    Ok(())
}
