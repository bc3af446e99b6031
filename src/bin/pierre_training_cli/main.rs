// ABOUTME: Pierre training CLI - JSON in, JSON out access to every engine operation
// ABOUTME: Reads a request from a file or stdin, prints the response, and reports errors as ErrorResponse JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Analyze a 30-minute time trial
//! pierre-training-cli field-test --input tt.json
//!
//! # Fit a lactate curve from stdin
//! cat stages.json | pierre-training-cli lactate
//!
//! # Plan a Norwegian week
//! echo '{"methodologyConfig":{"type":"NORWEGIAN","variant":"DOUBLES"},"sessionsPerWeek":10}' \
//!   | pierre-training-cli plan --pretty
//!
//! # Analyze many field tests in parallel
//! pierre-training-cli batch --input submissions.json
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use pierre_training_engine::{
    config::EngineConfig,
    engine::TrainingEngine,
    errors::{AppResult, ErrorResponse},
    logging::LoggingConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "pierre-training-cli",
    about = "Pierre Training Science Engine CLI",
    long_about = "Thresholds, zones, and weekly workout distributions from raw performance data. Each command reads a JSON request and prints a JSON response."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Read the request from this file instead of stdin
    #[arg(long, short = 'i', global = true)]
    input: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Analyze a field test (30-min TT, HR drift, critical velocity, 20-min TT, race)
    FieldTest,
    /// Locate LT1/LT2 on a graded lactate curve
    Lactate,
    /// Build a load-velocity profile and e1RM estimates
    LoadVelocity,
    /// Check a set for velocity loss
    VelocityLoss,
    /// Resolve the weekly easy/moderate/hard split
    Intensity,
    /// Check Norwegian or Canova methodology eligibility
    Eligibility,
    /// Plan a training week
    Plan,
    /// Derive training zones from thresholds
    Zones,
    /// Analyze an array of field test submissions in parallel
    Batch,
}

fn run(cli: &Cli) -> AppResult<()> {
    let engine = TrainingEngine::new(EngineConfig::from_env()?);
    debug!(config = ?engine.config(), "Engine configured");
    let input = cli.input.as_deref();

    match cli.command {
        Command::FieldTest => commands::field_test(&engine, input, cli.pretty),
        Command::Lactate => commands::lactate(&engine, input, cli.pretty),
        Command::LoadVelocity => commands::load_velocity(&engine, input, cli.pretty),
        Command::VelocityLoss => commands::velocity_loss(&engine, input, cli.pretty),
        Command::Intensity => commands::intensity(&engine, input, cli.pretty),
        Command::Eligibility => commands::eligibility(&engine, input, cli.pretty),
        Command::Plan => commands::plan(&engine, input, cli.pretty),
        Command::Zones => commands::zones(&engine, input, cli.pretty),
        Command::Batch => commands::batch(&engine, input, cli.pretty),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.verbose();
    }
    if let Err(error) = logging.init() {
        eprintln!("Logging disabled: {error}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let response = ErrorResponse::from(error);
            match serde_json::to_string(&response) {
                Ok(json) => println!("{json}"),
                Err(_) => eprintln!("{}", response.error.message),
            }
            ExitCode::FAILURE
        }
    }
}
