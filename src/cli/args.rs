// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// devbench - device benchmark suite and thermal stress monitor
#[derive(Parser, Debug)]
#[command(name = "devbench")]
#[command(version, about = "Device benchmark suite and thermal stress monitor")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file path (defaults to ~/.devbench/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full benchmark suite
    #[command(alias = "bench")]
    Run(RunArgs),

    /// Run the thermal stress test until stopped or tripped
    Stress(StressArgs),

    /// Show persisted scores from the last run
    Scores,

    /// Look up the percentile rank of the last overall score
    Rank,

    /// Show the device profile and detected capabilities
    #[command(alias = "hw")]
    System,

    /// Show effective settings or write defaults
    #[command(alias = "config")]
    Settings(SettingsArgs),
}

/// Arguments for the run subcommand
#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Do not submit the overall score to the ranking service
    #[arg(long)]
    pub no_submit: bool,
}

/// Arguments for the stress subcommand
#[derive(clap::Args, Debug, Default)]
pub struct StressArgs {
    /// Load the CPU (default when no workload is selected)
    #[arg(long)]
    pub cpu: bool,

    /// Load the GPU
    #[arg(long)]
    pub gpu: bool,

    /// Stop after this many seconds
    #[arg(short, long, value_name = "SECS")]
    pub duration: Option<u64>,
}

/// Arguments for the settings subcommand
#[derive(clap::Args, Debug, Default)]
pub struct SettingsArgs {
    /// Write default settings to the settings file
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing settings file when used with --init
    #[arg(short, long, requires = "init")]
    pub force: bool,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}
