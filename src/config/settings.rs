// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for devbench
//!
//! Handles loading and saving settings from ~/.devbench/settings.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod io;
mod validation;

/// Main settings structure, stored in ~/.devbench/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Workload sizing for the benchmark suite
    #[serde(default)]
    pub suite: SuiteConfig,

    /// Image classification benchmark settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Thermal stress test settings
    #[serde(default)]
    pub stress: StressConfig,

    /// Ranking service settings
    #[serde(default)]
    pub reporting: ReportingConfig,

    /// External companion process (ray tracing step)
    #[serde(default)]
    pub companion: CompanionConfig,
}

/// Workload sizes for the native suite steps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteConfig {
    /// Iterations of the math kernel (default: 70,000,000)
    #[serde(default = "default_cpu_math_iterations")]
    pub cpu_math_iterations: u64,

    /// Buffer hashed by the crypto steps, in MiB
    #[serde(default = "default_crypto_buffer_mb")]
    pub crypto_buffer_mb: usize,

    /// Passes over the crypto buffer
    #[serde(default = "default_crypto_iterations")]
    pub crypto_iterations: u32,

    /// RAM buffer for the sequential memory steps, in MiB
    #[serde(default = "default_ram_buffer_mb")]
    pub ram_buffer_mb: usize,

    /// Scratch file size for storage steps, in MiB
    #[serde(default = "default_storage_file_mb")]
    pub storage_file_mb: usize,

    /// Block size for sequential storage steps, in KiB
    #[serde(default = "default_storage_seq_block_kb")]
    pub storage_seq_block_kb: usize,

    /// Block size for the random storage step, in KiB
    #[serde(default = "default_storage_random_block_kb")]
    pub storage_random_block_kb: usize,

    /// Operations performed by the random storage step
    #[serde(default = "default_storage_random_ops")]
    pub storage_random_ops: u64,

    /// Directory for scratch files (defaults to the system temp dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    /// How long to wait for the companion process result, in seconds
    #[serde(default = "default_companion_timeout_secs")]
    pub companion_timeout_secs: u64,
}

/// Image classification benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceConfig {
    /// Directory containing images/{n}.rgb (defaults to ~/.devbench/corpus)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus_dir: Option<PathBuf>,

    /// Number of images the corpus must contain
    #[serde(default = "default_image_count")]
    pub image_count: usize,

    /// Entries kept in each top-K list
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Top-1 probability below which a result is logged as uncertain
    #[serde(default = "default_uncertainty_threshold")]
    pub uncertainty_threshold: f32,

    /// One label per line, indexed by class id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels_file: Option<PathBuf>,

    /// Output classes of the built-in reference model
    #[serde(default = "default_num_classes")]
    pub num_classes: usize,
}

/// Thermal stress test configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StressConfig {
    /// Temperature (°C) at or above which the run is stopped
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f32,

    /// Temperature (°C) at or below which the run is stopped
    #[serde(default = "default_low_threshold")]
    pub low_threshold: f32,

    /// Maximum points kept in the temperature series
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// Sampling period in milliseconds
    #[serde(default = "default_sample_period_ms")]
    pub sample_period_ms: u64,

    /// CPU stress threads (None = one per core)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_threads: Option<usize>,
}

/// Ranking service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportingConfig {
    /// Base URL of the ranking service; reporting is disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_report_timeout_secs")]
    pub timeout_secs: u64,
}

/// External companion process configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CompanionConfig {
    /// Program and arguments; the last integer printed to stdout is the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

fn default_cpu_math_iterations() -> u64 {
    70_000_000
}

fn default_crypto_buffer_mb() -> usize {
    64
}

fn default_crypto_iterations() -> u32 {
    8
}

fn default_ram_buffer_mb() -> usize {
    768
}

fn default_storage_file_mb() -> usize {
    500
}

fn default_storage_seq_block_kb() -> usize {
    4096
}

fn default_storage_random_block_kb() -> usize {
    4
}

fn default_storage_random_ops() -> u64 {
    20_000
}

fn default_companion_timeout_secs() -> u64 {
    300
}

fn default_image_count() -> usize {
    100
}

fn default_top_k() -> usize {
    5
}

fn default_uncertainty_threshold() -> f32 {
    0.30
}

fn default_num_classes() -> usize {
    1000
}

fn default_high_threshold() -> f32 {
    45.0
}

fn default_low_threshold() -> f32 {
    17.0
}

fn default_max_points() -> usize {
    240
}

fn default_sample_period_ms() -> u64 {
    1000
}

fn default_report_timeout_secs() -> u64 {
    10
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            cpu_math_iterations: default_cpu_math_iterations(),
            crypto_buffer_mb: default_crypto_buffer_mb(),
            crypto_iterations: default_crypto_iterations(),
            ram_buffer_mb: default_ram_buffer_mb(),
            storage_file_mb: default_storage_file_mb(),
            storage_seq_block_kb: default_storage_seq_block_kb(),
            storage_random_block_kb: default_storage_random_block_kb(),
            storage_random_ops: default_storage_random_ops(),
            scratch_dir: None,
            companion_timeout_secs: default_companion_timeout_secs(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            corpus_dir: None,
            image_count: default_image_count(),
            top_k: default_top_k(),
            uncertainty_threshold: default_uncertainty_threshold(),
            labels_file: None,
            num_classes: default_num_classes(),
        }
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            high_threshold: default_high_threshold(),
            low_threshold: default_low_threshold(),
            max_points: default_max_points(),
            sample_period_ms: default_sample_period_ms(),
            cpu_threads: None,
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_report_timeout_secs(),
        }
    }
}
