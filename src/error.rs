// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for devbench
//!
//! Step-level failures are converted into scores at the step boundary, so
//! most of these variants never reach the caller of a suite run. They do
//! surface from configuration loading, the CLI, and the collaborator traits.

use thiserror::Error;

/// Main error type for devbench operations
#[derive(Error, Debug)]
pub enum BenchError {
    /// A timed workload failed to produce a measurement
    #[error("Workload failed: {0}")]
    Workload(String),

    /// Model initialization or execution failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Image corpus could not be loaded
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Companion process could not be launched
    #[error("Companion error: {0}")]
    Companion(String),

    /// Required hardware capability is missing
    #[error("Capability unavailable: {0}")]
    Capability(String),

    /// Score persistence errors
    #[error("Score store error: {0}")]
    Store(String),

    /// Ranking service errors
    #[error("Report error: {0}")]
    Report(String),

    /// Stress run or suite already in progress
    #[error("Already running")]
    AlreadyRunning,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for devbench operations
pub type Result<T> = std::result::Result<T, BenchError>;

impl From<tokio::task::JoinError> for BenchError {
    fn from(err: tokio::task::JoinError) -> Self {
        BenchError::Workload(format!("background task aborted: {}", err))
    }
}
