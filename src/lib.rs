// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! devbench - device benchmark suite orchestrator and thermal stress monitor.
//!
//! This crate exposes the shared runtime used by the `devbench` CLI (`src/main.rs`).
//!
//! Architecture highlights:
//! - `suite`: ordered benchmark steps, progress state and the orchestrator
//! - `workload`: timed native operations (CPU, memory, storage) and capability probing
//! - `inference`: image-classification benchmark over a fixed local corpus
//! - `stress`: sustained load with adaptive time-series compression and a thermal safety cutoff
//! - `scoring`, `store`, `report`: score conversion, persistence and optional submission

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod hardware;
pub mod inference;
pub mod report;
pub mod scoring;
pub mod store;
pub mod stress;
pub mod suite;
pub mod workload;

pub use error::{BenchError, Result};
