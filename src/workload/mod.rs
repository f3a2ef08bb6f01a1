// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Timed workloads and hardware capability probing
//!
//! The suite only depends on [`TimedOperation`]: run to completion on the
//! calling thread and return elapsed milliseconds. [`HostWorkloads`] provides
//! portable implementations for every kind except GPU compute.

pub mod cpu;
pub mod memory;
pub mod storage;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{CompanionConfig, SuiteConfig};
use crate::error::{BenchError, Result};
use crate::suite::StepProgress;

/// Every native workload the suite can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    CpuMathSingle,
    CpuMathMulti,
    CpuCryptoSingle,
    CpuCryptoMulti,
    GpuGemm,
    RamSeqWrite,
    RamSeqRead,
    RomRandomMixed,
    RomSeqWrite,
    RomSeqRead,
}

/// A blocking workload that reports how long it took
pub trait TimedOperation: Send + Sync {
    /// Run the workload and return elapsed milliseconds.
    ///
    /// A negative value marks the measurement as invalid.
    fn run(&self, progress: &StepProgress) -> Result<i64>;
}

/// Builds the operation for a workload kind
pub trait WorkloadFactory: Send + Sync {
    fn create(&self, kind: WorkloadKind) -> Box<dyn TimedOperation>;
}

/// Optional hardware features some steps depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    GpuCompute,
    RayTracing,
}

/// Answers whether an optional capability is present
pub trait CapabilityProbe: Send + Sync {
    fn supports(&self, capability: Capability) -> bool;
}

/// Capability probe for the host running the CLI
///
/// There is no host GPU kernel, so GPU compute is reported absent. Ray
/// tracing is delegated to the companion process and is present whenever a
/// companion command is configured.
#[derive(Debug, Clone, Default)]
pub struct HostCapabilities {
    companion_configured: bool,
}

impl HostCapabilities {
    pub fn detect(companion: &CompanionConfig) -> Self {
        Self {
            companion_configured: companion
                .command
                .as_ref()
                .is_some_and(|cmd| !cmd.is_empty()),
        }
    }
}

impl CapabilityProbe for HostCapabilities {
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::GpuCompute => false,
            Capability::RayTracing => self.companion_configured,
        }
    }
}

/// Portable workload implementations sized by [`SuiteConfig`]
#[derive(Debug, Clone)]
pub struct HostWorkloads {
    config: SuiteConfig,
}

impl HostWorkloads {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    fn scratch_dir(&self) -> PathBuf {
        self.config
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

impl WorkloadFactory for HostWorkloads {
    fn create(&self, kind: WorkloadKind) -> Box<dyn TimedOperation> {
        let cfg = &self.config;
        match kind {
            WorkloadKind::CpuMathSingle => Box::new(cpu::MathWorkload::single(cfg.cpu_math_iterations)),
            WorkloadKind::CpuMathMulti => Box::new(cpu::MathWorkload::multi(cfg.cpu_math_iterations)),
            WorkloadKind::CpuCryptoSingle => Box::new(cpu::CryptoWorkload::single(
                mib(cfg.crypto_buffer_mb),
                cfg.crypto_iterations,
            )),
            WorkloadKind::CpuCryptoMulti => Box::new(cpu::CryptoWorkload::multi(
                mib(cfg.crypto_buffer_mb),
                cfg.crypto_iterations,
            )),
            WorkloadKind::GpuGemm => Box::new(Unsupported(kind)),
            WorkloadKind::RamSeqWrite => {
                Box::new(memory::RamWorkload::write(mib(cfg.ram_buffer_mb)))
            }
            WorkloadKind::RamSeqRead => Box::new(memory::RamWorkload::read(mib(cfg.ram_buffer_mb))),
            WorkloadKind::RomRandomMixed => Box::new(storage::StorageWorkload::random_mixed(
                self.scratch_dir(),
                mib(cfg.storage_file_mb),
                kib(cfg.storage_random_block_kb),
                cfg.storage_random_ops,
            )),
            WorkloadKind::RomSeqWrite => Box::new(storage::StorageWorkload::sequential_write(
                self.scratch_dir(),
                mib(cfg.storage_file_mb),
                kib(cfg.storage_seq_block_kb),
            )),
            WorkloadKind::RomSeqRead => Box::new(storage::StorageWorkload::sequential_read(
                self.scratch_dir(),
                mib(cfg.storage_file_mb),
                kib(cfg.storage_seq_block_kb),
            )),
        }
    }
}

/// Placeholder for kinds the host cannot run
struct Unsupported(WorkloadKind);

impl TimedOperation for Unsupported {
    fn run(&self, _progress: &StepProgress) -> Result<i64> {
        Err(BenchError::Capability(format!(
            "{:?} has no host implementation",
            self.0
        )))
    }
}

/// Elapsed whole milliseconds since `start`
pub(crate) fn elapsed_ms(start: std::time::Instant) -> i64 {
    i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX)
}

fn mib(n: usize) -> usize {
    n.saturating_mul(1024 * 1024)
}

fn kib(n: usize) -> usize {
    n.saturating_mul(1024)
}
