// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Benchmark step definitions and the standard step list

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::{COMPANION_MULTIPLIER, CPU_SCALE, GPU_SCALE, MEMORY_SCALE};
use crate::workload::{Capability, WorkloadKind};

/// Grouping key for steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Cpu,
    Gpu,
    Mem,
    Ai,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 4] = [Category::Cpu, Category::Gpu, Category::Mem, Category::Ai];

    /// Key under which the category total is persisted
    pub fn store_key(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU Benchmark",
            Category::Gpu => "GPU Benchmark",
            Category::Mem => "Memory Test",
            Category::Ai => "AI Test",
        }
    }

    /// Short label for progress displays
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Gpu => "GPU",
            Category::Mem => "Memory",
            Category::Ai => "AI",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the orchestrator dispatches for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Blocking timed workload, scored as `scale / elapsed_ms`
    Native {
        kind: WorkloadKind,
        scale: u64,
        requires: Option<Capability>,
    },
    /// External companion process whose result is multiplied
    Companion {
        requires: Capability,
        multiplier: u32,
    },
    /// Image classification latency benchmark
    Inference,
}

impl StepAction {
    /// Capability that must be present for the step to be dispatched
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            StepAction::Native { requires, .. } => *requires,
            StepAction::Companion { requires, .. } => Some(*requires),
            StepAction::Inference => None,
        }
    }
}

/// One atomic benchmark unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub action: StepAction,
}

impl Step {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: Category,
        action: StepAction,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            action,
        }
    }

    fn native(id: &str, label: &str, category: Category, kind: WorkloadKind, scale: u64) -> Self {
        Self::new(
            id,
            label,
            category,
            StepAction::Native {
                kind,
                scale,
                requires: None,
            },
        )
    }
}

/// The fixed suite: four CPU, two GPU, five memory/storage and one AI step.
pub fn standard_steps() -> Vec<Step> {
    vec![
        Step::native(
            "cpu_math_single",
            "Math (single-core)",
            Category::Cpu,
            WorkloadKind::CpuMathSingle,
            CPU_SCALE,
        ),
        Step::native(
            "cpu_math_multi",
            "Math (multi-core)",
            Category::Cpu,
            WorkloadKind::CpuMathMulti,
            CPU_SCALE,
        ),
        Step::native(
            "cpu_crypto_single",
            "Crypto (single-core)",
            Category::Cpu,
            WorkloadKind::CpuCryptoSingle,
            CPU_SCALE,
        ),
        Step::native(
            "cpu_crypto_multi",
            "Crypto (multi-core)",
            Category::Cpu,
            WorkloadKind::CpuCryptoMulti,
            CPU_SCALE,
        ),
        Step::new(
            "gpu_gemm",
            "Compute GEMM",
            Category::Gpu,
            StepAction::Native {
                kind: WorkloadKind::GpuGemm,
                scale: GPU_SCALE,
                requires: Some(Capability::GpuCompute),
            },
        ),
        Step::new(
            "gpu_rt",
            "Ray tracing",
            Category::Gpu,
            StepAction::Companion {
                requires: Capability::RayTracing,
                multiplier: COMPANION_MULTIPLIER,
            },
        ),
        Step::native(
            "ram_seq_write",
            "RAM sequential write",
            Category::Mem,
            WorkloadKind::RamSeqWrite,
            MEMORY_SCALE,
        ),
        Step::native(
            "ram_seq_read",
            "RAM sequential read",
            Category::Mem,
            WorkloadKind::RamSeqRead,
            MEMORY_SCALE,
        ),
        Step::native(
            "rom_rand_ops",
            "Storage random ops",
            Category::Mem,
            WorkloadKind::RomRandomMixed,
            MEMORY_SCALE,
        ),
        Step::native(
            "rom_seq_write",
            "Storage sequential write",
            Category::Mem,
            WorkloadKind::RomSeqWrite,
            MEMORY_SCALE,
        ),
        Step::native(
            "rom_seq_read",
            "Storage sequential read",
            Category::Mem,
            WorkloadKind::RomSeqRead,
            MEMORY_SCALE,
        ),
        Step::new(
            "ai_inference",
            "Image classification",
            Category::Ai,
            StepAction::Inference,
        ),
    ]
}
