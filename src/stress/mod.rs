// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Continuous thermal stress test with safety cutoffs

pub mod compressor;
pub mod sampler;
pub mod supervisor;
pub mod workloads;

pub use compressor::{format_elapsed, TimeSeriesCompressor};
pub use sampler::{SysfsThermalSampler, ThermalSampler};
pub use supervisor::{SafetyTrip, StressSelection, StressSnapshot, StressSupervisor, TripKind};
pub use workloads::{CpuStress, IdleStress, StressWorkload};
