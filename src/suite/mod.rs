// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Benchmark suite: step definitions, sequencing, progress and results

pub mod companion;
pub mod orchestrator;
pub mod state;
pub mod step;
pub mod summary;

pub use companion::{
    companion_channel, CompanionHandle, CompanionLauncher, CompanionOutcome, CompanionReceiver,
    CompanionSender, ProcessCompanion,
};
pub use orchestrator::SuiteOrchestrator;
pub use state::{StepProgress, SuitePhase, SuiteRunState, SuiteView};
pub use step::{standard_steps, Category, Step, StepAction};
pub use summary::{StepScore, SuiteReport};
