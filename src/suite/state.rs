// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Observable suite run state and progress accounting
//!
//! The orchestrator is the only writer. Consumers hold a [`SuiteView`], and
//! workloads hold a [`StepProgress`] that can only raise the current step's
//! fraction.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;

use super::step::{Category, Step};

/// Lifecycle of a suite run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuitePhase {
    #[default]
    NotStarted,
    Running {
        step: usize,
    },
    Finished,
}

/// Snapshot of a suite run, published after every mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteRunState {
    pub phase: SuitePhase,
    /// Fraction of the current step completed, in [0, 1]
    pub step_progress: f32,
    /// Step id -> score for every step finished so far
    pub results: BTreeMap<String, u32>,
}

impl SuiteRunState {
    /// Index of the step currently running
    pub fn current_step(&self) -> Option<usize> {
        match self.phase {
            SuitePhase::Running { step } => Some(step),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SuitePhase::Finished
    }

    /// `(step_index + step_progress) / total_steps`
    pub fn overall_progress(&self, total_steps: usize) -> f32 {
        match self.phase {
            SuitePhase::NotStarted => 0.0,
            SuitePhase::Finished => 1.0,
            SuitePhase::Running { step } => {
                if total_steps == 0 {
                    return 0.0;
                }
                ((step as f32 + self.step_progress) / total_steps as f32).clamp(0.0, 1.0)
            }
        }
    }

    /// Sum of recorded scores for the steps in `category`; missing steps count as 0.
    pub fn category_score(&self, steps: &[Step], category: Category) -> u64 {
        steps
            .iter()
            .filter(|s| s.category == category)
            .filter_map(|s| self.results.get(&s.id))
            .map(|&score| u64::from(score))
            .sum()
    }

    /// Completed steps in the category plus the running step's fraction,
    /// as an integer percentage.
    pub fn category_progress_percent(&self, steps: &[Step], category: Category) -> u8 {
        let in_category: Vec<&Step> = steps.iter().filter(|s| s.category == category).collect();
        if in_category.is_empty() {
            return 0;
        }

        let completed = in_category
            .iter()
            .filter(|s| self.results.contains_key(&s.id))
            .count();

        let in_progress = self
            .current_step()
            .and_then(|idx| steps.get(idx))
            .filter(|s| s.category == category && !self.results.contains_key(&s.id))
            .map(|_| self.step_progress)
            .unwrap_or(0.0);

        let fraction = (completed as f32 + in_progress) / in_category.len() as f32;
        (fraction.clamp(0.0, 1.0) * 100.0) as u8
    }
}

/// Read-only view of a suite run for progress consumers
#[derive(Clone)]
pub struct SuiteView {
    steps: Arc<Vec<Step>>,
    rx: watch::Receiver<SuiteRunState>,
}

impl SuiteView {
    pub(crate) fn new(steps: Arc<Vec<Step>>, rx: watch::Receiver<SuiteRunState>) -> Self {
        Self { steps, rx }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Clone of the latest published state
    pub fn snapshot(&self) -> SuiteRunState {
        self.rx.borrow().clone()
    }

    pub fn overall_progress(&self) -> f32 {
        self.rx.borrow().overall_progress(self.steps.len())
    }

    pub fn category_progress_percent(&self, category: Category) -> u8 {
        self.rx
            .borrow()
            .category_progress_percent(&self.steps, category)
    }

    pub fn category_score(&self, category: Category) -> u64 {
        self.rx.borrow().category_score(&self.steps, category)
    }

    /// Step currently running, if any
    pub fn current_step(&self) -> Option<Step> {
        let idx = self.rx.borrow().current_step()?;
        self.steps.get(idx).cloned()
    }

    /// Wait for the next published change. Returns false once the
    /// orchestrator has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Handle used by a running step to publish its fractional progress
///
/// Updates never block the reporting thread. Values are clamped to [0, 1];
/// updates that would move progress backwards, or that arrive after the
/// step has ended, are dropped.
#[derive(Clone)]
pub struct StepProgress {
    target: Option<(Arc<watch::Sender<SuiteRunState>>, usize)>,
}

impl StepProgress {
    pub(crate) fn new(state: Arc<watch::Sender<SuiteRunState>>, step: usize) -> Self {
        Self {
            target: Some((state, step)),
        }
    }

    /// A handle that discards every update
    pub fn detached() -> Self {
        Self { target: None }
    }

    pub fn report(&self, fraction: f32) {
        let Some((state, step)) = &self.target else {
            return;
        };
        if fraction.is_nan() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        state.send_if_modified(|s| {
            let current = s.phase == SuitePhase::Running { step: *step };
            if current && fraction > s.step_progress {
                s.step_progress = fraction;
                true
            } else {
                false
            }
        });
    }

    /// Report `done / total`, ignoring an empty total
    pub fn report_ratio(&self, done: u64, total: u64) {
        if total > 0 {
            self.report(done as f32 / total as f32);
        }
    }
}
