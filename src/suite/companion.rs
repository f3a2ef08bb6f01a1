// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hand-off of results from an externally launched companion process
//!
//! The launcher receives a [`CompanionSender`]; the orchestrator waits on the
//! matching [`CompanionReceiver`] with a timeout. The slot holds one value and
//! a later send overwrites an unread one. Every launch returns a
//! [`CompanionHandle`] that the orchestrator shuts down before moving on, so a
//! companion never outlives its step.

use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;

use crate::error::{BenchError, Result};

/// What the companion reported back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionOutcome {
    /// Finished with a raw result (frames rendered)
    Completed(u32),
    /// Exited without a usable result
    Absent,
}

struct Slot {
    value: Mutex<Option<CompanionOutcome>>,
    notify: Notify,
}

/// Sending half of the single-slot channel
#[derive(Clone)]
pub struct CompanionSender {
    slot: Arc<Slot>,
}

/// Receiving half of the single-slot channel
pub struct CompanionReceiver {
    slot: Arc<Slot>,
}

/// Create a single-slot, overwrite-on-send channel
pub fn companion_channel() -> (CompanionSender, CompanionReceiver) {
    let slot = Arc::new(Slot {
        value: Mutex::new(None),
        notify: Notify::new(),
    });
    (
        CompanionSender { slot: slot.clone() },
        CompanionReceiver { slot },
    )
}

impl CompanionSender {
    /// Store `outcome`, replacing any value not yet received
    pub fn send(&self, outcome: CompanionOutcome) {
        *self
            .slot
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(outcome);
        self.slot.notify.notify_one();
    }
}

impl CompanionReceiver {
    fn take(&self) -> Option<CompanionOutcome> {
        self.slot
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Wait for the next outcome
    pub async fn recv(&mut self) -> CompanionOutcome {
        loop {
            let notified = self.slot.notify.notified();
            if let Some(outcome) = self.take() {
                return outcome;
            }
            notified.await;
        }
    }

    /// Wait at most `timeout`; a missing result resolves to [`CompanionOutcome::Absent`].
    pub async fn recv_timeout(&mut self, timeout: Duration) -> CompanionOutcome {
        match tokio::time::timeout(timeout, self.recv()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    target: "devbench.suite",
                    "Companion produced no result within {:?}",
                    timeout
                );
                CompanionOutcome::Absent
            }
        }
    }
}

/// Ownership of a launched companion
///
/// Dropping the handle also cancels the companion.
pub struct CompanionHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CompanionHandle {
    /// `task` must stop its companion once `cancel` fires or is dropped.
    pub fn new(cancel: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            cancel: Some(cancel),
            task: Some(task),
        }
    }

    /// A handle for launchers with nothing to stop
    pub fn detached() -> Self {
        Self {
            cancel: None,
            task: None,
        }
    }

    /// Stop the companion if it is still running and wait until it has exited.
    pub async fn shutdown(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(target: "devbench.suite", "Companion task aborted: {}", e);
            }
        }
    }
}

/// Launches the external activity that eventually reports through `results`
#[async_trait]
pub trait CompanionLauncher: Send + Sync {
    async fn launch(&self, results: CompanionSender) -> Result<CompanionHandle>;
}

/// Runs a configured command line and reads its result from stdout
///
/// The last line of stdout that parses as an unsigned integer is the result.
/// A non-zero exit status or no integer line yields `Absent`. A cancelled
/// process is killed and reaped without reporting anything.
pub struct ProcessCompanion {
    program: String,
    args: Vec<String>,
}

impl ProcessCompanion {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| BenchError::Config("companion command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl CompanionLauncher for ProcessCompanion {
    async fn launch(&self, results: CompanionSender) -> Result<CompanionHandle> {
        tracing::info!(target: "devbench.suite", "Starting companion: {}", self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BenchError::Companion(format!("failed to start {}: {}", self.program, e)))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| BenchError::Companion("companion stdout unavailable".to_string()))?;

        let (cancel, mut cancelled) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut output = String::new();
            let finished = tokio::select! {
                done = async {
                    let read = stdout.read_to_string(&mut output).await;
                    (read, child.wait().await)
                } => Some(done),
                _ = &mut cancelled => None,
            };

            let Some((read, status)) = finished else {
                if let Err(e) = child.kill().await {
                    tracing::warn!(target: "devbench.suite", "Failed to kill companion: {}", e);
                }
                tracing::info!(target: "devbench.suite", "Companion cancelled");
                return;
            };

            let outcome = match (read, status) {
                (Ok(_), Ok(status)) if status.success() => parse_companion_output(&output)
                    .map(CompanionOutcome::Completed)
                    .unwrap_or(CompanionOutcome::Absent),
                (_, Ok(status)) => {
                    tracing::warn!(target: "devbench.suite", "Companion exited with {}", status);
                    CompanionOutcome::Absent
                }
                (_, Err(e)) => {
                    tracing::warn!(target: "devbench.suite", "Companion wait failed: {}", e);
                    CompanionOutcome::Absent
                }
            };
            tracing::info!(target: "devbench.suite", "Companion closed: {:?}", outcome);
            results.send(outcome);
        });

        Ok(CompanionHandle::new(cancel, task))
    }
}

fn parse_companion_output(output: &str) -> Option<u32> {
    output
        .lines()
        .rev()
        .find_map(|line| line.trim().parse::<u32>().ok())
}
