// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Thermal stress run supervision
//!
//! A run starts the selected workloads and samples temperature once per
//! period. Crossing the high or low threshold latches a safety trip, which
//! halts sampling and every workload. Only the sampling task writes the
//! series; consumers observe [`StressSnapshot`]s.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::compressor::{format_elapsed, TimeSeriesCompressor};
use super::sampler::{SysfsThermalSampler, ThermalSampler};
use super::workloads::{CpuStress, IdleStress, StressWorkload};
use crate::config::StressConfig;
use crate::error::{BenchError, Result};
use crate::workload::cpu::worker_count;

/// Workloads to run during a stress test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StressSelection {
    pub cpu: bool,
    pub gpu: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TripKind {
    High,
    Low,
}

/// Threshold crossing that forced a run to stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafetyTrip {
    pub kind: TripKind,
    pub temperature: f32,
}

/// Published state of the current (or last) stress run
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StressSnapshot {
    pub run_id: u64,
    pub running: bool,
    pub selection: StressSelection,
    /// Compressed temperature series, oldest first
    pub points: Vec<f32>,
    pub seconds_per_point: f64,
    pub samples: u64,
    pub elapsed_secs: f64,
    pub last_temperature: Option<f32>,
    pub trip: Option<SafetyTrip>,
}

impl StressSnapshot {
    pub fn axis_label(&self, index: usize) -> String {
        let seconds = ((index + 1) as f64 * self.seconds_per_point).round();
        format_elapsed(seconds as u64)
    }
}

/// One-shot high/low trip flags for a single run
#[derive(Debug, Default)]
struct SafetyLatch {
    high: bool,
    low: bool,
}

impl SafetyLatch {
    fn evaluate(&mut self, temperature: f32, high: f32, low: f32) -> Option<TripKind> {
        if temperature >= high && !self.high {
            self.high = true;
            Some(TripKind::High)
        } else if temperature <= low && !self.low {
            self.low = true;
            Some(TripKind::Low)
        } else {
            None
        }
    }
}

pub struct StressSupervisor {
    cpu: Arc<dyn StressWorkload>,
    gpu: Arc<dyn StressWorkload>,
    sampler: Arc<dyn ThermalSampler>,
    config: StressConfig,
    state: Arc<watch::Sender<StressSnapshot>>,
    task: Mutex<Option<JoinHandle<()>>>,
    runs: AtomicU64,
}

impl StressSupervisor {
    pub fn new(
        cpu: Arc<dyn StressWorkload>,
        gpu: Arc<dyn StressWorkload>,
        sampler: Arc<dyn ThermalSampler>,
        config: StressConfig,
    ) -> Self {
        let (state, _) = watch::channel(StressSnapshot::default());
        Self {
            cpu,
            gpu,
            sampler,
            config,
            state: Arc::new(state),
            task: Mutex::new(None),
            runs: AtomicU64::new(0),
        }
    }

    /// Host workloads and sysfs sensors
    pub fn from_config(config: StressConfig) -> Self {
        let threads = config.cpu_threads.unwrap_or_else(worker_count);
        Self::new(
            Arc::new(CpuStress::new(threads)),
            Arc::new(IdleStress::new("GPU")),
            Arc::new(SysfsThermalSampler::default()),
            config,
        )
    }

    pub fn subscribe(&self) -> watch::Receiver<StressSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StressSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Begin a run with `selection`. Fails if a run is already active.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, selection: StressSelection) -> Result<()> {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if self.state.borrow().running {
            return Err(BenchError::AlreadyRunning);
        }
        if let Some(previous) = task.take() {
            previous.abort();
        }

        let run_id = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        let period = Duration::from_millis(self.config.sample_period_ms.max(1));
        self.state.send_replace(StressSnapshot {
            run_id,
            running: true,
            selection,
            seconds_per_point: period.as_secs_f64(),
            ..Default::default()
        });

        if selection.cpu {
            self.cpu.start();
        }
        if selection.gpu {
            self.gpu.start();
        }
        tracing::info!(
            target: "devbench.stress",
            "Stress run {} started (cpu: {}, gpu: {})",
            run_id,
            selection.cpu,
            selection.gpu
        );

        let sampling = SamplingLoop {
            run_id,
            period,
            cpu: self.cpu.clone(),
            gpu: self.gpu.clone(),
            sampler: self.sampler.clone(),
            state: self.state.clone(),
            high: self.config.high_threshold,
            low: self.config.low_threshold,
            max_points: self.config.max_points,
        };
        *task = Some(tokio::spawn(sampling.run()));
        Ok(())
    }

    /// Stop sampling and both workloads, whichever were started.
    pub fn stop(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
        self.cpu.stop();
        self.gpu.stop();

        let stopped = self.state.send_if_modified(|s| std::mem::replace(&mut s.running, false));
        if stopped {
            tracing::info!(target: "devbench.stress", "Stress run stopped");
        }
    }
}

impl Drop for StressSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

struct SamplingLoop {
    run_id: u64,
    period: Duration,
    cpu: Arc<dyn StressWorkload>,
    gpu: Arc<dyn StressWorkload>,
    sampler: Arc<dyn ThermalSampler>,
    state: Arc<watch::Sender<StressSnapshot>>,
    high: f32,
    low: f32,
    max_points: usize,
}

impl SamplingLoop {
    fn is_current(&self) -> bool {
        let s = self.state.borrow();
        s.run_id == self.run_id && s.running
    }

    async fn run(self) {
        let mut series = TimeSeriesCompressor::new(self.max_points, self.period.as_secs_f64());
        let mut latch = SafetyLatch::default();
        let mut samples = 0u64;

        let origin = Instant::now();
        let mut ticker = tokio::time::interval_at(origin + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.is_current() {
                break;
            }

            let Some(temperature) = self.sampler.sample() else {
                tracing::debug!(target: "devbench.stress", "No temperature reading, skipping sample");
                continue;
            };
            samples += 1;
            series.push(temperature);

            let trip = latch
                .evaluate(temperature, self.high, self.low)
                .map(|kind| SafetyTrip { kind, temperature });

            let elapsed_secs = origin.elapsed().as_secs_f64();
            // Workloads are stopped while the state is held so a concurrent
            // restart cannot start new ones in between.
            let published = self.state.send_if_modified(|s| {
                if s.run_id != self.run_id || !s.running {
                    return false;
                }
                if let Some(trip) = trip {
                    tracing::warn!(
                        target: "devbench.stress",
                        "Safety trip ({:?}) at {:.1}°C, stopping workloads",
                        trip.kind,
                        trip.temperature
                    );
                    self.cpu.stop();
                    self.gpu.stop();
                }
                s.points = series.points().to_vec();
                s.seconds_per_point = series.seconds_per_point();
                s.samples = samples;
                s.elapsed_secs = elapsed_secs;
                s.last_temperature = Some(temperature);
                if let Some(trip) = trip {
                    s.trip = Some(trip);
                    s.running = false;
                }
                true
            });
            tracing::debug!(
                target: "devbench.stress",
                "Sample {}: {:.1}°C ({} points, {}s/point)",
                samples,
                temperature,
                series.len(),
                series.seconds_per_point()
            );

            if !published || trip.is_some() {
                break;
            }
        }
    }
}
