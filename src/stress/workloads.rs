// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::workload::cpu::heavy_math;

/// A sustained load that runs until stopped
///
/// `start` and `stop` are idempotent. `stop` returns once the load has halted.
pub trait StressWorkload: Send + Sync {
    fn start(&self);
    fn stop(&self);
    fn is_active(&self) -> bool;
}

/// Spins the math kernel on a fixed number of threads
pub struct CpuStress {
    threads: usize,
    running: Arc<AtomicBool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl CpuStress {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            running: Arc::new(AtomicBool::new(false)),
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}

impl StressWorkload for CpuStress {
    fn start(&self) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        for worker in 0..self.threads {
            let running = self.running.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("stress-cpu-{}", worker))
                .spawn(move || {
                    let mut i = 0u64;
                    let mut sink = 0.0f64;
                    while running.load(Ordering::Relaxed) {
                        for _ in 0..10_000 {
                            sink += heavy_math(i as f64);
                            i = i.wrapping_add(1);
                        }
                    }
                    std::hint::black_box(sink);
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => tracing::warn!(target: "devbench.stress", "Failed to spawn stress thread: {}", e),
            }
        }
        tracing::info!(target: "devbench.stress", "CPU stress started on {} threads", handles.len());
    }

    fn stop(&self) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        self.running.store(false, Ordering::SeqCst);
        let stopped = handles.len();
        for handle in handles.drain(..) {
            let _ = handle.join();
        }
        if stopped > 0 {
            tracing::info!(target: "devbench.stress", "CPU stress stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for CpuStress {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Stand-in for a load the host cannot generate; tracks state only
pub struct IdleStress {
    name: &'static str,
    active: AtomicBool,
}

impl IdleStress {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            active: AtomicBool::new(false),
        }
    }
}

impl StressWorkload for IdleStress {
    fn start(&self) {
        if !self.active.swap(true, Ordering::SeqCst) {
            tracing::warn!(target: "devbench.stress", "{} stress has no host implementation", self.name);
        }
    }

    fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_stress_start_stop() {
        let stress = CpuStress::new(2);
        assert!(!stress.is_active());
        stress.start();
        assert!(stress.is_active());
        stress.start();
        assert_eq!(stress.handles.lock().unwrap().len(), 2);
        stress.stop();
        assert!(!stress.is_active());
        assert!(stress.handles.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cpu_stress_stop_when_idle() {
        let stress = CpuStress::new(1);
        stress.stop();
        assert!(!stress.is_active());
    }

    #[test]
    fn test_cpu_stress_restart() {
        let stress = CpuStress::new(1);
        stress.start();
        stress.stop();
        stress.start();
        assert!(stress.is_active());
        stress.stop();
    }

    #[test]
    fn test_zero_threads_clamped() {
        assert_eq!(CpuStress::new(0).threads(), 1);
    }

    #[test]
    fn test_idle_stress_tracks_state() {
        let gpu = IdleStress::new("GPU");
        gpu.start();
        assert!(gpu.is_active());
        gpu.stop();
        assert!(!gpu.is_active());
    }
}
