// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CPU arithmetic and hashing workloads

use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

use sha2::{Digest, Sha256};

use super::{elapsed_ms, TimedOperation};
use crate::error::{BenchError, Result};
use crate::suite::StepProgress;

/// Work units the multi-core math range is split into
const MATH_TASKS: u64 = 100;

/// Transcendental-heavy kernel evaluated once per iteration
pub fn heavy_math(i: f64) -> f64 {
    use std::f64::consts::PI;

    let arg = i + 1.0;
    let s = i.sin();
    let c = i.cos();
    let t = arg.tan();
    let l = arg.ln();
    let r = arg.sqrt();
    let p = (s + c).powf(PI);
    let f = (l * r) % (p + PI);
    let a = (i + arg / 2.0).hypot(PI);
    let result_a = (s * c / t) + l + r;
    let result_b = (p * f + a) / (r.floor() + l.ceil());
    let result_c = (s * r) - (c * l);
    (result_a + result_b + result_c).log10()
}

pub(crate) fn worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Evaluates [`heavy_math`] over a fixed iteration range
#[derive(Debug, Clone)]
pub struct MathWorkload {
    iterations: u64,
    threads: usize,
}

impl MathWorkload {
    pub fn single(iterations: u64) -> Self {
        Self {
            iterations,
            threads: 1,
        }
    }

    pub fn multi(iterations: u64) -> Self {
        Self {
            iterations,
            threads: worker_count(),
        }
    }

    fn run_single(&self, progress: &StepProgress) {
        let report_every = (self.iterations / 100).max(1);
        let mut acc = 0.0;
        for i in 0..self.iterations {
            acc += heavy_math(i as f64);
            if i % report_every == 0 {
                progress.report_ratio(i, self.iterations);
            }
        }
        black_box(acc);
    }

    fn run_multi(&self, progress: &StepProgress) {
        let task_size = self.iterations / MATH_TASKS;
        let remainder = self.iterations % MATH_TASKS;
        let next_task = AtomicU64::new(0);
        let completed = AtomicU64::new(0);

        thread::scope(|scope| {
            for _ in 0..self.threads {
                scope.spawn(|| loop {
                    let task = next_task.fetch_add(1, Ordering::Relaxed);
                    if task >= MATH_TASKS {
                        break;
                    }
                    let start = task * task_size + task.min(remainder);
                    let end = start + task_size + u64::from(task < remainder);

                    let mut acc = 0.0;
                    for i in start..end {
                        acc += heavy_math(i as f64);
                    }
                    black_box(acc);

                    let done = completed.fetch_add(end - start, Ordering::Relaxed) + (end - start);
                    progress.report_ratio(done, self.iterations);
                });
            }
        });
    }
}

impl TimedOperation for MathWorkload {
    fn run(&self, progress: &StepProgress) -> Result<i64> {
        if self.iterations == 0 {
            return Err(BenchError::Workload("math workload has no iterations".into()));
        }
        let start = Instant::now();
        if self.threads <= 1 {
            self.run_single(progress);
        } else {
            self.run_multi(progress);
        }
        progress.report(1.0);
        Ok(elapsed_ms(start))
    }
}

/// Repeated SHA-256 over a fixed buffer
#[derive(Debug, Clone)]
pub struct CryptoWorkload {
    buffer_len: usize,
    iterations: u32,
    threads: usize,
}

impl CryptoWorkload {
    pub fn single(buffer_len: usize, iterations: u32) -> Self {
        Self {
            buffer_len,
            iterations,
            threads: 1,
        }
    }

    pub fn multi(buffer_len: usize, iterations: u32) -> Self {
        Self {
            buffer_len,
            iterations,
            threads: worker_count(),
        }
    }

    /// Hash `chunk` `iterations` times; every digest must match the first.
    fn hash_repeatedly(
        chunk: &[u8],
        iterations: u32,
        completed: &AtomicU64,
        total: u64,
        progress: &StepProgress,
    ) -> Result<()> {
        let mut expected = None;
        for _ in 0..iterations {
            let digest = Sha256::digest(black_box(chunk));
            match &expected {
                None => expected = Some(digest),
                Some(first) if *first != digest => {
                    return Err(BenchError::Workload("hash output is not stable".into()));
                }
                Some(_) => {}
            }
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress.report_ratio(done, total);
        }
        Ok(())
    }
}

impl TimedOperation for CryptoWorkload {
    fn run(&self, progress: &StepProgress) -> Result<i64> {
        if self.buffer_len == 0 || self.iterations == 0 {
            return Err(BenchError::Workload("crypto workload is empty".into()));
        }
        let data: Vec<u8> = (0..self.buffer_len).map(|i| (i & 0xFF) as u8).collect();
        let chunk_len = self.buffer_len.div_ceil(self.threads.max(1));
        let chunks: Vec<&[u8]> = data.chunks(chunk_len).collect();
        let total = chunks.len() as u64 * u64::from(self.iterations);
        let completed = AtomicU64::new(0);

        let start = Instant::now();
        let results: Vec<Result<()>> = thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .iter()
                .map(|chunk| {
                    let completed = &completed;
                    scope.spawn(move || {
                        Self::hash_repeatedly(chunk, self.iterations, completed, total, progress)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .unwrap_or_else(|_| Err(BenchError::Workload("hash worker panicked".into())))
                })
                .collect()
        });
        let elapsed = elapsed_ms(start);

        results.into_iter().collect::<Result<Vec<()>>>()?;
        progress.report(1.0);
        Ok(elapsed)
    }
}
