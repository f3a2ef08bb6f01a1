// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Sequential RAM bandwidth workloads

use std::hint::black_box;
use std::time::Instant;

use super::{elapsed_ms, TimedOperation};
use crate::error::{BenchError, Result};
use crate::suite::StepProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Write,
    Read,
}

/// Byte-wise sequential pass over a large heap buffer
#[derive(Debug, Clone)]
pub struct RamWorkload {
    buffer_len: usize,
    direction: Direction,
}

impl RamWorkload {
    pub fn write(buffer_len: usize) -> Self {
        Self {
            buffer_len,
            direction: Direction::Write,
        }
    }

    pub fn read(buffer_len: usize) -> Self {
        Self {
            buffer_len,
            direction: Direction::Read,
        }
    }

    fn allocate(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(self.buffer_len).map_err(|e| {
            BenchError::Workload(format!("cannot allocate {} bytes: {}", self.buffer_len, e))
        })?;
        Ok(buffer)
    }
}

impl TimedOperation for RamWorkload {
    fn run(&self, progress: &StepProgress) -> Result<i64> {
        if self.buffer_len == 0 {
            return Err(BenchError::Workload("RAM buffer is empty".into()));
        }
        let mut buffer = self.allocate()?;
        let total = self.buffer_len as u64;
        let report_every = (self.buffer_len / 100).max(1);

        let elapsed = match self.direction {
            Direction::Write => {
                let start = Instant::now();
                for i in 0..self.buffer_len {
                    buffer.push((i & 0xFF) as u8);
                    if i % report_every == 0 {
                        progress.report_ratio(i as u64, total);
                    }
                }
                black_box(&buffer);
                elapsed_ms(start)
            }
            Direction::Read => {
                buffer.extend((0..self.buffer_len).map(|i| (i & 0xFF) as u8));
                let start = Instant::now();
                let mut sum: u8 = 0;
                for (i, byte) in buffer.iter().enumerate() {
                    sum = sum.wrapping_add(black_box(*byte));
                    if i % report_every == 0 {
                        progress.report_ratio(i as u64, total);
                    }
                }
                black_box(sum);
                elapsed_ms(start)
            }
        };

        progress.report(1.0);
        Ok(elapsed)
    }
}
