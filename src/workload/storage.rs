// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Storage throughput workloads backed by a scratch file

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::{Rng, RngCore};

use super::{elapsed_ms, TimedOperation};
use crate::error::{BenchError, Result};
use crate::suite::StepProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SequentialWrite,
    SequentialRead,
    /// Alternating reads and writes of small blocks at random offsets
    RandomMixed { ops: u64 },
}

/// Timed I/O against a preallocated scratch file
#[derive(Debug, Clone)]
pub struct StorageWorkload {
    dir: PathBuf,
    file_len: usize,
    block_len: usize,
    mode: Mode,
}

/// Removes the scratch file on every exit path
struct ScratchFile {
    path: PathBuf,
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::debug!("Could not remove scratch file {}: {}", self.path.display(), e);
        }
    }
}

impl StorageWorkload {
    pub fn sequential_write(dir: PathBuf, file_len: usize, block_len: usize) -> Self {
        Self {
            dir,
            file_len,
            block_len,
            mode: Mode::SequentialWrite,
        }
    }

    pub fn sequential_read(dir: PathBuf, file_len: usize, block_len: usize) -> Self {
        Self {
            dir,
            file_len,
            block_len,
            mode: Mode::SequentialRead,
        }
    }

    pub fn random_mixed(dir: PathBuf, file_len: usize, block_len: usize, ops: u64) -> Self {
        Self {
            dir,
            file_len,
            block_len,
            mode: Mode::RandomMixed { ops },
        }
    }

    fn blocks(&self) -> u64 {
        (self.file_len / self.block_len) as u64
    }

    fn file_name(&self) -> &'static str {
        match self.mode {
            Mode::SequentialWrite => "devbench_seq_write.bin",
            Mode::SequentialRead => "devbench_seq_read.bin",
            Mode::RandomMixed { .. } => "devbench_random.bin",
        }
    }

    /// Create the scratch file filled with `blocks()` blocks of `fill`.
    fn preallocate(&self, path: &Path, mut fill: impl FnMut(&mut [u8])) -> Result<()> {
        let mut file = File::create(path)?;
        let mut block = vec![0u8; self.block_len];
        for _ in 0..self.blocks() {
            fill(&mut block);
            file.write_all(&block)?;
        }
        file.sync_all()?;
        Ok(())
    }

    fn sequential_write_pass(&self, path: &Path, progress: &StepProgress) -> Result<i64> {
        self.preallocate(path, |_| {})?;
        let mut file = OpenOptions::new().write(true).open(path)?;
        let mut rng = rand::rng();
        let mut block = vec![0u8; self.block_len];
        let blocks = self.blocks();

        let start = Instant::now();
        for i in 0..blocks {
            rng.fill_bytes(&mut block);
            file.write_all(&block)?;
            progress.report_ratio(i, blocks);
        }
        file.sync_data()?;
        Ok(elapsed_ms(start))
    }

    fn sequential_read_pass(&self, path: &Path, progress: &StepProgress) -> Result<i64> {
        let mut rng = rand::rng();
        self.preallocate(path, |block| rng.fill_bytes(block))?;
        let mut file = File::open(path)?;
        let mut block = vec![0u8; self.block_len];
        let blocks = self.blocks();

        let start = Instant::now();
        let mut checksum: u8 = 0;
        for i in 0..blocks {
            file.read_exact(&mut block)?;
            checksum = block.iter().fold(checksum, |acc, b| acc.wrapping_add(*b));
            progress.report_ratio(i, blocks);
        }
        std::hint::black_box(checksum);
        Ok(elapsed_ms(start))
    }

    fn random_mixed_pass(&self, path: &Path, ops: u64, progress: &StepProgress) -> Result<i64> {
        self.preallocate(path, |_| {})?;
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let mut rng = rand::rng();
        let mut block = vec![0u8; self.block_len];
        let blocks = self.blocks();

        let start = Instant::now();
        for i in 0..ops {
            let offset = rng.random_range(0..blocks) * self.block_len as u64;
            file.seek(SeekFrom::Start(offset))?;
            if i % 2 == 0 {
                rng.fill_bytes(&mut block);
                file.write_all(&block)?;
            } else {
                file.read_exact(&mut block)?;
            }
            progress.report_ratio(i, ops);
        }
        file.sync_data()?;
        Ok(elapsed_ms(start))
    }
}

impl TimedOperation for StorageWorkload {
    fn run(&self, progress: &StepProgress) -> Result<i64> {
        if self.block_len == 0 || self.blocks() == 0 {
            return Err(BenchError::Workload(format!(
                "storage file of {} bytes holds no {}-byte blocks",
                self.file_len, self.block_len
            )));
        }
        fs::create_dir_all(&self.dir)?;
        let scratch = ScratchFile {
            path: self.dir.join(self.file_name()),
        };

        let elapsed = match self.mode {
            Mode::SequentialWrite => self.sequential_write_pass(&scratch.path, progress)?,
            Mode::SequentialRead => self.sequential_read_pass(&scratch.path, progress)?,
            Mode::RandomMixed { ops } => {
                if ops == 0 {
                    return Err(BenchError::Workload("random workload has no operations".into()));
                }
                self.random_mixed_pass(&scratch.path, ops, progress)?
            }
        };

        progress.report(1.0);
        Ok(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sequential_write_cleans_up() {
        let dir = TempDir::new().unwrap();
        let workload = StorageWorkload::sequential_write(dir.path().to_path_buf(), 64 * 1024, 4096);
        assert!(workload.run(&StepProgress::detached()).unwrap() >= 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sequential_read_runs() {
        let dir = TempDir::new().unwrap();
        let workload = StorageWorkload::sequential_read(dir.path().to_path_buf(), 64 * 1024, 8192);
        assert!(workload.run(&StepProgress::detached()).unwrap() >= 0);
    }

    #[test]
    fn test_random_mixed_runs() {
        let dir = TempDir::new().unwrap();
        let workload =
            StorageWorkload::random_mixed(dir.path().to_path_buf(), 64 * 1024, 4096, 50);
        assert!(workload.run(&StepProgress::detached()).unwrap() >= 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_block_larger_than_file_fails() {
        let dir = TempDir::new().unwrap();
        let workload = StorageWorkload::sequential_read(dir.path().to_path_buf(), 1024, 4096);
        assert!(matches!(
            workload.run(&StepProgress::detached()),
            Err(BenchError::Workload(_))
        ));
    }

    #[test]
    fn test_random_zero_ops_fails() {
        let dir = TempDir::new().unwrap();
        let workload = StorageWorkload::random_mixed(dir.path().to_path_buf(), 8192, 4096, 0);
        assert!(workload.run(&StepProgress::detached()).is_err());
    }
}
