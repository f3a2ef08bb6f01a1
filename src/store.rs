// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Persisted benchmark scores
//!
//! Scores are keyed by step id, category key, or [`OVERALL_SCORE_KEY`].
//! Reads of unknown keys return 0.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{BenchError, Result};

/// Key of the overall suite score
pub const OVERALL_SCORE_KEY: &str = "overall_score";

/// Key-value persistence for integer scores
pub trait ScoreStore: Send + Sync {
    fn save_score(&self, key: &str, value: u64) -> Result<()>;

    /// Stored value, or 0 when absent or unreadable
    fn get_score(&self, key: &str) -> u64;

    fn all_scores(&self) -> BTreeMap<String, u64>;
}

/// Scores kept in a pretty-printed JSON object on disk
pub struct JsonScoreStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, u64>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn read_map_lossy(&self) -> BTreeMap<String, u64> {
        self.read_map().unwrap_or_else(|e| {
            tracing::warn!(
                target: "devbench.suite",
                "Ignoring unreadable score file {}: {}",
                self.path.display(),
                e
            );
            BTreeMap::new()
        })
    }
}

impl ScoreStore for JsonScoreStore {
    fn save_score(&self, key: &str, value: u64) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut scores = self.read_map_lossy();
        scores.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&scores)?;
        std::fs::write(&self.path, content)
            .map_err(|e| BenchError::Store(format!("{}: {}", self.path.display(), e)))
    }

    fn get_score(&self, key: &str) -> u64 {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_map_lossy().get(key).copied().unwrap_or(0)
    }

    fn all_scores(&self) -> BTreeMap<String, u64> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_map_lossy()
    }
}

/// In-process score store
#[derive(Default)]
pub struct MemoryScoreStore {
    scores: Mutex<BTreeMap<String, u64>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn save_score(&self, key: &str, value: u64) -> Result<()> {
        self.scores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn get_score(&self, key: &str) -> u64 {
        self.scores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    fn all_scores(&self) -> BTreeMap<String, u64> {
        self.scores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
