// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::PathBuf;

use async_trait::async_trait;

use super::preprocess::INPUT_LEN;
use crate::error::{BenchError, Result};

/// Fixed set of raw RGB images used by the inference benchmark
#[async_trait]
pub trait ImageCorpus: Send + Sync {
    /// Image identifiers in processing order
    fn paths(&self) -> Vec<String>;

    /// Raw interleaved RGB bytes of one image
    async fn load(&self, path: &str) -> Result<Vec<u8>>;
}

/// Corpus stored on disk as `images/1.rgb` .. `images/N.rgb`
pub struct DirectoryCorpus {
    root: PathBuf,
    count: usize,
}

impl DirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>, count: usize) -> Self {
        Self {
            root: root.into(),
            count,
        }
    }
}

#[async_trait]
impl ImageCorpus for DirectoryCorpus {
    fn paths(&self) -> Vec<String> {
        (1..=self.count).map(|i| format!("images/{}.rgb", i)).collect()
    }

    async fn load(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        let bytes = tokio::fs::read(&full)
            .await
            .map_err(|e| BenchError::Corpus(format!("{}: {}", full.display(), e)))?;
        if bytes.len() != INPUT_LEN {
            return Err(BenchError::Corpus(format!(
                "{}: expected {} bytes, found {}",
                full.display(),
                INPUT_LEN,
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}
