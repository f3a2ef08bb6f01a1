// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use crate::error::Result;

use super::Settings;

impl Settings {
    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        Self::devbench_home().join("settings.json")
    }

    /// Load settings from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the devbench home directory (~/.devbench or $DEVBENCH_HOME).
    pub fn devbench_home() -> PathBuf {
        if let Ok(home) = std::env::var("DEVBENCH_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".devbench")
    }

    /// Get the persisted score file.
    pub fn scores_path() -> PathBuf {
        Self::devbench_home().join("scores.json")
    }

    /// Get the corpus directory, honoring the configured override.
    pub fn corpus_dir(&self) -> PathBuf {
        self.inference
            .corpus_dir
            .clone()
            .unwrap_or_else(|| Self::devbench_home().join("corpus"))
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories() -> Result<()> {
        let home = Self::devbench_home();
        if !home.exists() {
            std::fs::create_dir_all(&home)?;
        }
        Ok(())
    }
}
