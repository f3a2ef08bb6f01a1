// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Subcommand implementations

pub mod rank;
pub mod run;
pub mod scores;
pub mod settings;
pub mod stress;
pub mod system;

use crate::config::Settings;
use crate::store::JsonScoreStore;

/// Score store backing the CLI
pub fn score_store() -> JsonScoreStore {
    JsonScoreStore::new(Settings::scores_path())
}
