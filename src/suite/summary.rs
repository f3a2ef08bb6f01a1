// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::step::Category;
use crate::hardware::DeviceProfile;

/// Final score of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepScore {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub score: u32,
}

/// Outcome of a complete suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceProfile>,
    /// In execution order
    pub steps: Vec<StepScore>,
    pub categories: BTreeMap<Category, u64>,
    pub overall: u64,
    /// Whether the ranking service accepted the overall score
    pub submitted: bool,
}

impl SuiteReport {
    pub fn category(&self, category: Category) -> u64 {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    pub fn step(&self, id: &str) -> Option<&StepScore> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
