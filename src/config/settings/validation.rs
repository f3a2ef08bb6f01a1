// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::time::Duration;

use crate::error::{BenchError, Result};

use super::Settings;

impl Settings {
    /// Reject settings the suite or stress monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        let stress = &self.stress;
        if !(stress.high_threshold.is_finite() && stress.low_threshold.is_finite()) {
            return Err(BenchError::Config(
                "stress thresholds must be finite".to_string(),
            ));
        }
        if stress.high_threshold <= stress.low_threshold {
            return Err(BenchError::Config(format!(
                "high threshold {} must be above low threshold {}",
                stress.high_threshold, stress.low_threshold
            )));
        }
        if stress.max_points < 2 {
            return Err(BenchError::Config(
                "stress.max_points must be at least 2".to_string(),
            ));
        }
        if stress.sample_period_ms == 0 {
            return Err(BenchError::Config(
                "stress.sample_period_ms must be positive".to_string(),
            ));
        }
        if stress.cpu_threads == Some(0) {
            return Err(BenchError::Config(
                "stress.cpu_threads must be positive when set".to_string(),
            ));
        }

        let inference = &self.inference;
        if inference.image_count == 0 {
            return Err(BenchError::Config(
                "inference.image_count must be positive".to_string(),
            ));
        }
        if inference.top_k == 0 {
            return Err(BenchError::Config(
                "inference.top_k must be positive".to_string(),
            ));
        }
        if inference.num_classes == 0 {
            return Err(BenchError::Config(
                "inference.num_classes must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&inference.uncertainty_threshold) {
            return Err(BenchError::Config(
                "inference.uncertainty_threshold must be within [0, 1]".to_string(),
            ));
        }

        if let Some(url) = &self.reporting.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(BenchError::Config(format!(
                    "reporting.base_url must be an http(s) URL: {}",
                    url
                )));
            }
        }

        if matches!(&self.companion.command, Some(cmd) if cmd.is_empty()) {
            return Err(BenchError::Config(
                "companion.command must not be empty when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Sampling period of the stress monitor.
    pub fn sample_period(&self) -> Duration {
        Duration::from_millis(self.stress.sample_period_ms)
    }

    /// How long the suite waits for the companion result.
    pub fn companion_timeout(&self) -> Duration {
        Duration::from_secs(self.suite.companion_timeout_secs)
    }

    /// Timeout applied to ranking service requests.
    pub fn report_timeout(&self) -> Duration {
        Duration::from_secs(self.reporting.timeout_secs)
    }
}
