// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Client for the remote score ranking service
//!
//! Failures here are never fatal to a suite run; callers log and move on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ReportingConfig;
use crate::error::{BenchError, Result};

/// Acknowledgement returned by the submit endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    #[serde(rename = "message")]
    pub accepted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreRequest {
    score: u64,
    version_code: u64,
}

#[derive(Debug, Deserialize)]
struct RankResponse {
    percentile: f64,
}

/// Submits scores and looks up their percentile rank
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreReporter: Send + Sync {
    async fn submit(&self, score: u64, version_code: u64) -> Result<SubmitAck>;

    /// Percentile (0-100) of `score` among submitted results
    async fn rank(&self, score: u64, version_code: u64) -> Result<f64>;
}

/// JSON-over-HTTP ranking client
pub struct HttpReporter {
    client: Client,
    base_url: String,
}

impl HttpReporter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        score: u64,
        version_code: u64,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(target: "devbench.report", "POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&ScoreRequest {
                score,
                version_code,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BenchError::Report(format!(
                "{} returned {}",
                endpoint, status
            )));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ScoreReporter for HttpReporter {
    async fn submit(&self, score: u64, version_code: u64) -> Result<SubmitAck> {
        self.post("submit", score, version_code).await
    }

    async fn rank(&self, score: u64, version_code: u64) -> Result<f64> {
        let response: RankResponse = self.post("getRank", score, version_code).await?;
        if !(0.0..=100.0).contains(&response.percentile) {
            return Err(BenchError::Report(format!(
                "percentile out of range: {}",
                response.percentile
            )));
        }
        Ok(response.percentile)
    }
}

/// Reporter used when no ranking service is configured
pub struct DisabledReporter;

#[async_trait]
impl ScoreReporter for DisabledReporter {
    async fn submit(&self, _score: u64, _version_code: u64) -> Result<SubmitAck> {
        Err(BenchError::Report("reporting disabled".to_string()))
    }

    async fn rank(&self, _score: u64, _version_code: u64) -> Result<f64> {
        Err(BenchError::Report("reporting disabled".to_string()))
    }
}

/// Build the reporter described by `config`
pub fn reporter_from_config(config: &ReportingConfig) -> Result<Box<dyn ScoreReporter>> {
    match &config.base_url {
        Some(url) => Ok(Box::new(HttpReporter::new(
            url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)),
        None => Ok(Box::new(DisabledReporter)),
    }
}

/// Version code sent with every request: `major * 10000 + minor * 100 + patch`
pub fn version_code() -> u64 {
    version_code_of(env!("CARGO_PKG_VERSION"))
}

fn version_code_of(version: &str) -> u64 {
    let core = version.split(['-', '+']).next().unwrap_or_default();
    let mut parts = core.split('.').map(|p| p.parse::<u64>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    let patch = parts.next().unwrap_or(0);
    major * 10_000 + minor * 100 + patch
}

/// Format a percentile the way the rank command prints it, e.g. `12.50%`
pub fn format_percentile(percentile: f64) -> String {
    format!("{:.2}%", percentile)
}
