// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Percentile rank command

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::report::{format_percentile, ScoreReporter};
use crate::store::{ScoreStore, OVERALL_SCORE_KEY};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankInfo {
    score: u64,
    version_code: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    percentile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the rank command.
///
/// An unavailable ranking service is reported, not returned as an error.
pub async fn execute(
    store: &dyn ScoreStore,
    reporter: &dyn ScoreReporter,
    version_code: u64,
    format: OutputFormat,
) -> Result<()> {
    let score = store.get_score(OVERALL_SCORE_KEY);
    if score == 0 {
        match format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "score": 0 })),
            OutputFormat::Text => println!("No overall score recorded yet. Run 'devbench run' first."),
        }
        return Ok(());
    }

    let (percentile, error) = match reporter.rank(score, version_code).await {
        Ok(p) => (Some(p), None),
        Err(e) => {
            tracing::warn!(target: "devbench.report", "Rank lookup failed: {}", e);
            (None, Some(e.to_string()))
        }
    };

    match format {
        OutputFormat::Json => {
            let info = RankInfo {
                score,
                version_code,
                percentile,
                error,
            };
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Text => match percentile {
            Some(p) => println!(
                "Overall score {} is faster than {} of devices.",
                score,
                format_percentile(p)
            ),
            None => println!("Ranking unavailable: {}", error.unwrap_or_default()),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use crate::report::MockScoreReporter;
    use crate::store::MemoryScoreStore;

    #[tokio::test]
    async fn test_rank_skips_lookup_without_score() {
        let mut reporter = MockScoreReporter::new();
        reporter.expect_rank().times(0);
        let store = MemoryScoreStore::new();

        assert!(execute(&store, &reporter, 104, OutputFormat::Text).await.is_ok());
    }

    #[tokio::test]
    async fn test_rank_queries_overall_score() {
        let mut reporter = MockScoreReporter::new();
        reporter
            .expect_rank()
            .withf(|score, version| *score == 5000 && *version == 104)
            .times(1)
            .returning(|_, _| Ok(42.0));
        let store = MemoryScoreStore::new();
        store.save_score(OVERALL_SCORE_KEY, 5000).unwrap();

        assert!(execute(&store, &reporter, 104, OutputFormat::Json).await.is_ok());
    }

    #[tokio::test]
    async fn test_rank_failure_is_not_an_error() {
        let mut reporter = MockScoreReporter::new();
        reporter
            .expect_rank()
            .returning(|_, _| Err(BenchError::Report("reporting disabled".to_string())));
        let store = MemoryScoreStore::new();
        store.save_score(OVERALL_SCORE_KEY, 5000).unwrap();

        assert!(execute(&store, &reporter, 104, OutputFormat::Text).await.is_ok());
    }
}
