// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Persisted scores command

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::store::{ScoreStore, OVERALL_SCORE_KEY};
use crate::suite::{standard_steps, Category};

/// Execute the scores command
pub fn execute(store: &dyn ScoreStore, format: OutputFormat) -> Result<()> {
    let scores = store.all_scores();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
        return Ok(());
    }

    if scores.is_empty() {
        println!("No scores recorded yet. Run 'devbench run' first.");
        return Ok(());
    }

    println!("\n=== Last recorded scores ===");
    let steps = standard_steps();
    for category in Category::ALL {
        println!("\n{:<28} {:>12}", category.store_key(), store.get_score(category.store_key()));
        for step in steps.iter().filter(|s| s.category == category) {
            println!("  {:<26} {:>12}", step.label, store.get_score(&step.id));
        }
    }
    println!("\n{:<28} {:>12}\n", "Overall", store.get_score(OVERALL_SCORE_KEY));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryScoreStore;

    #[test]
    fn test_scores_empty_store() {
        assert!(execute(&MemoryScoreStore::new(), OutputFormat::Text).is_ok());
    }

    #[test]
    fn test_scores_json() {
        let store = MemoryScoreStore::new();
        store.save_score(OVERALL_SCORE_KEY, 12).unwrap();
        assert!(execute(&store, OutputFormat::Json).is_ok());
        assert!(execute(&store, OutputFormat::Text).is_ok());
    }
}
