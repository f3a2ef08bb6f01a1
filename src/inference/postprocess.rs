// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Raw model outputs to a ranked classification result

use serde::{Deserialize, Serialize};

/// One entry of a top-K list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKEntry {
    pub class_id: usize,
    pub label: String,
    pub probability: f32,
}

/// Classification of a single image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub class_id: usize,
    /// Probability of the top class
    pub confidence: f32,
    pub label: String,
    /// Sorted by descending probability; ties keep class order
    pub top_k: Vec<TopKEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logits: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<f32>>,
}

impl ClassificationResult {
    /// Build a result from raw outputs, keeping logits and probabilities.
    pub fn from_logits(logits: Vec<f32>, labels: &[String], k: usize) -> Self {
        let probabilities = softmax(&logits);
        let class_id = argmax(&probabilities).unwrap_or(0);
        let confidence = probabilities.get(class_id).copied().unwrap_or(0.0);
        let top_k = top_k(&probabilities, labels, k);

        Self {
            class_id,
            confidence,
            label: label_for(labels, class_id),
            top_k,
            logits: Some(logits),
            probabilities: Some(probabilities),
        }
    }

    /// Whether the top class falls below `threshold`
    pub fn is_uncertain(&self, threshold: f32) -> bool {
        self.confidence < threshold
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the first maximum value
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if v <= best_value => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// The `k` most probable classes, stable with respect to class order
pub fn top_k(probabilities: &[f32], labels: &[String], k: usize) -> Vec<TopKEntry> {
    let mut indices: Vec<usize> = (0..probabilities.len()).collect();
    // sort_by is stable: equal probabilities keep ascending class ids
    indices.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));
    indices
        .into_iter()
        .take(k)
        .map(|i| TopKEntry {
            class_id: i,
            label: label_for(labels, i),
            probability: probabilities[i],
        })
        .collect()
}

/// Label for a class id, or `class_{id}` when the label list is short
pub fn label_for(labels: &[String], class_id: usize) -> String {
    labels
        .get(class_id)
        .cloned()
        .unwrap_or_else(|| format!("class_{}", class_id))
}
