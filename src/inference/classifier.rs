// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Image classifier abstraction and the built-in reference model

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::preprocess::{INPUT_CHANNELS, INPUT_HEIGHT, INPUT_LEN, INPUT_WIDTH};
use crate::error::{BenchError, Result};

/// A model that turns a normalized input tensor into raw class scores
///
/// Implementations are driven from a blocking thread. `initialize` must be
/// idempotent and `release` must be safe to call when not initialized.
pub trait Classifier: Send {
    fn initialize(&mut self) -> Result<()>;

    fn is_initialized(&self) -> bool;

    /// Raw output values (logits), one per class
    fn infer(&mut self, input: &[f32]) -> Result<Vec<f32>>;

    /// Class labels indexed by class id; may be shorter than the output
    fn labels(&self) -> &[String];

    fn release(&mut self);
}

/// Pooling grid edge; features are `GRID * GRID * channels`
const GRID: usize = 8;
const FEATURES: usize = GRID * GRID * INPUT_CHANNELS;
const WEIGHT_SEED: u64 = 0x00de_7be7_c4a1;

/// Deterministic linear classifier over average-pooled image features
///
/// Weights come from a fixed seed so every device runs the same model.
pub struct ReferenceClassifier {
    num_classes: usize,
    labels_file: Option<PathBuf>,
    labels: Vec<String>,
    weights: Vec<f32>,
    bias: Vec<f32>,
}

impl ReferenceClassifier {
    pub fn new(num_classes: usize, labels_file: Option<PathBuf>) -> Self {
        Self {
            num_classes,
            labels_file,
            labels: Vec::new(),
            weights: Vec::new(),
            bias: Vec::new(),
        }
    }

    fn load_labels(&self) -> Result<Vec<String>> {
        let Some(path) = &self.labels_file else {
            return Ok(Vec::new());
        };
        let content = std::fs::read_to_string(path).map_err(|e| {
            BenchError::Inference(format!("cannot read labels {}: {}", path.display(), e))
        })?;
        Ok(content.lines().map(|l| l.trim().to_string()).collect())
    }

    fn pooled_features(input: &[f32]) -> Vec<f32> {
        let cell_w = INPUT_WIDTH / GRID;
        let cell_h = INPUT_HEIGHT / GRID;
        let mut features = vec![0.0f32; FEATURES];

        for y in 0..INPUT_HEIGHT {
            let gy = y / cell_h;
            let row = &input[y * INPUT_WIDTH * INPUT_CHANNELS..(y + 1) * INPUT_WIDTH * INPUT_CHANNELS];
            for (x, px) in row.chunks_exact(INPUT_CHANNELS).enumerate() {
                let base = (gy * GRID + x / cell_w) * INPUT_CHANNELS;
                for (c, value) in px.iter().enumerate() {
                    features[base + c] += value;
                }
            }
        }

        let cell_area = (cell_w * cell_h) as f32;
        for f in &mut features {
            *f /= cell_area;
        }
        features
    }
}

impl Classifier for ReferenceClassifier {
    fn initialize(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }
        if self.num_classes == 0 {
            return Err(BenchError::Inference("model has no classes".to_string()));
        }

        self.labels = self.load_labels()?;

        let mut rng = StdRng::seed_from_u64(WEIGHT_SEED);
        let scale = 1.0 / (FEATURES as f32).sqrt();
        self.weights = (0..self.num_classes * FEATURES)
            .map(|_| rng.random_range(-scale..scale))
            .collect();
        self.bias = (0..self.num_classes)
            .map(|_| rng.random_range(-0.1f32..0.1))
            .collect();

        tracing::debug!(
            target: "devbench.inference",
            "Reference classifier ready: {} classes, {} labels",
            self.num_classes,
            self.labels.len()
        );
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        !self.weights.is_empty()
    }

    fn infer(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if !self.is_initialized() {
            return Err(BenchError::Inference("classifier not initialized".to_string()));
        }
        if input.len() != INPUT_LEN {
            return Err(BenchError::InvalidInput(format!(
                "expected tensor of {} values, got {}",
                INPUT_LEN,
                input.len()
            )));
        }

        let features = Self::pooled_features(input);
        let logits = self
            .weights
            .chunks_exact(FEATURES)
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(&features).map(|(w, f)| w * f).sum::<f32>() + b)
            .collect();
        Ok(logits)
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn release(&mut self) {
        self.weights = Vec::new();
        self.bias = Vec::new();
        self.labels = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_infer_requires_initialize() {
        let mut model = ReferenceClassifier::new(10, None);
        assert!(!model.is_initialized());
        assert!(model.infer(&vec![0.0; INPUT_LEN]).is_err());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut model = ReferenceClassifier::new(10, None);
        model.initialize().unwrap();
        let first = model.infer(&vec![0.5; INPUT_LEN]).unwrap();
        model.initialize().unwrap();
        let second = model.infer(&vec![0.5; INPUT_LEN]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_infer_output_per_class() {
        let mut model = ReferenceClassifier::new(25, None);
        model.initialize().unwrap();
        assert_eq!(model.infer(&vec![1.0; INPUT_LEN]).unwrap().len(), 25);
    }

    #[test]
    fn test_infer_rejects_wrong_length() {
        let mut model = ReferenceClassifier::new(3, None);
        model.initialize().unwrap();
        assert!(matches!(
            model.infer(&[0.0; 16]),
            Err(BenchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_weights_are_deterministic() {
        let mut a = ReferenceClassifier::new(5, None);
        let mut b = ReferenceClassifier::new(5, None);
        a.initialize().unwrap();
        b.initialize().unwrap();
        let input: Vec<f32> = (0..INPUT_LEN).map(|i| (i % 7) as f32 * 0.1).collect();
        assert_eq!(a.infer(&input).unwrap(), b.infer(&input).unwrap());
    }

    #[test]
    fn test_release_resets_state() {
        let mut model = ReferenceClassifier::new(5, None);
        model.initialize().unwrap();
        model.release();
        assert!(!model.is_initialized());
        model.release();
    }

    #[test]
    fn test_labels_loaded_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "tench\ngoldfish").unwrap();

        let mut model = ReferenceClassifier::new(3, Some(file.path().to_path_buf()));
        model.initialize().unwrap();
        assert_eq!(model.labels(), &["tench".to_string(), "goldfish".to_string()]);
    }

    #[test]
    fn test_missing_labels_file_fails_initialize() {
        let mut model = ReferenceClassifier::new(3, Some(PathBuf::from("/nonexistent/labels.txt")));
        assert!(model.initialize().is_err());
        assert!(!model.is_initialized());
    }

    #[test]
    fn test_pooled_features_of_uniform_input() {
        let features = ReferenceClassifier::pooled_features(&vec![2.0; INPUT_LEN]);
        assert_eq!(features.len(), FEATURES);
        assert!(features.iter().all(|f| (f - 2.0).abs() < 1e-3));
    }
}
