// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Average per-image classification latency over a fixed corpus

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures::future::join_all;

use super::classifier::{Classifier, ReferenceClassifier};
use super::corpus::{DirectoryCorpus, ImageCorpus};
use super::postprocess::ClassificationResult;
use super::preprocess::normalize_rgb;
use crate::config::Settings;
use crate::error::{BenchError, Result};
use crate::scoring::{score_from_latency, INFERENCE_SCALE};
use crate::suite::StepProgress;

type SharedClassifier = Arc<Mutex<Box<dyn Classifier>>>;

fn lock(classifier: &SharedClassifier) -> MutexGuard<'_, Box<dyn Classifier>> {
    classifier.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct InferenceBenchmark {
    classifier: SharedClassifier,
    corpus: Arc<dyn ImageCorpus>,
    top_k: usize,
    uncertainty_threshold: f32,
}

impl InferenceBenchmark {
    pub fn new(
        classifier: Box<dyn Classifier>,
        corpus: Arc<dyn ImageCorpus>,
        top_k: usize,
        uncertainty_threshold: f32,
    ) -> Self {
        Self {
            classifier: Arc::new(Mutex::new(classifier)),
            corpus,
            top_k,
            uncertainty_threshold,
        }
    }

    /// Reference classifier over the configured on-disk corpus
    pub fn from_settings(settings: &Settings) -> Self {
        let config = &settings.inference;
        Self::new(
            Box::new(ReferenceClassifier::new(
                config.num_classes,
                config.labels_file.clone(),
            )),
            Arc::new(DirectoryCorpus::new(
                settings.corpus_dir(),
                config.image_count,
            )),
            config.top_k,
            config.uncertainty_threshold,
        )
    }

    /// Run the benchmark and return its score.
    ///
    /// Any failure scores 0. The classifier is released on every path.
    pub async fn run(&self, progress: &StepProgress) -> u32 {
        let outcome = self.measure(progress).await;
        self.release().await;

        match outcome {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(target: "devbench.inference", "Inference benchmark failed: {}", e);
                0
            }
        }
    }

    async fn release(&self) {
        let classifier = self.classifier.clone();
        let released = tokio::task::spawn_blocking(move || lock(&classifier).release()).await;
        if let Err(e) = released {
            tracing::warn!(target: "devbench.inference", "Classifier release aborted: {}", e);
        }
    }

    async fn load_corpus(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let paths = self.corpus.paths();
        let expected = paths.len();

        let loads = paths.into_iter().map(|path| {
            let corpus = self.corpus.clone();
            async move {
                let loaded = corpus.load(&path).await;
                (path, loaded)
            }
        });

        let images: Vec<(String, Vec<u8>)> = join_all(loads)
            .await
            .into_iter()
            .filter_map(|(path, loaded)| match loaded {
                Ok(bytes) => Some((path, bytes)),
                Err(e) => {
                    tracing::debug!(target: "devbench.inference", "Skipping {}: {}", path, e);
                    None
                }
            })
            .collect();

        if images.len() < expected {
            return Err(BenchError::Corpus(format!(
                "loaded {} of {} images",
                images.len(),
                expected
            )));
        }
        Ok(images)
    }

    async fn measure(&self, progress: &StepProgress) -> Result<u32> {
        let classifier = self.classifier.clone();
        let labels = tokio::task::spawn_blocking(move || {
            let mut guard = lock(&classifier);
            guard.initialize()?;
            Ok::<_, BenchError>(guard.labels().to_vec())
        })
        .await??;

        let images = self.load_corpus().await?;
        let total = images.len();
        if total == 0 {
            return Ok(0);
        }

        let mut elapsed_total = Duration::ZERO;
        for (done, (path, pixels)) in images.into_iter().enumerate() {
            let tensor = normalize_rgb(&pixels)?;

            let classifier = self.classifier.clone();
            let (logits, elapsed) = tokio::task::spawn_blocking(move || {
                let mut guard = lock(&classifier);
                let start = Instant::now();
                let logits = guard.infer(&tensor);
                (logits, start.elapsed())
            })
            .await?;
            elapsed_total += elapsed;

            let result = ClassificationResult::from_logits(logits?, &labels, self.top_k);
            if result.is_uncertain(self.uncertainty_threshold) {
                tracing::debug!(
                    target: "devbench.inference",
                    "{}: {} ({:.2}%) UNCERTAIN in {:?}",
                    path,
                    result.label,
                    result.confidence * 100.0,
                    elapsed
                );
            } else {
                tracing::debug!(
                    target: "devbench.inference",
                    "{}: {} ({:.2}%) in {:?}",
                    path,
                    result.label,
                    result.confidence * 100.0,
                    elapsed
                );
            }

            progress.report_ratio(done as u64 + 1, total as u64);
        }

        let mean_ms = elapsed_total.as_secs_f64() * 1000.0 / total as f64;
        tracing::info!(
            target: "devbench.inference",
            "Mean inference latency over {} images: {:.3} ms",
            total,
            mean_ms
        );
        Ok(score_from_latency(mean_ms, INFERENCE_SCALE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::preprocess::INPUT_LEN;
    use crate::suite::state::{SuitePhase, SuiteRunState};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::watch;

    #[derive(Default)]
    struct Counters {
        initialized: AtomicUsize,
        inferred: AtomicUsize,
        released: AtomicUsize,
    }

    struct FakeClassifier {
        counters: Arc<Counters>,
        ready: bool,
        delay: Duration,
        fail_on: Option<usize>,
    }

    impl FakeClassifier {
        fn new(counters: Arc<Counters>) -> Self {
            Self {
                counters,
                ready: false,
                delay: Duration::from_millis(2),
                fail_on: None,
            }
        }
    }

    impl Classifier for FakeClassifier {
        fn initialize(&mut self) -> Result<()> {
            if !self.ready {
                self.counters.initialized.fetch_add(1, Ordering::SeqCst);
                self.ready = true;
            }
            Ok(())
        }

        fn is_initialized(&self) -> bool {
            self.ready
        }

        fn infer(&mut self, input: &[f32]) -> Result<Vec<f32>> {
            assert_eq!(input.len(), INPUT_LEN);
            let n = self.counters.inferred.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(n) {
                return Err(BenchError::Inference("delegate crashed".to_string()));
            }
            std::thread::sleep(self.delay);
            Ok(vec![0.1, 2.0, 0.3])
        }

        fn labels(&self) -> &[String] {
            &[]
        }

        fn release(&mut self) {
            self.ready = false;
            self.counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct MemoryCorpus {
        count: usize,
        missing: HashSet<usize>,
    }

    #[async_trait]
    impl ImageCorpus for MemoryCorpus {
        fn paths(&self) -> Vec<String> {
            (1..=self.count).map(|i| format!("images/{}.rgb", i)).collect()
        }

        async fn load(&self, path: &str) -> Result<Vec<u8>> {
            let index: usize = path
                .trim_start_matches("images/")
                .trim_end_matches(".rgb")
                .parse()
                .unwrap();
            if self.missing.contains(&index) {
                return Err(BenchError::Corpus(format!("{} missing", path)));
            }
            Ok(vec![(index % 256) as u8; INPUT_LEN])
        }
    }

    fn corpus(count: usize, missing: &[usize]) -> Arc<dyn ImageCorpus> {
        Arc::new(MemoryCorpus {
            count,
            missing: missing.iter().copied().collect(),
        })
    }

    fn running_progress() -> (StepProgress, watch::Receiver<SuiteRunState>) {
        let (tx, rx) = watch::channel(SuiteRunState {
            phase: SuitePhase::Running { step: 0 },
            ..Default::default()
        });
        (StepProgress::new(Arc::new(tx), 0), rx)
    }

    #[tokio::test]
    async fn test_full_corpus_scores_and_releases() {
        let counters = Arc::new(Counters::default());
        let bench = InferenceBenchmark::new(
            Box::new(FakeClassifier::new(counters.clone())),
            corpus(3, &[]),
            5,
            0.30,
        );
        let (progress, rx) = running_progress();

        let score = bench.run(&progress).await;

        // Each call sleeps at least 2ms, so the mean is at least 2ms.
        assert!(score > 0);
        assert!(score <= (INFERENCE_SCALE / 2.0) as u32);
        assert_eq!(counters.initialized.load(Ordering::SeqCst), 1);
        assert_eq!(counters.inferred.load(Ordering::SeqCst), 3);
        assert_eq!(counters.released.load(Ordering::SeqCst), 1);
        assert_eq!(rx.borrow().step_progress, 1.0);
    }

    #[tokio::test]
    async fn test_partial_corpus_scores_zero() {
        let counters = Arc::new(Counters::default());
        let bench = InferenceBenchmark::new(
            Box::new(FakeClassifier::new(counters.clone())),
            corpus(4, &[3]),
            5,
            0.30,
        );

        let score = bench.run(&StepProgress::detached()).await;

        assert_eq!(score, 0);
        assert_eq!(counters.inferred.load(Ordering::SeqCst), 0);
        assert_eq!(counters.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_inference_failure_scores_zero_and_releases() {
        let counters = Arc::new(Counters::default());
        let mut classifier = FakeClassifier::new(counters.clone());
        classifier.fail_on = Some(1);
        let bench = InferenceBenchmark::new(Box::new(classifier), corpus(3, &[]), 5, 0.30);
        let (progress, rx) = running_progress();

        let score = bench.run(&progress).await;

        assert_eq!(score, 0);
        assert_eq!(counters.inferred.load(Ordering::SeqCst), 2);
        assert_eq!(counters.released.load(Ordering::SeqCst), 1);
        // Only the first image completed.
        assert!((rx.borrow().step_progress - 1.0 / 3.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_empty_corpus_scores_zero() {
        let counters = Arc::new(Counters::default());
        let bench = InferenceBenchmark::new(
            Box::new(FakeClassifier::new(counters.clone())),
            corpus(0, &[]),
            5,
            0.30,
        );
        assert_eq!(bench.run(&StepProgress::detached()).await, 0);
        assert_eq!(counters.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_benchmark_can_run_twice() {
        let counters = Arc::new(Counters::default());
        let bench = InferenceBenchmark::new(
            Box::new(FakeClassifier::new(counters.clone())),
            corpus(2, &[]),
            1,
            0.30,
        );
        assert!(bench.run(&StepProgress::detached()).await > 0);
        assert!(bench.run(&StepProgress::detached()).await > 0);
        assert_eq!(counters.initialized.load(Ordering::SeqCst), 2);
        assert_eq!(counters.released.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reference_classifier_on_missing_corpus_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.inference.corpus_dir = Some(dir.path().to_path_buf());
        settings.inference.image_count = 2;

        let bench = InferenceBenchmark::from_settings(&settings);
        assert_eq!(bench.run(&StepProgress::detached()).await, 0);
    }
}
