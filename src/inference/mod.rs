// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Image classification latency benchmark
//!
//! Raw RGB images are normalized, classified one at a time, and the mean
//! inference latency is converted into the AI step score.

pub mod benchmark;
pub mod classifier;
pub mod corpus;
pub mod postprocess;
pub mod preprocess;

pub use benchmark::InferenceBenchmark;
pub use classifier::{Classifier, ReferenceClassifier};
pub use corpus::{DirectoryCorpus, ImageCorpus};
pub use postprocess::{ClassificationResult, TopKEntry};
