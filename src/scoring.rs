// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Conversion of raw timings into integer scores
//!
//! Every native step shares one formula: `scale / elapsed_ms`, truncated.
//! Per-step scale constants keep typical device timings in a comparable
//! range across categories.

/// Score recorded for a measurement that completed instantaneously.
///
/// A zero-millisecond timing cannot be divided by, so it maps to the largest
/// 32-bit score. This also hides a broken clock; kept for compatibility with
/// previously published scores.
pub const MAX_SCORE: u32 = i32::MAX as u32;

/// Score recorded when a step was attempted but raised an error.
///
/// Distinct from 0 (ran, degenerate or skipped) and from a missing entry
/// (never ran).
pub const FALLBACK_SCORE: u32 = 1;

/// Scale for CPU arithmetic and crypto steps.
pub const CPU_SCALE: u64 = 100_000_000;

/// Scale for the GPU compute step.
pub const GPU_SCALE: u64 = 100_000_000;

/// Scale for RAM and storage steps.
pub const MEMORY_SCALE: u64 = 10_000_000;

/// Scale applied to mean per-image inference latency.
pub const INFERENCE_SCALE: f64 = 10_000_000.0;

/// Multiplier applied to a companion process result.
pub const COMPANION_MULTIPLIER: u32 = 10;

/// Convert an elapsed time in milliseconds into a score.
///
/// Negative timings signal a failed measurement and score 0.
pub fn score_from_elapsed(elapsed_ms: i64, scale: u64) -> u32 {
    match elapsed_ms {
        t if t < 0 => 0,
        0 => MAX_SCORE,
        t => clamp_score(scale / t as u64),
    }
}

/// Convert a mean inference latency into a score.
///
/// Non-positive (or non-finite) latencies score 0.
pub fn score_from_latency(mean_latency_ms: f64, scale: f64) -> u32 {
    if !mean_latency_ms.is_finite() || mean_latency_ms <= 0.0 {
        return 0;
    }
    let raw = (scale / mean_latency_ms).trunc();
    if raw >= MAX_SCORE as f64 {
        MAX_SCORE
    } else {
        raw as u32
    }
}

/// Scale a companion result, saturating at [`MAX_SCORE`].
pub fn score_from_companion(frames: u32, multiplier: u32) -> u32 {
    clamp_score(u64::from(frames) * u64::from(multiplier))
}

fn clamp_score(raw: u64) -> u32 {
    raw.min(u64::from(MAX_SCORE)) as u32
}
