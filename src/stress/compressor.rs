// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Bounded temperature series with a coarsening time axis
//!
//! Whenever an append pushes the series past `max_points`, adjacent pairs are
//! averaged and the seconds represented by each point double.

/// Temperature series that never grows beyond a fixed number of points
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesCompressor {
    max_points: usize,
    base_seconds_per_point: f64,
    seconds_per_point: f64,
    passes: u32,
    points: Vec<f32>,
}

impl TimeSeriesCompressor {
    pub fn new(max_points: usize, base_seconds_per_point: f64) -> Self {
        let max_points = max_points.max(1);
        Self {
            max_points,
            base_seconds_per_point,
            seconds_per_point: base_seconds_per_point,
            passes: 0,
            points: Vec::with_capacity(max_points + 1),
        }
    }

    /// Append one sample, compressing as needed
    pub fn push(&mut self, value: f32) {
        self.points.push(value);
        while self.points.len() > self.max_points {
            self.compress();
        }
    }

    fn compress(&mut self) {
        self.points = self
            .points
            .chunks(2)
            .map(|pair| pair.iter().sum::<f32>() / pair.len() as f32)
            .collect();
        self.seconds_per_point *= 2.0;
        self.passes += 1;
    }

    /// Drop all points and restore the initial scale
    pub fn clear(&mut self) {
        self.points.clear();
        self.seconds_per_point = self.base_seconds_per_point;
        self.passes = 0;
    }

    pub fn points(&self) -> &[f32] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn seconds_per_point(&self) -> f64 {
        self.seconds_per_point
    }

    /// Compression passes since the last clear
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Time-axis label for point `index`: `(index + 1) * seconds_per_point`
    pub fn axis_label(&self, index: usize) -> String {
        let seconds = ((index + 1) as f64 * self.seconds_per_point).round();
        format_elapsed(seconds as u64)
    }
}

/// `Ns` below a minute, `Mm Ss` (or `Mm` on the minute) below an hour, `Hh Mm` beyond.
pub fn format_elapsed(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        let (m, s) = (seconds / 60, seconds % 60);
        if s == 0 {
            format!("{}m", m)
        } else {
            format!("{}m {}s", m, s)
        }
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
