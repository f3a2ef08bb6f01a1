// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! RGB byte buffer to normalized input tensor

use crate::error::{BenchError, Result};

pub const INPUT_WIDTH: usize = 384;
pub const INPUT_HEIGHT: usize = 384;
pub const INPUT_CHANNELS: usize = 3;

/// Bytes in one interleaved RGB input image
pub const INPUT_LEN: usize = INPUT_WIDTH * INPUT_HEIGHT * INPUT_CHANNELS;

/// ImageNet per-channel mean, R G B
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet per-channel standard deviation, R G B
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Normalize interleaved RGB bytes (NHWC) into `(x / 255 - mean) / std`.
///
/// Channel order is preserved. The buffer must be exactly [`INPUT_LEN`] bytes.
pub fn normalize_rgb(pixels: &[u8]) -> Result<Vec<f32>> {
    if pixels.len() != INPUT_LEN {
        return Err(BenchError::InvalidInput(format!(
            "expected {} RGB bytes, got {}",
            INPUT_LEN,
            pixels.len()
        )));
    }
    Ok(normalize_channels(pixels))
}

fn normalize_channels(pixels: &[u8]) -> Vec<f32> {
    pixels
        .chunks_exact(INPUT_CHANNELS)
        .flat_map(|px| {
            (0..INPUT_CHANNELS)
                .map(move |c| (f32::from(px[c]) / 255.0 - CHANNEL_MEAN[c]) / CHANNEL_STD[c])
        })
        .collect()
}
