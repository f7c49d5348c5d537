//! Per-pixel color transforms.
//!
//! Every transform is a fixed-weight recombination of the source R, G, B
//! channels, optionally biased, then capped at 255. Alpha is never touched.
//!
//! | Transform | Luminance weights (R, G, B) | Output |
//! |---|---|---|
//! | Grayscale | 0.2126, 0.7152, 0.0722 (BT.709) | `R = G = B = round(L)` |
//! | Sepia | 0.299, 0.587, 0.114 (BT.601) | `L + 40`, `L + 20`, `L` |
//! | Slumber | 0.099, 0.887, 0.114 | `L + 0.8(R-L)`, `L + 0.2(G-L)`, `L + 0.3(B-L)` |
//!
//! ## Rounding
//!
//! Grayscale rounds its luminance to the nearest integer. Sepia and Slumber
//! truncate toward zero after the ceiling clamp. Only the upper bound is
//! clamped: for 8-bit inputs every Sepia channel is a non-negative sum, and
//! Slumber's channels reduce to `0.2L + 0.8R`, `0.8L + 0.2G` and `0.7L + 0.3B`,
//! so no channel can go below zero.
//!
//! ```
//! use tint_batch::imaging::ColorTransform;
//!
//! assert_eq!(ColorTransform::Sepia.map_rgb([255, 0, 0]), [116, 96, 76]);
//! assert_eq!(ColorTransform::Grayscale.map_rgb([255, 255, 255]), [255, 255, 255]);
//! ```

use super::pixels::{CHANNELS, PixelBuffer, expected_len};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Invalid pixel buffer: {len} bytes for {width}x{height} RGBA")]
    InvalidBuffer { width: u32, height: u32, len: usize },
}

/// The three color transforms applied to every extracted image.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorTransform {
    Grayscale,
    Sepia,
    Slumber,
}

const GRAYSCALE_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];
const SEPIA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];
const SEPIA_BIAS: [f64; 3] = [40.0, 20.0, 0.0];
const SLUMBER_WEIGHTS: [f64; 3] = [0.099, 0.887, 0.114];
const SLUMBER_KEEP: [f64; 3] = [0.8, 0.2, 0.3];

fn luminance(weights: [f64; 3], rgb: [u8; 3]) -> f64 {
    weights[0] * rgb[0] as f64 + weights[1] * rgb[1] as f64 + weights[2] * rgb[2] as f64
}

impl ColorTransform {
    /// All transforms, in the order a full run applies them.
    pub const ALL: [ColorTransform; 3] = [
        ColorTransform::Grayscale,
        ColorTransform::Sepia,
        ColorTransform::Slumber,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorTransform::Grayscale => "grayscale",
            ColorTransform::Sepia => "sepia",
            ColorTransform::Slumber => "slumber",
        }
    }

    /// Channel values before the ceiling clamp and integer conversion.
    pub(crate) fn channels(self, rgb: [u8; 3]) -> [f64; 3] {
        match self {
            ColorTransform::Grayscale => {
                let l = luminance(GRAYSCALE_WEIGHTS, rgb).round();
                [l, l, l]
            }
            ColorTransform::Sepia => {
                let l = luminance(SEPIA_WEIGHTS, rgb);
                SEPIA_BIAS.map(|bias| l + bias)
            }
            ColorTransform::Slumber => {
                let l = luminance(SLUMBER_WEIGHTS, rgb);
                let mut out = [0.0; 3];
                for (i, keep) in SLUMBER_KEEP.iter().enumerate() {
                    out[i] = l + (rgb[i] as f64 - l) * keep;
                }
                out
            }
        }
    }

    /// Map one pixel's RGB triple.
    pub fn map_rgb(self, rgb: [u8; 3]) -> [u8; 3] {
        // `as u8` truncates toward zero; the value is already capped at 255.
        self.channels(rgb).map(|c| c.min(255.0) as u8)
    }

    fn apply_to_slice(self, data: &mut [u8]) {
        for px in data.chunks_exact_mut(CHANNELS) {
            let [r, g, b] = self.map_rgb([px[0], px[1], px[2]]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    }
}

impl std::fmt::Display for ColorTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply `transform` to every pixel of `buffer` in place.
pub fn apply_transform(transform: ColorTransform, buffer: &mut PixelBuffer) {
    transform.apply_to_slice(buffer.as_raw_mut());
}

/// Apply `transform` to a raw RGBA8 slice that has not been validated yet.
pub fn transform_raw(
    transform: ColorTransform,
    width: u32,
    height: u32,
    data: &mut [u8],
) -> Result<(), TransformError> {
    if expected_len(width, height) != Some(data.len()) {
        return Err(TransformError::InvalidBuffer {
            width,
            height,
            len: data.len(),
        });
    }
    transform.apply_to_slice(data);
    Ok(())
}
