//! PNG codec seam.
//!
//! The [`ImageCodec`] trait is the boundary between the batch runner and the
//! actual byte-level format. The production implementation is [`PngCodec`],
//! built on the `image` crate's pure-Rust PNG decoder and encoder. Tests swap
//! in a recording mock so batch logic can be exercised without real PNGs.

use super::pixels::PixelBuffer;
use super::transform::TransformError;
use crate::config::{EncodingConfig, PngCompression, PngFilter};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error(transparent)]
    InvalidBuffer(#[from] TransformError),
}

/// Decode encoded bytes into RGBA8 pixels and back.
///
/// Implementations must be `Sync`: a batch shares one codec across rayon workers.
pub trait ImageCodec: Sync {
    /// Decode any supported input into an RGBA8 buffer.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, CodecError>;

    /// Encode an RGBA8 buffer.
    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, CodecError>;
}

/// PNG codec using the `image` crate.
///
/// Decoding accepts every bit depth and color type the `png` decoder supports
/// and normalizes to 8-bit RGBA. Encoding always writes 8-bit RGBA.
#[derive(Debug, Clone, Copy)]
pub struct PngCodec {
    compression: CompressionType,
    filter: FilterType,
}

impl PngCodec {
    pub fn new(encoding: &EncodingConfig) -> Self {
        Self {
            compression: match encoding.compression {
                PngCompression::Fast => CompressionType::Fast,
                PngCompression::Default => CompressionType::Default,
                PngCompression::Best => CompressionType::Best,
            },
            filter: match encoding.filter {
                PngFilter::None => FilterType::NoFilter,
                PngFilter::Sub => FilterType::Sub,
                PngFilter::Up => FilterType::Up,
                PngFilter::Avg => FilterType::Avg,
                PngFilter::Paeth => FilterType::Paeth,
                PngFilter::Adaptive => FilterType::Adaptive,
            },
        }
    }
}

impl Default for PngCodec {
    fn default() -> Self {
        Self::new(&EncodingConfig::default())
    }
}

impl ImageCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(PixelBuffer::new(width, height, rgba.into_raw())?)
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        PngEncoder::new_with_quality(&mut out, self.compression, self.filter)
            .write_image(
                buffer.as_raw(),
                buffer.width(),
                buffer.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(out)
    }
}
