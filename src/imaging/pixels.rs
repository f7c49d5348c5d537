//! Addressable RGBA8 pixel grid.
//!
//! Pixels are stored row-major, four bytes each (red, green, blue, alpha).
//! The byte offset of pixel `(x, y)` is `(width * y + x) * 4`.

use super::transform::TransformError;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// A decoded image as a flat RGBA8 byte sequence with explicit dimensions.
///
/// The only constructor checks `data.len() == width * height * 4`, so every
/// `PixelBuffer` in the program is well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Expected byte length for a `width × height` RGBA8 grid, or `None` on overflow.
pub fn expected_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, TransformError> {
        if expected_len(width, height) != Some(data.len()) {
            return Err(TransformError::InvalidBuffer {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let data = rgba.iter().copied().cycle().take(count * CHANNELS).collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of the red channel of pixel `(x, y)`.
    ///
    /// Panics if the coordinate lies outside the grid.
    pub fn pixel_index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        (self.width as usize * y as usize + x as usize) * CHANNELS
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.pixel_index(x, y);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.pixel_index(x, y);
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgba);
    }
}
