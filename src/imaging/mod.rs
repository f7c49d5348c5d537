//! Pixel-level image work.
//!
//! | Piece | Role |
//! |---|---|
//! | **Pixels** | [`PixelBuffer`]: validated RGBA8 grid with row-major indexing |
//! | **Transforms** | [`ColorTransform`]: Grayscale, Sepia, Slumber |
//! | **Codec** | [`ImageCodec`] trait + [`PngCodec`] (`image` crate, PNG only) |
//!
//! Transforms are pure functions over a buffer: no I/O, no shared state, so a
//! batch can run them on any number of files in parallel.

pub mod codec;
pub mod pixels;
pub mod transform;

pub use codec::{CodecError, ImageCodec, PngCodec};
pub use pixels::PixelBuffer;
pub use transform::{ColorTransform, TransformError, apply_transform, transform_raw};
