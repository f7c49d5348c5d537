//! # tint-batch
//!
//! Extracts a zip archive of PNG images and writes three color-transformed
//! variants of every image: grayscale, sepia and slumber.
//!
//! # Architecture: Extract, then Three Batches
//!
//! A run works inside a single root directory with fixed names:
//!
//! ```text
//! 1. Extract   myfile.zip  →  unzipped/
//! 2. Batch     unzipped/   →  grayscaled/   (Grayscale)
//! 3. Batch     unzipped/   →  sepia/        (Sepia)
//! 4. Batch     unzipped/   →  slumber/      (Slumber)
//! ```
//!
//! Each batch decodes every top-level `.png` in `unzipped/`, recolors its
//! pixels, and writes a PNG with the same file name to its own directory.
//! A file that fails to decode or write is recorded and skipped; the rest of
//! the batch carries on. The run ends with a JSON report in `report.json`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`extract`] | Zip extraction with path-escape protection |
//! | [`scan`] | Lists the PNG files a batch will process |
//! | [`process`] | Runs one transform over a directory in parallel, isolating per-file failures |
//! | [`pipeline`] | The full run: extract, then every transform, producing a [`pipeline::RunReport`] |
//! | [`imaging`] | Pixel buffers, the color transform math, and the PNG codec seam |
//! | [`layout`] | Fixed file and directory names under the working root |
//! | [`config`] | Optional `config.toml`: worker count and PNG encoder settings |
//! | [`output`] | CLI output formatting for progress and the final summary |
//!
//! # Design Decisions
//!
//! ## Pure-Rust PNG
//!
//! Decoding and encoding go through the `image` crate's PNG support only,
//! behind the [`imaging::ImageCodec`] trait. Any PNG color type and bit depth
//! is normalized to 8-bit RGBA before transforming; output is always 8-bit
//! RGBA. Tests substitute a recording mock codec.
//!
//! ## Disjoint Outputs
//!
//! The three batches share one read-only source directory and write to three
//! different directories, so nothing is shared between workers except the
//! progress channel.

pub mod config;
pub mod extract;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
