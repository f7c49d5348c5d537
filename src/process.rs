//! Batch runner: one color transform over every PNG in a directory.
//!
//! For each eligible file the pipeline is
//!
//! ```text
//! read bytes → decode (RGBA8) → transform → encode (PNG) → write <dest>/<same name>
//! ```
//!
//! ## Failure isolation
//!
//! Only two failures are fatal to a batch: the destination directory cannot be
//! created, or the source directory cannot be listed. Everything that goes
//! wrong with an individual file (unreadable, not a PNG, encode or write
//! failure) is recorded in [`BatchOutcome::failures`] and the remaining files
//! carry on. A failed file's output from a previous run is deleted, so after a
//! batch the destination holds exactly the files listed in
//! [`BatchOutcome::processed`] (plus anything unrelated already there).
//!
//! Output names are the source names byte for byte, including names that are
//! not valid UTF-8. Reports and events carry a lossy display copy.
//!
//! ## Parallel Processing
//!
//! Files are processed in parallel using [rayon](https://docs.rs/rayon). The
//! destination directory is created once before any worker starts, and
//! [`run_batch`] only returns after every file has finished, so the outcome
//! always accounts for every eligible file.

use crate::config::EncodingConfig;
use crate::imaging::{
    CodecError, ColorTransform, ImageCodec, PngCodec, TransformError, apply_transform,
};
use crate::scan::{ImageFile, list_images};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Failures that stop a whole batch before any file is touched.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read source directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of a single file's pipeline.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Not a valid PNG: {0}")]
    Decode(String),
    #[error(transparent)]
    InvalidBuffer(#[from] TransformError),
    #[error("Encode failed: {0}")]
    Encode(String),
}

impl From<CodecError> for FileError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode(msg) => FileError::Decode(msg),
            CodecError::Encode(msg) => FileError::Encode(msg),
            CodecError::InvalidBuffer(e) => FileError::InvalidBuffer(e),
        }
    }
}

impl FileError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FileError::Io(_) => FailureKind::Io,
            FileError::Decode(_) => FailureKind::Decode,
            FileError::InvalidBuffer(_) => FailureKind::InvalidBuffer,
            FileError::Encode(_) => FailureKind::Encode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Io,
    Decode,
    InvalidBuffer,
    Encode,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Io => "io",
            FailureKind::Decode => "decode",
            FailureKind::InvalidBuffer => "invalid_buffer",
            FailureKind::Encode => "encode",
        }
    }
}

/// A file that could not be processed, kept for the run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Result of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub transform: ColorTransform,
    pub dest_dir: PathBuf,
    /// Names of the files written, in name order.
    pub processed: Vec<String>,
    /// Files that failed, in name order.
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    BatchStarted {
        transform: ColorTransform,
        file_count: usize,
    },
    FileProcessed {
        transform: ColorTransform,
        file_name: String,
    },
    FileFailed {
        transform: ColorTransform,
        file_name: String,
        error: String,
    },
}

/// Run `transform` over every PNG in `source_dir` with the PNG codec.
pub fn run_batch(
    transform: ColorTransform,
    source_dir: &Path,
    dest_dir: &Path,
    encoding: &EncodingConfig,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchOutcome, BatchError> {
    let codec = PngCodec::new(encoding);
    run_batch_with_codec(&codec, transform, source_dir, dest_dir, events)
}

/// Run a batch with a specific codec (allows testing with mock).
pub fn run_batch_with_codec(
    codec: &impl ImageCodec,
    transform: ColorTransform,
    source_dir: &Path,
    dest_dir: &Path,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchOutcome, BatchError> {
    fs::create_dir_all(dest_dir).map_err(|source| BatchError::CreateDir {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let images = list_images(source_dir).map_err(|source| BatchError::ReadDir {
        path: source_dir.to_path_buf(),
        source,
    })?;

    log::info!(
        "{transform}: {} image(s) from {} -> {}",
        images.len(),
        source_dir.display(),
        dest_dir.display()
    );
    if let Some(tx) = &events {
        tx.send(BatchEvent::BatchStarted {
            transform,
            file_count: images.len(),
        })
        .ok();
    }

    let results: Vec<(String, Result<(), FileError>)> = images
        .par_iter()
        .map_with(events.clone(), |tx, image| {
            let result = process_file(codec, transform, image, dest_dir);
            let event = match &result {
                Ok(()) => {
                    log::debug!("{transform}: wrote {}", image.name);
                    BatchEvent::FileProcessed {
                        transform,
                        file_name: image.name.clone(),
                    }
                }
                Err(e) => {
                    log::warn!("{transform}: {} failed: {e}", image.name);
                    BatchEvent::FileFailed {
                        transform,
                        file_name: image.name.clone(),
                        error: e.to_string(),
                    }
                }
            };
            if let Some(tx) = tx {
                tx.send(event).ok();
            }
            (image.name.clone(), result)
        })
        .collect();

    let mut processed = Vec::new();
    let mut failures = Vec::new();
    for (file_name, result) in results {
        match result {
            Ok(()) => processed.push(file_name),
            Err(e) => failures.push(FileFailure {
                file_name,
                kind: e.kind(),
                message: e.to_string(),
            }),
        }
    }

    Ok(BatchOutcome {
        transform,
        dest_dir: dest_dir.to_path_buf(),
        processed,
        failures,
    })
}

/// Decode, transform, encode and write a single file.
///
/// On failure any output left by an earlier run under the same name is
/// removed, so the destination only holds files this batch wrote.
fn process_file(
    codec: &impl ImageCodec,
    transform: ColorTransform,
    image: &ImageFile,
    dest_dir: &Path,
) -> Result<(), FileError> {
    let dest = dest_dir.join(&image.file_name);
    let result = transform_file(codec, transform, &image.path, &dest);
    if result.is_err() {
        remove_stale_output(&dest);
    }
    result
}

fn transform_file(
    codec: &impl ImageCodec,
    transform: ColorTransform,
    source: &Path,
    dest: &Path,
) -> Result<(), FileError> {
    let bytes = fs::read(source)?;
    let mut buffer = codec.decode(&bytes)?;
    apply_transform(transform, &mut buffer);
    let encoded = codec.encode(&buffer)?;
    fs::write(dest, encoded)?;
    Ok(())
}

fn remove_stale_output(dest: &Path) {
    match fs::remove_file(dest) {
        Ok(()) => log::debug!("removed stale {}", dest.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("could not remove stale {}: {e}", dest.display()),
    }
}
