//! Zip archive extraction.
//!
//! Reproduces the archive's internal tree under an output root: directory
//! entries become directories, file entries are copied byte-for-byte, and any
//! missing parent directories are created along the way. Entries whose path
//! would land outside the output root (absolute paths, `..` components) are
//! refused rather than skipped, since the archive is then not trustworthy.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Archive not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Archive entry escapes the output directory: {0}")]
    UnsafeEntry(String),
}

/// What an extraction produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    pub out_dir: PathBuf,
    pub files: usize,
    pub directories: usize,
}

/// Extract the zip at `archive` into `out_dir`.
///
/// `out_dir` is created if needed; existing files with the same names are
/// overwritten.
pub fn extract_archive(archive: &Path, out_dir: &Path) -> Result<ExtractSummary, ArchiveError> {
    if !archive.is_file() {
        return Err(ArchiveError::Missing(archive.to_path_buf()));
    }
    let mut zip = ZipArchive::new(fs::File::open(archive)?)?;
    fs::create_dir_all(out_dir)?;

    let mut summary = ExtractSummary {
        out_dir: out_dir.to_path_buf(),
        files: 0,
        directories: 0,
    };

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let rel = entry
            .enclosed_name()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| ArchiveError::UnsafeEntry(entry.name().to_string()))?;
        let target = out_dir.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        log::debug!("extracted {}", rel.display());
        summary.files += 1;
    }

    log::info!(
        "Extraction operation complete: {} file(s), {} dir(s) into {}",
        summary.files,
        summary.directories,
        out_dir.display()
    );
    Ok(summary)
}
