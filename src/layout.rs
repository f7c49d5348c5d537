//! Fixed directory roles under a working root.
//!
//! ```text
//! <root>/
//! ├── config.toml     # optional, see config
//! ├── myfile.zip      # input archive
//! ├── unzipped/       # archive contents
//! ├── grayscaled/     # Grayscale output
//! ├── sepia/          # Sepia output
//! ├── slumber/        # Slumber output
//! └── report.json     # last run report
//! ```
//!
//! Only the root is chosen at run time; every name below it is a constant.

use crate::imaging::ColorTransform;
use std::path::{Path, PathBuf};

pub const ARCHIVE_FILE: &str = "myfile.zip";
pub const EXTRACTED_DIR: &str = "unzipped";
pub const GRAYSCALE_DIR: &str = "grayscaled";
pub const SEPIA_DIR: &str = "sepia";
pub const SLUMBER_DIR: &str = "slumber";
pub const REPORT_FILE: &str = "report.json";

/// Output directory name for a transform.
pub fn output_dir_name(transform: ColorTransform) -> &'static str {
    match transform {
        ColorTransform::Grayscale => GRAYSCALE_DIR,
        ColorTransform::Sepia => SEPIA_DIR,
        ColorTransform::Slumber => SLUMBER_DIR,
    }
}

/// Paths of every directory role, resolved against one working root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE)
    }

    pub fn extracted_dir(&self) -> PathBuf {
        self.root.join(EXTRACTED_DIR)
    }

    pub fn output_dir(&self, transform: ColorTransform) -> PathBuf {
        self.root.join(output_dir_name(transform))
    }

    pub fn report(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }
}
