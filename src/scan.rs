//! Discovery of eligible images in a source directory.
//!
//! Only the top level of the directory is listed. An entry is eligible when it
//! is a regular file whose extension is `png`, compared case-insensitively
//! (`a.png`, `b.PNG` and `c.Png` all qualify). Everything else is skipped
//! without error.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of the single supported raster format.
pub const PNG_EXTENSION: &str = "png";

/// One image discovered in a source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name exactly as on disk, reused unchanged as the output name.
    pub file_name: OsString,
    /// Display form of `file_name` for reports and logs. Lossy when the
    /// name is not valid UTF-8.
    pub name: String,
    /// Full path to the source file.
    pub path: PathBuf,
}

/// Whether `path` carries the PNG extension (case-insensitive).
pub fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PNG_EXTENSION))
}

/// List the PNG files directly inside `dir`, sorted by name.
///
/// An error reading the directory or any of its entries is returned, not
/// skipped.
pub fn list_images(dir: &Path) -> io::Result<Vec<ImageFile>> {
    collect_images(fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path())))
}

fn collect_images(
    paths: impl Iterator<Item = io::Result<PathBuf>>,
) -> io::Result<Vec<ImageFile>> {
    let mut images = Vec::new();
    for path in paths {
        let path = path?;
        if !path.is_file() || !has_png_extension(&path) {
            continue;
        }
        let Some(file_name) = path.file_name().map(|n| n.to_os_string()) else {
            continue;
        };
        images.push(ImageFile {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            path,
        });
    }

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(images)
}
