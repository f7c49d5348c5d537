//! Shared test utilities: synthetic PNGs and zip archives on disk.

use crate::imaging::{ImageCodec, PixelBuffer, PngCodec};
use std::fs;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

// =========================================================================
// PNG fixtures
// =========================================================================

/// PNG bytes for a `width × height` image filled with one RGBA value.
pub fn solid_png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    PngCodec::default()
        .encode(&PixelBuffer::filled(width, height, rgba))
        .unwrap()
}

/// Write a solid-color PNG, creating parent directories as needed.
pub fn write_solid_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, solid_png_bytes(width, height, rgba)).unwrap();
}

/// Write a file with a `.png` name whose content is a truncated PNG.
pub fn write_corrupt_png(path: &Path) {
    let mut bytes = solid_png_bytes(4, 4, [1, 2, 3, 255]);
    bytes.truncate(20);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

/// Decode a PNG from disk. Panics with the path on failure.
pub fn read_png(path: &Path) -> PixelBuffer {
    let bytes = fs::read(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    PngCodec::default()
        .decode(&bytes)
        .unwrap_or_else(|e| panic!("decode {}: {e}", path.display()))
}

// =========================================================================
// Zip fixtures
// =========================================================================

/// An entry to place in a test archive.
pub enum ZipEntry<'a> {
    Dir(&'a str),
    File(&'a str, &'a [u8]),
}

/// Write a deflate-compressed zip archive with the given entries, in order.
pub fn write_zip(path: &Path, entries: &[ZipEntry<'_>]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for entry in entries {
        match entry {
            ZipEntry::Dir(name) => zip.add_directory(*name, options).unwrap(),
            ZipEntry::File(name, data) => {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
    }
    zip.finish().unwrap();
}
