//! End-to-end run over a real zip archive.
//!
//! Builds `myfile.zip` in a temp root with the `zip` writer, runs the whole
//! pipeline through the public API, and checks every output directory pixel
//! by pixel.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use tint_batch::config::{BatchConfig, load_config};
use tint_batch::imaging::ColorTransform;
use tint_batch::layout::WorkspaceLayout;
use tint_batch::pipeline::{self, PipelineError};
use tint_batch::process::FailureKind;
use zip::write::SimpleFileOptions;

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgba8,
        )
        .unwrap();
    out
}

fn write_archive(path: &Path, files: &[(&str, Vec<u8>)]) {
    let mut zip = zip::ZipWriter::new(fs::File::create(path).unwrap());
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

fn read_rgba(path: &Path) -> RgbaImage {
    image::open(path)
        .unwrap_or_else(|e| panic!("open {}: {e}", path.display()))
        .into_rgba8()
}

#[test]
fn full_run_writes_three_variants_and_isolates_corrupt_file() {
    let tmp = TempDir::new().unwrap();
    let layout = WorkspaceLayout::new(tmp.path());

    let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
    let mixed = RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([0, 200, 0, 10])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    write_archive(
        &layout.archive(),
        &[
            ("red.png", png_bytes(&red)),
            ("mixed.png", png_bytes(&mixed)),
            ("corrupt.png", b"\x89PNG\r\n\x1a\n truncated".to_vec()),
            ("notes/readme.txt", b"not an image".to_vec()),
        ],
    );

    let report = pipeline::run(&layout, &BatchConfig::default(), None).unwrap();

    // Extraction is byte-for-byte and keeps the tree
    let extracted = report.extracted.as_ref().unwrap();
    assert_eq!(extracted.files, 4);
    assert_eq!(
        fs::read(layout.extracted_dir().join("red.png")).unwrap(),
        png_bytes(&red)
    );
    assert!(layout.extracted_dir().join("notes/readme.txt").is_file());

    // Every batch wrote the two good images and reported the corrupt one
    assert_eq!(report.batches.len(), 3);
    for (batch, transform) in report.batches.iter().zip(ColorTransform::ALL) {
        assert_eq!(batch.transform, transform);
        assert_eq!(batch.processed, vec!["mixed.png", "red.png"]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].file_name, "corrupt.png");
        assert_eq!(batch.failures[0].kind, FailureKind::Decode);
        assert!(!layout.output_dir(transform).join("corrupt.png").exists());
        assert!(!layout.output_dir(transform).join("notes").exists());
    }
    assert!(!report.is_clean());

    let gray_dir = tmp.path().join("grayscaled");
    let sepia_dir = tmp.path().join("sepia");
    let slumber_dir = tmp.path().join("slumber");

    let gray_red = read_rgba(&gray_dir.join("red.png"));
    assert_eq!(gray_red.dimensions(), (2, 2));
    assert!(gray_red.pixels().all(|p| *p == Rgba([54, 54, 54, 255])));

    let sepia_red = read_rgba(&sepia_dir.join("red.png"));
    assert!(sepia_red.pixels().all(|p| *p == Rgba([116, 96, 76, 255])));

    let slumber_red = read_rgba(&slumber_dir.join("red.png"));
    assert!(slumber_red.pixels().all(|p| *p == Rgba([209, 20, 17, 255])));

    // Alpha passes through untouched; white stays white where capped
    let gray_mixed = read_rgba(&gray_dir.join("mixed.png"));
    assert_eq!(*gray_mixed.get_pixel(0, 0), Rgba([143, 143, 143, 10]));
    assert_eq!(*gray_mixed.get_pixel(1, 0), Rgba([255, 255, 255, 255]));

    let sepia_mixed = read_rgba(&sepia_dir.join("mixed.png"));
    assert_eq!(*sepia_mixed.get_pixel(0, 0), Rgba([157, 137, 117, 10]));
    assert_eq!(*sepia_mixed.get_pixel(1, 0), Rgba([255, 255, 255, 255]));

    let slumber_mixed = read_rgba(&slumber_dir.join("mixed.png"));
    assert_eq!(*slumber_mixed.get_pixel(0, 0), Rgba([35, 181, 124, 10]));
    assert_eq!(*slumber_mixed.get_pixel(1, 0), Rgba([255, 255, 255, 255]));

    report.write_json(&layout.report()).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(json["batches"][2]["transform"], "slumber");
    assert_eq!(json["batches"][2]["processed"][1], "red.png");
    assert_eq!(json["batches"][0]["failures"][0]["file_name"], "corrupt.png");
}

#[test]
fn rerun_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let layout = WorkspaceLayout::new(tmp.path());
    let img = RgbaImage::from_fn(3, 3, |x, y| Rgba([x as u8 * 80, y as u8 * 80, 30, 255]));
    write_archive(&layout.archive(), &[("a.png", png_bytes(&img))]);

    pipeline::run(&layout, &BatchConfig::default(), None).unwrap();
    let first = fs::read(layout.output_dir(ColorTransform::Sepia).join("a.png")).unwrap();

    let report = pipeline::run(&layout, &BatchConfig::default(), None).unwrap();
    assert!(report.is_clean());
    let second = fs::read(layout.output_dir(ColorTransform::Sepia).join("a.png")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_archive_fails_before_any_output() {
    let tmp = TempDir::new().unwrap();
    let layout = WorkspaceLayout::new(tmp.path());

    let err = pipeline::run(&layout, &BatchConfig::default(), None).unwrap_err();
    assert!(matches!(err, PipelineError::Archive(_)));
    for transform in ColorTransform::ALL {
        assert!(!layout.output_dir(transform).exists());
    }
}

#[test]
fn config_file_tunes_encoding_without_changing_pixels() {
    let tmp = TempDir::new().unwrap();
    let layout = WorkspaceLayout::new(tmp.path());
    fs::write(
        tmp.path().join("config.toml"),
        "[processing]\nmax_processes = 1\n\n[encoding]\ncompression = \"best\"\nfilter = \"none\"\n",
    )
    .unwrap();
    let img = RgbaImage::from_pixel(4, 4, Rgba([12, 34, 56, 200]));
    write_archive(&layout.archive(), &[("px.png", png_bytes(&img))]);

    let config = load_config(tmp.path()).unwrap();
    assert_eq!(config.processing.max_processes, Some(1));

    pipeline::run(&layout, &config, None).unwrap();
    let gray = read_rgba(&layout.output_dir(ColorTransform::Grayscale).join("px.png"));
    // 0.2126*12 + 0.7152*34 + 0.0722*56 = 30.9824
    assert!(gray.pixels().all(|p| *p == Rgba([31, 31, 31, 200])));
}
