//! CLI output formatting for every stage of a run.
//!
//! # Output Format
//!
//! ## Extract
//!
//! ```text
//! Extracted 3 files, 1 directory → unzipped/
//! ```
//!
//! ## Batch progress
//!
//! ```text
//! grayscale (3 images)
//!     001 a.png
//!     002 b.png: FAILED Not a valid PNG: ...
//!     003 c.png
//! ```
//!
//! Files finish in parallel, so progress lines are numbered in completion
//! order, not name order.
//!
//! ## Summary
//!
//! ```text
//! grayscale → grayscaled/: 2 written, 1 failed
//!     b.png (decode): Not a valid PNG: ...
//! sepia → sepia/: 2 written, 1 failed
//!     b.png (decode): Not a valid PNG: ...
//!
//! Wrote 4 images, 2 failures
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::extract::ExtractSummary;
use crate::pipeline::RunReport;
use crate::process::{BatchEvent, BatchOutcome};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Last path component with a trailing slash, for directory display.
fn dir_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("{}/", name)
}

// ============================================================================
// Extract
// ============================================================================

pub fn format_extract_summary(summary: &ExtractSummary) -> Vec<String> {
    vec![format!(
        "Extracted {}, {} \u{2192} {}",
        plural(summary.files, "file", "files"),
        plural(summary.directories, "directory", "directories"),
        dir_label(&summary.out_dir)
    )]
}

pub fn print_extract_summary(summary: &ExtractSummary) {
    for line in format_extract_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch progress
// ============================================================================

/// Format one progress event.
///
/// `position` is the 1-based count of files finished so far in the current
/// batch; the caller tracks it since events carry no index.
pub fn format_batch_event(event: &BatchEvent, position: usize) -> Vec<String> {
    match event {
        BatchEvent::BatchStarted {
            transform,
            file_count,
        } => vec![format!(
            "{} ({})",
            transform,
            plural(*file_count, "image", "images")
        )],
        BatchEvent::FileProcessed { file_name, .. } => {
            vec![format!("    {} {}", format_index(position), file_name)]
        }
        BatchEvent::FileFailed {
            file_name, error, ..
        } => vec![format!(
            "    {} {}: FAILED {}",
            format_index(position),
            file_name,
            error
        )],
    }
}

// ============================================================================
// Summary
// ============================================================================

fn format_batch_outcome(outcome: &BatchOutcome) -> Vec<String> {
    let mut lines = vec![format!(
        "{} \u{2192} {}: {} written, {} failed",
        outcome.transform,
        dir_label(&outcome.dest_dir),
        outcome.processed_count(),
        outcome.failures.len()
    )];
    for failure in &outcome.failures {
        lines.push(format!(
            "    {} ({}): {}",
            failure.file_name,
            failure.kind.as_str(),
            failure.message
        ));
    }
    lines
}

/// Format the end-of-run summary: one block per batch plus a total line.
pub fn format_run_report(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    for outcome in &report.batches {
        lines.extend(format_batch_outcome(outcome));
    }
    lines.push(String::new());
    lines.push(format!(
        "Wrote {}, {}",
        plural(report.processed_count(), "image", "images"),
        plural(report.failure_count(), "failure", "failures")
    ));
    lines
}

pub fn print_run_report(report: &RunReport) {
    for line in format_run_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ColorTransform;
    use crate::process::{FailureKind, FileFailure};
    use std::path::PathBuf;

    fn outcome(transform: ColorTransform, dir: &str, ok: &[&str], bad: &[&str]) -> BatchOutcome {
        BatchOutcome {
            transform,
            dest_dir: PathBuf::from("/work").join(dir),
            processed: ok.iter().map(|s| s.to_string()).collect(),
            failures: bad
                .iter()
                .map(|name| FileFailure {
                    file_name: name.to_string(),
                    kind: FailureKind::Decode,
                    message: "Not a valid PNG: bad signature".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "file", "files"), "1 file");
        assert_eq!(plural(0, "file", "files"), "0 files");
        assert_eq!(plural(2, "directory", "directories"), "2 directories");
    }

    #[test]
    fn dir_label_uses_last_component() {
        assert_eq!(dir_label(Path::new("/a/b/sepia")), "sepia/");
        assert_eq!(dir_label(Path::new("grayscaled")), "grayscaled/");
    }

    #[test]
    fn extract_summary_line() {
        let summary = ExtractSummary {
            out_dir: PathBuf::from("/work/unzipped"),
            files: 3,
            directories: 1,
        };
        assert_eq!(
            format_extract_summary(&summary),
            vec!["Extracted 3 files, 1 directory \u{2192} unzipped/"]
        );
    }

    #[test]
    fn batch_started_event() {
        let event = BatchEvent::BatchStarted {
            transform: ColorTransform::Sepia,
            file_count: 1,
        };
        assert_eq!(format_batch_event(&event, 0), vec!["sepia (1 image)"]);
    }

    #[test]
    fn file_events_are_indented_and_numbered() {
        let ok = BatchEvent::FileProcessed {
            transform: ColorTransform::Grayscale,
            file_name: "a.png".to_string(),
        };
        let bad = BatchEvent::FileFailed {
            transform: ColorTransform::Grayscale,
            file_name: "b.png".to_string(),
            error: "Not a valid PNG: eof".to_string(),
        };
        assert_eq!(format_batch_event(&ok, 1), vec!["    001 a.png"]);
        assert_eq!(
            format_batch_event(&bad, 2),
            vec!["    002 b.png: FAILED Not a valid PNG: eof"]
        );
    }

    #[test]
    fn run_report_lists_batches_and_failures() {
        let report = RunReport {
            extracted: None,
            batches: vec![
                outcome(ColorTransform::Grayscale, "grayscaled", &["a.png"], &["b.png"]),
                outcome(ColorTransform::Sepia, "sepia", &["a.png"], &[]),
            ],
        };
        let lines = format_run_report(&report);
        assert_eq!(
            lines,
            vec![
                "grayscale \u{2192} grayscaled/: 1 written, 1 failed",
                "    b.png (decode): Not a valid PNG: bad signature",
                "sepia \u{2192} sepia/: 1 written, 0 failed",
                "",
                "Wrote 2 images, 1 failure",
            ]
        );
    }

    #[test]
    fn empty_run_report() {
        let report = RunReport {
            extracted: None,
            batches: vec![],
        };
        assert_eq!(format_run_report(&report), vec!["", "Wrote 0 images, 0 failures"]);
    }
}
