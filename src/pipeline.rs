//! Full run: extract the archive, then apply every transform.
//!
//! ```text
//! myfile.zip ──extract──▶ unzipped/ ──grayscale──▶ grayscaled/
//!                                   ├─sepia──────▶ sepia/
//!                                   └─slumber────▶ slumber/
//! ```
//!
//! The three batches read the same source directory and write disjoint
//! destinations, so their order does not affect the result. They run one
//! after another; each batch is parallel internally.

use crate::config::BatchConfig;
use crate::extract::{ArchiveError, ExtractSummary, extract_archive};
use crate::imaging::ColorTransform;
use crate::layout::WorkspaceLayout;
use crate::process::{BatchError, BatchEvent, BatchOutcome, run_batch};
use serde::Serialize;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a run did, in the order it happened.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractSummary>,
    pub batches: Vec<BatchOutcome>,
}

impl RunReport {
    /// True when no batch recorded a per-file failure.
    pub fn is_clean(&self) -> bool {
        self.batches.iter().all(BatchOutcome::is_clean)
    }

    pub fn processed_count(&self) -> usize {
        self.batches.iter().map(BatchOutcome::processed_count).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.batches.iter().map(|b| b.failures.len()).sum()
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Extract `layout.archive()` into `layout.extracted_dir()`.
pub fn extract(layout: &WorkspaceLayout) -> Result<ExtractSummary, PipelineError> {
    log::info!("Extracting {}", layout.archive().display());
    Ok(extract_archive(&layout.archive(), &layout.extracted_dir())?)
}

/// Run the given transforms over the already-extracted directory.
pub fn run_filters(
    layout: &WorkspaceLayout,
    transforms: &[ColorTransform],
    config: &BatchConfig,
    events: Option<Sender<BatchEvent>>,
) -> Result<Vec<BatchOutcome>, PipelineError> {
    let source = layout.extracted_dir();
    let mut outcomes = Vec::with_capacity(transforms.len());
    for &transform in transforms {
        let outcome = run_batch(
            transform,
            &source,
            &layout.output_dir(transform),
            &config.encoding,
            events.clone(),
        )?;
        log::info!(
            "{transform}: {} written, {} failed",
            outcome.processed_count(),
            outcome.failures.len()
        );
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Extract, then apply all three transforms.
///
/// Archive and directory failures abort the run. Per-file failures are
/// carried in the returned report.
pub fn run(
    layout: &WorkspaceLayout,
    config: &BatchConfig,
    events: Option<Sender<BatchEvent>>,
) -> Result<RunReport, PipelineError> {
    run_with(layout, config, events, |_| {})
}

/// [`run`], calling `on_extracted` between extraction and the first batch.
pub fn run_with(
    layout: &WorkspaceLayout,
    config: &BatchConfig,
    events: Option<Sender<BatchEvent>>,
    on_extracted: impl FnOnce(&ExtractSummary),
) -> Result<RunReport, PipelineError> {
    let extracted = extract(layout)?;
    on_extracted(&extracted);
    let batches = run_filters(layout, &ColorTransform::ALL, config, events)?;
    Ok(RunReport {
        extracted: Some(extracted),
        batches,
    })
}
