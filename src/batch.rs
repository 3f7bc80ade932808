//! Batch driver: selection, scheduling, and per-file failure isolation.
//!
//! Every selected archive is converted independently — each conversion owns
//! its scratch workspace and shares no mutable state with its siblings, so
//! the batch can run sequentially or across a bounded worker pool. A failed
//! file is recorded and the batch continues; the summary tallies both sides.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::converter::Converter;
use crate::error::{Error, Result};
use crate::selector;

/// Configuration for a batch run, built declaratively via
/// [`BatchConfig::builder`].
///
/// ```rust,no_run
/// # use koxcbz::batch::BatchConfig;
/// # fn main() -> koxcbz::error::Result<()> {
/// let config = BatchConfig::builder()
///     .pattern("book??.epub")
///     .jobs(-1) // all available cores
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
pub struct BatchConfig {
    /// Source path pattern; supports `?` and `*` wildcards.
    pub pattern: String,

    /// Destination directory for generated archives. `None` places each
    /// output next to its source.
    #[builder(default)]
    pub destination: Option<PathBuf>,

    /// Worker count. `1` (the default) runs strictly sequentially, `-1`
    /// uses all available cores, anything else below 1 clamps to 1.
    #[builder(default = "1")]
    pub jobs: i32,
}

impl BatchConfig {
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::default()
    }

    /// The concrete worker count after resolving the `-1` sentinel and
    /// clamping.
    pub fn effective_jobs(&self) -> usize {
        match self.jobs {
            -1 => num_cpus::get().max(1),
            n if n < 1 => 1,
            n => n as usize,
        }
    }
}

impl BatchConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(pattern) = &self.pattern {
            if pattern.trim_matches('"').is_empty() {
                return Err("Input pattern must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Reporting collaborator for batch progress.
///
/// The core pipeline never touches console state; the batch driver calls
/// into this interface and the binary decides how to render it.
pub trait ProgressReporter: Sync {
    /// Called once after selection, before any conversion starts.
    fn batch_started(&self, total: usize) {
        let _ = total;
    }
    fn conversion_started(&self, source: &Path) {
        let _ = source;
    }
    fn conversion_finished(&self, report: &ConversionReport) {
        let _ = report;
    }
}

/// A reporter that ignores all events, for tests and embedding.
pub struct NullReporter;

impl ProgressReporter for NullReporter {}

/// The per-file outcome of a batch run.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub source: PathBuf,
    /// Generated archive path, or the rendered conversion error.
    pub outcome: std::result::Result<PathBuf, String>,
}

impl ConversionReport {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Aggregated result of a batch run, reports sorted by input file name.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub reports: Vec<ConversionReport>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Converts one file, absorbing its failure into the report.
fn convert_file(
    source: &Path,
    destination: Option<&Path>,
    reporter: &dyn ProgressReporter,
) -> ConversionReport {
    reporter.conversion_started(source);

    let outcome = Converter::new(source)
        .and_then(|converter| converter.convert(destination))
        .map_err(|e| {
            log::error!("Conversion failed for {:?}: {}", source.file_name(), e);
            e.to_string()
        });

    let report = ConversionReport {
        source: source.to_path_buf(),
        outcome,
    };
    reporter.conversion_finished(&report);
    report
}

/// Expands the configured pattern and converts every selected archive,
/// sequentially or on a worker pool of `effective_jobs` threads.
///
/// Conversions may complete in any order; the summary is re-sorted by input
/// name so reporting stays deterministic. A failure in one file never
/// aborts its siblings.
pub fn run_batch(config: &BatchConfig, reporter: &dyn ProgressReporter) -> Result<BatchSummary> {
    let files = selector::select_files(&config.pattern);
    let destination = config.destination.as_deref();
    let jobs = config.effective_jobs();

    reporter.batch_started(files.len());

    let mut reports: Vec<ConversionReport> = if jobs <= 1 || files.len() <= 1 {
        files
            .iter()
            .map(|file| convert_file(file, destination, reporter))
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.min(files.len()))
            .build()
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        pool.install(|| {
            files
                .par_iter()
                .map(|file| convert_file(file, destination, reporter))
                .collect()
        })
    };

    reports.sort_by(|a, b| a.source.file_name().cmp(&b.source.file_name()));

    let succeeded = reports.iter().filter(|r| r.succeeded()).count();
    let failed = reports.len() - succeeded;

    Ok(BatchSummary {
        reports,
        succeeded,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_a_pattern() {
        let result = BatchConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_empty_pattern() {
        let result = BatchConfig::builder().pattern("").build();
        assert!(result.is_err());
    }

    #[test]
    fn jobs_sentinel_and_clamping() {
        let config = BatchConfig::builder().pattern("x.epub").build().unwrap();
        assert_eq!(config.effective_jobs(), 1);

        let config = BatchConfig::builder()
            .pattern("x.epub")
            .jobs(-1)
            .build()
            .unwrap();
        assert!(config.effective_jobs() >= 1);

        let config = BatchConfig::builder()
            .pattern("x.epub")
            .jobs(-5)
            .build()
            .unwrap();
        assert_eq!(config.effective_jobs(), 1);

        let config = BatchConfig::builder()
            .pattern("x.epub")
            .jobs(4)
            .build()
            .unwrap();
        assert_eq!(config.effective_jobs(), 4);
    }

    #[test]
    fn empty_selection_yields_empty_summary() {
        let config = BatchConfig::builder()
            .pattern("definitely-missing.epub")
            .build()
            .unwrap();
        let summary = run_batch(&config, &NullReporter).unwrap();
        assert!(summary.reports.is_empty());
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
    }
}
