//! Append-only text report of a replay run.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::{Error, Result};
use crate::evaluation::{EvaluationSummary, PredictionResult};

/// Where a single run writes its report.
///
/// The timestamp is taken once per run, so every line of the run lands in the
/// same `results{label}Set{stamp}.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    stamp: u64,
    report_path: PathBuf,
}

impl RunContext {
    pub fn new(output_dir: &Path, size_label: &str, stamp: u64) -> Self {
        RunContext {
            stamp,
            report_path: output_dir.join(report_file_name(size_label, stamp)),
        }
    }

    /// Starts a run stamped with the current unix time in seconds.
    pub fn start(output_dir: &Path, size_label: &str) -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        RunContext::new(output_dir, size_label, stamp)
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }
}

pub fn report_file_name(size_label: &str, stamp: u64) -> String {
    format!("results{size_label}Set{stamp}.txt")
}

/// Writes report lines for one run. Every call opens the file in append mode
/// and closes it again before returning.
#[derive(Debug, Clone)]
pub struct ReportWriter<'a> {
    ctx: &'a RunContext,
}

impl<'a> ReportWriter<'a> {
    pub fn new(ctx: &'a RunContext) -> Self {
        ReportWriter { ctx }
    }

    pub fn path(&self) -> &Path {
        self.ctx.report_path()
    }

    pub fn append_prediction(&self, result: &PredictionResult) -> Result<()> {
        self.append(&format!("{result}\n"))
    }

    /// Final line of the report. Written without a line terminator.
    pub fn append_summary(&self, summary: &EvaluationSummary) -> Result<()> {
        debug!("Closing report {:?}", self.path());
        self.append(&format!(
            "Incorrect predictions: {} out of {}",
            summary.mismatches, summary.total
        ))
    }

    fn append(&self, text: &str) -> Result<()> {
        let report_err = |source| Error::Report {
            path: self.path().to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())
            .map_err(report_err)?;
        file.write_all(text.as_bytes()).map_err(report_err)
    }
}
