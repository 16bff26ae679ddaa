//! # sepsis-survival 🏥
//!
//! Predict in-hospital survival of sepsis patients from age, sex and septic
//! episode number alone, using a k-nearest-neighbour classifier.
//!
//! Based on the study by Chicco & Jurman, *Survival prediction of patients with
//! sepsis from age, sex, and septic episode number alone* (Sci Rep 10, 17156,
//! 2020), with the data sets published in the UCI Machine Learning repository.
//!
//! ## Features
//! - CSV loading of the SMALL / MEDIUM / LARGE study files
//! - Seeded, reproducible train/test split
//! - Nearest-neighbour classifier on top of [`linfa-nn`](https://crates.io/crates/linfa-nn)
//! - Replay of every patient record with a per-record text report
//! - Held-out accuracy on the test split
//!
//! ## Example
//! ```no_run
//! use std::path::Path;
//! use sepsis_survival::{load_csv, run_study, KnnClassifier, RunConfig, RunContext};
//!
//! let config = RunConfig::default();
//! let records = load_csv(Path::new("SMALL_sepsis_survival_study.csv"))?;
//! let ctx = RunContext::start(&config.output_dir, "Small");
//! let mut knn = KnnClassifier::new(config.neighbours);
//! let outcome = run_study(&records, &mut knn, &config, &ctx)?;
//! println!("Incorrect predictions detected: {}", outcome.summary.mismatches);
//! # Ok::<(), sepsis_survival::Error>(())
//! ```

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod record;
pub mod report;
pub mod selector;

pub use classifier::{Classifier, KnnClassifier, Predictor};
pub use config::{DatasetSource, RunConfig};
pub use dataset::{DatasetSplit, SplitProjections, load_csv, train_test_split};
pub use error::{Error, Result};
pub use evaluation::{EvaluationSummary, HeldOutScore, PredictionResult, evaluate_held_out, evaluate_records};
pub use record::{FeatureVector, PatientRecord};
pub use report::{ReportWriter, RunContext};
pub use selector::{DatasetChoice, select_dataset};

use tracing::info;

/// What a full study run produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudyOutcome {
    /// Replay over every record, including the ones used for fitting.
    pub summary: EvaluationSummary,
    pub held_out: HeldOutScore,
}

/// Splits `records`, fits `classifier` on the training half, replays the
/// classifier over *all* records into the run's report and closes the report
/// with its summary line.
pub fn run_study<C>(
    records: &[PatientRecord],
    classifier: &mut C,
    config: &RunConfig,
    ctx: &RunContext,
) -> Result<StudyOutcome>
where
    C: Classifier + ?Sized,
{
    let split = train_test_split(records, config.test_ratio, config.seed)?;
    let projections = split.projections();

    info!(
        "🧠 Fitting classifier on {} of {} records",
        split.train.len(),
        records.len()
    );
    classifier.fit(projections.train_features.view(), projections.train_labels.view())?;

    let report = ReportWriter::new(ctx);
    info!("📝 Writing report to {:?}", report.path());
    let summary = evaluate_records(records, &*classifier, &report)?;
    report.append_summary(&summary)?;

    let held_out = evaluate_held_out(&*classifier, &split.test)?;

    Ok(StudyOutcome { summary, held_out })
}
