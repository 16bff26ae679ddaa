//! Replaying the classifier across records.

use std::fmt;

use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::error::Result;
use crate::record::{FeatureVector, PatientRecord};
use crate::report::ReportWriter;

/// The verdict on a single record. Formats as one report line (without the
/// line terminator); the case description is only shown for mistakes.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub features: FeatureVector,
    pub predicted: String,
    pub expected: String,
    pub description: String,
}

impl PredictionResult {
    pub fn new(record: &PatientRecord, predicted: String) -> Self {
        PredictionResult {
            features: record.features(),
            predicted,
            expected: record.expected_label(),
            description: record.case_description(),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.predicted == self.expected
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Prediction: {} - Expected: {}",
            self.features, self.predicted, self.expected
        )?;
        if !self.is_correct() {
            write!(f, " - {}", self.description)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationSummary {
    pub mismatches: usize,
    pub total: usize,
}

/// Predicts every record in order, appending one report line each, and counts
/// the mismatches. Lines written before a failure stay in the report.
pub fn evaluate_records<C>(
    records: &[PatientRecord],
    classifier: &C,
    report: &ReportWriter<'_>,
) -> Result<EvaluationSummary>
where
    C: Classifier + ?Sized,
{
    let predict = classifier.predictor()?;
    let mut summary = EvaluationSummary::default();

    for record in records {
        let predicted = predict(&record.features())?;
        let result = PredictionResult::new(record, predicted.to_string());

        if !result.is_correct() {
            summary.mismatches += 1;
        }
        summary.total += 1;

        report.append_prediction(&result)?;
    }

    debug!(
        "Replayed {} records, {} mismatches",
        summary.total, summary.mismatches
    );
    Ok(summary)
}

/// Accuracy on rows the classifier never saw during fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldOutScore {
    pub correct: usize,
    pub total: usize,
}

impl HeldOutScore {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

pub fn evaluate_held_out<C>(classifier: &C, records: &[PatientRecord]) -> Result<HeldOutScore>
where
    C: Classifier + ?Sized,
{
    let predict = classifier.predictor()?;
    let mut correct = 0;
    for record in records {
        if predict(&record.features())? == record.label() {
            correct += 1;
        }
    }

    let score = HeldOutScore {
        correct,
        total: records.len(),
    };
    info!(
        "Held-out accuracy: {:.2}% ({} of {})",
        score.accuracy() * 100.0,
        score.correct,
        score.total
    );
    Ok(score)
}
