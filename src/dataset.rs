//! Loading the study CSV and splitting it into train/test subsets.

use std::path::Path;

use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{FeatureVector, PatientRecord};

/// Column order every study file must follow.
pub const COLUMNS: [&str; 4] = [
    "age_years",
    "sex_0male_1female",
    "episode_number",
    "hospital_outcome_1alive_0dead",
];

/// Fraction of rows held out for testing.
pub const TEST_RATIO: f64 = 0.2;

/// Seed of the train/test shuffle.
pub const SPLIT_SEED: u64 = 0;

/// Reads every row of a study CSV, preserving file order.
pub fn load_csv(path: &Path) -> Result<Vec<PatientRecord>> {
    let data_access = |source| Error::DataAccess {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::Reader::from_path(path).map_err(data_access)?;

    let headers = rdr.headers().map_err(data_access)?;
    if headers.iter().ne(COLUMNS.iter().copied()) {
        return Err(Error::UnexpectedColumns {
            path: path.to_path_buf(),
            found: headers.iter().map(str::to_owned).collect(),
            expected: COLUMNS.iter().map(|c| c.to_string()).collect(),
        });
    }

    let mut records = vec![];
    for result in rdr.deserialize() {
        let record: PatientRecord = result.map_err(data_access)?;
        records.push(record);
    }

    debug!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}

/// Patients fitted on (`train`) and held back for scoring (`test`).
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub train: Vec<PatientRecord>,
    pub test: Vec<PatientRecord>,
}

/// Feature matrices and label vectors of both halves of a split.
#[derive(Debug, Clone)]
pub struct SplitProjections {
    pub train_features: Array2<f64>,
    pub test_features: Array2<f64>,
    pub train_labels: Array1<usize>,
    pub test_labels: Array1<usize>,
}

/// Shuffles `data` with a generator seeded by `seed` and holds out
/// `ceil(test_ratio * len)` rows as the test set.
///
/// The same data, ratio and seed always produce the same split.
pub fn train_test_split(data: &[PatientRecord], test_ratio: f64, seed: u64) -> Result<DatasetSplit> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(Error::InvalidConfig(format!(
            "test ratio must lie strictly between 0 and 1, got {test_ratio}"
        )));
    }

    let mut order: Vec<usize> = (0..data.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let test_size = ((data.len() as f64) * test_ratio).ceil() as usize;
    let test = order[..test_size].iter().map(|&i| data[i].clone()).collect();
    let train = order[test_size..].iter().map(|&i| data[i].clone()).collect();

    let split = DatasetSplit { train, test };
    debug!(
        "Dataset split: {} training, {} test (seed {})",
        split.train.len(),
        split.test.len(),
        seed
    );
    Ok(split)
}

impl DatasetSplit {
    pub fn projections(&self) -> SplitProjections {
        SplitProjections {
            train_features: feature_matrix(&self.train),
            test_features: feature_matrix(&self.test),
            train_labels: labels(&self.train),
            test_labels: labels(&self.test),
        }
    }
}

/// One row per record: age, sex, episode number.
pub fn feature_matrix(records: &[PatientRecord]) -> Array2<f64> {
    Array2::from_shape_fn((records.len(), FeatureVector::WIDTH), |(row, col)| {
        records[row].features().to_array()[col]
    })
}

pub fn labels(records: &[PatientRecord]) -> Array1<usize> {
    records.iter().map(PatientRecord::label).collect()
}
