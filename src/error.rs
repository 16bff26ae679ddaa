use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between picking a dataset and writing the report.
#[derive(Debug, Error)]
pub enum Error {
    /// The study CSV is missing or cannot be parsed as the expected table.
    #[error("failed to read dataset {path:?}: {source}")]
    DataAccess {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset {path:?} has columns {found:?}, expected {expected:?}")]
    UnexpectedColumns {
        path: PathBuf,
        found: Vec<String>,
        expected: Vec<String>,
    },

    /// The report file could not be opened for append or written to.
    #[error("failed to write report {path:?}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),

    #[error("console input closed before a dataset was selected")]
    InputClosed,

    #[error("no valid dataset selection after {0} attempts")]
    TooManyAttempts(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("classifier used before fit")]
    NotFitted,

    #[error("cannot fit a classifier on an empty training set")]
    EmptyTrainingSet,

    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("k = {k} neighbours requested but only {available} training rows exist")]
    TooFewReferences { k: usize, available: usize },

    #[error("failed to build nearest-neighbour index: {0}")]
    NeighbourIndex(#[from] linfa_nn::BuildError),

    #[error("nearest-neighbour query failed: {0}")]
    NeighbourQuery(#[from] linfa_nn::NnError),
}
