//! The classifier seam and its nearest-neighbour implementation.

use linfa::Dataset;
use linfa_nn::distance::L2Dist;
use linfa_nn::{KdTree, NearestNeighbour};
use ndarray::{ArrayView1, ArrayView2, Ix1, aview1};
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::FeatureVector;

/// A prediction function borrowed from a fitted classifier.
pub type Predictor<'a> = Box<dyn Fn(&FeatureVector) -> Result<usize> + 'a>;

/// Anything that can learn outcome labels from feature rows and predict them back.
pub trait Classifier {
    /// Replaces whatever the classifier learned before with `features`/`labels`.
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: ArrayView1<'_, usize>) -> Result<()>;

    /// Predicts the label of a single feature vector. Must not mutate the model.
    fn predict(&self, features: &FeatureVector) -> Result<usize>;

    /// Prepares for many predictions in a row. Implementations with an
    /// expensive lookup structure build it here, once.
    fn predictor(&self) -> Result<Predictor<'_>> {
        Ok(Box::new(move |features: &FeatureVector| self.predict(features)))
    }
}

/// k-nearest-neighbour classifier under Euclidean distance.
///
/// With `k = 1` the prediction is the label of the single closest training
/// row. Ties between equidistant rows are resolved by the kd-tree.
#[derive(Debug)]
pub struct KnnClassifier {
    k: usize,
    reference: Option<Dataset<f64, usize, Ix1>>,
}

impl Default for KnnClassifier {
    fn default() -> Self {
        KnnClassifier::new(1)
    }
}

impl KnnClassifier {
    pub fn new(k: usize) -> Self {
        KnnClassifier { k, reference: None }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn is_fitted(&self) -> bool {
        self.reference.is_some()
    }
}

impl Classifier for KnnClassifier {
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: ArrayView1<'_, usize>) -> Result<()> {
        if features.nrows() != labels.len() {
            return Err(Error::ShapeMismatch {
                rows: features.nrows(),
                labels: labels.len(),
            });
        }
        if features.nrows() == 0 {
            return Err(Error::EmptyTrainingSet);
        }
        if self.k == 0 || self.k > features.nrows() {
            return Err(Error::TooFewReferences {
                k: self.k,
                available: features.nrows(),
            });
        }

        debug!("Fitting {}-NN on {} rows", self.k, features.nrows());
        self.reference = Some(Dataset::new(features.to_owned(), labels.to_owned()));
        Ok(())
    }

    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        let predict = self.predictor()?;
        predict(features)
    }

    fn predictor(&self) -> Result<Predictor<'_>> {
        let reference = self.reference.as_ref().ok_or(Error::NotFitted)?;
        let index = KdTree::new().from_batch(&reference.records, L2Dist)?;
        let targets = &reference.targets;
        let k = self.k;

        Ok(Box::new(move |features: &FeatureVector| -> Result<usize> {
            let query = features.to_array();
            let neighbours = index.k_nearest(aview1(&query), k)?;
            let ranked: Vec<usize> = neighbours.into_iter().map(|(_, i)| targets[i]).collect();
            Ok(majority_vote(&ranked))
        }))
    }
}

/// Most frequent label among `ranked` neighbours (closest first). A tie goes
/// to the label whose closest supporter ranks highest.
fn majority_vote(ranked: &[usize]) -> usize {
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for &label in ranked {
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    // max_by_key keeps the last maximum, so walk from the far end
    tally
        .iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|&(label, _)| label)
        .unwrap_or_default()
}
