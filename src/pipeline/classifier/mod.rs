//! Classifier kinds, training parameters and the backend seam

mod knn;
mod tree;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

pub use knn::KnnModel;
pub use tree::DecisionTreeModel;

use super::evaluate::{evaluate_predictions, Evaluation};

/// The closed set of supported classifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassifierKind {
    KNearestNeighbors,
    DecisionTree,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 2] = [ClassifierKind::KNearestNeighbors, ClassifierKind::DecisionTree];

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            ClassifierKind::KNearestNeighbors => "K Nearest Neighbors",
            ClassifierKind::DecisionTree => "Decision Tree",
        }
    }

    /// Key used for this classifier in saved snapshots
    pub fn slot_key(&self) -> &'static str {
        match self {
            ClassifierKind::KNearestNeighbors => "k_nearest_neighbors",
            ClassifierKind::DecisionTree => "decision_tree",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClassifierKind {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassifierKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClassifierError::UnknownKind(s.to_string()))
    }
}

impl Serialize for ClassifierKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Hyperparameters shared by both classifiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifierParams {
    pub n_neighbors: usize,
    pub random_state: u64,
    pub max_depth: Option<usize>,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            n_neighbors: 5,
            random_state: 42,
            max_depth: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ClassifierError {
    #[error("Unknown classifier: {0}")]
    UnknownKind(String),

    #[error("Cannot train on an empty dataset")]
    EmptyTrainingSet,

    #[error("Feature rows and target labels differ in length ({features} vs {labels})")]
    LengthMismatch { features: usize, labels: usize },

    #[error("n_neighbors ({k}) must be between 1 and the number of training samples ({samples})")]
    InvalidNeighbors { k: usize, samples: usize },

    #[error("Expected {expected} features per sample, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
}

/// A trained model, opaque to everything but the backend
#[derive(Debug, Clone)]
pub enum ModelHandle {
    Knn(KnnModel),
    DecisionTree(DecisionTreeModel),
}

impl ModelHandle {
    pub fn kind(&self) -> ClassifierKind {
        match self {
            ModelHandle::Knn(_) => ClassifierKind::KNearestNeighbors,
            ModelHandle::DecisionTree(_) => ClassifierKind::DecisionTree,
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            ModelHandle::Knn(model) => model.n_features(),
            ModelHandle::DecisionTree(model) => model.n_features(),
        }
    }
}

/// Training and prediction seam used by the menu
pub trait ClassifierBackend {
    fn train(
        &self,
        kind: ClassifierKind,
        params: &ClassifierParams,
        features: &[Vec<f64>],
        target: &[String],
    ) -> Result<ModelHandle, ClassifierError>;

    fn predict(&self, handle: &ModelHandle, features: &[Vec<f64>]) -> Result<Vec<String>, ClassifierError>;

    fn evaluate(
        &self,
        handle: &ModelHandle,
        features: &[Vec<f64>],
        target: &[String],
    ) -> Result<Evaluation, ClassifierError> {
        check_lengths(features, target)?;
        let predictions = self.predict(handle, features)?;
        Ok(evaluate_predictions(handle.kind(), target, predictions))
    }
}

/// Pure-Rust implementations of both classifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl ClassifierBackend for NativeBackend {
    fn train(
        &self,
        kind: ClassifierKind,
        params: &ClassifierParams,
        features: &[Vec<f64>],
        target: &[String],
    ) -> Result<ModelHandle, ClassifierError> {
        check_lengths(features, target)?;
        if features.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        check_width(features, features[0].len())?;

        let handle = match kind {
            ClassifierKind::KNearestNeighbors => {
                ModelHandle::Knn(KnnModel::fit(features, target, params.n_neighbors)?)
            }
            ClassifierKind::DecisionTree => ModelHandle::DecisionTree(DecisionTreeModel::fit(
                features,
                target,
                params.random_state,
                params.max_depth,
            )),
        };
        log::info!("trained {} on {} samples", kind, features.len());
        Ok(handle)
    }

    fn predict(&self, handle: &ModelHandle, features: &[Vec<f64>]) -> Result<Vec<String>, ClassifierError> {
        check_width(features, handle.n_features())?;
        Ok(match handle {
            ModelHandle::Knn(model) => model.predict(features),
            ModelHandle::DecisionTree(model) => model.predict(features),
        })
    }
}

fn check_lengths(features: &[Vec<f64>], target: &[String]) -> Result<(), ClassifierError> {
    if features.len() != target.len() {
        return Err(ClassifierError::LengthMismatch {
            features: features.len(),
            labels: target.len(),
        });
    }
    Ok(())
}

fn check_width(features: &[Vec<f64>], expected: usize) -> Result<(), ClassifierError> {
    match features.iter().find(|row| row.len() != expected) {
        Some(row) => Err(ClassifierError::FeatureCount {
            expected,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}

/// Most frequent label, ties resolved to the smallest label
pub(crate) fn majority_label<'a>(labels: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_label() {
        for kind in ClassifierKind::ALL {
            assert_eq!(kind.label().parse::<ClassifierKind>().unwrap(), kind);
        }
        assert!("Random Forest".parse::<ClassifierKind>().is_err());
    }

    #[test]
    fn test_majority_label_tie_prefers_smallest() {
        assert_eq!(majority_label(["b", "a", "b", "a"]), Some("a"));
        assert_eq!(majority_label(["b", "b", "a"]), Some("b"));
        assert_eq!(majority_label(std::iter::empty()), None);
    }

    #[test]
    fn test_train_rejects_mismatched_lengths() {
        let err = NativeBackend
            .train(
                ClassifierKind::DecisionTree,
                &ClassifierParams::default(),
                &[vec![1.0]],
                &[],
            )
            .unwrap_err();
        assert_eq!(err, ClassifierError::LengthMismatch { features: 1, labels: 0 });
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let features = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let target = vec!["a".to_string(), "b".to_string()];
        let params = ClassifierParams {
            n_neighbors: 1,
            ..Default::default()
        };
        let handle = NativeBackend
            .train(ClassifierKind::KNearestNeighbors, &params, &features, &target)
            .unwrap();
        assert!(NativeBackend.predict(&handle, &[vec![1.0]]).is_err());
    }
}
