//! Application state owned by the menu for the duration of a session

use super::classifier::{ClassifierKind, ClassifierParams, ModelHandle};
use super::dataset::Dataset;
use super::evaluate::Evaluation;

/// One fixed slot per classifier kind
#[derive(Debug, Clone)]
pub struct ClassifierSlots<T> {
    knn: Option<T>,
    decision_tree: Option<T>,
}

impl<T> Default for ClassifierSlots<T> {
    fn default() -> Self {
        Self {
            knn: None,
            decision_tree: None,
        }
    }
}

impl<T> ClassifierSlots<T> {
    pub fn get(&self, kind: ClassifierKind) -> Option<&T> {
        match kind {
            ClassifierKind::KNearestNeighbors => self.knn.as_ref(),
            ClassifierKind::DecisionTree => self.decision_tree.as_ref(),
        }
    }

    pub fn set(&mut self, kind: ClassifierKind, value: T) {
        *self.slot_mut(kind) = Some(value);
    }

    pub fn remove(&mut self, kind: ClassifierKind) -> Option<T> {
        self.slot_mut(kind).take()
    }

    pub fn clear(&mut self) {
        self.knn = None;
        self.decision_tree = None;
    }

    pub fn is_empty(&self) -> bool {
        self.knn.is_none() && self.decision_tree.is_none()
    }

    /// Occupied slots in `ClassifierKind::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (ClassifierKind, &T)> {
        ClassifierKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|value| (kind, value)))
    }

    fn slot_mut(&mut self, kind: ClassifierKind) -> &mut Option<T> {
        match kind {
            ClassifierKind::KNearestNeighbors => &mut self.knn,
            ClassifierKind::DecisionTree => &mut self.decision_tree,
        }
    }
}

/// A trained classifier together with the parameters used to build it
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub kind: ClassifierKind,
    pub params: ClassifierParams,
    pub handle: ModelHandle,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub dataset: Option<Dataset>,
    pub models: ClassifierSlots<TrainedModel>,
    pub evaluations: ClassifierSlots<Evaluation>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded dataset, ignoring a dataset whose load failed
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref().filter(|d| d.loaded)
    }

    /// Replace the dataset. Models trained on the previous one are discarded.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.models.clear();
        self.evaluations.clear();
        self.dataset = Some(dataset);
    }

    /// Names of trained classifiers, in menu order
    pub fn trained_labels(&self) -> Vec<String> {
        self.models.iter().map(|(kind, _)| kind.label().to_string()).collect()
    }

    /// Model used for ad-hoc predictions: KNN when trained, else the tree
    pub fn prediction_model(&self) -> Option<&TrainedModel> {
        self.models
            .get(ClassifierKind::KNearestNeighbors)
            .or_else(|| self.models.get(ClassifierKind::DecisionTree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_iterate_in_kind_order() {
        let mut slots = ClassifierSlots::default();
        slots.set(ClassifierKind::DecisionTree, "tree");
        slots.set(ClassifierKind::KNearestNeighbors, "knn");

        let kinds: Vec<_> = slots.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(
            kinds,
            vec![
                (ClassifierKind::KNearestNeighbors, "knn"),
                (ClassifierKind::DecisionTree, "tree")
            ]
        );

        slots.clear();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_failed_dataset_is_not_usable() {
        let mut session = Session::new();
        session.set_dataset(Dataset::failed("x.csv", "boom"));
        assert!(session.dataset.is_some());
        assert!(session.dataset().is_none());
    }
}
