//! Accuracy and per-class classification metrics

use std::collections::BTreeMap;

use serde::Serialize;

use super::classifier::ClassifierKind;

/// Precision, recall and F1 for one class (or an average)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class metrics keyed by label, plus macro and weighted averages.
/// Class rows sit under `classes` so no label can shadow a summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: BTreeMap<String, ClassMetrics>,
    pub accuracy: f64,
    #[serde(rename = "macro avg")]
    pub macro_avg: ClassMetrics,
    #[serde(rename = "weighted avg")]
    pub weighted_avg: ClassMetrics,
}

/// Result of evaluating a trained classifier on a labelled split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    #[serde(rename = "name")]
    pub kind: ClassifierKind,
    pub accuracy: f64,
    #[serde(rename = "classification_report")]
    pub report: ClassificationReport,
    pub predictions: Vec<String>,
}

/// Fraction of predictions equal to the true label (0 for empty input)
pub fn accuracy_score(truth: &[String], predictions: &[String]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth.iter().zip(predictions).filter(|(t, p)| t == p).count();
    correct as f64 / truth.len() as f64
}

/// Build a classification report over the union of true and predicted
/// labels. Divisions by zero yield 0.
pub fn classification_report(truth: &[String], predictions: &[String]) -> ClassificationReport {
    let mut labels: Vec<&String> = truth.iter().chain(predictions).collect();
    labels.sort();
    labels.dedup();

    let mut classes = BTreeMap::new();
    for label in labels {
        let tp = truth.iter().zip(predictions).filter(|(t, p)| *t == label && *p == label).count();
        let predicted = predictions.iter().filter(|p| *p == label).count();
        let support = truth.iter().filter(|t| *t == label).count();

        let precision = safe_div(tp as f64, predicted as f64);
        let recall = safe_div(tp as f64, support as f64);
        let f1_score = safe_div(2.0 * precision * recall, precision + recall);

        classes.insert(
            label.clone(),
            ClassMetrics {
                precision,
                recall,
                f1_score,
                support,
            },
        );
    }

    let total_support: usize = classes.values().map(|m| m.support).sum();
    let macro_avg = average(&classes, |_| 1.0, classes.len() as f64, total_support);
    let weighted_avg = average(&classes, |m| m.support as f64, total_support as f64, total_support);

    ClassificationReport {
        accuracy: accuracy_score(truth, predictions),
        classes,
        macro_avg,
        weighted_avg,
    }
}

/// Evaluate predictions against the true labels
pub fn evaluate_predictions(kind: ClassifierKind, truth: &[String], predictions: Vec<String>) -> Evaluation {
    let report = classification_report(truth, &predictions);
    Evaluation {
        kind,
        accuracy: report.accuracy,
        report,
        predictions,
    }
}

/// Count how often each label was predicted, most frequent first
pub fn prediction_distribution(predictions: &[String]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for p in predictions {
        *counts.entry(p.as_str()).or_insert(0) += 1;
    }
    let mut distribution: Vec<(String, usize)> =
        counts.into_iter().map(|(label, count)| (label.to_string(), count)).collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1));
    distribution
}

fn average(
    classes: &BTreeMap<String, ClassMetrics>,
    weight: impl Fn(&ClassMetrics) -> f64,
    denominator: f64,
    support: usize,
) -> ClassMetrics {
    let weighted_sum = |metric: fn(&ClassMetrics) -> f64| -> f64 {
        classes.values().map(|m| metric(m) * weight(m)).sum()
    };
    ClassMetrics {
        precision: safe_div(weighted_sum(|m| m.precision), denominator),
        recall: safe_div(weighted_sum(|m| m.recall), denominator),
        f1_score: safe_div(weighted_sum(|m| m.f1_score), denominator),
        support,
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
