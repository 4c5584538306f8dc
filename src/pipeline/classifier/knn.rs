//! K nearest neighbors classifier

use rayon::prelude::*;

use super::{majority_label, ClassifierError};

#[derive(Debug, Clone)]
pub struct KnnModel {
    k: usize,
    samples: Vec<Vec<f64>>,
    labels: Vec<String>,
}

impl KnnModel {
    pub fn fit(features: &[Vec<f64>], target: &[String], k: usize) -> Result<Self, ClassifierError> {
        if k == 0 || k > features.len() {
            return Err(ClassifierError::InvalidNeighbors {
                k,
                samples: features.len(),
            });
        }
        Ok(Self {
            k,
            samples: features.to_vec(),
            labels: target.to_vec(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.samples.first().map_or(0, |s| s.len())
    }

    pub fn predict(&self, samples: &[Vec<f64>]) -> Vec<String> {
        samples.par_iter().map(|sample| self.predict_one(sample)).collect()
    }

    /// Majority vote among the `k` closest training samples. Equal distances
    /// keep training order.
    pub fn predict_one(&self, sample: &[f64]) -> String {
        let mut distances: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| (squared_distance(s, sample), i))
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));

        let neighbors = distances.iter().take(self.k).map(|(_, i)| self.labels[*i].as_str());
        majority_label(neighbors).unwrap_or_default().to_string()
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
