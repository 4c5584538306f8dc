//! In-memory dataset representation shared by the loader, classifiers and reports

use anyhow::Result;
use serde::Serialize;

/// Summary statistics for a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub name: String,
    pub dtype: String,
    pub missing: usize,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    #[serde(rename = "50%")]
    pub median: Option<f64>,
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStatistics {
    /// Compute statistics from raw column values. `numeric` is `None` for
    /// non-numeric columns, in which case only counts are filled.
    pub fn compute(
        name: &str,
        dtype: &str,
        len: usize,
        missing: usize,
        numeric: Option<&[Option<f64>]>,
    ) -> Self {
        let mut stats = Self {
            name: name.to_string(),
            dtype: dtype.to_string(),
            missing,
            count: len.saturating_sub(missing),
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };

        let Some(values) = numeric else {
            return stats;
        };

        let present: Vec<f64> = values.iter().flatten().copied().collect();
        stats.missing = len - present.len();
        stats.count = present.len();

        if present.is_empty() {
            return stats;
        }

        let n = present.len() as f64;
        let mean = present.iter().sum::<f64>() / n;
        stats.mean = Some(mean);
        let mut sorted = present.clone();
        sorted.sort_by(f64::total_cmp);
        stats.min = sorted.first().copied();
        stats.q25 = Some(quantile(&sorted, 0.25));
        stats.median = Some(quantile(&sorted, 0.5));
        stats.q75 = Some(quantile(&sorted, 0.75));
        stats.max = sorted.last().copied();

        // Sample standard deviation, undefined for a single observation
        if present.len() > 1 {
            let var = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            stats.std = Some(var.sqrt());
        }

        stats
    }
}

/// Linear interpolation between the closest ranks of a sorted, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// One half of a dataset (train or test)
#[derive(Debug, Clone, Default)]
pub struct Split {
    /// Normalized column names, in file order
    pub columns: Vec<String>,
    /// Every row rendered as strings, nulls as empty strings
    pub rows: Vec<Vec<String>>,
    /// First rows kept for display
    pub preview: Vec<Vec<String>>,
    pub statistics: Vec<ColumnStatistics>,
    /// Numeric feature matrix after dropping incomplete rows
    pub features: Vec<Vec<f64>>,
    /// Normalized target labels aligned with `features`
    pub target: Vec<String>,
}

impl Split {
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }
}

/// A loaded dataset, or the record of a failed load
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub path: String,
    pub loaded: bool,
    pub message: String,
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub train: Split,
    pub test: Split,
}

impl Dataset {
    /// A dataset that failed to load, carrying the reason in `message`
    pub fn failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            loaded: false,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Test split of another dataset, checked for use against models
    /// trained on this one. Both must expose the same feature and target
    /// columns. This dataset is left as it is.
    pub fn evaluation_split<'a>(&self, other: &'a Dataset) -> Result<&'a Split> {
        if !other.loaded {
            anyhow::bail!("Evaluation dataset is not loaded: {}", other.message);
        }
        if other.feature_names != self.feature_names {
            anyhow::bail!(
                "Evaluation dataset features [{}] do not match training features [{}]",
                other.feature_names.join(", "),
                self.feature_names.join(", ")
            );
        }
        if other.target_name != self.target_name {
            anyhow::bail!(
                "Evaluation dataset target '{}' does not match training target '{}'",
                other.target_name,
                self.target_name
            );
        }
        Ok(&other.test)
    }
}
