//! Progress snapshot export to JSON

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::{ClassifierKind, ClassifierParams, ColumnStatistics, Evaluation, Session, Split};

/// A dataset row keyed by column name
pub type Record<'a> = BTreeMap<&'a str, &'a str>;

/// A trained classifier's metadata
#[derive(Serialize)]
pub struct ModelSummary {
    /// Classifier display name
    pub name: ClassifierKind,
    /// Hyperparameters used for training
    pub params: ClassifierParams,
}

/// Complete progress snapshot written by "Save progress"
#[derive(Serialize)]
pub struct ProgressSnapshot<'a> {
    /// Unix epoch seconds at save time
    pub timestamp: f64,
    /// Same instant in RFC 3339 format
    pub saved_at: String,
    pub modelmenu_version: &'static str,
    pub loaded: bool,
    pub path: &'a str,
    pub loaded_msg: &'a str,
    pub feature_names: &'a [String],
    pub target_name: &'a str,
    pub train_dataframe: Vec<Record<'a>>,
    pub test_dataframe: Vec<Record<'a>>,
    pub train_dataframe_first_x_rows: Vec<Record<'a>>,
    pub test_dataframe_first_x_rows: Vec<Record<'a>>,
    pub train_dataframe_basic_statistics: &'a [ColumnStatistics],
    pub test_dataframe_basic_statistics: &'a [ColumnStatistics],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_nearest_neighbors: Option<ModelSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_tree: Option<ModelSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_nearest_neighbors_evaluation: Option<&'a Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_tree_evaluation: Option<&'a Evaluation>,
}

impl<'a> ProgressSnapshot<'a> {
    /// Build a snapshot of the session. Fails when no dataset is loaded.
    pub fn from_session(session: &'a Session, timestamp: f64) -> Result<Self> {
        let dataset = session
            .dataset()
            .context("No dataset loaded. Please load a dataset before saving the progress to a file.")?;

        let model_summary = |kind: ClassifierKind| {
            session.models.get(kind).map(|model| ModelSummary {
                name: model.kind,
                params: model.params,
            })
        };

        Ok(Self {
            timestamp,
            saved_at: timestamp_to_rfc3339(timestamp),
            modelmenu_version: env!("CARGO_PKG_VERSION"),
            loaded: dataset.loaded,
            path: &dataset.path,
            loaded_msg: &dataset.message,
            feature_names: &dataset.feature_names,
            target_name: &dataset.target_name,
            train_dataframe: records(&dataset.train, &dataset.train.rows),
            test_dataframe: records(&dataset.test, &dataset.test.rows),
            train_dataframe_first_x_rows: records(&dataset.train, &dataset.train.preview),
            test_dataframe_first_x_rows: records(&dataset.test, &dataset.test.preview),
            train_dataframe_basic_statistics: &dataset.train.statistics,
            test_dataframe_basic_statistics: &dataset.test.statistics,
            k_nearest_neighbors: model_summary(ClassifierKind::KNearestNeighbors),
            decision_tree: model_summary(ClassifierKind::DecisionTree),
            k_nearest_neighbors_evaluation: session.evaluations.get(ClassifierKind::KNearestNeighbors),
            decision_tree_evaluation: session.evaluations.get(ClassifierKind::DecisionTree),
        })
    }
}

fn records<'a>(split: &'a Split, rows: &'a [Vec<String>]) -> Vec<Record<'a>> {
    rows.iter()
        .map(|row| {
            split
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| (column.as_str(), value.as_str()))
                .collect()
        })
        .collect()
}

/// Current time as Unix epoch seconds with sub-second precision
pub fn current_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Format a timestamp for use in a file name. Whole seconds keep a
/// trailing `.0` (`1700000000.0`).
pub fn format_timestamp(timestamp: f64) -> String {
    if timestamp.is_finite() && timestamp.fract() == 0.0 {
        format!("{:.1}", timestamp)
    } else {
        format!("{}", timestamp)
    }
}

fn timestamp_to_rfc3339(timestamp: f64) -> String {
    let secs = timestamp.floor() as i64;
    let nanos = ((timestamp - timestamp.floor()) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

pub const INVALID_FILE_NAME: &str = "Invalid input. Please enter the file name only (no extensions).";

/// Check a user-chosen file name base. Extensions and path separators are
/// not allowed.
pub fn validate_file_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() || name.contains(['.', '/', '\\']) {
        return Err(INVALID_FILE_NAME.to_string());
    }
    Ok(())
}

/// Path of the snapshot file for a name and timestamp
pub fn snapshot_path(results_dir: &Path, name: &str, timestamp: f64) -> PathBuf {
    results_dir.join(format!("{}_{}.json", name.trim(), format_timestamp(timestamp)))
}

/// Write the session to `<results_dir>/<name>_<timestamp>.json`, creating
/// the folder when missing.
pub fn save_progress(results_dir: &Path, name: &str, timestamp: f64, session: &Session) -> Result<PathBuf> {
    validate_file_name(name).map_err(|e| anyhow::anyhow!(e))?;

    let snapshot = ProgressSnapshot::from_session(session, timestamp)?;

    std::fs::create_dir_all(results_dir)
        .with_context(|| format!("Failed to create results folder {}", results_dir.display()))?;

    let output_path = snapshot_path(results_dir, name, timestamp);
    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize progress to JSON")?;

    std::fs::write(&output_path, json)
        .with_context(|| format!("Failed to write progress to {}", output_path.display()))?;

    log::info!("saved progress to {}", output_path.display());
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1700000000.0), "1700000000.0");
        assert_eq!(format_timestamp(1700000000.5), "1700000000.5");
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("report").is_ok());
        assert!(validate_file_name("report.json").is_err());
        assert!(validate_file_name("../report").is_err());
        assert!(validate_file_name("   ").is_err());
    }

    #[test]
    fn test_rfc3339_conversion() {
        assert_eq!(timestamp_to_rfc3339(0.0), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_snapshot_requires_dataset() {
        let session = Session::new();
        assert!(ProgressSnapshot::from_session(&session, 0.0).is_err());
    }
}
