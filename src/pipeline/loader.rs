//! Dataset loader for CSV and Parquet files

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::dataset::{ColumnStatistics, Dataset, Split};

/// File extensions offered by the dataset chooser
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["csv", "parquet"];

/// Check whether a path has a supported tabular extension
pub fn is_supported_dataset(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// List supported dataset files in a directory, sorted by name
pub fn list_datasets(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read datasets folder: {}", dir.display()))?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_dataset(path))
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();

    names.sort();
    log::debug!("found {} datasets in {}", names.len(), dir.display());
    Ok(names)
}

/// Read a file into a DataFrame (CSV or Parquet based on extension)
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: {}",
            extension,
            SUPPORTED_EXTENSIONS.join(", ")
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Trim and uppercase a column name
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Normalize a target label so differently spelled duplicates collapse
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase().replace('_', " ")
}

/// Loads datasets and splits them into features and target
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    preview_rows: usize,
    target: Option<String>,
}

impl DatasetLoader {
    pub fn new(preview_rows: usize, target: Option<String>) -> Self {
        Self {
            preview_rows,
            target: target.map(|t| normalize_column_name(&t)),
        }
    }

    /// Load a dataset. Failures are reported through `Dataset::message`
    /// with `loaded = false` instead of an error.
    pub fn load(&self, path: &Path) -> Dataset {
        match self.try_load(path) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} ({} samples, {} features)",
                    path.display(),
                    dataset.train.n_samples(),
                    dataset.feature_names.len()
                );
                dataset
            }
            Err(e) => {
                log::warn!("failed to load {}: {:#}", path.display(), e);
                Dataset::failed(path.display().to_string(), format!("{:#}", e))
            }
        }
    }

    pub fn try_load(&self, path: &Path) -> Result<Dataset> {
        let mut df = read_frame(path)?;
        self.dataset_from_frame(&mut df, &path.display().to_string())
    }

    /// Build a dataset from an in-memory frame. The frame's column names are
    /// normalized in place.
    pub fn dataset_from_frame(&self, df: &mut DataFrame, path: &str) -> Result<Dataset> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|c| normalize_column_name(c))
            .collect();
        df.set_column_names(columns.iter().map(|c| c.as_str()))
            .context("Column names are not unique after normalization")?;

        if columns.len() < 2 {
            anyhow::bail!("Dataset needs at least one feature column and a target column");
        }

        let target_name = match &self.target {
            Some(target) => {
                if !columns.contains(target) {
                    anyhow::bail!("Target column '{}' not found in dataset", target);
                }
                target.clone()
            }
            None => columns[columns.len() - 1].clone(),
        };

        let feature_names: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| c.name().as_str() != target_name && is_numeric(c.dtype()))
            .map(|c| c.name().to_string())
            .collect();

        if feature_names.is_empty() {
            anyhow::bail!("Dataset has no numeric feature columns");
        }

        let split = self.build_split(df, &columns, &feature_names, &target_name)?;
        if split.n_samples() == 0 {
            anyhow::bail!("Dataset has no complete rows");
        }

        let message = format!(
            "Loaded {} rows with {} features, target '{}'",
            split.rows.len(),
            feature_names.len(),
            target_name
        );

        Ok(Dataset {
            path: path.to_string(),
            loaded: true,
            message,
            feature_names,
            target_name,
            test: split.clone(),
            train: split,
        })
    }

    fn build_split(
        &self,
        df: &DataFrame,
        columns: &[String],
        feature_names: &[String],
        target_name: &str,
    ) -> Result<Split> {
        let height = df.height();

        let mut string_columns = Vec::with_capacity(columns.len());
        let mut statistics = Vec::with_capacity(columns.len());
        for name in columns {
            let col = df.column(name)?;
            string_columns.push(column_to_string_vec(col)?);

            let numeric = if is_numeric(col.dtype()) {
                Some(column_to_f64_vec(col)?)
            } else {
                None
            };
            statistics.push(ColumnStatistics::compute(
                name,
                &col.dtype().to_string(),
                height,
                col.null_count(),
                numeric.as_deref(),
            ));
        }

        let rows: Vec<Vec<String>> = (0..height)
            .map(|i| {
                string_columns
                    .iter()
                    .map(|values| values[i].clone().unwrap_or_default())
                    .collect()
            })
            .collect();

        let feature_values: Vec<Vec<Option<f64>>> = feature_names
            .iter()
            .map(|name| column_to_f64_vec(df.column(name)?))
            .collect::<Result<_>>()?;
        let target_values = column_to_string_vec(df.column(target_name)?)?;

        // Keep only complete rows
        let mut features = Vec::with_capacity(height);
        let mut target = Vec::with_capacity(height);
        for i in 0..height {
            let Some(label) = &target_values[i] else {
                continue;
            };
            let sample: Option<Vec<f64>> = feature_values.iter().map(|values| values[i]).collect();
            if let Some(sample) = sample {
                features.push(sample);
                target.push(normalize_label(label));
            }
        }

        let dropped = height - features.len();
        if dropped > 0 {
            log::debug!("dropped {} incomplete rows", dropped);
        }

        Ok(Split {
            columns: columns.to_vec(),
            preview: rows.iter().take(self.preview_rows).cloned().collect(),
            rows,
            statistics,
            features,
            target,
        })
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn column_to_f64_vec(col: &Column) -> Result<Vec<Option<f64>>> {
    let cast = col.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Render a column as optional strings regardless of its dtype
fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
