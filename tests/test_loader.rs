//! Tests for dataset discovery and loading

use modelmenu::pipeline::{list_datasets, DatasetLoader};
use polars::prelude::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::{Workspace, SMALL_CSV, TWO_ROW_CSV};

#[test]
fn test_list_datasets_filters_and_sorts() {
    let ws = Workspace::new()
        .with_dataset("wine.csv", SMALL_CSV)
        .with_dataset("iris.CSV", SMALL_CSV)
        .with_dataset("notes.txt", "not a dataset");
    std::fs::create_dir(ws.datasets_dir().join("nested.csv")).unwrap();

    let names = list_datasets(&ws.datasets_dir()).unwrap();
    assert_eq!(names, vec!["iris.CSV", "wine.csv"]);
}

#[test]
fn test_list_datasets_missing_folder_is_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(list_datasets(&temp_dir.path().join("missing")).is_err());
}

#[test]
fn test_load_csv_normalizes_names_and_labels() {
    let ws = Workspace::new().with_dataset("iris.csv", TWO_ROW_CSV);
    let dataset = DatasetLoader::new(10, None).load(&ws.datasets_dir().join("iris.csv"));

    assert!(dataset.loaded, "{}", dataset.message);
    assert_eq!(
        dataset.feature_names,
        vec!["SEPAL_LENGTH", "SEPAL_WIDTH", "PETAL_LENGTH", "PETAL_WIDTH", "STEM"]
    );
    assert_eq!(dataset.target_name, "SPECIES");
    assert_eq!(dataset.train.target, vec!["iris setosa", "iris virginica"]);
    assert_eq!(dataset.train.features[1], vec![6.7, 3.0, 5.2, 2.3, 2.0]);
    assert_eq!(dataset.test.target, dataset.train.target);
    assert_eq!(dataset.train.statistics.len(), 6);
}

#[test]
fn test_preview_is_limited() {
    let ws = Workspace::new().with_dataset("small.csv", SMALL_CSV);
    let dataset = DatasetLoader::new(2, None).load(&ws.datasets_dir().join("small.csv"));

    assert_eq!(dataset.train.rows.len(), 6);
    assert_eq!(dataset.train.preview.len(), 2);
}

#[test]
fn test_explicit_target_column() {
    let ws = Workspace::new().with_dataset("small.csv", SMALL_CSV);
    let dataset = DatasetLoader::new(10, Some(" x ".to_string())).load(&ws.datasets_dir().join("small.csv"));

    assert!(dataset.loaded, "{}", dataset.message);
    assert_eq!(dataset.target_name, "X");
    assert_eq!(dataset.feature_names, vec!["Y"]);
}

#[test]
fn test_unknown_target_fails_softly() {
    let ws = Workspace::new().with_dataset("small.csv", SMALL_CSV);
    let dataset = DatasetLoader::new(10, Some("nope".to_string())).load(&ws.datasets_dir().join("small.csv"));

    assert!(!dataset.loaded);
    assert!(dataset.message.contains("NOPE"), "{}", dataset.message);
}

#[test]
fn test_missing_file_fails_softly() {
    let temp_dir = TempDir::new().unwrap();
    let dataset = DatasetLoader::new(10, None).load(&temp_dir.path().join("gone.csv"));

    assert!(!dataset.loaded);
    assert!(!dataset.message.is_empty());
}

#[test]
fn test_load_parquet_file() {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test.parquet");

    let mut df = df! {
        "x" => [1.0f64, 2.0, 3.0],
        "y" => [4i64, 5, 6],
        "label" => ["a", "b", "a"],
    }
    .unwrap();

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();

    let dataset = DatasetLoader::new(10, None).load(&parquet_path);
    assert!(dataset.loaded, "{}", dataset.message);
    assert_eq!(dataset.feature_names, vec!["X", "Y"]);
    assert_eq!(dataset.train.features[2], vec![3.0, 6.0]);
}
