//! Tests for progress snapshots

use modelmenu::pipeline::{
    ClassifierBackend, ClassifierKind, ClassifierParams, DatasetLoader, NativeBackend, Session, TrainedModel,
};
use modelmenu::report::{save_progress, snapshot_path};
use serde_json::Value;

#[path = "common/mod.rs"]
mod common;

use common::{fixed_clock, Workspace, SMALL_CSV};

fn trained_session(ws: &Workspace) -> Session {
    let dataset = DatasetLoader::new(3, None).load(&ws.datasets_dir().join("small.csv"));
    let params = ClassifierParams {
        n_neighbors: 1,
        ..ClassifierParams::default()
    };
    let kind = ClassifierKind::KNearestNeighbors;

    let backend = NativeBackend;
    let handle = backend
        .train(kind, &params, &dataset.train.features, &dataset.train.target)
        .unwrap();
    let evaluation = backend
        .evaluate(&handle, &dataset.test.features, &dataset.test.target)
        .unwrap();

    let mut session = Session::new();
    session.set_dataset(dataset);
    session.models.set(kind, TrainedModel { kind, params, handle });
    session.evaluations.set(kind, evaluation);
    session
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_save_writes_named_snapshot() {
    let ws = Workspace::new().with_dataset("small.csv", SMALL_CSV);
    let session = trained_session(&ws);

    let path = save_progress(&ws.results_dir(), "report", fixed_clock(), &session).unwrap();

    assert_eq!(path, ws.results_dir().join("report_1700000000.0.json"));
    assert_eq!(path, snapshot_path(&ws.results_dir(), "report", fixed_clock()));

    let json = read_json(&path);
    assert_eq!(json["loaded"], Value::Bool(true));
    assert!(json["path"].as_str().unwrap().ends_with("small.csv"));
    assert_eq!(json["train_dataframe"].as_array().unwrap().len(), 6);
    assert_eq!(json["train_dataframe_first_x_rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["train_dataframe"][0]["LABEL"], "a");
    let x_stats = &json["train_dataframe_basic_statistics"][0];
    assert_eq!(x_stats["name"], "X");
    let median = x_stats["50%"].as_f64().unwrap();
    assert!((median - 4.5).abs() < 1e-9);
    assert_eq!(json["k_nearest_neighbors"]["name"], "K Nearest Neighbors");
    assert_eq!(json["k_nearest_neighbors"]["params"]["n_neighbors"], 1);

    let accuracy = json["k_nearest_neighbors_evaluation"]["accuracy"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
    assert!(json["k_nearest_neighbors_evaluation"]["classification_report"]["macro avg"].is_object());
    assert!(json["k_nearest_neighbors_evaluation"]["classification_report"]["classes"]["a"].is_object());
}

#[test]
fn test_untrained_classifiers_are_omitted() {
    let ws = Workspace::new().with_dataset("small.csv", SMALL_CSV);
    let session = trained_session(&ws);

    let path = save_progress(&ws.results_dir(), "partial", fixed_clock(), &session).unwrap();
    let json = read_json(&path);

    assert!(json.get("decision_tree").is_none());
    assert!(json.get("decision_tree_evaluation").is_none());
    assert!(json.get("timestamp").is_some());
    assert!(json.get("train_dataframe_basic_statistics").is_some());
}

#[test]
fn test_save_without_dataset_fails() {
    let ws = Workspace::new();
    let err = save_progress(&ws.results_dir(), "report", fixed_clock(), &Session::new()).unwrap_err();

    assert!(err.to_string().starts_with("No dataset loaded"));
    assert!(!ws.results_dir().exists());
}

#[test]
fn test_invalid_names_are_rejected() {
    let ws = Workspace::new().with_dataset("small.csv", SMALL_CSV);
    let session = trained_session(&ws);

    for name in ["report.json", "sub/report", ""] {
        assert!(save_progress(&ws.results_dir(), name, fixed_clock(), &session).is_err(), "{:?}", name);
    }
}
