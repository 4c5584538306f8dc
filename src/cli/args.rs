//! Command-line argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use super::canvas::FRAME_RATE;
use crate::pipeline::ClassifierParams;

/// Which front-end draws the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UiKind {
    /// Clear-and-reprint text menu with blocking key reads
    #[default]
    Console,
    /// Full-screen graphical menu redrawn at a fixed frame rate
    Canvas,
}

/// modelmenu - Load a dataset, train and evaluate classifiers from an interactive menu
#[derive(Parser, Debug)]
#[command(name = "modelmenu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Front-end to use
    #[arg(long, value_enum, default_value_t = UiKind::Console)]
    pub ui: UiKind,

    /// Folder scanned for CSV and Parquet datasets
    #[arg(long, default_value = "datasets")]
    pub datasets_dir: PathBuf,

    /// Folder where progress snapshots are written (created if missing)
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Number of rows shown in dataset previews
    #[arg(long, default_value = "10", value_parser = validate_at_least_one)]
    pub preview_rows: usize,

    /// Number of neighbors for K Nearest Neighbors
    #[arg(long, default_value = "5", value_parser = validate_at_least_one)]
    pub neighbors: usize,

    /// Seed for the Decision Tree feature shuffle
    #[arg(long, default_value = "42")]
    pub random_state: u64,

    /// Maximum Decision Tree depth. Unlimited when omitted.
    #[arg(long, value_parser = validate_at_least_one)]
    pub max_depth: Option<usize>,

    /// Target column name. Defaults to the last column of the dataset.
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Resolved runtime configuration consumed by the menu and its collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ui: UiKind,
    pub datasets_dir: PathBuf,
    pub results_dir: PathBuf,
    pub preview_rows: usize,
    pub frame_rate: u32,
    pub params: ClassifierParams,
    pub target: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ui: UiKind::Console,
            datasets_dir: PathBuf::from("datasets"),
            results_dir: PathBuf::from("results"),
            preview_rows: 10,
            frame_rate: FRAME_RATE,
            params: ClassifierParams::default(),
            target: None,
        }
    }
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            ui: self.ui,
            datasets_dir: self.datasets_dir.clone(),
            results_dir: self.results_dir.clone(),
            preview_rows: self.preview_rows,
            frame_rate: FRAME_RATE,
            params: ClassifierParams {
                n_neighbors: self.neighbors,
                random_state: self.random_state,
                max_depth: self.max_depth,
            },
            target: self.target.clone(),
        }
    }
}

/// Validator for counts that must be positive
fn validate_at_least_one(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid whole number", s))?;

    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
