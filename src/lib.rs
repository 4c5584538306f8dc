//! modelmenu: interactive dataset, training and evaluation menu
//!
//! A keyboard-driven menu engine with a text console front-end and a
//! full-screen graphical one, wired to a small classification pipeline:
//! CSV/Parquet loading, K Nearest Neighbors and Decision Tree classifiers,
//! evaluation reports and JSON progress snapshots.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
