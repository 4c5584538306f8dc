//! Report module - dataset and evaluation reports, progress snapshots

pub mod dataset_view;
pub mod evaluation_view;
pub mod snapshot;

pub use dataset_view::*;
pub use evaluation_view::*;
pub use snapshot::*;
