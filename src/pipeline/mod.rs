//! Pipeline module - dataset loading, classifiers and evaluation

pub mod classifier;
pub mod dataset;
pub mod evaluate;
pub mod loader;
pub mod session;

pub use classifier::*;
pub use dataset::*;
pub use evaluate::*;
pub use loader::*;
pub use session::*;
