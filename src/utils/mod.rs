//! Utility module - styling, progress spinners and terminal control

pub mod progress;
pub mod styling;
pub mod terminal;

pub use progress::*;
pub use styling::*;
pub use terminal::*;
