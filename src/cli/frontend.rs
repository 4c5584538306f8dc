//! User-facing surface used by the options menu besides the menu frame itself

use anyhow::Result;

use super::render::Renderer;

/// Prompts, reports and busy indication for one UI variant
pub trait Frontend: Renderer {
    /// Let the user pick one of `datasets`. `None` when the user backs out.
    fn choose_dataset(&mut self, datasets: &[String]) -> Result<Option<String>>;

    /// Show a text report and wait for acknowledgement
    fn show_report(&mut self, title: &str, report: &str) -> Result<()>;

    /// Ask a yes/no question, re-prompting until the answer is valid
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Ask for a decimal number, re-prompting until it parses
    fn read_number(&mut self, prompt: &str) -> Result<f64>;

    /// Ask for a file name base without extension
    fn read_file_name(&mut self, prompt: &str) -> Result<String>;

    /// Run blocking work while showing a busy indicator
    fn busy<T>(&mut self, message: &str, work: impl FnOnce() -> T) -> T;
}
