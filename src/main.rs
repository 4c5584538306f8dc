//! modelmenu: Interactive Classifier Menu
//!
//! Load a dataset, train and evaluate classifiers, predict a single sample
//! and save progress, all from a keyboard-driven menu.

use anyhow::Result;
use clap::Parser;

use modelmenu::cli::{run_canvas, run_console, Cli, UiKind};

fn main() -> Result<()> {
    // Off by default so log lines never interleave with the menu frame
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();
    let settings = cli.settings();
    log::debug!("starting with {:?}", settings);

    let reason = match settings.ui {
        UiKind::Console => run_console(&settings)?,
        UiKind::Canvas => run_canvas(&settings)?,
    };

    std::process::exit(reason.exit_code());
}
