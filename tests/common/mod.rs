//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use tempfile::TempDir;

use modelmenu::cli::{Frontend, MenuView, Renderer, Settings};

/// Two rows, five numeric features and a label column
pub const TWO_ROW_CSV: &str = "\
sepal_length,sepal_width,petal_length,petal_width,stem,species
5.1,3.5,1.4,0.2,1.0,Iris_setosa
6.7,3.0,5.2,2.3,2.0,Iris_virginica
";

/// Six rows, two well separated classes
pub const SMALL_CSV: &str = "\
x,y,label
1.0,1.0,a
1.2,0.9,a
0.8,1.1,a
8.0,8.0,b
8.2,7.9,b
7.8,8.1,b
";

/// Same columns as `SMALL_CSV`, two fresh rows
pub const HELD_OUT_CSV: &str = "\
x,y,label
1.1,1.0,a
7.9,8.0,b
";

/// Same columns as `SMALL_CSV` with each cluster given the other label
pub const FLIPPED_CSV: &str = "\
x,y,label
1.0,1.0,b
8.0,8.0,a
";

/// Same classes with an extra column, so features do not line up
pub const MISMATCHED_CSV: &str = "\
x,y,z,label
1.0,1.0,0.0,a
8.0,8.0,0.0,b
";

pub fn fixed_clock() -> f64 {
    1_700_000_000.0
}

/// Temporary workspace with a datasets folder and a results folder path
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("datasets")).unwrap();
        Self { dir }
    }

    pub fn with_dataset(self, name: &str, contents: &str) -> Self {
        fs::write(self.datasets_dir().join(name), contents).unwrap();
        self
    }

    pub fn datasets_dir(&self) -> PathBuf {
        self.dir.path().join("datasets")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.dir.path().join("results")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            datasets_dir: self.datasets_dir(),
            results_dir: self.results_dir(),
            ..Settings::default()
        }
    }
}

/// Front-end that answers prompts from queues and records what it showed
#[derive(Default)]
pub struct ScriptedFrontend {
    pub frames: Vec<MenuView>,
    pub reports: Vec<(String, String)>,
    pub busy_messages: Vec<String>,
    pub prompts: Vec<String>,
    pub dataset_choices: VecDeque<Option<String>>,
    pub confirmations: VecDeque<bool>,
    pub numbers: VecDeque<f64>,
    pub file_names: VecDeque<String>,
}

impl ScriptedFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choose(mut self, name: &str) -> Self {
        self.dataset_choices.push_back(Some(name.to_string()));
        self
    }

    pub fn confirm_with(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }

    pub fn numbers(mut self, values: &[f64]) -> Self {
        self.numbers.extend(values.iter().copied());
        self
    }

    pub fn file_name(mut self, name: &str) -> Self {
        self.file_names.push_back(name.to_string());
        self
    }

    pub fn last_frame(&self) -> &MenuView {
        self.frames.last().expect("no frame rendered")
    }
}

impl Renderer for ScriptedFrontend {
    fn render(&mut self, view: &MenuView) -> Result<()> {
        self.frames.push(view.clone());
        Ok(())
    }
}

impl Frontend for ScriptedFrontend {
    fn choose_dataset(&mut self, _datasets: &[String]) -> Result<Option<String>> {
        match self.dataset_choices.pop_front() {
            Some(choice) => Ok(choice),
            None => bail!("no scripted dataset choice"),
        }
    }

    fn show_report(&mut self, title: &str, report: &str) -> Result<()> {
        self.reports.push((title.to_string(), report.to_string()));
        Ok(())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.prompts.push(prompt.to_string());
        match self.confirmations.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no scripted confirmation"),
        }
    }

    fn read_number(&mut self, prompt: &str) -> Result<f64> {
        self.prompts.push(prompt.to_string());
        match self.numbers.pop_front() {
            Some(value) => Ok(value),
            None => bail!("no scripted number"),
        }
    }

    fn read_file_name(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        match self.file_names.pop_front() {
            Some(name) => Ok(name),
            None => bail!("no scripted file name"),
        }
    }

    fn busy<T>(&mut self, message: &str, work: impl FnOnce() -> T) -> T {
        self.busy_messages.push(message.to_string());
        work()
    }
}
