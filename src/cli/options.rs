//! Application side of the menu: option labels and what confirming them does

use std::path::PathBuf;

use anyhow::{bail, Result};

use super::args::Settings;
use super::frontend::Frontend;
use super::menu::{Dispatch, ExitReason, MenuContext, MenuHandler};
use super::render::{MenuView, Renderer};
use crate::pipeline::{
    list_datasets, ClassifierBackend, ClassifierKind, Dataset, DatasetLoader, NativeBackend, Session, TrainedModel,
};
use crate::report::{current_timestamp, render_dataset_report, render_evaluation_report, save_progress};

pub const MENU_TITLE: &str = "Train a model";

pub const LOAD_DATASET: &str = "Load dataset";
pub const TRAIN_MODEL: &str = "Train model";
pub const EVALUATE_MODEL: &str = "Evaluate model";
pub const PREDICT_TARGET: &str = "Predict a target by new features sample";
pub const SAVE_PROGRESS: &str = "Save progress to a file";

pub const PRIMARY_OPTIONS: [&str; 5] = [LOAD_DATASET, TRAIN_MODEL, EVALUATE_MODEL, PREDICT_TARGET, SAVE_PROGRESS];

pub const NO_DATASET_TRAIN: &str = "No dataset loaded. Please load a dataset first.";
pub const NO_DATASET_EVALUATE: &str = "No dataset loaded. Please load a dataset and train a model before evaluating.";
pub const NO_MODEL_EVALUATE: &str = "No trained models found. Please train a model before evaluating.";
pub const NO_DATASET_PREDICT: &str =
    "No dataset loaded. Please load a dataset and train a model before predicting a target by new features sample.";
pub const NO_MODEL_PREDICT: &str =
    "No trained models found. Please train a model before predicting a target by new features sample.";
pub const NO_DATASET_SAVE: &str = "No dataset loaded. Please load a dataset before saving the progress to a file.";
pub const PREDICTION_FAILED: &str = "Failed to get prediction. Please try again.";

pub const SEPARATE_EVALUATION_PROMPT: &str = "Do you want to load a separate dataset for evaluation? (y/n)";
pub const FILE_NAME_PROMPT: &str = "Enter the file name to save the progress to (no extension)";

pub fn primary_options() -> Vec<String> {
    PRIMARY_OPTIONS.iter().map(|s| s.to_string()).collect()
}

/// Where an evaluation takes its test split from
enum EvaluationData {
    Session,
    Separate(Dataset),
    Rejected(String),
}

/// Owns the session and performs the side effects of confirmed options
pub struct OptionsMenu<F: Frontend, B: ClassifierBackend = NativeBackend> {
    frontend: F,
    backend: B,
    loader: DatasetLoader,
    settings: Settings,
    session: Session,
    clock: fn() -> f64,
}

impl<F: Frontend> OptionsMenu<F, NativeBackend> {
    pub fn new(frontend: F, settings: Settings) -> Self {
        Self::with_backend(frontend, NativeBackend, settings)
    }
}

impl<F: Frontend, B: ClassifierBackend> OptionsMenu<F, B> {
    pub fn with_backend(frontend: F, backend: B, settings: Settings) -> Self {
        let loader = DatasetLoader::new(settings.preview_rows, settings.target.clone());
        Self {
            frontend,
            backend,
            loader,
            settings,
            session: Session::new(),
            clock: current_timestamp,
        }
    }

    /// Replace the timestamp source used for saved file names
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    /// Draw a menu frame on this menu's front-end
    pub fn render(&mut self, view: &MenuView) -> Result<()> {
        self.frontend.render(view)
    }

    /// Dataset files in the datasets folder. A missing folder has none.
    fn available_datasets(&self) -> Vec<String> {
        list_datasets(&self.settings.datasets_dir).unwrap_or_else(|e| {
            log::warn!("{:#}", e);
            Vec::new()
        })
    }

    fn no_datasets_notice(&self) -> String {
        format!("No datasets found in {}.", self.settings.datasets_dir.display())
    }

    fn load_named(&mut self, name: &str) -> Dataset {
        let path: PathBuf = self.settings.datasets_dir.join(name);
        let loader = &self.loader;
        self.frontend
            .busy(&format!("Loading {}...", name), || loader.load(&path))
    }

    fn load_dataset(&mut self) -> Result<Dispatch> {
        let datasets = self.available_datasets();
        if datasets.is_empty() {
            return Ok(Dispatch::origin().with_notice(self.no_datasets_notice()));
        }

        let Some(name) = self.frontend.choose_dataset(&datasets)? else {
            return Ok(Dispatch::origin());
        };

        let dataset = self.load_named(&name);
        self.frontend
            .show_report(&format!("Dataset: {}", name), &render_dataset_report(&dataset))?;

        let notice = if dataset.loaded {
            format!("Dataset {} loaded successfully", name)
        } else {
            format!("Failed to load {}: {}", name, dataset.message)
        };
        self.session.set_dataset(dataset);
        Ok(Dispatch::origin().with_notice(notice))
    }

    fn open_train_menu(&self) -> Dispatch {
        if self.session.dataset().is_none() {
            return Dispatch::rejected(NO_DATASET_TRAIN);
        }
        Dispatch::enter(MenuContext::TrainSelect)
    }

    fn open_evaluate_menu(&self) -> Dispatch {
        if self.session.dataset().is_none() {
            return Dispatch::rejected(NO_DATASET_EVALUATE);
        }
        if self.session.models.is_empty() {
            return Dispatch::rejected(NO_MODEL_EVALUATE);
        }
        Dispatch::enter(MenuContext::EvaluateSelect)
    }

    fn train(&mut self, kind: ClassifierKind) -> Result<Dispatch> {
        let Some(dataset) = self.session.dataset() else {
            return Ok(Dispatch::primary().with_notice(NO_DATASET_TRAIN));
        };

        let params = self.settings.params;
        let backend = &self.backend;
        let result = self.frontend.busy(&format!("Training {}...", kind), || {
            backend.train(kind, &params, &dataset.train.features, &dataset.train.target)
        });

        match result {
            Ok(handle) => {
                self.session.models.set(kind, TrainedModel { kind, params, handle });
                self.session.evaluations.remove(kind);
                log::info!("trained {}", kind);
                Ok(Dispatch::primary().with_notice(format!("{} trained successfully", kind)))
            }
            Err(e) => {
                log::warn!("training {} failed: {}", kind, e);
                Ok(Dispatch::primary().with_notice(format!("Failed to train {}: {}", kind, e)))
            }
        }
    }

    /// Ask for a separately loaded dataset to evaluate on, for this
    /// evaluation only
    fn load_evaluation_dataset(&mut self) -> Result<EvaluationData> {
        let datasets = self.available_datasets();
        if datasets.is_empty() {
            return Ok(EvaluationData::Rejected(self.no_datasets_notice()));
        }
        let Some(name) = self.frontend.choose_dataset(&datasets)? else {
            return Ok(EvaluationData::Session);
        };

        let other = self.load_named(&name);
        let Some(dataset) = self.session.dataset() else {
            return Ok(EvaluationData::Rejected(NO_DATASET_EVALUATE.to_string()));
        };
        let checked = dataset.evaluation_split(&other).map(|_| ());
        match checked {
            Ok(()) => Ok(EvaluationData::Separate(other)),
            Err(e) => Ok(EvaluationData::Rejected(format!("{:#}", e))),
        }
    }

    fn evaluate(&mut self, kind: ClassifierKind) -> Result<Dispatch> {
        let source = if self.frontend.confirm(SEPARATE_EVALUATION_PROMPT)? {
            self.load_evaluation_dataset()?
        } else {
            EvaluationData::Session
        };
        if let EvaluationData::Rejected(problem) = &source {
            return Ok(Dispatch::primary().with_notice(problem.as_str()));
        }

        let Some(dataset) = self.session.dataset() else {
            return Ok(Dispatch::primary().with_notice(NO_DATASET_EVALUATE));
        };
        let Some(model) = self.session.models.get(kind) else {
            return Ok(Dispatch::primary().with_notice(NO_MODEL_EVALUATE));
        };
        let split = match &source {
            EvaluationData::Separate(other) => {
                log::info!("evaluating {} on {}", kind, other.path);
                &other.test
            }
            _ => &dataset.test,
        };

        let backend = &self.backend;
        let result = self.frontend.busy(&format!("Evaluating {}...", kind), || {
            backend.evaluate(&model.handle, &split.features, &split.target)
        });

        let evaluation = match result {
            Ok(evaluation) => evaluation,
            Err(e) => {
                log::warn!("evaluating {} failed: {}", kind, e);
                return Ok(Dispatch::primary().with_notice(format!("Failed to evaluate {}: {}", kind, e)));
            }
        };

        let report = render_evaluation_report(&evaluation);
        let notice = format!("{} accuracy: {:.4}", kind, evaluation.accuracy);
        self.session.evaluations.set(kind, evaluation);
        self.frontend
            .show_report(&format!("Evaluation: {}", kind), &report)?;
        Ok(Dispatch::primary().with_notice(notice))
    }

    fn predict(&mut self) -> Result<Dispatch> {
        let Some(dataset) = self.session.dataset() else {
            return Ok(Dispatch::rejected(NO_DATASET_PREDICT));
        };
        if self.session.models.is_empty() {
            return Ok(Dispatch::rejected(NO_MODEL_PREDICT));
        }

        let feature_names = dataset.feature_names.clone();
        let mut sample = Vec::with_capacity(feature_names.len());
        for name in &feature_names {
            sample.push(self.frontend.read_number(&format!("Enter the value for {}", name))?);
        }

        let Some(model) = self.session.prediction_model() else {
            return Ok(Dispatch::primary().with_notice(NO_MODEL_PREDICT));
        };
        let notice = match self.backend.predict(&model.handle, &[sample]) {
            Ok(labels) => match labels.first() {
                Some(label) => format!("The predicted target is {}", label),
                None => PREDICTION_FAILED.to_string(),
            },
            Err(e) => {
                log::warn!("prediction with {} failed: {}", model.kind, e);
                PREDICTION_FAILED.to_string()
            }
        };
        Ok(Dispatch::primary().with_notice(notice))
    }

    fn save(&mut self) -> Result<Dispatch> {
        if self.session.dataset().is_none() {
            return Ok(Dispatch::rejected(NO_DATASET_SAVE));
        }

        let name = self.frontend.read_file_name(FILE_NAME_PROMPT)?;
        let timestamp = (self.clock)();
        match save_progress(&self.settings.results_dir, &name, timestamp, &self.session) {
            Ok(path) => Ok(Dispatch::exit(ExitReason::Saved)
                .with_notice(format!("Progress saved successfully to {}", path.display()))),
            Err(e) => {
                log::warn!("{:#}", e);
                Ok(Dispatch::primary().with_notice(format!("Failed to save progress: {:#}", e)))
            }
        }
    }
}

impl<F: Frontend, B: ClassifierBackend> MenuHandler for OptionsMenu<F, B> {
    fn options_for(&self, context: MenuContext) -> Vec<String> {
        match context {
            MenuContext::Primary => primary_options(),
            MenuContext::TrainSelect => ClassifierKind::ALL.iter().map(|k| k.label().to_string()).collect(),
            MenuContext::EvaluateSelect => self.session.trained_labels(),
        }
    }

    fn dispatch(&mut self, context: MenuContext, label: &str) -> Result<Dispatch> {
        match context {
            MenuContext::Primary => match label {
                LOAD_DATASET => self.load_dataset(),
                TRAIN_MODEL => Ok(self.open_train_menu()),
                EVALUATE_MODEL => Ok(self.open_evaluate_menu()),
                PREDICT_TARGET => self.predict(),
                SAVE_PROGRESS => self.save(),
                other => bail!("Unknown option: {}", other),
            },
            MenuContext::TrainSelect => self.train(label.parse()?),
            MenuContext::EvaluateSelect => self.evaluate(label.parse()?),
        }
    }
}
