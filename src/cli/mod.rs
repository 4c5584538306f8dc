//! CLI module - argument parsing, the menu engine and its two front-ends

pub mod app;
pub mod args;
pub mod canvas;
pub mod console;
pub mod frontend;
pub mod input_field;
pub mod keys;
pub mod menu;
pub mod options;
pub mod prompts;
pub mod render;
pub mod search;
pub mod selection;

pub use app::{apply_key, run_blocking, run_canvas, run_console, run_fixed_rate};
pub use args::{Cli, Settings, UiKind};
pub use canvas::CanvasUi;
pub use console::ConsoleUi;
pub use frontend::Frontend;
pub use input_field::InputField;
pub use keys::{EditKey, EventSource, KeyHandler, LogicalKey, ScriptedEvents, ScriptedKeys, TerminalKeys};
pub use menu::{Dispatch, ExitReason, MenuContext, MenuController, MenuError, MenuHandler, MenuState, NextMenu, Transition};
pub use options::OptionsMenu;
pub use render::{MenuView, Renderer};
pub use search::SearchScreen;
pub use selection::SelectionState;
