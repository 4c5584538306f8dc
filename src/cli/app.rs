//! Menu loops for both front-ends

use std::io::stdout;
use std::time::Instant;

use anyhow::Result;

use super::args::Settings;
use super::canvas::{frame_duration, sleep_remaining, CanvasUi};
use super::console::ConsoleUi;
use super::frontend::Frontend;
use super::keys::{CrosstermEvents, KeyHandler, LogicalKey, TerminalKeys};
use super::menu::{ExitReason, MenuController, Transition};
use super::options::{primary_options, OptionsMenu, MENU_TITLE};
use crate::pipeline::ClassifierBackend;
use crate::utils::{print_farewell, print_info, print_success, setup_terminal, teardown_terminal};

/// Feed one key to the controller. A confirmed option is drawn with its
/// confirmation glyph before the handler runs.
pub fn apply_key<F: Frontend, B: ClassifierBackend>(
    controller: &mut MenuController,
    menu: &mut OptionsMenu<F, B>,
    key: LogicalKey,
) -> Result<Transition> {
    match controller.handle_key(key) {
        Transition::Dispatch => {
            menu.render(&controller.view())?;
            Ok(controller.dispatch_confirmed(menu))
        }
        other => Ok(other),
    }
}

/// Console loop: block for each key and redraw only when something changed
pub fn run_blocking<K: KeyHandler, F: Frontend, B: ClassifierBackend>(
    controller: &mut MenuController,
    menu: &mut OptionsMenu<F, B>,
    keys: &mut K,
) -> Result<ExitReason> {
    menu.render(&controller.view())?;
    loop {
        let key = keys.wait()?;
        match apply_key(controller, menu, key)? {
            Transition::Ignored => {}
            Transition::Redraw | Transition::Dispatch => menu.render(&controller.view())?,
            Transition::Exit(reason) => {
                keys.flush();
                return Ok(reason);
            }
        }
    }
}

/// Canvas loop: drain pending keys, redraw every frame, sleep the remainder
pub fn run_fixed_rate<K: KeyHandler, F: Frontend, B: ClassifierBackend>(
    controller: &mut MenuController,
    menu: &mut OptionsMenu<F, B>,
    keys: &mut K,
    frame_rate: u32,
) -> Result<ExitReason> {
    let frame_time = frame_duration(frame_rate);
    loop {
        let started = Instant::now();
        while let Some(key) = keys.poll()? {
            if let Transition::Exit(reason) = apply_key(controller, menu, key)? {
                keys.flush();
                return Ok(reason);
            }
        }

        menu.render(&controller.view())?;
        sleep_remaining(started, frame_time);
    }
}

fn say_goodbye(reason: ExitReason, notice: Option<&str>) {
    match (reason, notice) {
        (ExitReason::Saved, Some(message)) => print_success(message),
        (_, Some(message)) => print_info(message),
        _ => {}
    }
    print_farewell();
}

/// Run the text menu on stdout
pub fn run_console(settings: &Settings) -> Result<ExitReason> {
    let mut controller = MenuController::new(MENU_TITLE, primary_options())?;
    let mut menu = OptionsMenu::new(ConsoleUi::new(stdout()), settings.clone());
    let mut keys = TerminalKeys::blocking();

    let reason = run_blocking(&mut controller, &mut menu, &mut keys)?;
    say_goodbye(reason, controller.notice());
    Ok(reason)
}

/// Run the graphical menu in the alternate screen
pub fn run_canvas(settings: &Settings) -> Result<ExitReason> {
    let mut controller = MenuController::new(MENU_TITLE, primary_options())?;
    let terminal = setup_terminal()?;
    let ui = CanvasUi::new(terminal, CrosstermEvents, settings.frame_rate);
    let mut menu = OptionsMenu::new(ui, settings.clone());
    let mut keys = TerminalKeys::polling();

    let result = run_fixed_rate(&mut controller, &mut menu, &mut keys, settings.frame_rate);
    teardown_terminal();

    let reason = result?;
    say_goodbye(reason, controller.notice());
    Ok(reason)
}
