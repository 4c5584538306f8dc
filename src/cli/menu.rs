//! Menu state machine
//!
//! `MenuController` owns the selection and reacts to logical keys. Confirming
//! an option hands its label to a [`MenuHandler`], whose [`Dispatch`] answer
//! decides which option set is shown next. Context switches are applied
//! before the controller returns, so the next render always shows the new
//! list.

use std::fmt;

use thiserror::Error;

use super::keys::LogicalKey;
use super::render::MenuView;
use super::selection::SelectionState;

/// The named option set currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuContext {
    Primary,
    TrainSelect,
    EvaluateSelect,
}

impl MenuContext {
    pub fn instruction(&self) -> &'static str {
        match self {
            MenuContext::Primary => "Select an option:",
            MenuContext::TrainSelect => "Select a model to train:",
            MenuContext::EvaluateSelect => "Select a model to evaluate:",
        }
    }
}

impl fmt::Display for MenuContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuContext::Primary => "main menu",
            MenuContext::TrainSelect => "train menu",
            MenuContext::EvaluateSelect => "evaluate menu",
        };
        f.write_str(name)
    }
}

/// Why the menu session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Cancel key pressed
    Quit,
    /// Progress saved, session closed
    Saved,
}

impl ExitReason {
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitReason::Quit => 0,
            ExitReason::Saved => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Primary,
    TrainSelect,
    EvaluateSelect,
    /// Confirmed frame shown, dispatch pending for the given context
    Confirming(MenuContext),
    Exiting(ExitReason),
}

impl From<MenuContext> for MenuState {
    fn from(context: MenuContext) -> Self {
        match context {
            MenuContext::Primary => MenuState::Primary,
            MenuContext::TrainSelect => MenuState::TrainSelect,
            MenuContext::EvaluateSelect => MenuState::EvaluateSelect,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("A menu needs at least one option")]
    EmptyOptions,

    #[error("Nothing to show in the {0}")]
    EmptyContext(MenuContext),
}

/// What the controller should do after a confirmed option was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextMenu {
    /// Back to the context the option was picked from, index reset
    Origin,
    /// To the primary context, index reset
    Primary,
    /// Switch to another context
    Context(MenuContext),
    /// Precondition failed: keep options and index as they are
    Unchanged,
    Exit(ExitReason),
}

/// A handler's answer to a confirmed option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub next: NextMenu,
    pub notice: Option<String>,
}

impl Dispatch {
    pub fn origin() -> Self {
        Self::to(NextMenu::Origin)
    }

    pub fn primary() -> Self {
        Self::to(NextMenu::Primary)
    }

    pub fn enter(context: MenuContext) -> Self {
        Self::to(NextMenu::Context(context))
    }

    pub fn exit(reason: ExitReason) -> Self {
        Self::to(NextMenu::Exit(reason))
    }

    /// Reject the option with a guidance message
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::to(NextMenu::Unchanged).with_notice(message)
    }

    pub fn with_notice(mut self, message: impl Into<String>) -> Self {
        self.notice = Some(message.into());
        self
    }

    fn to(next: NextMenu) -> Self {
        Self { next, notice: None }
    }
}

/// Application side of the menu: supplies option lists and performs the
/// side effects of confirmed options.
pub trait MenuHandler {
    fn options_for(&self, context: MenuContext) -> Vec<String>;

    fn dispatch(&mut self, context: MenuContext, label: &str) -> anyhow::Result<Dispatch>;
}

/// Outcome of feeding one key to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    Redraw,
    /// Render the confirmed frame, then call `dispatch_confirmed`
    Dispatch,
    Exit(ExitReason),
}

#[derive(Debug, Clone)]
pub struct MenuController {
    title: String,
    state: MenuState,
    context: MenuContext,
    selection: SelectionState,
    notice: Option<String>,
}

impl MenuController {
    pub fn new(title: impl Into<String>, primary_options: Vec<String>) -> Result<Self, MenuError> {
        let selection = SelectionState::new(primary_options).map_err(|_| MenuError::EmptyContext(MenuContext::Primary))?;
        Ok(Self {
            title: title.into(),
            state: MenuState::Primary,
            context: MenuContext::Primary,
            selection,
            notice: None,
        })
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn context(&self) -> MenuContext {
        self.context
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.state, MenuState::Exiting(_))
    }

    pub fn handle_key(&mut self, key: LogicalKey) -> Transition {
        if self.is_exiting() {
            return Transition::Ignored;
        }

        if key == LogicalKey::Cancel {
            log::debug!("cancel in {:?}", self.state);
            self.state = MenuState::Exiting(ExitReason::Quit);
            return Transition::Exit(ExitReason::Quit);
        }

        if matches!(self.state, MenuState::Confirming(_)) {
            return Transition::Ignored;
        }

        match key {
            LogicalKey::Up => {
                self.notice = None;
                self.selection.move_up();
                Transition::Redraw
            }
            LogicalKey::Down => {
                self.notice = None;
                self.selection.move_down();
                Transition::Redraw
            }
            LogicalKey::Confirm => {
                self.notice = None;
                self.selection.arm();
                self.state = MenuState::Confirming(self.context);
                Transition::Dispatch
            }
            LogicalKey::Cancel | LogicalKey::Char(_) => Transition::Ignored,
        }
    }

    /// Run the handler for the confirmed option and apply its answer.
    ///
    /// Handler errors are shown as a notice and leave the menu as it was.
    pub fn dispatch_confirmed<H: MenuHandler + ?Sized>(&mut self, handler: &mut H) -> Transition {
        let MenuState::Confirming(origin) = self.state else {
            return Transition::Ignored;
        };

        let label = self.selection.selected_label().to_string();
        self.selection.disarm();
        log::info!("dispatching '{}' from {}", label, origin);

        let dispatch = match handler.dispatch(origin, &label) {
            Ok(dispatch) => dispatch,
            Err(e) => {
                log::warn!("'{}' failed: {:#}", label, e);
                Dispatch::rejected(format!("{:#}", e))
            }
        };
        self.notice = dispatch.notice;

        match dispatch.next {
            NextMenu::Origin => self.enter_or_primary(origin, handler),
            NextMenu::Primary => self.enter_or_primary(MenuContext::Primary, handler),
            NextMenu::Context(context) => {
                if let Err(e) = self.set_context(context, handler.options_for(context)) {
                    self.notice = Some(e.to_string());
                    self.state = origin.into();
                }
            }
            NextMenu::Unchanged => self.state = origin.into(),
            NextMenu::Exit(reason) => {
                self.state = MenuState::Exiting(reason);
                return Transition::Exit(reason);
            }
        }

        log::debug!("now in {:?} at index {}", self.state, self.selection.selected());
        Transition::Redraw
    }

    /// Replace the active option set and reset the index. An empty list is
    /// rejected and nothing changes.
    pub fn set_context(&mut self, context: MenuContext, options: Vec<String>) -> Result<(), MenuError> {
        self.selection
            .replace(options)
            .map_err(|_| MenuError::EmptyContext(context))?;
        self.context = context;
        if !self.is_exiting() {
            self.state = context.into();
        }
        Ok(())
    }

    fn enter_or_primary<H: MenuHandler + ?Sized>(&mut self, context: MenuContext, handler: &mut H) {
        if self.set_context(context, handler.options_for(context)).is_err() {
            // The origin list can empty out (e.g. no trained models left)
            let primary = handler.options_for(MenuContext::Primary);
            if let Err(e) = self.set_context(MenuContext::Primary, primary) {
                self.notice = Some(e.to_string());
                self.selection.reset_index();
                self.state = self.context.into();
            }
        }
    }

    /// Snapshot for renderers
    pub fn view(&self) -> MenuView {
        MenuView {
            title: self.title.clone(),
            options: self.selection.options().to_vec(),
            selected: self.selection.selected(),
            confirmed: self.selection.confirmed(),
            instruction: self.context.instruction().to_string(),
            notice: self.notice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl MenuHandler for Fixed {
        fn options_for(&self, context: MenuContext) -> Vec<String> {
            match context {
                MenuContext::Primary => vec!["a".into(), "b".into(), "c".into()],
                MenuContext::TrainSelect => vec!["x".into(), "y".into()],
                MenuContext::EvaluateSelect => vec![],
            }
        }

        fn dispatch(&mut self, _context: MenuContext, label: &str) -> anyhow::Result<Dispatch> {
            match label {
                "a" => Ok(Dispatch::enter(MenuContext::TrainSelect)),
                "b" => Ok(Dispatch::enter(MenuContext::EvaluateSelect)),
                "c" => anyhow::bail!("boom"),
                _ => Ok(Dispatch::primary()),
            }
        }
    }

    fn controller() -> MenuController {
        MenuController::new("T", Fixed.options_for(MenuContext::Primary)).unwrap()
    }

    #[test]
    fn test_confirm_arms_then_dispatch_disarms() {
        let mut c = controller();
        assert_eq!(c.handle_key(LogicalKey::Confirm), Transition::Dispatch);
        assert!(c.view().confirmed);
        assert_eq!(c.state(), MenuState::Confirming(MenuContext::Primary));

        c.dispatch_confirmed(&mut Fixed);
        assert!(!c.view().confirmed);
        assert_eq!(c.state(), MenuState::TrainSelect);
    }

    #[test]
    fn test_keys_ignored_while_confirming() {
        let mut c = controller();
        c.handle_key(LogicalKey::Confirm);
        assert_eq!(c.handle_key(LogicalKey::Down), Transition::Ignored);
        assert_eq!(c.selection().selected(), 0);
    }

    #[test]
    fn test_handler_error_becomes_notice() {
        let mut c = controller();
        c.handle_key(LogicalKey::Up);
        c.handle_key(LogicalKey::Confirm);
        c.dispatch_confirmed(&mut Fixed);

        assert_eq!(c.notice(), Some("boom"));
        assert_eq!(c.state(), MenuState::Primary);
        assert_eq!(c.selection().selected(), 2);
    }

    #[test]
    fn test_notice_cleared_by_next_key() {
        let mut c = controller();
        c.handle_key(LogicalKey::Down);
        c.handle_key(LogicalKey::Confirm);
        c.dispatch_confirmed(&mut Fixed);
        assert!(c.notice().is_some());

        c.handle_key(LogicalKey::Down);
        assert_eq!(c.notice(), None);
    }

    #[test]
    fn test_char_keys_ignored() {
        let mut c = controller();
        assert_eq!(c.handle_key(LogicalKey::Char('x')), Transition::Ignored);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitReason::Quit.exit_code(), 0);
        assert_ne!(ExitReason::Saved.exit_code(), 0);
    }
}
