//! Highlighted-option bookkeeping for a menu

use super::menu::MenuError;

/// The active option list, the highlighted index and the transient
/// "confirmed" flag. The index is always valid for the current list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    options: Vec<String>,
    selected: usize,
    confirmed: bool,
}

impl SelectionState {
    pub fn new(options: Vec<String>) -> Result<Self, MenuError> {
        if options.is_empty() {
            return Err(MenuError::EmptyOptions);
        }
        Ok(Self {
            options,
            selected: 0,
            confirmed: false,
        })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn selected_label(&self) -> &str {
        &self.options[self.selected]
    }

    pub fn move_up(&mut self) {
        self.selected = (self.selected + self.options.len() - 1) % self.options.len();
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % self.options.len();
    }

    /// Swap in a new option list and reset the index. An empty list is
    /// rejected and leaves the state untouched.
    pub fn replace(&mut self, options: Vec<String>) -> Result<(), MenuError> {
        if options.is_empty() {
            return Err(MenuError::EmptyOptions);
        }
        self.options = options;
        self.selected = 0;
        self.confirmed = false;
        Ok(())
    }

    pub fn reset_index(&mut self) {
        self.selected = 0;
    }

    pub fn arm(&mut self) {
        self.confirmed = true;
    }

    pub fn disarm(&mut self) {
        self.confirmed = false;
    }
}
