//! Single-line text entry widget with change and submit callbacks

use unicode_width::UnicodeWidthChar;

use super::keys::EditKey;

/// Default cap on the number of characters a field accepts
pub const INPUT_FIELD_MAX_LENGTH: usize = 100;

type TextCallback = Box<dyn FnMut(&str)>;

/// Text plus a cursor measured in characters. The cursor never exceeds the
/// text length.
///
/// `on_text_change` runs synchronously after every mutation that actually
/// changed the text and never for a no-op.
pub struct InputField {
    text: String,
    cursor: usize,
    focused: bool,
    max_length: usize,
    placeholder: String,
    on_text_change: Option<TextCallback>,
    on_submit: Option<TextCallback>,
}

impl Default for InputField {
    fn default() -> Self {
        Self::new(INPUT_FIELD_MAX_LENGTH)
    }
}

impl InputField {
    pub fn new(max_length: usize) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            focused: true,
            max_length,
            placeholder: String::new(),
            on_text_change: None,
            on_submit: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn on_text_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_text_change = Some(Box::new(callback));
        self
    }

    pub fn on_submit(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_submit = Some(Box::new(callback));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Display width of the text before the cursor
    pub fn cursor_offset(&self) -> usize {
        self.text
            .chars()
            .take(self.cursor)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    /// Insert a character at `position` (clamped) and place the cursor after
    /// it. Returns false when the field is full.
    pub fn insert_at(&mut self, position: usize, ch: char) -> bool {
        if self.len() >= self.max_length {
            return false;
        }
        let position = position.min(self.len());
        let byte = self.byte_index(position);
        self.text.insert(byte, ch);
        self.cursor = position + 1;
        self.text_changed();
        true
    }

    /// Insert at the cursor
    pub fn insert(&mut self, ch: char) -> bool {
        self.insert_at(self.cursor, ch)
    }

    /// Backspace. Returns false at the start of the text.
    pub fn delete_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let byte = self.byte_index(self.cursor - 1);
        self.text.remove(byte);
        self.cursor -= 1;
        self.text_changed();
        true
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, self.len() as isize) as usize;
    }

    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.len());
    }

    /// Place the cursor at the last character boundary whose cumulative
    /// display width does not exceed `x`.
    pub fn set_cursor_from_click_x(&mut self, x: usize) {
        let mut width = 0;
        let mut position = 0;
        for (i, c) in self.text.chars().enumerate() {
            width += c.width().unwrap_or(0);
            if width > x {
                break;
            }
            position = i + 1;
        }
        self.cursor = position;
    }

    /// Replace the text, truncated to `max_length`, with the cursor at the end
    pub fn set_text(&mut self, text: &str) {
        let truncated: String = text.chars().take(self.max_length).collect();
        let changed = truncated != self.text;
        self.text = truncated;
        self.cursor = self.len();
        if changed {
            self.text_changed();
        }
    }

    pub fn submit(&mut self) {
        if let Some(callback) = self.on_submit.as_mut() {
            callback(&self.text);
        }
    }

    /// Apply an edit key. Returns true when the text changed.
    ///
    /// `Submit` and `Cancel` are left to the owning screen. An unfocused
    /// field ignores every key.
    pub fn apply(&mut self, key: EditKey) -> bool {
        if !self.focused {
            return false;
        }
        match key {
            EditKey::Insert(c) => self.insert(c),
            EditKey::Backspace => self.delete_before_cursor(),
            EditKey::Left => {
                self.move_cursor(-1);
                false
            }
            EditKey::Right => {
                self.move_cursor(1);
                false
            }
            EditKey::Home => {
                self.cursor = 0;
                false
            }
            EditKey::End => {
                self.cursor = self.len();
                false
            }
            EditKey::Submit | EditKey::Cancel => false,
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn text_changed(&mut self) {
        if let Some(callback) = self.on_text_change.as_mut() {
            callback(&self.text);
        }
    }
}

impl std::fmt::Debug for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputField")
            .field("text", &self.text)
            .field("cursor", &self.cursor)
            .field("focused", &self.focused)
            .field("max_length", &self.max_length)
            .finish()
    }
}
