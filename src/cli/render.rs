//! Renderer contract and the console frame layout

use anyhow::Result;

/// Glyph before the highlighted row
pub const SELECTOR_GLYPH: &str = "→";
/// Glyph before the highlighted row once it was confirmed
pub const CONFIRMED_GLYPH: &str = "✓";
pub const QUIT_HINT: &str = "Press Esc to quit";

/// Everything a renderer needs to draw one menu frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub title: String,
    pub options: Vec<String>,
    pub selected: usize,
    pub confirmed: bool,
    pub instruction: String,
    pub notice: Option<String>,
}

/// Draws a full menu frame. Every call redraws from scratch, so rendering
/// the same view twice produces the same output.
pub trait Renderer {
    fn render(&mut self, view: &MenuView) -> Result<()>;
}

/// Title line framed by `=` runs as wide as the title
pub fn format_title(title: &str) -> String {
    let separator = "=".repeat(title.chars().count());
    format!("{} {} {}", separator, title, separator)
}

/// One option row: glyph, 1-based number, label
pub fn format_option_row(index: usize, label: &str, view: &MenuView) -> String {
    let glyph = if index != view.selected {
        " "
    } else if view.confirmed {
        CONFIRMED_GLYPH
    } else {
        SELECTOR_GLYPH
    };
    format!("{}  {}.  {}", glyph, index + 1, label)
}

/// The complete console frame as text
pub fn format_console_frame(view: &MenuView) -> String {
    let mut lines = Vec::with_capacity(view.options.len() + 6);

    if let Some(notice) = &view.notice {
        lines.push(notice.clone());
        lines.push(String::new());
    }

    lines.push(format_title(&view.title));
    lines.push(view.instruction.clone());
    for (i, option) in view.options.iter().enumerate() {
        lines.push(format_option_row(i, option, view));
    }
    lines.push(String::new());
    lines.push(QUIT_HINT.to_string());
    lines.push(String::new());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(selected: usize, confirmed: bool) -> MenuView {
        MenuView {
            title: "Train a model".into(),
            options: vec!["Load dataset".into(), "Train model".into()],
            selected,
            confirmed,
            instruction: "Select an option:".into(),
            notice: None,
        }
    }

    #[test]
    fn test_title_is_framed() {
        assert_eq!(format_title("abc"), "=== abc ===");
    }

    #[test]
    fn test_frame_layout() {
        let frame = format_console_frame(&view(1, false));
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[0], "============= Train a model =============");
        assert_eq!(lines[1], "Select an option:");
        assert_eq!(lines[2], "   1.  Load dataset");
        assert_eq!(lines[3], "→  2.  Train model");
        assert_eq!(lines[5], "Press Esc to quit");
    }

    #[test]
    fn test_confirmed_glyph() {
        let frame = format_console_frame(&view(0, true));
        assert!(frame.contains("✓  1.  Load dataset"));
        assert!(!frame.contains(SELECTOR_GLYPH));
    }

    #[test]
    fn test_notice_comes_first() {
        let mut v = view(0, false);
        v.notice = Some("No dataset loaded. Please load a dataset first.".into());
        let frame = format_console_frame(&v);
        assert!(frame.starts_with("No dataset loaded."));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let v = view(1, false);
        assert_eq!(format_console_frame(&v), format_console_frame(&v));
    }
}
