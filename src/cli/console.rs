//! Scrolling-text front-end: clears and reprints the whole frame each render

use std::io::Write;

use anyhow::Result;
use console::style;

use super::frontend::Frontend;
use super::prompts::{prompt_file_name, prompt_number, prompt_parsed, prompt_yes_no, resolve_dataset_choice, wait_for_enter};
use super::render::{format_console_frame, MenuView, Renderer};
use crate::utils::{clear_screen, create_spinner, finish_and_clear, flush_input, format_choice, print_section_header};

pub struct ConsoleUi<W: Write> {
    out: W,
}

impl<W: Write> ConsoleUi<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for ConsoleUi<W> {
    fn render(&mut self, view: &MenuView) -> Result<()> {
        clear_screen(&mut self.out)?;
        writeln!(self.out, "{}", format_console_frame(view))?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Frontend for ConsoleUi<W> {
    fn choose_dataset(&mut self, datasets: &[String]) -> Result<Option<String>> {
        flush_input();
        print_section_header("Available datasets");
        for (i, name) in datasets.iter().enumerate() {
            println!("{}", format_choice(i, name));
        }
        println!();

        let choice = prompt_parsed("Enter the dataset name or number", |input| {
            resolve_dataset_choice(input, datasets)
        })?;
        Ok(Some(choice))
    }

    fn show_report(&mut self, title: &str, report: &str) -> Result<()> {
        clear_screen(&mut self.out)?;
        writeln!(self.out, "{}", style(title).cyan().bold())?;
        writeln!(self.out, "{}", report)?;
        self.out.flush()?;
        flush_input();
        wait_for_enter("Press Enter to continue...")
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        flush_input();
        prompt_yes_no(prompt)
    }

    fn read_number(&mut self, prompt: &str) -> Result<f64> {
        flush_input();
        prompt_number(prompt)
    }

    fn read_file_name(&mut self, prompt: &str) -> Result<String> {
        flush_input();
        prompt_file_name(prompt)
    }

    fn busy<T>(&mut self, message: &str, work: impl FnOnce() -> T) -> T {
        let spinner = create_spinner(message);
        let result = work();
        finish_and_clear(&spinner);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_writes_full_frame_each_time() {
        let view = MenuView {
            title: "Train a model".into(),
            options: vec!["Load dataset".into()],
            selected: 0,
            confirmed: false,
            instruction: "Select an option:".into(),
            notice: None,
        };

        let mut ui = ConsoleUi::new(Vec::new());
        ui.render(&view).unwrap();
        let first = String::from_utf8(ui.into_inner()).unwrap();

        let mut ui = ConsoleUi::new(Vec::new());
        ui.render(&view).unwrap();
        ui.render(&view).unwrap();
        let twice = String::from_utf8(ui.into_inner()).unwrap();

        assert!(first.contains("→  1.  Load dataset"));
        assert!(first.contains("Press Esc to quit"));
        assert_eq!(twice, first.repeat(2));
    }
}
