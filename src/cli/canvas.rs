//! Graphical front-end drawn with ratatui
//!
//! The menu frame, dataset search, report viewer and text prompts are all
//! full-screen views. Nested views run their own fixed-rate loop until they
//! produce a result, after which control returns to the menu loop.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::frontend::Frontend;
use super::input_field::{InputField, INPUT_FIELD_MAX_LENGTH};
use super::keys::{map_edit_event, map_key_event, CrosstermEvents, EditKey, EventSource, LogicalKey};
use super::prompts::{parse_feature_value, parse_yes_no, validate_file_name};
use super::render::{MenuView, Renderer, QUIT_HINT};
use super::search::{SearchOutcome, SearchScreen, MAX_RESULTS};

pub const FRAME_RATE: u32 = 60;
const APP_TITLE: &str = " modelmenu ";

/// Duration of one frame at `frame_rate` frames per second
pub fn frame_duration(frame_rate: u32) -> Duration {
    Duration::from_secs(1) / frame_rate.max(1)
}

/// Sleep away whatever is left of the frame that began at `started`
pub fn sleep_remaining(started: Instant, frame: Duration) {
    if let Some(rest) = frame.checked_sub(started.elapsed()) {
        std::thread::sleep(rest);
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).bold())
        .title_alignment(Alignment::Center)
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))).alignment(Alignment::Center)
}

/// Input text with the character under the cursor highlighted, or a block
/// cursor past the end. Text keeps its columns so clicks map back directly.
/// An unfocused field shows no cursor.
fn field_line(field: &InputField) -> Line<'static> {
    if !field.is_focused() {
        let (text, color) = if field.is_empty() {
            (field.placeholder().to_string(), Color::DarkGray)
        } else {
            (field.text().to_string(), Color::Gray)
        };
        return Line::from(Span::styled(text, Style::default().fg(color)));
    }

    if field.is_empty() {
        return Line::from(vec![
            Span::styled("▌", Style::default().fg(Color::Yellow)),
            Span::styled(field.placeholder().to_string(), Style::default().fg(Color::DarkGray)),
        ]);
    }

    let chars: Vec<char> = field.text().chars().collect();
    let cursor = field.cursor();
    let before: String = chars[..cursor].iter().collect();
    let mut spans = vec![Span::styled(before, Style::default().fg(Color::White))];

    if cursor < chars.len() {
        let under: String = chars[cursor..cursor + 1].iter().collect();
        let after: String = chars[cursor + 1..].iter().collect();
        spans.push(Span::styled(under, Style::default().fg(Color::Black).bg(Color::Yellow)));
        spans.push(Span::styled(after, Style::default().fg(Color::White)));
    } else {
        spans.push(Span::styled("▌", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

/// Draw the menu frame
pub fn draw_menu(frame: &mut Frame, view: &MenuView) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(APP_TITLE)
        .title_style(Style::default().fg(Color::Cyan).bold())
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let notice_height = if view.notice.is_some() { 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                          // Padding
            Constraint::Length(1),                          // Title
            Constraint::Length(1),                          // Instruction
            Constraint::Length(1),                          // Padding
            Constraint::Min(view.options.len() as u16),     // Options
            Constraint::Length(notice_height),              // Notice
            Constraint::Length(1),                          // Quit hint
        ])
        .split(inner);

    let title = Paragraph::new(Line::from(Span::styled(
        view.title.clone(),
        Style::default().fg(Color::White).bold(),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[1]);

    let instruction = Paragraph::new(Line::from(Span::styled(
        view.instruction.clone(),
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(instruction, chunks[2]);

    let rows: Vec<Line> = view
        .options
        .iter()
        .enumerate()
        .map(|(i, label)| {
            if i == view.selected {
                let marker = if view.confirmed {
                    Span::styled("✓ ", Style::default().fg(Color::Green).bold())
                } else {
                    Span::styled("▶ ", Style::default().fg(Color::Red).bold())
                };
                Line::from(vec![
                    marker,
                    Span::styled(
                        format!(" {}. {} ", i + 1, label),
                        Style::default().fg(Color::Black).bg(Color::Green).bold(),
                    ),
                ])
            } else {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!(" {}. {} ", i + 1, label), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(rows).alignment(Alignment::Center), chunks[4]);

    if let Some(notice) = &view.notice {
        let notice = Paragraph::new(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(notice, chunks[5]);
    }

    frame.render_widget(hint(QUIT_HINT), chunks[6]);
}

fn draw_busy(frame: &mut Frame, message: &str) {
    let popup_area = centered(frame.area(), (message.chars().count() as u16).saturating_add(8).max(30), 5);
    frame.render_widget(Clear, popup_area);
    let block = popup_block(" Working ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Yellow))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(text, inner);
}

/// A nested full-screen view with its own event handling
trait Screen {
    type Output;

    fn draw(&mut self, frame: &mut Frame);

    /// `Some` once the view is finished
    fn handle_event(&mut self, event: &Event) -> Option<Self::Output>;
}

/// Dataset picker: search box with a filtered result list
struct SearchView {
    search: SearchScreen,
    input_area: Rect,
    results_area: Rect,
}

impl SearchView {
    fn new(candidates: Vec<String>) -> Self {
        Self {
            search: SearchScreen::new(candidates),
            input_area: Rect::default(),
            results_area: Rect::default(),
        }
    }

    fn finish(outcome: SearchOutcome) -> Option<Option<String>> {
        match outcome {
            SearchOutcome::Pending => None,
            SearchOutcome::Chosen(name) => Some(Some(name)),
            SearchOutcome::Cancelled => Some(None),
        }
    }
}

impl Screen for SearchView {
    type Output = Option<String>;

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let popup_area = centered(area, 64, MAX_RESULTS as u16 + 8);
        let block = popup_block(" Load dataset ");
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search box
                Constraint::Min(1),    // Results
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let border = if self.search.field().is_focused() {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let search_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search ")
            .title_style(Style::default().fg(Color::DarkGray));
        self.input_area = search_block.inner(chunks[0]);
        frame.render_widget(Paragraph::new(field_line(self.search.field())).block(search_block), chunks[0]);

        let results = self.search.results();
        self.results_area = chunks[1];
        if results.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "  No matching datasets",
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(empty, chunks[1]);
        } else {
            let items: Vec<ListItem> = results
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let style = if i == 0 {
                        Style::default().fg(Color::Black).bg(Color::Green).bold()
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(format!("  {}", name)).style(style)
                })
                .collect();
            frame.render_widget(List::new(items), chunks[1]);
        }

        frame.render_widget(hint("Type to filter • Enter select first • Click to select • Esc back"), chunks[2]);
    }

    fn handle_event(&mut self, event: &Event) -> Option<Self::Output> {
        match event {
            Event::Key(key) => {
                let edit = map_edit_event(key)?;
                Self::finish(self.search.handle_edit(edit))
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if contains(self.input_area, mouse.column, mouse.row) {
                    self.search.click_input(usize::from(mouse.column - self.input_area.x));
                    None
                } else if contains(self.results_area, mouse.column, mouse.row) {
                    Self::finish(self.search.click_result(usize::from(mouse.row - self.results_area.y)))
                } else {
                    self.search.click_outside();
                    None
                }
            }
            _ => None,
        }
    }
}

/// Scrollable text report, closed with Enter or Esc
struct ReportView {
    title: String,
    lines: Vec<String>,
    scroll: u16,
}

impl ReportView {
    fn new(title: &str, report: &str) -> Self {
        Self {
            title: format!(" {} ", title),
            lines: report.lines().map(str::to_string).collect(),
            scroll: 0,
        }
    }
}

impl Screen for ReportView {
    type Output = ();

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let block = popup_block(&self.title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let lines: Vec<Line> = self.lines.iter().map(|l| Line::from(l.as_str())).collect();
        frame.render_widget(Paragraph::new(lines).scroll((self.scroll, 0)), chunks[0]);
        frame.render_widget(hint("↑/↓ Scroll • Enter continue"), chunks[1]);
    }

    fn handle_event(&mut self, event: &Event) -> Option<Self::Output> {
        let Event::Key(key) = event else {
            return None;
        };
        match map_key_event(key)? {
            LogicalKey::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            LogicalKey::Down => {
                let max = u16::try_from(self.lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
                self.scroll = self.scroll.saturating_add(1).min(max);
                None
            }
            LogicalKey::Confirm | LogicalKey::Cancel => Some(()),
            LogicalKey::Char(_) => None,
        }
    }
}

type Parser<T> = Box<dyn Fn(&str) -> Result<T, String>>;

/// Single-line prompt that re-asks until the parser accepts
struct PromptView<T> {
    prompt: String,
    field: InputField,
    parse: Parser<T>,
    error: Option<String>,
}

impl<T> PromptView<T> {
    fn new(prompt: &str, parse: impl Fn(&str) -> Result<T, String> + 'static) -> Self {
        Self {
            prompt: prompt.to_string(),
            field: InputField::new(INPUT_FIELD_MAX_LENGTH),
            parse: Box::new(parse),
            error: None,
        }
    }
}

impl<T> Screen for PromptView<T> {
    /// `None` when the prompt was cancelled
    type Output = Option<T>;

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let width = (self.prompt.chars().count() as u16).saturating_add(6).clamp(40, 90);
        let popup_area = centered(area, width, 9);
        let block = popup_block(" Input ");
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Prompt
                Constraint::Length(3), // Input box
                Constraint::Length(1), // Error
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let prompt = Paragraph::new(Line::from(Span::styled(
            self.prompt.clone(),
            Style::default().fg(Color::White).bold(),
        )))
        .wrap(Wrap { trim: true });
        frame.render_widget(prompt, chunks[0]);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        frame.render_widget(Paragraph::new(field_line(&self.field)).block(input_block), chunks[1]);

        if let Some(error) = &self.error {
            let error = Paragraph::new(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
            frame.render_widget(error, chunks[2]);
        }

        frame.render_widget(hint("Enter submit • Esc cancel"), chunks[3]);
    }

    fn handle_event(&mut self, event: &Event) -> Option<Self::Output> {
        let Event::Key(key) = event else {
            return None;
        };
        match map_edit_event(key)? {
            EditKey::Submit => match (self.parse)(self.field.text()) {
                Ok(value) => Some(Some(value)),
                Err(message) => {
                    self.error = Some(message);
                    None
                }
            },
            EditKey::Cancel => Some(None),
            other => {
                self.field.apply(other);
                None
            }
        }
    }
}

/// Full-screen graphical UI over any ratatui backend
pub struct CanvasUi<B: Backend, S: EventSource = CrosstermEvents> {
    terminal: Terminal<B>,
    events: S,
    frame_rate: u32,
}

impl<B: Backend, S: EventSource> CanvasUi<B, S> {
    pub fn new(terminal: Terminal<B>, events: S, frame_rate: u32) -> Self {
        Self {
            terminal,
            events,
            frame_rate,
        }
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn events(&self) -> &S {
        &self.events
    }

    /// Run a nested view at the frame rate until it yields a result
    fn run_screen<V: Screen>(&mut self, screen: &mut V) -> Result<V::Output> {
        let frame_time = frame_duration(self.frame_rate);
        loop {
            let started = Instant::now();
            self.terminal.draw(|frame| screen.draw(frame))?;

            while let Some(event) = self.events.poll_event()? {
                if let Some(output) = screen.handle_event(&event) {
                    return Ok(output);
                }
            }

            sleep_remaining(started, frame_time);
        }
    }

    fn ask<T: 'static>(&mut self, prompt: &str, parse: impl Fn(&str) -> Result<T, String> + 'static) -> Result<T> {
        let mut view = PromptView::new(prompt, parse);
        match self.run_screen(&mut view)? {
            Some(value) => Ok(value),
            None => bail!("Input cancelled"),
        }
    }
}

impl<B: Backend, S: EventSource> Renderer for CanvasUi<B, S> {
    fn render(&mut self, view: &MenuView) -> Result<()> {
        self.terminal.draw(|frame| draw_menu(frame, view))?;
        Ok(())
    }
}

impl<B: Backend, S: EventSource> Frontend for CanvasUi<B, S> {
    fn choose_dataset(&mut self, datasets: &[String]) -> Result<Option<String>> {
        let mut view = SearchView::new(datasets.to_vec());
        self.run_screen(&mut view)
    }

    fn show_report(&mut self, title: &str, report: &str) -> Result<()> {
        let mut view = ReportView::new(title, report);
        self.run_screen(&mut view)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.ask(prompt, parse_yes_no)
    }

    fn read_number(&mut self, prompt: &str) -> Result<f64> {
        self.ask(prompt, parse_feature_value)
    }

    fn read_file_name(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt, |input| validate_file_name(input).map(|_| input.trim().to_string()))
    }

    fn busy<T>(&mut self, message: &str, work: impl FnOnce() -> T) -> T {
        if let Err(e) = self.terminal.draw(|frame| draw_busy(frame, message)) {
            log::warn!("failed to draw busy indicator: {}", e);
        }
        work()
    }
}
