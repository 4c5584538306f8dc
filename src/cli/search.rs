//! Dataset search screen state: an input field filtering a candidate list

use std::cell::RefCell;
use std::rc::Rc;

use super::input_field::{InputField, INPUT_FIELD_MAX_LENGTH};
use super::keys::EditKey;

pub const MAX_RESULTS: usize = 10;
pub const SEARCH_PLACEHOLDER: &str = "Search...";

/// Case-insensitive substring match on the trimmed query. An empty query
/// keeps every candidate. At most `max` results are returned.
pub fn filter_candidates(query: &str, candidates: &[String], max: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    candidates
        .iter()
        .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
        .take(max)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Pending,
    Chosen(String),
    Cancelled,
}

/// Search state shared between the field callbacks and the screen
pub struct SearchScreen {
    field: InputField,
    results: Rc<RefCell<Vec<String>>>,
    chosen: Rc<RefCell<Option<String>>>,
}

impl SearchScreen {
    pub fn new(candidates: Vec<String>) -> Self {
        let results = Rc::new(RefCell::new(filter_candidates("", &candidates, MAX_RESULTS)));
        let chosen = Rc::new(RefCell::new(None));

        let filter_results = Rc::clone(&results);
        let submit_results = Rc::clone(&results);
        let submit_chosen = Rc::clone(&chosen);

        let field = InputField::new(INPUT_FIELD_MAX_LENGTH)
            .with_placeholder(SEARCH_PLACEHOLDER)
            .on_text_change(move |text| {
                *filter_results.borrow_mut() = filter_candidates(text, &candidates, MAX_RESULTS);
            })
            .on_submit(move |_| {
                if let Some(first) = submit_results.borrow().first() {
                    *submit_chosen.borrow_mut() = Some(first.clone());
                }
            });

        Self { field, results, chosen }
    }

    pub fn field(&self) -> &InputField {
        &self.field
    }

    pub fn results(&self) -> Vec<String> {
        self.results.borrow().clone()
    }

    pub fn handle_edit(&mut self, key: EditKey) -> SearchOutcome {
        match key {
            EditKey::Cancel => return SearchOutcome::Cancelled,
            EditKey::Submit => self.submit(),
            other => {
                self.field.apply(other);
            }
        }
        self.outcome()
    }

    /// Submit picks the first result. Without results it does nothing.
    pub fn submit(&mut self) {
        if !self.results.borrow().is_empty() {
            self.field.submit();
        }
    }

    /// Mouse click inside the input box, `x` relative to the text start.
    /// Focuses the field.
    pub fn click_input(&mut self, x: usize) {
        self.field.set_focused(true);
        self.field.set_cursor_from_click_x(x);
    }

    /// Mouse click outside the input box and the results
    pub fn click_outside(&mut self) {
        self.field.set_focused(false);
    }

    /// Mouse click on a result row
    pub fn click_result(&mut self, index: usize) -> SearchOutcome {
        match self.results.borrow().get(index) {
            Some(name) => SearchOutcome::Chosen(name.clone()),
            None => SearchOutcome::Pending,
        }
    }

    fn outcome(&self) -> SearchOutcome {
        match self.chosen.borrow_mut().take() {
            Some(name) => SearchOutcome::Chosen(name),
            None => SearchOutcome::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_is_trimmed_and_case_insensitive() {
        let candidates = names(&["Iris.csv", "wine.parquet", "iris_test.csv"]);
        assert_eq!(filter_candidates("  IRIS ", &candidates, 10), names(&["Iris.csv", "iris_test.csv"]));
        assert_eq!(filter_candidates("", &candidates, 10), candidates);
        assert_eq!(filter_candidates("", &candidates, 2).len(), 2);
    }

    #[test]
    fn test_typing_narrows_results() {
        let mut screen = SearchScreen::new(names(&["iris.csv", "wine.csv"]));
        assert_eq!(screen.results().len(), 2);
        for c in "wi".chars() {
            assert_eq!(screen.handle_edit(EditKey::Insert(c)), SearchOutcome::Pending);
        }
        assert_eq!(screen.results(), names(&["wine.csv"]));

        screen.handle_edit(EditKey::Backspace);
        screen.handle_edit(EditKey::Backspace);
        assert_eq!(screen.results().len(), 2);
    }

    #[test]
    fn test_submit_picks_first_result() {
        let mut screen = SearchScreen::new(names(&["b.csv", "a.csv"]));
        assert_eq!(screen.handle_edit(EditKey::Submit), SearchOutcome::Chosen("b.csv".into()));
    }

    #[test]
    fn test_submit_without_results_is_noop() {
        let mut screen = SearchScreen::new(names(&["a.csv"]));
        screen.handle_edit(EditKey::Insert('z'));
        assert!(screen.results().is_empty());
        assert_eq!(screen.handle_edit(EditKey::Submit), SearchOutcome::Pending);
    }

    #[test]
    fn test_blurred_field_ignores_typing() {
        let mut screen = SearchScreen::new(names(&["a.csv", "b.csv"]));
        screen.click_outside();
        assert!(!screen.field().is_focused());
        screen.handle_edit(EditKey::Insert('b'));
        assert_eq!(screen.field().text(), "");
        assert_eq!(screen.results().len(), 2);

        screen.click_input(0);
        screen.handle_edit(EditKey::Insert('b'));
        assert_eq!(screen.results(), names(&["b.csv"]));
    }

    #[test]
    fn test_cancel_and_click() {
        let mut screen = SearchScreen::new(names(&["a.csv", "b.csv"]));
        assert_eq!(screen.click_result(1), SearchOutcome::Chosen("b.csv".into()));
        assert_eq!(screen.click_result(5), SearchOutcome::Pending);
        assert_eq!(screen.handle_edit(EditKey::Cancel), SearchOutcome::Cancelled);
    }
}
