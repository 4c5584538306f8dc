//! Interactive prompts using dialoguer, plus the input validators they share
//! with the graphical front-end

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};

pub use crate::report::validate_file_name;

pub const INVALID_NUMBER: &str = "Invalid input. Please enter a valid decimal number.";
pub const INVALID_YES_NO: &str = "Please enter a valid response (y/n/yes/no)";
pub const INVALID_DATASET_CHOICE: &str = "Invalid choice. Enter a dataset name or its number.";

/// Parse a feature value typed by the user
pub fn parse_feature_value(input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(INVALID_NUMBER.to_string()),
    }
}

/// Accept y/yes/n/no in any letter case
pub fn parse_yes_no(input: &str) -> Result<bool, String> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err(INVALID_YES_NO.to_string()),
    }
}

/// Resolve a dataset by exact file name or by its 1-based position
pub fn resolve_dataset_choice(input: &str, datasets: &[String]) -> Result<String, String> {
    let input = input.trim();
    if let Some(name) = datasets.iter().find(|d| d.as_str() == input) {
        return Ok(name.clone());
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= datasets.len() => Ok(datasets[n - 1].clone()),
        _ => Err(INVALID_DATASET_CHOICE.to_string()),
    }
}

/// Prompt until `parse` accepts the input. Invalid input re-prompts with
/// the parser's message.
pub fn prompt_parsed<T>(prompt: &str, parse: impl Fn(&str) -> Result<T, String>) -> Result<T> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| parse(input).map(|_| ()))
        .interact_text()?;
    parse(&raw).map_err(|e| anyhow::anyhow!(e))
}

/// Ask a yes/no question
pub fn prompt_yes_no(prompt: &str) -> Result<bool> {
    prompt_parsed(prompt, parse_yes_no)
}

/// Ask for a decimal number
pub fn prompt_number(prompt: &str) -> Result<f64> {
    prompt_parsed(prompt, parse_feature_value)
}

/// Ask for a file name base (no extension)
pub fn prompt_file_name(prompt: &str) -> Result<String> {
    prompt_parsed(prompt, |input| validate_file_name(input).map(|_| input.trim().to_string()))
}

/// Wait for Enter
pub fn wait_for_enter(prompt: &str) -> Result<()> {
    let _: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_value() {
        assert_eq!(parse_feature_value(" 0.25 "), Ok(0.25));
        assert_eq!(parse_feature_value("-3"), Ok(-3.0));
        assert_eq!(parse_feature_value("abc"), Err(INVALID_NUMBER.to_string()));
        assert!(parse_feature_value("inf").is_err());
        assert!(parse_feature_value("").is_err());
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("Y"), Ok(true));
        assert_eq!(parse_yes_no("yes"), Ok(true));
        assert_eq!(parse_yes_no("NO"), Ok(false));
        assert!(parse_yes_no("maybe").is_err());
    }

    #[test]
    fn test_resolve_dataset_choice() {
        let datasets = vec!["a.csv".to_string(), "b.parquet".to_string()];
        assert_eq!(resolve_dataset_choice("2", &datasets), Ok("b.parquet".to_string()));
        assert_eq!(resolve_dataset_choice("a.csv", &datasets), Ok("a.csv".to_string()));
        assert!(resolve_dataset_choice("0", &datasets).is_err());
        assert!(resolve_dataset_choice("3", &datasets).is_err());
        assert!(resolve_dataset_choice("c.csv", &datasets).is_err());
    }
}
