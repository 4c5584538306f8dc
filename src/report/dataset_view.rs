//! Plain-text dataset report: preview rows and basic statistics

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, Table};

use crate::pipeline::{ColumnStatistics, Dataset, Split};

/// Render the dataset report shown after loading.
///
/// The text carries no terminal styling so the same report can be printed
/// to the console or drawn on the canvas.
pub fn render_dataset_report(dataset: &Dataset) -> String {
    let mut out = String::new();

    out.push_str(&format!("Dataset: {}\n", dataset.path));
    if !dataset.loaded {
        out.push_str(&format!("Failed to load dataset: {}\n", dataset.message));
        return out;
    }
    out.push_str(&format!("{}\n", dataset.message));
    out.push_str(&format!(
        "Features: {} | Target: {}\n",
        dataset.feature_names.join(", "),
        dataset.target_name
    ));

    for (name, split) in [("Train", &dataset.train), ("Test", &dataset.test)] {
        out.push('\n');
        out.push_str(&format!("First {} Rows ({} set):\n", split.preview.len(), name));
        out.push_str(&preview_table(split).to_string());
        out.push('\n');
    }

    for (name, split) in [("Train", &dataset.train), ("Test", &dataset.test)] {
        out.push('\n');
        out.push_str(&format!("Basic Statistics ({} set):\n", name));
        out.push_str(&statistics_table(&split.statistics).to_string());
        out.push('\n');
    }

    out
}

fn preview_table(split: &Split) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(split.columns.iter().map(Cell::new));
    for row in &split.preview {
        table.add_row(row.iter().map(Cell::new));
    }
    table
}

fn statistics_table(statistics: &[ColumnStatistics]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Column", "Type", "Count", "Missing", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"]);

    for stats in statistics {
        table.add_row(vec![
            Cell::new(&stats.name),
            Cell::new(&stats.dtype),
            Cell::new(stats.count).set_alignment(CellAlignment::Right),
            Cell::new(stats.missing).set_alignment(CellAlignment::Right),
            number_cell(stats.mean),
            number_cell(stats.std),
            number_cell(stats.min),
            number_cell(stats.q25),
            number_cell(stats.median),
            number_cell(stats.q75),
            number_cell(stats.max),
        ]);
    }
    table
}

fn number_cell(value: Option<f64>) -> Cell {
    let text = value.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string());
    Cell::new(text).set_alignment(CellAlignment::Right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_dataset_report() {
        let report = render_dataset_report(&Dataset::failed("missing.csv", "no such file"));
        assert!(report.contains("missing.csv"));
        assert!(report.contains("Failed to load dataset: no such file"));
    }

    #[test]
    fn test_report_contains_preview_and_statistics() {
        let split = Split {
            columns: vec!["A".into(), "Y".into()],
            rows: vec![vec!["1".into(), "x".into()]],
            preview: vec![vec!["1".into(), "x".into()]],
            statistics: vec![ColumnStatistics::compute("A", "f64", 1, 0, Some(&[Some(1.0)]))],
            features: vec![vec![1.0]],
            target: vec!["x".into()],
        };
        let dataset = Dataset {
            path: "toy.csv".into(),
            loaded: true,
            message: "Loaded".into(),
            feature_names: vec!["A".into()],
            target_name: "Y".into(),
            test: split.clone(),
            train: split,
        };

        let report = render_dataset_report(&dataset);
        assert!(report.contains("First 1 Rows (Train set):"));
        assert!(report.contains("First 1 Rows (Test set):"));
        assert!(report.contains("Basic Statistics (Train set):"));
        assert!(report.contains("25%"));
        assert!(report.contains("1.000"));
    }
}
