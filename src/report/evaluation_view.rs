//! Plain-text model evaluation report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, Table};

use crate::pipeline::{prediction_distribution, ClassMetrics, Evaluation};

/// Number of individual predictions listed in the report
const LISTED_PREDICTIONS: usize = 10;

/// Render an evaluation as text: accuracy, prediction summary and the
/// per-class report.
pub fn render_evaluation_report(evaluation: &Evaluation) -> String {
    let mut out = String::new();

    out.push_str(&format!("Model Evaluation: {}\n", evaluation.kind));
    out.push_str(&format!(
        "Accuracy: {:.4} ({:.2}%)\n",
        evaluation.accuracy,
        evaluation.accuracy * 100.0
    ));

    let total = evaluation.predictions.len();
    out.push_str("\nPredictions Summary:\n");
    out.push_str(&format!("Total predictions: {}\n", total));
    out.push_str("Prediction distribution:\n");
    for (label, count) in prediction_distribution(&evaluation.predictions) {
        let pct = count as f64 / total as f64 * 100.0;
        out.push_str(&format!("  {}: {} ({:.1}%)\n", label, count, pct));
    }

    out.push_str(&format!("\nFirst {} predictions:\n", LISTED_PREDICTIONS.min(total)));
    for (i, label) in evaluation.predictions.iter().take(LISTED_PREDICTIONS).enumerate() {
        out.push_str(&format!("  {:2}. {}\n", i + 1, label));
    }
    if total > LISTED_PREDICTIONS {
        out.push_str(&format!("  ... and {} more\n", total - LISTED_PREDICTIONS));
    }

    out.push_str("\nClassification Report:\n");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Class", "Precision", "Recall", "F1", "Support"]);
    for (label, metrics) in &evaluation.report.classes {
        table.add_row(metrics_row(label, metrics));
    }
    table.add_row(metrics_row("Macro Average", &evaluation.report.macro_avg));
    table.add_row(metrics_row("Weighted Average", &evaluation.report.weighted_avg));
    out.push_str(&table.to_string());
    out.push('\n');

    out
}

fn metrics_row(label: &str, metrics: &ClassMetrics) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(format!("{:.3}", metrics.precision)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.3}", metrics.recall)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.3}", metrics.f1_score)).set_alignment(CellAlignment::Right),
        Cell::new(metrics.support).set_alignment(CellAlignment::Right),
    ]
}
