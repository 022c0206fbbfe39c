use crate::core::history::HistoricalSeries;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Defines different styles for text elements.
pub enum StyleType {
    Value,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for a rate with four decimals.
pub fn rate_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.4}")).set_alignment(CellAlignment::Right)
}

/// Creates a cell for displaying day-over-day change with color coding.
pub fn change_cell(change: Option<f64>) -> Cell {
    match change {
        Some(change) => {
            let color = if change >= 0.0 { Color::Green } else { Color::Red };
            Cell::new(format!("{change:+.2}%"))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }
        None => Cell::new("").set_alignment(CellAlignment::Right),
    }
}

/// Spinner shown while a fetch is outstanding.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// One block character per point, scaled between the series' bounds.
pub fn sparkline(series: &HistoricalSeries) -> String {
    let Some((lo, hi)) = series.bounds() else {
        return String::new();
    };
    let span = hi - lo;
    series
        .points()
        .iter()
        .map(|p| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((p.value - lo) / span * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[(level as usize).min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::HistoricalPoint;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> HistoricalSeries {
        HistoricalSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| HistoricalPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap(),
                    value: *v,
                })
                .collect(),
        )
    }

    #[test]
    fn test_sparkline_scales_to_bounds() {
        assert_eq!(sparkline(&series(&[1.0, 2.0, 3.0])), "▁▅█");
        assert_eq!(sparkline(&series(&[0.25, 0.25])), "▅▅");
        assert_eq!(sparkline(&HistoricalSeries::default()), "");
    }
}
