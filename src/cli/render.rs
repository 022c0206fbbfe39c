//! Text rendering of the application state

use super::ui::{self, StyleType};
use crate::core::conversion::rate_label;
use crate::core::history::HistoricalSeries;
use crate::core::rate::{CurrencyRate, RateTable};
use crate::core::state::{AppState, TableStatus};
use comfy_table::Cell;
use std::fmt::Write;

pub fn rate_table(table: &RateTable) -> String {
    let mut out = String::new();
    if let Some(date) = table.effective_date() {
        let _ = writeln!(
            out,
            "{}",
            ui::style_text(&format!("Mid rates in PLN, published {date}"), StyleType::Subtle)
        );
    }

    let mut grid = ui::new_styled_table();
    grid.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Mid"),
    ]);
    for rate in table.iter() {
        grid.add_row(vec![
            Cell::new(rate.code()),
            Cell::new(rate.name()),
            ui::rate_cell(rate.mid()),
        ]);
    }
    let _ = write!(out, "{grid}");
    out
}

pub fn history_table(series: &HistoricalSeries) -> String {
    let mut grid = ui::new_styled_table();
    grid.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell("Change"),
    ]);
    let mut previous: Option<f64> = None;
    for (i, point) in series.points().iter().enumerate() {
        let change = previous.map(|p| (point.value - p) / p * 100.0);
        grid.add_row(vec![
            Cell::new(i),
            Cell::new(point.date),
            ui::rate_cell(point.value),
            ui::change_cell(change),
        ]);
        previous = Some(point.value);
    }
    grid.to_string()
}

/// Full view of the converter. A failed table load replaces everything
/// with the error.
pub fn state(state: &AppState) -> String {
    let table = match &state.table {
        TableStatus::Loading => return "Loading exchange rates...".to_string(),
        TableStatus::Failed(msg) => {
            return ui::style_text(
                &format!("Could not load exchange rates: {msg}"),
                StyleType::Error,
            );
        }
        TableStatus::Ready(table) => table,
    };

    let mut out = String::new();
    let code = |rate: Option<&CurrencyRate>| {
        rate.map_or_else(|| "-".to_string(), |r| r.code().to_string())
    };
    let _ = writeln!(
        out,
        "{} currencies available. From: {}  To: {}  Amount: {}",
        table.len(),
        code(state.from.as_ref()),
        code(state.to.as_ref()),
        state.amount
    );

    match (&state.from, &state.to, state.unit_rate()) {
        (Some(from), Some(to), Some(rate)) => {
            let converted = match state.conversion() {
                Some(conversion) => {
                    ui::style_text(&conversion.converted_label(), StyleType::Value)
                }
                None => ui::style_text("Enter a valid amount", StyleType::Subtle),
            };
            let _ = writeln!(out, "{converted}");
            let _ = writeln!(out, "{}", rate_label(from.code(), rate, to.code()));
        }
        _ => {
            let _ = writeln!(
                out,
                "{}",
                ui::style_text("Pick two currencies", StyleType::Subtle)
            );
        }
    }

    if state.loading_history {
        let _ = writeln!(out, "Loading history...");
    } else if let Some(err) = &state.history_error {
        let _ = writeln!(
            out,
            "{}",
            ui::style_text(&format!("History unavailable: {err}"), StyleType::Error)
        );
    } else if let (Some((lo, hi)), Some(first), Some(last)) = (
        state.history.bounds(),
        state.history.points().first(),
        state.history.points().last(),
    ) {
        let _ = writeln!(
            out,
            "{} → {}  {}  min {:.4}  max {:.4}",
            first.date,
            last.date,
            ui::sparkline(&state.history),
            lo,
            hi
        );
    }

    if let (Some(point), Some(from), Some(to)) = (&state.selected_point, &state.from, &state.to) {
        let _ = writeln!(
            out,
            "{}: Rate: {}",
            point.date,
            rate_label(from.code(), point.value, to.code())
        );
    }

    out.trim_end().to_string()
}
