use std::collections::BTreeSet;

use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::model::{FilterSelection, FrequencyTable, Procedure, YearlySeries};

const BAR_WIDTH: usize = 30;
const CELL_WIDTH: usize = 40;

#[derive(Tabled)]
struct YearRow {
    #[tabled(rename = "Año")]
    year: u16,
    #[tabled(rename = "Cantidad")]
    count: u64,
    #[tabled(rename = "Tendencia")]
    bar: String,
}

/// One line restating the active filters, with "Todos" for open dimensions.
pub fn selection_line(filters: &FilterSelection) -> String {
    format!(
        "Año: {} | Provincia: {} | Tipo: {}",
        filters.year,
        filters.province.as_deref().unwrap_or("Todos"),
        filters.contract_type.as_deref().unwrap_or("Todos"),
    )
}

/// Markdown table of one frequency breakdown with a proportional bar column.
pub fn frequency_table(label_header: &str, table: &FrequencyTable) -> String {
    let max = table.entries().iter().map(|e| e.count).max().unwrap_or(0);
    let mut builder = Builder::default();
    builder.push_record([label_header.to_string(), "Cantidad".to_string(), "Gráfico".to_string()]);
    for entry in table.entries() {
        builder.push_record([entry.label.clone(), entry.count.to_string(), bar(entry.count, max)]);
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Markdown table of the yearly trend, the terminal stand-in for a line chart.
pub fn yearly_table(series: &YearlySeries) -> String {
    let max = series.points().iter().map(|p| p.count).max().unwrap_or(0);
    let rows: Vec<YearRow> = series
        .points()
        .iter()
        .map(|p| YearRow { year: p.year, count: p.count, bar: bar(p.count, max) })
        .collect();
    Table::new(rows).with(Style::markdown()).to_string()
}

/// Markdown table of the first few raw records.
///
/// Columns are the union of the preview's field names, sorted so the layout
/// does not depend on which record came first. Values longer than
/// `CELL_WIDTH` are elided so one verbose field cannot widen every row.
pub fn preview_table(records: &[Procedure]) -> String {
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        columns.extend(record.fields().keys().map(String::as_str));
    }
    if columns.is_empty() {
        return "(sin filas)".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().copied());
    for record in records {
        builder.push_record(columns.iter().map(|c| cell(record.fields().get(*c))));
    }
    builder.build().with(Style::markdown()).to_string()
}

fn cell(value: Option<&serde_json::Value>) -> String {
    let text = match value {
        None | Some(serde_json::Value::Null) => return String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if text.chars().count() <= CELL_WIDTH {
        return text;
    }
    let kept: String = text.chars().take(CELL_WIDTH - 3).collect();
    format!("{}...", kept)
}

fn bar(count: u64, max: u64) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let width = ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(width.max(1))
}
