use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::domain::model::{FilterSelection, FilteredView, HistoricalView};
use crate::utils::error::Result;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body)?;
    Ok(())
}

#[derive(Serialize)]
struct RunSummary<'a> {
    generated_at: String,
    filters: &'a FilterSelection,
    total_matching: Option<usize>,
    historical_total: Option<u64>,
    failed_years: Vec<u16>,
}

/// Writes every available table as CSV plus a `resumen.json` run summary.
///
/// Sections that were skipped or produced nothing simply yield no file.
/// Returns the paths written, in order.
pub fn export_views(
    dir: &Path,
    filters: &FilterSelection,
    filtered: Option<&FilteredView>,
    historical: Option<&HistoricalView>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    if let Some(view) = filtered {
        for (name, table) in [
            ("por_mes.csv", &view.by_month),
            ("por_tipo.csv", &view.by_type),
            ("por_estado.csv", &view.by_state),
        ] {
            if let Some(table) = table {
                let path = dir.join(name);
                write_csv(&path, table.entries())?;
                written.push(path);
            }
        }
    }

    if let Some(view) = historical {
        let path = dir.join("por_anio.csv");
        write_csv(&path, view.series.points())?;
        written.push(path);
    }

    let summary = RunSummary {
        generated_at: Utc::now().to_rfc3339(),
        filters,
        total_matching: filtered.map(|v| v.total),
        historical_total: historical.map(|v| v.series.total()),
        failed_years: historical.map(|v| v.failed_years.clone()).unwrap_or_default(),
    };
    let path = dir.join("resumen.json");
    write_json(&path, &summary)?;
    written.push(path);

    Ok(written)
}
