use indicatif::{ProgressBar, ProgressStyle};

use crate::core::aggregate::{aggregate_by_field, aggregate_yearly, SortOrder};
use crate::domain::model::{
    FilterSelection, FilteredView, FrequencyTable, HistoricalView, Procedure, YEAR_MAX, YEAR_MIN,
};
use crate::domain::ports::RecordSource;
use crate::utils::error::{DashboardError, Result};

/// Builds the two dashboard sections from whatever `RecordSource` provides.
///
/// The sections are independent. A failure in one is reported by the caller
/// without preventing the other from running.
pub struct DashboardEngine<S: RecordSource> {
    source: S,
    preview_rows: usize,
    show_progress: bool,
}

impl<S: RecordSource> DashboardEngine<S> {
    pub fn new(source: S, preview_rows: usize) -> Self {
        Self { source, preview_rows, show_progress: false }
    }

    /// Draws a progress bar on stderr while the historical years download.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Fetches the records matching `filters` and aggregates them by month,
    /// contract type and state.
    ///
    /// Returns `EmptyResult` when the API answered but nothing matched the
    /// filters. A breakdown whose field appears in no record is `None`.
    pub async fn filtered_section(&self, filters: &FilterSelection) -> Result<FilteredView> {
        tracing::debug!("Loading filtered section for {:?}", filters);
        let records = self.source.fetch_filtered(filters).await?;
        if records.is_empty() {
            return Err(DashboardError::EmptyResult);
        }
        tracing::info!("Fetched {} procedures for year {}", records.len(), filters.year);

        let preview = records.iter().take(self.preview_rows).cloned().collect();
        Ok(FilteredView {
            total: records.len(),
            preview,
            by_month: table_if_present(&records, "month", SortOrder::ByLabel),
            by_type: table_if_present(&records, "type", SortOrder::ByCountDesc),
            by_state: table_if_present(&records, "state", SortOrder::ByLabel),
        })
    }

    /// Fetches every year of the covered range, one request at a time, and
    /// collapses the batches into the yearly trend.
    ///
    /// A year whose fetch fails is skipped and recorded in `failed_years`.
    /// Only when no year at all yields records does the section fail, with
    /// `HistoricalEmpty`.
    pub async fn historical_section(&self) -> Result<HistoricalView> {
        let mut batches: Vec<(u16, Vec<Procedure>)> = Vec::new();
        let mut failed_years: Vec<u16> = Vec::new();

        let progress_bar = if self.show_progress {
            let pb = ProgressBar::new(u64::from(YEAR_MAX - YEAR_MIN + 1));
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} años")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for year in YEAR_MIN..=YEAR_MAX {
            match self.source.fetch_year(year).await {
                Ok(records) => {
                    tracing::debug!("Year {}: {} procedures", year, records.len());
                    batches.push((year, records));
                }
                Err(e) => {
                    tracing::warn!("Skipping year {}: {}", year, e);
                    failed_years.push(year);
                }
            }
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        let series = aggregate_yearly(batches);
        if series.is_empty() {
            return Err(DashboardError::HistoricalEmpty);
        }
        tracing::info!(
            "Historical trend covers {} years, {} procedures in total",
            series.len(),
            series.total()
        );
        Ok(HistoricalView { series, failed_years })
    }
}

fn table_if_present(records: &[Procedure], field: &str, order: SortOrder) -> Option<FrequencyTable> {
    let table = aggregate_by_field(records, field, order);
    if table.is_empty() {
        None
    } else {
        Some(table)
    }
}
