pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

pub use api::{SercopClient, DEFAULT_BASE_URL};
pub use config::CliConfig;
pub use core::{aggregate_by_field, aggregate_yearly, DashboardEngine, SortOrder};
pub use domain::model::{
    CategoryCount, FilterSelection, FilteredView, FrequencyTable, HistoricalView, Procedure,
    YearCount, YearlySeries, CONTRACT_TYPES, PROVINCES, YEAR_FIELD, YEAR_MAX, YEAR_MIN,
};
pub use domain::ports::RecordSource;
pub use utils::error::{DashboardError, Result};
