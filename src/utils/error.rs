use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {context}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        context: String,
    },

    /// The fetch itself succeeded but no procedure matched the filters.
    #[error("no procedures match the selected filters")]
    EmptyResult,

    /// None of the years in the historical range produced any record.
    #[error("no historical data could be retrieved for any year")]
    HistoricalEmpty,

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid value for {field}: {value:?} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
