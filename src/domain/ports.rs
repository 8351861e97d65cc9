use crate::domain::model::{FilterSelection, Procedure};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of procurement records, one batch per query.
///
/// The production implementation talks to the open-data API over HTTP; tests
/// substitute canned batches.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Records matching a full filter selection (year, province, type).
    async fn fetch_filtered(&self, filters: &FilterSelection) -> Result<Vec<Procedure>>;

    /// Records for a single year with no further filters.
    async fn fetch_year(&self, year: u16) -> Result<Vec<Procedure>>;
}
