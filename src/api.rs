use reqwest::Client;
use url::Url;

use crate::domain::model::{FilterSelection, Procedure};
use crate::domain::ports::RecordSource;
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;

/// Production endpoint of Ecuador's public procurement open-data platform.
pub const DEFAULT_BASE_URL: &str = "https://datosabiertos.compraspublicas.gob.ec/PLATAFORMA/api";

/// HTTP client for the `get_analysis` resource of the SERCOP open-data API.
#[derive(Debug)]
pub struct SercopClient {
    client: Client,
    endpoint: Url,
}

impl SercopClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut endpoint = Url::parse(base_url).map_err(|e| DashboardError::InvalidConfigValue {
            field: "base-url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        endpoint
            .path_segments_mut()
            .map_err(|_| DashboardError::InvalidConfigValue {
                field: "base-url".to_string(),
                value: base_url.to_string(),
                reason: "cannot be used as a base URL".to_string(),
            })?
            .pop_if_empty()
            .push("get_analysis");

        Ok(Self { client: Client::new(), endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn get_records(&self, query: &[(&str, String)], context: &str) -> Result<Vec<Procedure>> {
        tracing::debug!("Making API request to: {} ({})", self.endpoint, context);
        let response = self.client.get(self.endpoint.clone()).query(query).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::UpstreamStatus {
                status,
                context: context.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(parse_body(&body))
    }
}

#[async_trait]
impl RecordSource for SercopClient {
    async fn fetch_filtered(&self, filters: &FilterSelection) -> Result<Vec<Procedure>> {
        let query = filtered_query(filters);
        let context = format!("filter query (year {})", filters.year);
        self.get_records(&query, &context).await
    }

    async fn fetch_year(&self, year: u16) -> Result<Vec<Procedure>> {
        let query = year_query(year);
        self.get_records(&query, &format!("year {}", year)).await
    }
}

/// Query string for the filtered view. An unfiltered province or contract
/// type travels as an empty value, which the API reads as "all".
fn filtered_query(filters: &FilterSelection) -> Vec<(&'static str, String)> {
    vec![
        ("local", "1".to_string()),
        ("year", filters.year.to_string()),
        ("province", filters.province.clone().unwrap_or_default()),
        ("type", filters.contract_type.clone().unwrap_or_default()),
    ]
}

/// Query string for one year of the historical trend, no other filters.
fn year_query(year: u16) -> Vec<(&'static str, String)> {
    vec![("local", "1".to_string()), ("year", year.to_string())]
}

/// Turns a response body into records, leniently.
///
/// The API sometimes answers with an error page or a bare object instead of
/// the usual array. Those bodies count as "no data" rather than a failure,
/// and non-object array entries are skipped.
fn parse_body(body: &str) -> Vec<Procedure> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::Object(fields) => Some(Procedure::from(fields)),
                _ => None,
            })
            .collect(),
        Ok(other) => {
            tracing::warn!(
                "API body was JSON but not an array ({}), treating as no data",
                match other {
                    serde_json::Value::Object(_) => "object",
                    _ => "scalar",
                }
            );
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("API body was not valid JSON ({}), treating as no data", e);
            Vec::new()
        }
    }
}
