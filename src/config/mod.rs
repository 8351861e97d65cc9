use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;
use crate::domain::model::{FilterSelection, CONTRACT_TYPES, PROVINCES, YEAR_MAX, YEAR_MIN};
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, validate_vocabulary, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sercop-dash")]
#[command(about = "Terminal dashboard for Ecuador's public procurement open data")]
pub struct CliConfig {
    /// Year of the filtered view.
    #[arg(long, default_value = "2025")]
    pub year: u16,

    /// Province filter, e.g. "GUAYAS". Omit or pass "Todos" for all.
    #[arg(long)]
    pub province: Option<String>,

    /// Contract type filter, e.g. "Menor Cuantía". Omit or pass "Todos" for all.
    #[arg(long)]
    pub contract_type: Option<String>,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory to export the aggregated tables to (CSV and JSON).
    #[arg(long)]
    pub export_dir: Option<String>,

    /// Number of records shown in the preview table.
    #[arg(long, default_value = "5")]
    pub preview_rows: usize,

    /// Skip the 2015-2025 historical trend section.
    #[arg(long)]
    pub no_historical: bool,

    /// Print the accepted provinces and contract types, then exit.
    #[arg(long)]
    pub list_filters: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Resolves the raw CLI filters into a validated, canonical selection.
    pub fn filter_selection(&self) -> Result<FilterSelection> {
        Ok(FilterSelection {
            year: self.year,
            province: canonical_filter("province", self.province.as_deref(), &PROVINCES)?,
            contract_type: canonical_filter("contract-type", self.contract_type.as_deref(), &CONTRACT_TYPES)?,
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base-url", &self.base_url)?;
        validate_range("year", self.year, YEAR_MIN, YEAR_MAX)?;
        Ok(())
    }
}

/// An omitted filter and the literal "Todos" (any casing) both select everything.
fn canonical_filter(field: &str, raw: Option<&str>, vocabulary: &[&str]) -> Result<Option<String>> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().to_lowercase() == "todos" => Ok(None),
        Some(value) => validate_vocabulary(field, value, vocabulary).map(Some),
    }
}
