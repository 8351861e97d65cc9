use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inclusive year range covered by the open-data platform.
pub const YEAR_MIN: u16 = 2015;
pub const YEAR_MAX: u16 = 2025;

/// Field stamped onto each record while building the yearly series.
pub const YEAR_FIELD: &str = "year";

/// Ecuadorian provinces exactly as the open-data API spells them.
pub const PROVINCES: [&str; 24] = [
    "AZUAY",
    "BOLÍVAR",
    "CAÑAR",
    "CARCHI",
    "CHIMBORAZO",
    "COTOPAXI",
    "EL ORO",
    "ESMERALDAS",
    "GALÁPAGOS",
    "GUAYAS",
    "IMBABURA",
    "LOJA",
    "LOS RÍOS",
    "MANABÍ",
    "MORONA SANTIAGO",
    "NAPO",
    "ORELLANA",
    "PASTAZA",
    "PICHINCHA",
    "SANTA ELENA",
    "SANTO DOMINGO DE LOS TSÁCHILAS",
    "SUCUMBÍOS",
    "TUNGURAHUA",
    "ZAMORA CHINCHIPE",
];

/// Contract types exactly as the open-data API spells them, including the
/// upstream spelling "Contratacion directa".
pub const CONTRACT_TYPES: [&str; 7] = [
    "Subasta Inversa Electrónica",
    "Menor Cuantía",
    "Cotización",
    "Contratacion directa",
    "Licitación",
    "Catálogo electrónico",
    "Bienes y Servicios únicos",
];

/// One procurement procedure as returned by the open-data API.
///
/// The upstream schema is not guaranteed, so the fields stay dynamic and are
/// only interpreted when a view asks for one by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Procedure {
    fields: Map<String, Value>,
}

impl Procedure {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Categorical label for `field`, if the record carries a countable one.
    ///
    /// Strings are used verbatim and numbers rendered in decimal; null and
    /// structured values are not countable.
    pub fn label(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Overwrites the `year` field with the year the record was fetched for.
    pub fn stamp_year(&mut self, year: u16) {
        self.fields.insert(YEAR_FIELD.to_string(), Value::from(year));
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Procedure {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Immutable filter selection for one dashboard run.
///
/// `None` on province or contract type is the "all"/unfiltered sentinel and
/// maps to an empty query-string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub year: u16,
    pub province: Option<String>,
    pub contract_type: Option<String>,
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// Ordered mapping from category label to occurrence count.
///
/// The ordering is decided by the aggregation that produced the table and is
/// part of its contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    entries: Vec<CategoryCount>,
}

impl FrequencyTable {
    pub fn new(entries: Vec<CategoryCount>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CategoryCount] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the number of records that carried the field.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

/// One point of the yearly trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: u16,
    pub count: u64,
}

/// Per-year procedure counts, ascending by year.
///
/// Years that contributed no records (failed fetches included) are absent
/// rather than zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlySeries {
    points: Vec<YearCount>,
}

impl YearlySeries {
    pub fn new(points: Vec<YearCount>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[YearCount] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.count).sum()
    }
}

/// Everything the presenter needs for the filtered section.
///
/// A table is `None` when no record in the result set carries its field, so
/// the presenter can skip the section instead of rendering an empty chart.
#[derive(Debug, Clone)]
pub struct FilteredView {
    pub total: usize,
    pub preview: Vec<Procedure>,
    pub by_month: Option<FrequencyTable>,
    pub by_type: Option<FrequencyTable>,
    pub by_state: Option<FrequencyTable>,
}

/// Everything the presenter needs for the 2015-2025 trend section.
#[derive(Debug, Clone)]
pub struct HistoricalView {
    pub series: YearlySeries,
    /// Years whose fetch failed; zero-record years are not failures.
    pub failed_years: Vec<u16>,
}
