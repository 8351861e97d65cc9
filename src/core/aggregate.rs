use std::cmp::Reverse;
use std::collections::HashMap;

use crate::domain::model::{CategoryCount, FrequencyTable, Procedure, YearCount, YearlySeries, YEAR_FIELD};

/// Row ordering of a frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending by label, lexicographic. Zero-padded months and four-digit
    /// years sort chronologically under this order.
    ByLabel,
    /// Descending by count. Labels tied on count keep first-seen order.
    ByCountDesc,
}

/// Counts how often each label of `field` occurs across `records`.
///
/// Records without a countable value for the field are excluded, so the
/// table total can be lower than the record count.
pub fn aggregate_by_field(records: &[Procedure], field: &str, order: SortOrder) -> FrequencyTable {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<CategoryCount> = Vec::new();

    for record in records {
        if let Some(label) = record.label(field) {
            match positions.get(&label) {
                Some(&at) => entries[at].count += 1,
                None => {
                    positions.insert(label.clone(), entries.len());
                    entries.push(CategoryCount { label, count: 1 });
                }
            }
        }
    }

    match order {
        SortOrder::ByLabel => entries.sort_by(|a, b| a.label.cmp(&b.label)),
        // Stable sort, so ties keep the first-seen order built above.
        SortOrder::ByCountDesc => entries.sort_by_key(|entry| Reverse(entry.count)),
    }

    FrequencyTable::new(entries)
}

/// Collapses per-year batches into the yearly trend.
///
/// Every record is stamped with the year it was fetched for, overwriting any
/// upstream `year` field, and the stamped field is then counted. Years whose
/// batch was empty simply do not appear in the series.
pub fn aggregate_yearly(batches: Vec<(u16, Vec<Procedure>)>) -> YearlySeries {
    let mut stamped: Vec<Procedure> = Vec::new();
    for (year, mut records) in batches {
        for record in &mut records {
            record.stamp_year(year);
        }
        stamped.append(&mut records);
    }

    let by_year = aggregate_by_field(&stamped, YEAR_FIELD, SortOrder::ByLabel);
    let points = by_year
        .entries()
        .iter()
        .filter_map(|entry| {
            let year = entry.label.parse().ok()?;
            Some(YearCount { year, count: entry.count })
        })
        .collect();

    YearlySeries::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Procedure {
        serde_json::from_value(value).unwrap()
    }

    fn months(labels: &[&str]) -> Vec<Procedure> {
        labels.iter().map(|m| record(json!({ "month": m }))).collect()
    }

    #[test]
    fn test_counts_months_ascending_by_label() {
        let records = months(&["03", "01", "12", "01", "03", "01"]);
        let table = aggregate_by_field(&records, "month", SortOrder::ByLabel);

        let rows: Vec<(&str, u64)> = table
            .entries()
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(rows, vec![("01", 3), ("03", 2), ("12", 1)]);
    }

    #[test]
    fn test_records_without_the_field_are_excluded() {
        let records = vec![
            record(json!({ "month": "01" })),
            record(json!({ "state": "Adjudicada" })),
            record(json!({ "month": null })),
        ];
        let table = aggregate_by_field(&records, "month", SortOrder::ByLabel);

        assert_eq!(table.len(), 1);
        assert_eq!(table.total(), 1);
    }

    #[test]
    fn test_count_descending_keeps_first_seen_order_on_ties() {
        let records = vec![
            record(json!({ "type": "Menor Cuantía" })),
            record(json!({ "type": "Cotización" })),
            record(json!({ "type": "Licitación" })),
            record(json!({ "type": "Cotización" })),
            record(json!({ "type": "Menor Cuantía" })),
            record(json!({ "type": "Licitación" })),
            record(json!({ "type": "Licitación" })),
        ];
        let table = aggregate_by_field(&records, "type", SortOrder::ByCountDesc);

        let rows: Vec<(&str, u64)> = table
            .entries()
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(
            rows,
            vec![("Licitación", 3), ("Menor Cuantía", 2), ("Cotización", 2)]
        );
    }

    #[test]
    fn test_numeric_and_string_labels_share_a_decimal_spelling() {
        let records = vec![
            record(json!({ "month": 1 })),
            record(json!({ "month": "1" })),
        ];
        let table = aggregate_by_field(&records, "month", SortOrder::ByLabel);

        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].count, 2);
    }

    #[test]
    fn test_empty_input_gives_an_empty_table() {
        let table = aggregate_by_field(&[], "month", SortOrder::ByLabel);
        assert!(table.is_empty());
    }

    #[test]
    fn test_record_missing_one_field_still_counts_in_other_tables() {
        let records = vec![
            record(json!({ "month": "01" })),
            record(json!({ "month": "02", "type": "Licitación" })),
        ];

        let by_month = aggregate_by_field(&records, "month", SortOrder::ByLabel);
        let by_type = aggregate_by_field(&records, "type", SortOrder::ByCountDesc);

        assert_eq!(by_month.total(), 2);
        assert_eq!(by_type.total(), 1);
    }

    #[test]
    fn test_aggregation_is_a_pure_function_of_its_input() {
        let records = months(&["03", "01", "03"]);

        let first = aggregate_by_field(&records, "month", SortOrder::ByLabel);
        let second = aggregate_by_field(&records, "month", SortOrder::ByLabel);

        assert_eq!(first, second);
    }

    #[test]
    fn test_yearly_series_is_ascending_and_skips_empty_years() {
        let batches = vec![
            (2017, months(&["01", "02"])),
            (2015, months(&["01", "05", "09"])),
            (2016, Vec::new()),
        ];
        let series = aggregate_yearly(batches);

        let points: Vec<(u16, u64)> = series.points().iter().map(|p| (p.year, p.count)).collect();
        assert_eq!(points, vec![(2015, 3), (2017, 2)]);
    }

    #[test]
    fn test_yearly_series_overrides_upstream_year_fields() {
        let batches = vec![(2015, vec![record(json!({ "year": "1999" }))])];
        let series = aggregate_yearly(batches);

        let points: Vec<(u16, u64)> = series.points().iter().map(|p| (p.year, p.count)).collect();
        assert_eq!(points, vec![(2015, 1)]);
    }

    #[test]
    fn test_yearly_series_of_no_batches_is_empty() {
        assert!(aggregate_yearly(Vec::new()).is_empty());
    }
}
