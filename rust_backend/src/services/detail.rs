//! Drill-down views over an aggregation: donut series, bucket selection and
//! the detail table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::analytics::{AnalyticsRow, PeriodResolver, SeriesMode};
use crate::editing::derived::{age_cell, retire_month_label, tenure_cell};
use crate::models::{CellSource, ColumnDescriptor, ColumnKey, RecordId, EMPTY_CELL};
use crate::transformations::collation::compare_collated;
use crate::transformations::{is_blank_cell, normalize_cell};

/// At most this many series get a legend toggle.
pub const SERIES_BUTTON_LIMIT: usize = 10;

/// Which population a headline count refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionScope {
    Filtered,
    EligibleWindow,
    EligibleTotal,
}

impl SelectionScope {
    pub fn label(&self) -> &'static str {
        match self {
            SelectionScope::EligibleTotal => "全社員数",
            SelectionScope::EligibleWindow => "該当人数",
            SelectionScope::Filtered => "表示項目数",
        }
    }
}

/// One donut slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonutSlice {
    pub name: String,
    pub value: usize,
}

/// Count rows per series key, largest slice first.
///
/// When `displayed_keys` is non-empty only those keys are counted. Slices
/// with equal counts are ordered by collation of their names.
pub fn build_donut_series<'a, I>(rows: I, mode: SeriesMode, displayed_keys: &[String]) -> Vec<DonutSlice>
where
    I: IntoIterator<Item = &'a AnalyticsRow>,
{
    let mut counter: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let key = row.series_key(mode);
        if !displayed_keys.is_empty() && !displayed_keys.contains(&key) {
            continue;
        }
        *counter.entry(key).or_insert(0) += 1;
    }

    let mut slices: Vec<DonutSlice> = counter
        .into_iter()
        .map(|(name, value)| DonutSlice { name, value })
        .collect();
    slices.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| compare_collated(&a.name, &b.name)));
    slices
}

/// Legend entries: the first [`SERIES_BUTTON_LIMIT`] series keys.
pub fn series_buttons(series_keys: &[String]) -> &[String] {
    &series_keys[..series_keys.len().min(SERIES_BUTTON_LIMIT)]
}

/// Clicked chart segment. `period: None` selects the series in every period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailSelection {
    pub series_key: String,
    pub period: Option<String>,
}

/// Rows behind a selection; `None` selects everything.
///
/// Periods are resolved with the same [`PeriodResolver`] the aggregation
/// used, so imputed rows are found in the bucket they were counted in.
pub fn detail_rows_by_selection<'a>(
    rows: &'a [AnalyticsRow],
    selection: Option<&DetailSelection>,
    resolver: &PeriodResolver,
    mode: SeriesMode,
) -> Vec<&'a AnalyticsRow> {
    let Some(selection) = selection.filter(|s| !s.series_key.is_empty()) else {
        return rows.iter().collect();
    };
    rows.iter()
        .filter(|row| row.series_key(mode) == selection.series_key)
        .filter(|row| match &selection.period {
            Some(period) => resolver.period_key(row) == Some(period.as_str()),
            None => true,
        })
        .collect()
}

/// Row of the analytics detail table, laid out like the management table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub id: RecordId,
    cells: BTreeMap<ColumnKey, String>,
}

impl DetailRow {
    pub fn cell_or_empty(&self, key: ColumnKey) -> &str {
        self.cells.get(&key).map_or(EMPTY_CELL, String::as_str)
    }
}

impl CellSource for DetailRow {
    fn row_id(&self) -> &RecordId {
        &self.id
    }

    fn cell(&self, key: ColumnKey) -> Option<&str> {
        self.cells.get(&key).map(String::as_str)
    }
}

fn detail_cell(row: &AnalyticsRow, key: ColumnKey, reference_date: NaiveDate) -> String {
    let raw = |k: ColumnKey| normalize_cell(row.record.get(k));
    match key {
        ColumnKey::RetireMonth => {
            let computed = retire_month_label(&raw(ColumnKey::RetireDate));
            if is_blank_cell(&computed) {
                raw(ColumnKey::RetireMonth)
            } else {
                computed
            }
        }
        ColumnKey::Age => age_cell(&raw(ColumnKey::BirthDate), reference_date),
        ColumnKey::TenureMonths => tenure_cell(
            &raw(ColumnKey::JoinDate),
            &raw(ColumnKey::RetireDate),
            reference_date,
        ),
        ColumnKey::Status | ColumnKey::Reason => {
            let direct = raw(key);
            if !is_blank_cell(&direct) {
                return direct;
            }
            let resolved = if key == ColumnKey::Status { &row.status } else { &row.reason };
            resolved.clone()
        }
        _ => raw(key),
    }
}

/// Build detail-table rows for the given analytics rows.
///
/// Derived columns are computed from their source dates; status and reason
/// fall back to the resolved series values. Rows without an id are numbered
/// from their position in `rows`, starting at 1.
pub fn build_detail_rows<'a, I>(rows: I, columns: &[ColumnDescriptor], reference_date: NaiveDate) -> Vec<DetailRow>
where
    I: IntoIterator<Item = &'a AnalyticsRow>,
{
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let id = if row.id.is_empty() {
                RecordId::new((index + 1).to_string())
            } else {
                row.id.clone()
            };
            let cells = columns
                .iter()
                .map(|column| (column.key, detail_cell(row, column.key, reference_date)))
                .collect();
            DetailRow { id, cells }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeRecord, MANAGER_COLUMNS};
    use crate::services::analytics::{prepare_analytics_rows, AnalyticsDataset, AnalyticsSettings, Axis};
    use crate::services::categories::CategoryCandidates;
    use crate::transformations::{sort_rows, SortState};

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn dataset() -> AnalyticsDataset {
        let records = vec![
            EmployeeRecord::new("1").with(ColumnKey::RetireDate, "2026/9/1").with(ColumnKey::Reason, "家庭問題"),
            EmployeeRecord::new("2").with(ColumnKey::RetireDate, "2026/8/1").with(ColumnKey::Reason, "給与不満"),
            EmployeeRecord::new("3").with(ColumnKey::RetireDate, "2026/9/20").with(ColumnKey::Reason, "給与不満"),
            EmployeeRecord::new("4").with(ColumnKey::Reason, "給与不満").with(ColumnKey::JoinDate, "2020/1/1"),
        ];
        prepare_analytics_rows(&records, &CategoryCandidates::default(), reference())
    }

    fn rows() -> Vec<AnalyticsRow> {
        dataset().rows
    }

    #[test]
    fn test_donut_series_order() {
        let rows = rows();
        let slices = build_donut_series(&rows, SeriesMode::Reason, &[]);
        assert_eq!(
            slices,
            vec![
                DonutSlice { name: "給与不満".into(), value: 3 },
                DonutSlice { name: "家庭問題".into(), value: 1 },
            ]
        );

        let limited = build_donut_series(&rows, SeriesMode::Reason, &["家庭問題".to_string()]);
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_selection_uses_resolved_periods() {
        let dataset = dataset();
        let rows = &dataset.rows;
        let resolver = PeriodResolver::new(&dataset, Axis::Month, &AnalyticsSettings::default(), reference());

        let september = DetailSelection {
            series_key: "給与不満".into(),
            period: Some("2026-09".into()),
        };
        let selected = detail_rows_by_selection(rows, Some(&september), &resolver, SeriesMode::Reason);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id.as_str(), "3");

        // the undated row was imputed into the first bucket of the window
        let imputed = DetailSelection {
            series_key: "給与不満".into(),
            period: Some("2025-11".into()),
        };
        let selected = detail_rows_by_selection(rows, Some(&imputed), &resolver, SeriesMode::Reason);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id.as_str(), "4");

        assert_eq!(detail_rows_by_selection(rows, None, &resolver, SeriesMode::Reason).len(), 4);
    }

    #[test]
    fn test_detail_rows_compute_derived_cells() {
        let rows = rows();
        let detail = build_detail_rows(&rows, MANAGER_COLUMNS, reference());
        assert_eq!(detail[0].cell_or_empty(ColumnKey::RetireMonth), "2026年9月");
        assert_eq!(detail[3].cell_or_empty(ColumnKey::TenureMonths), "81");
        assert_eq!(detail[3].cell_or_empty(ColumnKey::RetireMonth), EMPTY_CELL);
        assert_eq!(detail[0].cell_or_empty(ColumnKey::Status), "未選択");
    }

    #[test]
    fn test_detail_rows_sort_with_table_comparator() {
        let rows = rows();
        let mut detail = build_detail_rows(&rows, MANAGER_COLUMNS, reference());
        let state = SortState::default().toggle(ColumnKey::RetireDate);
        sort_rows(&mut detail, &state, MANAGER_COLUMNS);
        let ids: Vec<&str> = detail.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn test_series_buttons_are_capped() {
        let keys: Vec<String> = (0..12).map(|i| i.to_string()).collect();
        assert_eq!(series_buttons(&keys).len(), SERIES_BUTTON_LIMIT);
        assert_eq!(SelectionScope::EligibleWindow.label(), "該当人数");
    }
}
