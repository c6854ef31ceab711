//! Canonical row shape for the employee management table.
//!
//! Every column of the descriptor list is materialised in every row, either as
//! a non-empty trimmed display string or as [`EMPTY_CELL`]. Malformed input
//! never fails; it degrades to the empty sentinel.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{ColumnDescriptor, ColumnKey, EmployeeRecord, NormalizedRow, RawValue, EMPTY_CELL};

/// Whether a display cell is the empty sentinel or blank text.
pub fn is_blank_cell(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == EMPTY_CELL
}

/// Normalize an already textual cell.
///
/// Blank text and text made only of slashes (`/` or `／`) become [`EMPTY_CELL`];
/// anything else is trimmed. Applying it twice is a no-op.
///
/// # Example
/// ```
/// use roster_rust::transformations::normalize_display;
///
/// assert_eq!(normalize_display("  営業 "), "営業");
/// assert_eq!(normalize_display("   "), "-");
/// assert_eq!(normalize_display("／"), "-");
/// ```
pub fn normalize_display(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '/' || c == '／') {
        EMPTY_CELL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize a raw source value into its display string.
pub fn normalize_cell(value: &RawValue) -> String {
    match value {
        RawValue::Null => EMPTY_CELL.to_string(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Number(n) if n.is_finite() => n.to_string(),
        RawValue::Number(_) => EMPTY_CELL.to_string(),
        RawValue::Text(text) => normalize_display(text),
    }
}

/// How the active/resigned state of a record is decided.
///
/// Exactly one policy is authoritative for a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivePolicy {
    /// Use the record's `is_active` flag; records without one count as active.
    ExplicitFlag,
    /// Active iff the retire date cell is blank.
    RetireDateBlank,
}

impl ActivePolicy {
    /// Pick the policy for a dataset: the explicit flag wins as soon as any
    /// record carries one.
    pub fn detect(records: &[EmployeeRecord]) -> Self {
        if records.iter().any(|r| r.is_active.is_some()) {
            ActivePolicy::ExplicitFlag
        } else {
            ActivePolicy::RetireDateBlank
        }
    }

    pub fn is_active(&self, record: &EmployeeRecord) -> bool {
        match self {
            ActivePolicy::ExplicitFlag => record.is_active.unwrap_or(true),
            ActivePolicy::RetireDateBlank => {
                is_blank_cell(&normalize_cell(record.get(ColumnKey::RetireDate)))
            }
        }
    }
}

/// Normalize one record against a column list.
pub fn normalize_record(
    record: &EmployeeRecord,
    columns: &[ColumnDescriptor],
    policy: ActivePolicy,
) -> NormalizedRow {
    columns.iter().fold(
        NormalizedRow::new(record.id.clone(), policy.is_active(record)),
        |row, column| row.with_cell(column.key, normalize_cell(record.get(column.key))),
    )
}

/// Normalize raw records into table rows sorted by numeric id.
///
/// The sort is stable: ids that are not finite numbers sort as `0` and keep
/// their relative input order, as do duplicate ids.
///
/// # Arguments
/// * `records` - Source records in any order
/// * `columns` - Column descriptor list every row is materialised against
/// * `policy` - Active/resigned policy for this dataset
pub fn normalize(
    records: &[EmployeeRecord],
    columns: &[ColumnDescriptor],
    policy: ActivePolicy,
) -> Vec<NormalizedRow> {
    let mut rows: Vec<NormalizedRow> = records
        .iter()
        .map(|record| normalize_record(record, columns, policy))
        .collect();
    rows.sort_by(|a, b| a.id.numeric_order().total_cmp(&b.id.numeric_order()));
    debug!("Normalized {} records with {:?}", rows.len(), policy);
    rows
}

/// Re-normalize rows that are already textual (e.g. an edited draft).
///
/// Output order follows the same numeric-id rule as [`normalize`].
pub fn normalize_rows(rows: &[NormalizedRow], columns: &[ColumnDescriptor]) -> Vec<NormalizedRow> {
    let mut out: Vec<NormalizedRow> = rows
        .iter()
        .map(|row| {
            columns.iter().fold(
                NormalizedRow::new(row.id.clone(), row.is_active),
                |acc, column| acc.with_cell(column.key, normalize_display(row.cell_or_empty(column.key))),
            )
        })
        .collect();
    out.sort_by(|a, b| a.id.numeric_order().total_cmp(&b.id.numeric_order()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordId, MANAGER_COLUMNS};

    #[test]
    fn test_cell_rules() {
        assert_eq!(normalize_cell(&RawValue::Null), "-");
        assert_eq!(normalize_cell(&RawValue::text("")), "-");
        assert_eq!(normalize_cell(&RawValue::text(" \t ")), "-");
        assert_eq!(normalize_cell(&RawValue::text("//")), "-");
        assert_eq!(normalize_cell(&RawValue::text("2024/1/1")), "2024/1/1");
        assert_eq!(normalize_cell(&RawValue::Number(3.0)), "3");
        assert_eq!(normalize_cell(&RawValue::Number(2.5)), "2.5");
        assert_eq!(normalize_cell(&RawValue::Number(f64::NAN)), "-");
        assert_eq!(normalize_cell(&RawValue::Bool(true)), "true");
    }

    #[test]
    fn test_every_column_is_materialised() {
        let records = vec![EmployeeRecord::new("1").with(ColumnKey::Name, "山田")];
        let rows = normalize(&records, MANAGER_COLUMNS, ActivePolicy::RetireDateBlank);
        assert_eq!(rows.len(), 1);
        for column in MANAGER_COLUMNS {
            let cell = rows[0].cell(column.key).unwrap();
            assert!(cell == "-" || !cell.trim().is_empty());
        }
        assert_eq!(rows[0].cell(ColumnKey::Name), Some("山田"));
    }

    #[test]
    fn test_sorted_by_numeric_id_with_stable_ties() {
        let records = vec![
            EmployeeRecord::new("10"),
            EmployeeRecord::new("x").with(ColumnKey::Name, "first"),
            EmployeeRecord::new("2"),
            EmployeeRecord::new("").with(ColumnKey::Name, "second"),
        ];
        let rows = normalize(&records, MANAGER_COLUMNS, ActivePolicy::ExplicitFlag);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "", "2", "10"]);
    }

    #[test]
    fn test_active_policy_detection() {
        let unflagged = vec![
            EmployeeRecord::new("1"),
            EmployeeRecord::new("2").with(ColumnKey::RetireDate, "2024/3/1"),
        ];
        assert_eq!(ActivePolicy::detect(&unflagged), ActivePolicy::RetireDateBlank);
        let rows = normalize(&unflagged, MANAGER_COLUMNS, ActivePolicy::detect(&unflagged));
        assert!(rows[0].is_active);
        assert!(!rows[1].is_active);

        let flagged = vec![
            EmployeeRecord::new("1").with_active(false),
            EmployeeRecord::new("2").with(ColumnKey::RetireDate, "2024/3/1"),
        ];
        let policy = ActivePolicy::detect(&flagged);
        assert_eq!(policy, ActivePolicy::ExplicitFlag);
        let rows = normalize(&flagged, MANAGER_COLUMNS, policy);
        assert!(!rows[0].is_active);
        // Flag policy ignores the retire date entirely.
        assert!(rows[1].is_active);
    }

    #[test]
    fn test_renormalizing_is_idempotent() {
        let records = vec![
            EmployeeRecord::new("3").with(ColumnKey::Remark, "  memo "),
            EmployeeRecord::new("1").with(ColumnKey::Age, 41.0),
        ];
        let once = normalize(&records, MANAGER_COLUMNS, ActivePolicy::RetireDateBlank);
        let twice = normalize_rows(&once, MANAGER_COLUMNS);
        assert_eq!(once, twice);
        assert_eq!(twice[0].id, RecordId::from("1"));
    }
}
