//! Normalized, display-ready table rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::column::ColumnKey;
use super::record::RecordId;

/// Canonical "empty" cell value.
pub const EMPTY_CELL: &str = "-";

/// Read access to a row's cells by column, shared by every table shape the
/// comparator sorts.
pub trait CellSource {
    fn row_id(&self) -> &RecordId;

    /// Display text of a cell, `None` when the row has no such column.
    fn cell(&self, key: ColumnKey) -> Option<&str>;
}

/// Row of the employee management table.
///
/// After normalization every column of the descriptor list is present and
/// holds either [`EMPTY_CELL`] or a non-empty trimmed string. Inside an edit
/// session draft rows may temporarily hold `""` for cleared cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub id: RecordId,
    pub is_active: bool,
    cells: BTreeMap<ColumnKey, String>,
}

impl NormalizedRow {
    pub fn new(id: RecordId, is_active: bool) -> Self {
        Self {
            id,
            is_active,
            cells: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, key: ColumnKey, value: impl Into<String>) -> Self {
        self.set_cell(key, value);
        self
    }

    pub fn set_cell(&mut self, key: ColumnKey, value: impl Into<String>) {
        self.cells.insert(key, value.into());
    }

    pub fn cell(&self, key: ColumnKey) -> Option<&str> {
        self.cells.get(&key).map(String::as_str)
    }

    /// Cell text, or [`EMPTY_CELL`] when the column is absent.
    pub fn cell_or_empty(&self, key: ColumnKey) -> &str {
        self.cell(key).unwrap_or(EMPTY_CELL)
    }

    pub fn cells(&self) -> impl Iterator<Item = (ColumnKey, &str)> {
        self.cells.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn has_column(&self, key: ColumnKey) -> bool {
        self.cells.contains_key(&key)
    }
}

impl CellSource for NormalizedRow {
    fn row_id(&self) -> &RecordId {
        &self.id
    }

    fn cell(&self, key: ColumnKey) -> Option<&str> {
        NormalizedRow::cell(self, key)
    }
}
