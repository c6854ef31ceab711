//! Type-aware row ordering shared by the management table and the analytics
//! detail table.
//!
//! Cells that are blank, the empty sentinel, or unparseable for the column's
//! type are *missing*. Missing cells sort after every present cell in both
//! directions; the direction only inverts the order among present values.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::collation::compare_collated;
use super::normalize::is_blank_cell;
use crate::models::{CellSource, ColumnDescriptor, ColumnKey, ColumnType};
use crate::parsing::dates::{date_to_millis, parse_column_date};

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Current sort column and direction of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<ColumnKey>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Header click: the same column cycles asc → desc → none, a different
    /// column starts at asc.
    pub fn toggle(self, column: ColumnKey) -> Self {
        if self.column != Some(column) {
            return SortState {
                column: Some(column),
                direction: Some(SortDirection::Asc),
            };
        }
        match self.direction {
            Some(SortDirection::Asc) => SortState {
                column: Some(column),
                direction: Some(SortDirection::Desc),
            },
            Some(SortDirection::Desc) => SortState::default(),
            None => SortState {
                column: Some(column),
                direction: Some(SortDirection::Asc),
            },
        }
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some() && self.direction.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey<'a> {
    Number(f64),
    Instant(i64),
    Text(&'a str),
}

fn sort_key(text: Option<&str>, column_type: ColumnType) -> Option<SortKey<'_>> {
    let text = text?;
    if is_blank_cell(text) {
        return None;
    }
    let trimmed = text.trim();
    match column_type {
        ColumnType::Number => trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .map(SortKey::Number),
        ColumnType::Date => parse_column_date(trimmed).map(|d| SortKey::Instant(date_to_millis(d))),
        ColumnType::String => Some(SortKey::Text(text)),
    }
}

fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    match (a, b) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Instant(x), SortKey::Instant(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => compare_collated(x, y),
        // Keys of one column share a type.
        _ => Ordering::Equal,
    }
}

/// Ascending comparison of two rows on one column, missing values last.
pub fn compare_rows<R: CellSource>(a: &R, b: &R, column: &ColumnDescriptor) -> Ordering {
    compare_directed(a, b, column, SortDirection::Asc)
}

/// Directed comparison. Missing values sort last regardless of `direction`.
pub fn compare_directed<R: CellSource>(
    a: &R,
    b: &R,
    column: &ColumnDescriptor,
    direction: SortDirection,
) -> Ordering {
    let left = sort_key(a.cell(column.key), column.column_type);
    let right = sort_key(b.cell(column.key), column.column_type);
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = compare_keys(&x, &y);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Stable sort of `rows` by the active sort state.
///
/// Rows are left untouched when no column/direction is selected or the
/// column is not part of `columns`.
pub fn sort_rows<R: CellSource>(rows: &mut [R], state: &SortState, columns: &[ColumnDescriptor]) {
    let (Some(key), Some(direction)) = (state.column, state.direction) else {
        return;
    };
    let Some(column) = columns.iter().find(|c| c.key == key) else {
        return;
    };
    rows.sort_by(|a, b| compare_directed(a, b, column, direction));
}
