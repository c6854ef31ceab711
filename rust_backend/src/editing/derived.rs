//! Computed columns: retire month, age and tenure months.
//!
//! Derived cells are never edited directly. They are recomputed from their
//! source cells whenever an edit session starts or a source cell changes.

use chrono::{Datelike, NaiveDate};

use crate::models::{ColumnKey, NormalizedRow, EMPTY_CELL};
use crate::parsing::dates::{format_month_label, parse_flexible_date};
use crate::transformations::is_blank_cell;

/// Whole years between `birth` and `today`.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let before_birthday = (today.month(), today.day()) < (birth.month(), birth.day());
    today.year() - birth.year() - i32::from(before_birthday)
}

/// Whole months from `start` to `end`; a partial final month does not count.
pub fn diff_months(start: NaiveDate, end: NaiveDate) -> i32 {
    let base = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        base - 1
    } else {
        base
    }
}

/// `YYYY年M月` label of a retire date, or [`EMPTY_CELL`].
pub fn retire_month_label(retire_date: &str) -> String {
    parse_flexible_date(retire_date)
        .map(format_month_label)
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Age cell computed from a birth date.
pub fn age_cell(birth_date: &str, today: NaiveDate) -> String {
    parse_flexible_date(birth_date)
        .map(|birth| calculate_age(birth, today).to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Tenure in months from the join date up to the retire date, or up to
/// `today` while no retire date is set.
///
/// A retire date that does not parse, or one before the join date, yields
/// [`EMPTY_CELL`].
pub fn tenure_cell(join_date: &str, retire_date: &str, today: NaiveDate) -> String {
    let Some(join) = parse_flexible_date(join_date) else {
        return EMPTY_CELL.to_string();
    };
    let end = if is_blank_cell(retire_date) {
        today
    } else {
        match parse_flexible_date(retire_date) {
            Some(date) => date,
            None => return EMPTY_CELL.to_string(),
        }
    };
    if end < join {
        return EMPTY_CELL.to_string();
    }
    diff_months(join, end).to_string()
}

/// Derived columns fed by a source column.
pub fn derived_from(column: ColumnKey) -> &'static [ColumnKey] {
    match column {
        ColumnKey::RetireDate => &[ColumnKey::RetireMonth, ColumnKey::TenureMonths],
        ColumnKey::JoinDate => &[ColumnKey::TenureMonths],
        ColumnKey::BirthDate => &[ColumnKey::Age],
        _ => &[],
    }
}

/// Recompute one derived cell of `row` from its current source cells.
pub fn recompute(row: &mut NormalizedRow, derived: ColumnKey, today: NaiveDate) {
    let value = match derived {
        ColumnKey::RetireMonth => retire_month_label(row.cell_or_empty(ColumnKey::RetireDate)),
        ColumnKey::Age => age_cell(row.cell_or_empty(ColumnKey::BirthDate), today),
        ColumnKey::TenureMonths => tenure_cell(
            row.cell_or_empty(ColumnKey::JoinDate),
            row.cell_or_empty(ColumnKey::RetireDate),
            today,
        ),
        _ => return,
    };
    row.set_cell(derived, value);
}

/// Bring every derived cell fed by `column` up to date.
pub fn refresh_after_change(row: &mut NormalizedRow, column: ColumnKey, today: NaiveDate) {
    for derived in derived_from(column) {
        recompute(row, *derived, today);
    }
}
