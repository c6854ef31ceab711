//! Row filters for the employee management table.
//!
//! Every filter group is inactive while empty. Once a group has a selection,
//! rows whose cell is missing for that group are excluded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::normalize::is_blank_cell;
use crate::models::{AgeBand, ColumnKey, NormalizedRow, TenureBand};
use crate::parsing::dates::parse_slash_date;

/// Free-form range and equality conditions of the detail filter panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailFilter {
    pub age_min: Option<f64>,
    pub age_max: Option<f64>,
    pub tenure_min: Option<f64>,
    pub tenure_max: Option<f64>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub join_from: Option<NaiveDate>,
    pub join_to: Option<NaiveDate>,
    pub retire_from: Option<NaiveDate>,
    pub retire_to: Option<NaiveDate>,
}

/// Filter state of the management table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterFilters {
    pub age_bands: BTreeSet<AgeBand>,
    pub tenure_bands: BTreeSet<TenureBand>,
    pub statuses: BTreeSet<String>,
    pub genders: BTreeSet<String>,
    pub detail: DetailFilter,
}

impl RosterFilters {
    pub fn toggle_age_band(&mut self, band: AgeBand) {
        if !self.age_bands.remove(&band) {
            self.age_bands.insert(band);
        }
    }

    pub fn toggle_tenure_band(&mut self, band: TenureBand) {
        if !self.tenure_bands.remove(&band) {
            self.tenure_bands.insert(band);
        }
    }

    pub fn toggle_status(&mut self, status: &str) {
        if !self.statuses.remove(status) {
            self.statuses.insert(status.to_string());
        }
    }

    pub fn toggle_gender(&mut self, gender: &str) {
        if !self.genders.remove(gender) {
            self.genders.insert(gender.to_string());
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a single row passes every active condition.
    pub fn matches(&self, row: &NormalizedRow) -> bool {
        let age = numeric_cell(row, ColumnKey::Age);
        let tenure = numeric_cell(row, ColumnKey::TenureMonths);
        let status = present_cell(row, ColumnKey::Status);
        let gender = present_cell(row, ColumnKey::Gender);

        if !self.age_bands.is_empty() {
            match age.and_then(AgeBand::from_age) {
                Some(band) if self.age_bands.contains(&band) => {}
                _ => return false,
            }
        }
        if !self.tenure_bands.is_empty() {
            match tenure.and_then(TenureBand::from_months) {
                Some(band) if self.tenure_bands.contains(&band) => {}
                _ => return false,
            }
        }
        if !self.statuses.is_empty() && !status.is_some_and(|s| self.statuses.contains(s)) {
            return false;
        }
        if !self.genders.is_empty() && !gender.is_some_and(|g| self.genders.contains(g)) {
            return false;
        }

        let detail = &self.detail;
        if !within(age, detail.age_min, detail.age_max)
            || !within(tenure, detail.tenure_min, detail.tenure_max)
        {
            return false;
        }
        if detail.gender.as_deref().is_some_and(|g| Some(g) != gender) {
            return false;
        }
        if detail.status.as_deref().is_some_and(|s| Some(s) != status) {
            return false;
        }

        let join = row.cell(ColumnKey::JoinDate).and_then(parse_slash_date);
        let retire = row.cell(ColumnKey::RetireDate).and_then(parse_slash_date);
        within(join, detail.join_from, detail.join_to)
            && within(retire, detail.retire_from, detail.retire_to)
    }
}

fn present_cell(row: &NormalizedRow, key: ColumnKey) -> Option<&str> {
    row.cell(key).filter(|c| !is_blank_cell(c)).map(str::trim)
}

fn numeric_cell(row: &NormalizedRow, key: ColumnKey) -> Option<f64> {
    present_cell(row, key)?
        .parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
}

/// Inclusive bound check; a missing value fails any set bound.
fn within<T: PartialOrd>(value: Option<T>, min: Option<T>, max: Option<T>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}

/// Apply the filter state to a row set, keeping input order.
pub fn apply_filters(rows: &[NormalizedRow], filters: &RosterFilters) -> Vec<NormalizedRow> {
    rows.iter().filter(|r| filters.matches(r)).cloned().collect()
}

/// Rows whose cell for `column` equals `value` exactly (after trimming).
pub fn filter_by_column(rows: &[NormalizedRow], column: ColumnKey, value: &str) -> Vec<NormalizedRow> {
    rows.iter()
        .filter(|r| r.cell(column).map(str::trim) == Some(value.trim()))
        .cloned()
        .collect()
}

/// Keyword search over name and id.
///
/// The query is trimmed and matched case-insensitively as a substring. A blank
/// query keeps every row.
pub fn search_rows(rows: &[NormalizedRow], query: &str) -> Vec<NormalizedRow> {
    let keyword = query.trim().to_lowercase();
    if keyword.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|r| {
            present_cell(r, ColumnKey::Name).is_some_and(|name| name.to_lowercase().contains(&keyword))
                || r.id.as_str().to_lowercase().contains(&keyword)
        })
        .cloned()
        .collect()
}

/// Rows with the given active state.
pub fn filter_by_active(rows: &[NormalizedRow], is_active: bool) -> Vec<NormalizedRow> {
    rows.iter()
        .filter(|r| r.is_active == is_active)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;

    fn row(id: &str, age: &str, tenure: &str, status: &str, gender: &str) -> NormalizedRow {
        NormalizedRow::new(RecordId::from(id), true)
            .with_cell(ColumnKey::Age, age)
            .with_cell(ColumnKey::TenureMonths, tenure)
            .with_cell(ColumnKey::Status, status)
            .with_cell(ColumnKey::Gender, gender)
            .with_cell(ColumnKey::JoinDate, "2020/4/1")
            .with_cell(ColumnKey::RetireDate, "-")
    }

    fn sample() -> Vec<NormalizedRow> {
        vec![
            row("1", "25", "12", "待機", "男性"),
            row("2", "45", "40", "開発", "女性"),
            row("3", "-", "3", "派遣", "-"),
        ]
    }

    fn ids(rows: &[NormalizedRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filters_pass_everything() {
        assert_eq!(apply_filters(&sample(), &RosterFilters::default()).len(), 3);
    }

    #[test]
    fn test_band_groups_exclude_missing_values() {
        let mut filters = RosterFilters::default();
        filters.toggle_age_band(AgeBand::Twenties);
        filters.toggle_age_band(AgeBand::Forties);
        assert_eq!(ids(&apply_filters(&sample(), &filters)), vec!["1", "2"]);

        filters.toggle_age_band(AgeBand::Forties);
        filters.toggle_tenure_band(TenureBand::Over36);
        assert!(apply_filters(&sample(), &filters).is_empty());
    }

    #[test]
    fn test_multi_select_groups() {
        let mut filters = RosterFilters::default();
        filters.toggle_status("派遣");
        filters.toggle_status("待機");
        assert_eq!(ids(&apply_filters(&sample(), &filters)), vec!["1", "3"]);
        filters.toggle_gender("男性");
        assert_eq!(ids(&apply_filters(&sample(), &filters)), vec!["1"]);
    }

    #[test]
    fn test_detail_ranges() {
        let mut filters = RosterFilters::default();
        filters.detail.tenure_min = Some(10.0);
        filters.detail.tenure_max = Some(40.0);
        assert_eq!(ids(&apply_filters(&sample(), &filters)), vec!["1", "2"]);

        filters.detail = DetailFilter {
            retire_from: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..DetailFilter::default()
        };
        assert!(apply_filters(&sample(), &filters).is_empty());

        filters.detail = DetailFilter {
            join_to: NaiveDate::from_ymd_opt(2020, 4, 1),
            ..DetailFilter::default()
        };
        assert_eq!(apply_filters(&sample(), &filters).len(), 3);
    }

    #[test]
    fn test_search_by_name_or_id() {
        let rows = vec![
            row("A-7", "30", "5", "待機", "男性").with_cell(ColumnKey::Name, "Yamada Taro"),
            row("12", "30", "5", "待機", "男性").with_cell(ColumnKey::Name, "佐藤"),
            row("3", "30", "5", "待機", "男性").with_cell(ColumnKey::Name, "-"),
        ];
        assert_eq!(ids(&search_rows(&rows, "  yamada ")), vec!["A-7"]);
        assert_eq!(ids(&search_rows(&rows, "a-7")), vec!["A-7"]);
        assert_eq!(ids(&search_rows(&rows, "佐")), vec!["12"]);
        assert_eq!(ids(&search_rows(&rows, "1")), vec!["12"]);
        // The empty-cell sentinel is not searchable text.
        assert_eq!(ids(&search_rows(&rows, "-")), vec!["A-7"]);
        assert_eq!(search_rows(&rows, "   ").len(), 3);
        assert!(search_rows(&rows, "鈴木").is_empty());
    }

    #[test]
    fn test_column_and_active_filters() {
        let mut rows = sample();
        rows[1].is_active = false;
        assert_eq!(ids(&filter_by_column(&rows, ColumnKey::Status, "開発")), vec!["2"]);
        assert_eq!(ids(&filter_by_active(&rows, true)), vec!["1", "3"]);
    }
}
