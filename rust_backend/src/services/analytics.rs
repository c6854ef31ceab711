//! Retirement analytics aggregation.
//!
//! Eligible records (any retirement marker present) are bucketed along a
//! month or year axis and split into series by reason, department, age band
//! or tenure band.
//!
//! Records without a parseable period are never dropped: they are placed by
//! an [`ImputationPolicy`]. Placement only depends on the dataset, the axis,
//! the settings and the reference date, so repeated aggregation of the same
//! input yields identical buckets, and changing filters never moves a row.

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::categories::{order_series_keys, resolve_series_key, CategoryCandidates, UNKNOWN_CATEGORY};
use crate::editing::derived::{calculate_age, diff_months};
use crate::models::{AgeBand, ColumnKey, EmployeeRecord, RawValue, RecordId, TenureBand};
use crate::parsing::dates::{month_distance, month_key, parse_flexible_date, parse_month_label, shift_month};
use crate::transformations::{is_blank_cell, normalize_cell};

/// Default trailing window of the month axis.
pub const DEFAULT_MONTH_WINDOW: u32 = 12;

/// Longest month axis the engine will build; larger windows are clamped.
pub const MAX_MONTH_WINDOW: u32 = 1200;

/// Default date for records without a period marker.
pub fn default_imputation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Time axis of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Month,
    Year,
}

/// Categorical dimension splitting each bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    Reason,
    Department,
    AgeBand,
    TenureBand,
}

impl SeriesMode {
    pub fn label(&self) -> &'static str {
        match self {
            SeriesMode::Reason => "退職理由",
            SeriesMode::Department => "部署",
            SeriesMode::AgeBand => "年齢",
            SeriesMode::TenureBand => "在籍月数",
        }
    }
}

/// Placement of records that carry no parseable period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationPolicy {
    /// Place every undated record at one date. On the month axis the date is
    /// clamped into the window.
    FixedDate(NaiveDate),
    /// Spread undated records round-robin over the axis buckets, ordered by
    /// numeric id then input position.
    Distribute,
}

impl Default for ImputationPolicy {
    fn default() -> Self {
        ImputationPolicy::FixedDate(default_imputation_date())
    }
}

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Trailing months on the month axis, clamped to `1..=MAX_MONTH_WINDOW`.
    pub month_window: u32,
    pub imputation: ImputationPolicy,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            month_window: DEFAULT_MONTH_WINDOW,
            imputation: ImputationPolicy::default(),
        }
    }
}

/// One eligible record, with its categorical values resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRow {
    pub id: RecordId,
    /// Position in the source collection.
    pub ordinal: usize,
    /// Retire date, else retire month; `None` when neither parses.
    pub explicit_date: Option<NaiveDate>,
    pub department: String,
    pub status: String,
    pub reason: String,
    pub client: String,
    pub gender: String,
    pub age: Option<f64>,
    pub tenure_months: Option<f64>,
    pub record: EmployeeRecord,
}

impl AnalyticsRow {
    /// Series key of this row for a mode.
    pub fn series_key(&self, mode: SeriesMode) -> String {
        match mode {
            SeriesMode::Reason => self.reason.clone(),
            SeriesMode::Department => self.department.clone(),
            SeriesMode::AgeBand => self
                .age
                .and_then(AgeBand::from_age)
                .map_or(UNKNOWN_CATEGORY, |band| band.label())
                .to_string(),
            SeriesMode::TenureBand => self
                .tenure_months
                .and_then(TenureBand::from_months)
                .map_or(UNKNOWN_CATEGORY, |band| band.label())
                .to_string(),
        }
    }
}

/// Eligible rows plus the counts needed for "N of M" displays.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsDataset {
    pub rows: Vec<AnalyticsRow>,
    pub ineligible_count: usize,
    pub candidates: CategoryCandidates,
}

impl AnalyticsDataset {
    pub fn eligible_count(&self) -> usize {
        self.rows.len()
    }

    pub fn total_count(&self) -> usize {
        self.rows.len() + self.ineligible_count
    }
}

fn text_cell(record: &EmployeeRecord, key: ColumnKey) -> String {
    normalize_cell(record.get(key))
}

fn numeric_cell(record: &EmployeeRecord, key: ColumnKey) -> Option<f64> {
    match record.get(key) {
        RawValue::Number(n) if n.is_finite() => Some(*n),
        RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Whether a record carries any retirement marker.
pub fn is_eligible(record: &EmployeeRecord) -> bool {
    [ColumnKey::RetireDate, ColumnKey::RetireMonth, ColumnKey::Reason]
        .into_iter()
        .any(|key| !is_blank_cell(&text_cell(record, key)))
}

/// Explicit period of a record: retire date, else retire month label.
pub fn explicit_period(record: &EmployeeRecord) -> Option<NaiveDate> {
    parse_flexible_date(&text_cell(record, ColumnKey::RetireDate))
        .or_else(|| parse_month_label(&text_cell(record, ColumnKey::RetireMonth)))
}

fn resolve_age(record: &EmployeeRecord, reference: NaiveDate) -> Option<f64> {
    numeric_cell(record, ColumnKey::Age).or_else(|| {
        parse_flexible_date(&text_cell(record, ColumnKey::BirthDate))
            .map(|birth| f64::from(calculate_age(birth, reference)))
    })
}

fn resolve_tenure(record: &EmployeeRecord, reference: NaiveDate) -> Option<f64> {
    numeric_cell(record, ColumnKey::TenureMonths).or_else(|| {
        let join = parse_flexible_date(&text_cell(record, ColumnKey::JoinDate))?;
        let end = parse_flexible_date(&text_cell(record, ColumnKey::RetireDate)).unwrap_or(reference);
        (end >= join).then(|| f64::from(diff_months(join, end)))
    })
}

/// Split records into eligible analytics rows and an ineligible count.
///
/// # Arguments
/// * `records` - Source records, in source order
/// * `candidates` - Category candidate lists used to resolve series keys
/// * `reference_date` - "Today" for ages and open-ended tenures
pub fn prepare_analytics_rows(
    records: &[EmployeeRecord],
    candidates: &CategoryCandidates,
    reference_date: NaiveDate,
) -> AnalyticsDataset {
    let mut rows = Vec::new();
    let mut ineligible_count = 0;

    for (ordinal, record) in records.iter().enumerate() {
        if !is_eligible(record) {
            ineligible_count += 1;
            continue;
        }
        rows.push(AnalyticsRow {
            id: record.id.clone(),
            ordinal,
            explicit_date: explicit_period(record),
            department: resolve_series_key(&text_cell(record, ColumnKey::Department), &candidates.departments),
            status: resolve_series_key(&text_cell(record, ColumnKey::Status), &candidates.statuses),
            reason: resolve_series_key(&text_cell(record, ColumnKey::Reason), &candidates.reasons),
            client: resolve_series_key(&text_cell(record, ColumnKey::Client), &candidates.clients),
            gender: resolve_series_key(&text_cell(record, ColumnKey::Gender), &candidates.genders),
            age: resolve_age(record, reference_date),
            tenure_months: resolve_tenure(record, reference_date),
            record: record.clone(),
        });
    }

    debug!(
        "Prepared {} eligible analytics rows ({} ineligible)",
        rows.len(),
        ineligible_count
    );

    AnalyticsDataset {
        rows,
        ineligible_count,
        candidates: candidates.clone(),
    }
}

/// Row filter applied during aggregation.
pub trait RowPredicate {
    fn matches(&self, row: &AnalyticsRow) -> bool;
}

impl<F> RowPredicate for F
where
    F: Fn(&AnalyticsRow) -> bool,
{
    fn matches(&self, row: &AnalyticsRow) -> bool {
        self(row)
    }
}

/// Multi-select filter over resolved categorical values. Empty sets do not
/// filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsFilter {
    pub statuses: BTreeSet<String>,
    pub clients: BTreeSet<String>,
    pub genders: BTreeSet<String>,
    pub departments: BTreeSet<String>,
}

impl AnalyticsFilter {
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
            && self.clients.is_empty()
            && self.genders.is_empty()
            && self.departments.is_empty()
    }
}

impl RowPredicate for AnalyticsFilter {
    fn matches(&self, row: &AnalyticsRow) -> bool {
        let pass = |set: &BTreeSet<String>, value: &str| set.is_empty() || set.contains(value);
        pass(&self.statuses, &row.status)
            && pass(&self.clients, &row.client)
            && pass(&self.genders, &row.gender)
            && pass(&self.departments, &row.department)
    }
}

/// Axis and series selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub axis: Axis,
    pub series_mode: SeriesMode,
}

/// One axis unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// `YYYY-MM` on the month axis, `YYYY` on the year axis.
    pub period: String,
    /// Short display label (`3月`, `2026`).
    pub label: String,
    /// Count per series key; every series key is present.
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
}

/// Chart-ready aggregation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub axis: Axis,
    pub buckets: Vec<Bucket>,
    pub series_keys: Vec<String>,
    /// Rows matching the predicate that were placed in a bucket.
    pub filtered_count: usize,
    /// Eligible rows in the dataset.
    pub eligible_count: usize,
    /// Rows matching the predicate whose explicit date fell outside the
    /// month window.
    pub out_of_window_count: usize,
}

impl Aggregation {
    /// Largest bucket total, the input of the nice-axis calculator.
    pub fn max_bucket_total(&self) -> usize {
        self.buckets.iter().map(|b| b.total).max().unwrap_or(0)
    }
}

/// Bucket placement of analytics rows for one axis.
///
/// Shared by [`aggregate`] and the drill-down views so both agree on which
/// period a row belongs to.
#[derive(Debug, Clone)]
pub struct PeriodResolver {
    axis: Axis,
    periods: Vec<String>,
    /// Axis start: first month of the window, or January of the first year.
    start: NaiveDate,
    imputed: HashMap<usize, usize>,
}

impl PeriodResolver {
    pub fn new(
        dataset: &AnalyticsDataset,
        axis: Axis,
        settings: &AnalyticsSettings,
        reference_date: NaiveDate,
    ) -> Self {
        let (start, periods) = match axis {
            Axis::Month => {
                let window = i32::try_from(settings.month_window.clamp(1, MAX_MONTH_WINDOW)).unwrap_or(1);
                let start = shift_month(reference_date, -(window - 1));
                let periods = (0..window)
                    .map(|i| month_key(shift_month(start, i)))
                    .collect();
                (start, periods)
            }
            Axis::Year => {
                let mut years: Vec<i32> = dataset
                    .rows
                    .iter()
                    .filter_map(|r| r.explicit_date.map(|d| d.year()))
                    .collect();
                let has_undated = dataset.rows.iter().any(|r| r.explicit_date.is_none());
                if let (true, ImputationPolicy::FixedDate(date)) = (has_undated, settings.imputation) {
                    years.push(date.year());
                }
                let first = years.iter().copied().min().unwrap_or(reference_date.year());
                let last = years.iter().copied().max().unwrap_or(reference_date.year());
                let start = NaiveDate::from_ymd_opt(first, 1, 1).unwrap_or(reference_date);
                (start, (first..=last).map(|y| y.to_string()).collect())
            }
        };

        let mut resolver = Self {
            axis,
            periods,
            start,
            imputed: HashMap::new(),
        };
        resolver.imputed = resolver.impute(dataset, settings);
        resolver
    }

    fn impute(&self, dataset: &AnalyticsDataset, settings: &AnalyticsSettings) -> HashMap<usize, usize> {
        let mut undated: Vec<&AnalyticsRow> = dataset
            .rows
            .iter()
            .filter(|r| r.explicit_date.is_none())
            .collect();
        undated.sort_by(|a, b| {
            a.id.numeric_order()
                .total_cmp(&b.id.numeric_order())
                .then(a.ordinal.cmp(&b.ordinal))
        });

        let last = self.periods.len().saturating_sub(1);
        undated
            .iter()
            .enumerate()
            .map(|(position, row)| {
                let index = match settings.imputation {
                    ImputationPolicy::Distribute => position % self.periods.len().max(1),
                    ImputationPolicy::FixedDate(date) => {
                        self.index_of(date).clamp(0, last as i64) as usize
                    }
                };
                (row.ordinal, index)
            })
            .collect()
    }

    /// Unclamped bucket offset of a date from the axis start.
    fn index_of(&self, date: NaiveDate) -> i64 {
        match self.axis {
            Axis::Month => i64::from(month_distance(self.start, date)),
            Axis::Year => i64::from(date.year() - self.start.year()),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Period keys in axis order.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Bucket index of a row, or `None` when its explicit date is off-axis.
    pub fn bucket_index(&self, row: &AnalyticsRow) -> Option<usize> {
        match row.explicit_date {
            Some(date) => {
                let offset = self.index_of(date);
                (0..self.periods.len() as i64)
                    .contains(&offset)
                    .then_some(offset as usize)
            }
            None => self.imputed.get(&row.ordinal).copied(),
        }
    }

    /// Period key of a row, or `None` when off-axis.
    pub fn period_key(&self, row: &AnalyticsRow) -> Option<&str> {
        self.bucket_index(row)
            .and_then(|i| self.periods.get(i))
            .map(String::as_str)
    }
}

fn series_candidates(mode: SeriesMode, candidates: &CategoryCandidates) -> Vec<String> {
    match mode {
        SeriesMode::Reason => candidates.reasons.clone(),
        SeriesMode::Department => candidates.departments.clone(),
        SeriesMode::AgeBand => AgeBand::ALL.iter().map(|b| b.label().to_string()).collect(),
        SeriesMode::TenureBand => TenureBand::ALL.iter().map(|b| b.label().to_string()).collect(),
    }
}

/// Display label of a period key (`2026-03` → `3月`, `2026` → `2026`).
pub fn format_period_label(axis: Axis, period: &str) -> String {
    match axis {
        Axis::Month => parse_month_label(period)
            .map(|d| format!("{}月", d.month()))
            .unwrap_or_else(|| period.to_string()),
        Axis::Year => period.to_string(),
    }
}

/// Aggregate eligible rows into zero-filled axis buckets.
///
/// # Arguments
/// * `dataset` - Eligible rows from [`prepare_analytics_rows`]
/// * `request` - Axis and series mode
/// * `predicate` - Row filter; rows failing it are not counted
/// * `settings` - Window size and imputation policy
/// * `reference_date` - Right edge of the month window
pub fn aggregate<P: RowPredicate + ?Sized>(
    dataset: &AnalyticsDataset,
    request: &AggregationRequest,
    predicate: &P,
    settings: &AnalyticsSettings,
    reference_date: NaiveDate,
) -> Aggregation {
    let resolver = PeriodResolver::new(dataset, request.axis, settings, reference_date);
    let mut counts: Vec<BTreeMap<String, usize>> = vec![BTreeMap::new(); resolver.periods().len()];
    let mut filtered_count = 0;
    let mut out_of_window_count = 0;

    for row in dataset.rows.iter().filter(|r| predicate.matches(r)) {
        match resolver.bucket_index(row) {
            Some(index) => {
                *counts[index].entry(row.series_key(request.series_mode)).or_insert(0) += 1;
                filtered_count += 1;
            }
            None => out_of_window_count += 1,
        }
    }

    let candidates = series_candidates(request.series_mode, &dataset.candidates);
    let series_keys = order_series_keys(
        &candidates,
        counts.iter().flat_map(|c| c.keys().map(String::as_str)),
    );

    let buckets = resolver
        .periods()
        .iter()
        .zip(counts)
        .map(|(period, observed)| {
            let total = observed.values().sum();
            let counts = series_keys
                .iter()
                .map(|key| (key.clone(), observed.get(key).copied().unwrap_or(0)))
                .collect();
            Bucket {
                period: period.clone(),
                label: format_period_label(request.axis, period),
                counts,
                total,
            }
        })
        .collect();

    Aggregation {
        axis: request.axis,
        buckets,
        series_keys,
        filtered_count,
        eligible_count: dataset.eligible_count(),
        out_of_window_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn reference() -> NaiveDate {
        d(2026, 10, 16)
    }

    fn dataset(records: Vec<EmployeeRecord>) -> AnalyticsDataset {
        prepare_analytics_rows(&records, &CategoryCandidates::default(), reference())
    }

    fn request(axis: Axis, series_mode: SeriesMode) -> AggregationRequest {
        AggregationRequest { axis, series_mode }
    }

    fn all(_: &AnalyticsRow) -> bool {
        true
    }

    #[test]
    fn test_eligibility() {
        let data = dataset(vec![
            EmployeeRecord::new("1").with(ColumnKey::Name, "現職"),
            EmployeeRecord::new("2").with(ColumnKey::RetireDate, "2026/3/5"),
            EmployeeRecord::new("3").with(ColumnKey::Reason, "家庭問題"),
            EmployeeRecord::new("4").with(ColumnKey::RetireMonth, "未定"),
        ]);
        assert_eq!(data.eligible_count(), 3);
        assert_eq!(data.ineligible_count, 1);
        assert_eq!(data.total_count(), 4);
        assert_eq!(data.rows[0].explicit_date, Some(d(2026, 3, 5)));
        assert_eq!(data.rows[2].explicit_date, None);
    }

    #[test]
    fn test_month_window_is_zero_filled() {
        let data = dataset(vec![EmployeeRecord::new("1").with(ColumnKey::RetireDate, "2026/10/1")]);
        let result = aggregate(&data, &request(Axis::Month, SeriesMode::Reason), &all, &AnalyticsSettings::default(), reference());
        assert_eq!(result.buckets.len(), 12);
        assert_eq!(result.buckets[0].period, "2025-11");
        assert_eq!(result.buckets[11].period, "2026-10");
        assert_eq!(result.buckets[11].label, "10月");
        assert_eq!(result.buckets[11].total, 1);
        assert_eq!(result.buckets[11].counts[UNKNOWN_CATEGORY], 1);
        assert!(result.buckets[..11].iter().all(|b| b.total == 0));
        assert_eq!(result.series_keys.last().map(String::as_str), Some(UNKNOWN_CATEGORY));
    }

    #[test]
    fn test_oversized_month_window_is_clamped() {
        let data = dataset(vec![EmployeeRecord::new("1").with(ColumnKey::RetireDate, "2026/10/1")]);
        let settings = AnalyticsSettings {
            month_window: 3_000_000_000,
            ..AnalyticsSettings::default()
        };
        let result = aggregate(&data, &request(Axis::Month, SeriesMode::Reason), &all, &settings, reference());
        assert_eq!(result.buckets.len(), MAX_MONTH_WINDOW as usize);
        assert_eq!(result.buckets.last().map(|b| b.period.as_str()), Some("2026-10"));
        assert_eq!(result.filtered_count, 1);
    }

    #[test]
    fn test_fixed_date_is_clamped_into_window() {
        let data = dataset(vec![EmployeeRecord::new("1").with(ColumnKey::Reason, "給与不満")]);
        let result = aggregate(&data, &request(Axis::Month, SeriesMode::Reason), &all, &AnalyticsSettings::default(), reference());
        assert_eq!(result.buckets[0].counts["給与不満"], 1);
        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.out_of_window_count, 0);
    }

    #[test]
    fn test_explicit_dates_outside_window_are_counted_separately() {
        let data = dataset(vec![EmployeeRecord::new("1").with(ColumnKey::RetireDate, "2020/1/1")]);
        let result = aggregate(&data, &request(Axis::Month, SeriesMode::Reason), &all, &AnalyticsSettings::default(), reference());
        assert_eq!(result.filtered_count, 0);
        assert_eq!(result.out_of_window_count, 1);
    }

    #[test]
    fn test_distribute_round_robin_by_numeric_id() {
        let records = (1..=5)
            .rev()
            .map(|i| EmployeeRecord::new(i.to_string()).with(ColumnKey::Reason, "家庭問題"))
            .collect();
        let data = dataset(records);
        let settings = AnalyticsSettings {
            month_window: 3,
            imputation: ImputationPolicy::Distribute,
        };
        let resolver = PeriodResolver::new(&data, Axis::Month, &settings, reference());
        let placements: Vec<(&str, Option<&str>)> = data
            .rows
            .iter()
            .map(|r| (r.id.as_str(), resolver.period_key(r)))
            .collect();
        assert_eq!(
            placements,
            vec![
                ("5", Some("2026-09")),
                ("4", Some("2026-08")),
                ("3", Some("2026-10")),
                ("2", Some("2026-09")),
                ("1", Some("2026-08")),
            ]
        );
    }

    #[test]
    fn test_year_axis_spans_resolved_dates() {
        let data = dataset(vec![
            EmployeeRecord::new("1").with(ColumnKey::RetireDate, "2021/5/1"),
            EmployeeRecord::new("2").with(ColumnKey::RetireMonth, "2025年2月"),
            EmployeeRecord::new("3").with(ColumnKey::Reason, "会社不信"),
        ]);
        let result = aggregate(&data, &request(Axis::Year, SeriesMode::Reason), &all, &AnalyticsSettings::default(), reference());
        let periods: Vec<&str> = result.buckets.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(periods, vec!["2021", "2022", "2023", "2024", "2025"]);
        assert_eq!(result.buckets[3].counts["会社不信"], 1);
        assert_eq!(result.filtered_count, 3);
    }

    #[test]
    fn test_series_modes_and_unknown_values() {
        let data = dataset(vec![
            EmployeeRecord::new("1").with(ColumnKey::RetireDate, "2026/9/1").with(ColumnKey::Department, "総務").with(ColumnKey::Age, 34.0),
            EmployeeRecord::new("2").with(ColumnKey::RetireDate, "2026/9/2").with(ColumnKey::Department, "なし").with(ColumnKey::TenureMonths, "40"),
        ]);
        let by_department = aggregate(&data, &request(Axis::Month, SeriesMode::Department), &all, &AnalyticsSettings::default(), reference());
        assert_eq!(by_department.series_keys, vec!["人事", "営業", "開発", "派遣", "総務", "未選択"]);
        let september = &by_department.buckets[10];
        assert_eq!(september.counts["総務"], 1);
        assert_eq!(september.counts["未選択"], 1);
        assert_eq!(september.counts["人事"], 0);

        let by_age = aggregate(&data, &request(Axis::Month, SeriesMode::AgeBand), &all, &AnalyticsSettings::default(), reference());
        assert_eq!(by_age.buckets[10].counts["30代"], 1);
        assert_eq!(by_age.buckets[10].counts[UNKNOWN_CATEGORY], 1);

        let by_tenure = aggregate(&data, &request(Axis::Month, SeriesMode::TenureBand), &all, &AnalyticsSettings::default(), reference());
        assert_eq!(by_tenure.buckets[10].counts["36ヶ月超"], 1);
    }

    #[test]
    fn test_filter_predicate() {
        let data = dataset(vec![
            EmployeeRecord::new("1").with(ColumnKey::RetireDate, "2026/9/1").with(ColumnKey::Status, "待機"),
            EmployeeRecord::new("2").with(ColumnKey::RetireDate, "2026/9/1").with(ColumnKey::Status, "稼働中"),
        ]);
        let mut filter = AnalyticsFilter::default();
        filter.statuses.insert("待機".to_string());
        let result = aggregate(&data, &request(Axis::Month, SeriesMode::Reason), &filter, &AnalyticsSettings::default(), reference());
        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.eligible_count, 2);
        assert_eq!(result.max_bucket_total(), 1);
    }
}
