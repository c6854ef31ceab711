//! Per-cell validation of draft rows.
//!
//! Validation lives outside the session: the session only records the
//! messages returned by a [`CellValidator`] and refuses to save while any
//! cell carries one.

use chrono::{Local, NaiveDate};

use super::derived::{calculate_age, diff_months};
use crate::models::{ColumnKey, NormalizedRow};
use crate::parsing::dates::parse_flexible_date;

/// Validation collaborator consulted for every editable cell.
pub trait CellValidator: Send + Sync {
    /// Error message for `value` in `column` of `row`, or `None` when valid.
    ///
    /// `row` already holds `value`, so cross-column rules read the other
    /// cells of the same draft row.
    fn validate(&self, row: &NormalizedRow, column: ColumnKey, value: &str) -> Option<String>;
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl CellValidator for NoValidation {
    fn validate(&self, _row: &NormalizedRow, _column: ColumnKey, _value: &str) -> Option<String> {
        None
    }
}

pub const NAME_TOO_SHORT: &str = "名前を2文字以上で入力してください";
pub const NAME_TOO_LONG: &str = "名前は50文字を超えて入力できません";
pub const BIRTH_DATE_INVALID: &str = "生年月日の形式が正しくありません";
pub const BIRTH_DATE_BEFORE_1900: &str = "生年月日は1900年以降の日付を入力してください";
pub const BIRTH_DATE_IN_FUTURE: &str = "生年月日が未来の日付です";
pub const BIRTH_DATE_UNDER_15: &str = "15歳未満の可能性があるため確認してください";
pub const BIRTH_DATE_OVER_75: &str = "75歳以上の可能性があるため確認してください";
pub const JOIN_DATE_INVALID: &str = "入社日の形式が正しくありません";
pub const JOIN_DATE_BEFORE_1900: &str = "入社日は1900年以降の日付を入力してください";
pub const JOIN_DATE_IN_FUTURE: &str = "入社日が未来の日付です";
pub const JOIN_DATE_BEFORE_15_YEARS: &str = "入社日が生年月日から15年未満です";
pub const RETIRE_DATE_INVALID: &str = "退職日の形式が正しくありません";
pub const RETIRE_DATE_BEFORE_JOIN_DATE: &str = "退職日は入社日より前の日付にできません";
pub const RETIRE_DATE_IN_FUTURE: &str = "退職日が未来の日付です（退職予定の確認が必要です）";
pub const RETIRE_DATE_OVER_50_YEARS: &str = "勤続50年以上のため入力ミスの可能性があります";
pub const STATUS_TOO_LONG: &str = "稼働状態は20文字以内で入力してください";
pub const REMARK_TOO_LONG: &str = "備考は200文字以内で入力してください";

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const STATUS_MAX_CHARS: usize = 20;
const REMARK_MAX_CHARS: usize = 200;
const MIN_AGE: i32 = 15;
const MAX_AGE: i32 = 75;
const MAX_TENURE_MONTHS: i32 = 50 * 12;

/// Default rule set for employee rows.
#[derive(Debug, Clone)]
pub struct EmployeeCellValidator {
    today: Option<NaiveDate>,
}

impl Default for EmployeeCellValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeeCellValidator {
    /// Validator that compares against the local calendar date.
    pub fn new() -> Self {
        Self { today: None }
    }

    /// Validator pinned to a fixed "today".
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn min_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    fn validate_retire_date(&self, row: &NormalizedRow, raw: &str) -> Option<&'static str> {
        let retire = match parse_flexible_date(raw) {
            Some(date) => date,
            None => return Some(RETIRE_DATE_INVALID),
        };
        let join = row.cell(ColumnKey::JoinDate).and_then(parse_flexible_date);
        if join.is_some_and(|join| retire < join) {
            return Some(RETIRE_DATE_BEFORE_JOIN_DATE);
        }
        if retire > self.today() {
            return Some(RETIRE_DATE_IN_FUTURE);
        }
        if join.is_some_and(|join| diff_months(join, retire) >= MAX_TENURE_MONTHS) {
            return Some(RETIRE_DATE_OVER_50_YEARS);
        }
        None
    }

    fn validate_birth_date(&self, raw: &str) -> Option<&'static str> {
        let birth = match parse_flexible_date(raw) {
            Some(date) => date,
            None => return Some(BIRTH_DATE_INVALID),
        };
        let today = self.today();
        if birth < Self::min_date() {
            return Some(BIRTH_DATE_BEFORE_1900);
        }
        if birth > today {
            return Some(BIRTH_DATE_IN_FUTURE);
        }
        let age = calculate_age(birth, today);
        if age < MIN_AGE {
            return Some(BIRTH_DATE_UNDER_15);
        }
        if age >= MAX_AGE {
            return Some(BIRTH_DATE_OVER_75);
        }
        None
    }

    fn validate_join_date(&self, row: &NormalizedRow, raw: &str) -> Option<&'static str> {
        let join = match parse_flexible_date(raw) {
            Some(date) => date,
            None => return Some(JOIN_DATE_INVALID),
        };
        if join < Self::min_date() {
            return Some(JOIN_DATE_BEFORE_1900);
        }
        if join > self.today() {
            return Some(JOIN_DATE_IN_FUTURE);
        }
        let birth = row.cell(ColumnKey::BirthDate).and_then(parse_flexible_date);
        if birth.is_some_and(|birth| calculate_age(birth, join) < MIN_AGE) {
            return Some(JOIN_DATE_BEFORE_15_YEARS);
        }
        None
    }
}

impl CellValidator for EmployeeCellValidator {
    fn validate(&self, row: &NormalizedRow, column: ColumnKey, value: &str) -> Option<String> {
        let trimmed = value.trim();
        let message = match column {
            ColumnKey::Name if !trimmed.is_empty() => {
                let len = trimmed.chars().count();
                if len < NAME_MIN_CHARS {
                    Some(NAME_TOO_SHORT)
                } else if len > NAME_MAX_CHARS {
                    Some(NAME_TOO_LONG)
                } else {
                    None
                }
            }
            ColumnKey::Status if trimmed.chars().count() > STATUS_MAX_CHARS => Some(STATUS_TOO_LONG),
            ColumnKey::Remark if value.chars().count() > REMARK_MAX_CHARS => Some(REMARK_TOO_LONG),
            ColumnKey::RetireDate if !trimmed.is_empty() => self.validate_retire_date(row, trimmed),
            ColumnKey::BirthDate if !trimmed.is_empty() => self.validate_birth_date(trimmed),
            ColumnKey::JoinDate if !trimmed.is_empty() => self.validate_join_date(row, trimmed),
            _ => None,
        };
        message.map(str::to_string)
    }
}
