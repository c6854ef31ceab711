//! Column identifiers and the standard column descriptor list.
//!
//! Column identity is the closed [`ColumnKey`] enum. The textual keys used by
//! the record source (the natural-language field names) only appear in
//! [`ColumnKey::as_str`] and in the key-mapping table in
//! [`crate::models::record`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnKey {
    #[serde(rename = "社員ID")]
    EmployeeCode,
    #[serde(rename = "部署")]
    Department,
    #[serde(rename = "退職月")]
    RetireMonth,
    #[serde(rename = "名前")]
    Name,
    #[serde(rename = "入社日")]
    JoinDate,
    #[serde(rename = "退職日")]
    RetireDate,
    #[serde(rename = "在籍月数")]
    TenureMonths,
    #[serde(rename = "ステータス")]
    Status,
    #[serde(rename = "退職理由")]
    Reason,
    #[serde(rename = "備考")]
    Remark,
    #[serde(rename = "当時のクライアント")]
    Client,
    #[serde(rename = "性別")]
    Gender,
    #[serde(rename = "生年月日")]
    BirthDate,
    #[serde(rename = "年齢")]
    Age,
}

impl ColumnKey {
    /// Every column key, in descriptor order.
    pub const ALL: [ColumnKey; 14] = [
        ColumnKey::EmployeeCode,
        ColumnKey::Department,
        ColumnKey::RetireMonth,
        ColumnKey::Name,
        ColumnKey::JoinDate,
        ColumnKey::RetireDate,
        ColumnKey::TenureMonths,
        ColumnKey::Status,
        ColumnKey::Reason,
        ColumnKey::Remark,
        ColumnKey::Client,
        ColumnKey::Gender,
        ColumnKey::BirthDate,
        ColumnKey::Age,
    ];

    /// Canonical source field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKey::EmployeeCode => "社員ID",
            ColumnKey::Department => "部署",
            ColumnKey::RetireMonth => "退職月",
            ColumnKey::Name => "名前",
            ColumnKey::JoinDate => "入社日",
            ColumnKey::RetireDate => "退職日",
            ColumnKey::TenureMonths => "在籍月数",
            ColumnKey::Status => "ステータス",
            ColumnKey::Reason => "退職理由",
            ColumnKey::Remark => "備考",
            ColumnKey::Client => "当時のクライアント",
            ColumnKey::Gender => "性別",
            ColumnKey::BirthDate => "生年月日",
            ColumnKey::Age => "年齢",
        }
    }

    /// Look up a column by its canonical source field name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Derived columns are computed from other cells and never edited directly.
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            ColumnKey::RetireMonth | ColumnKey::TenureMonths | ColumnKey::Age
        )
    }

    /// Whether an operator may change this column inside an edit session.
    pub fn is_editable(&self) -> bool {
        !self.is_derived()
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type of a column, drives the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
}

/// `{ key, label, type }` triple shared by the normalizer and all consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub key: ColumnKey,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    pub const fn new(key: ColumnKey, label: &'static str, column_type: ColumnType) -> Self {
        Self {
            key,
            label,
            column_type,
        }
    }
}

/// Columns of the employee management table, in display order.
pub const MANAGER_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::new(ColumnKey::EmployeeCode, "社員ID", ColumnType::String),
    ColumnDescriptor::new(ColumnKey::Department, "部署", ColumnType::String),
    ColumnDescriptor::new(ColumnKey::RetireMonth, "退職月", ColumnType::Date),
    ColumnDescriptor::new(ColumnKey::Name, "名前", ColumnType::String),
    ColumnDescriptor::new(ColumnKey::JoinDate, "入社日", ColumnType::Date),
    ColumnDescriptor::new(ColumnKey::RetireDate, "退職日", ColumnType::Date),
    ColumnDescriptor::new(ColumnKey::TenureMonths, "在籍月数", ColumnType::Number),
    ColumnDescriptor::new(ColumnKey::Status, "稼働状態", ColumnType::String),
    ColumnDescriptor::new(ColumnKey::Reason, "退職理由", ColumnType::String),
    ColumnDescriptor::new(ColumnKey::Remark, "備考", ColumnType::String),
    ColumnDescriptor::new(ColumnKey::Client, "稼働先", ColumnType::String),
    ColumnDescriptor::new(ColumnKey::Gender, "性別", ColumnType::String),
    ColumnDescriptor::new(ColumnKey::BirthDate, "生年月日", ColumnType::Date),
    ColumnDescriptor::new(ColumnKey::Age, "年齢", ColumnType::Number),
];

/// Find the descriptor for a key in the standard column list.
pub fn find_column(key: ColumnKey) -> Option<&'static ColumnDescriptor> {
    MANAGER_COLUMNS.iter().find(|c| c.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_columns_cover_every_key_once() {
        assert_eq!(MANAGER_COLUMNS.len(), ColumnKey::ALL.len());
        for key in ColumnKey::ALL {
            assert_eq!(MANAGER_COLUMNS.iter().filter(|c| c.key == key).count(), 1);
        }
    }

    #[test]
    fn test_key_round_trip_through_source_name() {
        for key in ColumnKey::ALL {
            assert_eq!(ColumnKey::from_key(key.as_str()), Some(key));
        }
        assert_eq!(ColumnKey::from_key("id"), None);
    }

    #[test]
    fn test_derived_columns_are_not_editable() {
        assert!(!ColumnKey::Age.is_editable());
        assert!(!ColumnKey::RetireMonth.is_editable());
        assert!(!ColumnKey::TenureMonths.is_editable());
        assert!(ColumnKey::Status.is_editable());
        assert!(ColumnKey::EmployeeCode.is_editable());
    }

    #[test]
    fn test_labels_differ_from_keys_where_renamed() {
        assert_eq!(find_column(ColumnKey::Status).unwrap().label, "稼働状態");
        assert_eq!(find_column(ColumnKey::Client).unwrap().label, "稼働先");
    }
}
