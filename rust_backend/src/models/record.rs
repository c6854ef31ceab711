//! Raw employee records and the key-mapping table.
//!
//! The record source hands out loosely shaped JSON objects whose field names
//! accumulated aliases over time. [`EmployeeRecord::from_json`] resolves each
//! [`ColumnKey`] through an ordered [`AccessorChain`]: the first alias that is
//! present and not `null` wins. The chains are a versioned contract; changing
//! the order of an alias list requires bumping [`ACCESSOR_CHAIN_VERSION`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::column::ColumnKey;
use super::row::NormalizedRow;

/// Version of the alias lists in [`KEY_MAPPING`].
pub const ACCESSOR_CHAIN_VERSION: u32 = 1;

/// Ordered source field aliases for one column.
#[derive(Debug, Clone, Copy)]
pub struct AccessorChain {
    pub key: ColumnKey,
    pub fields: &'static [&'static str],
}

impl AccessorChain {
    /// First aliased field that is present and non-null in `object`.
    pub fn resolve<'a>(&self, object: &'a serde_json::Map<String, Value>) -> Option<&'a Value> {
        self.fields
            .iter()
            .filter_map(|field| object.get(*field))
            .find(|value| !value.is_null())
    }
}

/// Key-mapping table from columns to source field aliases, highest priority first.
pub const KEY_MAPPING: &[AccessorChain] = &[
    AccessorChain {
        key: ColumnKey::EmployeeCode,
        fields: &["社員ID", "employee_code", "employeeCode"],
    },
    AccessorChain {
        key: ColumnKey::Department,
        fields: &["部署", "部門", "department"],
    },
    AccessorChain {
        key: ColumnKey::RetireMonth,
        fields: &["退職月", "retire_month", "retirementMonth"],
    },
    AccessorChain {
        key: ColumnKey::Name,
        fields: &["名前", "full_name", "name"],
    },
    AccessorChain {
        key: ColumnKey::JoinDate,
        fields: &["入社日", "join_date", "joinDate"],
    },
    AccessorChain {
        key: ColumnKey::RetireDate,
        fields: &["退職日", "retire_date", "retirementDate"],
    },
    AccessorChain {
        key: ColumnKey::TenureMonths,
        fields: &["在籍月数", "tenure_months", "tenureMonths"],
    },
    AccessorChain {
        key: ColumnKey::Status,
        fields: &["ステータス", "status", "work_status"],
    },
    AccessorChain {
        key: ColumnKey::Reason,
        fields: &["退職理由", "reason", "retirement_reason"],
    },
    AccessorChain {
        key: ColumnKey::Remark,
        fields: &["備考", "remark"],
    },
    AccessorChain {
        key: ColumnKey::Client,
        fields: &["当時のクライアント", "稼働先", "client"],
    },
    AccessorChain {
        key: ColumnKey::Gender,
        fields: &["性別", "gender"],
    },
    AccessorChain {
        key: ColumnKey::BirthDate,
        fields: &["生年月日", "birth_date", "birthDate"],
    },
    AccessorChain {
        key: ColumnKey::Age,
        fields: &["年齢", "age"],
    },
];

const ID_FIELDS: &[&str] = &["id"];
const ACTIVE_FLAG_FIELDS: &[&str] = &["is_active", "isActive"];

/// Alias chain for a column.
pub fn accessor_chain(key: ColumnKey) -> &'static AccessorChain {
    KEY_MAPPING
        .iter()
        .find(|chain| chain.key == key)
        .unwrap_or(&KEY_MAPPING[0])
}

/// Stable record identifier. Numeric source ids are stringified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Numeric sort position; ids that are not finite numbers sort as `0`.
    pub fn numeric_order(&self) -> f64 {
        self.0
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }

    fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Self(s.trim().to_string()),
            Some(Value::Number(n)) => Self(n.to_string()),
            _ => Self::default(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// A single source cell before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Null),
            Value::String(s) => RawValue::Text(s.clone()),
            // Nested structures have no display form; treat them as absent.
            Value::Array(_) | Value::Object(_) => RawValue::Null,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

static NULL_VALUE: RawValue = RawValue::Null;

/// Employee record with a closed set of columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: RecordId,
    /// Explicit active flag, when the source carries one.
    pub is_active: Option<bool>,
    values: BTreeMap<ColumnKey, RawValue>,
}

impl EmployeeRecord {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            is_active: None,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, key: ColumnKey, value: impl Into<RawValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn set(&mut self, key: ColumnKey, value: impl Into<RawValue>) {
        self.values.insert(key, value.into());
    }

    /// Raw value for a column; absent columns read as `Null`.
    pub fn get(&self, key: ColumnKey) -> &RawValue {
        self.values.get(&key).unwrap_or(&NULL_VALUE)
    }

    /// Build a record from a source JSON object using [`KEY_MAPPING`].
    ///
    /// Non-object values produce an empty record with no id.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let id = RecordId::from_json(ID_FIELDS.iter().find_map(|f| object.get(*f)));
        let is_active = ACTIVE_FLAG_FIELDS
            .iter()
            .filter_map(|f| object.get(*f))
            .find_map(Value::as_bool);

        let values = KEY_MAPPING
            .iter()
            .filter_map(|chain| chain.resolve(object).map(|v| (chain.key, RawValue::from(v))))
            .collect();

        Self {
            id,
            is_active,
            values,
        }
    }
}

impl EmployeeRecord {
    /// Source JSON object keyed by canonical field names.
    ///
    /// Non-finite numbers are written as `null`.
    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        if !self.id.is_empty() {
            object.insert(ID_FIELDS[0].to_string(), Value::String(self.id.0.clone()));
        }
        if let Some(flag) = self.is_active {
            object.insert(ACTIVE_FLAG_FIELDS[0].to_string(), Value::Bool(flag));
        }
        for (key, value) in &self.values {
            let json = match value {
                RawValue::Null => Value::Null,
                RawValue::Bool(b) => Value::Bool(*b),
                RawValue::Number(n) => serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                RawValue::Text(s) => Value::String(s.clone()),
            };
            object.insert(key.as_str().to_string(), json);
        }
        Value::Object(object)
    }
}

impl From<&NormalizedRow> for EmployeeRecord {
    fn from(row: &NormalizedRow) -> Self {
        let values = row
            .cells()
            .map(|(key, value)| (key, RawValue::text(value)))
            .collect();
        Self {
            id: row.id.clone(),
            is_active: Some(row.is_active),
            values,
        }
    }
}

/// Convert a batch of source JSON objects.
pub fn records_from_json(values: &[Value]) -> Vec<EmployeeRecord> {
    values.iter().map(EmployeeRecord::from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alias_priority_prefers_first_present_field() {
        let record = EmployeeRecord::from_json(&json!({
            "id": 7,
            "部門": "開発",
            "department": "営業",
        }));
        assert_eq!(record.id, RecordId::from("7"));
        assert_eq!(record.get(ColumnKey::Department), &RawValue::text("開発"));
    }

    #[test]
    fn test_null_alias_falls_through_to_next() {
        let record = EmployeeRecord::from_json(&json!({
            "部署": null,
            "department": "人事",
        }));
        assert_eq!(record.get(ColumnKey::Department), &RawValue::text("人事"));
    }

    #[test]
    fn test_empty_string_alias_does_not_fall_through() {
        let record = EmployeeRecord::from_json(&json!({
            "部署": "",
            "department": "人事",
        }));
        assert_eq!(record.get(ColumnKey::Department), &RawValue::text(""));
    }

    #[test]
    fn test_active_flag_only_from_booleans() {
        let flagged = EmployeeRecord::from_json(&json!({ "is_active": false }));
        assert_eq!(flagged.is_active, Some(false));

        let stringly = EmployeeRecord::from_json(&json!({ "is_active": "false" }));
        assert_eq!(stringly.is_active, None);
    }

    #[test]
    fn test_numeric_order_of_ids() {
        assert_eq!(RecordId::from("12").numeric_order(), 12.0);
        assert_eq!(RecordId::from("abc").numeric_order(), 0.0);
        assert_eq!(RecordId::default().numeric_order(), 0.0);
    }

    #[test]
    fn test_to_json_uses_canonical_names() {
        let record = EmployeeRecord::new("4")
            .with(ColumnKey::Department, "営業")
            .with(ColumnKey::Age, 30.0)
            .with_active(true);
        let json = record.to_json();
        assert_eq!(json["id"], "4");
        assert_eq!(json["部署"], "営業");
        assert_eq!(json["is_active"], true);
        assert_eq!(EmployeeRecord::from_json(&json), record);
    }

    #[test]
    fn test_nested_values_are_treated_as_null() {
        let record = EmployeeRecord::from_json(&json!({ "名前": ["a", "b"] }));
        assert!(record.get(ColumnKey::Name).is_null());
    }

    #[test]
    fn test_every_column_has_an_accessor_chain() {
        for key in ColumnKey::ALL {
            assert_eq!(accessor_chain(key).key, key);
            assert_eq!(accessor_chain(key).fields[0], key.as_str());
        }
    }
}
