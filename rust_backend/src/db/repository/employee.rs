//! Employee record repository trait.
//!
//! The storage backend is an opaque per-record collection keyed by record id.
//! Reads hand out raw JSON objects; writes are partial updates applied one
//! record at a time, each reporting success or failure individually.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::RepositoryResult;
use crate::models::{ColumnKey, RecordId};

/// Partial update of one record, keyed by canonical source field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordPatch {
    fields: BTreeMap<String, Value>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column; blank values are written as `null`.
    pub fn set_column(&mut self, key: ColumnKey, value: Option<&str>) {
        let json = value.map_or(Value::Null, |v| Value::String(v.to_string()));
        self.fields.insert(key.as_str().to_string(), json);
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Repository trait for employee records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Check if the backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List every employee record as a raw source object.
    async fn list_employees(&self) -> RepositoryResult<Vec<Value>>;

    /// Apply a partial update to one record.
    ///
    /// # Arguments
    /// * `id` - Record to update
    /// * `patch` - Fields to overwrite; fields absent from the patch are kept
    ///
    /// # Returns
    /// * `Ok(())` - The record was updated
    /// * `Err(RepositoryError::NotFound)` - No record has this id
    /// * `Err(RepositoryError)` - The write failed
    async fn update_employee(&self, id: &RecordId, patch: &RecordPatch) -> RepositoryResult<()>;

    /// Append a new record.
    ///
    /// # Returns
    /// * `Ok(RecordId)` - Id of the stored record, assigned when absent
    async fn create_employee(&self, record: &Value) -> RepositoryResult<RecordId>;
}
