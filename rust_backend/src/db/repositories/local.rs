//! In-memory local repository implementation.
//!
//! Stores employee objects, catalog lists and company names in memory. It
//! backs unit tests and local development, and can simulate connection loss,
//! per-record write failures and slow company lookups.

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::db::repository::*;
use crate::models::RecordId;

/// In-memory local repository.
///
/// Clones share the same underlying data.
///
/// # Example
/// ```
/// use roster_rust::db::repositories::LocalRepository;
/// use roster_rust::db::repository::EmployeeRepository;
/// use serde_json::json;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     repo.insert_employee(json!({ "id": 1, "名前": "山田" }));
///     assert_eq!(repo.list_employees().await.unwrap().len(), 1);
/// });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    employees: Vec<Value>,
    catalogs: HashMap<CatalogKind, Vec<String>>,
    companies: HashMap<String, String>,

    // Failure injection
    failing_ids: HashSet<RecordId>,
    company_delay: Option<Duration>,

    // Call counters
    update_calls: usize,
    company_fetches: usize,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            employees: Vec::new(),
            catalogs: HashMap::new(),
            companies: HashMap::new(),
            failing_ids: HashSet::new(),
            company_delay: None,
            update_calls: 0,
            company_fetches: 0,
            is_healthy: true,
        }
    }
}

fn record_id_of(object: &Value) -> RecordId {
    match object.get("id") {
        Some(Value::String(s)) => RecordId::new(s.trim()),
        Some(Value::Number(n)) => RecordId::new(n.to_string()),
        _ => RecordId::default(),
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with employee objects.
    pub fn with_employees(employees: Vec<Value>) -> Self {
        let repo = Self::new();
        for employee in employees {
            repo.insert_employee(employee);
        }
        repo
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, LocalData>> {
        self.data
            .read()
            .map_err(|_| RepositoryError::InternalError("local data lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, LocalData>> {
        self.data
            .write()
            .map_err(|_| RepositoryError::InternalError("local data lock poisoned".to_string()))
    }

    /// Add an employee object as-is. Set-up helper; ignores lock poisoning.
    pub fn insert_employee(&self, employee: Value) {
        if let Ok(mut data) = self.write() {
            data.employees.push(employee);
        }
    }

    /// Replace a catalog list.
    pub fn set_catalog(&self, kind: CatalogKind, names: Vec<String>) {
        if let Ok(mut data) = self.write() {
            data.catalogs.insert(kind, names);
        }
    }

    /// Register a company name.
    pub fn set_company(&self, company_id: &str, name: &str) {
        if let Ok(mut data) = self.write() {
            data.companies.insert(company_id.to_string(), name.to_string());
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        if let Ok(mut data) = self.write() {
            data.is_healthy = healthy;
        }
    }

    /// Make every update of `id` fail until cleared.
    pub fn fail_updates_for(&self, id: impl Into<RecordId>) {
        if let Ok(mut data) = self.write() {
            data.failing_ids.insert(id.into());
        }
    }

    pub fn clear_update_failures(&self) {
        if let Ok(mut data) = self.write() {
            data.failing_ids.clear();
        }
    }

    /// Delay every company lookup, to exercise request coalescing.
    pub fn set_company_delay(&self, delay: Option<Duration>) {
        if let Ok(mut data) = self.write() {
            data.company_delay = delay;
        }
    }

    /// Number of `update_employee` calls received, failed ones included.
    pub fn update_calls(&self) -> usize {
        self.read().map(|d| d.update_calls).unwrap_or_default()
    }

    /// Number of `fetch_company_name` calls received.
    pub fn company_fetches(&self) -> usize {
        self.read().map(|d| d.company_fetches).unwrap_or_default()
    }

    pub fn employee_count(&self) -> usize {
        self.read().map(|d| d.employees.len()).unwrap_or_default()
    }

    /// Stored object for an id.
    pub fn employee(&self, id: &RecordId) -> Option<Value> {
        self.read()
            .ok()?
            .employees
            .iter()
            .find(|e| &record_id_of(e) == id)
            .cloned()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.read()?.is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Record source is not reachable".to_string(),
            ));
        }
        Ok(())
    }

    fn next_id(data: &LocalData) -> RecordId {
        let max = data
            .employees
            .iter()
            .map(|e| record_id_of(e).numeric_order())
            .fold(0.0_f64, f64::max);
        RecordId::new(format!("{}", max as i64 + 1))
    }
}

#[async_trait]
impl EmployeeRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.read()?.is_healthy)
    }

    async fn list_employees(&self) -> RepositoryResult<Vec<Value>> {
        self.check_health()?;
        Ok(self.read()?.employees.clone())
    }

    async fn update_employee(&self, id: &RecordId, patch: &RecordPatch) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.write()?;
        data.update_calls += 1;

        if data.failing_ids.contains(id) {
            return Err(RepositoryError::QueryError(format!(
                "Update of employee {} was rejected",
                id
            )));
        }

        let employee = data
            .employees
            .iter_mut()
            .find(|e| &record_id_of(e) == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Employee {} not found", id)))?;
        let object = employee.as_object_mut().ok_or_else(|| {
            RepositoryError::ValidationError(format!("Employee {} is not an object", id))
        })?;
        for (field, value) in patch.fields() {
            object.insert(field.to_string(), value.clone());
        }
        debug!("Updated employee {} ({} fields)", id, patch.len());
        Ok(())
    }

    async fn create_employee(&self, record: &Value) -> RepositoryResult<RecordId> {
        self.check_health()?;
        let mut object = record
            .as_object()
            .cloned()
            .ok_or_else(|| RepositoryError::ValidationError("Employee must be an object".to_string()))?;

        let mut data = self.write()?;
        let mut id = record_id_of(record);
        if id.is_empty() {
            id = Self::next_id(&data);
            object.insert("id".to_string(), Value::String(id.as_str().to_string()));
        } else if data.employees.iter().any(|e| record_id_of(e) == id) {
            return Err(RepositoryError::ValidationError(format!(
                "Employee {} already exists",
                id
            )));
        }
        data.employees.push(Value::Object(object));
        Ok(id)
    }
}

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn list_catalog(&self, kind: CatalogKind) -> RepositoryResult<Vec<String>> {
        self.check_health()?;
        Ok(self.read()?.catalogs.get(&kind).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CompanyRepository for LocalRepository {
    async fn fetch_company_name(&self, company_id: &str) -> RepositoryResult<Option<String>> {
        self.check_health()?;
        let delay = {
            let mut data = self.write()?;
            data.company_fetches += 1;
            data.company_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.read()?.companies.get(company_id).cloned())
    }
}
