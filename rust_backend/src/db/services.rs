//! High-level service layer over the repository traits.
//!
//! These functions hold the logic that must behave the same whatever backs
//! the repository: record decoding and normalization, per-record partial
//! saves, and catalog fallbacks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application layer (edit session, analytics, bootstrap) │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service layer (services.rs)                             │
//! │  - Record decoding + normalization                       │
//! │  - Changed-row patches and per-record saves              │
//! │  - Catalog fallbacks                                     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/)                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!               ┌─────▼──────────────┐
//!               │ Local repository   │
//!               │ (in-memory)        │
//!               └────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use roster_rust::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let records = services::list_records(&repo).await?;
//!     println!("Found {} records", records.len());
//!     Ok(())
//! }
//! ```

use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::repository::{
    CatalogKind, CatalogRepository, EmployeeRepository, ErrorContext, RecordPatch,
    RepositoryError, RepositoryResult,
};
use crate::editing::diff::build_pending_changes;
use crate::models::{
    records_from_json, ColumnDescriptor, ColumnKey, EmployeeRecord, NormalizedRow, RecordId,
};
use crate::services::categories::CategoryCandidates;
use crate::transformations::collation::sort_collated;
use crate::transformations::{
    is_blank_cell, normalize, normalize_cell, normalize_display, ActivePolicy,
};

// ==================== Health & Connection ====================

/// Check if the record source is reachable.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(true)` if the source is healthy
/// * `Err` if the check fails
pub async fn health_check<R: EmployeeRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Employee Records ====================

/// List and decode every employee record.
pub async fn list_records<R: EmployeeRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<EmployeeRecord>> {
    let objects = repo.list_employees().await.context("list_employees")?;
    let records = records_from_json(&objects);
    info!("Loaded {} employee records", records.len());
    Ok(records)
}

/// Load normalized table rows.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `columns` - Column descriptors of the table
/// * `policy` - Active-status policy; detected from the data when `None`
pub async fn load_rows<R: EmployeeRepository + ?Sized>(
    repo: &R,
    columns: &[ColumnDescriptor],
    policy: Option<ActivePolicy>,
) -> RepositoryResult<Vec<NormalizedRow>> {
    let records = list_records(repo).await?;
    let policy = policy.unwrap_or_else(|| ActivePolicy::detect(&records));
    debug!("Normalizing rows with active policy {:?}", policy);
    Ok(normalize(&records, columns, policy))
}

/// Append a new employee record.
///
/// # Returns
/// * `Ok(RecordId)` - Id assigned by the repository
/// * `Err(RepositoryError::ValidationError)` - The record has no name
pub async fn create_employee<R: EmployeeRepository + ?Sized>(
    repo: &R,
    record: &EmployeeRecord,
) -> RepositoryResult<RecordId> {
    if is_blank_cell(&normalize_cell(record.get(ColumnKey::Name))) {
        return Err(RepositoryError::ValidationError(
            "Employee name is required".to_string(),
        ));
    }
    let id = repo
        .create_employee(&record.to_json())
        .await
        .context("create_employee")?;
    info!("Created employee {}", id);
    Ok(id)
}

// ==================== Employee Codes ====================

static FULL_YEAR_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(\d{5})$").expect("full-year code pattern is valid"));

static SHORT_YEAR_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})-(\d{5})$").expect("short-year code pattern is valid"));

/// Layout of a generated employee code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum EmployeeCodeStyle {
    /// `YY-00001`
    #[default]
    ShortYear,
    /// `YYYY00001`
    FullYear,
}

/// Join year from a `YYYY/…` or `YYYY-…` date; `fallback` when missing or
/// outside 1900..=9999.
fn join_year(join_date: Option<&str>, fallback: i32) -> i32 {
    join_date
        .map(str::trim)
        .and_then(|text| text.split(['/', '-']).next())
        .and_then(|year| year.parse::<i32>().ok())
        .filter(|year| (1900..=9999).contains(year))
        .unwrap_or(fallback)
}

/// Next employee code for the join year of `join_date`.
///
/// Existing codes of the same year, in either layout, share one serial
/// counter; the next code takes the highest serial plus one. Without a usable
/// join date the year of `today` is used.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use roster_rust::db::services::{next_employee_code, EmployeeCodeStyle};
/// use roster_rust::models::{ColumnKey, EmployeeRecord};
///
/// let records = vec![EmployeeRecord::new("1").with(ColumnKey::EmployeeCode, "26-00004")];
/// let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
/// let code = next_employee_code(&records, Some("2026/4/1"), today, EmployeeCodeStyle::ShortYear);
/// assert_eq!(code, "26-00005");
/// ```
pub fn next_employee_code(
    records: &[EmployeeRecord],
    join_date: Option<&str>,
    today: NaiveDate,
    style: EmployeeCodeStyle,
) -> String {
    let year = join_year(join_date, today.year());
    let full = year.to_string();
    let short = full.get(full.len().saturating_sub(2)..).unwrap_or(&full);

    let max_serial = records
        .iter()
        .map(|r| normalize_cell(r.get(ColumnKey::EmployeeCode)))
        .filter_map(|code| {
            if let Some(caps) = FULL_YEAR_CODE.captures(&code) {
                return (&caps[1] == full.as_str()).then(|| caps[2].parse::<u32>().ok()).flatten();
            }
            SHORT_YEAR_CODE
                .captures(&code)
                .filter(|caps| &caps[1] == short)
                .and_then(|caps| caps[2].parse::<u32>().ok())
        })
        .max()
        .unwrap_or(0);

    let serial = max_serial + 1;
    match style {
        EmployeeCodeStyle::ShortYear => format!("{short}-{serial:05}"),
        EmployeeCodeStyle::FullYear => format!("{full}{serial:05}"),
    }
}

/// Append a new employee record, assigning an employee code when it has none.
///
/// The code is derived from the record's join date and the codes already in
/// the repository.
///
/// # Returns
/// * `Ok((RecordId, String))` - Repository id and the record's employee code
pub async fn create_employee_with_code<R: EmployeeRepository + ?Sized>(
    repo: &R,
    record: &EmployeeRecord,
    today: NaiveDate,
    style: EmployeeCodeStyle,
) -> RepositoryResult<(RecordId, String)> {
    let existing = normalize_cell(record.get(ColumnKey::EmployeeCode));
    let mut record = record.clone();
    let code = if is_blank_cell(&existing) {
        let records = list_records(repo).await?;
        let join_date = normalize_cell(record.get(ColumnKey::JoinDate));
        let join_date = (!is_blank_cell(&join_date)).then_some(join_date.as_str());
        let code = next_employee_code(&records, join_date, today, style);
        debug!("Assigned employee code {}", code);
        record.set(ColumnKey::EmployeeCode, code.as_str());
        code
    } else {
        existing
    };
    let id = create_employee(repo, &record).await?;
    Ok((id, code))
}

// ==================== Saving ====================

/// Build one partial update per changed record.
///
/// Only editable columns whose normalized value differs from `baseline` are
/// included. Blank values are written as `null`. Records keep draft order.
pub fn build_record_patches(
    draft: &[NormalizedRow],
    baseline: &[NormalizedRow],
    columns: &[ColumnDescriptor],
) -> Vec<(RecordId, RecordPatch)> {
    let mut patches: Vec<(RecordId, RecordPatch)> = Vec::new();
    for change in build_pending_changes(draft, baseline, columns, normalize_display) {
        let value = normalize_display(&change.to_value);
        let value = (!is_blank_cell(&value)).then_some(value.as_str());
        if !patches.last().is_some_and(|(id, _)| *id == change.row_id) {
            patches.push((change.row_id.clone(), RecordPatch::new()));
        }
        if let Some((_, patch)) = patches.last_mut() {
            patch.set_column(change.column_key, value);
        }
    }
    patches
}

/// Per-record result of [`save_changed_rows`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    pub updated: Vec<RecordId>,
    pub failed: Vec<(RecordId, String)>,
}

impl PatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write every changed record of `draft` back to the repository.
///
/// Each record is updated independently; a failed record does not stop the
/// others. The call itself only fails when the source is unreachable before
/// any write was attempted.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `draft` - Edited rows
/// * `baseline` - Rows the draft was copied from
/// * `columns` - Column descriptors
pub async fn save_changed_rows<R: EmployeeRepository + ?Sized>(
    repo: &R,
    draft: &[NormalizedRow],
    baseline: &[NormalizedRow],
    columns: &[ColumnDescriptor],
) -> RepositoryResult<PatchOutcome> {
    let patches = build_record_patches(draft, baseline, columns);
    let mut outcome = PatchOutcome::default();
    if patches.is_empty() {
        return Ok(outcome);
    }

    if !repo.health_check().await.context("save_changed_rows")? {
        return Err(RepositoryError::ConnectionError(
            "Record source is not reachable".to_string(),
        ));
    }

    for (id, patch) in patches {
        match repo.update_employee(&id, &patch).await {
            Ok(()) => outcome.updated.push(id),
            Err(e) => {
                warn!("Failed to update employee {}: {}", id, e);
                outcome.failed.push((id, e.to_string()));
            }
        }
    }

    info!(
        "Saved {} employee records ({} failed)",
        outcome.updated.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}

// ==================== Catalogs ====================

fn clean_catalog(names: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !is_blank_cell(n))
        .collect();
    sort_collated(&mut names);
    names.dedup();
    names
}

/// Load category candidates, falling back to `defaults` per empty catalog.
///
/// Loaded lists are trimmed, de-duplicated and sorted with the collation.
/// Default lists keep their configured order.
pub async fn load_category_candidates<R: CatalogRepository + ?Sized>(
    repo: &R,
    defaults: &CategoryCandidates,
) -> RepositoryResult<CategoryCandidates> {
    let mut candidates = defaults.clone();
    for kind in CatalogKind::ALL {
        let names = clean_catalog(
            repo.list_catalog(kind)
                .await
                .context(&format!("list_catalog({kind:?})"))?,
        );
        if names.is_empty() {
            debug!("Catalog {:?} is empty, using defaults", kind);
            continue;
        }
        let slot = match kind {
            CatalogKind::Department => &mut candidates.departments,
            CatalogKind::Client => &mut candidates.clients,
            CatalogKind::Status => &mut candidates.statuses,
            CatalogKind::Reason => &mut candidates.reasons,
            CatalogKind::Gender => &mut candidates.genders,
        };
        *slot = names;
    }
    Ok(candidates)
}
