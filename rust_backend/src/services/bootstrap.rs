//! Workspace bootstrap: everything an application layer needs after start-up.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::info;

use super::analytics::{prepare_analytics_rows, AnalyticsDataset, AnalyticsSettings};
use super::categories::CategoryCandidates;
use super::company::CompanyNameCache;
use crate::config::RosterConfig;
use crate::db::repository::FullRepository;
use crate::db::services::{health_check, list_records, load_category_candidates};
use crate::models::{NormalizedRow, MANAGER_COLUMNS};
use crate::transformations::{normalize, ActivePolicy};

/// Loaded application state.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub company_name: String,
    pub candidates: CategoryCandidates,
    pub active_policy: ActivePolicy,
    pub rows: Vec<NormalizedRow>,
    pub analytics: AnalyticsDataset,
    pub settings: AnalyticsSettings,
}

/// Load rows, candidates, analytics input and the company name.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `config` - Loaded configuration
/// * `companies` - Company-name cache shared across loads
/// * `reference_date` - "Today" for derived values
pub async fn load_workspace<R: FullRepository + ?Sized>(
    repo: &R,
    config: &RosterConfig,
    companies: &CompanyNameCache,
    reference_date: NaiveDate,
) -> Result<Workspace> {
    if !health_check(repo).await.context("checking record source health")? {
        bail!("record source is not reachable");
    }

    let records = list_records(repo).await.context("loading employee records")?;
    let candidates = load_category_candidates(repo, &config.categories)
        .await
        .context("loading category candidates")?;

    let active_policy = config
        .analytics
        .active_policy
        .unwrap_or_else(|| ActivePolicy::detect(&records));
    let rows = normalize(&records, MANAGER_COLUMNS, active_policy);
    let analytics = prepare_analytics_rows(&records, &candidates, reference_date);
    let company_name = companies
        .display_name(repo, &config.company.company_id)
        .await;

    info!(
        "Workspace loaded: {} rows, {} eligible for analytics, company {}",
        rows.len(),
        analytics.eligible_count(),
        company_name
    );

    Ok(Workspace {
        company_name,
        candidates,
        active_policy,
        rows,
        analytics,
        settings: config.analytics.settings(),
    })
}
