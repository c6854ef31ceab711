//! Company-name lookup with a scoped, request-coalescing cache.

use log::warn;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use crate::db::repository::{CompanyRepository, RepositoryError, RepositoryResult};

/// Display value when no company name is available.
pub const FALLBACK_COMPANY_NAME: &str = "-";

/// Caches company names per company id.
///
/// Concurrent lookups of the same id share one repository call. Found names
/// are kept until [`invalidate`](Self::invalidate) or [`clear`](Self::clear);
/// missing names and failures are not cached, so the next lookup retries.
#[derive(Debug, Default)]
pub struct CompanyNameCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

enum Miss {
    NotFound,
    Failed(RepositoryError),
}

impl CompanyNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, company_id: &str) -> Arc<OnceCell<String>> {
        let mut entries = self.entries.lock().await;
        entries
            .entry(company_id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Cached name of `company_id`, fetching it on first use.
    ///
    /// Ids are trimmed; a blank id yields `Ok(None)` without a lookup.
    pub async fn get_or_fetch<R>(&self, repo: &R, company_id: &str) -> RepositoryResult<Option<String>>
    where
        R: CompanyRepository + ?Sized,
    {
        let company_id = company_id.trim();
        if company_id.is_empty() {
            return Ok(None);
        }

        let slot = self.slot(company_id).await;
        let result = slot
            .get_or_try_init(move || async move {
                match repo.fetch_company_name(company_id).await {
                    Ok(Some(name)) if !name.trim().is_empty() => Ok(name.trim().to_string()),
                    Ok(_) => Err(Miss::NotFound),
                    Err(e) => Err(Miss::Failed(e)),
                }
            })
            .await;

        match result {
            Ok(name) => Ok(Some(name.clone())),
            Err(Miss::NotFound) => Ok(None),
            Err(Miss::Failed(e)) => Err(e),
        }
    }

    /// Name for display: the company name, or [`FALLBACK_COMPANY_NAME`] when
    /// it is missing or the lookup failed.
    pub async fn display_name<R>(&self, repo: &R, company_id: &str) -> String
    where
        R: CompanyRepository + ?Sized,
    {
        match self.get_or_fetch(repo, company_id).await {
            Ok(Some(name)) => name,
            Ok(None) => FALLBACK_COMPANY_NAME.to_string(),
            Err(e) => {
                warn!("Company name lookup for {} failed: {}", company_id, e);
                FALLBACK_COMPANY_NAME.to_string()
            }
        }
    }

    /// Drop the cached name of one company.
    pub async fn invalidate(&self, company_id: &str) {
        self.entries.lock().await.remove(company_id.trim());
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_fetch() {
        let repo = LocalRepository::new();
        repo.set_company("c1", "株式会社テスト");
        repo.set_company_delay(Some(Duration::from_millis(30)));
        let cache = CompanyNameCache::new();

        let (a, b, c) = tokio::join!(
            cache.get_or_fetch(&repo, "c1"),
            cache.get_or_fetch(&repo, "c1"),
            cache.get_or_fetch(&repo, " c1 "),
        );
        for name in [a, b, c] {
            assert_eq!(name.unwrap().as_deref(), Some("株式会社テスト"));
        }
        assert_eq!(repo.company_fetches(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_and_company_change() {
        let repo = LocalRepository::new();
        repo.set_company("c1", "旧社名");
        repo.set_company("c2", "別会社");
        let cache = CompanyNameCache::new();

        assert_eq!(cache.display_name(&repo, "c1").await, "旧社名");
        repo.set_company("c1", "新社名");
        assert_eq!(cache.display_name(&repo, "c1").await, "旧社名");
        assert_eq!(cache.display_name(&repo, "c2").await, "別会社");
        assert_eq!(repo.company_fetches(), 2);

        cache.invalidate("c1").await;
        assert_eq!(cache.display_name(&repo, "c1").await, "新社名");
        assert_eq!(repo.company_fetches(), 3);
    }

    #[tokio::test]
    async fn test_missing_and_failed_lookups_are_retried() {
        let repo = LocalRepository::new();
        let cache = CompanyNameCache::new();

        assert_eq!(cache.get_or_fetch(&repo, "").await.unwrap(), None);
        assert_eq!(repo.company_fetches(), 0);

        assert_eq!(cache.display_name(&repo, "c9").await, FALLBACK_COMPANY_NAME);
        repo.set_company("c9", "後から登録");
        assert_eq!(cache.display_name(&repo, "c9").await, "後から登録");

        repo.set_healthy(false);
        cache.clear().await;
        assert!(cache.get_or_fetch(&repo, "c9").await.is_err());
        assert_eq!(cache.display_name(&repo, "c9").await, FALLBACK_COMPANY_NAME);
    }
}
