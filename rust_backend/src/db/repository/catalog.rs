//! Catalog repository trait for category candidate lists.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;

/// Kind of catalog list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Department,
    Client,
    Status,
    Reason,
    Gender,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 5] = [
        CatalogKind::Department,
        CatalogKind::Client,
        CatalogKind::Status,
        CatalogKind::Reason,
        CatalogKind::Gender,
    ];
}

/// Read-only lookup of the known names per category.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Names registered for a catalog, in storage order.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Possibly empty list of names
    /// * `Err(RepositoryError)` - If the lookup fails
    async fn list_catalog(&self, kind: CatalogKind) -> RepositoryResult<Vec<String>>;
}
