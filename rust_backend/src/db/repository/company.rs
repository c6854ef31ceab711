//! Company lookup repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Display name of a company.
    ///
    /// # Returns
    /// * `Ok(Some(name))` - The company exists and has a name
    /// * `Ok(None)` - No such company
    /// * `Err(RepositoryError)` - If the lookup fails
    async fn fetch_company_name(&self, company_id: &str) -> RepositoryResult<Option<String>>;
}
