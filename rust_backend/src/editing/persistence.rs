//! Persistence collaborator of the edit session.

use async_trait::async_trait;
use std::sync::Arc;

use crate::db::repository::{EmployeeRepository, RepositoryError};
use crate::db::services::save_changed_rows;
use crate::models::{ColumnDescriptor, NormalizedRow, RecordId, MANAGER_COLUMNS};

/// Records written by a successful save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub updated: Vec<RecordId>,
}

/// Error type for row saves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("Save rejected: {0}")]
    Rejected(String),

    #[error("Saved {} records, {} failed", updated.len(), failed.len())]
    Partial {
        updated: Vec<RecordId>,
        failed: Vec<(RecordId, String)>,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Writes an edited row-set back to its source.
#[async_trait]
pub trait RowSaver: Send + Sync {
    /// Persist the difference between `draft` and `baseline`.
    ///
    /// # Arguments
    /// * `draft` - Edited rows, editing representation (`""` for cleared cells)
    /// * `baseline` - Rows the draft was copied from
    async fn save_rows(&self, draft: &[NormalizedRow], baseline: &[NormalizedRow]) -> Result<SaveReport, SaveError>;
}

/// [`RowSaver`] writing one partial update per changed record to an
/// [`EmployeeRepository`].
pub struct RepositoryRowSaver<R> {
    repo: Arc<R>,
    columns: Vec<ColumnDescriptor>,
}

impl<R: EmployeeRepository> RepositoryRowSaver<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_columns(repo, MANAGER_COLUMNS)
    }

    pub fn with_columns(repo: Arc<R>, columns: &[ColumnDescriptor]) -> Self {
        Self {
            repo,
            columns: columns.to_vec(),
        }
    }
}

#[async_trait]
impl<R: EmployeeRepository> RowSaver for RepositoryRowSaver<R> {
    async fn save_rows(&self, draft: &[NormalizedRow], baseline: &[NormalizedRow]) -> Result<SaveReport, SaveError> {
        let outcome = save_changed_rows(self.repo.as_ref(), draft, baseline, &self.columns).await?;
        if outcome.is_complete() {
            Ok(SaveReport {
                updated: outcome.updated,
            })
        } else {
            Err(SaveError::Partial {
                updated: outcome.updated,
                failed: outcome.failed,
            })
        }
    }
}
