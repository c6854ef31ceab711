//! Error types for record source operations.

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failure reported by a record source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The source could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The source refused or failed a read or write.
    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The payload was rejected before reaching the source.
    #[error("Data validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RepositoryError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConnectionError(_) | RepositoryError::QueryError(_)
        )
    }

    fn with_prefix(self, operation: &str) -> Self {
        let prefix = |m: String| format!("{operation}: {m}");
        match self {
            RepositoryError::ConnectionError(m) => RepositoryError::ConnectionError(prefix(m)),
            RepositoryError::QueryError(m) => RepositoryError::QueryError(prefix(m)),
            RepositoryError::NotFound(m) => RepositoryError::NotFound(prefix(m)),
            RepositoryError::ValidationError(m) => RepositoryError::ValidationError(prefix(m)),
            RepositoryError::InternalError(m) => RepositoryError::InternalError(prefix(m)),
        }
    }
}

/// Attach the name of the failed repository call to an error, keeping its
/// variant.
pub trait ErrorContext<T> {
    fn context(self, operation: &str) -> RepositoryResult<T>;
}

impl<T> ErrorContext<T> for RepositoryResult<T> {
    fn context(self, operation: &str) -> RepositoryResult<T> {
        self.map_err(|e| e.with_prefix(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_variant() {
        let result: RepositoryResult<()> = Err(RepositoryError::NotFound("employee 3".into()));
        let err = result.context("update_employee").unwrap_err();
        assert_eq!(err, RepositoryError::NotFound("update_employee: employee 3".into()));
        assert_eq!(err.to_string(), "Not found: update_employee: employee 3");
    }

    #[test]
    fn test_transient_errors() {
        assert!(RepositoryError::ConnectionError("down".into()).is_transient());
        assert!(RepositoryError::QueryError("rejected".into()).is_transient());
        assert!(!RepositoryError::NotFound("x".into()).is_transient());
    }
}
