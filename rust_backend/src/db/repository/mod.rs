//! Repository trait definitions for the record source.
//!
//! Responsibilities are split across focused traits so that implementations
//! and test doubles only provide what they need.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`employee`]: Employee record listing and per-record writes
//! - [`catalog`]: Category candidate lists
//! - [`company`]: Company name lookup
//!
//! # Convenience Trait Bound
//!
//! For functions that need every capability, use the [`FullRepository`] bound:
//!
//! ```ignore
//! async fn bootstrap<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     let employees = repo.list_employees().await?;
//!     let departments = repo.list_catalog(CatalogKind::Department).await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod company;
pub mod employee;
pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use catalog::{CatalogKind, CatalogRepository};
pub use company::CompanyRepository;
pub use employee::{EmployeeRepository, RecordPatch};

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all three
/// repository traits.
pub trait FullRepository: EmployeeRepository + CatalogRepository + CompanyRepository {}

impl<T> FullRepository for T where T: EmployeeRepository + CatalogRepository + CompanyRepository {}
