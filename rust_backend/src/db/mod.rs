//! Record source access via the Repository pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application layer (edit session, analytics, bootstrap) │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service layer (services.rs) - business logic            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/) - abstract interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!               ┌─────▼──────────────┐
//!               │ Local repository   │
//!               │ (in-memory)        │
//!               └────────────────────┘
//! ```
//!
//! The module includes:
//! - `services`: high-level functions (use these in application code)
//! - `repository`: trait definitions and error types
//! - `repositories::local`: in-memory implementation for tests and local development
//! - `checksum`: snapshot checksums of normalized rows
//!
//! # Recommended Usage
//!
//! ```no_run
//! use roster_rust::db::{services, LocalRepository};
//! use roster_rust::models::MANAGER_COLUMNS;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let rows = services::load_rows(&repo, MANAGER_COLUMNS, None).await?;
//!     println!("{} rows", rows.len());
//!     Ok(())
//! }
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable the local-repo repository backend feature.");

pub mod checksum;
pub mod repositories;
pub mod repository;
pub mod services;

pub use checksum::{calculate_checksum, rows_checksum};
pub use repositories::LocalRepository;
pub use repository::{
    CatalogKind, CatalogRepository, CompanyRepository, EmployeeRepository, ErrorContext,
    FullRepository, RecordPatch, RepositoryError, RepositoryResult,
};
