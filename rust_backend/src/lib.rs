//! Roster core: employee table editing and retirement analytics.
//!
//! - [`models`]: typed records, column descriptors and normalized rows
//! - [`parsing`]: date formats carried by records
//! - [`transformations`]: normalization, collation, sorting and filters
//! - [`editing`]: derived columns, validation, diffing and the edit session
//! - [`services`]: analytics aggregation, nice axes, summaries, bootstrap
//! - [`db`]: repository traits, in-memory repository and service layer
//! - [`config`]: TOML configuration

pub mod config;
pub mod db;
pub mod editing;
pub mod models;
pub mod parsing;
pub mod services;
pub mod transformations;

pub use config::{ConfigError, RosterConfig};
pub use editing::{EditSession, PendingChange, RequestSave, SessionError, SessionState};
pub use models::{ColumnDescriptor, ColumnKey, EmployeeRecord, NormalizedRow, RecordId, MANAGER_COLUMNS};
