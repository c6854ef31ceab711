//! Draft editing of the employee table.
//!
//! # Modules
//!
//! - [`derived`]: computed columns (retire month, age, tenure)
//! - [`validation`]: per-cell validation collaborator and default rules
//! - [`diff`]: pending-change list between draft and snapshot
//! - [`persistence`]: save collaborator and its repository adapter
//! - [`session`]: the edit session state machine

pub mod derived;
pub mod diff;
pub mod persistence;
pub mod session;
pub mod validation;

pub use diff::{build_pending_changes, is_cell_changed, row_map_by_id, PendingChange, FALLBACK_DISPLAY_NAME};
pub use persistence::{RepositoryRowSaver, RowSaver, SaveError, SaveReport};
pub use session::{EditSession, RequestSave, SessionError, SessionState};
pub use validation::{CellValidator, EmployeeCellValidator, NoValidation};
