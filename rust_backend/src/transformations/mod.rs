//! Row-level transformations over employee data.
//!
//! # Modules
//!
//! - [`normalize`]: raw records to canonical display rows
//! - [`collation`]: locale-aware string ordering
//! - [`sorting`]: type-aware comparator and sort state
//! - [`filtering`]: band, multi-select, range filters and keyword search
//!
//! # Example
//!
//! ```
//! use roster_rust::models::{ColumnKey, EmployeeRecord, MANAGER_COLUMNS};
//! use roster_rust::transformations::{normalize, sort_rows, ActivePolicy, SortState};
//!
//! let records = vec![
//!     EmployeeRecord::new("2").with(ColumnKey::Age, 41.0),
//!     EmployeeRecord::new("1").with(ColumnKey::Age, 29.0),
//! ];
//! let mut rows = normalize(&records, MANAGER_COLUMNS, ActivePolicy::detect(&records));
//! let state = SortState::default().toggle(ColumnKey::Age).toggle(ColumnKey::Age);
//! sort_rows(&mut rows, &state, MANAGER_COLUMNS);
//! assert_eq!(rows[0].id.as_str(), "2");
//! ```

pub mod collation;
pub mod filtering;
pub mod normalize;
pub mod sorting;

pub use collation::{collation_key, compare_collated, sort_collated};
pub use filtering::{
    apply_filters, filter_by_active, filter_by_column, search_rows, DetailFilter, RosterFilters,
};
pub use normalize::{
    is_blank_cell, normalize, normalize_cell, normalize_display, normalize_record, normalize_rows,
    ActivePolicy,
};
pub use sorting::{compare_directed, compare_rows, sort_rows, SortDirection, SortState};
