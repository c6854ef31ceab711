//! Typed data model for employee records and table rows.
//!
//! - [`band`]: age and tenure bands
//! - [`column`]: closed column identifiers and descriptors
//! - [`record`]: raw source records and the alias key-mapping table
//! - [`row`]: normalized display rows

pub mod band;
pub mod column;
pub mod record;
pub mod row;

pub use band::{AgeBand, TenureBand};
pub use column::{find_column, ColumnDescriptor, ColumnKey, ColumnType, MANAGER_COLUMNS};
pub use record::{
    accessor_chain, records_from_json, AccessorChain, EmployeeRecord, RawValue, RecordId,
    ACCESSOR_CHAIN_VERSION, KEY_MAPPING,
};
pub use row::{CellSource, NormalizedRow, EMPTY_CELL};
