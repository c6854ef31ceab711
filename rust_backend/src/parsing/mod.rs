//! Parsers for the textual formats carried by employee records.
//!
//! # Modules
//!
//! - [`dates`]: year+month labels and slash/hyphen calendar dates

pub mod dates;

pub use dates::{
    date_to_millis, format_month_label, month_key, parse_column_date, parse_flexible_date,
    parse_month_label, parse_slash_date,
};
