//! Shared type definitions for joinery
//!
//! This crate provides the vocabulary the compiler and the execution side
//! agree on:
//!
//! - [`Dialect`] - target SQL engine and its quoting / parameter conventions
//! - [`FieldType`] - declared type of an entity or DTO property
//! - [`Value`] - dynamically typed parameter and row values
//! - [`SqlField`] - conversion between host types and [`Value`]
//! - [`cast`] - the projection cast-legality matrix
//! - [`sql_type`] - per-dialect CAST type names
//!
//! # Features
//!
//! - `std` - Standard library support (enabled by default)
//! - `serde` - Enable serde serialization/deserialization of [`Dialect`]

pub mod cast;
mod dialect;
mod field;
mod field_type;
pub mod sql_type;
mod value;

pub use cast::is_legal_cast;
pub use dialect::{Dialect, DialectParseError, IdentQuoting};
pub use field::{Boolean, Numeric, SqlField, Temporal, Textual, decimal_to_i64};
pub use field_type::FieldType;
pub use sql_type::cast_type_name;
pub use value::{DATETIME_FORMAT, Value, ValueError};

pub use chrono::NaiveDateTime;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{Dialect, FieldType, SqlField, Value};
}
