//! Host types that can appear as entity properties.
//!
//! [`SqlField`] ties a Rust type to its [`FieldType`] and converts it to and
//! from [`Value`]. Reading is lenient across representations, because
//! drivers hand back whatever their wire format carries (SQLite returns
//! every integer as `i64` and stores GUIDs and timestamps as text).

use core::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use uuid::Uuid;

use crate::value::DATETIME_FORMAT;
use crate::{FieldType, Value, ValueError};

/// A Rust type usable as an entity or DTO property.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as an entity property",
    label = "supported: bool, i32, i64, f32, f64, Decimal, String, Uuid, NaiveDateTime, Vec<u8> and Option of those"
)]
pub trait SqlField: Sized {
    /// Declared type recorded in entity metadata.
    const FIELD_TYPE: FieldType;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;
}

mod private {
    pub trait Sealed {}
}

/// Property types that support text predicates (LIKE, UPPER, LENGTH, ...).
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a text property type",
    label = "expected String or Option<String>"
)]
pub trait Textual: private::Sealed {}

/// Property types that support arithmetic and numeric functions.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a numeric property type",
    label = "expected i32, i64, f32, f64 or Decimal"
)]
pub trait Numeric: private::Sealed {}

/// Property types that support date-time predicates.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a date-time property type",
    label = "expected NaiveDateTime"
)]
pub trait Temporal: private::Sealed {}

/// Property types usable as a bare boolean predicate.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a boolean property type",
    label = "expected bool"
)]
pub trait Boolean: private::Sealed {}

macro_rules! sealed {
    ($marker:ident: $($ty:ty),+) => {
        $(
            impl private::Sealed for $ty {}
            impl $marker for $ty {}
            impl private::Sealed for Option<$ty> {}
            impl $marker for Option<$ty> {}
        )+
    };
}

sealed!(Textual: String);
sealed!(Numeric: i32, i64, f32, f64, Decimal);
sealed!(Temporal: NaiveDateTime);
sealed!(Boolean: bool);

fn mismatch(expected: FieldType, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

fn out_of_range(value: impl ToString, target: FieldType) -> ValueError {
    ValueError::OutOfRange {
        value: value.to_string(),
        target,
    }
}

fn parse_error(text: &str, target: FieldType) -> ValueError {
    ValueError::Parse {
        text: text.to_string(),
        target,
    }
}

impl SqlField for bool {
    const FIELD_TYPE: FieldType = FieldType::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int32(v) => Ok(v != 0),
            Value::Int64(v) => Ok(v != 0),
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => Err(mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl SqlField for i32 {
    const FIELD_TYPE: FieldType = FieldType::Int32;

    fn into_value(self) -> Value {
        Value::Int32(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int32(v) => Ok(v),
            Value::Int64(v) => i32::try_from(v).map_err(|_| out_of_range(v, Self::FIELD_TYPE)),
            Value::Bool(b) => Ok(i32::from(b)),
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => Err(mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl SqlField for i64 {
    const FIELD_TYPE: FieldType = FieldType::Int64;

    fn into_value(self) -> Value {
        Value::Int64(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int64(v) => Ok(v),
            Value::Int32(v) => Ok(i64::from(v)),
            Value::Bool(b) => Ok(i64::from(b)),
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => Err(mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl SqlField for f32 {
    const FIELD_TYPE: FieldType = FieldType::Single;

    fn into_value(self) -> Value {
        Value::Single(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Single(v) => Ok(v),
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => other
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl SqlField for f64 {
    const FIELD_TYPE: FieldType = FieldType::Double;

    fn into_value(self) -> Value {
        Value::Double(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => other
                .as_f64()
                .ok_or_else(|| mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl SqlField for Decimal {
    const FIELD_TYPE: FieldType = FieldType::Decimal;

    fn into_value(self) -> Value {
        Value::Decimal(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Decimal(d) => Ok(d),
            Value::Int32(v) => Ok(Decimal::from(v)),
            Value::Int64(v) => Ok(Decimal::from(v)),
            Value::Single(v) => {
                Decimal::from_f32(v).ok_or_else(|| out_of_range(v, Self::FIELD_TYPE))
            }
            Value::Double(v) => {
                Decimal::from_f64(v).ok_or_else(|| out_of_range(v, Self::FIELD_TYPE))
            }
            Value::String(s) => {
                Decimal::from_str(&s).map_err(|_| parse_error(&s, Self::FIELD_TYPE))
            }
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => Err(mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl SqlField for String {
    const FIELD_TYPE: FieldType = FieldType::String;

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s),
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            Value::Bytes(bytes) => String::from_utf8(bytes)
                .map_err(|e| parse_error(&String::from_utf8_lossy(e.as_bytes()), Self::FIELD_TYPE)),
            Value::DateTime(dt) => Ok(dt.format(DATETIME_FORMAT).to_string()),
            Value::Guid(g) => Ok(g.to_string()),
            Value::Decimal(d) => Ok(d.to_string()),
            Value::Int32(v) => Ok(v.to_string()),
            Value::Int64(v) => Ok(v.to_string()),
            Value::Single(v) => Ok(v.to_string()),
            Value::Double(v) => Ok(v.to_string()),
            Value::Bool(v) => Ok(v.to_string()),
        }
    }
}

impl SqlField for Uuid {
    const FIELD_TYPE: FieldType = FieldType::Guid;

    fn into_value(self) -> Value {
        Value::Guid(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Guid(g) => Ok(g),
            Value::String(s) => Uuid::parse_str(&s).map_err(|_| parse_error(&s, Self::FIELD_TYPE)),
            Value::Bytes(b) => Uuid::from_slice(&b).map_err(|_| out_of_range(format!("{} bytes", b.len()), Self::FIELD_TYPE)),
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => Err(mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl SqlField for NaiveDateTime {
    const FIELD_TYPE: FieldType = FieldType::DateTime;

    fn into_value(self) -> Value {
        Value::DateTime(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            Value::String(s) => NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f"))
                .map_err(|_| parse_error(&s, Self::FIELD_TYPE)),
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => Err(mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl SqlField for Vec<u8> {
    const FIELD_TYPE: FieldType = FieldType::Bytes;

    fn into_value(self) -> Value {
        Value::Bytes(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bytes(b) => Ok(b),
            Value::String(s) => Ok(s.into_bytes()),
            Value::Null => Err(ValueError::UnexpectedNull(Self::FIELD_TYPE)),
            other => Err(mismatch(Self::FIELD_TYPE, &other)),
        }
    }
}

impl<T: SqlField> SqlField for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;

    fn into_value(self) -> Value {
        self.map_or(Value::Null, SqlField::into_value)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Narrows a decimal to an `i64` when it has no fractional part.
#[must_use]
pub fn decimal_to_i64(d: Decimal) -> Option<i64> {
    if d.fract().is_zero() { d.to_i64() } else { None }
}
