//! Per-dialect type names used in `CAST(... AS <type>)`.
//!
//! This table is part of the external contract: rendered SQL depends on the
//! exact spelling for every dialect.

use crate::{Dialect, FieldType};

/// Returns the CAST target name for `ty` on `dialect`.
#[must_use]
pub const fn cast_type_name(dialect: Dialect, ty: FieldType) -> &'static str {
    match dialect {
        Dialect::SqlServer => match ty {
            FieldType::String => "nvarchar(max)",
            FieldType::Int32 => "int",
            FieldType::Int64 => "bigint",
            FieldType::Decimal => "decimal(18,4)",
            FieldType::Double => "float",
            FieldType::Single => "real",
            FieldType::Bool => "bit",
            FieldType::Guid => "uniqueidentifier",
            FieldType::DateTime => "datetime2",
            FieldType::Bytes => "varbinary(max)",
        },
        Dialect::MySql => match ty {
            FieldType::String => "char",
            FieldType::Int32 | FieldType::Int64 => "signed",
            FieldType::Decimal => "decimal(18,4)",
            FieldType::Double => "double",
            FieldType::Single => "float",
            FieldType::Bool => "unsigned",
            FieldType::Guid => "char(36)",
            FieldType::DateTime => "datetime",
            FieldType::Bytes => "binary",
        },
        Dialect::Postgres => match ty {
            FieldType::String => "text",
            FieldType::Int32 => "integer",
            FieldType::Int64 => "bigint",
            FieldType::Decimal => "numeric",
            FieldType::Double => "double precision",
            FieldType::Single => "real",
            FieldType::Bool => "boolean",
            FieldType::Guid => "uuid",
            FieldType::DateTime => "timestamp",
            FieldType::Bytes => "bytea",
        },
        Dialect::SqlLite => match ty {
            FieldType::String | FieldType::Guid | FieldType::DateTime => "text",
            FieldType::Int32 | FieldType::Int64 | FieldType::Bool => "integer",
            FieldType::Decimal => "numeric",
            FieldType::Double | FieldType::Single => "real",
            FieldType::Bytes => "blob",
        },
        Dialect::Oracle => match ty {
            FieldType::String => "nvarchar2(2000)",
            FieldType::Int32 => "number(10)",
            FieldType::Int64 => "number(19)",
            FieldType::Decimal => "number(18,4)",
            FieldType::Double => "binary_double",
            FieldType::Single => "binary_float",
            FieldType::Bool => "number(1)",
            FieldType::Guid => "raw(16)",
            FieldType::DateTime => "timestamp",
            FieldType::Bytes => "blob",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        let expected: [(Dialect, [&str; 5]); 5] = [
            (Dialect::SqlServer, ["nvarchar(max)", "int", "bigint", "decimal(18,4)", "float"]),
            (Dialect::MySql, ["char", "signed", "signed", "decimal(18,4)", "double"]),
            (Dialect::Postgres, ["text", "integer", "bigint", "numeric", "double precision"]),
            (Dialect::SqlLite, ["text", "integer", "integer", "numeric", "real"]),
            (Dialect::Oracle, ["nvarchar2(2000)", "number(10)", "number(19)", "number(18,4)", "binary_double"]),
        ];
        let canonical = [
            FieldType::String,
            FieldType::Int32,
            FieldType::Int64,
            FieldType::Decimal,
            FieldType::Double,
        ];

        for (dialect, names) in expected {
            for (ty, name) in canonical.iter().zip(names) {
                assert_eq!(cast_type_name(dialect, *ty), name, "{dialect} {ty}");
            }
        }
    }
}
