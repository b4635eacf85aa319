//! Declared property types.
//!
//! Entity and DTO metadata is a list of `(name, FieldType)` pairs. The
//! compiler only ever needs this much of a property's type: projection
//! binding compares it, casting looks it up in the legality matrix, and
//! rendering maps it to a dialect type name.

/// The declared type of an entity or DTO property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    Bool,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    Guid,
    DateTime,
    Bytes,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 10] = [
        FieldType::Bool,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::Single,
        FieldType::Double,
        FieldType::Decimal,
        FieldType::String,
        FieldType::Guid,
        FieldType::DateTime,
        FieldType::Bytes,
    ];

    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::Int32
                | FieldType::Int64
                | FieldType::Single
                | FieldType::Double
                | FieldType::Decimal
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, FieldType::String)
    }

    #[inline]
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, FieldType::DateTime)
    }

    /// Name used in diagnostics, following the host-type spelling of the cast matrix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Single => "single",
            FieldType::Double => "double",
            FieldType::Decimal => "decimal",
            FieldType::String => "string",
            FieldType::Guid => "guid",
            FieldType::DateTime => "datetime",
            FieldType::Bytes => "byte[]",
        }
    }
}

impl core::fmt::Display for FieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
