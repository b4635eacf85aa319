//! Cast legality matrix for projection bindings.
//!
//! The set is a compatibility fixture: it is asymmetric in what it covers
//! (`int32 <-> double` is present, `int32 <-> single` is not) and must stay
//! exactly as listed. Every pair is legal in both directions.

use crate::FieldType::{self, *};

/// Unordered pairs of types a projection binding may cast between.
pub const CAST_MATRIX: &[(FieldType, FieldType)] = &[
    (Int32, String),
    (Int32, Int64),
    (Int32, Decimal),
    (Int32, Double),
    (Int64, String),
    (Decimal, String),
    (Decimal, Double),
    (Single, String),
    (Single, Double),
    (Single, Decimal),
    (Double, String),
    (Guid, String),
    (Bool, String),
    (Bool, Int32),
    (Bytes, String),
    (DateTime, String),
];

/// Returns `true` when a binding from `source` may be cast to `target`.
///
/// A type is never castable to itself; same-typed bindings need no cast.
#[must_use]
pub fn is_legal_cast(source: FieldType, target: FieldType) -> bool {
    source != target
        && CAST_MATRIX
            .iter()
            .any(|&(a, b)| (a == source && b == target) || (a == target && b == source))
}
