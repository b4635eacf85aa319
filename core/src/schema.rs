//! Entity metadata.
//!
//! The compiler only needs `(name, type)` pairs per table. Entities and
//! output DTOs both carry them as a static [`Field`] list, normally generated
//! by [`entity!`](crate::entity).

use core::any::TypeId;
use core::fmt;

use joinery_types::{FieldType, Value};

/// One property of an entity or DTO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// A table-backed type (or an output DTO) with static column metadata.
pub trait Entity: 'static {
    /// Table name, unquoted.
    const TABLE: &'static str;

    /// Properties in declaration order.
    const FIELDS: &'static [Field];

    /// Runtime handle carrying this type's identity and metadata.
    fn table_ref() -> TableRef
    where
        Self: Sized,
    {
        TableRef::of::<Self>()
    }
}

/// Type-erased handle to an [`Entity`].
///
/// Two handles are equal when they name the same Rust type.
#[derive(Clone, Copy)]
pub struct TableRef {
    id: TypeId,
    name: &'static str,
    fields: &'static [Field],
}

impl TableRef {
    pub fn of<E: Entity>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: E::TABLE,
            fields: E::FIELDS,
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Looks up a property by name and type.
    pub fn field(&self, name: &str, ty: FieldType) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name && f.ty == ty)
    }
}

impl PartialEq for TableRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TableRef {}

impl fmt::Debug for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TableRef").field(&self.name).finish()
    }
}

/// Converts an entity into its column values, in declaration order.
pub trait IntoValues {
    fn into_values(self) -> Vec<(&'static str, Value)>;
}

/// Sort direction for ORDER BY clauses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Asc,
    Desc,
}
