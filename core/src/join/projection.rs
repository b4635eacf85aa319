//! Projection bindings: which source column feeds each DTO property.
//!
//! Bindings follow "first claim wins": once a property is occupied, later
//! claims for it are ignored. Explicit casts claim first (they run while
//! the pipeline is built); [`Projection::auto_bind`] fills the rest when the
//! definition is finalized.

use joinery_types::{FieldType, is_legal_cast};

use crate::alias::{AliasCode, AliasRegistry};
use crate::error::{JoineryError, Result};
use crate::schema::TableRef;

/// Column feeding a projection binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingSource {
    pub alias: AliasCode,
    pub column: &'static str,
    pub source_type: FieldType,
    /// Set when the column is cast to the property's type.
    pub cast_to: Option<FieldType>,
}

/// One DTO property and, once occupied, its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionBinding {
    pub property: &'static str,
    pub target: FieldType,
    pub source: Option<BindingSource>,
}

impl ProjectionBinding {
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.source.is_some()
    }
}

/// Bindings of every DTO property, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    bindings: Vec<ProjectionBinding>,
}

impl Projection {
    pub fn for_dto(dto: &TableRef) -> Self {
        let bindings = dto
            .fields()
            .iter()
            .map(|field| ProjectionBinding {
                property: field.name,
                target: field.ty,
                source: None,
            })
            .collect();
        Self { bindings }
    }

    /// Tries to occupy `property` with `column`.
    ///
    /// Returns `Ok(false)` when the property is already occupied or unknown,
    /// and `Err(IllegalCast)` when the types differ outside the cast matrix.
    /// Either way the binding is left untouched.
    pub fn claim(
        &mut self,
        property: &'static str,
        alias: AliasCode,
        column: &'static str,
        source_type: FieldType,
    ) -> Result<bool> {
        let Some(binding) = self.bindings.iter_mut().find(|b| b.property == property) else {
            return Ok(false);
        };
        if binding.is_occupied() {
            return Ok(false);
        }

        let cast_to = if source_type == binding.target {
            None
        } else if is_legal_cast(source_type, binding.target) {
            Some(binding.target)
        } else {
            return Err(JoineryError::IllegalCast {
                property,
                source_type,
                target: binding.target,
            });
        };

        binding.source = Some(BindingSource {
            alias,
            column,
            source_type,
            cast_to,
        });
        Ok(true)
    }

    /// Binds every unoccupied property to the first table, in alias order,
    /// exposing a column of the same name and type.
    pub fn auto_bind(&mut self, aliases: &AliasRegistry) {
        for binding in self.bindings.iter_mut().filter(|b| !b.is_occupied()) {
            let found = aliases.tables().find_map(|(alias, table)| {
                table
                    .field(binding.property, binding.target)
                    .map(|field| (alias, field))
            });
            if let Some((alias, field)) = found {
                binding.source = Some(BindingSource {
                    alias,
                    column: field.name,
                    source_type: field.ty,
                    cast_to: None,
                });
            }
        }
    }

    pub fn get(&self, property: &str) -> Option<&ProjectionBinding> {
        self.bindings.iter().find(|b| b.property == property)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectionBinding> {
        self.bindings.iter()
    }

    /// Occupied bindings in declaration order; these form the select list.
    pub fn occupied(&self) -> impl Iterator<Item = &ProjectionBinding> {
        self.bindings.iter().filter(|b| b.is_occupied())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
