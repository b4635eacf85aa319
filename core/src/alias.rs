//! Table Alias Registry.
//!
//! Each table that participates in a join session gets a short alias the
//! first time it is seen. Codes are allocated in strictly increasing order
//! and never reassigned while the session lives.

use core::any::TypeId;
use core::fmt;

use smallvec::SmallVec;

use crate::error::{JoineryError, Result};
use crate::schema::TableRef;

/// Short per-table code used to qualify columns.
///
/// The first 26 codes display as `a` through `z`; later ones as `t26`, `t27`, ...
/// so that no alias can spell an SQL keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AliasCode(u8);

impl AliasCode {
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for AliasCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 26 {
            write!(f, "{}", char::from(b'a' + self.0))
        } else {
            write!(f, "t{}", self.0)
        }
    }
}

/// Maps table types to their alias for one join session.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    entries: SmallVec<[(TableRef, AliasCode); 4]>,
}

impl AliasRegistry {
    /// Number of distinct tables one session can alias.
    pub const CAPACITY: usize = u8::MAX as usize;

    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the alias for `table`, allocating the next code on first sight.
    pub fn alias_for(&mut self, table: TableRef) -> Result<AliasCode> {
        if let Some(code) = self.get(table.id()) {
            return Ok(code);
        }
        if self.entries.len() >= Self::CAPACITY {
            return Err(JoineryError::AliasCapacityExceeded {
                capacity: Self::CAPACITY,
            });
        }
        // entries.len() < 255 here, so the cast is lossless
        let code = AliasCode(self.entries.len() as u8);
        self.entries.push((table, code));
        Ok(code)
    }

    pub fn get(&self, id: TypeId) -> Option<AliasCode> {
        self.entries
            .iter()
            .find(|(table, _)| table.id() == id)
            .map(|&(_, code)| code)
    }

    /// Like [`get`](Self::get) but fails with [`JoineryError::AliasNotFound`].
    pub fn require(&self, table: &TableRef) -> Result<AliasCode> {
        self.get(table.id())
            .ok_or(JoineryError::AliasNotFound { table: table.name() })
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.get(id).is_some()
    }

    /// Registered tables in allocation order.
    pub fn tables(&self) -> impl Iterator<Item = (AliasCode, &TableRef)> {
        self.entries.iter().map(|(table, code)| (*code, table))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Entity, Field};

    struct Order;
    struct Customer;

    impl Entity for Order {
        const TABLE: &'static str = "Order";
        const FIELDS: &'static [Field] = &[];
    }

    impl Entity for Customer {
        const TABLE: &'static str = "Customer";
        const FIELDS: &'static [Field] = &[];
    }

    #[test]
    fn allocation_is_idempotent_and_increasing() {
        let mut registry = AliasRegistry::new();
        let a = registry.alias_for(Order::table_ref()).unwrap();
        let b = registry.alias_for(Customer::table_ref()).unwrap();
        assert!(a < b);
        assert_eq!(registry.alias_for(Order::table_ref()).unwrap(), a);
        assert_eq!(registry.len(), 2);
        assert_eq!(a.to_string(), "a");
        assert_eq!(b.to_string(), "b");
    }

    #[test]
    fn display_past_the_alphabet() {
        assert_eq!(AliasCode(25).to_string(), "z");
        assert_eq!(AliasCode(26).to_string(), "t26");
        assert_eq!(AliasCode(254).to_string(), "t254");
    }

    #[test]
    fn capacity_is_a_hard_ceiling() {
        let mut registry = AliasRegistry::new();
        for i in 0..AliasRegistry::CAPACITY {
            registry.entries.push((Order::table_ref(), AliasCode(i as u8)));
        }
        let err = registry.alias_for(Customer::table_ref()).unwrap_err();
        assert!(matches!(
            err,
            JoineryError::AliasCapacityExceeded { capacity: 255 }
        ));
        // already-registered tables still resolve
        assert_eq!(registry.alias_for(Order::table_ref()).unwrap(), AliasCode(0));
    }

    #[test]
    fn missing_table_is_reported() {
        let registry = AliasRegistry::new();
        let err = registry.require(&Customer::table_ref()).unwrap_err();
        assert!(matches!(err, JoineryError::AliasNotFound { table: "Customer" }));
    }
}
