//! Logical operators (AND, OR, NOT).
//!
//! Both function-based and operator-based forms are available:
//!
//! ```ignore
//! // Function style
//! and(condition1, condition2)
//! or(condition1, condition2)
//! not(condition)
//!
//! // Operator style (via std::ops traits)
//! condition1 & condition2   // BitAnd
//! condition1 | condition2   // BitOr
//! !condition                // Not
//! ```

use core::fmt;
use core::marker::PhantomData;
use core::ops::{BitAnd, BitOr, Not};

use joinery_types::Boolean;

use super::{BinaryOp, Column, Expr};
use crate::schema::Entity;

/// A boolean expression over entity `E`.
pub struct Predicate<E> {
    expr: Expr,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Predicate<E> {
    /// Wraps a hand-built expression. The compiler rejects shapes it cannot
    /// linearize, so no validation happens here.
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            _marker: PhantomData,
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    pub fn and(self, other: Predicate<E>) -> Predicate<E> {
        Predicate::new(Expr::binary(BinaryOp::And, self.expr, other.expr))
    }

    pub fn or(self, other: Predicate<E>) -> Predicate<E> {
        Predicate::new(Expr::binary(BinaryOp::Or, self.expr, other.expr))
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Predicate::new(self.expr.clone())
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.expr).finish()
    }
}

impl<E> fmt::Display for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}

// =============================================================================
// Function forms
// =============================================================================

pub fn and<E>(left: Predicate<E>, right: Predicate<E>) -> Predicate<E> {
    left.and(right)
}

pub fn or<E>(left: Predicate<E>, right: Predicate<E>) -> Predicate<E> {
    left.or(right)
}

pub fn not<E>(predicate: Predicate<E>) -> Predicate<E> {
    !predicate
}

/// Conjunction of all predicates; `None` for an empty input.
pub fn and_all<E>(predicates: impl IntoIterator<Item = Predicate<E>>) -> Option<Predicate<E>> {
    predicates.into_iter().reduce(Predicate::and)
}

/// Disjunction of all predicates; `None` for an empty input.
pub fn or_any<E>(predicates: impl IntoIterator<Item = Predicate<E>>) -> Option<Predicate<E>> {
    predicates.into_iter().reduce(Predicate::or)
}

// =============================================================================
// Operator forms
// =============================================================================

impl<E> BitAnd for Predicate<E> {
    type Output = Predicate<E>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<E> BitOr for Predicate<E> {
    type Output = Predicate<E>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<E> Not for Predicate<E> {
    type Output = Predicate<E>;

    fn not(self) -> Self::Output {
        Predicate::new(self.expr.not())
    }
}

// =============================================================================
// Boolean columns as bare predicates
// =============================================================================

impl<E: Entity, T: Boolean + joinery_types::SqlField> From<Column<E, T>> for Predicate<E> {
    /// A bare boolean column; compiles to `col = true`.
    fn from(column: Column<E, T>) -> Self {
        Predicate::new(column.into_expr())
    }
}

impl<E: Entity, T: Boolean + joinery_types::SqlField> Not for Column<E, T> {
    type Output = Predicate<E>;

    /// Compiles to `col = false`.
    fn not(self) -> Self::Output {
        Predicate::new(self.into_expr().not())
    }
}

impl<E: Entity, T: Boolean + joinery_types::SqlField> Column<E, T> {
    pub fn is_true(self) -> Predicate<E> {
        Predicate::from(self)
    }

    pub fn is_false(self) -> Predicate<E> {
        !self
    }
}
