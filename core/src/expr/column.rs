use core::fmt;
use core::marker::PhantomData;

use joinery_types::{Decimal, FieldType, NaiveDateTime, SqlField, Uuid, Value};

use super::{BinaryOp, ColumnRef, Expr, Method, Predicate};
use crate::schema::Entity;

/// A typed column of entity `E` holding values of type `T`.
///
/// Generated as associated constants by [`entity!`](crate::entity):
/// `Order::CUSTOMER_ID` is a `Column<Order, i32>`.
pub struct Column<E, T> {
    name: &'static str,
    _marker: PhantomData<fn() -> (E, T)>,
}

impl<E, T> Column<E, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<E: Entity, T: SqlField> Column<E, T> {
    #[inline]
    pub fn field_type(&self) -> FieldType {
        T::FIELD_TYPE
    }

    pub fn column_ref(&self) -> ColumnRef {
        ColumnRef {
            table: E::table_ref(),
            name: self.name,
            ty: T::FIELD_TYPE,
        }
    }

    pub fn into_expr(self) -> Expr {
        Expr::Column(self.column_ref())
    }
}

// not derived: derive would add `E: Clone` bounds
impl<E, T> Clone for Column<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Column<E, T> {}

impl<E, T> fmt::Debug for Column<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Column").field(&self.name).finish()
    }
}

/// A typed scalar expression over entity `E`: a function of a column, or a
/// literal-only computation the compiler evaluates eagerly.
pub struct Scalar<E, T> {
    expr: Expr,
    _marker: PhantomData<fn() -> (E, T)>,
}

impl<E, T> Scalar<E, T> {
    pub(crate) fn from_expr(expr: Expr) -> Self {
        Self {
            expr,
            _marker: PhantomData,
        }
    }

    /// A literal operand, for building expressions that are evaluated before binding.
    pub fn literal(value: T) -> Self
    where
        T: SqlField,
    {
        Self::from_expr(Expr::Literal(value.into_value()))
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl<E, T> Clone for Scalar<E, T> {
    fn clone(&self) -> Self {
        Self::from_expr(self.expr.clone())
    }
}

impl<E, T> fmt::Debug for Scalar<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scalar").field(&self.expr).finish()
    }
}

/// Anything usable as the right-hand side of a comparison with a `T`
/// operand of entity `E`: a value, another column, or a scalar.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be compared with a `{T}` operand",
    label = "expected a `{T}` value, column or scalar"
)]
pub trait IntoOperand<E, T> {
    fn into_operand(self) -> Expr;
}

impl<E: Entity, T: SqlField> IntoOperand<E, T> for Column<E, T> {
    fn into_operand(self) -> Expr {
        self.into_expr()
    }
}

impl<E, T> IntoOperand<E, T> for Scalar<E, T> {
    fn into_operand(self) -> Expr {
        self.expr
    }
}

macro_rules! impl_into_operand {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<E> IntoOperand<E, $ty> for $ty {
                #[inline]
                fn into_operand(self) -> Expr {
                    Expr::Literal(SqlField::into_value(self))
                }
            }

            impl<E> IntoOperand<E, Option<$ty>> for $ty {
                #[inline]
                fn into_operand(self) -> Expr {
                    Expr::Literal(SqlField::into_value(self))
                }
            }

            impl<E> IntoOperand<E, Option<$ty>> for Option<$ty> {
                #[inline]
                fn into_operand(self) -> Expr {
                    Expr::Literal(SqlField::into_value(self))
                }
            }
        )+
    };
}

impl_into_operand!(bool, i32, i64, f32, f64, Decimal, String, Uuid, NaiveDateTime, Vec<u8>);

impl<E> IntoOperand<E, String> for &str {
    fn into_operand(self) -> Expr {
        Expr::Literal(self.into())
    }
}

impl<E> IntoOperand<E, Option<String>> for &str {
    fn into_operand(self) -> Expr {
        Expr::Literal(self.into())
    }
}

// =============================================================================
// Comparisons shared by columns and scalars
// =============================================================================

pub(super) fn compare<E>(op: BinaryOp, left: Expr, right: Expr) -> Predicate<E> {
    Predicate::new(Expr::binary(op, left, right))
}

macro_rules! impl_comparisons {
    ($ty:ident) => {
        #[allow(clippy::should_implement_trait)]
        impl<E: Entity, T: SqlField> $ty<E, T> {
            /// `self = rhs`
            pub fn eq(self, rhs: impl IntoOperand<E, T>) -> Predicate<E> {
                compare(BinaryOp::Eq, self.into_expr(), rhs.into_operand())
            }

            /// `self <> rhs`
            pub fn ne(self, rhs: impl IntoOperand<E, T>) -> Predicate<E> {
                compare(BinaryOp::Ne, self.into_expr(), rhs.into_operand())
            }

            /// `self > rhs`
            pub fn gt(self, rhs: impl IntoOperand<E, T>) -> Predicate<E> {
                compare(BinaryOp::Gt, self.into_expr(), rhs.into_operand())
            }

            /// `self >= rhs`
            pub fn ge(self, rhs: impl IntoOperand<E, T>) -> Predicate<E> {
                compare(BinaryOp::Ge, self.into_expr(), rhs.into_operand())
            }

            /// `self < rhs`
            pub fn lt(self, rhs: impl IntoOperand<E, T>) -> Predicate<E> {
                compare(BinaryOp::Lt, self.into_expr(), rhs.into_operand())
            }

            /// `self <= rhs`
            pub fn le(self, rhs: impl IntoOperand<E, T>) -> Predicate<E> {
                compare(BinaryOp::Le, self.into_expr(), rhs.into_operand())
            }

            pub fn is_null(self) -> Predicate<E> {
                compare(BinaryOp::Eq, self.into_expr(), Expr::Literal(Value::Null))
            }

            pub fn is_not_null(self) -> Predicate<E> {
                compare(BinaryOp::Ne, self.into_expr(), Expr::Literal(Value::Null))
            }

            /// `self BETWEEN low AND high`, bounds inclusive.
            pub fn between(
                self,
                low: impl IntoOperand<E, T>,
                high: impl IntoOperand<E, T>,
            ) -> Predicate<E> {
                Predicate::new(Expr::call(
                    Method::Between,
                    self.into_expr(),
                    vec![low.into_operand(), high.into_operand()],
                ))
            }

            /// `self IN (...)`; an empty list matches nothing.
            pub fn is_in<I>(self, values: I) -> Predicate<E>
            where
                I: IntoIterator,
                I::Item: IntoOperand<E, T>,
            {
                let list = values
                    .into_iter()
                    .map(|v| IntoOperand::<E, T>::into_operand(v))
                    .collect();
                Predicate::new(Expr::call(Method::In, self.into_expr(), vec![Expr::List(list)]))
            }

            /// `self NOT IN (...)`; an empty list matches everything.
            pub fn not_in<I>(self, values: I) -> Predicate<E>
            where
                I: IntoIterator,
                I::Item: IntoOperand<E, T>,
            {
                !self.is_in(values)
            }
        }
    };
}

impl_comparisons!(Column);
impl_comparisons!(Scalar);
