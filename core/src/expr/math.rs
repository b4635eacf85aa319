//! Numeric methods and arithmetic.
//!
//! Arithmetic only compiles when no column takes part: `Scalar::literal(40) + 2`
//! is evaluated to `42` before binding, while `Order::TOTAL + 1` is rejected
//! by the compiler.

use core::ops::{Add, Div, Mul, Sub};

use joinery_types::{Numeric, SqlField, Value};

use super::{BinaryOp, Column, Expr, IntoOperand, Method, Scalar};
use crate::schema::Entity;

macro_rules! impl_numeric {
    ($ty:ident) => {
        impl<E: Entity, T: SqlField + Numeric> $ty<E, T> {
            /// `ROUND(self, digits)`
            pub fn round(self, digits: i32) -> Scalar<E, T> {
                Scalar::from_expr(Expr::call(
                    Method::Round,
                    self.into_expr(),
                    vec![Expr::literal(digits)],
                ))
            }

            pub fn abs(self) -> Scalar<E, T> {
                Scalar::from_expr(Expr::call(Method::Abs, self.into_expr(), Vec::new()))
            }
        }

        impl_arithmetic!($ty, Add, add, BinaryOp::Add);
        impl_arithmetic!($ty, Sub, sub, BinaryOp::Sub);
        impl_arithmetic!($ty, Mul, mul, BinaryOp::Mul);
        impl_arithmetic!($ty, Div, div, BinaryOp::Div);
    };
}

macro_rules! impl_arithmetic {
    ($ty:ident, $trait:ident, $method:ident, $op:expr) => {
        impl<E, T, R> $trait<R> for $ty<E, T>
        where
            E: Entity,
            T: SqlField + Numeric,
            R: IntoOperand<E, T>,
        {
            type Output = Scalar<E, T>;

            fn $method(self, rhs: R) -> Self::Output {
                Scalar::from_expr(Expr::binary($op, self.into_expr(), rhs.into_operand()))
            }
        }
    };
}

impl_numeric!(Column);
impl_numeric!(Scalar);

/// Arithmetic mean of literal values, evaluated before binding.
///
/// An empty input averages to `NULL`.
pub fn average<E, I, V>(values: I) -> Scalar<E, f64>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let list = values.into_iter().map(|v| Expr::Literal(v.into())).collect();
    Scalar::from_expr(Expr::call(Method::Average, Expr::List(list), Vec::new()))
}
