//! Date-time methods for `Temporal` property types.

use joinery_types::{SqlField, Temporal};

use super::{Column, Expr, IntoOperand, Method, Predicate, Scalar};
use crate::schema::Entity;

macro_rules! impl_temporal {
    ($ty:ident) => {
        impl<E: Entity, T: SqlField + Temporal> $ty<E, T> {
            /// Strictly later than `moment`.
            pub fn after(self, moment: impl IntoOperand<E, T>) -> Predicate<E> {
                Predicate::new(Expr::call(
                    Method::After,
                    self.into_expr(),
                    vec![moment.into_operand()],
                ))
            }

            /// Strictly earlier than `moment`.
            pub fn before(self, moment: impl IntoOperand<E, T>) -> Predicate<E> {
                Predicate::new(Expr::call(
                    Method::Before,
                    self.into_expr(),
                    vec![moment.into_operand()],
                ))
            }

            pub fn year(self) -> Scalar<E, i32> {
                Scalar::from_expr(Expr::call(Method::Year, self.into_expr(), Vec::new()))
            }

            pub fn month(self) -> Scalar<E, i32> {
                Scalar::from_expr(Expr::call(Method::Month, self.into_expr(), Vec::new()))
            }

            pub fn day(self) -> Scalar<E, i32> {
                Scalar::from_expr(Expr::call(Method::Day, self.into_expr(), Vec::new()))
            }
        }
    };
}

impl_temporal!(Column);
impl_temporal!(Scalar);
