//! Type-safe string methods.
//!
//! These require `Textual` property types (`String`, `Option<String>`):
//!
//! ```ignore
//! // OK: text column
//! Person::NAME.upper().eq("ADA");
//!
//! // Compile error: i32 is not Textual
//! Person::AGE.upper();
//! ```

use joinery_types::{SqlField, Textual};

use super::{Column, Expr, IntoOperand, Method, Predicate, Scalar};
use crate::schema::Entity;

macro_rules! impl_textual {
    ($ty:ident) => {
        impl<E: Entity, T: SqlField + Textual> $ty<E, T> {
            /// `self LIKE '%pattern%'`
            pub fn contains(self, pattern: impl IntoOperand<E, String>) -> Predicate<E> {
                Predicate::new(Expr::call(
                    Method::Contains,
                    self.into_expr(),
                    vec![pattern.into_operand()],
                ))
            }

            /// `self LIKE 'prefix%'`
            pub fn starts_with(self, prefix: impl IntoOperand<E, String>) -> Predicate<E> {
                Predicate::new(Expr::call(
                    Method::StartsWith,
                    self.into_expr(),
                    vec![prefix.into_operand()],
                ))
            }

            /// `self LIKE '%suffix'`
            pub fn ends_with(self, suffix: impl IntoOperand<E, String>) -> Predicate<E> {
                Predicate::new(Expr::call(
                    Method::EndsWith,
                    self.into_expr(),
                    vec![suffix.into_operand()],
                ))
            }

            /// Regular-expression match. Not every dialect can render it.
            pub fn matches(self, pattern: &str) -> Predicate<E> {
                Predicate::new(Expr::call(
                    Method::Matches,
                    self.into_expr(),
                    vec![Expr::literal(pattern)],
                ))
            }

            pub fn upper(self) -> Scalar<E, T> {
                Scalar::from_expr(Expr::call(Method::ToUpper, self.into_expr(), Vec::new()))
            }

            pub fn lower(self) -> Scalar<E, T> {
                Scalar::from_expr(Expr::call(Method::ToLower, self.into_expr(), Vec::new()))
            }

            pub fn trim(self) -> Scalar<E, T> {
                Scalar::from_expr(Expr::call(Method::Trim, self.into_expr(), Vec::new()))
            }

            /// Character count.
            pub fn length(self) -> Scalar<E, i32> {
                Scalar::from_expr(Expr::call(Method::Length, self.into_expr(), Vec::new()))
            }
        }
    };
}

impl_textual!(Column);
impl_textual!(Scalar);
