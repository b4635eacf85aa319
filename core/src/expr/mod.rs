//! Typed predicate surface and the closed expression AST it produces.
//!
//! Application code writes predicates against typed columns:
//!
//! ```ignore
//! let adult_in_north_america = Person::AGE
//!     .ge(18)
//!     .and(Person::COUNTRY.eq("US").or(Person::COUNTRY.eq("CA")));
//! ```
//!
//! The builders only assemble an [`Expr`] tree; every decision about what is
//! a column, what gets evaluated and what is rejected belongs to the
//! compiler. `Expr` is public so callers can build shapes the typed layer
//! cannot express.

mod column;
mod datetime;
mod logical;
mod math;
mod string;

pub use column::{Column, IntoOperand, Scalar};
pub use logical::{Predicate, and, and_all, not, or, or_any};
pub use math::average;

use core::fmt;

use joinery_types::{FieldType, Value};

use crate::schema::TableRef;

/// Reference to one property of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRef {
    pub table: TableRef,
    pub name: &'static str,
    pub ty: FieldType,
}

/// Binary operators of the expression AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt | BinaryOp::Le
        )
    }

    pub const fn is_connector(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// Method calls the compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    // predicates
    Contains,
    StartsWith,
    EndsWith,
    Between,
    In,
    After,
    Before,
    Matches,
    // scalars
    ToUpper,
    ToLower,
    Trim,
    Length,
    Round,
    Abs,
    Year,
    Month,
    Day,
    Average,
}

impl Method {
    /// `true` for methods that yield a boolean.
    pub const fn is_predicate(self) -> bool {
        matches!(
            self,
            Method::Contains
                | Method::StartsWith
                | Method::EndsWith
                | Method::Between
                | Method::In
                | Method::After
                | Method::Before
                | Method::Matches
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Method::Contains => "contains",
            Method::StartsWith => "starts_with",
            Method::EndsWith => "ends_with",
            Method::Between => "between",
            Method::In => "is_in",
            Method::After => "after",
            Method::Before => "before",
            Method::Matches => "matches",
            Method::ToUpper => "upper",
            Method::ToLower => "lower",
            Method::Trim => "trim",
            Method::Length => "length",
            Method::Round => "round",
            Method::Abs => "abs",
            Method::Year => "year",
            Method::Month => "month",
            Method::Day => "day",
            Method::Average => "average",
        }
    }
}

/// Closed expression AST walked by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),
    Literal(Value),
    List(Vec<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Call {
        method: Method,
        receiver: Box<Expr>,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn column<E: crate::Entity>(name: &'static str, ty: FieldType) -> Self {
        Expr::Column(ColumnRef {
            table: E::table_ref(),
            name,
            ty,
        })
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(method: Method, receiver: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            method,
            receiver: Box::new(receiver),
            args,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// `true` when any column appears anywhere in this subtree.
    pub fn is_entity_bound(&self) -> bool {
        match self {
            Expr::Column(_) => true,
            Expr::Literal(_) => false,
            Expr::List(items) => items.iter().any(Expr::is_entity_bound),
            Expr::Binary { left, right, .. } => left.is_entity_bound() || right.is_entity_bound(),
            Expr::Not(inner) => inner.is_entity_bound(),
            Expr::Call { receiver, args, .. } => {
                receiver.is_entity_bound() || args.iter().any(Expr::is_entity_bound)
            }
        }
    }

    /// First column in left-to-right order, used to name parameters.
    pub fn first_column(&self) -> Option<&ColumnRef> {
        match self {
            Expr::Column(c) => Some(c),
            Expr::Literal(_) => None,
            Expr::List(items) => items.iter().find_map(Expr::first_column),
            Expr::Binary { left, right, .. } => left.first_column().or_else(|| right.first_column()),
            Expr::Not(inner) => inner.first_column(),
            Expr::Call { receiver, args, .. } => receiver
                .first_column()
                .or_else(|| args.iter().find_map(Expr::first_column)),
        }
    }
}

/// Source-like rendering used in `UnsupportedExpression` messages.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(c) => write!(f, "{}.{}", c.table.name(), c.name),
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Expr::Binary { op, left, right } => write!(f, "({left} {} {right})", op.symbol()),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::Call {
                method,
                receiver,
                args,
            } => {
                write!(f, "{receiver}.{}(", method.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
