pub mod alias;
pub mod builder;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod join;
mod macros;
pub mod params;
pub mod profiling;
pub mod row;
pub mod schema;
pub mod sql;
pub mod tracing;

// Re-export key types and traits
pub use alias::{AliasCode, AliasRegistry};
pub use builder::{
    CountBuilder, DeleteBuilder, InsertBuilder, SelectBuilder, Statement, UpdateBuilder, count,
    delete, insert, select, update, where_clause,
};
pub use compiler::{CompiledPredicate, ExpressionNode, Operand, Operator, Scope, compile};
pub use error::{JoineryError, Result};
pub use expr::{Column, Expr, IntoOperand, Predicate, Scalar};
pub use join::{
    BindingSource, Combinator, JoinDefinition, JoinKind, JoinPair, JoinPipeline, JoinPredicate,
    JoinStep, PendingJoin, Projection, ProjectionBinding, join,
};
pub use params::{DialectExt, Parameter, ParameterSet, Placeholder, PlaceholderStyle};
pub use row::{FromRow, Row};
pub use schema::{Entity, Field, IntoValues, OrderBy, TableRef};
pub use sql::{KeywordCase, Sql, SqlChunk, Token};

pub use joinery_types::{
    Decimal, Dialect, DialectParseError, FieldType, NaiveDateTime, SqlField, Uuid, Value,
    ValueError, cast_type_name, is_legal_cast,
};

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
}
