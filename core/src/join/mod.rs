//! Join Graph Builder.
//!
//! A join pipeline is a small state machine:
//!
//! ```text
//! join::<Dto>()
//!   .inner_join::<Order, Customer>()        -> PendingJoin
//!   .on(Order::CUSTOMER_ID, Customer::ID)?  -> JoinStep
//!   .where_first(Order::TOTAL.gt(100.0))?   -> JoinStep (and/or/where/cast/order_by)
//!   .then()                                 -> JoinPipeline (next pair)
//!   ...
//!   .finally()                              -> JoinDefinition
//! ```
//!
//! Each state is its own type, so an `on` can't be skipped and a where
//! clause can't be attached before its pair exists. The resulting
//! [`JoinDefinition`] is immutable and renders for any dialect.

mod builder;
mod projection;
mod render;

pub use builder::{JoinPipeline, JoinStep, PendingJoin, join};
pub use projection::{BindingSource, Projection, ProjectionBinding};

use crate::alias::{AliasCode, AliasRegistry};
use crate::compiler::CompiledPredicate;
use crate::params::ParameterSet;
use crate::schema::{OrderBy, TableRef};
use crate::sql::Token;

/// Join operator of one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    FullOuter,
}

impl JoinKind {
    pub(crate) const fn tokens(self) -> &'static [Token] {
        match self {
            JoinKind::Inner => &[Token::INNER, Token::JOIN],
            JoinKind::Left => &[Token::LEFT, Token::JOIN],
            JoinKind::Right => &[Token::RIGHT, Token::JOIN],
            JoinKind::FullOuter => &[Token::FULL, Token::OUTER, Token::JOIN],
        }
    }
}

/// How a join predicate attaches to the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    On,
    And,
    Or,
}

/// One `right.col = left.col` equality of a join pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPredicate {
    pub combinator: Combinator,
    pub left_alias: AliasCode,
    pub left_column: &'static str,
    pub right_alias: AliasCode,
    pub right_column: &'static str,
}

/// One join operation between two aliased tables.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPair {
    pub kind: JoinKind,
    pub left: AliasCode,
    pub right: AliasCode,
    /// Table joined in by this pair.
    pub table: TableRef,
    pub predicates: Vec<JoinPredicate>,
    pub wheres: Vec<CompiledPredicate>,
}

/// A fully resolved multi-table join, keyed in a registry by its DTO type.
#[derive(Debug, Clone)]
pub struct JoinDefinition {
    dto: TableRef,
    aliases: AliasRegistry,
    pairs: Vec<JoinPair>,
    projection: Projection,
    params: ParameterSet,
    order: Vec<(AliasCode, &'static str, OrderBy)>,
}

impl JoinDefinition {
    /// Output type this definition projects into.
    pub fn dto(&self) -> TableRef {
        self.dto
    }

    /// Table of the first join pair's left side, aliased `a`.
    pub fn base(&self) -> Option<(AliasCode, &TableRef)> {
        self.aliases.tables().next()
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn pairs(&self) -> &[JoinPair] {
        &self.pairs
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }
}
