//! Statement Builder for single-table statements.
//!
//! Every builder compiles its predicates against an unqualified scope and
//! renders with upper-case keywords. Rendering is all or nothing: a builder
//! either returns a complete [`Statement`] or an error.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::{DeleteBuilder, delete};
pub use insert::{InsertBuilder, insert};
pub use select::{CountBuilder, SelectBuilder, count, select};
pub use update::{UpdateBuilder, update};

use core::fmt;
use std::borrow::Cow;

use joinery_types::Dialect;

use crate::compiler::{Scope, compile};
use crate::error::Result;
use crate::expr::Predicate;
use crate::params::ParameterSet;
use crate::schema::{Entity, OrderBy};
use crate::sql::{KeywordCase, Sql, SqlChunk, Token, render_predicate};

/// Rendered SQL text with its parameters, ready for a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: ParameterSet,
    pub dialect: Dialect,
}

impl Statement {
    pub(crate) fn render(sql: &Sql<'_>, params: ParameterSet, dialect: Dialect, case: KeywordCase) -> Self {
        Self {
            sql: sql.render(dialect, case),
            params,
            dialect,
        }
    }

    /// Wraps hand-written SQL; parameters are bound by name as given.
    pub fn raw(sql: impl Into<String>, params: ParameterSet, dialect: Dialect) -> Self {
        Self {
            sql: sql.into(),
            params,
            dialect,
        }
    }

    #[inline]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[inline]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

//------------------------------------------------------------------------------
// Shared clause helpers
//------------------------------------------------------------------------------

/// `WHERE <predicate>` for a single-table statement, allocating parameters
/// into `params`.
pub fn where_clause<E: Entity>(
    predicate: &Predicate<E>,
    dialect: Dialect,
    params: &mut ParameterSet,
) -> Result<Sql<'static>> {
    let compiled = compile(predicate.expr(), &Scope::unqualified::<E>(), params)?;
    Ok(Sql::token(Token::WHERE).append(render_predicate(&compiled, dialect)?))
}

pub(crate) fn and_filter<E>(current: Option<Predicate<E>>, next: Predicate<E>) -> Option<Predicate<E>> {
    Some(match current {
        Some(existing) => existing.and(next),
        None => next,
    })
}

pub(crate) fn direction(order: OrderBy) -> Token {
    match order {
        OrderBy::Asc => Token::ASC,
        OrderBy::Desc => Token::DESC,
    }
}

/// `ORDER BY a ASC, b DESC`; empty when `columns` is.
pub(crate) fn order_by_clause(columns: impl IntoIterator<Item = (Sql<'static>, OrderBy)>) -> Sql<'static> {
    let items: Vec<_> = columns
        .into_iter()
        .map(|(column, order)| column.push(direction(order)))
        .collect();
    if items.is_empty() {
        return Sql::empty();
    }
    Sql::from_iter([Token::ORDER, Token::BY]).append(Sql::join(items, Token::COMMA))
}

pub(crate) fn count_chunk(n: u64) -> SqlChunk<'static> {
    SqlChunk::Raw(Cow::Owned(n.to_string()))
}

/// Row window of a SELECT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Page {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Page {
    /// `TOP (n)` prefix: SQL Server with a limit and no offset.
    pub(crate) fn top(&self, dialect: Dialect) -> Option<Sql<'static>> {
        match (dialect, self.limit, self.offset) {
            (Dialect::SqlServer, Some(limit), None) => Some(
                Sql::token(Token::TOP).append(Sql::from(count_chunk(limit)).parens()),
            ),
            _ => None,
        }
    }

    /// Trailing pagination clause. `ordered` tells whether an ORDER BY
    /// was already emitted; SQL Server needs one before OFFSET.
    pub(crate) fn clause(&self, dialect: Dialect, ordered: bool) -> Sql<'static> {
        if self.limit.is_none() && self.offset.is_none() {
            return Sql::empty();
        }
        match dialect {
            Dialect::SqlServer if self.offset.is_none() => Sql::empty(),
            Dialect::SqlServer | Dialect::Oracle => {
                let mut sql = Sql::empty();
                if dialect == Dialect::SqlServer && !ordered {
                    sql.append_mut(Sql::from_iter([Token::ORDER, Token::BY]).append(
                        Sql::from_iter([Token::SELECT, Token::NULL]).parens(),
                    ));
                }
                sql.push_mut(Token::OFFSET);
                sql.push_mut(count_chunk(self.offset.unwrap_or(0)));
                sql.push_mut(Token::ROWS);
                if let Some(limit) = self.limit {
                    sql.append_mut(Sql::from_iter([Token::FETCH, Token::NEXT]));
                    sql.push_mut(count_chunk(limit));
                    sql.append_mut(Sql::from_iter([Token::ROWS, Token::ONLY]));
                }
                sql
            }
            Dialect::Postgres | Dialect::MySql | Dialect::SqlLite => {
                let mut sql = Sql::empty();
                // MySQL and SQLite cannot OFFSET without a LIMIT
                let limit = match (self.limit, dialect) {
                    (Some(limit), _) => Some(count_chunk(limit)),
                    (None, Dialect::SqlLite) => Some(SqlChunk::raw("-1")),
                    (None, Dialect::MySql) => Some(SqlChunk::raw("18446744073709551615")),
                    (None, _) => None,
                };
                if let Some(limit) = limit {
                    sql.push_mut(Token::LIMIT);
                    sql.push_mut(limit);
                }
                if let Some(offset) = self.offset {
                    sql.push_mut(Token::OFFSET);
                    sql.push_mut(count_chunk(offset));
                }
                sql
            }
        }
    }
}
