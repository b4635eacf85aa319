use core::marker::PhantomData;

use joinery_types::{Dialect, SqlField};

use super::{Page, Statement, and_filter, order_by_clause, where_clause};
use crate::error::Result;
use crate::expr::{Column, Predicate};
use crate::params::ParameterSet;
use crate::schema::{Entity, OrderBy};
use crate::sql::{KeywordCase, Sql, SqlChunk, Token};

//------------------------------------------------------------------------------
// SELECT
//------------------------------------------------------------------------------

/// Starts a `SELECT` of every column of `E`.
pub fn select<E: Entity>() -> SelectBuilder<E> {
    SelectBuilder {
        filter: None,
        order: Vec::new(),
        page: Page::default(),
        _entity: PhantomData,
    }
}

/// Builds a `SELECT <columns> FROM <table>` statement.
#[derive(Debug, Clone)]
pub struct SelectBuilder<E> {
    filter: Option<Predicate<E>>,
    order: Vec<(&'static str, OrderBy)>,
    page: Page,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> SelectBuilder<E> {
    /// Adds a WHERE condition; repeated calls are combined with `AND`.
    pub fn filter(mut self, predicate: Predicate<E>) -> Self {
        self.filter = and_filter(self.filter.take(), predicate);
        self
    }

    pub fn order_by<T: SqlField>(mut self, column: Column<E, T>, order: OrderBy) -> Self {
        self.order.push((column.name(), order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.page.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.page.offset = Some(offset);
        self
    }

    pub fn render(&self, dialect: Dialect) -> Result<Statement> {
        crate::joinery_profile_scope!("statement", "select");
        let mut params = ParameterSet::new();
        let mut sql = Sql::token(Token::SELECT);
        if let Some(top) = self.page.top(dialect) {
            sql.append_mut(top);
        }
        let columns = E::FIELDS
            .iter()
            .map(|field| Sql::from(SqlChunk::column(None, field.name)));
        sql.append_mut(Sql::join(columns, Token::COMMA));
        sql.push_mut(Token::FROM);
        sql.push_mut(SqlChunk::ident(E::TABLE));

        if let Some(filter) = &self.filter {
            sql.append_mut(where_clause(filter, dialect, &mut params)?);
        }
        sql.append_mut(order_by_clause(
            self.order
                .iter()
                .map(|&(name, order)| (Sql::from(SqlChunk::column(None, name)), order)),
        ));
        sql.append_mut(self.page.clause(dialect, !self.order.is_empty()));

        Ok(Statement::render(&sql, params, dialect, KeywordCase::Upper))
    }
}

//------------------------------------------------------------------------------
// SELECT COUNT(*)
//------------------------------------------------------------------------------

/// Starts a `SELECT COUNT(*)` over `E`.
pub fn count<E: Entity>() -> CountBuilder<E> {
    CountBuilder {
        filter: None,
        _entity: PhantomData,
    }
}

#[derive(Debug, Clone)]
pub struct CountBuilder<E> {
    filter: Option<Predicate<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> CountBuilder<E> {
    pub fn filter(mut self, predicate: Predicate<E>) -> Self {
        self.filter = and_filter(self.filter.take(), predicate);
        self
    }

    pub fn render(&self, dialect: Dialect) -> Result<Statement> {
        let mut params = ParameterSet::new();
        let mut sql = Sql::token(Token::SELECT)
            .append(Sql::func("COUNT", Sql::token(Token::STAR)))
            .push(Token::FROM)
            .push(SqlChunk::ident(E::TABLE));
        if let Some(filter) = &self.filter {
            sql.append_mut(where_clause(filter, dialect, &mut params)?);
        }
        Ok(Statement::render(&sql, params, dialect, KeywordCase::Upper))
    }
}
