use core::marker::PhantomData;

use joinery_types::Dialect;

use super::{Statement, and_filter, where_clause};
use crate::error::Result;
use crate::expr::Predicate;
use crate::params::ParameterSet;
use crate::schema::Entity;
use crate::sql::{KeywordCase, Sql, SqlChunk, Token};

/// Starts a `DELETE` from `E`. Without a filter every row is deleted.
pub fn delete<E: Entity>() -> DeleteBuilder<E> {
    DeleteBuilder {
        filter: None,
        _entity: PhantomData,
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBuilder<E> {
    filter: Option<Predicate<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> DeleteBuilder<E> {
    pub fn filter(mut self, predicate: Predicate<E>) -> Self {
        self.filter = and_filter(self.filter.take(), predicate);
        self
    }

    pub fn render(&self, dialect: Dialect) -> Result<Statement> {
        let mut params = ParameterSet::new();
        let mut sql = Sql::from_iter([Token::DELETE, Token::FROM]).push(SqlChunk::ident(E::TABLE));
        if let Some(filter) = &self.filter {
            sql.append_mut(where_clause(filter, dialect, &mut params)?);
        }
        Ok(Statement::render(&sql, params, dialect, KeywordCase::Upper))
    }
}
