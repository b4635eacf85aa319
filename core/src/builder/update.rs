use core::marker::PhantomData;

use joinery_types::{Dialect, SqlField, Value};

use super::{Statement, and_filter, where_clause};
use crate::error::{JoineryError, Result};
use crate::expr::{Column, Predicate};
use crate::params::ParameterSet;
use crate::schema::Entity;
use crate::sql::{KeywordCase, Sql, SqlChunk, Token};

/// Starts an `UPDATE` of `E`.
pub fn update<E: Entity>() -> UpdateBuilder<E> {
    UpdateBuilder {
        assignments: Vec::new(),
        filter: None,
        _entity: PhantomData,
    }
}

/// Builds `UPDATE <table> SET col = @p, ... [WHERE ...]`.
///
/// SET parameters are allocated before WHERE parameters, so names follow
/// the order they appear in the text.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<E> {
    assignments: Vec<(&'static str, Value)>,
    filter: Option<Predicate<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> UpdateBuilder<E> {
    pub fn set<T: SqlField>(mut self, column: Column<E, T>, value: impl Into<T>) -> Self {
        self.assignments.push((column.name(), T::into_value(value.into())));
        self
    }

    pub fn filter(mut self, predicate: Predicate<E>) -> Self {
        self.filter = and_filter(self.filter.take(), predicate);
        self
    }

    pub fn render(&self, dialect: Dialect) -> Result<Statement> {
        if self.assignments.is_empty() {
            return Err(JoineryError::InvalidStatement("UPDATE without SET"));
        }

        let mut params = ParameterSet::new();
        let assignments: Vec<_> = self
            .assignments
            .iter()
            .map(|(name, value)| {
                Sql::from(SqlChunk::column(None, *name))
                    .push(Token::EQ)
                    .push(SqlChunk::Param(params.allocate(name, value.clone())))
            })
            .collect();

        let mut sql = Sql::token(Token::UPDATE)
            .push(SqlChunk::ident(E::TABLE))
            .push(Token::SET)
            .append(Sql::join(assignments, Token::COMMA));
        if let Some(filter) = &self.filter {
            sql.append_mut(where_clause(filter, dialect, &mut params)?);
        }
        Ok(Statement::render(&sql, params, dialect, KeywordCase::Upper))
    }
}
