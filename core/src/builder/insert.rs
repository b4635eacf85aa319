use core::marker::PhantomData;

use joinery_types::{Dialect, Value};

use super::Statement;
use crate::error::{JoineryError, Result};
use crate::params::ParameterSet;
use crate::schema::{Entity, IntoValues};
use crate::sql::{KeywordCase, Sql, SqlChunk, Token};

/// Starts an `INSERT` of one entity value.
pub fn insert<E: Entity + IntoValues>(entity: E) -> InsertBuilder<E> {
    InsertBuilder {
        values: entity.into_values(),
        _entity: PhantomData,
    }
}

/// Builds `INSERT INTO <table> (<columns>) VALUES (<params>)`.
#[derive(Debug, Clone)]
pub struct InsertBuilder<E> {
    values: Vec<(&'static str, Value)>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> InsertBuilder<E> {
    /// Leaves `column` out of the statement, e.g. a database-generated key.
    pub fn skip(mut self, column: &str) -> Self {
        self.values.retain(|(name, _)| *name != column);
        self
    }

    pub fn render(&self, dialect: Dialect) -> Result<Statement> {
        if self.values.is_empty() {
            return Err(JoineryError::InvalidStatement("INSERT without columns"));
        }

        let mut params = ParameterSet::new();
        let columns = self
            .values
            .iter()
            .map(|(name, _)| Sql::from(SqlChunk::column(None, *name)));
        let placeholders: Vec<_> = self
            .values
            .iter()
            .map(|(name, value)| Sql::from(SqlChunk::Param(params.allocate(name, value.clone()))))
            .collect();

        let sql = Sql::from_iter([Token::INSERT, Token::INTO])
            .push(SqlChunk::ident(E::TABLE))
            .append(Sql::join(columns, Token::COMMA).parens())
            .push(Token::VALUES)
            .append(Sql::join(placeholders, Token::COMMA).parens());

        Ok(Statement::render(&sql, params, dialect, KeywordCase::Upper))
    }
}
