//! The connection/transaction collaborator.
//!
//! The compiler never talks to a database. Drivers implement [`Connection`]
//! and receive finished [`Statement`]s; the transaction handle is whatever
//! the driver needs and is passed through untouched.

use joinery_core::{FromRow, Result, Row, Statement};
use joinery_types::Dialect;

#[allow(async_fn_in_trait)]
pub trait Connection {
    /// Driver-specific transaction handle.
    type Transaction;

    /// Dialect statements for this connection must be rendered in.
    fn dialect(&self) -> Dialect;

    /// Runs a row-returning statement.
    async fn query(&self, statement: &Statement, tx: Option<&mut Self::Transaction>) -> Result<Vec<Row>>;

    /// Runs a statement and returns the number of affected rows.
    async fn execute(&self, statement: &Statement, tx: Option<&mut Self::Transaction>) -> Result<u64>;

    async fn begin(&self) -> Result<Self::Transaction>;

    async fn commit(&self, tx: Self::Transaction) -> Result<()>;

    async fn rollback(&self, tx: Self::Transaction) -> Result<()>;

    /// Runs `statement` and maps every row into `T`.
    async fn fetch<T: FromRow>(&self, statement: &Statement, tx: Option<&mut Self::Transaction>) -> Result<Vec<T>> {
        self.query(statement, tx)
            .await?
            .iter()
            .map(T::from_row)
            .collect()
    }
}
