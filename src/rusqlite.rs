//! [`Connection`] over an embedded SQLite database via `rusqlite`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use joinery_core::{JoineryError, Result, Row, Statement, joinery_trace_query, joinery_trace_tx};
use joinery_types::{DATETIME_FORMAT, Dialect, Value};

use crate::config::Config;
use crate::connection::Connection;

type Shared = Arc<Mutex<::rusqlite::Connection>>;

fn lock(conn: &Shared) -> MutexGuard<'_, ::rusqlite::Connection> {
    conn.lock().unwrap_or_else(PoisonError::into_inner)
}

/// SQLite connection. Statements must be rendered with [`Dialect::SqlLite`];
/// `@name` placeholders are native SQLite named parameters.
#[derive(Debug, Clone)]
pub struct RusqliteConnection {
    conn: Shared,
}

/// An open `BEGIN ... COMMIT` block. Dropped without commit it rolls back.
#[derive(Debug)]
pub struct RusqliteTransaction {
    conn: Shared,
    finished: bool,
}

impl RusqliteTransaction {
    // A failed COMMIT leaves the transaction open; `finished` stays false so
    // that drop rolls it back.
    fn finish(mut self, sql: &str) -> Result<()> {
        lock(&self.conn)
            .execute_batch(sql)
            .map_err(|e| JoineryError::Transaction(e.to_string()))?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for RusqliteTransaction {
    fn drop(&mut self) {
        if !self.finished {
            let _ = lock(&self.conn).execute_batch("ROLLBACK");
        }
    }
}

impl RusqliteConnection {
    pub fn new(conn: ::rusqlite::Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(::rusqlite::Connection::open_in_memory()?))
    }

    /// Opens `config.connection.url` (`:memory:` or empty for an in-memory
    /// database) and applies the configured busy timeout.
    pub fn open(config: &Config) -> Result<Self> {
        if config.dialect != Dialect::SqlLite {
            return Err(JoineryError::Execution(format!(
                "rusqlite cannot serve the {} dialect",
                config.dialect
            )));
        }
        let conn = match config.connection.url.as_str() {
            "" | ":memory:" => ::rusqlite::Connection::open_in_memory()?,
            path => ::rusqlite::Connection::open(path)?,
        };
        if let Some(timeout) = config.timeout() {
            conn.busy_timeout(timeout)?;
        }
        Ok(Self::new(conn))
    }

    /// Runs a batch of SQL without parameters, e.g. schema setup.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        lock(&self.conn).execute_batch(sql)?;
        Ok(())
    }

    fn prepare<'c>(
        conn: &'c ::rusqlite::Connection,
        statement: &Statement,
    ) -> Result<::rusqlite::Statement<'c>> {
        joinery_trace_query!(&statement.sql, statement.params.len());
        let mut stmt = conn.prepare(&statement.sql)?;
        for param in &statement.params {
            let name = format!("@{}", param.name);
            let index = stmt
                .parameter_index(&name)?
                .ok_or_else(|| JoineryError::Execution(format!("statement has no parameter `{name}`")))?;
            stmt.raw_bind_parameter(index, to_sqlite(&param.value))?;
        }
        Ok(stmt)
    }
}

fn to_sqlite(value: &Value) -> ::rusqlite::types::Value {
    use ::rusqlite::types::Value as Sqlite;
    match value {
        Value::Null => Sqlite::Null,
        Value::Bool(v) => Sqlite::Integer(i64::from(*v)),
        Value::Int32(v) => Sqlite::Integer(i64::from(*v)),
        Value::Int64(v) => Sqlite::Integer(*v),
        Value::Single(v) => Sqlite::Real(f64::from(*v)),
        Value::Double(v) => Sqlite::Real(*v),
        Value::Decimal(v) => Sqlite::Text(v.to_string()),
        Value::String(v) => Sqlite::Text(v.clone()),
        Value::Guid(v) => Sqlite::Text(v.hyphenated().to_string()),
        Value::DateTime(v) => Sqlite::Text(v.format(DATETIME_FORMAT).to_string()),
        Value::Bytes(v) => Sqlite::Blob(v.clone()),
    }
}

fn from_sqlite(value: ::rusqlite::types::ValueRef<'_>) -> Value {
    use ::rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int64(v),
        ValueRef::Real(v) => Value::Double(v),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    }
}

impl Connection for RusqliteConnection {
    type Transaction = RusqliteTransaction;

    fn dialect(&self) -> Dialect {
        Dialect::SqlLite
    }

    async fn query(&self, statement: &Statement, _tx: Option<&mut RusqliteTransaction>) -> Result<Vec<Row>> {
        let conn = lock(&self.conn);
        let mut stmt = Self::prepare(&conn, statement)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.raw_query();
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Row::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                values.push(name.clone(), from_sqlite(row.get_ref(i)?));
            }
            out.push(values);
        }
        Ok(out)
    }

    async fn execute(&self, statement: &Statement, _tx: Option<&mut RusqliteTransaction>) -> Result<u64> {
        let conn = lock(&self.conn);
        let mut stmt = Self::prepare(&conn, statement)?;
        Ok(stmt.raw_execute()? as u64)
    }

    async fn begin(&self) -> Result<RusqliteTransaction> {
        joinery_trace_tx!("begin", "sqlite.rusqlite");
        lock(&self.conn)
            .execute_batch("BEGIN")
            .map_err(|e| JoineryError::Transaction(e.to_string()))?;
        Ok(RusqliteTransaction {
            conn: Arc::clone(&self.conn),
            finished: false,
        })
    }

    async fn commit(&self, tx: RusqliteTransaction) -> Result<()> {
        joinery_trace_tx!("commit", "sqlite.rusqlite");
        tx.finish("COMMIT")
    }

    async fn rollback(&self, tx: RusqliteTransaction) -> Result<()> {
        joinery_trace_tx!("rollback", "sqlite.rusqlite");
        tx.finish("ROLLBACK")
    }
}
