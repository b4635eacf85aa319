//! Shared entities and a recording connection.

#![allow(dead_code)]

use std::sync::Mutex;

use joinery::prelude::*;

entity! {
    pub struct Person as "Person" {
        pub id: i32 => "Id",
        pub age: i32 => "Age",
        pub name: String => "Name",
        pub country: String => "Country",
        pub active: bool => "Active",
        pub score: Option<f64> => "Score",
    }
}

entity! {
    pub struct Order as "Order" {
        pub id: i32 => "Id",
        pub customer_id: i32 => "CustomerId",
        pub total: f64 => "Total",
        pub status: String => "Status",
        pub placed: NaiveDateTime => "Placed",
    }
}

entity! {
    pub struct Customer as "Customer" {
        pub id: i32 => "Id",
        pub name: String => "Name",
        pub region_id: i32 => "RegionId",
    }
}

entity! {
    pub struct Region as "Region" {
        pub id: i32 => "Id",
        pub label: String => "Label",
    }
}

entity! {
    pub struct OrderSummary {
        pub id: i32 => "Id",
        pub name: String => "Name",
    }
}

entity! {
    pub struct OrderReport {
        pub id: i32 => "Id",
        pub name: String => "Name",
        pub total: String => "Total",
        pub label: String => "Label",
    }
}

/// Returns canned rows and records every statement it is handed.
#[derive(Debug)]
pub struct RecordingConnection {
    pub dialect: Dialect,
    pub rows: Vec<Row>,
    pub seen: Mutex<Vec<(String, bool)>>,
}

impl RecordingConnection {
    pub fn new(dialect: Dialect, rows: Vec<Row>) -> Self {
        Self {
            dialect,
            rows,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn statements(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|(sql, _)| sql.clone()).collect()
    }

    /// Whether each recorded statement ran inside a transaction.
    pub fn in_transaction(&self) -> Vec<bool> {
        self.seen.lock().unwrap().iter().map(|&(_, tx)| tx).collect()
    }
}

/// Transaction handle of [`RecordingConnection`]; counts statements run in it.
#[derive(Debug, Default)]
pub struct RecordingTx {
    pub statements: usize,
}

impl Connection for RecordingConnection {
    type Transaction = RecordingTx;

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn query(&self, statement: &Statement, tx: Option<&mut RecordingTx>) -> Result<Vec<Row>> {
        let in_tx = match tx {
            Some(tx) => {
                tx.statements += 1;
                true
            }
            None => false,
        };
        self.seen.lock().unwrap().push((statement.sql.clone(), in_tx));
        Ok(self.rows.clone())
    }

    async fn execute(&self, statement: &Statement, tx: Option<&mut RecordingTx>) -> Result<u64> {
        self.query(statement, tx).await.map(|rows| rows.len() as u64)
    }

    async fn begin(&self) -> Result<RecordingTx> {
        Ok(RecordingTx::default())
    }

    async fn commit(&self, _tx: RecordingTx) -> Result<()> {
        Ok(())
    }

    async fn rollback(&self, _tx: RecordingTx) -> Result<()> {
        Ok(())
    }
}
