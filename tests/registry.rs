use std::sync::Arc;
use std::thread;

use joinery::prelude::*;
use joinery::{StoredView, ViewRegistry};

use common::{Customer, Order, OrderReport, OrderSummary, RecordingConnection, Region};

mod common;

fn summary_over_customers() -> joinery::JoinDefinition {
    join::<OrderSummary>()
        .inner_join::<Order, Customer>()
        .on(Order::CUSTOMER_ID, Customer::ID)
        .unwrap()
        .finally()
}

fn summary_over_big_orders() -> joinery::JoinDefinition {
    join::<OrderSummary>()
        .inner_join::<Order, Customer>()
        .on(Order::CUSTOMER_ID, Customer::ID)
        .unwrap()
        .where_first(Order::TOTAL.gt(100.0))
        .unwrap()
        .finally()
}

fn summary_rows() -> Vec<Row> {
    vec![
        Row::from_iter([("Id", Value::Int64(1)), ("Name", Value::from("Ada"))]),
        Row::from_iter([("Id", Value::Int64(2)), ("Name", Value::from("Grace"))]),
    ]
}

#[test]
fn storing_twice_keeps_the_second_definition() {
    let registry = ViewRegistry::new(Dialect::Postgres);
    assert!(registry.store(summary_over_customers()).is_none());
    let replaced = registry.store(summary_over_big_orders());

    assert!(matches!(replaced, Some(StoredView::Join(_))));
    assert_eq!(registry.len(), 1);
    assert!(registry.render::<OrderSummary>().unwrap().sql.ends_with(r#"where a."Total" > @Total0"#));
}

#[test]
fn missing_view_is_an_error() {
    let registry = ViewRegistry::new(Dialect::Postgres);
    registry.store(summary_over_customers());

    let err = registry.render::<OrderReport>().unwrap_err();
    assert!(matches!(err, JoineryError::ViewNotFound { dto: "OrderReport" }));

    assert!(registry.remove::<OrderSummary>().is_some());
    assert!(!registry.contains::<OrderSummary>());
    assert!(registry.is_empty());
}

#[test]
fn clones_share_one_cache() {
    let registry = ViewRegistry::new(Dialect::MySql);
    let handle = registry.clone();
    handle.store(summary_over_customers());
    assert!(registry.contains::<OrderSummary>());

    let independent = ViewRegistry::new(Dialect::MySql);
    assert!(!independent.contains::<OrderSummary>());
}

#[tokio::test]
async fn execute_maps_rows_into_the_output_type() {
    let registry = ViewRegistry::new(Dialect::Postgres);
    registry.store(summary_over_big_orders());
    let conn = RecordingConnection::new(Dialect::Postgres, summary_rows());

    let summaries: Vec<OrderSummary> = registry.execute(&conn).await.unwrap();
    assert_eq!(
        summaries,
        [
            OrderSummary {
                id: 1,
                name: "Ada".into()
            },
            OrderSummary {
                id: 2,
                name: "Grace".into()
            },
        ]
    );
    assert_eq!(conn.statements().len(), 1);
    assert_eq!(conn.in_transaction(), [false]);
}

#[tokio::test]
async fn execute_in_passes_the_transaction_through() {
    let registry = ViewRegistry::new(Dialect::Postgres);
    registry.store(summary_over_customers());
    let conn = RecordingConnection::new(Dialect::Postgres, summary_rows());

    let mut tx = conn.begin().await.unwrap();
    let summaries: Vec<OrderSummary> = registry.execute_in(&conn, &mut tx).await.unwrap();
    conn.commit(tx).await.unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(conn.in_transaction(), [true]);
}

#[tokio::test]
async fn execute_without_a_view_never_reaches_the_connection() {
    let registry = ViewRegistry::new(Dialect::Postgres);
    let conn = RecordingConnection::new(Dialect::Postgres, summary_rows());

    let result: Result<Vec<OrderSummary>> = registry.execute(&conn).await;
    assert!(matches!(result, Err(JoineryError::ViewNotFound { .. })));
    assert!(conn.statements().is_empty());
}

#[tokio::test]
async fn execute_refuses_a_connection_of_another_dialect() {
    let registry = ViewRegistry::new(Dialect::Oracle);
    registry.store(summary_over_big_orders());
    let conn = RecordingConnection::new(Dialect::SqlLite, summary_rows());

    let result: Result<Vec<OrderSummary>> = registry.execute(&conn).await;
    assert!(matches!(result, Err(JoineryError::Execution(ref msg)) if msg.contains("oracle") && msg.contains("sqllite")));
    assert!(conn.statements().is_empty());
}

#[tokio::test]
async fn procedures_are_stored_like_views() {
    let registry = ViewRegistry::new(Dialect::SqlServer);
    registry.store_procedure::<OrderSummary>(
        ProcedureDescriptor::new("dbo.OrderSummaries").param("minTotal", 100.0),
    );
    let conn = RecordingConnection::new(Dialect::SqlServer, summary_rows());

    let summaries: Vec<OrderSummary> = registry.execute(&conn).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(conn.statements(), ["EXEC dbo.OrderSummaries @minTotal"]);
}

#[test]
fn readers_never_see_a_missing_entry_while_it_is_replaced() {
    let registry = ViewRegistry::new(Dialect::Postgres);
    registry.store(summary_over_customers());

    let writer = {
        let registry = registry.clone();
        thread::spawn(move || {
            for i in 0..200 {
                if i % 2 == 0 {
                    registry.store(summary_over_big_orders());
                } else {
                    registry.store(summary_over_customers());
                }
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    assert!(registry.render::<OrderSummary>().is_ok());
                    assert_eq!(registry.len(), 1);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn definitions_are_shared_not_copied() {
    let registry = ViewRegistry::new(Dialect::Postgres);
    registry.store(
        join::<OrderReport>()
            .inner_join::<Order, Customer>()
            .on(Order::CUSTOMER_ID, Customer::ID)
            .unwrap()
            .then()
            .inner_join::<Customer, Region>()
            .on(Customer::REGION_ID, Region::ID)
            .unwrap()
            .finally(),
    );

    let (Some(StoredView::Join(first)), Some(StoredView::Join(second))) = (
        registry.definition::<OrderReport>(),
        registry.definition::<OrderReport>(),
    ) else {
        panic!("expected a stored join");
    };
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.pairs().len(), 2);
}
