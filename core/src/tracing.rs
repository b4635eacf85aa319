//! Tracing utilities for query, transaction and view-registry observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// joinery_trace_query!(&statement.sql, statement.params.len());
/// ```
#[macro_export]
macro_rules! joinery_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "joinery.query");
    };
}

/// Emit an info-level tracing event for transaction lifecycle (begin, commit, rollback).
///
/// ```ignore
/// joinery_trace_tx!("begin", "sqlite.rusqlite");
/// ```
#[macro_export]
macro_rules! joinery_trace_tx {
    ($event:literal, $driver:literal) => {
        #[cfg(feature = "tracing")]
        tracing::info!(event = $event, driver = $driver, "joinery.transaction");
    };
}

/// Emit a debug-level event when a projection binding is rejected.
///
/// Rejected casts are otherwise silent, so this is the only place they show up.
#[macro_export]
macro_rules! joinery_trace_binding {
    ($property:expr, $reason:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(property = %$property, reason = %$reason, "joinery.binding");
    };
}

/// Emit a debug-level event for view registry store, replace and miss.
#[macro_export]
macro_rules! joinery_trace_view {
    ($event:literal, $dto:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(event = $event, dto = %$dto, "joinery.view");
    };
}
