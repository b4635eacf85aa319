//! # Joinery
//!
//! A typed predicate compiler and join-view engine. Filters are written as
//! typed expressions over declared entities, compiled into a linear node
//! list, and rendered as parameterized SQL for SQL Server, MySQL, Postgres,
//! SQLite or Oracle. Multi-table joins are assembled by a pipeline that
//! assigns table aliases, accumulates join predicates and binds the
//! properties of an output type; the result can be cached in a
//! [`ViewRegistry`] and executed repeatedly.
//!
//! ## Quick Start
//!
//! ```rust
//! use joinery::prelude::*;
//!
//! entity! {
//!     pub struct Order as "Order" {
//!         pub id: i32 => "Id",
//!         pub customer_id: i32 => "CustomerId",
//!         pub total: f64 => "Total",
//!     }
//! }
//!
//! entity! {
//!     pub struct Customer as "Customer" {
//!         pub id: i32 => "Id",
//!         pub name: String => "Name",
//!     }
//! }
//!
//! entity! {
//!     pub struct OrderSummary {
//!         pub id: i32 => "Id",
//!         pub name: String => "Name",
//!     }
//! }
//!
//! # fn main() -> joinery::Result<()> {
//! let statement = select::<Order>()
//!     .filter(Order::TOTAL.gt(100.0) & Order::CUSTOMER_ID.eq(7))
//!     .render(Dialect::SqlServer)?;
//! assert_eq!(
//!     statement.sql,
//!     "SELECT [Id], [CustomerId], [Total] FROM [Order] WHERE [Total] > @Total0 AND [CustomerId] = @CustomerId1"
//! );
//!
//! let registry = ViewRegistry::new(Dialect::Postgres);
//! registry.store(
//!     join::<OrderSummary>()
//!         .inner_join::<Order, Customer>()
//!         .on(Order::CUSTOMER_ID, Customer::ID)?
//!         .where_first(Order::TOTAL.gt(100.0))?
//!         .finally(),
//! );
//! assert_eq!(
//!     registry.render::<OrderSummary>()?.sql,
//!     r#"select a."Id" as "Id", b."Name" as "Name" from "Order" a inner join "Customer" b on b."Id" = a."CustomerId" where a."Total" > @Total0"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature     | Enables |
//! |-------------|---------|
//! | `rusqlite`  | [`rusqlite::RusqliteConnection`], an SQLite [`Connection`] |
//! | `tracing`   | `tracing` events for queries, transactions, bindings and the view registry |
//! | `profiling` | `puffin` scopes around compilation and rendering |

pub mod config;
pub mod connection;
pub mod procedure;
pub mod registry;

#[cfg(feature = "rusqlite")]
pub mod rusqlite;

pub use joinery_core::*;

pub use config::{Config, ConfigError, ConnectionConfig};
pub use connection::Connection;
pub use procedure::ProcedureDescriptor;
pub use registry::{StoredView, ViewRegistry};

/// Everything needed to declare entities, build predicates and joins, and
/// run them.
pub mod prelude {
    pub use joinery_core::entity;
    pub use joinery_core::expr::{and_all, average, not, or_any};
    pub use joinery_core::{
        Column, Entity, FromRow, IntoValues, JoineryError, OrderBy, Predicate, Result, Row,
        Scalar, Statement, count, delete, insert, join, select, update,
    };
    pub use joinery_types::{Decimal, Dialect, NaiveDateTime, Uuid, Value};

    pub use crate::config::Config;
    pub use crate::connection::Connection;
    pub use crate::procedure::ProcedureDescriptor;
    pub use crate::registry::ViewRegistry;

    #[cfg(feature = "rusqlite")]
    pub use crate::rusqlite::RusqliteConnection;
}
