//! # sqldao
//!
//! Schema-driven data-access objects for a single relational table.
//!
//! Give it a table name, a column -> type mapping and a few policy choices
//! (primary key, key generation, delete strategy) and it synthesizes
//! parameterized SQL for count, create, read, update, delete, existence checks
//! and key renames.
//!
//! ## Features
//!
//! - **Bound values only**: SQL text is built from quoted schema identifiers;
//!   every caller-supplied value is a positional parameter
//! - **Validated up front**: configuration fails at construction, filters and
//!   order specs fail before any SQL runs
//! - **Soft delete**: optional deactivate column with active/inactive sentinels
//! - **Bring your own connection**: anything implementing [`Connection`];
//!   `rusqlite` is supported out of the box (`sqlite` feature)
//!
//! ## Example
//!
//! ```ignore
//! use sqldao::{ColumnSchema, ColumnType, Dao, DaoOptions, Filter, OrderBy, Record};
//!
//! let schema = ColumnSchema::new()
//!     .column("id", ColumnType::Integer)
//!     .column("name", ColumnType::Text);
//! let users = Dao::for_connection(&conn, "users", schema, DaoOptions::new("id"))?;
//!
//! let id = users.create(&conn, &Record::new().with("name", "alice"))?;
//! let rows = users.list_rows(
//!     &conn,
//!     Some(&[Filter::like("name", "a%")][..]),
//!     Some(&[OrderBy::desc("id")][..]),
//! )?;
//! ```

pub mod client;
pub mod condition;
pub mod config;
pub mod dao;
pub mod error;
pub mod ident;
pub mod listing;
pub mod monitor;
pub mod order;
pub mod param;
pub mod schema;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use client::{Connection, PreparedStatement};
pub use condition::{Filter, Op, compile_filters};
pub use config::{ACTIVE, Config, DaoOptions, DeleteMethod, DeleteStrategy, INACTIVE};
pub use dao::Dao;
pub use error::{Clause, DaoError, DaoResult};
pub use ident::Dialect;
pub use listing::{KeyedRecords, Listing};
pub use monitor::Operation;
pub use order::{Direction, OrderBy, compile_order_by};
pub use param::{BoundQuery, Param, ParamList};
pub use schema::{ColumnSchema, ColumnType};
pub use value::{Record, Value};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStatement;
