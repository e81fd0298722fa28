//! Connection abstraction the DAO executes through.
//!
//! sqldao never opens connections. Callers hand in anything implementing
//! [`Connection`] for the duration of one call; the trait exposes just the
//! prepare / bind / execute / fetch primitives the DAO needs.
//!
//! Connections are not assumed to be shareable across concurrent operations,
//! so callers sharing one must serialize access themselves.

use crate::error::DaoResult;
use crate::schema::ColumnType;
use crate::value::{Record, Value};

/// A database connection or session.
pub trait Connection {
    /// Prepared statement handle, borrowing the connection.
    type Statement<'c>: PreparedStatement
    where
        Self: 'c;

    /// Driver name, used only to pick the identifier quoting style
    /// (e.g. `sqlite`, `pgsql`, `mysql`).
    fn dialect_name(&self) -> &str;

    /// Prepare `sql` for binding and execution.
    fn prepare(&self, sql: &str) -> DaoResult<Self::Statement<'_>>;

    /// Key generated by the most recent insert on this connection.
    fn last_generated_key(&self) -> DaoResult<Value>;
}

/// A prepared statement with `?` positional placeholders.
pub trait PreparedStatement {
    /// Bind `value` to the 1-based `position`, as the declared column type.
    fn bind(&mut self, position: usize, value: &Value, ty: ColumnType) -> DaoResult<()>;

    /// Execute with the values bound so far.
    fn execute(&mut self) -> DaoResult<()>;

    /// Next result row, or `None` once the result set is exhausted.
    fn fetch_row(&mut self) -> DaoResult<Option<Record>>;
}
