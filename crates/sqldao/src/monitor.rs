//! SQL logging via `tracing`.
//!
//! Every statement the DAO executes is emitted at DEBUG under the
//! `sqldao.sql` target, before execution. The library never installs a
//! subscriber.

use crate::param::BoundQuery;
use std::fmt;

/// Default truncation for logged SQL, in bytes.
pub const MAX_LOGGED_SQL: usize = 200;

/// The DAO operation a statement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Count,
    Create,
    Get,
    List,
    Update,
    Delete,
    Exists,
    UpdateKey,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Count => "count",
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Exists => "exists",
            Operation::UpdateKey => "update_key",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

pub(crate) fn log_statement(operation: Operation, table: &str, query: &BoundQuery) {
    if !tracing::enabled!(target: "sqldao.sql", tracing::Level::DEBUG) {
        return;
    }
    let sql = if query.sql.len() > MAX_LOGGED_SQL {
        format!("{}...", truncate_sql_bytes(&query.sql, MAX_LOGGED_SQL))
    } else {
        query.sql.clone()
    };
    tracing::debug!(
        target: "sqldao.sql",
        operation = operation.as_str(),
        table,
        param_count = query.params.len(),
        sql = %sql,
    );
}
