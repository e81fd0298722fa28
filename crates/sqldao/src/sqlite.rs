//! [`Connection`] adapter for `rusqlite`.
//!
//! Enabled by the `sqlite` feature (on by default).
//!
//! ```ignore
//! let conn = rusqlite::Connection::open_in_memory()?;
//! let dao = Dao::for_connection(&conn, "users", schema, DaoOptions::new("id"))?;
//! let id = dao.create(&conn, &Record::new().with("name", "x"))?;
//! ```

use crate::client::{Connection, PreparedStatement};
use crate::error::DaoResult;
use crate::schema::ColumnType;
use crate::value::{Record, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use std::collections::VecDeque;

impl Connection for rusqlite::Connection {
    type Statement<'c> = SqliteStatement<'c>;

    fn dialect_name(&self) -> &str {
        "sqlite"
    }

    fn prepare(&self, sql: &str) -> DaoResult<Self::Statement<'_>> {
        Ok(SqliteStatement {
            stmt: rusqlite::Connection::prepare(self, sql)?,
            rows: VecDeque::new(),
        })
    }

    fn last_generated_key(&self) -> DaoResult<Value> {
        Ok(Value::Integer(self.last_insert_rowid()))
    }
}

/// A prepared SQLite statement.
///
/// Read-only statements collect their whole result set on `execute`, and
/// `fetch_row` hands the rows out in order.
pub struct SqliteStatement<'c> {
    stmt: rusqlite::Statement<'c>,
    rows: VecDeque<Record>,
}

impl PreparedStatement for SqliteStatement<'_> {
    fn bind(&mut self, position: usize, value: &Value, ty: ColumnType) -> DaoResult<()> {
        self.stmt
            .raw_bind_parameter(position, to_sql_value(ty.coerce(value)))?;
        Ok(())
    }

    fn execute(&mut self) -> DaoResult<()> {
        self.rows.clear();
        if !self.stmt.readonly() {
            self.stmt.raw_execute()?;
            return Ok(());
        }

        let names: Vec<String> = self
            .stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let mut rows = self.stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut record = Record::new();
            for (idx, name) in names.iter().enumerate() {
                record.insert(name.as_str(), from_value_ref(row.get_ref(idx)?));
            }
            self.rows.push_back(record);
        }
        Ok(())
    }

    fn fetch_row(&mut self) -> DaoResult<Option<Record>> {
        Ok(self.rows.pop_front())
    }
}

fn to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(b)),
        Value::Integer(i) => SqlValue::Integer(i),
        Value::Real(r) => SqlValue::Real(r),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_rows_are_buffered_in_order() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO t (name) VALUES ('a'), ('b');",
        )
        .unwrap();

        let mut stmt = Connection::prepare(&conn, "SELECT id, name FROM t WHERE id >= ? ORDER BY id")
            .unwrap();
        stmt.bind(1, &Value::Text("1".into()), ColumnType::Integer).unwrap();
        stmt.execute().unwrap();

        let first = stmt.fetch_row().unwrap().unwrap();
        assert_eq!(first.get("id"), Some(&Value::Integer(1)));
        assert_eq!(first.get("name"), Some(&Value::Text("a".into())));
        let second = stmt.fetch_row().unwrap().unwrap();
        assert_eq!(second.get("name"), Some(&Value::Text("b".into())));
        assert!(stmt.fetch_row().unwrap().is_none());
    }

    #[test]
    fn insert_reports_rowid() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);")
            .unwrap();
        {
            let mut stmt = Connection::prepare(&conn, r#"INSERT INTO "t"("name") VALUES(?)"#).unwrap();
            stmt.bind(1, &Value::from("x"), ColumnType::Text).unwrap();
            stmt.execute().unwrap();
            assert!(stmt.fetch_row().unwrap().is_none());
        }
        assert_eq!(conn.last_generated_key().unwrap(), Value::Integer(1));
        assert_eq!(conn.dialect_name(), "sqlite");
    }
}
