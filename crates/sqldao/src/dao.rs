//! Table data-access object.
//!
//! A [`Dao`] is built once from a table name, a [`ColumnSchema`] and
//! [`DaoOptions`], and is immutable afterwards. Every operation is
//! self-contained: compile clauses, prepare one statement on the caller's
//! connection, bind, execute, read, return.
//!
//! SQL text is assembled only from quoted schema identifiers and keywords;
//! caller-supplied values always travel as bound parameters.
//!
//! # Example
//! ```ignore
//! use sqldao::{ColumnSchema, ColumnType, Dao, DaoOptions, DeleteMethod, Filter, Record};
//!
//! let schema = ColumnSchema::new()
//!     .column("id", ColumnType::Integer)
//!     .column("name", ColumnType::Text)
//!     .column("active", ColumnType::Text);
//! let options = DaoOptions::new("id")
//!     .delete_method(DeleteMethod::Deactivate)
//!     .deactivate_column("active");
//! let users = Dao::for_connection(&conn, "users", schema, options)?;
//!
//! let id = users.create(&conn, &Record::new().with("name", "alice"))?;
//! let alice = users.get(&conn, id.clone())?;
//! users.delete(&conn, id.clone())?;
//! assert!(!users.exists(&conn, id)?);
//! ```

use crate::client::{Connection, PreparedStatement};
use crate::condition::{Filter, compile_filters};
use crate::config::{
    ACTIVE, Config, DaoOptions, DeleteStrategy, INACTIVE, sentinel_literal, sentinel_value,
};
use crate::error::{DaoError, DaoResult};
use crate::ident::Dialect;
use crate::listing::{KeyedRecords, Listing};
use crate::monitor::{Operation, log_statement};
use crate::order::{OrderBy, compile_order_by};
use crate::param::{BoundQuery, ParamList};
use crate::schema::ColumnSchema;
use crate::value::{Record, Value};

/// CRUD operations over one table.
#[derive(Debug, Clone)]
pub struct Dao {
    table: String,
    schema: ColumnSchema,
    config: Config,
    dialect: Dialect,
}

impl Dao {
    /// Validate the configuration and build the DAO for an explicit dialect.
    pub fn new(
        table: impl Into<String>,
        schema: ColumnSchema,
        options: DaoOptions,
        dialect: Dialect,
    ) -> DaoResult<Self> {
        let table = table.into();
        if table.is_empty() {
            return Err(DaoError::configuration("table name is required"));
        }
        let config = Config::validate(&schema, options)?;
        Ok(Self {
            table,
            schema,
            config,
            dialect,
        })
    }

    /// Like [`Dao::new`], resolving the dialect once from the connection's driver name.
    pub fn for_connection<C: Connection>(
        conn: &C,
        table: impl Into<String>,
        schema: ColumnSchema,
        options: DaoOptions,
    ) -> DaoResult<Self> {
        Self::new(
            table,
            schema,
            options,
            Dialect::from_driver_name(conn.dialect_name()),
        )
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Quote an identifier for this DAO's dialect.
    pub fn escape(&self, name: &str) -> String {
        self.dialect.escape(name)
    }

    /// Compile filters into a WHERE clause; see [`compile_filters`].
    pub fn compile_filters(&self, filters: Option<&[Filter]>) -> DaoResult<BoundQuery> {
        compile_filters(filters, &self.schema, &self.config, self.dialect)
    }

    /// Compile order specifications into an ORDER BY clause; see [`compile_order_by`].
    pub fn compile_order_by(&self, order: Option<&[OrderBy]>) -> DaoResult<String> {
        compile_order_by(order, &self.schema, self.dialect)
    }

    // ==================== Statement builders ====================

    /// `SELECT count(*) FROM <table> [WHERE ...]`
    pub fn count_query(&self, filters: Option<&[Filter]>) -> DaoResult<BoundQuery> {
        let where_clause = self.compile_filters(filters)?;
        let mut sql = format!("SELECT count(*) FROM {}", self.escape(&self.table));
        push_clause(&mut sql, &where_clause.sql);
        Ok(BoundQuery::new(sql, where_clause.params))
    }

    /// `INSERT INTO <table>(cols) VALUES(?, ...)`, or a no-column insert for
    /// an empty record.
    ///
    /// Columns follow schema order. The key column is skipped when it is
    /// autogenerated, even if the record carries a value for it.
    pub fn create_query(&self, record: &Record) -> DaoResult<BoundQuery> {
        let key = self.config.key();
        let autogenerated = self.config.key_is_autogenerated();
        if !autogenerated && !has_value(record, key) {
            return Err(DaoError::missing_key(key, "create"));
        }

        let mut columns = Vec::new();
        let mut params = ParamList::new();
        for (name, ty) in self.schema.iter() {
            if autogenerated && name == key {
                continue;
            }
            if let Some(value) = record.get(name) {
                columns.push(self.escape(name));
                params.push(value.clone(), ty);
            }
        }

        let table = self.escape(&self.table);
        if columns.is_empty() && self.dialect.supports_default_values() {
            return Ok(BoundQuery::new(
                format!("INSERT INTO {table} DEFAULT VALUES"),
                params,
            ));
        }

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table}({}) VALUES({placeholders})",
            columns.join(", ")
        );
        Ok(BoundQuery::new(sql, params))
    }

    /// `SELECT * FROM <table> WHERE <key> = ?`
    pub fn get_query(&self, key: Value) -> BoundQuery {
        let mut params = ParamList::new();
        params.push(key, self.config.key_type());
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?",
            self.escape(&self.table),
            self.escape(self.config.key())
        );
        BoundQuery::new(sql, params)
    }

    /// `SELECT * FROM <table> [WHERE ...] [ORDER BY ...]`
    pub fn list_query(
        &self,
        filters: Option<&[Filter]>,
        order: Option<&[OrderBy]>,
    ) -> DaoResult<BoundQuery> {
        let where_clause = self.compile_filters(filters)?;
        let order_clause = self.compile_order_by(order)?;
        let mut sql = format!("SELECT * FROM {}", self.escape(&self.table));
        push_clause(&mut sql, &where_clause.sql);
        push_clause(&mut sql, &order_clause);
        Ok(BoundQuery::new(sql, where_clause.params))
    }

    /// `UPDATE <table> SET col = ?, ... WHERE <key> = ?`
    ///
    /// Only fields present in `record` are set; the key is bound last.
    pub fn update_query(&self, record: &Record) -> DaoResult<BoundQuery> {
        let key = self.config.key();
        let key_value = match record.get(key) {
            Some(v) if !v.is_null() => v.clone(),
            _ => return Err(DaoError::missing_key(key, "update")),
        };

        let mut assignments = Vec::new();
        let mut params = ParamList::new();
        for (name, ty) in self.schema.iter() {
            if name == key {
                continue;
            }
            if let Some(value) = record.get(name) {
                assignments.push(format!("{} = ?", self.escape(name)));
                params.push(value.clone(), ty);
            }
        }
        if assignments.is_empty() {
            return Err(DaoError::validation(format!(
                "update of '{}' has no columns to set",
                self.table
            )));
        }
        params.push(key_value, self.config.key_type());

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.escape(&self.table),
            assignments.join(", "),
            self.escape(key)
        );
        Ok(BoundQuery::new(sql, params))
    }

    /// `DELETE FROM ...` or, with soft delete, `UPDATE ... SET <column> = <inactive>`.
    pub fn delete_query(&self, key: Value) -> BoundQuery {
        let mut params = ParamList::new();
        params.push(key, self.config.key_type());
        let table = self.escape(&self.table);
        let key_column = self.escape(self.config.key());
        let sql = match self.config.delete_strategy() {
            DeleteStrategy::Delete => format!("DELETE FROM {table} WHERE {key_column} = ?"),
            DeleteStrategy::Deactivate {
                column,
                column_type,
            } => format!(
                "UPDATE {table} SET {} = {} WHERE {key_column} = ?",
                self.escape(column),
                sentinel_literal(*column_type, INACTIVE)
            ),
        };
        BoundQuery::new(sql, params)
    }

    /// `UPDATE <table> SET <key> = ? WHERE <key> = ?`, new key bound first.
    pub fn update_key_query(&self, old_key: Value, new_key: Value) -> BoundQuery {
        let key_type = self.config.key_type();
        let mut params = ParamList::new();
        params.push(new_key, key_type);
        params.push(old_key, key_type);
        let key_column = self.escape(self.config.key());
        let sql = format!(
            "UPDATE {} SET {key_column} = ? WHERE {key_column} = ?",
            self.escape(&self.table)
        );
        BoundQuery::new(sql, params)
    }

    /// Filters `exists` counts with: key equality, plus the active flag when
    /// soft delete is configured.
    pub fn exists_filters(&self, key: Value) -> Vec<Filter> {
        let mut filters = vec![Filter::eq(self.config.key(), key)];
        if let Some((column, column_type)) = self.config.deactivate_column() {
            filters.push(Filter::eq(column, sentinel_value(column_type, ACTIVE)));
        }
        filters
    }

    // ==================== Operations ====================

    /// Count rows matching `filters`.
    pub fn count<C: Connection>(&self, conn: &C, filters: Option<&[Filter]>) -> DaoResult<i64> {
        let query = self.count_query(filters)?;
        self.fetch_count(conn, Operation::Count, &query)
    }

    /// Insert `record` and return its key: the generated one when the key is
    /// autogenerated, otherwise the supplied one.
    pub fn create<C: Connection>(&self, conn: &C, record: &Record) -> DaoResult<Value> {
        let query = self.create_query(record)?;
        self.run(conn, Operation::Create, &query)?;
        if self.config.key_is_autogenerated() {
            conn.last_generated_key()
        } else {
            Ok(record.get(self.config.key()).cloned().unwrap_or_default())
        }
    }

    /// Fetch the row with `key`, or `None` if there is none.
    pub fn get<C: Connection>(&self, conn: &C, key: impl Into<Value>) -> DaoResult<Option<Record>> {
        let query = self.get_query(key.into());
        let mut stmt = self.run(conn, Operation::Get, &query)?;
        stmt.fetch_row()
    }

    /// List rows matching `filters` in `order`.
    ///
    /// With `keyed`, rows are returned keyed by their key-column value;
    /// otherwise as a plain sequence in query order.
    pub fn list<C: Connection>(
        &self,
        conn: &C,
        keyed: bool,
        filters: Option<&[Filter]>,
        order: Option<&[OrderBy]>,
    ) -> DaoResult<Listing> {
        let query = self.list_query(filters, order)?;
        let mut stmt = self.run(conn, Operation::List, &query)?;

        if keyed {
            let key = self.config.key();
            let mut rows = KeyedRecords::new();
            while let Some(record) = stmt.fetch_row()? {
                let key_value = record.get(key).cloned().unwrap_or_default();
                rows.insert(key_value, record);
            }
            Ok(Listing::Keyed(rows))
        } else {
            let mut rows = Vec::new();
            while let Some(record) = stmt.fetch_row()? {
                rows.push(record);
            }
            Ok(Listing::Rows(rows))
        }
    }

    /// [`Dao::list`] as a plain sequence.
    pub fn list_rows<C: Connection>(
        &self,
        conn: &C,
        filters: Option<&[Filter]>,
        order: Option<&[OrderBy]>,
    ) -> DaoResult<Vec<Record>> {
        Ok(self.list(conn, false, filters, order)?.into_rows())
    }

    /// [`Dao::list`] keyed by key-column value.
    pub fn list_keyed<C: Connection>(
        &self,
        conn: &C,
        filters: Option<&[Filter]>,
        order: Option<&[OrderBy]>,
    ) -> DaoResult<KeyedRecords> {
        Ok(self
            .list(conn, true, filters, order)?
            .into_keyed()
            .unwrap_or_default())
    }

    /// Update the fields present in `record` on the row named by its key.
    pub fn update<C: Connection>(&self, conn: &C, record: &Record) -> DaoResult<()> {
        let query = self.update_query(record)?;
        self.run(conn, Operation::Update, &query)?;
        Ok(())
    }

    /// Delete (or deactivate) the row with `key`.
    pub fn delete<C: Connection>(&self, conn: &C, key: impl Into<Value>) -> DaoResult<()> {
        let query = self.delete_query(key.into());
        self.run(conn, Operation::Delete, &query)?;
        Ok(())
    }

    /// Whether a row with `key` exists. Deactivated rows do not count when
    /// soft delete is configured.
    ///
    /// A `Null` key never matches a row, so no statement is run for it.
    pub fn exists<C: Connection>(&self, conn: &C, key: impl Into<Value>) -> DaoResult<bool> {
        let key = key.into();
        if key.is_null() {
            return Ok(false);
        }
        let filters = self.exists_filters(key);
        let query = self.count_query(Some(filters.as_slice()))?;
        Ok(self.fetch_count(conn, Operation::Exists, &query)? > 0)
    }

    /// Change a row's key from `old_key` to `new_key`.
    pub fn update_key<C: Connection>(
        &self,
        conn: &C,
        old_key: impl Into<Value>,
        new_key: impl Into<Value>,
    ) -> DaoResult<()> {
        let query = self.update_key_query(old_key.into(), new_key.into());
        self.run(conn, Operation::UpdateKey, &query)?;
        Ok(())
    }

    // ==================== Execution ====================

    /// Prepare, bind in placeholder order, and execute.
    fn run<'c, C: Connection>(
        &self,
        conn: &'c C,
        operation: Operation,
        query: &BoundQuery,
    ) -> DaoResult<C::Statement<'c>> {
        log_statement(operation, &self.table, query);
        let mut stmt = conn.prepare(&query.sql)?;
        for (idx, param) in query.params.iter().enumerate() {
            stmt.bind(idx + 1, &param.value, param.ty)?;
        }
        stmt.execute()?;
        Ok(stmt)
    }

    fn fetch_count<C: Connection>(
        &self,
        conn: &C,
        operation: Operation,
        query: &BoundQuery,
    ) -> DaoResult<i64> {
        let mut stmt = self.run(conn, operation, query)?;
        let row = stmt
            .fetch_row()?
            .ok_or_else(|| DaoError::validation("count(*) returned no row"))?;
        let (_, value) = row
            .iter()
            .next()
            .ok_or_else(|| DaoError::validation("count(*) returned an empty row"))?;
        value.as_i64().ok_or_else(|| {
            DaoError::validation(format!("count(*) returned a {} value", value.kind()))
        })
    }
}

fn has_value(record: &Record, property: &str) -> bool {
    record.get(property).is_some_and(|v| !v.is_null())
}

fn push_clause(sql: &mut String, clause: &str) {
    if !clause.is_empty() {
        sql.push(' ');
        sql.push_str(clause);
    }
}
