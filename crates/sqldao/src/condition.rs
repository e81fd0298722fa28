//! Filters and their compilation into a parameterized WHERE clause.
//!
//! A [`Filter`] is loose input (it may come straight from JSON), so every
//! field is optional. [`compile_filters`] validates each entry in order and
//! produces `WHERE "col" op ? AND ...` plus the values to bind, in
//! placeholder order, typed by their column.
//!
//! # Example
//! ```ignore
//! use sqldao::Filter;
//!
//! let filters = vec![
//!     Filter::eq("status", "open"),
//!     Filter::gt("priority", 2),
//!     Filter::is_null("closed_at"),
//! ];
//! // WHERE "status" = ? AND "priority" > ? AND "closed_at" IS NULL
//! let count = dao.count(&conn, Some(filters.as_slice()))?;
//! ```

use crate::config::{ACTIVE, Config, sentinel_literal};
use crate::error::{DaoError, DaoResult};
use crate::ident::Dialect;
use crate::param::{BoundQuery, ParamList};
use crate::schema::{ColumnSchema, ColumnType};
use crate::value::Value;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Comparison operator accepted in a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `<>`
    Ne,
    /// `!=`
    NotEq,
    /// `LIKE`
    Like,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
}

impl Op {
    pub const ALL: [Op; 10] = [
        Op::Eq,
        Op::Lt,
        Op::Gt,
        Op::Lte,
        Op::Gte,
        Op::Ne,
        Op::NotEq,
        Op::Like,
        Op::IsNull,
        Op::IsNotNull,
    ];

    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Lte => "<=",
            Op::Gte => ">=",
            Op::Ne => "<>",
            Op::NotEq => "!=",
            Op::Like => "LIKE",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
        }
    }

    /// Whether the operator compares against a bound value.
    pub fn takes_value(self) -> bool {
        !matches!(self, Op::IsNull | Op::IsNotNull)
    }

    /// Parse an operator. Keyword operators are matched case-insensitively
    /// and with any run of whitespace between words.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Op::ALL
            .into_iter()
            .find(|op| op.as_sql().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Op {
    type Err = DaoError;

    fn from_str(s: &str) -> DaoResult<Self> {
        Op::parse(s).ok_or_else(|| DaoError::validation(format!("unknown operator '{s}'")))
    }
}

/// One `{property, operator, value?}` condition.
///
/// `value` is ignored for `IS NULL` / `IS NOT NULL` and required otherwise;
/// a `Null` value counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub property: Option<String>,
    pub operator: Option<String>,
    pub value: Option<Value>,
}

impl Filter {
    pub fn new(property: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Self {
            property: Some(property.into()),
            operator: Some(op.as_sql().to_string()),
            value: Some(value.into()),
        }
    }

    /// Build a filter from an operator string that is only checked at compile time.
    pub fn raw(property: impl Into<String>, operator: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            property: Some(property.into()),
            operator: Some(operator.into()),
            value,
        }
    }

    pub fn eq(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(property, Op::Eq, value)
    }

    pub fn ne(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(property, Op::Ne, value)
    }

    pub fn lt(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(property, Op::Lt, value)
    }

    pub fn lte(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(property, Op::Lte, value)
    }

    pub fn gt(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(property, Op::Gt, value)
    }

    pub fn gte(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(property, Op::Gte, value)
    }

    pub fn like(property: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::new(property, Op::Like, pattern)
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            operator: Some(Op::IsNull.as_sql().to_string()),
            value: None,
        }
    }

    pub fn is_not_null(property: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            operator: Some(Op::IsNotNull.as_sql().to_string()),
            value: None,
        }
    }
}

/// A filter that passed validation.
#[derive(Debug)]
struct Condition<'a> {
    column: &'a str,
    ty: ColumnType,
    op: Op,
    value: Option<&'a Value>,
}

impl<'a> Condition<'a> {
    fn parse(schema: &ColumnSchema, position: usize, filter: &'a Filter) -> DaoResult<Self> {
        let operator = filter
            .operator
            .as_deref()
            .ok_or_else(|| DaoError::filter(position, "missing operator"))?;
        let op = Op::parse(operator).ok_or_else(|| {
            DaoError::filter(position, format!("illegal operator '{operator}'"))
        })?;
        let column = filter
            .property
            .as_deref()
            .ok_or_else(|| DaoError::filter(position, "missing property"))?;
        let ty = schema.get(column).ok_or_else(|| {
            DaoError::filter(position, format!("unknown property '{column}'"))
        })?;

        let value = if op.takes_value() {
            match &filter.value {
                Some(v) if !v.is_null() => Some(v),
                _ => {
                    return Err(DaoError::filter(
                        position,
                        format!("operator '{op}' requires a value"),
                    ));
                }
            }
        } else {
            None
        };

        Ok(Self {
            column,
            ty,
            op,
            value,
        })
    }

    fn write_sql(&self, dialect: Dialect, out: &mut String, params: &mut ParamList) {
        dialect.write_escaped(out, self.column);
        out.push(' ');
        out.push_str(self.op.as_sql());
        if let Some(value) = self.value {
            out.push_str(" ?");
            params.push(value.clone(), self.ty);
        }
    }
}

/// Compile `filters` into a WHERE clause (`""` when there is nothing to filter).
///
/// - `None` with soft delete configured: `WHERE <deactivate column> = <active literal>`,
///   with the literal embedded and no bound values.
/// - `None` otherwise: empty clause.
/// - `Some(list)`: every entry is validated in order; the first invalid one
///   fails the whole call. The active-row condition is **not** added; callers
///   that pass filters must include it themselves.
pub fn compile_filters(
    filters: Option<&[Filter]>,
    schema: &ColumnSchema,
    config: &Config,
    dialect: Dialect,
) -> DaoResult<BoundQuery> {
    let Some(filters) = filters else {
        let sql = match config.deactivate_column() {
            Some((column, column_type)) => format!(
                "WHERE {} = {}",
                dialect.escape(column),
                sentinel_literal(column_type, ACTIVE)
            ),
            None => String::new(),
        };
        return Ok(BoundQuery::new(sql, ParamList::new()));
    };

    let conditions = filters
        .iter()
        .enumerate()
        .map(|(position, filter)| Condition::parse(schema, position, filter))
        .collect::<DaoResult<Vec<_>>>()?;

    let mut sql = String::new();
    let mut params = ParamList::new();
    for (i, condition) in conditions.iter().enumerate() {
        sql.push_str(if i == 0 { "WHERE " } else { " AND " });
        condition.write_sql(dialect, &mut sql, &mut params);
    }
    Ok(BoundQuery::new(sql, params))
}
